//! Storefront checkout bridge: map local cart lines to Shopify variants by SKU, open a draft
//! order through the Admin REST API, and hand the buyer its hosted invoice URL.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod obs;
pub mod secret;
pub mod settings;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::AdminClient,
		checkout::CheckoutBridge,
		config::{ClientOptions, Settings},
		http::ReqwestHttpClient,
		settings::{MemorySettings, SettingKey, SettingsStore},
	};

	/// Bridge type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBridge = CheckoutBridge<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client suitable for talking to a local `httpmock` server.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds option-backed [`Settings`] that point at `store_url` with `access_token`.
	pub fn test_settings(
		store_url: &str,
		access_token: &str,
	) -> (Arc<Settings>, Arc<MemorySettings>) {
		let backend = Arc::new(MemorySettings::default());

		backend
			.set(SettingKey::ShopifyStoreUrl, store_url)
			.expect("Memory settings should accept the store URL.");
		backend
			.set(SettingKey::ShopifyAccessToken, access_token)
			.expect("Memory settings should accept the access token.");

		let store: Arc<dyn SettingsStore> = backend.clone();
		let settings = Arc::new(Settings::with_env_lookup(store, |_| None));

		(settings, backend)
	}

	/// Constructs a [`CheckoutBridge`] backed by in-memory settings and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_bridge(
		store_url: &str,
		access_token: &str,
	) -> (ReqwestTestBridge, Arc<MemorySettings>) {
		let (settings, backend) = test_settings(store_url, access_token);
		let client = AdminClient::with_http_client(
			settings,
			ClientOptions::default().with_storefront_name("Test Storefront"),
			test_reqwest_http_client(),
		);

		(CheckoutBridge::new(client), backend)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
