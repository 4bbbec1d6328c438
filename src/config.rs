//! Configuration resolution for the bridge.
//!
//! Credentials come from exactly one of two sources, detected once when [`Settings`] is
//! built:
//!
//! - [`ConfigMethod::Environment`] when both `STOREFRONT_BRIDGE_SHOPIFY_STORE_URL` and
//!   `STOREFRONT_BRIDGE_SHOPIFY_ACCESS_TOKEN` are defined. Values are read-only.
//! - [`ConfigMethod::Options`] otherwise, backed by a [`SettingsStore`]. Values are read on
//!   every access so edits take effect without rebuilding the client.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	secret::AccessToken,
	settings::{SettingKey, SettingsStore},
};

const STORE_URL_SUFFIX: &str = ".myshopify.com";

/// Where credentials are resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigMethod {
	/// Process environment (read-only).
	Environment,
	/// Persisted option store.
	Options,
}
impl ConfigMethod {
	/// Returns a stable label suitable for logs and snapshots.
	pub const fn as_str(self) -> &'static str {
		match self {
			ConfigMethod::Environment => "environment",
			ConfigMethod::Options => "options",
		}
	}
}
impl Display for ConfigMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Resolved configuration source shared by the API client and checkout bridge.
pub struct Settings {
	method: ConfigMethod,
	env: BTreeMap<SettingKey, String>,
	store: Arc<dyn SettingsStore>,
}
impl Settings {
	/// Detects the configuration method from the process environment.
	pub fn from_env(store: Arc<dyn SettingsStore>) -> Self {
		Self::with_env_lookup(store, |name| std::env::var(name).ok())
	}

	/// Detects the configuration method through `lookup` instead of the process environment.
	pub fn with_env_lookup<F>(store: Arc<dyn SettingsStore>, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let env = SettingKey::ALL
			.into_iter()
			.filter_map(|key| lookup(key.env_name()).map(|value| (key, value)))
			.collect::<BTreeMap<_, _>>();
		let method = if env.len() == SettingKey::ALL.len() {
			ConfigMethod::Environment
		} else {
			ConfigMethod::Options
		};

		Self { method, env, store }
	}

	/// Returns the detected configuration method.
	pub fn config_method(&self) -> ConfigMethod {
		self.method
	}

	/// Returns `true` when credentials come from the environment.
	pub fn is_using_environment(&self) -> bool {
		self.method == ConfigMethod::Environment
	}

	/// Reads `key` from the active source, falling back to `default` when unset.
	pub fn get(&self, key: SettingKey, default: &str) -> Result<String> {
		let value = match self.method {
			ConfigMethod::Environment => self.env.get(&key).cloned(),
			ConfigMethod::Options => self.store.get(key)?,
		};

		Ok(value.unwrap_or_else(|| default.to_owned()))
	}

	/// Writes `key` to the option store.
	///
	/// Returns `Ok(false)` without writing when credentials come from the environment.
	pub fn set(&self, key: SettingKey, value: &str) -> Result<bool> {
		match self.method {
			ConfigMethod::Environment => Ok(false),
			ConfigMethod::Options => {
				self.store.set(key, value)?;

				Ok(true)
			},
		}
	}

	/// Shopify store base URL, empty when unset.
	pub fn store_url(&self) -> Result<String> {
		self.get(SettingKey::ShopifyStoreUrl, "")
	}

	/// Admin API access token, empty when unset.
	pub fn access_token(&self) -> Result<AccessToken> {
		self.get(SettingKey::ShopifyAccessToken, "").map(AccessToken::new)
	}

	/// Returns `true` when both the store URL and access token are non-blank.
	pub fn is_configured(&self) -> Result<bool> {
		Ok(!self.store_url()?.trim().is_empty() && !self.access_token()?.is_empty())
	}

	/// Trims, validates, and stores a store URL.
	///
	/// Returns `Ok(false)` when credentials come from the environment.
	pub fn save_store_url(&self, raw: &str) -> Result<bool> {
		let url = raw.trim();

		if !validate_store_url(url) {
			return Err(ConfigError::InvalidStoreUrl { url: url.to_owned() }.into());
		}

		self.set(SettingKey::ShopifyStoreUrl, url)
	}

	/// Trims and stores an access token.
	///
	/// Returns `Ok(false)` when credentials come from the environment.
	pub fn save_access_token(&self, raw: &str) -> Result<bool> {
		self.set(SettingKey::ShopifyAccessToken, raw.trim())
	}

	/// Summarizes the current configuration without exposing the access token.
	pub fn snapshot(&self) -> Result<SettingsSnapshot> {
		Ok(SettingsSnapshot {
			store_url: self.store_url()?,
			access_token_set: !self.access_token()?.is_empty(),
			config_method: self.method,
			is_configured: self.is_configured()?,
			is_using_environment: self.is_using_environment(),
		})
	}

	/// Default value for every setting.
	pub fn default_settings() -> BTreeMap<SettingKey, String> {
		SettingKey::ALL.into_iter().map(|key| (key, String::new())).collect()
	}
}
impl Debug for Settings {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Settings")
			.field("method", &self.method)
			.field("env_keys", &self.env.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

/// Point-in-time view of the configuration, safe to log or serialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
	/// Store base URL.
	pub store_url: String,
	/// Whether an access token is present.
	pub access_token_set: bool,
	/// Active configuration method.
	pub config_method: ConfigMethod,
	/// Whether both credentials are present.
	pub is_configured: bool,
	/// Whether credentials come from the environment.
	pub is_using_environment: bool,
}

/// Tunables for the Admin API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
	/// Admin REST API version segment.
	pub api_version: String,
	/// Per-request timeout.
	pub timeout: StdDuration,
	/// `User-Agent` header sent with every request.
	pub user_agent: String,
	/// Storefront name written into draft order notes.
	pub storefront_name: String,
}
impl ClientOptions {
	/// Admin REST API version the bridge was written against.
	pub const DEFAULT_API_VERSION: &'static str = "2023-10";
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Overrides the API version segment.
	pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Overrides the storefront name used in draft order notes.
	pub fn with_storefront_name(mut self, name: impl Into<String>) -> Self {
		self.storefront_name = name.into();

		self
	}
}
impl Default for ClientOptions {
	fn default() -> Self {
		Self {
			api_version: Self::DEFAULT_API_VERSION.into(),
			timeout: Self::DEFAULT_TIMEOUT,
			user_agent: concat!("storefront-bridge/", env!("CARGO_PKG_VERSION")).into(),
			storefront_name: "Storefront".into(),
		}
	}
}

/// Checks that `url` looks like `https://<shop>.myshopify.com`, optionally with a trailing `/`.
///
/// The shop label may only contain ASCII letters, digits, and `-`.
pub fn validate_store_url(url: &str) -> bool {
	let trimmed = url.trim();
	let Some(rest) = trimmed.strip_prefix("https://") else {
		return false;
	};
	let rest = rest.strip_suffix('/').unwrap_or(rest);
	let Some(label) = rest.strip_suffix(STORE_URL_SUFFIX) else {
		return false;
	};

	!label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
