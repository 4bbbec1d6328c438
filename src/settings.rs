//! Option storage contracts and built-in backends for bridge settings.

pub mod file;
pub mod memory;

pub use file::FileSettings;
pub use memory::MemorySettings;

// self
use crate::_prelude::*;

/// Keys understood by every [`SettingsStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
	/// Base URL of the Shopify store (`https://<shop>.myshopify.com`).
	ShopifyStoreUrl,
	/// Admin API access token.
	ShopifyAccessToken,
}
impl SettingKey {
	/// Every key, in a stable order.
	pub const ALL: [SettingKey; 2] = [SettingKey::ShopifyStoreUrl, SettingKey::ShopifyAccessToken];

	/// Name under which the value is persisted by option stores.
	pub const fn option_name(self) -> &'static str {
		match self {
			SettingKey::ShopifyStoreUrl => "shopify_store_url",
			SettingKey::ShopifyAccessToken => "shopify_access_token",
		}
	}

	/// Environment variable consulted when configuration comes from the environment.
	pub const fn env_name(self) -> &'static str {
		match self {
			SettingKey::ShopifyStoreUrl => "STOREFRONT_BRIDGE_SHOPIFY_STORE_URL",
			SettingKey::ShopifyAccessToken => "STOREFRONT_BRIDGE_SHOPIFY_ACCESS_TOKEN",
		}
	}
}
impl Display for SettingKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.option_name())
	}
}

/// Storage backend contract implemented by settings stores.
pub trait SettingsStore
where
	Self: Send + Sync,
{
	/// Reads the persisted value for `key`, if any.
	fn get(&self, key: SettingKey) -> Result<Option<String>, StoreError>;

	/// Persists or replaces the value for `key`.
	fn set(&self, key: SettingKey, value: &str) -> Result<(), StoreError>;

	/// Writes an empty value for every key that has never been stored.
	fn seed_defaults(&self) -> Result<(), StoreError> {
		for key in SettingKey::ALL {
			if self.get(key)?.is_none() {
				self.set(key, "")?;
			}
		}

		Ok(())
	}
}

/// Error type produced by [`SettingsStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
