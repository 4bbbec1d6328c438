//! Thread-safe in-memory [`SettingsStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	settings::{SettingKey, SettingsStore, StoreError},
};

/// Thread-safe settings backend that keeps values in-process.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings(Arc<RwLock<BTreeMap<SettingKey, String>>>);
impl MemorySettings {
	/// Removes the value stored for `key`, returning it.
	pub fn remove(&self, key: SettingKey) -> Option<String> {
		self.0.write().remove(&key)
	}
}
impl SettingsStore for MemorySettings {
	fn get(&self, key: SettingKey) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(&key).cloned())
	}

	fn set(&self, key: SettingKey, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(key, value.to_owned());

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_state() {
		let store = MemorySettings::default();
		let view = store.clone();

		store.set(SettingKey::ShopifyAccessToken, "shpat_1").expect("Write should succeed.");

		assert_eq!(
			view.get(SettingKey::ShopifyAccessToken).expect("Read should succeed.").as_deref(),
			Some("shpat_1")
		);
		assert_eq!(view.remove(SettingKey::ShopifyAccessToken).as_deref(), Some("shpat_1"));
		assert_eq!(store.get(SettingKey::ShopifyAccessToken).expect("Read should succeed."), None);
	}
}
