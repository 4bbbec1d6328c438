//! Simple file-backed [`SettingsStore`] for single-host deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	settings::{SettingKey, SettingsStore, StoreError},
};

type SettingsMap = BTreeMap<SettingKey, String>;

/// Persists settings to a JSON object file after each mutation.
#[derive(Clone, Debug)]
pub struct FileSettings {
	path: PathBuf,
	inner: Arc<RwLock<SettingsMap>>,
}
impl FileSettings {
	/// Opens (or creates) a settings file at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<SettingsMap, StoreError> {
		if !path.exists() {
			return Ok(SettingsMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(SettingsMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create settings directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &SettingsMap) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize settings snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SettingsStore for FileSettings {
	fn get(&self, key: SettingKey) -> Result<Option<String>, StoreError> {
		Ok(self.inner.read().get(&key).cloned())
	}

	fn set(&self, key: SettingKey, value: &str) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let previous = guard.insert(key, value.to_owned());

		if let Err(e) = self.persist_locked(&guard) {
			// Keep memory in step with disk when the write fails.
			match previous {
				Some(old) => guard.insert(key, old),
				None => guard.remove(&key),
			};

			return Err(e);
		}

		Ok(())
	}
}
