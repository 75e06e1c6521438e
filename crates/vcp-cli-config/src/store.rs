// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Config storage backends.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::platform::PlatformConfig;

/// Key of the platform section inside the config file.
const PLATFORM_SECTION: &str = "platform";

/// Trait for places the platform config can be loaded from and saved to.
#[async_trait]
pub trait ConfigStore: Send + Sync + std::fmt::Debug {
	/// Load the platform config. A store with nothing saved yields the default.
	async fn load(&self) -> Result<PlatformConfig, ConfigError>;

	/// Durably persist the platform config.
	async fn save(&self, config: &PlatformConfig) -> Result<(), ConfigError>;
}

/// JSON file store shared with the rest of the CLI config.
///
/// Only the `platform` section is owned by this store; every other top-level
/// key is read back and written out untouched.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
	path: PathBuf,
}

impl FileConfigStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Store at the default location (see [`crate::resolve_config_path`]).
	pub fn discover() -> Result<Self, ConfigError> {
		Ok(Self::new(crate::paths::resolve_config_path()?))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn read_document(&self) -> Result<Map<String, Value>, ConfigError> {
		let contents = match fs::read_to_string(&self.path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
			Err(e) => return Err(ConfigError::io(&self.path, e)),
		};

		if contents.trim().is_empty() {
			return Ok(Map::new());
		}

		match serde_json::from_str(&contents) {
			Ok(Value::Object(map)) => Ok(map),
			Ok(_) => Err(ConfigError::invalid(&self.path, "top level is not an object")),
			Err(source) => Err(ConfigError::Parse {
				path: self.path.clone(),
				source,
			}),
		}
	}

	async fn write_document(&self, document: &Map<String, Value>) -> Result<(), ConfigError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| ConfigError::io(parent, e))?;
		}

		let contents = serde_json::to_string_pretty(document).map_err(ConfigError::Encode)?;

		let temp_path = self.path.with_extension("tmp");
		let mut file = fs::File::create(&temp_path)
			.await
			.map_err(|e| ConfigError::io(&temp_path, e))?;
		file
			.write_all(contents.as_bytes())
			.await
			.map_err(|e| ConfigError::io(&temp_path, e))?;
		file
			.sync_all()
			.await
			.map_err(|e| ConfigError::io(&temp_path, e))?;
		drop(file);

		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			let perms = std::fs::Permissions::from_mode(0o600);
			if let Err(e) = std::fs::set_permissions(&temp_path, perms) {
				warn!(path = ?temp_path, error = %e, "Failed to set file permissions to 0600");
			}
		}

		fs::rename(&temp_path, &self.path)
			.await
			.map_err(|e| ConfigError::io(&self.path, e))?;

		debug!(path = ?self.path, "Config written");
		Ok(())
	}
}

#[async_trait]
impl ConfigStore for FileConfigStore {
	async fn load(&self) -> Result<PlatformConfig, ConfigError> {
		let mut document = self.read_document().await?;
		match document.remove(PLATFORM_SECTION) {
			None | Some(Value::Null) => Ok(PlatformConfig::default()),
			Some(section) => serde_json::from_value(section).map_err(|source| ConfigError::Parse {
				path: self.path.clone(),
				source,
			}),
		}
	}

	async fn save(&self, config: &PlatformConfig) -> Result<(), ConfigError> {
		let mut document = self.read_document().await?;
		let section = serde_json::to_value(config).map_err(ConfigError::Encode)?;
		document.insert(PLATFORM_SECTION.to_string(), section);
		self.write_document(&document).await
	}
}

/// In-memory config store for testing.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
	config: tokio::sync::RwLock<PlatformConfig>,
	saves: std::sync::atomic::AtomicUsize,
	fail_saves: std::sync::atomic::AtomicBool,
}

impl MemoryConfigStore {
	pub fn new(config: PlatformConfig) -> Self {
		Self {
			config: tokio::sync::RwLock::new(config),
			..Default::default()
		}
	}

	/// Make every subsequent `save` fail with an I/O error.
	pub fn fail_saves(&self) {
		self
			.fail_saves
			.store(true, std::sync::atomic::Ordering::SeqCst);
	}

	/// Number of successful saves so far.
	pub fn save_count(&self) -> usize {
		self.saves.load(std::sync::atomic::Ordering::SeqCst)
	}

	/// The last saved (or initial) config.
	pub async fn current(&self) -> PlatformConfig {
		self.config.read().await.clone()
	}
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
	async fn load(&self) -> Result<PlatformConfig, ConfigError> {
		Ok(self.config.read().await.clone())
	}

	async fn save(&self, config: &PlatformConfig) -> Result<(), ConfigError> {
		if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
			return Err(ConfigError::io(
				"memory",
				std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
			));
		}
		*self.config.write().await = config.clone();
		self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn missing_file_loads_default() {
		let temp_dir = tempfile::tempdir().unwrap();
		let store = FileConfigStore::new(temp_dir.path().join("config.json"));

		let config = store.load().await.unwrap();
		assert_eq!(config, PlatformConfig::default());
	}

	#[tokio::test]
	async fn save_then_load_roundtrip() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("nested").join("config.json");
		let store = FileConfigStore::new(&path);

		let config = PlatformConfig::new("https://platform.example.com", true, "main")
			.with_virtual_cluster_access_key("vc");
		store.save(&config).await.unwrap();

		assert!(path.exists());
		assert!(!path.with_extension("tmp").exists());
		assert_eq!(store.load().await.unwrap(), config);
	}

	#[tokio::test]
	async fn save_preserves_other_sections() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.json");
		std::fs::write(
			&path,
			r#"{"telemetry":{"disabled":true},"platform":{"host":"old","customField":1}}"#,
		)
		.unwrap();
		let store = FileConfigStore::new(&path);

		let config = store
			.load()
			.await
			.unwrap()
			.with_virtual_cluster_access_key("minted");
		store.save(&config).await.unwrap();

		let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(raw["telemetry"]["disabled"], true);
		assert_eq!(raw["platform"]["host"], "old");
		assert_eq!(raw["platform"]["customField"], 1);
		assert_eq!(raw["platform"]["virtualClusterAccessKey"], "minted");
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn saved_file_is_owner_only() {
		use std::os::unix::fs::PermissionsExt;

		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.json");
		let store = FileConfigStore::new(&path);
		store.save(&PlatformConfig::default()).await.unwrap();

		let mode = std::fs::metadata(&path).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o600);
	}

	#[tokio::test]
	async fn non_object_document_is_rejected() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.json");
		std::fs::write(&path, "[1, 2]").unwrap();

		let err = FileConfigStore::new(&path).load().await.unwrap_err();
		assert!(matches!(err, ConfigError::Invalid { .. }));
	}

	#[tokio::test]
	async fn malformed_json_is_a_parse_error() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.json");
		std::fs::write(&path, "{not json").unwrap();

		let err = FileConfigStore::new(&path).load().await.unwrap_err();
		assert!(matches!(err, ConfigError::Parse { .. }));
	}

	#[tokio::test]
	async fn memory_store_counts_saves_and_can_fail() {
		let store = MemoryConfigStore::new(PlatformConfig::default());
		let updated = PlatformConfig::default().with_virtual_cluster_access_key("k");

		store.save(&updated).await.unwrap();
		assert_eq!(store.save_count(), 1);
		assert_eq!(store.current().await, updated);

		store.fail_saves();
		assert!(store.save(&PlatformConfig::default()).await.is_err());
		assert_eq!(store.save_count(), 1);
		assert_eq!(store.current().await, updated);
	}
}
