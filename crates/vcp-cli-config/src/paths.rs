// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::ConfigError;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "VCLUSTER_CONFIG";

/// Resolve the CLI config file path.
///
/// `$VCLUSTER_CONFIG` wins when set and non-empty, otherwise
/// `~/.vcluster/config.json`.
pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
	config_path_from(std::env::var_os(CONFIG_PATH_ENV), dirs::home_dir())
}

fn config_path_from(
	env_value: Option<OsString>,
	home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
	if let Some(path) = env_value.filter(|p| !p.is_empty()) {
		let path = PathBuf::from(path);
		tracing::debug!(path = %path.display(), "config path from environment");
		return Ok(path);
	}

	let home = home.ok_or(ConfigError::HomeDirNotFound)?;
	Ok(default_config_path(home))
}

fn default_config_path(home: PathBuf) -> PathBuf {
	home.join(".vcluster").join("config.json")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_path_is_under_dot_vcluster() {
		let path = default_config_path(PathBuf::from("/home/op"));
		assert_eq!(path, PathBuf::from("/home/op/.vcluster/config.json"));
	}

	#[test]
	fn env_override_wins_over_home() {
		let path = config_path_from(
			Some(OsString::from("/etc/vcluster/config.json")),
			Some(PathBuf::from("/home/op")),
		)
		.unwrap();
		assert_eq!(path, PathBuf::from("/etc/vcluster/config.json"));
	}

	#[test]
	fn env_override_is_used_without_home() {
		let path = config_path_from(Some(OsString::from("/tmp/config.json")), None).unwrap();
		assert_eq!(path, PathBuf::from("/tmp/config.json"));
	}

	#[test]
	fn empty_env_override_falls_back_to_home() {
		let path = config_path_from(Some(OsString::new()), Some(PathBuf::from("/home/op"))).unwrap();
		assert_eq!(path, PathBuf::from("/home/op/.vcluster/config.json"));
	}

	#[test]
	fn missing_home_without_override_is_an_error() {
		let err = config_path_from(None, None).unwrap_err();
		assert!(matches!(err, ConfigError::HomeDirNotFound));
	}
}
