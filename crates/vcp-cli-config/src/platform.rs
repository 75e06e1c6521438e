// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection settings for the vCluster Platform management API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `platform` section of the CLI config file.
///
/// Fields this crate does not know about are kept in `extra` so a save never
/// drops settings written by a newer CLI.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
	/// Platform URL, possibly with a scheme prefix (`https://platform.example.com`).
	#[serde(default)]
	pub host: String,
	/// Skip TLS certificate verification when talking to `host`.
	#[serde(default)]
	pub insecure: bool,
	/// The operator's own access key, used to authenticate management calls.
	#[serde(default)]
	pub access_key: String,
	/// Access key scoped to virtual clusters. Empty until one has been minted.
	#[serde(default)]
	pub virtual_cluster_access_key: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl PlatformConfig {
	pub fn new(host: impl Into<String>, insecure: bool, access_key: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			insecure,
			access_key: access_key.into(),
			..Default::default()
		}
	}

	/// Returns a copy carrying `key` as the virtual cluster access key.
	pub fn with_virtual_cluster_access_key(mut self, key: impl Into<String>) -> Self {
		self.virtual_cluster_access_key = key.into();
		self
	}

	pub fn has_virtual_cluster_access_key(&self) -> bool {
		!self.virtual_cluster_access_key.is_empty()
	}
}

impl fmt::Debug for PlatformConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PlatformConfig")
			.field("host", &self.host)
			.field("insecure", &self.insecure)
			.field("has_access_key", &!self.access_key.is_empty())
			.field(
				"has_virtual_cluster_access_key",
				&self.has_virtual_cluster_access_key(),
			)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_does_not_leak_keys() {
		let config = PlatformConfig::new("https://platform.example.com", false, "main-key")
			.with_virtual_cluster_access_key("vc-key");
		let debug = format!("{config:?}");

		assert!(debug.contains("platform.example.com"));
		assert!(!debug.contains("main-key"));
		assert!(!debug.contains("vc-key"));
	}

	#[test]
	fn deserializes_camel_case_and_keeps_unknown_fields() {
		let raw = r#"{
			"host": "https://platform.example.com",
			"insecure": true,
			"accessKey": "main",
			"virtualClusterAccessKey": "vc",
			"lastInstallContext": "kind-kind"
		}"#;
		let config: PlatformConfig = serde_json::from_str(raw).unwrap();

		assert_eq!(config.host, "https://platform.example.com");
		assert!(config.insecure);
		assert_eq!(config.access_key, "main");
		assert_eq!(config.virtual_cluster_access_key, "vc");
		assert_eq!(
			config.extra.get("lastInstallContext"),
			Some(&Value::String("kind-kind".to_string()))
		);

		let back = serde_json::to_value(&config).unwrap();
		assert_eq!(back["lastInstallContext"], "kind-kind");
		assert_eq!(back["virtualClusterAccessKey"], "vc");
	}

	#[test]
	fn missing_fields_default_to_empty() {
		let config: PlatformConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, PlatformConfig::default());
		assert!(!config.has_virtual_cluster_access_key());
	}
}
