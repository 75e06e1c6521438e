// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The desired contents of the platform Secret.

use std::collections::BTreeMap;

use vcp_cli_config::PlatformConfig;
use vcp_k8s::ByteString;

pub const ACCESS_KEY_FIELD: &str = "accessKey";
pub const HOST_FIELD: &str = "host";
pub const INSECURE_FIELD: &str = "insecure";
pub const PROJECT_FIELD: &str = "project";
pub const NAME_FIELD: &str = "name";

/// Secret `data`, keyed by field name.
pub type CredentialPayload = BTreeMap<String, ByteString>;

/// Build the Secret payload for `config`.
///
/// `project` and `import_name` are only included when non-empty.
pub fn build_payload(config: &PlatformConfig, import_name: &str, project: &str) -> CredentialPayload {
	let mut payload = CredentialPayload::new();
	payload.insert(
		ACCESS_KEY_FIELD.to_string(),
		bytes(&config.virtual_cluster_access_key),
	);
	payload.insert(
		HOST_FIELD.to_string(),
		bytes(config.host.strip_prefix("https://").unwrap_or(&config.host)),
	);
	payload.insert(
		INSECURE_FIELD.to_string(),
		bytes(if config.insecure { "true" } else { "false" }),
	);
	if !project.is_empty() {
		payload.insert(PROJECT_FIELD.to_string(), bytes(project));
	}
	if !import_name.is_empty() {
		payload.insert(NAME_FIELD.to_string(), bytes(import_name));
	}
	payload
}

/// Field-by-field comparison of observed Secret data against the payload.
///
/// A Secret without `data` matches only an empty payload.
pub fn payload_matches(
	observed: Option<&BTreeMap<String, ByteString>>,
	desired: &CredentialPayload,
) -> bool {
	let Some(observed) = observed else {
		return desired.is_empty();
	};

	observed.len() == desired.len()
		&& desired
			.iter()
			.all(|(field, value)| observed.get(field).is_some_and(|v| v.0 == value.0))
}

fn bytes(value: &str) -> ByteString {
	ByteString(value.as_bytes().to_vec())
}
