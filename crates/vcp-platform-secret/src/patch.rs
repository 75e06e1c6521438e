// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use vcp_k8s::ByteString;

use crate::payload::CredentialPayload;

/// JSON merge patch taking a Secret's `data` from `observed` to `desired`.
///
/// Only differing fields are included: new or changed values as base64,
/// fields missing from `desired` as `null`.
pub fn data_merge_patch(
	observed: Option<&BTreeMap<String, ByteString>>,
	desired: &CredentialPayload,
) -> Result<Value, serde_json::Error> {
	let mut changes = Map::new();

	for (field, value) in desired {
		let unchanged = observed
			.and_then(|data| data.get(field))
			.is_some_and(|current| current.0 == value.0);
		if !unchanged {
			changes.insert(field.clone(), serde_json::to_value(value)?);
		}
	}

	if let Some(observed) = observed {
		for field in observed.keys() {
			if !desired.contains_key(field) {
				changes.insert(field.clone(), Value::Null);
			}
		}
	}

	Ok(json!({ "data": changes }))
}
