// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Create-or-patch of the platform Secret.

use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::{debug, info, instrument};
use vcp_k8s::{Secret, SecretStore};

use crate::error::{PlatformSecretError, Result};
use crate::patch::data_merge_patch;
use crate::payload::{payload_matches, CredentialPayload};

/// Name of the Secret holding the platform credentials.
pub const DEFAULT_PLATFORM_SECRET_NAME: &str = "vcluster-platform-api-key";

/// What reconciling the Secret did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
	Created,
	Unchanged,
	Patched,
}

impl fmt::Display for ReconcileOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ReconcileOutcome::Created => "created",
			ReconcileOutcome::Unchanged => "unchanged",
			ReconcileOutcome::Patched => "patched",
		})
	}
}

/// Make `namespace/vcluster-platform-api-key` hold exactly `payload`.
pub async fn reconcile_secret(
	store: &dyn SecretStore,
	namespace: &str,
	payload: CredentialPayload,
) -> Result<ReconcileOutcome> {
	reconcile_named_secret(store, namespace, DEFAULT_PLATFORM_SECRET_NAME, payload).await
}

/// Make `namespace/name` hold exactly `payload`.
///
/// Creates the Secret if it is missing, leaves it alone if its data already
/// matches, and otherwise sends a merge patch with only the differing fields.
#[instrument(skip(store, payload))]
pub async fn reconcile_named_secret(
	store: &dyn SecretStore,
	namespace: &str,
	name: &str,
	payload: CredentialPayload,
) -> Result<ReconcileOutcome> {
	let existing = match store.get_secret(namespace, name).await {
		Ok(secret) => secret,
		Err(e) if e.is_not_found() => {
			let secret = Secret {
				metadata: ObjectMeta {
					name: Some(name.to_string()),
					namespace: Some(namespace.to_string()),
					..Default::default()
				},
				data: Some(payload),
				..Default::default()
			};
			store
				.create_secret(namespace, secret)
				.await
				.map_err(|source| PlatformSecretError::CreateSecret {
					namespace: namespace.to_string(),
					name: name.to_string(),
					source,
				})?;
			info!("Created platform secret");
			return Ok(ReconcileOutcome::Created);
		}
		Err(source) => {
			return Err(PlatformSecretError::ReadSecret {
				namespace: namespace.to_string(),
				name: name.to_string(),
				source,
			});
		}
	};

	if payload_matches(existing.data.as_ref(), &payload) {
		debug!("Platform secret already up to date");
		return Ok(ReconcileOutcome::Unchanged);
	}

	let patch = data_merge_patch(existing.data.as_ref(), &payload).map_err(|source| {
		PlatformSecretError::BuildPatch {
			namespace: namespace.to_string(),
			name: name.to_string(),
			source,
		}
	})?;

	store
		.patch_secret(namespace, name, &patch)
		.await
		.map_err(|source| PlatformSecretError::PatchSecret {
			namespace: namespace.to_string(),
			name: name.to_string(),
			source,
		})?;

	info!("Patched platform secret");
	Ok(ReconcileOutcome::Patched)
}
