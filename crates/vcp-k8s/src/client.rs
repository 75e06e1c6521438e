// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;

use crate::error::K8sError;

/// Trait for the namespaced Secret operations credential reconciliation needs.
///
/// This abstraction allows for easy mocking in tests while providing
/// a clean interface over the cluster API.
#[async_trait]
pub trait SecretStore: Send + Sync {
	/// Get a Secret by name.
	///
	/// Returns [`K8sError::SecretNotFound`] when it does not exist.
	async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, K8sError>;

	/// Create a Secret in the specified namespace.
	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError>;

	/// Apply a JSON merge patch (RFC 7386) to a Secret.
	///
	/// # Arguments
	/// * `patch` - Only the fields to change; `null` removes a key
	async fn patch_secret(
		&self,
		namespace: &str,
		name: &str,
		patch: &serde_json::Value,
	) -> Result<Secret, K8sError>;
}
