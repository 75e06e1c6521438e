// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory [`SecretStore`] for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::client::SecretStore;
use crate::error::K8sError;

/// A call made against [`MockSecretStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum SecretCall {
	Get { namespace: String, name: String },
	Create { namespace: String, name: String },
	Patch {
		namespace: String,
		name: String,
		patch: Value,
	},
}

impl SecretCall {
	pub fn is_mutation(&self) -> bool {
		!matches!(self, SecretCall::Get { .. })
	}
}

/// In-memory Secret store that records every call.
///
/// Patches are applied with JSON merge patch semantics, the same way the API
/// server treats `application/merge-patch+json`.
#[derive(Debug, Default)]
pub struct MockSecretStore {
	secrets: Mutex<BTreeMap<(String, String), Secret>>,
	calls: Mutex<Vec<SecretCall>>,
	get_failure: Mutex<Option<String>>,
	create_failure: Mutex<Option<String>>,
	patch_failure: Mutex<Option<String>>,
}

impl MockSecretStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a Secret. Its namespace is taken from the argument, not the metadata.
	pub async fn insert(&self, namespace: &str, mut secret: Secret) {
		let name = secret.metadata.name.clone().unwrap_or_default();
		secret.metadata.namespace = Some(namespace.to_string());
		self
			.secrets
			.lock()
			.await
			.insert((namespace.to_string(), name), secret);
	}

	pub async fn secret(&self, namespace: &str, name: &str) -> Option<Secret> {
		self
			.secrets
			.lock()
			.await
			.get(&(namespace.to_string(), name.to_string()))
			.cloned()
	}

	/// Fail every `get_secret` with an API error carrying `message`.
	pub async fn fail_gets(&self, message: impl Into<String>) {
		*self.get_failure.lock().await = Some(message.into());
	}

	pub async fn fail_creates(&self, message: impl Into<String>) {
		*self.create_failure.lock().await = Some(message.into());
	}

	pub async fn fail_patches(&self, message: impl Into<String>) {
		*self.patch_failure.lock().await = Some(message.into());
	}

	pub async fn calls(&self) -> Vec<SecretCall> {
		self.calls.lock().await.clone()
	}

	pub async fn mutations(&self) -> Vec<SecretCall> {
		self
			.calls
			.lock()
			.await
			.iter()
			.filter(|call| call.is_mutation())
			.cloned()
			.collect()
	}

	pub async fn clear_calls(&self) {
		self.calls.lock().await.clear();
	}

	async fn record(&self, call: SecretCall) {
		self.calls.lock().await.push(call);
	}
}

#[async_trait]
impl SecretStore for MockSecretStore {
	async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, K8sError> {
		self
			.record(SecretCall::Get {
				namespace: namespace.to_string(),
				name: name.to_string(),
			})
			.await;

		if let Some(message) = self.get_failure.lock().await.clone() {
			return Err(K8sError::ApiError { message });
		}

		self
			.secret(namespace, name)
			.await
			.ok_or_else(|| K8sError::SecretNotFound {
				namespace: namespace.to_string(),
				name: name.to_string(),
			})
	}

	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError> {
		let name = secret.metadata.name.clone().unwrap_or_default();
		self
			.record(SecretCall::Create {
				namespace: namespace.to_string(),
				name: name.clone(),
			})
			.await;

		if let Some(message) = self.create_failure.lock().await.clone() {
			return Err(K8sError::ApiError { message });
		}

		let mut secrets = self.secrets.lock().await;
		let key = (namespace.to_string(), name);
		if secrets.contains_key(&key) {
			return Err(K8sError::ApiError {
				message: format!("secrets \"{}\" already exists", key.1),
			});
		}

		let mut created = secret;
		created.metadata.namespace = Some(namespace.to_string());
		secrets.insert(key, created.clone());
		Ok(created)
	}

	async fn patch_secret(
		&self,
		namespace: &str,
		name: &str,
		patch: &Value,
	) -> Result<Secret, K8sError> {
		self
			.record(SecretCall::Patch {
				namespace: namespace.to_string(),
				name: name.to_string(),
				patch: patch.clone(),
			})
			.await;

		if let Some(message) = self.patch_failure.lock().await.clone() {
			return Err(K8sError::ApiError { message });
		}

		let mut secrets = self.secrets.lock().await;
		let key = (namespace.to_string(), name.to_string());
		let existing = secrets.get(&key).ok_or_else(|| K8sError::SecretNotFound {
			namespace: namespace.to_string(),
			name: name.to_string(),
		})?;

		let mut document = serde_json::to_value(existing).map_err(|e| K8sError::InvalidPatch {
			message: e.to_string(),
		})?;
		merge_patch(&mut document, patch);
		let patched: Secret =
			serde_json::from_value(document).map_err(|e| K8sError::InvalidPatch {
				message: e.to_string(),
			})?;

		secrets.insert(key, patched.clone());
		Ok(patched)
	}
}

fn merge_patch(target: &mut Value, patch: &Value) {
	let Value::Object(patch_fields) = patch else {
		*target = patch.clone();
		return;
	};

	if !target.is_object() {
		*target = Value::Object(serde_json::Map::new());
	}
	if let Value::Object(target_fields) = target {
		for (key, value) in patch_fields {
			if value.is_null() {
				target_fields.remove(key);
			} else {
				merge_patch(
					target_fields.entry(key.clone()).or_insert(Value::Null),
					value,
				);
			}
		}
	}
}
