// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{
	api::{Api, Patch, PatchParams, PostParams},
	Client,
};
use tracing::{debug, instrument};

use crate::client::SecretStore;
use crate::error::K8sError;

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default().await?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	/// Wrap an already configured kube client.
	pub fn from_client(client: Client) -> Self {
		Self { client }
	}

	fn secrets(&self, namespace: &str) -> Api<Secret> {
		Api::namespaced(self.client.clone(), namespace)
	}
}

#[async_trait]
impl SecretStore for KubeClient {
	#[instrument(skip(self))]
	async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, K8sError> {
		match self.secrets(namespace).get(name).await {
			Ok(secret) => Ok(secret),
			Err(kube::Error::Api(err)) if err.code == 404 => Err(K8sError::SecretNotFound {
				namespace: namespace.into(),
				name: name.into(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	#[instrument(skip(self, secret), fields(name = ?secret.metadata.name))]
	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError> {
		let secret = self
			.secrets(namespace)
			.create(&PostParams::default(), &secret)
			.await?;
		Ok(secret)
	}

	#[instrument(skip(self, patch))]
	async fn patch_secret(
		&self,
		namespace: &str,
		name: &str,
		patch: &serde_json::Value,
	) -> Result<Secret, K8sError> {
		match self
			.secrets(namespace)
			.patch(name, &PatchParams::default(), &Patch::Merge(patch))
			.await
		{
			Ok(secret) => Ok(secret),
			Err(kube::Error::Api(err)) if err.code == 404 => Err(K8sError::SecretNotFound {
				namespace: namespace.into(),
				name: name.into(),
			}),
			Err(kube::Error::Api(err)) if err.code == 422 => Err(K8sError::InvalidPatch {
				message: err.message,
			}),
			Err(e) => Err(e.into()),
		}
	}
}
