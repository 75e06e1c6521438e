// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tracing::{info, instrument};
use vcp_cli_config::{ConfigStore, PlatformConfig};
use vcp_k8s::SecretStore;
use vcp_management::{Identity, ManagementClient};

use crate::error::{PlatformSecretError, Result};
use crate::minter::mint_access_key;
use crate::payload::build_payload;
use crate::reconciler::{reconcile_secret, ReconcileOutcome};
use crate::validator::{validate_access_key, KeyVerdict};

/// Whether the cached virtual cluster key was kept or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
	Reused,
	Minted,
}

/// A logged-in platform session: management API handle, config store, the
/// operator's identity and the current config.
pub struct PlatformClient {
	management: Arc<dyn ManagementClient>,
	config_store: Arc<dyn ConfigStore>,
	identity: Identity,
	config: PlatformConfig,
}

impl PlatformClient {
	pub fn new(
		management: Arc<dyn ManagementClient>,
		config_store: Arc<dyn ConfigStore>,
		identity: Identity,
		config: PlatformConfig,
	) -> Self {
		Self {
			management,
			config_store,
			identity,
			config,
		}
	}

	/// Load the config from `config_store` and ask the platform who
	/// `management` authenticates as.
	pub async fn connect(
		management: Arc<dyn ManagementClient>,
		config_store: Arc<dyn ConfigStore>,
	) -> Result<Self> {
		let config = config_store
			.load()
			.await
			.map_err(PlatformSecretError::LoadConfig)?;
		Self::with_config(management, config_store, config).await
	}

	/// Like [`PlatformClient::connect`], for a config the caller already loaded.
	pub async fn with_config(
		management: Arc<dyn ManagementClient>,
		config_store: Arc<dyn ConfigStore>,
		config: PlatformConfig,
	) -> Result<Self> {
		let identity = management
			.self_identity()
			.await
			.map_err(PlatformSecretError::ResolveIdentity)?;
		Ok(Self::new(management, config_store, identity, config))
	}

	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	pub fn config(&self) -> &PlatformConfig {
		&self.config
	}

	/// Keep the cached virtual cluster key if it still authenticates as this
	/// operator, otherwise mint a new one and persist it.
	///
	/// The in-memory config is only replaced once the save succeeded.
	pub async fn ensure_access_key(&mut self) -> Result<KeyStatus> {
		let verdict = validate_access_key(
			self.management.as_ref(),
			&self.config.virtual_cluster_access_key,
			&self.identity.subject,
		)
		.await;
		if let KeyVerdict::Valid = verdict {
			return Ok(KeyStatus::Reused);
		}

		let updated = mint_access_key(
			self.management.as_ref(),
			&self.identity,
			self.config.clone(),
		)
		.await?;
		self
			.config_store
			.save(&updated)
			.await
			.map_err(PlatformSecretError::PersistConfig)?;
		self.config = updated;
		Ok(KeyStatus::Minted)
	}
}

impl std::fmt::Debug for PlatformClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlatformClient")
			.field("identity", &self.identity)
			.field("config", &self.config)
			.field("config_store", &self.config_store)
			.finish_non_exhaustive()
	}
}

/// Make sure `namespace` has a `vcluster-platform-api-key` Secret holding a
/// valid virtual cluster access key and the platform connection details.
///
/// `import_name` and `project` are written to the Secret when non-empty.
#[instrument(skip(client, store), fields(subject = %client.identity.subject))]
pub async fn apply_platform_secret(
	client: &mut PlatformClient,
	store: &dyn SecretStore,
	import_name: &str,
	namespace: &str,
	project: &str,
) -> Result<ReconcileOutcome> {
	let key_status = client.ensure_access_key().await?;

	let payload = build_payload(client.config(), import_name, project);
	let outcome = reconcile_secret(store, namespace, payload).await?;

	info!(key = ?key_status, outcome = %outcome, "Platform secret reconciled");
	Ok(outcome)
}

#[cfg(test)]
mod tests {
	use super::*;
	use vcp_cli_config::MemoryConfigStore;
	use vcp_management::MockManagementClient;

	#[tokio::test]
	async fn connect_loads_config_and_identity() {
		let identity = Identity::user("loft:user:alice", "alice");
		let config = PlatformConfig::new("platform.example.com", false, "main");
		let management = Arc::new(MockManagementClient::new(identity.clone()));
		let store = Arc::new(MemoryConfigStore::new(config.clone()));

		let client = PlatformClient::connect(management, store).await.unwrap();

		assert_eq!(client.identity(), &identity);
		assert_eq!(client.config(), &config);
	}

	#[tokio::test]
	async fn with_config_uses_the_given_config() {
		let identity = Identity::user("loft:user:alice", "alice");
		let management = Arc::new(MockManagementClient::new(identity.clone()));
		let stored = PlatformConfig::new("stale.example.com", false, "main");
		let store = Arc::new(MemoryConfigStore::new(stored.clone()));
		let loaded = PlatformConfig::new("platform.example.com", true, "main");

		let client = PlatformClient::with_config(management, store.clone(), loaded.clone())
			.await
			.unwrap();

		assert_eq!(client.identity(), &identity);
		assert_eq!(client.config(), &loaded);
		assert_eq!(store.current().await, stored);
	}

	#[tokio::test]
	async fn ensure_access_key_reuses_valid_key() {
		let identity = Identity::user("loft:user:alice", "alice");
		let management = Arc::new(MockManagementClient::new(identity.clone()));
		management.push_validate_response(Ok(identity.clone())).await;
		let store = Arc::new(MemoryConfigStore::default());
		let config = PlatformConfig::default().with_virtual_cluster_access_key("cached");
		let mut client = PlatformClient::new(management.clone(), store.clone(), identity, config);

		let status = client.ensure_access_key().await.unwrap();

		assert_eq!(status, KeyStatus::Reused);
		assert_eq!(client.config().virtual_cluster_access_key, "cached");
		assert!(management.mint_requests().await.is_empty());
		assert_eq!(store.save_count(), 0);
	}

	#[tokio::test]
	async fn persist_failure_keeps_previous_config() {
		let identity = Identity::user("loft:user:alice", "alice");
		let management = Arc::new(MockManagementClient::new(identity.clone()));
		let store = Arc::new(MemoryConfigStore::default());
		store.fail_saves();
		let mut client =
			PlatformClient::new(management, store, identity, PlatformConfig::default());

		let err = client.ensure_access_key().await.unwrap_err();

		assert!(matches!(err, PlatformSecretError::PersistConfig(_)));
		assert_eq!(client.config().virtual_cluster_access_key, "");
	}
}
