// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for platform secret reconciliation.

use thiserror::Error;
use vcp_cli_config::ConfigError;
use vcp_k8s::K8sError;
use vcp_management::ManagementError;

/// Fatal errors. A key that fails validation is not one of these; it only
/// triggers a re-mint.
#[derive(Debug, Error)]
pub enum PlatformSecretError {
	#[error("load vCluster platform config: {0}")]
	LoadConfig(#[source] ConfigError),

	#[error("resolve platform identity: {0}")]
	ResolveIdentity(#[source] ManagementError),

	#[error("create owned access key: {0}")]
	Mint(#[source] ManagementError),

	#[error("save vCluster platform config: {0}")]
	PersistConfig(#[source] ConfigError),

	#[error("error getting platform secret {namespace}/{name}: {source}")]
	ReadSecret {
		namespace: String,
		name: String,
		#[source]
		source: K8sError,
	},

	#[error("error creating platform secret {namespace}/{name}: {source}")]
	CreateSecret {
		namespace: String,
		name: String,
		#[source]
		source: K8sError,
	},

	#[error("error creating patch for platform secret {namespace}/{name}: {source}")]
	BuildPatch {
		namespace: String,
		name: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("error patching platform secret {namespace}/{name}: {source}")]
	PatchSecret {
		namespace: String,
		name: String,
		#[source]
		source: K8sError,
	},
}

/// Result type for platform secret operations.
pub type Result<T> = std::result::Result<T, PlatformSecretError>;
