// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keeps the `vcluster-platform-api-key` Secret in sync with a valid platform
//! access key.
//!
//! One call to [`apply_platform_secret`] runs, in order:
//!
//! 1. Validate the cached virtual cluster access key against the platform
//!    (60 second budget). A missing key, a rejected key, a timeout or a key
//!    belonging to another subject all count as invalid.
//! 2. If invalid, mint a new `vcluster`-scoped key and save the config.
//! 3. Build the Secret payload (`accessKey`, `host`, `insecure`, and
//!    `project` / `name` when given).
//! 4. Create the Secret if missing, do nothing if it already matches, or
//!    merge-patch just the differing fields.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vcp_cli_config::FileConfigStore;
//! use vcp_k8s::KubeClient;
//! use vcp_management::HttpManagementClient;
//! use vcp_platform_secret::{apply_platform_secret, PlatformClient};
//!
//! let store = Arc::new(FileConfigStore::discover()?);
//! let config = store.load().await?;
//! let management = Arc::new(HttpManagementClient::from_platform_config(&config)?);
//! let mut client = PlatformClient::connect(management, store).await?;
//! let kube = KubeClient::new().await?;
//!
//! apply_platform_secret(&mut client, &kube, "my-vcluster", "vcluster-my-vcluster", "").await?;
//! ```

mod apply;
mod error;
mod minter;
mod patch;
mod payload;
mod reconciler;
mod validator;

pub use apply::{apply_platform_secret, KeyStatus, PlatformClient};
pub use error::{PlatformSecretError, Result};
pub use minter::mint_access_key;
pub use patch::data_merge_patch;
pub use payload::{
	build_payload, payload_matches, CredentialPayload, ACCESS_KEY_FIELD, HOST_FIELD,
	INSECURE_FIELD, NAME_FIELD, PROJECT_FIELD,
};
pub use reconciler::{
	reconcile_named_secret, reconcile_secret, ReconcileOutcome, DEFAULT_PLATFORM_SECRET_NAME,
};
pub use validator::{validate_access_key, InvalidReason, KeyVerdict, VALIDATION_TIMEOUT};
