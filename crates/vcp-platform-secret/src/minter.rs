// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use tracing::{info, instrument};
use vcp_cli_config::PlatformConfig;
use vcp_management::{AccessKeyRequest, Identity, ManagementClient, Owner};

use crate::error::{PlatformSecretError, Result};

/// Mint a `vcluster`-scoped access key for `identity` and return `config`
/// carrying it.
///
/// Persisting the returned config is the caller's job.
#[instrument(skip_all, fields(subject = %identity.subject))]
pub async fn mint_access_key(
	client: &dyn ManagementClient,
	identity: &Identity,
	config: PlatformConfig,
) -> Result<PlatformConfig> {
	let request = AccessKeyRequest::vcluster(Owner::of(identity));
	let access_key = client
		.mint_access_key(&request)
		.await
		.map_err(PlatformSecretError::Mint)?;

	info!(owner = ?access_key.owner, "Minted virtual cluster access key");
	Ok(config.with_virtual_cluster_access_key(access_key.key))
}
