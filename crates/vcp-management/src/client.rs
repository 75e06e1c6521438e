// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::ManagementError;
use crate::types::{AccessKey, AccessKeyRequest, Identity};

/// Trait for the management API operations the CLI needs.
///
/// Implementations carry their own authentication; every call is made as the
/// operator the client was built for.
#[async_trait]
pub trait ManagementClient: Send + Sync {
	/// Identity of the operator this client authenticates as.
	async fn self_identity(&self) -> Result<Identity, ManagementError>;

	/// Ask the platform who `access_key` authenticates as.
	///
	/// Fails if the platform does not accept the key.
	async fn validate_self(&self, access_key: &str) -> Result<Identity, ManagementError>;

	/// Mint a new access key owned by `request.owner`.
	async fn mint_access_key(&self, request: &AccessKeyRequest)
		-> Result<AccessKey, ManagementError>;
}
