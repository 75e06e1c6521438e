// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! vCluster Platform management API client.
//!
//! This crate provides:
//! - A trait-based [`ManagementClient`] abstraction for testability
//! - [`HttpManagementClient`], the production implementation over `reqwest`
//! - [`MockManagementClient`] for tests
//! - Identity and access key types shared with callers

mod client;
mod error;
mod http_client;
mod mock;
mod types;

pub use client::ManagementClient;
pub use error::{ManagementError, ManagementResult};
pub use http_client::{ClientConfig, HttpManagementClient};
pub use mock::MockManagementClient;
pub use types::{
	AccessKey, AccessKeyRequest, EntityRef, Identity, Owner, ScopeRole,
	VCLUSTER_ACCESS_KEY_DISPLAY_NAME,
};
