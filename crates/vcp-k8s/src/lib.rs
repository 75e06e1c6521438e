// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s Secret access for platform credential reconciliation.
//!
//! This crate provides:
//! - A trait-based Secret store abstraction for testability
//! - Production implementation using the kube crate
//! - An in-memory store that records calls, for tests

mod client;
mod error;
mod kube_client;
mod mock;

pub use client::SecretStore;
pub use error::{K8sError, K8sResult};
pub use k8s_openapi::api::core::v1::Secret;
pub use k8s_openapi::ByteString;
pub use kube_client::KubeClient;
pub use mock::{MockSecretStore, SecretCall};
