// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Platform connection settings for the vCluster CLI.
//!
//! This crate provides:
//! - [`PlatformConfig`], the `platform` section of the CLI config file
//! - The [`ConfigStore`] trait and a JSON [`FileConfigStore`]
//! - [`MemoryConfigStore`] for tests
//! - Config path resolution (`$VCLUSTER_CONFIG` or `~/.vcluster/config.json`)

pub mod error;
pub mod paths;
pub mod platform;
pub mod store;

pub use error::ConfigError;
pub use paths::{resolve_config_path, CONFIG_PATH_ENV};
pub use platform::PlatformConfig;
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
