// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur while loading or saving the CLI configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// I/O error reading or writing the config file
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// JSON parse error
	#[error("JSON parse error in {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// The config could not be encoded for writing
	#[error("failed to encode config: {0}")]
	Encode(#[source] serde_json::Error),

	/// The file parsed but does not have the expected shape
	#[error("invalid config in {path}: {message}")]
	Invalid { path: PathBuf, message: String },

	/// Home directory not found
	#[error("Could not determine home directory")]
	HomeDirNotFound,
}

impl ConfigError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
		Self::Invalid {
			path: path.into(),
			message: message.into(),
		}
	}
}
