// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the management API client.

use thiserror::Error;

/// Errors returned by the management API.
#[derive(Debug, Error)]
pub enum ManagementError {
	/// The client could not be built from the given settings.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Transport failure. The message includes the whole cause chain.
	#[error("HTTP error: {}", with_causes(.0))]
	Http(#[from] reqwest::Error),

	/// The platform rejected the credentials the client authenticates with.
	#[error("unauthorized: {0}")]
	Unauthorized(String),

	/// Any other non-success status.
	#[error("management API returned HTTP {status}: {message}")]
	Api { status: u16, message: String },

	/// The response body did not have the expected shape.
	#[error("invalid response: {0}")]
	InvalidResponse(String),
}

fn with_causes(err: &reqwest::Error) -> String {
	let mut message = err.to_string();
	let mut source = std::error::Error::source(err);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

/// Result type for management API operations.
pub type ManagementResult<T> = Result<T, ManagementError>;
