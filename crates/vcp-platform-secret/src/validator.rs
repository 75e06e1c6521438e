// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checks whether a cached virtual cluster access key still works.

use std::time::Duration;

use tracing::{debug, info, warn};
use vcp_management::ManagementClient;

/// Time budget for a single validation round trip.
pub const VALIDATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of validating a cached key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyVerdict {
	Valid,
	Invalid(InvalidReason),
}

impl KeyVerdict {
	pub fn is_valid(&self) -> bool {
		matches!(self, KeyVerdict::Valid)
	}
}

/// Why a cached key was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
	/// No key cached; nothing was sent to the platform.
	Empty,
	/// The platform refused the key or the request failed.
	Rejected(String),
	/// No answer within [`VALIDATION_TIMEOUT`].
	TimedOut,
	/// The key works but belongs to someone else.
	SubjectMismatch { expected: String, actual: String },
}

/// Validate `access_key` against the platform, expecting it to authenticate
/// as `expected_subject`.
pub async fn validate_access_key(
	client: &dyn ManagementClient,
	access_key: &str,
	expected_subject: &str,
) -> KeyVerdict {
	validate_access_key_within(client, access_key, expected_subject, VALIDATION_TIMEOUT).await
}

pub(crate) async fn validate_access_key_within(
	client: &dyn ManagementClient,
	access_key: &str,
	expected_subject: &str,
	budget: Duration,
) -> KeyVerdict {
	if access_key.is_empty() {
		debug!("No virtual cluster access key cached");
		return KeyVerdict::Invalid(InvalidReason::Empty);
	}

	// Any failure here, transient or not, leads to a re-mint. Logged at warn
	// so repeated minting under flaky connectivity shows up.
	match tokio::time::timeout(budget, client.validate_self(access_key)).await {
		Err(_) => {
			warn!(timeout = ?budget, "Validating virtual cluster access key timed out");
			KeyVerdict::Invalid(InvalidReason::TimedOut)
		}
		Ok(Err(e)) => {
			warn!(error = %e, "Virtual cluster access key rejected");
			KeyVerdict::Invalid(InvalidReason::Rejected(e.to_string()))
		}
		Ok(Ok(identity)) if identity.subject != expected_subject => {
			info!(
				expected = %expected_subject,
				actual = %identity.subject,
				"Virtual cluster access key belongs to a different subject"
			);
			KeyVerdict::Invalid(InvalidReason::SubjectMismatch {
				expected: expected_subject.to_string(),
				actual: identity.subject,
			})
		}
		Ok(Ok(_)) => {
			debug!("Virtual cluster access key is valid");
			KeyVerdict::Valid
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vcp_management::{Identity, ManagementError, MockManagementClient};

	#[tokio::test]
	async fn empty_key_is_invalid_without_a_call() {
		let client = MockManagementClient::default();

		let verdict = validate_access_key(&client, "", "loft:user:alice").await;

		assert_eq!(verdict, KeyVerdict::Invalid(InvalidReason::Empty));
		assert!(client.validated_keys().await.is_empty());
	}

	#[tokio::test]
	async fn matching_subject_is_valid() {
		let client = MockManagementClient::default();
		client
			.push_validate_response(Ok(Identity::user("loft:user:alice", "alice")))
			.await;

		let verdict = validate_access_key(&client, "cached", "loft:user:alice").await;

		assert!(verdict.is_valid());
		assert_eq!(client.validated_keys().await, vec!["cached"]);
	}

	#[tokio::test]
	async fn different_subject_is_invalid() {
		let client = MockManagementClient::default();
		client
			.push_validate_response(Ok(Identity::user("loft:user:bob", "bob")))
			.await;

		let verdict = validate_access_key(&client, "cached", "loft:user:alice").await;

		assert_eq!(
			verdict,
			KeyVerdict::Invalid(InvalidReason::SubjectMismatch {
				expected: "loft:user:alice".to_string(),
				actual: "loft:user:bob".to_string(),
			})
		);
	}

	#[tokio::test]
	async fn platform_error_is_invalid() {
		let client = MockManagementClient::default();
		client
			.push_validate_response(Err(ManagementError::Unauthorized("expired".into())))
			.await;

		let verdict = validate_access_key(&client, "cached", "loft:user:alice").await;

		assert!(matches!(
			verdict,
			KeyVerdict::Invalid(InvalidReason::Rejected(_))
		));
	}

	#[tokio::test]
	async fn slow_platform_is_invalid() {
		let client =
			MockManagementClient::default().with_validate_delay(Duration::from_millis(200));
		client
			.push_validate_response(Ok(Identity::user("loft:user:alice", "alice")))
			.await;

		let verdict = validate_access_key_within(
			&client,
			"cached",
			"loft:user:alice",
			Duration::from_millis(10),
		)
		.await;

		assert_eq!(verdict, KeyVerdict::Invalid(InvalidReason::TimedOut));
	}
}
