// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::ManagementClient;
use crate::error::ManagementError;
use crate::types::{AccessKey, AccessKeyRequest, Identity};

/// A mock management client for tests.
///
/// Responses are returned in FIFO order. With no response queued,
/// `validate_self` fails as unauthorized and `mint_access_key` mints
/// `minted-key-<n>`.
#[derive(Debug, Default)]
pub struct MockManagementClient {
	identity: Identity,
	validate_responses: Mutex<VecDeque<Result<Identity, ManagementError>>>,
	mint_responses: Mutex<VecDeque<Result<AccessKey, ManagementError>>>,
	validate_delay: Option<Duration>,
	validated_keys: Mutex<Vec<String>>,
	mint_requests: Mutex<Vec<AccessKeyRequest>>,
}

impl MockManagementClient {
	/// Create a mock that authenticates as `identity`.
	pub fn new(identity: Identity) -> Self {
		Self {
			identity,
			..Default::default()
		}
	}

	/// Sleep this long inside every `validate_self` call.
	pub fn with_validate_delay(mut self, delay: Duration) -> Self {
		self.validate_delay = Some(delay);
		self
	}

	pub async fn push_validate_response(&self, response: Result<Identity, ManagementError>) {
		self.validate_responses.lock().await.push_back(response);
	}

	pub async fn push_mint_response(&self, response: Result<AccessKey, ManagementError>) {
		self.mint_responses.lock().await.push_back(response);
	}

	/// Keys passed to `validate_self`, in call order.
	pub async fn validated_keys(&self) -> Vec<String> {
		self.validated_keys.lock().await.clone()
	}

	/// Requests passed to `mint_access_key`, in call order.
	pub async fn mint_requests(&self) -> Vec<AccessKeyRequest> {
		self.mint_requests.lock().await.clone()
	}
}

#[async_trait]
impl ManagementClient for MockManagementClient {
	async fn self_identity(&self) -> Result<Identity, ManagementError> {
		Ok(self.identity.clone())
	}

	async fn validate_self(&self, access_key: &str) -> Result<Identity, ManagementError> {
		self.validated_keys.lock().await.push(access_key.to_string());
		if let Some(delay) = self.validate_delay {
			tokio::time::sleep(delay).await;
		}
		self
			.validate_responses
			.lock()
			.await
			.pop_front()
			.unwrap_or_else(|| {
				Err(ManagementError::Unauthorized(
					"no mock response configured".to_string(),
				))
			})
	}

	async fn mint_access_key(
		&self,
		request: &AccessKeyRequest,
	) -> Result<AccessKey, ManagementError> {
		let mut requests = self.mint_requests.lock().await;
		requests.push(request.clone());
		let n = requests.len();
		drop(requests);

		self
			.mint_responses
			.lock()
			.await
			.pop_front()
			.unwrap_or_else(|| {
				Ok(AccessKey {
					key: format!("minted-key-{n}"),
					display_name: request.display_name.clone(),
					owner: request.owner.clone(),
					scope_roles: request.scope_roles.clone(),
				})
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Owner;

	#[tokio::test]
	async fn returns_configured_responses_in_order() {
		let mock = MockManagementClient::new(Identity::user("s", "alice"));
		mock
			.push_validate_response(Ok(Identity::user("s", "alice")))
			.await;
		mock
			.push_validate_response(Err(ManagementError::Unauthorized("expired".into())))
			.await;

		assert!(mock.validate_self("a").await.is_ok());
		assert!(mock.validate_self("b").await.is_err());
		assert!(mock.validate_self("c").await.is_err());
		assert_eq!(mock.validated_keys().await, vec!["a", "b", "c"]);
	}

	#[tokio::test]
	async fn mints_sequential_keys_by_default() {
		let mock = MockManagementClient::default();
		let request = AccessKeyRequest::vcluster(Owner::Unowned);

		assert_eq!(mock.mint_access_key(&request).await.unwrap().key, "minted-key-1");
		assert_eq!(mock.mint_access_key(&request).await.unwrap().key, "minted-key-2");
		assert_eq!(mock.mint_requests().await.len(), 2);
	}
}
