// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Management API client over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use vcp_cli_config::PlatformConfig;

use crate::client::ManagementClient;
use crate::error::{ManagementError, ManagementResult};
use crate::types::{AccessKey, AccessKeyRequest, EntityRef, Identity};

const API_PREFIX: &str = "/kubernetes/management/apis/management.loft.sh/v1";
const API_VERSION: &str = "management.loft.sh/v1";

/// Bound on establishing the TCP/TLS connection. Requests themselves carry no
/// deadline; callers that need one wrap the call.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`HttpManagementClient`].
#[derive(Clone)]
pub struct ClientConfig {
	/// Platform host, with or without scheme. `https://` is assumed when missing.
	pub host: String,
	/// Accept any TLS certificate from the platform.
	pub insecure: bool,
	/// Bearer key the client authenticates with.
	pub access_key: String,
	pub connect_timeout: Duration,
}

impl From<&PlatformConfig> for ClientConfig {
	fn from(config: &PlatformConfig) -> Self {
		Self {
			host: config.host.clone(),
			insecure: config.insecure,
			access_key: config.access_key.clone(),
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelfRequest<'a> {
	api_version: &'static str,
	kind: &'static str,
	spec: SelfSpec<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelfSpec<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	access_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SelfResponse {
	#[serde(default)]
	status: Option<SelfStatus>,
}

#[derive(Debug, Deserialize)]
struct SelfStatus {
	#[serde(default)]
	subject: String,
	#[serde(default)]
	user: Option<NamedEntity>,
	#[serde(default)]
	team: Option<NamedEntity>,
}

#[derive(Debug, Deserialize)]
struct NamedEntity {
	#[serde(default)]
	name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnedAccessKeyRequest<'a> {
	api_version: &'static str,
	kind: &'static str,
	spec: OwnedAccessKeySpec<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnedAccessKeySpec<'a> {
	display_name: &'a str,
	#[serde(skip_serializing_if = "str::is_empty")]
	user: &'a str,
	#[serde(skip_serializing_if = "str::is_empty")]
	team: &'a str,
	scope: AccessKeyScope,
}

#[derive(Debug, Serialize)]
struct AccessKeyScope {
	roles: Vec<AccessKeyScopeRole>,
}

#[derive(Debug, Serialize)]
struct AccessKeyScopeRole {
	role: &'static str,
}

#[derive(Deserialize)]
struct OwnedAccessKeyResponse {
	spec: OwnedAccessKeyResponseSpec,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedAccessKeyResponseSpec {
	#[serde(default)]
	key: String,
	#[serde(default)]
	display_name: Option<String>,
}

/// [`ManagementClient`] talking to the platform's management API.
pub struct HttpManagementClient {
	http_client: reqwest::Client,
	base_url: String,
	access_key: String,
}

impl HttpManagementClient {
	/// Build a client from the CLI's platform settings.
	pub fn from_platform_config(config: &PlatformConfig) -> ManagementResult<Self> {
		Self::with_config(ClientConfig::from(config))
	}

	pub fn with_config(config: ClientConfig) -> ManagementResult<Self> {
		let base_url = normalize_base_url(&config.host)?;
		if config.access_key.is_empty() {
			return Err(ManagementError::Configuration(
				"no access key configured, log in to the platform first".into(),
			));
		}

		if config.insecure {
			warn!(base_url = %base_url, "TLS certificate verification disabled for platform");
		}

		let http_client = reqwest::Client::builder()
			.connect_timeout(config.connect_timeout)
			.danger_accept_invalid_certs(config.insecure)
			.build()
			.map_err(|e| {
				ManagementError::Configuration(format!("failed to create HTTP client: {e}"))
			})?;

		Ok(Self {
			http_client,
			base_url,
			access_key: config.access_key,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, resource: &str) -> String {
		format!("{}{}/{}", self.base_url, API_PREFIX, resource)
	}

	async fn post_self(&self, access_key: Option<&str>) -> ManagementResult<Identity> {
		let url = self.url("selves");
		debug!(url = %url, "Querying self");

		let response = self
			.http_client
			.post(&url)
			.header(AUTHORIZATION, format!("Bearer {}", self.access_key))
			.json(&SelfRequest {
				api_version: API_VERSION,
				kind: "Self",
				spec: SelfSpec { access_key },
			})
			.send()
			.await?;

		let response = check_status(response).await?;
		let body: SelfResponse = response
			.json()
			.await
			.map_err(|e| ManagementError::InvalidResponse(e.to_string()))?;

		let status = body
			.status
			.ok_or_else(|| ManagementError::InvalidResponse("self has no status".into()))?;

		Ok(Identity {
			subject: status.subject,
			user: status.user.map(|u| EntityRef::new(u.name)),
			team: status.team.map(|t| EntityRef::new(t.name)),
		})
	}
}

#[async_trait]
impl ManagementClient for HttpManagementClient {
	#[instrument(skip(self), fields(base_url = %self.base_url))]
	async fn self_identity(&self) -> ManagementResult<Identity> {
		self.post_self(None).await
	}

	#[instrument(skip(self, access_key), fields(base_url = %self.base_url))]
	async fn validate_self(&self, access_key: &str) -> ManagementResult<Identity> {
		self.post_self(Some(access_key)).await
	}

	#[instrument(skip(self, request), fields(base_url = %self.base_url, owner = ?request.owner))]
	async fn mint_access_key(&self, request: &AccessKeyRequest) -> ManagementResult<AccessKey> {
		let url = self.url("ownedaccesskeys");
		let body = OwnedAccessKeyRequest {
			api_version: API_VERSION,
			kind: "OwnedAccessKey",
			spec: OwnedAccessKeySpec {
				display_name: &request.display_name,
				user: request.owner.user_name(),
				team: request.owner.team_name(),
				scope: AccessKeyScope {
					roles: request
						.scope_roles
						.iter()
						.map(|role| AccessKeyScopeRole {
							role: role.as_str(),
						})
						.collect(),
				},
			},
		};

		let response = self
			.http_client
			.post(&url)
			.header(AUTHORIZATION, format!("Bearer {}", self.access_key))
			.json(&body)
			.send()
			.await?;

		let response = check_status(response).await?;
		let created: OwnedAccessKeyResponse = response
			.json()
			.await
			.map_err(|e| ManagementError::InvalidResponse(e.to_string()))?;

		if created.spec.key.is_empty() {
			return Err(ManagementError::InvalidResponse(
				"owned access key was created without key material".into(),
			));
		}

		debug!("Minted owned access key");

		Ok(AccessKey {
			key: created.spec.key,
			display_name: created
				.spec
				.display_name
				.unwrap_or_else(|| request.display_name.clone()),
			owner: request.owner.clone(),
			scope_roles: request.scope_roles.clone(),
		})
	}
}

impl std::fmt::Debug for HttpManagementClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpManagementClient")
			.field("base_url", &self.base_url)
			.finish()
	}
}

fn normalize_base_url(host: &str) -> ManagementResult<String> {
	let host = host.trim();
	if host.is_empty() {
		return Err(ManagementError::Configuration(
			"platform host is not configured".into(),
		));
	}

	let url = if host.starts_with("https://") || host.starts_with("http://") {
		host.to_string()
	} else {
		format!("https://{host}")
	};
	Ok(url.trim_end_matches('/').to_string())
}

async fn check_status(response: reqwest::Response) -> ManagementResult<reqwest::Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	let message = sanitize_body_for_error(&body, 200);
	if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
		return Err(ManagementError::Unauthorized(format!("HTTP {status}: {message}")));
	}

	Err(ManagementError::Api {
		status: status.as_u16(),
		message,
	})
}

fn sanitize_body_for_error(body: &str, max_len: usize) -> String {
	let sanitized: String = body
		.chars()
		.filter(|c| !c.is_control() || *c == ' ')
		.take(max_len)
		.collect();
	if body.chars().count() > max_len {
		format!("{sanitized}...")
	} else {
		sanitized
	}
}
