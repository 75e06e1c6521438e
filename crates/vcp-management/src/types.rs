// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

/// Display name given to every key minted for virtual clusters.
pub const VCLUSTER_ACCESS_KEY_DISPLAY_NAME: &str = "vCluster CLI Activation Key";

/// Reference to a platform user or team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
	pub name: String,
}

impl EntityRef {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// Who an access key authenticates as.
///
/// The platform fills in exactly one of `user` or `team`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
	pub subject: String,
	pub user: Option<EntityRef>,
	pub team: Option<EntityRef>,
}

impl Identity {
	pub fn user(subject: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			user: Some(EntityRef::new(name)),
			team: None,
		}
	}

	pub fn team(subject: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			user: None,
			team: Some(EntityRef::new(name)),
		}
	}
}

/// Permission bundle attached to an access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRole {
	/// May only be used to connect virtual clusters.
	VCluster,
}

impl ScopeRole {
	/// Value used on the wire.
	pub fn as_str(&self) -> &'static str {
		match self {
			ScopeRole::VCluster => "vcluster",
		}
	}
}

impl fmt::Display for ScopeRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Owner of a minted access key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
	User(String),
	Team(String),
	Unowned,
}

impl Owner {
	/// The user if there is one, else the team, else nobody.
	pub fn of(identity: &Identity) -> Self {
		if let Some(user) = &identity.user {
			Owner::User(user.name.clone())
		} else if let Some(team) = &identity.team {
			Owner::Team(team.name.clone())
		} else {
			Owner::Unowned
		}
	}

	pub fn user_name(&self) -> &str {
		match self {
			Owner::User(name) => name,
			_ => "",
		}
	}

	pub fn team_name(&self) -> &str {
		match self {
			Owner::Team(name) => name,
			_ => "",
		}
	}
}

/// Request for a new owned access key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyRequest {
	pub display_name: String,
	pub owner: Owner,
	pub scope_roles: Vec<ScopeRole>,
}

impl AccessKeyRequest {
	/// A key usable only for connecting virtual clusters, owned by `owner`.
	pub fn vcluster(owner: Owner) -> Self {
		Self {
			display_name: VCLUSTER_ACCESS_KEY_DISPLAY_NAME.to_string(),
			owner,
			scope_roles: vec![ScopeRole::VCluster],
		}
	}
}

/// A minted access key. `key` is the bearer secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey {
	pub key: String,
	pub display_name: String,
	pub owner: Owner,
	pub scope_roles: Vec<ScopeRole>,
}

impl fmt::Debug for AccessKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AccessKey")
			.field("key", &"[REDACTED]")
			.field("display_name", &self.display_name)
			.field("owner", &self.owner)
			.field("scope_roles", &self.scope_roles)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn owner_prefers_user_over_team() {
		let identity = Identity {
			subject: "s".to_string(),
			user: Some(EntityRef::new("alice")),
			team: Some(EntityRef::new("platform")),
		};
		assert_eq!(Owner::of(&identity), Owner::User("alice".to_string()));
	}

	#[test]
	fn owner_falls_back_to_team_then_nobody() {
		assert_eq!(
			Owner::of(&Identity::team("s", "platform")),
			Owner::Team("platform".to_string())
		);
		assert_eq!(Owner::of(&Identity::default()), Owner::Unowned);
	}

	#[test]
	fn owner_wire_names() {
		let user = Owner::User("alice".to_string());
		assert_eq!(user.user_name(), "alice");
		assert_eq!(user.team_name(), "");

		let team = Owner::Team("platform".to_string());
		assert_eq!(team.user_name(), "");
		assert_eq!(team.team_name(), "platform");

		assert_eq!(Owner::Unowned.user_name(), "");
		assert_eq!(Owner::Unowned.team_name(), "");
	}

	#[test]
	fn vcluster_request_has_single_scope_role() {
		let request = AccessKeyRequest::vcluster(Owner::Unowned);
		assert_eq!(request.scope_roles, vec![ScopeRole::VCluster]);
		assert_eq!(request.display_name, "vCluster CLI Activation Key");
		assert_eq!(ScopeRole::VCluster.to_string(), "vcluster");
	}

	#[test]
	fn access_key_debug_is_redacted() {
		let key = AccessKey {
			key: "super-secret".to_string(),
			display_name: VCLUSTER_ACCESS_KEY_DISPLAY_NAME.to_string(),
			owner: Owner::User("alice".to_string()),
			scope_roles: vec![ScopeRole::VCluster],
		};
		let debug = format!("{key:?}");
		assert!(!debug.contains("super-secret"));
		assert!(debug.contains("[REDACTED]"));
	}
}
