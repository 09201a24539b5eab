// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated identity and its mapping to ABAC subject attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::abac::{ClearanceLevel, Department, Subject, UserRole};
use crate::ability::Permission;

/// User record supplied by the identity provider after authentication.
///
/// Treated as already validated. ABAC attributes that the provider does not
/// model directly (department, clearance, location) travel in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	pub id: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub role: UserRole,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub metadata: Map<String, Value>,
	/// Capability grants for the [`crate::Ability`] model.
	#[serde(default)]
	pub permissions: Vec<Permission>,
}

impl Subject {
	/// Derives subject attributes from an identity.
	///
	/// `department`, `clearanceLevel` and `location` are lifted out of the
	/// identity metadata when present and valid; invalid values are logged and
	/// left unset. The full metadata map is carried over unchanged.
	pub fn from_identity(identity: &Identity) -> Self {
		let mut subject = Subject::new(identity.id.clone(), identity.role)
			.with_email(identity.email.clone())
			.with_created_at(identity.created_at);
		subject.metadata = identity.metadata.clone();

		if let Some(value) = identity.metadata.get("department") {
			match value.as_str().map(str::parse::<Department>) {
				Some(Ok(department)) => subject.department = Some(department),
				_ => warn!(user_id = %identity.id, %value, "ignoring invalid department attribute"),
			}
		}

		if let Some(value) = identity.metadata.get("clearanceLevel") {
			match value.as_u64().map(ClearanceLevel::new) {
				Some(Ok(level)) => subject.clearance_level = Some(level),
				_ => warn!(user_id = %identity.id, %value, "ignoring invalid clearance attribute"),
			}
		}

		if let Some(location) = identity.metadata.get("location").and_then(Value::as_str) {
			subject.location = Some(location.to_string());
		}

		subject
	}
}

impl From<&Identity> for Subject {
	fn from(identity: &Identity) -> Self {
		Subject::from_identity(identity)
	}
}

#[cfg(test)]
pub(crate) mod fixtures {
	use super::*;
	use crate::ability::AbilityAction;
	use serde_json::json;

	pub fn identity(id: &str, role: UserRole, metadata: Value) -> Identity {
		let created_at = DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z")
			.unwrap()
			.with_timezone(&Utc);
		Identity {
			id: id.to_string(),
			email: format!("{id}@example.com"),
			first_name: "Sarah".to_string(),
			last_name: "Johnson".to_string(),
			role,
			avatar: None,
			created_at,
			updated_at: created_at,
			metadata: metadata.as_object().cloned().unwrap_or_default(),
			permissions: vec![],
		}
	}

	pub fn hr_manager() -> Identity {
		let mut identity = identity(
			"user-hr-001",
			UserRole::User,
			json!({
				"department": "HR",
				"clearanceLevel": 4,
				"location": "New York",
				"jobTitle": "HR Manager",
			}),
		);
		identity.permissions = vec![
			Permission::new(AbilityAction::Read, "Dashboard"),
			Permission::new(AbilityAction::Manage, "Hello"),
		];
		identity
	}
}
