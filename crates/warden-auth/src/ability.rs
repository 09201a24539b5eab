// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capability allow-list for coarse screen and section gating.
//!
//! An [`Ability`] is built from the flat permission list attached to an
//! identity. It has no conditions and no deny entries: a check passes iff some
//! entry grants the action (or `manage`) on the subject type (or `all`).
//! This is deliberately separate from the ABAC engine in [`crate::abac`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PolicyError;

/// Subject type that matches every other subject type.
pub const ALL_SUBJECTS: &str = "all";

/// Application subject types known to the UI.
pub mod subjects {
	pub const DASHBOARD: &str = "Dashboard";
	pub const CHAT: &str = "Chat";
	pub const NOTIFICATIONS: &str = "Notifications";
	pub const MAPS: &str = "Maps";
	/// User list and management.
	pub const HELLO: &str = "Hello";
	pub const USER_FORM: &str = "UserForm";
	pub const SETTINGS: &str = "Settings";
}

/// Capability verbs. `Manage` stands for every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityAction {
	Create,
	Read,
	Update,
	Delete,
	Manage,
}

impl AbilityAction {
	pub fn as_str(&self) -> &'static str {
		match self {
			AbilityAction::Create => "create",
			AbilityAction::Read => "read",
			AbilityAction::Update => "update",
			AbilityAction::Delete => "delete",
			AbilityAction::Manage => "manage",
		}
	}
}

impl fmt::Display for AbilityAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AbilityAction {
	type Err = PolicyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"create" => Ok(AbilityAction::Create),
			"read" => Ok(AbilityAction::Read),
			"update" => Ok(AbilityAction::Update),
			"delete" => Ok(AbilityAction::Delete),
			"manage" => Ok(AbilityAction::Manage),
			other => Err(PolicyError::UnknownValue {
				kind: "ability action",
				value: other.to_string(),
			}),
		}
	}
}

/// One grant: `action` on subject type `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
	pub action: AbilityAction,
	pub subject: String,
}

impl Permission {
	pub fn new(action: AbilityAction, subject: impl Into<String>) -> Self {
		Self {
			action,
			subject: subject.into(),
		}
	}

	fn grants(&self, action: AbilityAction, subject: &str) -> bool {
		let action_ok = self.action == action || self.action == AbilityAction::Manage;
		let subject_ok = self.subject == subject || self.subject == ALL_SUBJECTS;
		action_ok && subject_ok
	}
}

/// Immutable allow-list built for one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
	rules: Vec<Permission>,
}

impl Ability {
	/// Builds an ability from a permission list.
	pub fn build(permissions: impl IntoIterator<Item = Permission>) -> Self {
		let rules: Vec<Permission> = permissions.into_iter().collect();
		debug!(count = rules.len(), "built ability");
		Self { rules }
	}

	/// An ability that grants nothing.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn can(&self, action: AbilityAction, subject: &str) -> bool {
		self.rules.iter().any(|rule| rule.grants(action, subject))
	}

	pub fn cannot(&self, action: AbilityAction, subject: &str) -> bool {
		!self.can(action, subject)
	}

	/// Whether a create form for `subject` may be shown.
	pub fn can_create(&self, subject: &str) -> bool {
		self.can(AbilityAction::Create, subject)
	}

	/// Whether an update form for `subject` may be shown.
	pub fn can_update(&self, subject: &str) -> bool {
		self.can(AbilityAction::Update, subject)
	}

	pub fn rules(&self) -> &[Permission] {
		&self.rules
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}

/// Route guard over an [`Ability`]: passes or names where to redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGuard {
	action: AbilityAction,
	subject: String,
	fallback_path: String,
}

impl PermissionGuard {
	pub const DEFAULT_FALLBACK: &'static str = "/dashboard";

	/// Guards `read` on `subject`, redirecting to `/dashboard` on failure.
	pub fn new(subject: impl Into<String>) -> Self {
		Self {
			action: AbilityAction::Read,
			subject: subject.into(),
			fallback_path: Self::DEFAULT_FALLBACK.to_string(),
		}
	}

	pub fn with_action(mut self, action: AbilityAction) -> Self {
		self.action = action;
		self
	}

	pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
		self.fallback_path = path.into();
		self
	}

	/// Returns `Ok(())` if the ability passes, otherwise the redirect target.
	pub fn check(&self, ability: &Ability) -> Result<(), String> {
		if ability.can(self.action, &self.subject) {
			Ok(())
		} else {
			debug!(
				action = %self.action,
				subject = %self.subject,
				redirect = %self.fallback_path,
				"permission guard redirect"
			);
			Err(self.fallback_path.clone())
		}
	}
}
