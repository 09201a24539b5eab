// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Built-in policy set and policy file loading.
//!
//! Each submodule contributes a group of rules. [`default_policies`] combines
//! them in the order they are installed at startup.

pub mod attributes;
pub mod ownership;
pub mod roles;

use std::path::Path;

use tracing::info;

use crate::abac::PolicyRule;
use crate::error::{PolicyError, Result};

pub use attributes::{
	business_hours_policies, clearance_policies, department_policies, public_resource_policies,
};
pub use ownership::{ownership_policies, user_self_management_policies};
pub use roles::{admin_policies, moderator_policies};

/// All built-in rules.
pub fn default_policies() -> Vec<PolicyRule> {
	[
		admin_policies(),
		moderator_policies(),
		business_hours_policies(),
		clearance_policies(),
		ownership_policies(),
		user_self_management_policies(),
		department_policies(),
		public_resource_policies(),
	]
	.into_iter()
	.flatten()
	.collect()
}

/// Reads a JSON array of rules from `path`.
///
/// Rules are validated but not registered; the caller decides which engine
/// receives them.
pub fn load_policy_file(path: &Path) -> Result<Vec<PolicyRule>> {
	let content = std::fs::read_to_string(path).map_err(|source| PolicyError::PolicyFileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let rules: Vec<PolicyRule> =
		serde_json::from_str(&content).map_err(|source| PolicyError::PolicyFileParse {
			path: path.to_path_buf(),
			source,
		})?;

	for rule in &rules {
		rule.validate()?;
	}

	info!(path = %path.display(), count = rules.len(), "loaded policy file");
	Ok(rules)
}
