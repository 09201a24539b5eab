// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based grants: administrators and moderators.

use crate::abac::{Action, PolicyCondition, PolicyRule, ResourceType, UserRole};

/// Admins can perform any action on any resource.
pub fn admin_policies() -> Vec<PolicyRule> {
	vec![PolicyRule::allow("admin-full-access", "Admin Full Access")
		.with_description("Admins can perform any action on any resource")
		.with_all_actions()
		.with_all_resource_types()
		.with_condition(PolicyCondition::equals("subject.role", UserRole::Admin.as_str()))
		.with_priority(100)]
}

/// Moderators manage posts: review, approve, reject and delete.
pub fn moderator_policies() -> Vec<PolicyRule> {
	vec![
		PolicyRule::allow("moderator-content-management", "Moderator Content Management")
			.with_description("Moderators can approve, reject, and delete posts")
			.with_actions([
				Action::Read,
				Action::Update,
				Action::Delete,
				Action::Approve,
				Action::Reject,
			])
			.with_resource_types([ResourceType::Post])
			.with_condition(PolicyCondition::equals(
				"subject.role",
				UserRole::Moderator.as_str(),
			))
			.with_priority(85),
	]
}
