// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership grants: resource owners, creators, and users acting on their own profile.

use crate::abac::{Action, PolicyCondition, PolicyRule, ResourceType};

/// Owners have full access to their posts, documents and projects; creators
/// can manage anything they created.
pub fn ownership_policies() -> Vec<PolicyRule> {
	vec![
		PolicyRule::allow("owner-full-access", "Owner Full Access")
			.with_description("Resource owners have full access to their resources")
			.with_actions([Action::Read, Action::Update, Action::Delete, Action::Share])
			.with_resource_types([ResourceType::Post, ResourceType::Document, ResourceType::Project])
			.with_condition(PolicyCondition::equals("subject.userId", "$resource.owner"))
			.with_priority(75),
		PolicyRule::allow("creator-access", "Creator Access")
			.with_description("Resource creators can manage their creations")
			.with_actions([Action::Read, Action::Update, Action::Delete])
			.with_all_resource_types()
			.with_condition(PolicyCondition::equals("subject.userId", "$resource.createdBy"))
			.with_priority(75),
	]
}

/// Users can view and update their own user record.
pub fn user_self_management_policies() -> Vec<PolicyRule> {
	[
		(Action::Read, "user-read-own-profile", "User Can Read Own Profile", "Users can view their own profile"),
		(Action::Update, "user-update-own-profile", "User Can Update Own Profile", "Users can update their own profile"),
	]
	.into_iter()
	.map(|(action, id, name, description)| {
		PolicyRule::allow(id, name)
			.with_description(description)
			.with_actions([action])
			.with_resource_types([ResourceType::User])
			.with_condition(PolicyCondition::equals("subject.userId", "$resource.id"))
			.with_priority(80)
	})
	.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::{AuthorizationRequest, PolicyEngine, Resource, Subject, UserRole};

	fn engine() -> PolicyEngine {
		PolicyEngine::new(
			ownership_policies()
				.into_iter()
				.chain(user_self_management_policies()),
		)
		.unwrap()
	}

	fn user() -> Subject {
		Subject::new("user-1", UserRole::User)
	}

	#[test]
	fn owner_can_share_own_document() {
		let request = AuthorizationRequest::new(
			user(),
			Action::Share,
			Resource::new(ResourceType::Document).with_owner("user-1"),
		);
		let decision = engine().evaluate(&request);
		assert!(decision.allowed());
		assert_eq!(decision.matched_policies(), ["owner-full-access"]);
	}

	#[test]
	fn owner_grant_does_not_cover_reports() {
		let request = AuthorizationRequest::new(
			user(),
			Action::Read,
			Resource::new(ResourceType::Report).with_owner("user-1"),
		);
		assert!(!engine().evaluate(&request).allowed());
	}

	#[test]
	fn creator_can_delete_any_type_but_not_share() {
		let engine = engine();
		let report = Resource::new(ResourceType::Report).with_created_by("user-1");

		let delete = AuthorizationRequest::new(user(), Action::Delete, report.clone());
		assert!(engine.evaluate(&delete).allowed());

		let share = AuthorizationRequest::new(user(), Action::Share, report);
		assert!(!engine.evaluate(&share).allowed());
	}

	#[test]
	fn owner_and_creator_both_recorded() {
		let request = AuthorizationRequest::new(
			user(),
			Action::Update,
			Resource::new(ResourceType::Post)
				.with_owner("user-1")
				.with_created_by("user-1"),
		);
		let decision = engine().evaluate(&request);
		assert_eq!(decision.matched_policies(), ["owner-full-access", "creator-access"]);
		assert_eq!(decision.reason(), "Access allowed by policy: Owner Full Access");
	}

	#[test]
	fn users_manage_only_their_own_profile() {
		let engine = engine();

		let own = Resource::new(ResourceType::User).with_id("user-1");
		let read = AuthorizationRequest::new(user(), Action::Read, own.clone());
		assert_eq!(engine.evaluate(&read).matched_policies(), ["user-read-own-profile"]);
		let update = AuthorizationRequest::new(user(), Action::Update, own.clone());
		assert!(engine.evaluate(&update).allowed());
		let delete = AuthorizationRequest::new(user(), Action::Delete, own);
		assert!(!engine.evaluate(&delete).allowed());

		let other = Resource::new(ResourceType::User).with_id("user-2");
		let read_other = AuthorizationRequest::new(user(), Action::Read, other);
		assert!(!engine.evaluate(&read_other).allowed());
	}
}
