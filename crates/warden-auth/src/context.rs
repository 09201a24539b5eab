// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller-facing authorization facade.
//!
//! [`AuthorizationContext`] is what route guards and conditional rendering
//! consult: a read-only view combining the current subject, its capability
//! [`Ability`], and the shared [`PermissionEvaluator`]. [`AuthSession`] owns the
//! current identity and rebuilds the context wholesale whenever it changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::abac::{
	Action, AuthorizationDecision, BatchDecision, PermissionCheck, PermissionEvaluator, Resource,
	Subject,
};
use crate::ability::{Ability, AbilityAction};
use crate::identity::Identity;

/// Read-only authorization view for one identity (or none).
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
	subject: Option<Subject>,
	ability: Arc<Ability>,
	evaluator: Arc<PermissionEvaluator>,
}

impl AuthorizationContext {
	/// Builds the context for `identity`; `None` yields an unauthenticated context.
	pub fn new(identity: Option<&Identity>, evaluator: Arc<PermissionEvaluator>) -> Self {
		let subject = identity.map(Subject::from_identity);
		let ability = identity
			.map(|i| Ability::build(i.permissions.iter().cloned()))
			.unwrap_or_default();

		Self {
			subject,
			ability: Arc::new(ability),
			evaluator,
		}
	}

	/// Context with no subject and an empty ability.
	pub fn unauthenticated(evaluator: Arc<PermissionEvaluator>) -> Self {
		Self::new(None, evaluator)
	}

	pub fn subject(&self) -> Option<&Subject> {
		self.subject.as_ref()
	}

	pub fn is_authenticated(&self) -> bool {
		self.subject.is_some()
	}

	/// Full ABAC decision for `action` on `resource`.
	pub fn can_with_reason(&self, action: Action, resource: &Resource) -> AuthorizationDecision {
		self.evaluator
			.can(self.subject.as_ref(), action, resource, None)
	}

	pub fn can(&self, action: Action, resource: &Resource) -> bool {
		self.can_with_reason(action, resource).allowed()
	}

	pub fn cannot(&self, action: Action, resource: &Resource) -> bool {
		!self.can(action, resource)
	}

	pub fn can_multiple(&self, checks: &[PermissionCheck]) -> BatchDecision {
		self.evaluator
			.can_multiple(self.subject.as_ref(), checks, None)
	}

	/// True when every check is allowed.
	pub fn check_all(&self, checks: &[PermissionCheck]) -> bool {
		self.can_multiple(checks).all_allowed()
	}

	/// True when at least one check is allowed.
	pub fn check_any(&self, checks: &[PermissionCheck]) -> bool {
		self.can_multiple(checks).any_allowed()
	}

	/// Decisions for one action over several resources.
	///
	/// Each decision is keyed by the resource ID, or `TYPE-index` (e.g.
	/// `DOCUMENT-2`) for resources without one.
	pub fn permissions_for(
		&self,
		action: Action,
		resources: &[Resource],
	) -> BTreeMap<String, AuthorizationDecision> {
		resources
			.iter()
			.enumerate()
			.map(|(index, resource)| {
				let key = match resource.id.as_deref() {
					Some(id) if !id.is_empty() => id.to_string(),
					_ => format!("{}-{index}", resource.resource_type),
				};
				(key, self.can_with_reason(action, resource))
			})
			.collect()
	}

	/// Which of `actions` are allowed on `resource`.
	pub fn resource_permissions(
		&self,
		resource: &Resource,
		actions: &[Action],
	) -> BTreeMap<Action, bool> {
		actions
			.iter()
			.map(|&action| (action, self.can(action, resource)))
			.collect()
	}

	pub fn is_owner(&self, resource: &Resource) -> bool {
		self.subject
			.as_ref()
			.is_some_and(|subject| self.evaluator.is_owner(subject, resource))
	}

	pub fn is_same_department(&self, resource: &Resource) -> bool {
		self.subject
			.as_ref()
			.is_some_and(|subject| self.evaluator.is_same_department(subject, resource))
	}

	pub fn ability(&self) -> &Ability {
		&self.ability
	}

	pub fn ability_can(&self, action: AbilityAction, subject: &str) -> bool {
		self.ability.can(action, subject)
	}

	pub fn ability_cannot(&self, action: AbilityAction, subject: &str) -> bool {
		self.ability.cannot(action, subject)
	}
}

/// Holder of the current identity and its derived context.
#[derive(Debug)]
pub struct AuthSession {
	evaluator: Arc<PermissionEvaluator>,
	identity: Option<Identity>,
	context: Arc<AuthorizationContext>,
}

impl AuthSession {
	/// Starts a logged-out session.
	pub fn new(evaluator: Arc<PermissionEvaluator>) -> Self {
		let context = Arc::new(AuthorizationContext::unauthenticated(evaluator.clone()));
		Self {
			evaluator,
			identity: None,
			context,
		}
	}

	/// Replaces the identity, rebuilding subject and ability from scratch.
	pub fn set_identity(&mut self, identity: Identity) {
		info!(user_id = %identity.id, role = %identity.role, "session identity changed");
		self.context = Arc::new(AuthorizationContext::new(
			Some(&identity),
			self.evaluator.clone(),
		));
		self.identity = Some(identity);
	}

	/// Logs out: no subject, empty ability.
	pub fn clear(&mut self) {
		if let Some(identity) = self.identity.take() {
			info!(user_id = %identity.id, "session cleared");
		}
		self.context = Arc::new(AuthorizationContext::unauthenticated(self.evaluator.clone()));
	}

	pub fn identity(&self) -> Option<&Identity> {
		self.identity.as_ref()
	}

	/// Current context. Holders of an old `Arc` keep the snapshot they took.
	pub fn context(&self) -> Arc<AuthorizationContext> {
		self.context.clone()
	}
}
