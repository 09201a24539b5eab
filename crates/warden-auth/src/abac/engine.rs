// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ABAC policy evaluation engine.
//!
//! [`PolicyEngine::evaluate`] scans the registered rules in priority order and
//! combines matches with default-deny / deny-overrides semantics:
//!
//! 1. **Match**: a rule matches when it targets the request's action and
//!    resource type and every one of its conditions holds
//! 2. **Deny overrides**: the first matching DENY ends the scan with a denial
//! 3. **First allow wins**: otherwise the first matching ALLOW decides, and the
//!    scan continues only to collect matched IDs for the audit trail
//! 4. **Default deny**: no match means no access
//!
//! Evaluation is a pure function of the request and the rule snapshot; it never
//! fails and never panics.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, instrument};

use super::condition::evaluate_conditions;
use super::store::PolicyStore;
use super::types::{AuthorizationDecision, AuthorizationRequest, PolicyEffect, PolicyRule};
use crate::error::Result;

/// Engine owning a rule store.
///
/// Construct one per composition root and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct PolicyEngine {
	store: PolicyStore,
}

impl PolicyEngine {
	/// Creates an engine pre-loaded with `initial_rules`.
	pub fn new(initial_rules: impl IntoIterator<Item = PolicyRule>) -> Result<Self> {
		let engine = Self::empty();
		engine.store.add_rules(initial_rules)?;
		Ok(engine)
	}

	/// Creates an engine with no rules. Every request is denied until rules are added.
	pub fn empty() -> Self {
		Self::default()
	}

	/// The rule store backing this engine.
	pub fn store(&self) -> &PolicyStore {
		&self.store
	}

	/// Evaluates a request, stamping the decision with the current time.
	pub fn evaluate(&self, request: &AuthorizationRequest) -> AuthorizationDecision {
		self.evaluate_at(request, Utc::now())
	}

	/// Evaluates a request, stamping the decision with `evaluated_at`.
	#[instrument(
		level = "debug",
		skip(self, request, evaluated_at),
		fields(
			user_id = %request.subject.user_id,
			action = %request.action,
			resource_type = %request.resource.resource_type,
		)
	)]
	pub fn evaluate_at(
		&self,
		request: &AuthorizationRequest,
		evaluated_at: DateTime<Utc>,
	) -> AuthorizationDecision {
		let rules = self.store.read();
		let mut tree: Option<Value> = None;
		let mut matched_policies = Vec::new();
		let mut outcome: Option<(PolicyEffect, &str)> = None;

		for rule in rules.iter() {
			if !rule.targets(request.action, request.resource.resource_type) {
				continue;
			}

			if !rule.conditions.is_empty() {
				let tree = tree.get_or_insert_with(|| request.evaluation_tree());
				if !evaluate_conditions(&rule.conditions, tree) {
					continue;
				}
			}

			matched_policies.push(rule.id.clone());

			match rule.effect {
				PolicyEffect::Deny => {
					outcome = Some((PolicyEffect::Deny, &rule.name));
					break;
				}
				PolicyEffect::Allow => {
					outcome.get_or_insert((PolicyEffect::Allow, &rule.name));
				}
			}
		}

		let decision = match outcome {
			Some((PolicyEffect::Allow, name)) => AuthorizationDecision::new(
				true,
				format!("Access allowed by policy: {name}"),
				matched_policies,
				evaluated_at,
			),
			Some((PolicyEffect::Deny, name)) => AuthorizationDecision::new(
				false,
				format!("Access denied by policy: {name}"),
				matched_policies,
				evaluated_at,
			),
			None => AuthorizationDecision::default_deny(evaluated_at),
		};

		debug!(
			allowed = decision.allowed(),
			matched = ?decision.matched_policies(),
			reason = decision.reason(),
			"authorization decision"
		);

		decision
	}
}
