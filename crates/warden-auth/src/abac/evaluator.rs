// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission evaluator: the caller-facing front of the policy engine.
//!
//! Builds the environment for each check (time, business hours, network trust),
//! short-circuits unauthenticated callers, and offers batch checks plus a few
//! attribute predicates used by UI gating.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::engine::PolicyEngine;
use super::types::{
	Action, AuthorizationDecision, AuthorizationRequest, Environment, PermissionCheck, Resource,
	Subject,
};
use crate::clock::{Clock, SystemClock};

/// Working-hours window: Monday through Friday, `start_hour <= hour < end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
	pub start_hour: u32,
	pub end_hour: u32,
}

impl Default for BusinessHours {
	fn default() -> Self {
		Self {
			start_hour: 9,
			end_hour: 17,
		}
	}
}

impl BusinessHours {
	pub fn new(start_hour: u32, end_hour: u32) -> Self {
		Self {
			start_hour,
			end_hour,
		}
	}

	/// Returns true if `at` falls on a weekday inside the window, in `at`'s own offset.
	pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
		let weekday = at.weekday().number_from_monday();
		let hour = at.hour();
		(1..=5).contains(&weekday) && hour >= self.start_hour && hour < self.end_hour
	}
}

/// Tunables for environment derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorSettings {
	pub business_hours: BusinessHours,
	/// Value used for `isTrustedNetwork` when the caller does not supply one.
	pub trusted_network_default: bool,
}

impl Default for EvaluatorSettings {
	fn default() -> Self {
		Self {
			business_hours: BusinessHours::default(),
			trusted_network_default: true,
		}
	}
}

/// Decisions of a batch check, keyed by the caller's check keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchDecision {
	decisions: BTreeMap<String, AuthorizationDecision>,
}

impl BatchDecision {
	pub fn get(&self, key: &str) -> Option<&AuthorizationDecision> {
		self.decisions.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorizationDecision)> {
		self.decisions.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.decisions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.decisions.is_empty()
	}

	/// True when every decision allows. Vacuously true for an empty batch.
	pub fn all_allowed(&self) -> bool {
		self.decisions.values().all(AuthorizationDecision::allowed)
	}

	/// True when at least one decision allows. False for an empty batch.
	pub fn any_allowed(&self) -> bool {
		self.decisions.values().any(AuthorizationDecision::allowed)
	}

	pub fn into_inner(self) -> BTreeMap<String, AuthorizationDecision> {
		self.decisions
	}
}

impl FromIterator<(String, AuthorizationDecision)> for BatchDecision {
	fn from_iter<I: IntoIterator<Item = (String, AuthorizationDecision)>>(iter: I) -> Self {
		Self {
			decisions: iter.into_iter().collect(),
		}
	}
}

/// High-level permission checks over a shared [`PolicyEngine`].
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
	engine: Arc<PolicyEngine>,
	clock: Arc<dyn Clock>,
	settings: EvaluatorSettings,
}

impl PermissionEvaluator {
	/// Creates an evaluator using the system clock and default settings.
	pub fn new(engine: Arc<PolicyEngine>) -> Self {
		Self {
			engine,
			clock: Arc::new(SystemClock),
			settings: EvaluatorSettings::default(),
		}
	}

	/// Builder: replace the clock.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Builder: replace the settings.
	pub fn with_settings(mut self, settings: EvaluatorSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn engine(&self) -> &Arc<PolicyEngine> {
		&self.engine
	}

	pub fn settings(&self) -> &EvaluatorSettings {
		&self.settings
	}

	/// Checks whether `subject` may perform `action` on `resource`.
	///
	/// A `None` subject is an unauthenticated caller and is denied without
	/// consulting any rule.
	#[instrument(
		level = "debug",
		skip(self, subject, resource, environment),
		fields(
			user_id = subject.map(|s| s.user_id.as_str()),
			action = %action,
			resource_type = %resource.resource_type,
		)
	)]
	pub fn can(
		&self,
		subject: Option<&Subject>,
		action: Action,
		resource: &Resource,
		environment: Option<&Environment>,
	) -> AuthorizationDecision {
		let now = self.clock.now();

		let Some(subject) = subject else {
			debug!("unauthenticated subject, denying");
			return AuthorizationDecision::not_authenticated(now.with_timezone(&Utc));
		};

		let request = AuthorizationRequest::new(subject.clone(), action, resource.clone())
			.with_environment(self.environment_at(environment, &now));
		self.engine.evaluate_at(&request, now.with_timezone(&Utc))
	}

	/// Evaluates a batch of named checks, one decision per key.
	///
	/// Later checks with a repeated key overwrite earlier ones.
	pub fn can_multiple(
		&self,
		subject: Option<&Subject>,
		checks: &[PermissionCheck],
		environment: Option<&Environment>,
	) -> BatchDecision {
		let environment = self.environment(environment);
		checks
			.iter()
			.map(|check| {
				let resource = check.to_resource();
				let decision = self.can(subject, check.action, &resource, Some(&environment));
				(check.key.clone(), decision)
			})
			.collect()
	}

	/// True if the subject owns or created the resource.
	pub fn is_owner(&self, subject: &Subject, resource: &Resource) -> bool {
		let user_id = subject.user_id.as_str();
		resource.owner.as_deref() == Some(user_id) || resource.created_by.as_deref() == Some(user_id)
	}

	/// True if both sides carry a department and they are equal.
	pub fn is_same_department(&self, subject: &Subject, resource: &Resource) -> bool {
		matches!(
			(subject.department, resource.department),
			(Some(a), Some(b)) if a == b
		)
	}

	/// Whether the clock currently reads inside the business-hours window.
	pub fn is_business_hours(&self) -> bool {
		self.settings.business_hours.contains(&self.clock.now())
	}

	/// Completes a caller-supplied environment with derived attributes.
	///
	/// Attributes the caller set are kept as-is; missing `time`,
	/// `isBusinessHours` and `isTrustedNetwork` are filled from the clock and
	/// settings.
	pub fn environment(&self, supplied: Option<&Environment>) -> Environment {
		self.environment_at(supplied, &self.clock.now())
	}

	/// Fills the environment from a single clock reading.
	fn environment_at(
		&self,
		supplied: Option<&Environment>,
		now: &DateTime<FixedOffset>,
	) -> Environment {
		let mut environment = supplied.cloned().unwrap_or_default();
		if environment.time.is_none() {
			environment.time = Some(now.with_timezone(&Utc));
		}
		if environment.is_business_hours.is_none() {
			environment.is_business_hours = Some(self.settings.business_hours.contains(now));
		}
		if environment.is_trusted_network.is_none() {
			environment.is_trusted_network = Some(self.settings.trusted_network_default);
		}
		environment
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::types::{Department, PolicyCondition, PolicyRule, ResourceType, UserRole};
	use crate::clock::FixedClock;
	use proptest::prelude::*;

	fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
		FixedOffset::east_opt(0)
			.unwrap()
			.with_ymd_and_hms(y, m, d, h, 0, 0)
			.unwrap()
	}

	// 2024-03-04 is a Monday, 2024-03-09 a Saturday.
	fn monday_10am() -> DateTime<FixedOffset> {
		at(2024, 3, 4, 10)
	}

	fn saturday_10am() -> DateTime<FixedOffset> {
		at(2024, 3, 9, 10)
	}

	fn evaluator_with(rules: Vec<PolicyRule>, now: DateTime<FixedOffset>) -> PermissionEvaluator {
		let engine = Arc::new(PolicyEngine::new(rules).unwrap());
		PermissionEvaluator::new(engine).with_clock(Arc::new(FixedClock::new(now)))
	}

	fn allow_read_docs() -> PolicyRule {
		PolicyRule::allow("read-docs", "Read Docs")
			.with_actions([Action::Read])
			.with_resource_types([ResourceType::Document])
	}

	mod business_hours {
		use super::*;

		#[test]
		fn weekday_window_is_half_open() {
			let hours = BusinessHours::default();
			assert!(!hours.contains(&at(2024, 3, 4, 8)));
			assert!(hours.contains(&at(2024, 3, 4, 9)));
			assert!(hours.contains(&at(2024, 3, 8, 16)));
			assert!(!hours.contains(&at(2024, 3, 8, 17)));
		}

		#[test]
		fn weekends_are_closed() {
			let hours = BusinessHours::default();
			assert!(!hours.contains(&saturday_10am()));
			assert!(!hours.contains(&at(2024, 3, 10, 12)));
		}

		#[test]
		fn evaluated_in_local_offset() {
			// 08:30 UTC Monday is 10:30 in UTC+2.
			let offset = FixedOffset::east_opt(2 * 3600).unwrap();
			let local = offset.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap();
			let evaluator = evaluator_with(vec![], local);
			assert!(evaluator.is_business_hours());
		}

		#[test]
		fn custom_window() {
			let evaluator = evaluator_with(vec![], at(2024, 3, 4, 7)).with_settings(EvaluatorSettings {
				business_hours: BusinessHours::new(6, 14),
				..Default::default()
			});
			assert!(evaluator.is_business_hours());
		}
	}

	mod environment {
		use super::*;

		#[test]
		fn fills_missing_attributes() {
			let evaluator = evaluator_with(vec![], monday_10am());
			let env = evaluator.environment(None);

			assert_eq!(env.is_business_hours, Some(true));
			assert_eq!(env.is_trusted_network, Some(true));
			assert_eq!(env.time, Some(monday_10am().with_timezone(&chrono::Utc)));
		}

		#[test]
		fn keeps_supplied_attributes() {
			let evaluator = evaluator_with(vec![], monday_10am());
			let supplied = Environment {
				is_business_hours: Some(false),
				is_trusted_network: Some(false),
				ip_address: Some("203.0.113.7".to_string()),
				..Default::default()
			};
			let env = evaluator.environment(Some(&supplied));

			assert_eq!(env.is_business_hours, Some(false));
			assert_eq!(env.is_trusted_network, Some(false));
			assert_eq!(env.ip_address.as_deref(), Some("203.0.113.7"));
		}

		#[test]
		fn trusted_network_default_is_configurable() {
			let evaluator = evaluator_with(vec![], monday_10am()).with_settings(EvaluatorSettings {
				trusted_network_default: false,
				..Default::default()
			});
			assert_eq!(evaluator.environment(None).is_trusted_network, Some(false));
		}
	}

	mod checks {
		use super::*;

		#[test]
		fn unauthenticated_short_circuits() {
			let evaluator = evaluator_with(vec![allow_read_docs()], monday_10am());
			let decision = evaluator.can(None, Action::Read, &Resource::new(ResourceType::Document), None);

			assert!(!decision.allowed());
			assert!(decision.matched_policies().is_empty());
			assert_eq!(decision.reason(), AuthorizationDecision::NOT_AUTHENTICATED);
		}

		#[test]
		fn authenticated_delegates_to_engine() {
			let evaluator = evaluator_with(vec![allow_read_docs()], monday_10am());
			let subject = Subject::new("u1", UserRole::User);
			let decision = evaluator.can(
				Some(&subject),
				Action::Read,
				&Resource::new(ResourceType::Document),
				None,
			);
			assert!(decision.allowed());
			assert_eq!(decision.evaluated_at(), monday_10am().with_timezone(&chrono::Utc));
		}

		#[test]
		fn derived_business_hours_reach_conditions() {
			let deny = PolicyRule::deny("closed", "Closed")
				.with_actions([Action::Read])
				.with_resource_types([ResourceType::Document])
				.with_condition(PolicyCondition::equals("environment.isBusinessHours", false))
				.with_priority(90);
			let rules = vec![deny, allow_read_docs()];
			let subject = Subject::new("u1", UserRole::User);
			let doc = Resource::new(ResourceType::Document);

			let weekday = evaluator_with(rules.clone(), monday_10am());
			assert!(weekday.can(Some(&subject), Action::Read, &doc, None).allowed());

			let weekend = evaluator_with(rules, saturday_10am());
			assert!(!weekend.can(Some(&subject), Action::Read, &doc, None).allowed());
		}
	}

	mod clock_readings {
		use super::*;
		use std::sync::atomic::{AtomicI64, Ordering};

		/// Advances one second on every reading.
		#[derive(Debug)]
		struct TickingClock {
			start: DateTime<FixedOffset>,
			readings: AtomicI64,
		}

		impl TickingClock {
			fn new(start: DateTime<FixedOffset>) -> Self {
				Self {
					start,
					readings: AtomicI64::new(0),
				}
			}
		}

		impl Clock for TickingClock {
			fn now(&self) -> DateTime<FixedOffset> {
				let n = self.readings.fetch_add(1, Ordering::SeqCst);
				self.start + chrono::Duration::seconds(n)
			}
		}

		fn one_second_before_close() -> DateTime<FixedOffset> {
			FixedOffset::east_opt(0)
				.unwrap()
				.with_ymd_and_hms(2024, 3, 4, 16, 59, 59)
				.unwrap()
		}

		#[test]
		fn one_check_reads_the_clock_once() {
			let open_only = allow_read_docs()
				.with_condition(PolicyCondition::equals("environment.isBusinessHours", true))
				.with_condition(PolicyCondition::equals(
					"environment.time",
					"2024-03-04T16:59:59Z",
				));
			let engine = Arc::new(PolicyEngine::new(vec![open_only]).unwrap());
			let clock = Arc::new(TickingClock::new(one_second_before_close()));
			let evaluator = PermissionEvaluator::new(engine).with_clock(clock.clone());

			let subject = Subject::new("u1", UserRole::User);
			let decision = evaluator.can(
				Some(&subject),
				Action::Read,
				&Resource::new(ResourceType::Document),
				None,
			);

			assert!(decision.allowed());
			assert_eq!(
				decision.evaluated_at(),
				one_second_before_close().with_timezone(&Utc)
			);
			assert_eq!(clock.readings.load(Ordering::SeqCst), 1);
		}

		#[test]
		fn derived_environment_is_consistent() {
			let clock = Arc::new(TickingClock::new(one_second_before_close()));
			let engine = Arc::new(PolicyEngine::empty());
			let evaluator = PermissionEvaluator::new(engine).with_clock(clock);

			let env = evaluator.environment(None);
			assert_eq!(env.time, Some(one_second_before_close().with_timezone(&Utc)));
			assert_eq!(env.is_business_hours, Some(true));
		}
	}

	mod batch {
		use super::*;

		#[test]
		fn require_all_and_any() {
			let evaluator = evaluator_with(vec![allow_read_docs()], monday_10am());
			let subject = Subject::new("u1", UserRole::User);
			let checks = [
				PermissionCheck::new("a", Action::Read, ResourceType::Document),
				PermissionCheck::new("b", Action::Delete, ResourceType::Document),
			];

			let batch = evaluator.can_multiple(Some(&subject), &checks, None);
			assert_eq!(batch.len(), 2);
			assert!(batch.get("a").unwrap().allowed());
			assert!(!batch.get("b").unwrap().allowed());
			assert!(!batch.all_allowed());
			assert!(batch.any_allowed());
		}

		#[test]
		fn empty_batch_is_vacuous() {
			let evaluator = evaluator_with(vec![], monday_10am());
			let subject = Subject::new("u1", UserRole::User);
			let batch = evaluator.can_multiple(Some(&subject), &[], None);
			assert!(batch.is_empty());
			assert!(batch.all_allowed());
			assert!(!batch.any_allowed());
		}

		#[test]
		fn unauthenticated_batch_denies_every_key() {
			let evaluator = evaluator_with(vec![allow_read_docs()], monday_10am());
			let checks = [PermissionCheck::new("a", Action::Read, ResourceType::Document)];
			let batch = evaluator.can_multiple(None, &checks, None);
			assert_eq!(
				batch.get("a").map(|d| d.reason()),
				Some(AuthorizationDecision::NOT_AUTHENTICATED)
			);
		}

		#[test]
		fn serializes_as_plain_map() {
			let evaluator = evaluator_with(vec![allow_read_docs()], monday_10am());
			let subject = Subject::new("u1", UserRole::User);
			let checks = [PermissionCheck::new("read", Action::Read, ResourceType::Document)];
			let value = serde_json::to_value(evaluator.can_multiple(Some(&subject), &checks, None)).unwrap();
			assert_eq!(value["read"]["allowed"], serde_json::json!(true));
		}
	}

	mod predicates {
		use super::*;

		fn evaluator() -> PermissionEvaluator {
			evaluator_with(vec![], monday_10am())
		}

		#[test]
		fn owner_by_owner_or_creator() {
			let evaluator = evaluator();
			let subject = Subject::new("u1", UserRole::User);
			let base = Resource::new(ResourceType::Post);

			assert!(evaluator.is_owner(&subject, &base.clone().with_owner("u1")));
			assert!(evaluator.is_owner(&subject, &base.clone().with_created_by("u1")));
			assert!(!evaluator.is_owner(
				&subject,
				&base.clone().with_owner("u2").with_created_by("u3")
			));
			assert!(!evaluator.is_owner(&subject, &base));
		}

		#[test]
		fn same_department_requires_both_sides() {
			let evaluator = evaluator();
			let subject = Subject::new("u1", UserRole::User).with_department(Department::It);
			let bare_subject = Subject::new("u2", UserRole::User);
			let it_doc = Resource::new(ResourceType::Document).with_department(Department::It);
			let hr_doc = Resource::new(ResourceType::Document).with_department(Department::Hr);
			let bare_doc = Resource::new(ResourceType::Document);

			assert!(evaluator.is_same_department(&subject, &it_doc));
			assert!(!evaluator.is_same_department(&subject, &hr_doc));
			assert!(!evaluator.is_same_department(&subject, &bare_doc));
			assert!(!evaluator.is_same_department(&bare_subject, &bare_doc));
		}
	}

	proptest! {
		#[test]
		fn business_hours_matches_weekday_and_hour(day in 4u32..11, hour in 0u32..24) {
			let now = at(2024, 3, day, hour);
			let expected = (4..=8).contains(&day) && (9..17).contains(&hour);
			prop_assert_eq!(BusinessHours::default().contains(&now), expected);
		}
	}
}
