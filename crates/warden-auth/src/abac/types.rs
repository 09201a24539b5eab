// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for ABAC policy evaluation.
//!
//! This module defines the core data structures for Attribute-Based Access Control:
//!
//! - [`Subject`]: the actor making a request (role, department, clearance)
//! - [`Resource`]: the object being accessed (type, owner, sensitivity)
//! - [`Environment`]: contextual attributes of the request (time, network)
//! - [`PolicyRule`] / [`PolicyCondition`]: registered rules and their conditions
//! - [`AuthorizationDecision`]: the immutable outcome of one evaluation
//!
//! # Design Principles
//!
//! 1. **Snapshot evaluation**: attributes are captured before evaluation starts
//! 2. **camelCase wire form**: condition paths address fields as `subject.userId`,
//!    `resource.createdBy`, `environment.isBusinessHours`
//! 3. **Absent means undefined**: unset optional attributes are omitted from the
//!    evaluation tree so conditions on them never match

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PolicyError;

/// Declares a closed attribute enumeration with a fixed wire name per variant.
macro_rules! attribute_enum {
	(
		$(#[$meta:meta])*
		pub enum $name:ident as $kind:literal {
			$($variant:ident => $wire:tt),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		pub enum $name {
			$(
				#[serde(rename = $wire)]
				$variant,
			)+
		}

		impl $name {
			/// Every variant, in declaration order.
			pub const ALL: &'static [$name] = &[$($name::$variant),+];

			/// Returns the wire name of this variant.
			pub fn as_str(&self) -> &'static str {
				match self {
					$($name::$variant => $wire,)+
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl FromStr for $name {
			type Err = PolicyError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($wire => Ok($name::$variant),)+
					other => Err(PolicyError::UnknownValue {
						kind: $kind,
						value: other.to_string(),
					}),
				}
			}
		}
	};
}

attribute_enum! {
	/// Actions that can be performed on resources.
	pub enum Action as "action" {
		Create => "CREATE",
		Read => "READ",
		Update => "UPDATE",
		Delete => "DELETE",
		Execute => "EXECUTE",
		Approve => "APPROVE",
		Reject => "REJECT",
		Share => "SHARE",
		Export => "EXPORT",
		Import => "IMPORT",
	}
}

attribute_enum! {
	/// Types of resources that can be protected by ABAC.
	pub enum ResourceType as "resource type" {
		User => "USER",
		Post => "POST",
		Document => "DOCUMENT",
		Project => "PROJECT",
		Report => "REPORT",
		Setting => "SETTING",
		Employee => "EMPLOYEE",
		Department => "DEPARTMENT",
	}
}

attribute_enum! {
	/// Application-wide role assigned by the identity provider.
	pub enum UserRole as "role" {
		Admin => "ADMIN",
		User => "USER",
		Moderator => "MODERATOR",
		Guest => "GUEST",
	}
}

attribute_enum! {
	/// Organizational department of a subject or resource.
	pub enum Department as "department" {
		Hr => "HR",
		It => "IT",
		Finance => "FINANCE",
		Marketing => "MARKETING",
		Sales => "SALES",
		Operations => "OPERATIONS",
		Engineering => "ENGINEERING",
	}
}

attribute_enum! {
	/// Data classification of a resource, from least to most restricted.
	pub enum SensitivityLevel as "sensitivity level" {
		Public => "PUBLIC",
		Internal => "INTERNAL",
		Confidential => "CONFIDENTIAL",
		Restricted => "RESTRICTED",
		Secret => "SECRET",
	}
}

attribute_enum! {
	/// Effect applied when a rule matches.
	pub enum PolicyEffect as "policy effect" {
		Allow => "ALLOW",
		Deny => "DENY",
	}
}

/// Security clearance of a subject, an ordinal in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ClearanceLevel(u8);

impl ClearanceLevel {
	/// Basic access.
	pub const LEVEL_1: ClearanceLevel = ClearanceLevel(1);
	/// Standard access.
	pub const LEVEL_2: ClearanceLevel = ClearanceLevel(2);
	/// Elevated access.
	pub const LEVEL_3: ClearanceLevel = ClearanceLevel(3);
	/// High access.
	pub const LEVEL_4: ClearanceLevel = ClearanceLevel(4);
	/// Maximum access.
	pub const LEVEL_5: ClearanceLevel = ClearanceLevel(5);

	pub fn new(level: u64) -> Result<Self, PolicyError> {
		match level {
			1..=5 => Ok(Self(level as u8)),
			other => Err(PolicyError::InvalidClearanceLevel(other)),
		}
	}

	pub fn get(self) -> u8 {
		self.0
	}
}

impl TryFrom<u64> for ClearanceLevel {
	type Error = PolicyError;

	fn try_from(value: u64) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<ClearanceLevel> for u64 {
	fn from(level: ClearanceLevel) -> Self {
		u64::from(level.0)
	}
}

/// Attributes of the user requesting access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
	pub user_id: String,
	pub role: UserRole,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub department: Option<Department>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub clearance_level: Option<ClearanceLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_email_verified: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub metadata: Map<String, Value>,
}

impl Subject {
	/// Creates a subject with only the mandatory attributes set.
	pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
		Self {
			user_id: user_id.into(),
			role,
			department: None,
			location: None,
			clearance_level: None,
			email: None,
			is_email_verified: None,
			created_at: None,
			metadata: Map::new(),
		}
	}

	/// Builder: set department.
	pub fn with_department(mut self, department: Department) -> Self {
		self.department = Some(department);
		self
	}

	/// Builder: set clearance level.
	pub fn with_clearance(mut self, level: ClearanceLevel) -> Self {
		self.clearance_level = Some(level);
		self
	}

	/// Builder: set email.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	/// Builder: set location.
	pub fn with_location(mut self, location: impl Into<String>) -> Self {
		self.location = Some(location.into());
		self
	}

	/// Builder: set account creation time.
	pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
		self.created_at = Some(created_at);
		self
	}

	/// Builder: add a free-form metadata attribute.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.metadata.insert(key.into(), value.into());
		self
	}
}

/// Attributes of the resource being accessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
	#[serde(rename = "type")]
	pub resource_type: ResourceType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub department: Option<Department>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sensitivity: Option<SensitivityLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_by: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub metadata: Map<String, Value>,
}

impl Resource {
	/// Creates resource attributes carrying only a type.
	pub fn new(resource_type: ResourceType) -> Self {
		Self {
			resource_type,
			id: None,
			owner: None,
			department: None,
			sensitivity: None,
			created_by: None,
			created_at: None,
			tags: Vec::new(),
			metadata: Map::new(),
		}
	}

	/// Builder: set id.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Builder: set owner.
	pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = Some(owner.into());
		self
	}

	/// Builder: set department.
	pub fn with_department(mut self, department: Department) -> Self {
		self.department = Some(department);
		self
	}

	/// Builder: set sensitivity.
	pub fn with_sensitivity(mut self, sensitivity: SensitivityLevel) -> Self {
		self.sensitivity = Some(sensitivity);
		self
	}

	/// Builder: set created_by.
	pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
		self.created_by = Some(created_by.into());
		self
	}

	/// Builder: add a tag.
	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.push(tag.into());
		self
	}

	/// Builder: add a free-form metadata attribute.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.metadata.insert(key.into(), value.into());
		self
	}

	/// Overlays the attributes that are set in `attrs` onto this resource.
	pub fn overlay(mut self, attrs: ResourceAttributes) -> Self {
		if let Some(resource_type) = attrs.resource_type {
			self.resource_type = resource_type;
		}
		if attrs.id.is_some() {
			self.id = attrs.id;
		}
		if attrs.owner.is_some() {
			self.owner = attrs.owner;
		}
		if attrs.department.is_some() {
			self.department = attrs.department;
		}
		if attrs.sensitivity.is_some() {
			self.sensitivity = attrs.sensitivity;
		}
		if attrs.created_by.is_some() {
			self.created_by = attrs.created_by;
		}
		if attrs.created_at.is_some() {
			self.created_at = attrs.created_at;
		}
		if let Some(tags) = attrs.tags {
			self.tags = tags;
		}
		if let Some(metadata) = attrs.metadata {
			self.metadata = metadata;
		}
		self
	}
}

/// Partial resource attributes, used to describe the target of a batch check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAttributes {
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub resource_type: Option<ResourceType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub department: Option<Department>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sensitivity: Option<SensitivityLevel>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_by: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Map<String, Value>>,
}

/// Contextual attributes of the access request.
///
/// Every field is optional; the permission evaluator fills in `time`,
/// `is_business_hours` and `is_trusted_network` when the caller leaves them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub time: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ip_address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub device: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_business_hours: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_trusted_network: Option<bool>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub metadata: Map<String, Value>,
}

/// Comparison operators available to policy conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
	Equals,
	NotEquals,
	In,
	NotIn,
	GreaterThan,
	LessThan,
	Contains,
	Matches,
	/// Any operator name this engine does not understand. Never matches.
	#[serde(other)]
	Unknown,
}

/// A single `field operator value` test inside a rule.
///
/// `field` is a dotted path into the evaluation tree (`subject.role`,
/// `resource.metadata.requiredClearance`). A string `value` beginning with `$`
/// is a cross-reference resolved against the same tree at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCondition {
	pub field: String,
	pub operator: ConditionOperator,
	pub value: Value,
}

impl PolicyCondition {
	pub fn new(field: impl Into<String>, operator: ConditionOperator, value: impl Into<Value>) -> Self {
		Self {
			field: field.into(),
			operator,
			value: value.into(),
		}
	}

	pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::new(field, ConditionOperator::Equals, value)
	}

	pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::new(field, ConditionOperator::NotEquals, value)
	}

	pub fn is_in(field: impl Into<String>, values: impl Into<Value>) -> Self {
		Self::new(field, ConditionOperator::In, values)
	}

	pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::new(field, ConditionOperator::GreaterThan, value)
	}
}

/// An access control rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub effect: PolicyEffect,
	pub actions: BTreeSet<Action>,
	pub resource_types: BTreeSet<ResourceType>,
	/// All conditions must hold (AND).
	#[serde(default)]
	pub conditions: Vec<PolicyCondition>,
	/// Higher number = evaluated first.
	#[serde(default)]
	pub priority: i32,
}

impl PolicyRule {
	fn with_effect(id: impl Into<String>, name: impl Into<String>, effect: PolicyEffect) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			description: None,
			effect,
			actions: BTreeSet::new(),
			resource_types: BTreeSet::new(),
			conditions: Vec::new(),
			priority: 0,
		}
	}

	/// Creates an ALLOW rule matching nothing until actions and types are added.
	pub fn allow(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self::with_effect(id, name, PolicyEffect::Allow)
	}

	/// Creates a DENY rule matching nothing until actions and types are added.
	pub fn deny(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self::with_effect(id, name, PolicyEffect::Deny)
	}

	/// Builder: set description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Builder: add actions.
	pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
		self.actions.extend(actions);
		self
	}

	/// Builder: cover every action.
	pub fn with_all_actions(self) -> Self {
		self.with_actions(Action::ALL.iter().copied())
	}

	/// Builder: add resource types.
	pub fn with_resource_types(mut self, types: impl IntoIterator<Item = ResourceType>) -> Self {
		self.resource_types.extend(types);
		self
	}

	/// Builder: cover every resource type.
	pub fn with_all_resource_types(self) -> Self {
		self.with_resource_types(ResourceType::ALL.iter().copied())
	}

	/// Builder: append a condition.
	pub fn with_condition(mut self, condition: PolicyCondition) -> Self {
		self.conditions.push(condition);
		self
	}

	/// Builder: set priority.
	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Returns true if this rule targets the given action and resource type.
	pub fn targets(&self, action: Action, resource_type: ResourceType) -> bool {
		self.actions.contains(&action) && self.resource_types.contains(&resource_type)
	}

	/// Checks the structural requirements for registering this rule.
	pub fn validate(&self) -> Result<(), PolicyError> {
		if self.id.trim().is_empty() {
			return Err(PolicyError::InvalidRule("rule id must not be empty".to_string()));
		}
		if self.name.trim().is_empty() {
			return Err(PolicyError::InvalidRule(format!(
				"rule '{}' must have a name",
				self.id
			)));
		}
		Ok(())
	}
}

/// Complete context for one authorization decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
	pub subject: Subject,
	pub resource: Resource,
	pub action: Action,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<Environment>,
}

impl AuthorizationRequest {
	pub fn new(subject: Subject, action: Action, resource: Resource) -> Self {
		Self {
			subject,
			resource,
			action,
			environment: None,
		}
	}

	/// Builder: set environment.
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);
		self
	}

	/// Flattens the request into the key-value tree that condition paths walk.
	///
	/// Serialization of these types cannot fail in practice; if it ever did the
	/// tree is `null`, every path is undefined and every condition is false.
	pub fn evaluation_tree(&self) -> Value {
		serde_json::to_value(self).unwrap_or_else(|e| {
			tracing::warn!(error = %e, "failed to build evaluation tree");
			Value::Null
		})
	}
}

/// Result of policy evaluation.
///
/// Decisions are values: fields are read through accessors and never change
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
	allowed: bool,
	reason: String,
	matched_policies: Vec<String>,
	evaluated_at: DateTime<Utc>,
}

impl AuthorizationDecision {
	pub const NOT_AUTHENTICATED: &'static str = "User not authenticated";
	pub const DEFAULT_DENY: &'static str = "No matching policies found - access denied by default";

	pub fn new(
		allowed: bool,
		reason: impl Into<String>,
		matched_policies: Vec<String>,
		evaluated_at: DateTime<Utc>,
	) -> Self {
		Self {
			allowed,
			reason: reason.into(),
			matched_policies,
			evaluated_at,
		}
	}

	/// Decision returned for callers without an authenticated subject.
	pub fn not_authenticated(evaluated_at: DateTime<Utc>) -> Self {
		Self::new(false, Self::NOT_AUTHENTICATED, Vec::new(), evaluated_at)
	}

	/// Decision returned when no rule matched.
	pub fn default_deny(evaluated_at: DateTime<Utc>) -> Self {
		Self::new(false, Self::DEFAULT_DENY, Vec::new(), evaluated_at)
	}

	pub fn allowed(&self) -> bool {
		self.allowed
	}

	pub fn reason(&self) -> &str {
		&self.reason
	}

	/// IDs of every rule that matched, in evaluation order.
	pub fn matched_policies(&self) -> &[String] {
		&self.matched_policies
	}

	pub fn evaluated_at(&self) -> DateTime<Utc> {
		self.evaluated_at
	}
}

/// One named entry of a batch permission check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheck {
	/// Caller-chosen key under which the decision is reported.
	pub key: String,
	pub action: Action,
	pub resource_type: ResourceType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resource_attributes: Option<ResourceAttributes>,
}

impl PermissionCheck {
	pub fn new(key: impl Into<String>, action: Action, resource_type: ResourceType) -> Self {
		Self {
			key: key.into(),
			action,
			resource_type,
			resource_id: None,
			resource_attributes: None,
		}
	}

	/// Builder: set resource id.
	pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
		self.resource_id = Some(id.into());
		self
	}

	/// Builder: set partial resource attributes.
	pub fn with_attributes(mut self, attrs: ResourceAttributes) -> Self {
		self.resource_attributes = Some(attrs);
		self
	}

	/// Builds the target resource: type and id first, then the partial attributes.
	pub fn to_resource(&self) -> Resource {
		let mut resource = Resource::new(self.resource_type);
		resource.id = self.resource_id.clone();
		match &self.resource_attributes {
			Some(attrs) => resource.overlay(attrs.clone()),
			None => resource,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	mod enums {
		use super::*;

		#[test]
		fn wire_names_round_trip_through_from_str() {
			for action in Action::ALL {
				assert_eq!(action.as_str().parse::<Action>().unwrap(), *action);
			}
			for resource_type in ResourceType::ALL {
				assert_eq!(
					resource_type.as_str().parse::<ResourceType>().unwrap(),
					*resource_type
				);
			}
			assert_eq!("HR".parse::<Department>().unwrap(), Department::Hr);
		}

		#[test]
		fn unknown_names_are_rejected() {
			let err = "FLY".parse::<Action>().unwrap_err();
			assert!(matches!(err, PolicyError::UnknownValue { kind: "action", .. }));
			assert!("Hr".parse::<Department>().is_err());
			assert!("blog".parse::<ResourceType>().is_err());
		}

		#[test]
		fn serialize_as_screaming_case() {
			assert_eq!(serde_json::to_value(UserRole::Moderator).unwrap(), json!("MODERATOR"));
			assert_eq!(
				serde_json::to_value(SensitivityLevel::Confidential).unwrap(),
				json!("CONFIDENTIAL")
			);
		}
	}

	mod clearance {
		use super::*;

		#[test]
		fn accepts_one_through_five() {
			for level in 1..=5u64 {
				assert_eq!(ClearanceLevel::new(level).unwrap().get() as u64, level);
			}
		}

		#[test]
		fn rejects_out_of_range() {
			assert!(ClearanceLevel::new(0).is_err());
			assert!(ClearanceLevel::new(6).is_err());
			assert!(serde_json::from_value::<ClearanceLevel>(json!(9)).is_err());
		}

		#[test]
		fn serializes_as_number() {
			assert_eq!(serde_json::to_value(ClearanceLevel::LEVEL_4).unwrap(), json!(4));
		}
	}

	mod attributes {
		use super::*;

		#[test]
		fn absent_attributes_are_omitted_from_tree() {
			let request = AuthorizationRequest::new(
				Subject::new("user-1", UserRole::User),
				Action::Read,
				Resource::new(ResourceType::Document),
			);
			let tree = request.evaluation_tree();

			assert_eq!(tree["subject"]["userId"], json!("user-1"));
			assert!(tree["subject"].get("department").is_none());
			assert!(tree["resource"].get("owner").is_none());
			assert!(tree.get("environment").is_none());
			assert_eq!(tree["resource"]["type"], json!("DOCUMENT"));
			assert_eq!(tree["action"], json!("READ"));
		}

		#[test]
		fn environment_uses_camel_case_keys() {
			let env = Environment {
				is_business_hours: Some(false),
				is_trusted_network: Some(true),
				ip_address: Some("10.0.0.1".to_string()),
				..Default::default()
			};
			let value = serde_json::to_value(&env).unwrap();
			assert_eq!(value["isBusinessHours"], json!(false));
			assert_eq!(value["isTrustedNetwork"], json!(true));
			assert_eq!(value["ipAddress"], json!("10.0.0.1"));
		}

		#[test]
		fn subject_builder_sets_fields() {
			let subject = Subject::new("u", UserRole::User)
				.with_department(Department::Finance)
				.with_clearance(ClearanceLevel::LEVEL_3)
				.with_email("u@example.com")
				.with_metadata("jobTitle", "Analyst");

			assert_eq!(subject.department, Some(Department::Finance));
			assert_eq!(subject.clearance_level, Some(ClearanceLevel::LEVEL_3));
			assert_eq!(subject.metadata["jobTitle"], json!("Analyst"));
		}

		#[test]
		fn resource_deserializes_from_wire_form() {
			let resource: Resource = serde_json::from_value(json!({
				"type": "POST",
				"id": "post-1",
				"createdBy": "user-9",
				"tags": ["draft"],
			}))
			.unwrap();

			assert_eq!(resource.resource_type, ResourceType::Post);
			assert_eq!(resource.created_by.as_deref(), Some("user-9"));
			assert_eq!(resource.tags, vec!["draft".to_string()]);
		}
	}

	mod rules {
		use super::*;

		#[test]
		fn builder_covers_all_actions_and_types() {
			let rule = PolicyRule::allow("r", "Rule")
				.with_all_actions()
				.with_all_resource_types()
				.with_priority(10);

			assert_eq!(rule.actions.len(), Action::ALL.len());
			assert_eq!(rule.resource_types.len(), ResourceType::ALL.len());
			assert!(rule.targets(Action::Import, ResourceType::Department));
		}

		#[test]
		fn priority_defaults_to_zero_on_the_wire() {
			let rule: PolicyRule = serde_json::from_value(json!({
				"id": "r",
				"name": "Rule",
				"effect": "DENY",
				"actions": ["READ"],
				"resourceTypes": ["POST"],
			}))
			.unwrap();

			assert_eq!(rule.priority, 0);
			assert!(rule.conditions.is_empty());
			assert_eq!(rule.effect, PolicyEffect::Deny);
		}

		#[test]
		fn unknown_operator_deserializes_as_unknown() {
			let condition: PolicyCondition = serde_json::from_value(json!({
				"field": "subject.role",
				"operator": "startsWith",
				"value": "AD",
			}))
			.unwrap();
			assert_eq!(condition.operator, ConditionOperator::Unknown);
		}

		#[test]
		fn validate_rejects_blank_id_and_name() {
			assert!(PolicyRule::allow("", "Name").validate().is_err());
			assert!(PolicyRule::allow("id", "  ").validate().is_err());
			assert!(PolicyRule::allow("id", "Name").validate().is_ok());
		}
	}

	mod batch_checks {
		use super::*;

		#[test]
		fn to_resource_overlays_partial_attributes() {
			let check = PermissionCheck::new("edit", Action::Update, ResourceType::Document)
				.with_resource_id("doc-1")
				.with_attributes(ResourceAttributes {
					owner: Some("user-1".to_string()),
					sensitivity: Some(SensitivityLevel::Internal),
					..Default::default()
				});

			let resource = check.to_resource();
			assert_eq!(resource.resource_type, ResourceType::Document);
			assert_eq!(resource.id.as_deref(), Some("doc-1"));
			assert_eq!(resource.owner.as_deref(), Some("user-1"));
			assert_eq!(resource.sensitivity, Some(SensitivityLevel::Internal));
		}

		#[test]
		fn attributes_override_type_and_id() {
			let check = PermissionCheck::new("k", Action::Read, ResourceType::Post)
				.with_resource_id("a")
				.with_attributes(ResourceAttributes {
					resource_type: Some(ResourceType::Project),
					id: Some("b".to_string()),
					..Default::default()
				});

			let resource = check.to_resource();
			assert_eq!(resource.resource_type, ResourceType::Project);
			assert_eq!(resource.id.as_deref(), Some("b"));
		}
	}

	#[test]
	fn decision_serializes_camel_case() {
		let decision = AuthorizationDecision::new(
			true,
			"Access allowed by policy: X",
			vec!["x".to_string()],
			Utc::now(),
		);
		let value = serde_json::to_value(&decision).unwrap();
		assert_eq!(value["allowed"], json!(true));
		assert_eq!(value["matchedPolicies"], json!(["x"]));
		assert!(value.get("evaluatedAt").is_some());
	}
}
