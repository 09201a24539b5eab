// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-driven grants and restrictions: department membership, clearance,
//! sensitivity and time of access.

use serde_json::json;

use crate::abac::{
	Action, Department, PolicyCondition, PolicyRule, ResourceType, SensitivityLevel,
};

/// Confidential and restricted documents are off limits outside business hours.
pub fn business_hours_policies() -> Vec<PolicyRule> {
	vec![PolicyRule::deny(
		"confidential-business-hours-only",
		"Confidential Access During Business Hours",
	)
	.with_description("Confidential documents can only be accessed during business hours")
	.with_actions([Action::Read, Action::Update])
	.with_resource_types([ResourceType::Document])
	.with_condition(PolicyCondition::is_in(
		"resource.sensitivity",
		json!([
			SensitivityLevel::Confidential.as_str(),
			SensitivityLevel::Restricted.as_str(),
		]),
	))
	.with_condition(PolicyCondition::equals("environment.isBusinessHours", false))
	.with_priority(90)]
}

/// Subjects may read documents and reports whose `requiredClearance` metadata
/// is strictly below their clearance level.
pub fn clearance_policies() -> Vec<PolicyRule> {
	vec![PolicyRule::allow("clearance-level-access", "Clearance Level Based Access")
		.with_description("Users can access resources matching their clearance level")
		.with_actions([Action::Read])
		.with_resource_types([ResourceType::Document, ResourceType::Report])
		.with_condition(PolicyCondition::greater_than(
			"subject.clearanceLevel",
			"$resource.metadata.requiredClearance",
		))
		.with_priority(85)]
}

/// Department grants: HR reads employees, Finance manages finance reports,
/// everyone reads documents from their own department.
pub fn department_policies() -> Vec<PolicyRule> {
	vec![
		PolicyRule::allow("hr-view-employees", "HR Can View Employee Records")
			.with_description("HR department can view all employee records")
			.with_actions([Action::Read])
			.with_resource_types([ResourceType::Employee])
			.with_condition(PolicyCondition::equals(
				"subject.department",
				Department::Hr.as_str(),
			))
			.with_priority(70),
		PolicyRule::allow("finance-manage-reports", "Finance Can Manage Financial Reports")
			.with_description("Finance department can create, read, update financial reports")
			.with_actions([Action::Create, Action::Read, Action::Update])
			.with_resource_types([ResourceType::Report])
			.with_condition(PolicyCondition::equals(
				"subject.department",
				Department::Finance.as_str(),
			))
			.with_condition(PolicyCondition::equals(
				"resource.department",
				Department::Finance.as_str(),
			))
			.with_priority(70),
		PolicyRule::allow("same-department-access", "Same Department Document Access")
			.with_description("Users can read documents from their own department")
			.with_actions([Action::Read])
			.with_resource_types([ResourceType::Document])
			.with_condition(PolicyCondition::equals(
				"subject.department",
				"$resource.department",
			))
			.with_priority(60),
	]
}

/// Anyone can read public resources.
pub fn public_resource_policies() -> Vec<PolicyRule> {
	vec![PolicyRule::allow("public-read-access", "Public Read Access")
		.with_description("Anyone can read public resources")
		.with_actions([Action::Read])
		.with_all_resource_types()
		.with_condition(PolicyCondition::equals(
			"resource.sensitivity",
			SensitivityLevel::Public.as_str(),
		))
		.with_priority(50)]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abac::{
		AuthorizationRequest, ClearanceLevel, Environment, PolicyEngine, Resource, Subject, UserRole,
	};

	fn engine(rules: Vec<PolicyRule>) -> PolicyEngine {
		PolicyEngine::new(rules).unwrap()
	}

	fn user_in(department: Department) -> Subject {
		Subject::new("user-1", UserRole::User).with_department(department)
	}

	mod departments {
		use super::*;

		#[test]
		fn hr_reads_employees() {
			let engine = engine(department_policies());
			let employee = Resource::new(ResourceType::Employee);

			let hr = AuthorizationRequest::new(user_in(Department::Hr), Action::Read, employee.clone());
			assert!(engine.evaluate(&hr).allowed());

			let it = AuthorizationRequest::new(user_in(Department::It), Action::Read, employee);
			assert!(!engine.evaluate(&it).allowed());
		}

		#[test]
		fn finance_reports_need_both_departments() {
			let engine = engine(department_policies());
			let finance_report = Resource::new(ResourceType::Report).with_department(Department::Finance);
			let sales_report = Resource::new(ResourceType::Report).with_department(Department::Sales);

			let ok = AuthorizationRequest::new(user_in(Department::Finance), Action::Create, finance_report);
			assert!(engine.evaluate(&ok).allowed());

			let wrong = AuthorizationRequest::new(user_in(Department::Finance), Action::Create, sales_report);
			assert!(!engine.evaluate(&wrong).allowed());
		}

		#[test]
		fn same_department_documents_are_readable() {
			let engine = engine(department_policies());
			let doc = Resource::new(ResourceType::Document).with_department(Department::Marketing);

			let same = AuthorizationRequest::new(user_in(Department::Marketing), Action::Read, doc.clone());
			assert!(engine.evaluate(&same).allowed());

			let other = AuthorizationRequest::new(user_in(Department::Sales), Action::Read, doc.clone());
			assert!(!engine.evaluate(&other).allowed());

			let none = AuthorizationRequest::new(Subject::new("u", UserRole::User), Action::Read, doc);
			assert!(!engine.evaluate(&none).allowed());
		}
	}

	mod clearance {
		use super::*;

		fn request(level: ClearanceLevel, required: u64) -> AuthorizationRequest {
			AuthorizationRequest::new(
				Subject::new("u", UserRole::User).with_clearance(level),
				Action::Read,
				Resource::new(ResourceType::Document).with_metadata("requiredClearance", required),
			)
		}

		#[test]
		fn higher_clearance_reads() {
			let engine = engine(clearance_policies());
			assert!(engine.evaluate(&request(ClearanceLevel::LEVEL_4, 3)).allowed());
		}

		#[test]
		fn equal_clearance_is_not_enough() {
			let engine = engine(clearance_policies());
			assert!(!engine.evaluate(&request(ClearanceLevel::LEVEL_3, 3)).allowed());
		}

		#[test]
		fn missing_requirement_fails_closed() {
			let engine = engine(clearance_policies());
			let request = AuthorizationRequest::new(
				Subject::new("u", UserRole::User).with_clearance(ClearanceLevel::LEVEL_5),
				Action::Read,
				Resource::new(ResourceType::Report),
			);
			assert!(!engine.evaluate(&request).allowed());
		}
	}

	mod business_hours {
		use super::*;

		fn request(sensitivity: SensitivityLevel, open: bool) -> AuthorizationRequest {
			AuthorizationRequest::new(
				user_in(Department::It),
				Action::Read,
				Resource::new(ResourceType::Document)
					.with_department(Department::It)
					.with_sensitivity(sensitivity),
			)
			.with_environment(Environment {
				is_business_hours: Some(open),
				..Default::default()
			})
		}

		#[test]
		fn confidential_after_hours_is_denied_despite_department_grant() {
			let engine = engine(business_hours_policies().into_iter().chain(department_policies()).collect());
			let decision = engine.evaluate(&request(SensitivityLevel::Confidential, false));

			assert!(!decision.allowed());
			assert_eq!(decision.matched_policies(), ["confidential-business-hours-only"]);
			assert_eq!(
				decision.reason(),
				"Access denied by policy: Confidential Access During Business Hours"
			);
		}

		#[test]
		fn confidential_during_hours_falls_through() {
			let engine = engine(business_hours_policies().into_iter().chain(department_policies()).collect());
			let decision = engine.evaluate(&request(SensitivityLevel::Restricted, true));
			assert!(decision.allowed());
			assert_eq!(decision.matched_policies(), ["same-department-access"]);
		}

		#[test]
		fn internal_after_hours_is_unrestricted() {
			let engine = engine(business_hours_policies().into_iter().chain(department_policies()).collect());
			assert!(engine.evaluate(&request(SensitivityLevel::Internal, false)).allowed());
		}
	}

	#[test]
	fn public_resources_are_readable_by_anyone() {
		let engine = engine(public_resource_policies());
		let guest = Subject::new("guest", UserRole::Guest);
		let public = Resource::new(ResourceType::Project).with_sensitivity(SensitivityLevel::Public);

		let read = AuthorizationRequest::new(guest.clone(), Action::Read, public.clone());
		assert!(engine.evaluate(&read).allowed());

		let update = AuthorizationRequest::new(guest, Action::Update, public);
		assert!(!engine.evaluate(&update).allowed());
	}
}
