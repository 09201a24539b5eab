// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-Based Access Control.
//!
//! Rules live in a [`PolicyStore`] owned by a [`PolicyEngine`]. The engine
//! evaluates an [`AuthorizationRequest`] against them; the
//! [`PermissionEvaluator`] wraps the engine with environment derivation,
//! unauthenticated short-circuiting and batch checks.
//!
//! Conditions address the request through dotted paths (`subject.department`,
//! `resource.metadata.requiredClearance`) and may compare against another path
//! in the same request with a `$` prefix (`$resource.owner`).

pub mod condition;
pub mod engine;
pub mod evaluator;
pub mod policies;
pub mod store;
pub mod types;

pub use condition::{evaluate_condition, evaluate_conditions, resolve_path};
pub use engine::PolicyEngine;
pub use evaluator::{BatchDecision, BusinessHours, EvaluatorSettings, PermissionEvaluator};
pub use policies::{default_policies, load_policy_file};
pub use store::PolicyStore;
pub use types::{
	Action, AuthorizationDecision, AuthorizationRequest, ClearanceLevel, ConditionOperator,
	Department, Environment, PermissionCheck, PolicyCondition, PolicyEffect, PolicyRule, Resource,
	ResourceAttributes, ResourceType, SensitivityLevel, Subject, UserRole,
};
