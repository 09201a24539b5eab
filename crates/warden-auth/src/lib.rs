// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization for Warden.
//!
//! Two independent subsystems live here:
//!
//! - [`abac`]: attribute-based access control. Prioritized policy rules with
//!   conditions over subject, resource and environment attributes, combined
//!   with default-deny / deny-overrides semantics.
//! - [`ability`]: a flat capability allow-list mapping `(action, subject type)`
//!   pairs to grants, used for coarse screen and section gating.
//!
//! The [`context`] module exposes both to callers through a read-only
//! [`AuthorizationContext`] derived from the authenticated [`Identity`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_auth::abac::{
//!     default_policies, Action, PermissionEvaluator, PolicyEngine, Resource, ResourceType,
//!     Subject, UserRole,
//! };
//!
//! let engine = Arc::new(PolicyEngine::new(default_policies()).unwrap());
//! let evaluator = PermissionEvaluator::new(engine);
//!
//! let admin = Subject::new("user-admin-001", UserRole::Admin);
//! let report = Resource::new(ResourceType::Report);
//!
//! let decision = evaluator.can(Some(&admin), Action::Delete, &report, None);
//! assert!(decision.allowed());
//! assert_eq!(decision.matched_policies(), ["admin-full-access"]);
//! ```

pub mod abac;
pub mod ability;
pub mod clock;
pub mod context;
pub mod error;
pub mod identity;

pub use ability::{Ability, AbilityAction, Permission, PermissionGuard};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{AuthSession, AuthorizationContext};
pub use error::{PolicyError, Result};
pub use identity::Identity;
