// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization decision handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_auth::abac::{
	Action, AuthorizationDecision, BatchDecision, Environment, PermissionCheck, Resource, Subject,
};

use crate::api::AppState;

/// Body of `POST /authorize`. A missing `subject` is an unauthenticated caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
	#[serde(default)]
	pub subject: Option<Subject>,
	pub action: Action,
	pub resource: Resource,
	#[serde(default)]
	pub environment: Option<Environment>,
}

/// Body of `POST /authorize/batch`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAuthorizeRequest {
	#[serde(default)]
	pub subject: Option<Subject>,
	pub checks: Vec<PermissionCheck>,
	#[serde(default)]
	pub environment: Option<Environment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAuthorizeResponse {
	pub decisions: BatchDecision,
	pub all_allowed: bool,
	pub any_allowed: bool,
}

/// POST /authorize
pub async fn authorize(
	State(state): State<AppState>,
	Json(request): Json<AuthorizeRequest>,
) -> Json<AuthorizationDecision> {
	let decision = state.evaluator.can(
		request.subject.as_ref(),
		request.action,
		&request.resource,
		request.environment.as_ref(),
	);
	debug!(allowed = decision.allowed(), reason = decision.reason(), "authorize");
	Json(decision)
}

/// POST /authorize/batch
pub async fn authorize_batch(
	State(state): State<AppState>,
	Json(request): Json<BatchAuthorizeRequest>,
) -> Json<BatchAuthorizeResponse> {
	let decisions = state.evaluator.can_multiple(
		request.subject.as_ref(),
		&request.checks,
		request.environment.as_ref(),
	);
	Json(BatchAuthorizeResponse {
		all_allowed: decisions.all_allowed(),
		any_allowed: decisions.any_allowed(),
		decisions,
	})
}
