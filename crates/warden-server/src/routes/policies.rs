// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy administration handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use tracing::info;
use warden_auth::abac::PolicyRule;

use crate::{api::AppState, error::ServerError};

/// GET /policies
///
/// Rules in evaluation order.
pub async fn list_policies(State(state): State<AppState>) -> Json<Vec<PolicyRule>> {
	Json(state.engine().store().list_rules())
}

/// POST /policies
///
/// Inserts the rule, replacing any rule with the same ID. Responds 201 for a
/// new rule and 200 for a replacement.
pub async fn upsert_policy(
	State(state): State<AppState>,
	Json(rule): Json<PolicyRule>,
) -> Result<impl IntoResponse, ServerError> {
	let replaced = state.engine().store().add_rule(rule.clone())?;
	let status = if replaced.is_some() {
		info!(rule_id = %rule.id, "policy replaced");
		StatusCode::OK
	} else {
		info!(rule_id = %rule.id, "policy added");
		StatusCode::CREATED
	};
	Ok((status, Json(rule)))
}

/// DELETE /policies/{id}
///
/// Removing an unknown ID is a no-op.
pub async fn delete_policy(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
	if state.engine().store().remove_rule(&id).is_some() {
		info!(rule_id = %id, "policy removed");
	}
	StatusCode::NO_CONTENT
}
