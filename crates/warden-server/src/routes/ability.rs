// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Capability check handler.

use axum::Json;
use serde::{Deserialize, Serialize};
use warden_auth::{Ability, AbilityAction, Permission};

/// Body of `POST /ability/check`: the caller's grants and the capability asked for.
#[derive(Debug, Deserialize)]
pub struct AbilityCheckRequest {
	#[serde(default)]
	pub permissions: Vec<Permission>,
	pub action: AbilityAction,
	pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct AbilityCheckResponse {
	pub allowed: bool,
}

/// POST /ability/check
pub async fn check_ability(Json(request): Json<AbilityCheckRequest>) -> Json<AbilityCheckResponse> {
	let ability = Ability::build(request.permissions);
	Json(AbilityCheckResponse {
		allowed: ability.can(request.action, &request.subject),
	})
}
