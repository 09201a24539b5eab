// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use thiserror::Error;
use warden_auth::PolicyError;
use warden_server_config::ConfigError;

use crate::api_response::ErrorResponse;

/// Errors raised while starting the server or handling a management request.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("policy error: {0}")]
	Policy(#[from] PolicyError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error) = match &self {
			ServerError::Policy(
				PolicyError::InvalidRule(_)
				| PolicyError::UnknownValue { .. }
				| PolicyError::InvalidClearanceLevel(_),
			) => (StatusCode::BAD_REQUEST, "invalid_policy"),
			ServerError::Policy(_) => (StatusCode::INTERNAL_SERVER_ERROR, "policy_error"),
			ServerError::Config(_) | ServerError::Io(_) => {
				(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
			}
		};

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(status, Json(ErrorResponse::new(error, self.to_string()))).into_response()
	}
}
