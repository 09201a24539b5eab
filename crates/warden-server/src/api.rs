// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::path::Path;
use std::sync::Arc;

use axum::{
	routing::{delete, get, post},
	Router,
};
use tokio::net::TcpListener;
use tracing::info;
use warden_auth::abac::{
	default_policies, load_policy_file, BusinessHours, EvaluatorSettings, PermissionEvaluator,
	PolicyEngine,
};
use warden_server_config::{PolicyConfig, ServerConfig};

use crate::{error::ServerError, routes};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub evaluator: Arc<PermissionEvaluator>,
}

impl AppState {
	pub fn new(evaluator: Arc<PermissionEvaluator>) -> Self {
		Self { evaluator }
	}

	pub fn engine(&self) -> &PolicyEngine {
		self.evaluator.engine()
	}
}

/// Loads the layered server configuration.
///
/// `config_path` is read instead of the system config file when given.
pub fn load_server_config(config_path: Option<&Path>) -> Result<ServerConfig, ServerError> {
	let config = match config_path {
		Some(path) => warden_server_config::load_config_with_file(path)?,
		None => warden_server_config::load_config()?,
	};
	Ok(config)
}

/// Binds the listening socket for `config.http`.
pub async fn bind_listener(config: &ServerConfig) -> Result<TcpListener, ServerError> {
	let addr = config.socket_addr();
	let listener = TcpListener::bind(&addr).await?;
	info!(%addr, "listening");
	Ok(listener)
}

/// Builds the policy engine and evaluator described by `config`.
///
/// The built-in rules are installed first (when enabled), then the policy file
/// is loaded on top; a file rule with a built-in ID replaces the built-in one.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let engine = build_engine(&config.policy)?;
	let settings = EvaluatorSettings {
		business_hours: BusinessHours::new(
			config.policy.business_hours_start,
			config.policy.business_hours_end,
		),
		trusted_network_default: config.policy.trusted_network_default,
	};

	let evaluator = PermissionEvaluator::new(Arc::new(engine)).with_settings(settings);
	info!(
		policies = evaluator.engine().store().len(),
		"policy engine ready"
	);

	Ok(AppState::new(Arc::new(evaluator)))
}

fn build_engine(policy: &PolicyConfig) -> Result<PolicyEngine, ServerError> {
	let engine = PolicyEngine::empty();

	if policy.load_defaults {
		engine.store().add_rules(default_policies())?;
	}

	if let Some(path) = &policy.policy_file {
		let rules = load_policy_file(path)?;
		let replaced = engine.store().add_rules(rules)?;
		if replaced > 0 {
			info!(replaced, "policy file replaced built-in rules");
		}
	}

	Ok(engine)
}

/// Creates the HTTP router.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/authorize", post(routes::authorize::authorize))
		.route("/authorize/batch", post(routes::authorize::authorize_batch))
		.route(
			"/policies",
			get(routes::policies::list_policies).post(routes::policies::upsert_policy),
		)
		.route("/policies/{id}", delete(routes::policies::delete_policy))
		.route("/ability/check", post(routes::ability::check_ability))
		.with_state(state)
}
