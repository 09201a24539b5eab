// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Warden authorization server.
//!
//! Exposes the policy engine, permission evaluator and capability checks from
//! `warden-auth` over HTTP. Rules live in memory for the lifetime of the
//! process; they are seeded from the built-in set and an optional policy file.

pub mod api;
pub mod api_response;
pub mod error;
pub mod routes;

pub use api::{bind_listener, create_app_state, create_router, load_server_config, AppState};
pub use error::ServerError;
pub use warden_server_config::ServerConfig;
