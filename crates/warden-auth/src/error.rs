// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for policy management.
//!
//! Evaluation itself never fails: missing attributes, type mismatches and
//! unknown operators all resolve to a denial. These errors cover the
//! management surface (registering rules, parsing names, loading files).

use std::path::PathBuf;

use thiserror::Error;

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Errors that can occur while building or registering policies.
#[derive(Debug, Error)]
pub enum PolicyError {
	#[error("unknown {kind}: {value}")]
	UnknownValue { kind: &'static str, value: String },

	#[error("clearance level must be between 1 and 5, got {0}")]
	InvalidClearanceLevel(u64),

	#[error("invalid policy rule: {0}")]
	InvalidRule(String),

	#[error("failed to read policy file {path}: {source}")]
	PolicyFileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse policy file {path}: {source}")]
	PolicyFileParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}
