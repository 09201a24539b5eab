// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy engine configuration: which rules to install at startup and how the
//! environment attributes are derived.

use std::path::PathBuf;

use serde::Deserialize;

/// Policy configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
	/// Install the built-in rule set at startup.
	pub load_defaults: bool,
	/// JSON file with additional rules, loaded after the defaults.
	pub policy_file: Option<PathBuf>,
	/// First hour (inclusive) of the business-hours window.
	pub business_hours_start: u32,
	/// Last hour (exclusive) of the business-hours window.
	pub business_hours_end: u32,
	/// `isTrustedNetwork` when the caller does not supply it.
	pub trusted_network_default: bool,
}

impl Default for PolicyConfig {
	fn default() -> Self {
		Self {
			load_defaults: true,
			policy_file: None,
			business_hours_start: 9,
			business_hours_end: 17,
			trusted_network_default: true,
		}
	}
}

/// Policy configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfigLayer {
	#[serde(default)]
	pub load_defaults: Option<bool>,
	#[serde(default)]
	pub policy_file: Option<PathBuf>,
	#[serde(default)]
	pub business_hours_start: Option<u32>,
	#[serde(default)]
	pub business_hours_end: Option<u32>,
	#[serde(default)]
	pub trusted_network_default: Option<bool>,
}

impl PolicyConfigLayer {
	pub fn merge(&mut self, other: PolicyConfigLayer) {
		if other.load_defaults.is_some() {
			self.load_defaults = other.load_defaults;
		}
		if other.policy_file.is_some() {
			self.policy_file = other.policy_file;
		}
		if other.business_hours_start.is_some() {
			self.business_hours_start = other.business_hours_start;
		}
		if other.business_hours_end.is_some() {
			self.business_hours_end = other.business_hours_end;
		}
		if other.trusted_network_default.is_some() {
			self.trusted_network_default = other.trusted_network_default;
		}
	}

	pub fn finalize(self) -> PolicyConfig {
		let defaults = PolicyConfig::default();
		PolicyConfig {
			load_defaults: self.load_defaults.unwrap_or(defaults.load_defaults),
			policy_file: self.policy_file,
			business_hours_start: self
				.business_hours_start
				.unwrap_or(defaults.business_hours_start),
			business_hours_end: self
				.business_hours_end
				.unwrap_or(defaults.business_hours_end),
			trusted_network_default: self
				.trusted_network_default
				.unwrap_or(defaults.trusted_network_default),
		}
	}
}
