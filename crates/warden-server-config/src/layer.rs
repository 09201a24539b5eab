// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration assembled from one source.

use serde::Deserialize;

use crate::sections::{HttpConfigLayer, LoggingConfigLayer, PolicyConfigLayer};

/// One source's view of the configuration. Absent sections and fields leave
/// lower-precedence values in place when merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub policy: Option<PolicyConfigLayer>,
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.policy, other.policy, PolicyConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = ServerConfigLayer::default();
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(base.http.and_then(|h| h.port), Some(9000));
	}

	#[test]
	fn test_merge_field_by_field() {
		let mut base: ServerConfigLayer = toml::from_str(
			r#"
			[http]
			host = "0.0.0.0"
			port = 9000

			[policy]
			business_hours_start = 8
			"#,
		)
		.unwrap();

		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9100),
				..Default::default()
			}),
			policy: Some(PolicyConfigLayer::default()),
			..Default::default()
		});

		let http = base.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("0.0.0.0"));
		assert_eq!(http.port, Some(9100));
		assert_eq!(base.policy.unwrap().business_hours_start, Some(8));
	}
}
