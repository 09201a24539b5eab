// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wall-clock abstraction for environment attributes.
//!
//! Business-hours and request timestamps are derived from "now" on every
//! evaluation. Routing that through [`Clock`] lets tests pin the time.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of the current local time.
pub trait Clock: Send + Sync + fmt::Debug {
	/// Returns the current time in the clock's local offset.
	fn now(&self) -> DateTime<FixedOffset>;

	/// Returns the current time in UTC.
	fn now_utc(&self) -> DateTime<Utc> {
		self.now().with_timezone(&Utc)
	}
}

/// Clock backed by the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<FixedOffset> {
		Local::now().into()
	}
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
	at: DateTime<FixedOffset>,
}

impl FixedClock {
	pub fn new(at: DateTime<FixedOffset>) -> Self {
		Self { at }
	}
}

impl Clock for FixedClock {
	fn now(&self) -> DateTime<FixedOffset> {
		self.at
	}
}
