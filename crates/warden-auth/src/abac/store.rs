// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory, priority-ordered rule store.
//!
//! Rules are kept sorted by descending priority. Ties keep insertion order, so
//! a rule registered earlier is evaluated earlier among equals. Re-adding a rule
//! with an existing ID replaces the old entry and places the new one as if it
//! were freshly inserted.

use std::cmp::Reverse;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

use super::types::PolicyRule;
use crate::error::Result;

/// Thread-safe ordered set of [`PolicyRule`]s.
///
/// Reads happen on every evaluation; writes (registration, removal) are rare
/// and serialized behind the write lock so evaluators never observe a
/// half-updated list.
#[derive(Debug, Default)]
pub struct PolicyStore {
	rules: RwLock<Vec<PolicyRule>>,
}

impl PolicyStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a rule, returning the rule it replaced if the ID was taken.
	pub fn add_rule(&self, rule: PolicyRule) -> Result<Option<PolicyRule>> {
		rule.validate()?;
		let mut rules = self.rules.write();
		let replaced = insert_sorted(&mut rules, rule);
		Ok(replaced)
	}

	/// Registers several rules atomically.
	///
	/// Every rule is validated before any is inserted; on error the store is
	/// unchanged. Returns the number of rules that replaced an existing ID.
	pub fn add_rules(&self, new_rules: impl IntoIterator<Item = PolicyRule>) -> Result<usize> {
		let new_rules: Vec<PolicyRule> = new_rules.into_iter().collect();
		for rule in &new_rules {
			rule.validate()?;
		}

		let mut rules = self.rules.write();
		let replaced = new_rules
			.into_iter()
			.filter_map(|rule| insert_sorted(&mut rules, rule))
			.count();
		Ok(replaced)
	}

	/// Removes a rule by ID. Absent IDs are a no-op.
	pub fn remove_rule(&self, id: &str) -> Option<PolicyRule> {
		let mut rules = self.rules.write();
		let index = rules.iter().position(|r| r.id == id)?;
		debug!(rule_id = id, "removing policy rule");
		Some(rules.remove(index))
	}

	pub fn get_rule(&self, id: &str) -> Option<PolicyRule> {
		self.rules.read().iter().find(|r| r.id == id).cloned()
	}

	/// Snapshot of the rules in evaluation order.
	pub fn list_rules(&self) -> Vec<PolicyRule> {
		self.rules.read().clone()
	}

	pub fn len(&self) -> usize {
		self.rules.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.read().is_empty()
	}

	pub fn clear(&self) {
		self.rules.write().clear();
	}

	/// Holds the read lock for the duration of one evaluation.
	pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<PolicyRule>> {
		self.rules.read()
	}
}

fn insert_sorted(rules: &mut Vec<PolicyRule>, rule: PolicyRule) -> Option<PolicyRule> {
	let replaced = rules
		.iter()
		.position(|r| r.id == rule.id)
		.map(|index| rules.remove(index));

	debug!(
		rule_id = %rule.id,
		priority = rule.priority,
		replaced = replaced.is_some(),
		"registering policy rule"
	);

	rules.push(rule);
	rules.sort_by_key(|r| Reverse(r.priority));
	replaced
}
