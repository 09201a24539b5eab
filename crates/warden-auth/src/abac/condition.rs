// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Condition evaluation over the flattened request tree.
//!
//! A request is flattened into `{subject, resource, action, environment}` and
//! each [`PolicyCondition`] is a pure test against that tree. Anything that
//! cannot be resolved or compared yields `false`.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use tracing::{trace, warn};

use super::types::{ConditionOperator, PolicyCondition};

/// Prefix marking a condition value as a path into the evaluation tree.
pub const CROSS_REFERENCE_PREFIX: char = '$';

/// Upper bound on distinct `matches` patterns kept compiled.
const PATTERN_CACHE_CAPACITY: usize = 256;

/// Compiled `matches` patterns by source text. Invalid patterns are cached as `None`.
static PATTERNS: LazyLock<Mutex<HashMap<String, Option<Regex>>>> =
	LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns the compiled form of `pattern`, compiling it on first use.
fn compiled_pattern(pattern: &str) -> Option<Regex> {
	if let Some(cached) = PATTERNS.lock().get(pattern) {
		return cached.clone();
	}

	let compiled = match Regex::new(pattern) {
		Ok(re) => Some(re),
		Err(e) => {
			warn!(pattern, error = %e, "invalid pattern in policy condition");
			None
		}
	};

	let mut patterns = PATTERNS.lock();
	if patterns.len() >= PATTERN_CACHE_CAPACITY {
		patterns.clear();
	}
	patterns.insert(pattern.to_string(), compiled.clone());
	compiled
}

/// Walks a dotted path (`resource.metadata.owner`) through nested objects.
///
/// Array nodes are indexed by numeric segments. Returns `None` if any segment
/// is absent or the resolved value is `null`.
pub fn resolve_path<'a>(path: &str, tree: &'a Value) -> Option<&'a Value> {
	if path.is_empty() {
		return None;
	}

	let resolved = path.split('.').try_fold(tree, |node, segment| match node {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	})?;

	(!resolved.is_null()).then_some(resolved)
}

/// Resolves a condition's comparison value.
///
/// Strings starting with `$` are cross-references and are looked up in the
/// tree; everything else is a literal.
pub fn resolve_value<'a>(value: &'a Value, tree: &'a Value) -> Option<&'a Value> {
	match value.as_str().and_then(|s| s.strip_prefix(CROSS_REFERENCE_PREFIX)) {
		Some(path) => resolve_path(path, tree),
		None => Some(value),
	}
}

impl ConditionOperator {
	/// Applies this operator to a resolved field value and comparison value.
	pub fn evaluate(&self, actual: &Value, expected: &Value) -> bool {
		match self {
			ConditionOperator::Equals => values_equal(actual, expected),
			ConditionOperator::NotEquals => !values_equal(actual, expected),
			ConditionOperator::In => expected
				.as_array()
				.is_some_and(|values| values.iter().any(|v| values_equal(actual, v))),
			ConditionOperator::NotIn => expected
				.as_array()
				.is_some_and(|values| !values.iter().any(|v| values_equal(actual, v))),
			ConditionOperator::GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
			ConditionOperator::LessThan => compare_numbers(actual, expected, |a, b| a < b),
			ConditionOperator::Contains => match (actual.as_str(), expected.as_str()) {
				(Some(haystack), Some(needle)) => haystack.contains(needle),
				_ => false,
			},
			ConditionOperator::Matches => match (actual.as_str(), expected.as_str()) {
				(Some(text), Some(pattern)) => {
					compiled_pattern(pattern).is_some_and(|re| re.is_match(text))
				}
				_ => false,
			},
			ConditionOperator::Unknown => {
				warn!("unknown operator in policy condition");
				false
			}
		}
	}
}

/// Strict equality, treating numerically equal JSON numbers as equal.
fn values_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
		_ => a == b,
	}
}

fn compare_numbers<F>(actual: &Value, expected: &Value, cmp: F) -> bool
where
	F: Fn(f64, f64) -> bool,
{
	match (actual, expected) {
		(Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
			(Some(a), Some(b)) => cmp(a, b),
			_ => false,
		},
		_ => false,
	}
}

/// Evaluates one condition against the evaluation tree.
pub fn evaluate_condition(condition: &PolicyCondition, tree: &Value) -> bool {
	let Some(actual) = resolve_path(&condition.field, tree) else {
		trace!(field = %condition.field, "condition field undefined");
		return false;
	};

	let Some(expected) = resolve_value(&condition.value, tree) else {
		trace!(field = %condition.field, value = %condition.value, "cross-reference undefined");
		return false;
	};

	let result = condition.operator.evaluate(actual, expected);
	trace!(
		field = %condition.field,
		operator = ?condition.operator,
		result,
		"condition evaluated"
	);
	result
}

/// Evaluates all conditions (AND logic). An empty list holds.
pub fn evaluate_conditions(conditions: &[PolicyCondition], tree: &Value) -> bool {
	conditions
		.iter()
		.all(|condition| evaluate_condition(condition, tree))
}
