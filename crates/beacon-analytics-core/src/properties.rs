// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helper for building property bags.

use std::collections::BTreeMap;

use crate::coerce::RawValue;

/// A builder for the property bag attached to a tracking or profile call.
///
/// A bag is constructed by the caller, consumed once by coercion, and
/// discarded; it has no persistent identity.
///
/// # Example
///
/// ```
/// use beacon_analytics_core::Properties;
///
/// let props = Properties::new()
///     .insert("button_name", "checkout")
///     .insert("price", 99.99)
///     .insert("is_premium", true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	inner: BTreeMap<String, RawValue>,
}

impl Properties {
	/// Creates a new empty bag.
	pub fn new() -> Self {
		Self {
			inner: BTreeMap::new(),
		}
	}

	/// Inserts a key-value pair.
	///
	/// The value can be any type that converts into [`RawValue`], including
	/// strings, numbers, booleans, timestamps, URLs, and nested collections.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<RawValue>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Merges another bag into this one.
	///
	/// If both contain the same key, the value from `other` takes precedence.
	pub fn merge(mut self, other: Properties) -> Self {
		for (k, v) in other.inner {
			self.inner.insert(k, v);
		}
		self
	}

	/// Returns true if the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns the number of properties.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Gets a value by key.
	pub fn get(&self, key: &str) -> Option<&RawValue> {
		self.inner.get(key)
	}
}

impl IntoIterator for Properties {
	type Item = (String, RawValue);
	type IntoIter = std::collections::btree_map::IntoIter<String, RawValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.inner.into_iter()
	}
}

impl From<BTreeMap<String, RawValue>> for Properties {
	fn from(inner: BTreeMap<String, RawValue>) -> Self {
		Self { inner }
	}
}

impl From<serde_json::Value> for Properties {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Object(map) => Self {
				inner: map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect(),
			},
			_ => Self::new(),
		}
	}
}
