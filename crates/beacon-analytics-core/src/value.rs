// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The closed analytics value domain accepted by native engines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};
use url::Url;

/// A sanitized property bag, ready to be forwarded to a native engine.
///
/// Top-level unrepresentable properties have already been dropped; nested
/// lists and maps may still carry [`Coerced::Undefined`] placeholders.
pub type PropertyMap = BTreeMap<String, AnalyticsValue>;

/// A value in the restricted type domain a native analytics engine accepts.
///
/// This is a closed algebraic type: every value that leaves the bridging
/// layer is one of these variants and nothing else. Inputs that cannot be
/// expressed here degrade to [`Coerced::Undefined`] during coercion rather
/// than erroring.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsValue {
	String(String),
	Bool(bool),
	Int(i64),
	UInt(u64),
	/// Always finite. Non-finite floats are degraded to their string
	/// representation before they can reach this variant.
	Double(f64),
	Date(DateTime<Utc>),
	Url(Url),
	/// An explicit null, distinct from a missing key.
	Null,
	List(Vec<Coerced>),
	Map(BTreeMap<String, Coerced>),
}

/// The result of coercing a single input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
	/// The input was representable.
	Value(AnalyticsValue),
	/// The input could not be represented. At the top level of a property
	/// bag the key is dropped; nested inside a list or map the placeholder
	/// is kept so shape and length survive coercion.
	Undefined,
}

impl Coerced {
	/// Returns true if the input was unrepresentable.
	pub fn is_undefined(&self) -> bool {
		matches!(self, Coerced::Undefined)
	}

	/// Unwraps the representable value, if any.
	pub fn into_value(self) -> Option<AnalyticsValue> {
		match self {
			Coerced::Value(value) => Some(value),
			Coerced::Undefined => None,
		}
	}
}

impl From<AnalyticsValue> for Coerced {
	fn from(value: AnalyticsValue) -> Self {
		Coerced::Value(value)
	}
}

impl Serialize for AnalyticsValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			AnalyticsValue::String(s) => serializer.serialize_str(s),
			AnalyticsValue::Bool(b) => serializer.serialize_bool(*b),
			AnalyticsValue::Int(i) => serializer.serialize_i64(*i),
			AnalyticsValue::UInt(u) => serializer.serialize_u64(*u),
			AnalyticsValue::Double(d) => serializer.serialize_f64(*d),
			AnalyticsValue::Date(date) => serializer.serialize_str(&date.to_rfc3339()),
			AnalyticsValue::Url(url) => serializer.serialize_str(url.as_str()),
			AnalyticsValue::Null => serializer.serialize_unit(),
			AnalyticsValue::List(items) => serializer.collect_seq(items),
			AnalyticsValue::Map(map) => serializer.collect_map(map),
		}
	}
}

impl Serialize for Coerced {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Coerced::Value(value) => value.serialize(serializer),
			// JSON has no undefined; placeholders serialize as null.
			Coerced::Undefined => serializer.serialize_unit(),
		}
	}
}
