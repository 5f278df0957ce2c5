// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recursive coercion of arbitrary caller data into the analytics value domain.
//!
//! Every property bag crosses [`coerce_properties`] before it is forwarded to
//! a native engine. Coercion is total: unsupported inputs degrade to
//! [`Coerced::Undefined`] instead of erroring, because partial telemetry is
//! preferable to failing the call.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

use crate::properties::Properties;
use crate::value::{AnalyticsValue, Coerced, PropertyMap};

/// The open input domain accepted from callers.
///
/// Modeled as a closed tagged union over the recognized variants so coercion
/// is an exhaustive match: anything a caller hands us that is not one of
/// these shapes arrives as [`RawValue::Opaque`] and coerces to
/// [`Coerced::Undefined`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
	String(String),
	/// A declared boolean. Kept separate from the numeric variants so a
	/// boolean can never be reinterpreted from its numeric value.
	Bool(bool),
	Int(i64),
	UInt(u64),
	/// May be NaN or infinite; coercion degrades non-finite values.
	Float(f64),
	Date(DateTime<Utc>),
	Url(Url),
	Null,
	List(Vec<RawValue>),
	Map(BTreeMap<String, RawValue>),
	/// A value that already satisfies the analytics contract; coercion
	/// passes it through unchanged.
	Analytics(AnalyticsValue),
	/// An unrecognized caller type, identified only by its type name.
	Opaque(&'static str),
}

impl RawValue {
	/// Marks a caller value of type `T` as unrepresentable.
	pub fn opaque<T>() -> Self {
		RawValue::Opaque(std::any::type_name::<T>())
	}
}

impl From<&str> for RawValue {
	fn from(value: &str) -> Self {
		RawValue::String(value.to_string())
	}
}

impl From<String> for RawValue {
	fn from(value: String) -> Self {
		RawValue::String(value)
	}
}

impl From<bool> for RawValue {
	fn from(value: bool) -> Self {
		RawValue::Bool(value)
	}
}

impl From<i32> for RawValue {
	fn from(value: i32) -> Self {
		RawValue::Int(value.into())
	}
}

impl From<i64> for RawValue {
	fn from(value: i64) -> Self {
		RawValue::Int(value)
	}
}

impl From<u32> for RawValue {
	fn from(value: u32) -> Self {
		RawValue::UInt(value.into())
	}
}

impl From<u64> for RawValue {
	fn from(value: u64) -> Self {
		RawValue::UInt(value)
	}
}

impl From<f32> for RawValue {
	fn from(value: f32) -> Self {
		RawValue::Float(value.into())
	}
}

impl From<f64> for RawValue {
	fn from(value: f64) -> Self {
		RawValue::Float(value)
	}
}

impl From<DateTime<Utc>> for RawValue {
	fn from(value: DateTime<Utc>) -> Self {
		RawValue::Date(value)
	}
}

impl From<Url> for RawValue {
	fn from(value: Url) -> Self {
		RawValue::Url(value)
	}
}

impl From<AnalyticsValue> for RawValue {
	fn from(value: AnalyticsValue) -> Self {
		RawValue::Analytics(value)
	}
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(inner) => inner.into(),
			None => RawValue::Null,
		}
	}
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
	fn from(values: Vec<T>) -> Self {
		RawValue::List(values.into_iter().map(Into::into).collect())
	}
}

impl<V: Into<RawValue>> From<BTreeMap<String, V>> for RawValue {
	fn from(map: BTreeMap<String, V>) -> Self {
		RawValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl From<serde_json::Value> for RawValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => RawValue::Null,
			serde_json::Value::Bool(b) => RawValue::Bool(b),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					RawValue::Int(i)
				} else if let Some(u) = n.as_u64() {
					RawValue::UInt(u)
				} else {
					RawValue::Float(n.as_f64().unwrap_or(f64::NAN))
				}
			}
			serde_json::Value::String(s) => RawValue::String(s),
			serde_json::Value::Array(items) => {
				RawValue::List(items.into_iter().map(RawValue::from).collect())
			}
			serde_json::Value::Object(map) => {
				RawValue::Map(map.into_iter().map(|(k, v)| (k, RawValue::from(v))).collect())
			}
		}
	}
}

/// Coerces a single caller value into the analytics value domain.
///
/// Total: never panics and never reports an error. Recursion bottoms out at
/// the scalar variants; lists and maps are coerced element-wise with
/// [`Coerced::Undefined`] placeholders preserved so the shape of the input
/// survives.
pub fn coerce(value: RawValue) -> Coerced {
	match value {
		RawValue::String(s) => Coerced::Value(AnalyticsValue::String(s)),
		RawValue::Bool(b) => Coerced::Value(AnalyticsValue::Bool(b)),
		RawValue::Int(i) => Coerced::Value(AnalyticsValue::Int(i)),
		RawValue::UInt(u) => Coerced::Value(AnalyticsValue::UInt(u)),
		// The target format has no concept of non-finite numbers; degrade to
		// the string representation rather than corrupting downstream
		// aggregation.
		RawValue::Float(f) if !f.is_finite() => {
			Coerced::Value(AnalyticsValue::String(f.to_string()))
		}
		RawValue::Float(f) => Coerced::Value(AnalyticsValue::Double(f)),
		RawValue::Date(date) => Coerced::Value(AnalyticsValue::Date(date)),
		RawValue::Url(url) => Coerced::Value(AnalyticsValue::Url(url)),
		RawValue::Null => Coerced::Value(AnalyticsValue::Null),
		RawValue::List(items) => {
			Coerced::Value(AnalyticsValue::List(items.into_iter().map(coerce).collect()))
		}
		RawValue::Map(map) => Coerced::Value(AnalyticsValue::Map(
			map.into_iter().map(|(k, v)| (k, coerce(v))).collect(),
		)),
		RawValue::Analytics(value) => Coerced::Value(value),
		RawValue::Opaque(type_name) => {
			debug!(type_name, "unrepresentable value");
			Coerced::Undefined
		}
	}
}

/// Coerces a whole property bag, dropping top-level unrepresentable entries.
///
/// An absent bag produces an empty map, never an error. Only the top level
/// drops `Undefined` entries; nested structures keep placeholders per
/// [`coerce`].
pub fn coerce_properties(properties: Option<Properties>) -> PropertyMap {
	let mut out = PropertyMap::new();
	for (key, value) in properties.unwrap_or_default() {
		match coerce(value) {
			Coerced::Value(value) => {
				out.insert(key, value);
			}
			Coerced::Undefined => {
				debug!(key = %key, "dropping unrepresentable property");
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn string_passes_through() {
		assert_eq!(
			coerce("hello".into()),
			Coerced::Value(AnalyticsValue::String("hello".to_string()))
		);
	}

	#[test]
	fn bool_stays_bool_never_number() {
		for b in [true, false] {
			match coerce(b.into()) {
				Coerced::Value(AnalyticsValue::Bool(got)) => assert_eq!(got, b),
				other => panic!("expected Bool, got {other:?}"),
			}
		}
	}

	#[test]
	fn integer_widths_pass_through() {
		assert_eq!(coerce(42i64.into()), Coerced::Value(AnalyticsValue::Int(42)));
		assert_eq!(
			coerce(u64::MAX.into()),
			Coerced::Value(AnalyticsValue::UInt(u64::MAX))
		);
	}

	#[test]
	fn finite_float_passes_through() {
		assert_eq!(
			coerce(1.25f64.into()),
			Coerced::Value(AnalyticsValue::Double(1.25))
		);
	}

	#[test]
	fn non_finite_floats_become_strings() {
		assert_eq!(
			coerce(f64::NAN.into()),
			Coerced::Value(AnalyticsValue::String("NaN".to_string()))
		);
		assert_eq!(
			coerce(f64::INFINITY.into()),
			Coerced::Value(AnalyticsValue::String("inf".to_string()))
		);
		assert_eq!(
			coerce(f64::NEG_INFINITY.into()),
			Coerced::Value(AnalyticsValue::String("-inf".to_string()))
		);
	}

	#[test]
	fn date_passes_through_unstringified() {
		let date = Utc::now();
		assert_eq!(coerce(date.into()), Coerced::Value(AnalyticsValue::Date(date)));
	}

	#[test]
	fn url_passes_through() {
		let url: Url = "https://example.com".parse().unwrap();
		assert_eq!(
			coerce(url.clone().into()),
			Coerced::Value(AnalyticsValue::Url(url))
		);
	}

	#[test]
	fn null_is_representable_not_missing() {
		assert_eq!(coerce(RawValue::Null), Coerced::Value(AnalyticsValue::Null));
		assert_eq!(
			coerce(Option::<bool>::None.into()),
			Coerced::Value(AnalyticsValue::Null)
		);
	}

	#[test]
	fn list_preserves_length_with_placeholders() {
		let input = RawValue::List(vec![
			true.into(),
			RawValue::opaque::<fn()>(),
			"x".into(),
		]);
		match coerce(input) {
			Coerced::Value(AnalyticsValue::List(items)) => {
				assert_eq!(items.len(), 3);
				assert_eq!(items[0], Coerced::Value(AnalyticsValue::Bool(true)));
				assert_eq!(items[1], Coerced::Undefined);
				assert_eq!(
					items[2],
					Coerced::Value(AnalyticsValue::String("x".to_string()))
				);
			}
			other => panic!("expected List, got {other:?}"),
		}
	}

	#[test]
	fn nested_map_keeps_undefined_entries() {
		let mut inner = BTreeMap::new();
		inner.insert("ok".to_string(), RawValue::from(1i64));
		inner.insert("bad".to_string(), RawValue::opaque::<fn()>());
		match coerce(RawValue::Map(inner)) {
			Coerced::Value(AnalyticsValue::Map(map)) => {
				assert_eq!(map.len(), 2);
				assert_eq!(map["ok"], Coerced::Value(AnalyticsValue::Int(1)));
				assert_eq!(map["bad"], Coerced::Undefined);
			}
			other => panic!("expected Map, got {other:?}"),
		}
	}

	#[test]
	fn already_valid_value_is_untouched() {
		let value = AnalyticsValue::List(vec![
			Coerced::Value(AnalyticsValue::Int(1)),
			Coerced::Undefined,
		]);
		assert_eq!(
			coerce(RawValue::Analytics(value.clone())),
			Coerced::Value(value)
		);
	}

	#[test]
	fn opaque_degrades_to_undefined() {
		struct Custom;
		assert_eq!(coerce(RawValue::opaque::<Custom>()), Coerced::Undefined);
	}

	#[test]
	fn property_bag_drops_top_level_undefined_only() {
		let props = Properties::new()
			.insert("valid", 1i64)
			.insert("bad", f64::NAN)
			.insert("dropped", RawValue::opaque::<fn()>())
			.insert(
				"nested",
				RawValue::List(vec![true.into(), f64::NAN.into(), "x".into()]),
			);

		let bag = coerce_properties(Some(props));

		assert_eq!(bag.len(), 3);
		assert_eq!(bag["valid"], AnalyticsValue::Int(1));
		assert_eq!(bag["bad"], AnalyticsValue::String("NaN".to_string()));
		assert!(!bag.contains_key("dropped"));
		assert_eq!(
			bag["nested"],
			AnalyticsValue::List(vec![
				Coerced::Value(AnalyticsValue::Bool(true)),
				Coerced::Value(AnalyticsValue::String("NaN".to_string())),
				Coerced::Value(AnalyticsValue::String("x".to_string())),
			])
		);
	}

	#[test]
	fn absent_bag_is_empty_map() {
		assert!(coerce_properties(None).is_empty());
	}

	#[test]
	fn json_numbers_keep_their_width() {
		assert_eq!(
			coerce(serde_json::json!(-3).into()),
			Coerced::Value(AnalyticsValue::Int(-3))
		);
		assert_eq!(
			coerce(serde_json::json!(u64::MAX).into()),
			Coerced::Value(AnalyticsValue::UInt(u64::MAX))
		);
		assert_eq!(
			coerce(serde_json::json!(0.5).into()),
			Coerced::Value(AnalyticsValue::Double(0.5))
		);
	}

	#[test]
	fn json_object_converts_recursively() {
		let raw: RawValue = serde_json::json!({
			"name": "alice",
			"tags": ["a", 1, null],
		})
		.into();

		match coerce(raw) {
			Coerced::Value(AnalyticsValue::Map(map)) => {
				assert_eq!(
					map["name"],
					Coerced::Value(AnalyticsValue::String("alice".to_string()))
				);
				assert_eq!(
					map["tags"],
					Coerced::Value(AnalyticsValue::List(vec![
						Coerced::Value(AnalyticsValue::String("a".to_string())),
						Coerced::Value(AnalyticsValue::Int(1)),
						Coerced::Value(AnalyticsValue::Null),
					]))
				);
			}
			other => panic!("expected Map, got {other:?}"),
		}
	}
}
