// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analytics value domain for the Beacon analytics bridge.
//!
//! This crate defines the closed set of types a native analytics engine
//! accepts ([`AnalyticsValue`]) and the total, recursive coercion that maps
//! arbitrary caller data into that domain ([`coerce`], [`coerce_properties`]).
//! Unrepresentable inputs degrade to [`Coerced::Undefined`] instead of
//! erroring: at the top level of a property bag the key is silently dropped,
//! while nested lists and maps keep a placeholder so their shape survives.

mod coerce;
mod properties;
mod value;

pub use coerce::{coerce, coerce_properties, RawValue};
pub use properties::Properties;
pub use value::{AnalyticsValue, Coerced, PropertyMap};
