// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The seam between the bridge and a native analytics engine.
//!
//! The engine performs the actual event buffering, batching, and network
//! delivery; this crate treats it as an opaque service behind
//! [`AnalyticsEngine`]. Instances are scoped to a project token and resolved
//! through an injected [`EngineRegistry`] rather than a hidden global, so
//! the bridge is testable with fakes.
//!
//! Every property-bearing method receives only values that have already
//! passed through coercion ([`PropertyMap`] / [`AnalyticsValue`]).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use beacon_analytics_core::{AnalyticsValue, PropertyMap};

use crate::error::Result;

/// Type alias for a shared engine instance.
pub type SharedEngine = Arc<dyn AnalyticsEngine>;

/// Options forwarded to the engine when an instance is created.
///
/// Defaults mirror the engine's own: automatic events on, opt-out off, no
/// custom ingestion URL.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInitOptions {
	/// Whether the engine should capture its built-in lifecycle events.
	pub track_automatic_events: bool,
	/// Start the instance opted out of tracking.
	pub opt_out_tracking_by_default: bool,
	/// Super properties to register before the first event, already coerced.
	pub super_properties: PropertyMap,
	/// Custom ingestion URL, if any.
	pub server_url: Option<String>,
}

impl Default for EngineInitOptions {
	fn default() -> Self {
		Self {
			track_automatic_events: true,
			opt_out_tracking_by_default: false,
			super_properties: PropertyMap::new(),
			server_url: None,
		}
	}
}

/// A native analytics engine instance, scoped to one project token.
///
/// Implementations are expected to do their own queueing, persistence, and
/// retry; the bridge never retries a forwarded call. Read operations on a
/// not-fully-configured instance should return their zero values rather
/// than fail.
#[async_trait]
pub trait AnalyticsEngine: Send + Sync {
	async fn set_server_url(&self, server_url: &str) -> Result<()>;
	async fn set_logging_enabled(&self, enabled: bool) -> Result<()>;
	async fn set_flush_on_background(&self, flush_on_background: bool) -> Result<()>;
	async fn set_flush_batch_size(&self, batch_size: u32) -> Result<()>;
	async fn set_use_ip_address_for_geolocation(&self, enabled: bool) -> Result<()>;

	async fn opt_out_tracking(&self) -> Result<()>;
	async fn opt_in_tracking(&self) -> Result<()>;
	async fn has_opted_out_tracking(&self) -> Result<bool>;

	async fn track(&self, event: &str, properties: PropertyMap) -> Result<()>;
	async fn time_event(&self, event: &str) -> Result<()>;
	/// Seconds elapsed since `time_event` was called for `event`.
	async fn event_elapsed_time(&self, event: &str) -> Result<f64>;

	async fn identify(&self, distinct_id: &str) -> Result<()>;
	async fn create_alias(&self, alias: &str, distinct_id: &str) -> Result<()>;
	async fn flush(&self) -> Result<()>;
	async fn reset(&self) -> Result<()>;
	async fn distinct_id(&self) -> Result<String>;
	async fn anonymous_id(&self) -> Result<String>;

	async fn register_super_properties(&self, properties: PropertyMap) -> Result<()>;
	async fn register_super_properties_once(&self, properties: PropertyMap) -> Result<()>;
	async fn current_super_properties(&self) -> Result<PropertyMap>;
	async fn unregister_super_property(&self, name: &str) -> Result<()>;
	async fn clear_super_properties(&self) -> Result<()>;

	async fn people_set(&self, properties: PropertyMap) -> Result<()>;
	async fn people_set_once(&self, properties: PropertyMap) -> Result<()>;
	async fn people_unset(&self, names: Vec<String>) -> Result<()>;
	async fn people_increment(&self, properties: PropertyMap) -> Result<()>;
	async fn people_append(&self, properties: PropertyMap) -> Result<()>;
	async fn people_remove(&self, properties: PropertyMap) -> Result<()>;
	async fn people_union(&self, properties: PropertyMap) -> Result<()>;
	async fn track_charge(&self, amount: f64, properties: PropertyMap) -> Result<()>;
	async fn clear_charges(&self) -> Result<()>;
	async fn delete_user(&self) -> Result<()>;

	async fn track_with_groups(
		&self,
		event: &str,
		properties: PropertyMap,
		groups: PropertyMap,
	) -> Result<()>;
	async fn set_group(&self, group_key: &str, group_id: Option<AnalyticsValue>) -> Result<()>;
	async fn add_group(&self, group_key: &str, group_id: Option<AnalyticsValue>) -> Result<()>;
	async fn remove_group(&self, group_key: &str, group_id: Option<AnalyticsValue>) -> Result<()>;
	async fn delete_group(&self, group_key: &str, group_id: Option<AnalyticsValue>) -> Result<()>;
	async fn group_set(
		&self,
		group_key: &str,
		group_id: Option<AnalyticsValue>,
		properties: PropertyMap,
	) -> Result<()>;
	async fn group_set_once(
		&self,
		group_key: &str,
		group_id: Option<AnalyticsValue>,
		properties: PropertyMap,
	) -> Result<()>;
	async fn group_unset(
		&self,
		group_key: &str,
		group_id: Option<AnalyticsValue>,
		property_name: &str,
	) -> Result<()>;
	async fn group_remove(
		&self,
		group_key: &str,
		group_id: Option<AnalyticsValue>,
		name: &str,
		value: Option<AnalyticsValue>,
	) -> Result<()>;
	async fn group_union(
		&self,
		group_key: &str,
		group_id: Option<AnalyticsValue>,
		name: &str,
		values: Vec<AnalyticsValue>,
	) -> Result<()>;
}

/// The injected per-token instance lookup.
///
/// Indexing engines by token is an external concern; the bridge only needs
/// the ability to create an instance and to look one up. A miss is not an
/// error: operations against a never-initialized token resolve to safe
/// defaults at the call site.
#[async_trait]
pub trait EngineRegistry: Send + Sync {
	/// Creates (or reconfigures) the engine instance for `token`.
	async fn initialize_instance(&self, token: &str, options: EngineInitOptions) -> Result<()>;

	/// Looks up the engine instance for `token`, if one exists.
	async fn resolve(&self, token: &str) -> Option<SharedEngine>;
}

/// An engine that discards every command and answers reads with zero values.
///
/// Used to disable analytics without branching at call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEngine;

#[async_trait]
impl AnalyticsEngine for NoOpEngine {
	async fn set_server_url(&self, _server_url: &str) -> Result<()> {
		Ok(())
	}

	async fn set_logging_enabled(&self, _enabled: bool) -> Result<()> {
		Ok(())
	}

	async fn set_flush_on_background(&self, _flush_on_background: bool) -> Result<()> {
		Ok(())
	}

	async fn set_flush_batch_size(&self, _batch_size: u32) -> Result<()> {
		Ok(())
	}

	async fn set_use_ip_address_for_geolocation(&self, _enabled: bool) -> Result<()> {
		Ok(())
	}

	async fn opt_out_tracking(&self) -> Result<()> {
		Ok(())
	}

	async fn opt_in_tracking(&self) -> Result<()> {
		Ok(())
	}

	async fn has_opted_out_tracking(&self) -> Result<bool> {
		Ok(false)
	}

	async fn track(&self, _event: &str, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn time_event(&self, _event: &str) -> Result<()> {
		Ok(())
	}

	async fn event_elapsed_time(&self, _event: &str) -> Result<f64> {
		Ok(0.0)
	}

	async fn identify(&self, _distinct_id: &str) -> Result<()> {
		Ok(())
	}

	async fn create_alias(&self, _alias: &str, _distinct_id: &str) -> Result<()> {
		Ok(())
	}

	async fn flush(&self) -> Result<()> {
		Ok(())
	}

	async fn reset(&self) -> Result<()> {
		Ok(())
	}

	async fn distinct_id(&self) -> Result<String> {
		Ok(String::new())
	}

	async fn anonymous_id(&self) -> Result<String> {
		Ok(String::new())
	}

	async fn register_super_properties(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn register_super_properties_once(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn current_super_properties(&self) -> Result<PropertyMap> {
		Ok(PropertyMap::new())
	}

	async fn unregister_super_property(&self, _name: &str) -> Result<()> {
		Ok(())
	}

	async fn clear_super_properties(&self) -> Result<()> {
		Ok(())
	}

	async fn people_set(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn people_set_once(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn people_unset(&self, _names: Vec<String>) -> Result<()> {
		Ok(())
	}

	async fn people_increment(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn people_append(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn people_remove(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn people_union(&self, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn track_charge(&self, _amount: f64, _properties: PropertyMap) -> Result<()> {
		Ok(())
	}

	async fn clear_charges(&self) -> Result<()> {
		Ok(())
	}

	async fn delete_user(&self) -> Result<()> {
		Ok(())
	}

	async fn track_with_groups(
		&self,
		_event: &str,
		_properties: PropertyMap,
		_groups: PropertyMap,
	) -> Result<()> {
		Ok(())
	}

	async fn set_group(&self, _group_key: &str, _group_id: Option<AnalyticsValue>) -> Result<()> {
		Ok(())
	}

	async fn add_group(&self, _group_key: &str, _group_id: Option<AnalyticsValue>) -> Result<()> {
		Ok(())
	}

	async fn remove_group(&self, _group_key: &str, _group_id: Option<AnalyticsValue>) -> Result<()> {
		Ok(())
	}

	async fn delete_group(&self, _group_key: &str, _group_id: Option<AnalyticsValue>) -> Result<()> {
		Ok(())
	}

	async fn group_set(
		&self,
		_group_key: &str,
		_group_id: Option<AnalyticsValue>,
		_properties: PropertyMap,
	) -> Result<()> {
		Ok(())
	}

	async fn group_set_once(
		&self,
		_group_key: &str,
		_group_id: Option<AnalyticsValue>,
		_properties: PropertyMap,
	) -> Result<()> {
		Ok(())
	}

	async fn group_unset(
		&self,
		_group_key: &str,
		_group_id: Option<AnalyticsValue>,
		_property_name: &str,
	) -> Result<()> {
		Ok(())
	}

	async fn group_remove(
		&self,
		_group_key: &str,
		_group_id: Option<AnalyticsValue>,
		_name: &str,
		_value: Option<AnalyticsValue>,
	) -> Result<()> {
		Ok(())
	}

	async fn group_union(
		&self,
		_group_key: &str,
		_group_id: Option<AnalyticsValue>,
		_name: &str,
		_values: Vec<AnalyticsValue>,
	) -> Result<()> {
		Ok(())
	}
}
