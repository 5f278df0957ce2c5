// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The bridging client: validation, coercion, and activation-gated forwarding.
//!
//! Most of this module is deliberately thin glue. Each operation validates
//! its required arguments, coerces its own property bags, waits for the
//! activation gate, and forwards to the engine instance resolved for the
//! active token. A missing instance resolves to a safe default instead of an
//! error, so telemetry never takes a caller down.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use beacon_analytics_core::{coerce, coerce_properties, Properties, PropertyMap, RawValue};

use crate::engine::{EngineInitOptions, EngineRegistry, SharedEngine};
use crate::error::{Error, Result};
use crate::gate::ActivationGate;

/// Options accepted by [`AnalyticsClient::initialize`].
///
/// Carries the caller's raw super-property bag; coercion happens inside
/// `initialize`, like every other property-bearing call.
#[derive(Debug, Clone)]
pub struct InitializeOptions {
	pub track_automatic_events: bool,
	pub opt_out_tracking_by_default: bool,
	pub super_properties: Option<Properties>,
	pub server_url: Option<String>,
}

impl Default for InitializeOptions {
	fn default() -> Self {
		Self {
			track_automatic_events: true,
			opt_out_tracking_by_default: false,
			super_properties: None,
			server_url: None,
		}
	}
}

impl InitializeOptions {
	/// Creates options with engine defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Disables the engine's built-in lifecycle events.
	pub fn without_automatic_events(mut self) -> Self {
		self.track_automatic_events = false;
		self
	}

	/// Starts the instance opted out of tracking.
	pub fn opt_out_by_default(mut self) -> Self {
		self.opt_out_tracking_by_default = true;
		self
	}

	/// Registers super properties before the first event.
	pub fn with_super_properties(mut self, properties: Properties) -> Self {
		self.super_properties = Some(properties);
		self
	}

	/// Points the instance at a custom ingestion URL.
	pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
		self.server_url = Some(server_url.into());
		self
	}
}

/// Asynchronous bridging client for one analytics engine instance.
///
/// Every operation other than [`initialize`](Self::initialize) waits for the
/// activation gate before forwarding, so commands issued concurrently with
/// or before initialization reach the engine only after the initialize
/// forward call has returned. The gate belongs to this instance; separate
/// clients (for separate tokens) gate independently.
pub struct AnalyticsClient {
	registry: Arc<dyn EngineRegistry>,
	token: RwLock<Option<String>>,
	gate: ActivationGate,
}

impl AnalyticsClient {
	/// Creates a client backed by the given engine registry.
	///
	/// The client starts unactivated: gated operations suspend until the
	/// first [`initialize`](Self::initialize) call completes its forward.
	pub fn new(registry: Arc<dyn EngineRegistry>) -> Self {
		Self {
			registry,
			token: RwLock::new(None),
			gate: ActivationGate::new(),
		}
	}

	/// Creates the engine instance for `token` and opens the activation gate.
	///
	/// The gate opens once the forward call returns, whether or not the
	/// engine accepted it: downstream operations tolerate a half-configured
	/// instance, and holding the gate shut would suspend every queued
	/// caller forever. A later re-initialize forwards again but does not
	/// re-arm the gate.
	pub async fn initialize(&self, token: &str, options: InitializeOptions) -> Result<()> {
		if token.is_empty() {
			return Err(Error::MissingArgument("token"));
		}
		info!(token = %token, "initializing analytics instance");
		*self.token.write().await = Some(token.to_string());

		let InitializeOptions {
			track_automatic_events,
			opt_out_tracking_by_default,
			super_properties,
			server_url,
		} = options;
		let options = EngineInitOptions {
			track_automatic_events,
			opt_out_tracking_by_default,
			super_properties: coerce_properties(super_properties),
			server_url,
		};

		let result = self.registry.initialize_instance(token, options).await;
		self.gate.signal_ready().await;
		result
	}

	/// Resolves the engine for the active token, if any.
	async fn engine(&self) -> Option<SharedEngine> {
		let token = self.token.read().await.clone()?;
		let engine = self.registry.resolve(&token).await;
		if engine.is_none() {
			debug!(token = %token, "no engine instance for token");
		}
		engine
	}

	pub async fn set_server_url(&self, server_url: &str) -> Result<()> {
		if server_url.is_empty() {
			return Err(Error::MissingArgument("server_url"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_server_url(server_url).await,
			None => Ok(()),
		}
	}

	pub async fn set_logging_enabled(&self, enabled: bool) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_logging_enabled(enabled).await,
			None => Ok(()),
		}
	}

	pub async fn set_flush_on_background(&self, flush_on_background: bool) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_flush_on_background(flush_on_background).await,
			None => Ok(()),
		}
	}

	pub async fn set_flush_batch_size(&self, batch_size: u32) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_flush_batch_size(batch_size).await,
			None => Ok(()),
		}
	}

	pub async fn set_use_ip_address_for_geolocation(&self, enabled: bool) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_use_ip_address_for_geolocation(enabled).await,
			None => Ok(()),
		}
	}

	pub async fn opt_out_tracking(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.opt_out_tracking().await,
			None => Ok(()),
		}
	}

	pub async fn opt_in_tracking(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.opt_in_tracking().await,
			None => Ok(()),
		}
	}

	/// Returns false when no instance exists for the active token.
	pub async fn has_opted_out_tracking(&self) -> Result<bool> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.has_opted_out_tracking().await,
			None => Ok(false),
		}
	}

	pub async fn track(&self, event: &str, properties: Option<Properties>) -> Result<()> {
		if event.is_empty() {
			return Err(Error::MissingArgument("event"));
		}
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.track(event, properties).await,
			None => Ok(()),
		}
	}

	/// Starts the timer for `event`; the elapsed time is attached when the
	/// event is eventually tracked.
	pub async fn time_event(&self, event: &str) -> Result<()> {
		if event.is_empty() {
			return Err(Error::MissingArgument("event"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.time_event(event).await,
			None => Ok(()),
		}
	}

	/// Seconds since [`time_event`](Self::time_event) was called for
	/// `event`; zero when no timer or no instance exists.
	pub async fn event_elapsed_time(&self, event: &str) -> Result<f64> {
		if event.is_empty() {
			return Err(Error::MissingArgument("event"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.event_elapsed_time(event).await,
			None => Ok(0.0),
		}
	}

	pub async fn identify(&self, distinct_id: &str) -> Result<()> {
		if distinct_id.is_empty() {
			return Err(Error::MissingArgument("distinct_id"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.identify(distinct_id).await,
			None => Ok(()),
		}
	}

	pub async fn alias(&self, alias: &str, distinct_id: &str) -> Result<()> {
		if alias.is_empty() {
			return Err(Error::MissingArgument("alias"));
		}
		if distinct_id.is_empty() {
			return Err(Error::MissingArgument("distinct_id"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.create_alias(alias, distinct_id).await,
			None => Ok(()),
		}
	}

	pub async fn flush(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.flush().await,
			None => Ok(()),
		}
	}

	pub async fn reset(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.reset().await,
			None => Ok(()),
		}
	}

	/// Returns the empty string when no instance exists.
	pub async fn distinct_id(&self) -> Result<String> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.distinct_id().await,
			None => Ok(String::new()),
		}
	}

	/// The device-scoped anonymous id; empty when no instance exists.
	pub async fn anonymous_id(&self) -> Result<String> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.anonymous_id().await,
			None => Ok(String::new()),
		}
	}

	pub async fn register_super_properties(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.register_super_properties(properties).await,
			None => Ok(()),
		}
	}

	pub async fn register_super_properties_once(
		&self,
		properties: Option<Properties>,
	) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.register_super_properties_once(properties).await,
			None => Ok(()),
		}
	}

	/// Returns an empty map when no instance exists.
	pub async fn super_properties(&self) -> Result<PropertyMap> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.current_super_properties().await,
			None => Ok(PropertyMap::new()),
		}
	}

	pub async fn unregister_super_property(&self, property_name: &str) -> Result<()> {
		if property_name.is_empty() {
			return Err(Error::MissingArgument("property_name"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.unregister_super_property(property_name).await,
			None => Ok(()),
		}
	}

	pub async fn clear_super_properties(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.clear_super_properties().await,
			None => Ok(()),
		}
	}

	pub async fn people_set(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_set(properties).await,
			None => Ok(()),
		}
	}

	pub async fn people_set_once(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_set_once(properties).await,
			None => Ok(()),
		}
	}

	pub async fn people_unset(&self, property_name: &str) -> Result<()> {
		if property_name.is_empty() {
			return Err(Error::MissingArgument("property_name"));
		}
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_unset(vec![property_name.to_string()]).await,
			None => Ok(()),
		}
	}

	pub async fn people_increment(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_increment(properties).await,
			None => Ok(()),
		}
	}

	pub async fn people_append(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_append(properties).await,
			None => Ok(()),
		}
	}

	pub async fn people_remove(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_remove(properties).await,
			None => Ok(()),
		}
	}

	pub async fn people_union(&self, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.people_union(properties).await,
			None => Ok(()),
		}
	}

	pub async fn track_charge(&self, amount: f64, properties: Option<Properties>) -> Result<()> {
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.track_charge(amount, properties).await,
			None => Ok(()),
		}
	}

	pub async fn clear_charges(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.clear_charges().await,
			None => Ok(()),
		}
	}

	pub async fn delete_user(&self) -> Result<()> {
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.delete_user().await,
			None => Ok(()),
		}
	}

	pub async fn track_with_groups(
		&self,
		event: &str,
		properties: Option<Properties>,
		groups: Option<Properties>,
	) -> Result<()> {
		let properties = coerce_properties(properties);
		let groups = coerce_properties(groups);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.track_with_groups(event, properties, groups).await,
			None => Ok(()),
		}
	}

	pub async fn set_group(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.set_group(group_key, group_id).await,
			None => Ok(()),
		}
	}

	pub async fn add_group(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.add_group(group_key, group_id).await,
			None => Ok(()),
		}
	}

	pub async fn remove_group(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.remove_group(group_key, group_id).await,
			None => Ok(()),
		}
	}

	pub async fn delete_group(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.delete_group(group_key, group_id).await,
			None => Ok(()),
		}
	}

	pub async fn group_set(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
		properties: Option<Properties>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.group_set(group_key, group_id, properties).await,
			None => Ok(()),
		}
	}

	pub async fn group_set_once(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
		properties: Option<Properties>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		let group_id = coerce(group_id.into()).into_value();
		let properties = coerce_properties(properties);
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.group_set_once(group_key, group_id, properties).await,
			None => Ok(()),
		}
	}

	pub async fn group_unset(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
		property_name: &str,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		if property_name.is_empty() {
			return Err(Error::MissingArgument("property_name"));
		}
		let group_id = coerce(group_id.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.group_unset(group_key, group_id, property_name).await,
			None => Ok(()),
		}
	}

	pub async fn group_remove(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
		name: &str,
		value: impl Into<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		if name.is_empty() {
			return Err(Error::MissingArgument("name"));
		}
		let group_id = coerce(group_id.into()).into_value();
		let value = coerce(value.into()).into_value();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.group_remove(group_key, group_id, name, value).await,
			None => Ok(()),
		}
	}

	/// Unrepresentable entries in `values` are dropped rather than
	/// forwarded, matching the property-bag top level.
	pub async fn group_union(
		&self,
		group_key: &str,
		group_id: impl Into<RawValue>,
		name: &str,
		values: Vec<RawValue>,
	) -> Result<()> {
		if group_key.is_empty() {
			return Err(Error::MissingArgument("group_key"));
		}
		if name.is_empty() {
			return Err(Error::MissingArgument("name"));
		}
		let group_id = coerce(group_id.into()).into_value();
		let values = values
			.into_iter()
			.filter_map(|value| coerce(value).into_value())
			.collect();
		self.gate.ready().await;
		match self.engine().await {
			Some(engine) => engine.group_union(group_key, group_id, name, values).await,
			None => Ok(()),
		}
	}
}
