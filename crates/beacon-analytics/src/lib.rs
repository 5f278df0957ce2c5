// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beacon analytics bridging client.
//!
//! This crate lets application code issue analytics commands (track events,
//! set user and group properties, manage opt-in state) through a stable,
//! runtime-agnostic API while a native engine performs the actual event
//! buffering, batching, and delivery behind the [`AnalyticsEngine`] trait.
//!
//! Two guarantees hold across the whole surface:
//!
//! - every property bag is coerced into the closed analytics value domain
//!   before it leaves this layer (see `beacon_analytics_core`), and
//! - every command reaches the engine only after initialization has
//!   completed, including commands issued concurrently with or before
//!   `initialize`, without the caller having to await initialization.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use beacon_analytics::{AnalyticsClient, InitializeOptions, Properties};
//!
//! # async fn run(registry: Arc<dyn beacon_analytics::EngineRegistry>) -> beacon_analytics::Result<()> {
//! let client = Arc::new(AnalyticsClient::new(registry));
//!
//! // No need to await initialize before issuing commands; the activation
//! // gate holds them until the engine instance exists.
//! let init = {
//!     let client = client.clone();
//!     tokio::spawn(async move {
//!         client.initialize("YOUR_PROJECT_TOKEN", InitializeOptions::new()).await
//!     })
//! };
//!
//! client
//!     .track("Signup", Some(Properties::new().insert("plan", "pro")))
//!     .await?;
//! init.await.expect("join")?;
//! # Ok(())
//! # }
//! ```

mod client;
mod engine;
mod error;
mod gate;

pub use client::{AnalyticsClient, InitializeOptions};
pub use engine::{AnalyticsEngine, EngineInitOptions, EngineRegistry, NoOpEngine, SharedEngine};
pub use error::{Error, Result};
pub use gate::ActivationGate;

// Re-export core types for convenience
pub use beacon_analytics_core::{
	coerce, coerce_properties, AnalyticsValue, Coerced, Properties, PropertyMap, RawValue,
};
