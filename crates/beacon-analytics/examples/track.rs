// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Minimal end-to-end walkthrough against a no-op engine.
//!
//! Run with: cargo run --example track

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use beacon_analytics::{
	AnalyticsClient, EngineInitOptions, EngineRegistry, InitializeOptions, NoOpEngine, Properties,
	Result, SharedEngine,
};

/// Registry that hands out no-op instances, one per token.
struct NoOpRegistry {
	engines: Mutex<HashMap<String, SharedEngine>>,
}

#[async_trait]
impl EngineRegistry for NoOpRegistry {
	async fn initialize_instance(&self, token: &str, options: EngineInitOptions) -> Result<()> {
		println!(
			"initialize {token}: automatic_events={} super_properties={}",
			options.track_automatic_events,
			options.super_properties.len()
		);
		self.engines
			.lock()
			.await
			.insert(token.to_string(), Arc::new(NoOpEngine));
		Ok(())
	}

	async fn resolve(&self, token: &str) -> Option<SharedEngine> {
		self.engines.lock().await.get(token).cloned()
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let registry = Arc::new(NoOpRegistry {
		engines: Mutex::new(HashMap::new()),
	});
	let client = Arc::new(AnalyticsClient::new(registry));

	// Track before initialize completes; the gate holds the command until
	// the instance exists.
	let init = {
		let client = client.clone();
		tokio::spawn(async move {
			client
				.initialize(
					"demo-token",
					InitializeOptions::new()
						.with_super_properties(Properties::new().insert("app", "demo")),
				)
				.await
		})
	};

	client
		.track(
			"Signup",
			Some(
				Properties::new()
					.insert("plan", "pro")
					.insert("seats", 5i64)
					.insert("ratio", f64::NAN),
			),
		)
		.await?;
	init.await.expect("initialize task panicked")?;

	client.identify("user_42").await?;
	println!("distinct id: {:?}", client.distinct_id().await?);
	client.flush().await?;

	Ok(())
}
