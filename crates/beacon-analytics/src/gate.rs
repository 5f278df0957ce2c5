// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-shot activation latch gating commands on initialization.
//!
//! Every operation other than `initialize` waits on the gate before its
//! forward call, so commands issued concurrently with (or before)
//! initialization reach the native engine only after the initialize forward
//! call has returned. The gate never resets for the lifetime of its owner.

use tokio::sync::{oneshot, Mutex};
use tracing::debug;

/// Latch state plus the queue of suspended callers.
///
/// Waiter registration and the Pending -> Ready transition take the same
/// lock, so a waiter registered concurrently with the signal is either
/// released during the transition or observes Ready and never suspends.
enum GateState {
	Pending(Vec<oneshot::Sender<()>>),
	Ready,
}

/// A write-once completion signal with a queue of deferred callers.
pub struct ActivationGate {
	state: Mutex<GateState>,
}

impl ActivationGate {
	/// Creates a gate in the unresolved state.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(GateState::Pending(Vec::new())),
		}
	}

	/// Marks initialization complete and releases every suspended caller.
	///
	/// Callers are released in no guaranteed mutual order. A second call is
	/// a no-op; the gate never re-arms.
	pub async fn signal_ready(&self) {
		let mut state = self.state.lock().await;
		match std::mem::replace(&mut *state, GateState::Ready) {
			GateState::Pending(waiters) => {
				debug!(waiters = waiters.len(), "activation gate ready");
				for waiter in waiters {
					// A dropped receiver just means the caller went away.
					let _ = waiter.send(());
				}
			}
			GateState::Ready => {}
		}
	}

	/// Suspends until [`signal_ready`](Self::signal_ready) has fired.
	///
	/// Returns immediately once the gate is resolved; there is no further
	/// suspension for later callers.
	pub async fn ready(&self) {
		let rx = {
			let mut state = self.state.lock().await;
			match &mut *state {
				GateState::Ready => return,
				GateState::Pending(waiters) => {
					let (tx, rx) = oneshot::channel();
					waiters.push(tx);
					rx
				}
			}
		};
		// The sender is consumed inside signal_ready; an Err here can only
		// happen if the gate itself is dropped, in which case the owning
		// client is gone too.
		let _ = rx.await;
	}

	/// Returns true once the gate has resolved.
	pub async fn is_ready(&self) -> bool {
		matches!(*self.state.lock().await, GateState::Ready)
	}
}

impl Default for ActivationGate {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::time::Duration;

	#[tokio::test]
	async fn ready_after_signal_returns_immediately() {
		let gate = ActivationGate::new();
		gate.signal_ready().await;
		assert!(gate.is_ready().await);
		// Must not suspend.
		tokio::time::timeout(Duration::from_millis(10), gate.ready())
			.await
			.expect("ready() suspended after signal");
	}

	#[tokio::test]
	async fn ready_before_signal_suspends() {
		let gate = Arc::new(ActivationGate::new());

		let waiter = {
			let gate = gate.clone();
			tokio::spawn(async move { gate.ready().await })
		};

		// The waiter must still be suspended before the signal fires.
		tokio::time::sleep(Duration::from_millis(20)).await;
		assert!(!waiter.is_finished());

		gate.signal_ready().await;
		tokio::time::timeout(Duration::from_millis(100), waiter)
			.await
			.expect("waiter not released")
			.expect("waiter task failed");
	}

	#[tokio::test]
	async fn all_concurrent_waiters_are_released() {
		let gate = Arc::new(ActivationGate::new());

		let waiters: Vec<_> = (0..8)
			.map(|_| {
				let gate = gate.clone();
				tokio::spawn(async move { gate.ready().await })
			})
			.collect();

		tokio::time::sleep(Duration::from_millis(10)).await;
		gate.signal_ready().await;

		for waiter in waiters {
			tokio::time::timeout(Duration::from_millis(100), waiter)
				.await
				.expect("waiter not released")
				.expect("waiter task failed");
		}
	}

	#[tokio::test]
	async fn second_signal_is_a_noop() {
		let gate = ActivationGate::new();
		gate.signal_ready().await;
		gate.signal_ready().await;
		assert!(gate.is_ready().await);
	}

	#[tokio::test]
	async fn new_gate_is_unresolved() {
		let gate = ActivationGate::new();
		assert!(!gate.is_ready().await);
	}

	#[test]
	fn ready_polls_pending_until_signal() {
		let gate = ActivationGate::new();

		let mut ready = tokio_test::task::spawn(gate.ready());
		tokio_test::assert_pending!(ready.poll());

		tokio_test::block_on(gate.signal_ready());
		assert!(ready.is_woken());
		tokio_test::assert_ready!(ready.poll());
	}
}
