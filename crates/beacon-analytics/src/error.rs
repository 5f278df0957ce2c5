// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics bridge.

use thiserror::Error;

/// Analytics bridge errors.
///
/// Coercion degradations are deliberately not represented here: an
/// unrepresentable property value is dropped, never surfaced as an error.
#[derive(Debug, Error)]
pub enum Error {
	/// A required call argument was absent.
	///
	/// Detected synchronously, before any engine interaction.
	#[error("missing {0} argument")]
	MissingArgument(&'static str),

	/// The native engine rejected a forwarded call.
	///
	/// Opaque to this layer; propagated without interpretation or retry.
	#[error("engine error: {message}")]
	Engine { message: String },
}

impl Error {
	/// Wraps a native engine failure message.
	pub fn engine(message: impl Into<String>) -> Self {
		Error::Engine {
			message: message.into(),
		}
	}
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
