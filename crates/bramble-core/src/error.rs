// Copyright 2025 the bramble developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The error taxonomy shared across the engine.
//!
//! Two families exist, matching how they propagate:
//! - [`AssetError`]: synchronous failures returned directly to the caller
//!   (lookup misses, calling an operation at an illegal time).
//! - [`LoadError`]: asynchronous per-item failures during a load pass. These
//!   are collected and surfaced through the pass's completion outcome, never
//!   as a return value at enqueue time.

use std::path::PathBuf;
use thiserror::Error;

/// A synchronous asset-system failure.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The requested key was never loaded. Applied uniformly to all four
    /// asset types.
    #[error("no {kind} asset loaded under key \"{key}\"")]
    NotFound {
        /// Human-readable asset type name, e.g. `"image"`.
        kind: &'static str,
        /// The key that missed.
        key: String,
    },

    /// The operation is only legal while no load pass is in flight.
    #[error("operation not permitted while a load pass is in flight")]
    PassInFlight,

    /// A load pass was started while a previous one had not yet completed.
    #[error("a load pass is already running")]
    PassAlreadyRunning,
}

/// An asynchronous per-item load failure.
///
/// A failed item still counts toward its lane's completion barrier — a pass
/// must always terminate — and the collected errors travel to the caller in
/// the pass outcome.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes could not be fetched from the configured source.
    #[error("failed to fetch \"{}\": {source}", path.display())]
    Fetch {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes were fetched but could not be decoded into the asset type.
    #[error("failed to decode \"{}\": {message}", path.display())]
    Decode {
        /// The path that failed.
        path: PathBuf,
        /// Decoder-specific detail.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_kind_and_key() {
        let err = AssetError::NotFound {
            kind: "image",
            key: "hero".to_string(),
        };
        assert_eq!(err.to_string(), "no image asset loaded under key \"hero\"");
    }

    #[test]
    fn decode_error_names_the_path() {
        let err = LoadError::Decode {
            path: PathBuf::from("a/b.png"),
            message: "truncated".to_string(),
        };
        assert!(err.to_string().contains("a/b.png"));
        assert!(err.to_string().contains("truncated"));
    }
}
