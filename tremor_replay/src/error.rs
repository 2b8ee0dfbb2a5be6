// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for engine inputs, configuration and the query worker.

use std::io;
use std::path::PathBuf;

/// A UI input the engine refused. The previous value stays in effect.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The magnitude threshold is NaN or infinite.
    #[error("magnitude threshold must be finite, got {0}")]
    NonFiniteMagnitude(f64),

    /// The viewport bounds are not a usable geographic box.
    #[error("invalid viewport bounds: {reason}")]
    InvalidBounds {
        /// What is wrong with the bounds.
        reason: &'static str,
    },
}

/// Failure to load or validate a [`ReplayConfig`](crate::ReplayConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read replay config from {path:?}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The JSON did not match the config schema.
    #[error("failed to parse replay config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("invalid replay config: {reason}")]
    Invalid {
        /// Which value and why.
        reason: String,
    },
}

/// Failure talking to a [`QueryWorker`](crate::worker::QueryWorker).
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker thread could not be started.
    #[error("failed to spawn query worker: {0}")]
    Spawn(#[source] io::Error),

    /// The worker thread is gone.
    #[error("query worker disconnected")]
    Disconnected,
}
