// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! Loaded from JSON. Every field is optional; missing fields take the built-in defaults
//! shipped in `data/replay_config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::filter::FilterConfig;
use crate::resolver::ResolveOrder;

/// Built-in configuration, identical to [`ReplayConfig::default`].
pub const BUILTIN_REPLAY_CONFIG: &str = include_str!("data/replay_config.json");

/// Environment variable naming a config file that [`load_from_env`] should read.
pub const CONFIG_PATH_ENV: &str = "TREMOR_REPLAY_CONFIG";

/// Deepest quadtree accepted by [`ReplayConfig::validate`].
pub const MAX_INDEX_DEPTH: u32 = 64;

/// Root configuration for a [`ReplayEngine`](crate::ReplayEngine).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Wall time per clock tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// Spatial index tuning.
    pub index: IndexSettings,
    /// Initial filter.
    pub filter: FilterSettings,
    /// Which narrowing step the resolver runs first.
    pub resolve_order: ResolveOrder,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            index: IndexSettings::default(),
            filter: FilterSettings::default(),
            resolve_order: ResolveOrder::Auto,
        }
    }
}

/// Quadtree tuning.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSettings {
    /// Points a leaf holds before it splits.
    pub leaf_capacity: usize,
    /// Depth at which leaves stop splitting regardless of occupancy.
    pub max_depth: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            leaf_capacity: 16,
            max_depth: 16,
        }
    }
}

/// Serializable part of the initial filter. Regions are code, so they are set on the engine.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    /// Minimum magnitude (inclusive).
    pub min_magnitude: f64,
    /// Only keep events shallower than [`SHALLOW_DEPTH_KM`](crate::filter::SHALLOW_DEPTH_KM).
    pub shallow_only: bool,
}

impl FilterSettings {
    /// The filter these settings describe, without a region.
    pub fn to_filter(&self) -> FilterConfig {
        FilterConfig {
            min_magnitude: self.min_magnitude,
            shallow_only: self.shallow_only,
            region: None,
        }
    }
}

impl ReplayConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be greater than zero");
        }
        if self.index.leaf_capacity == 0 {
            return invalid("index.leaf_capacity must be greater than zero");
        }
        if self.index.max_depth > MAX_INDEX_DEPTH {
            return invalid("index.max_depth must not exceed 64");
        }
        if !self.filter.min_magnitude.is_finite() {
            return invalid("filter.min_magnitude must be finite");
        }
        Ok(())
    }

    /// Tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Load the file named by [`CONFIG_PATH_ENV`], falling back to the defaults.
///
/// Returns the config and the path it came from (`None` for the defaults). A file that
/// cannot be loaded is logged and skipped.
pub fn load_from_env() -> (ReplayConfig, Option<PathBuf>) {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from) {
        match ReplayConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "tremor::config",
                    path = %path.display(),
                    "replay_config.loaded=file"
                );
                return (config, Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "tremor::config",
                    path = %path.display(),
                    error = %err,
                    "replay_config.load_failed"
                );
            }
        }
    }
    tracing::info!(target: "tremor::config", "replay_config.loaded=builtin");
    (ReplayConfig::default(), None)
}
