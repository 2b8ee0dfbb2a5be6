// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tremor Replay: chronological playback of an earthquake catalogue, culled to the viewport.
//!
//! The engine replays an [`EventStore`](tremor_feed::EventStore) as if it were a live feed.
//! Every pass it works out which released events are visible, then classifies them against
//! the previous pass so a renderer can animate them:
//!
//! ```text
//!  tick / seek ─┐
//!  filter ──────┼─▶ resolver ─▶ diff ─▶ presence ─▶ Frame { entering, updating, exiting }
//!  viewport ────┘
//! ```
//!
//! - [`clock`]: tick-driven cursor with an `Idle / Running / Paused / Finished` state machine,
//!   plus [`driver`] to turn wall time into ticks.
//! - [`filter`]: magnitude, depth and region predicates.
//! - [`spatial`] and [`viewport`]: quadtree-backed viewport culling, antimeridian aware.
//! - [`resolver`]: the visible set for one combination of cursor, filter and viewport.
//! - [`diff`] and [`presence`]: keyed enter/update/exit classification with two-phase removal.
//! - [`engine`]: the facade tying it together.
//! - [`worker`]: optional off-thread viewport queries.
//! - [`config`]: JSON configuration.
//!
//! # Example
//!
//! ```rust
//! use tremor_feed::RawRow;
//! use tremor_replay::{GeoBounds, ReplayConfig, ReplayEngine};
//!
//! let rows = [
//!     RawRow::new("35.6", "139.7", "6.8", "40", "03/11/11", "05:46:24"),
//!     RawRow::new("-33.4", "-70.6", "8.8", "22.9", "02/27/10", "06:34:11"),
//! ];
//! let (mut engine, _) = ReplayEngine::from_rows(&rows, &ReplayConfig::default()).unwrap();
//!
//! // Only look at the western Pacific.
//! engine.set_viewport(GeoBounds::new(20.0, 50.0, 120.0, 150.0).unwrap());
//! engine.seek(2);
//!
//! let frame = engine.resolve();
//! assert_eq!(frame.entering.len(), 1);
//! assert_eq!(frame.entering[0].event.magnitude(), 6.8);
//! ```

pub mod clock;
pub mod config;
pub mod diff;
pub mod driver;
pub mod engine;
pub mod error;
pub mod filter;
pub mod presence;
pub mod resolver;
pub mod spatial;
pub mod viewport;
pub mod worker;

pub use clock::{ClockState, SimulationClock};
pub use config::{FilterSettings, IndexSettings, ReplayConfig};
pub use diff::{Transitions, diff};
pub use driver::TickDriver;
pub use engine::{ExitingItem, Frame, FrameItem, PlaybackStatus, ReplayEngine};
pub use error::{ConfigError, InputError, WorkerError};
pub use filter::{FilterConfig, Region, SHALLOW_DEPTH_KM, passes};
pub use presence::{ExitTicket, Presence};
pub use resolver::{ResolveInputs, ResolveOrder, VisibleSet, resolve, resolve_hits};
pub use spatial::SpatialIndex;
pub use viewport::{GeoBounds, ViewportTracker};
pub use worker::{QueryReply, QueryRequest, QueryWorker};
