// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tremor Feed: validated earthquake events in chronological order.
//!
//! A data source (CSV reader, JSON fetch, test fixture) hands over [`RawRow`]s of text fields.
//! [`EventStore::from_rows`] validates each row independently, drops the bad ones into a
//! [`LoadReport`], and freezes the rest into a time-sorted, immutable [`EventStore`].
//!
//! - Numeric fields must parse, be finite, and respect the event ranges
//!   (latitude `[-90, 90]`, longitude `[-180, 180]`, non-negative magnitude and depth).
//! - Dates are `MM/DD/YYYY`; two-digit years below 70 map to the 2000s, the rest to the 1900s.
//! - Times are `HH:mm:ss` in UTC.
//! - Each event gets a stable [`EventId`] made of its timestamp and its row ordinal, so
//!   events sharing a timestamp keep distinct identities.
//!
//! # Example
//!
//! ```rust
//! use tremor_feed::{EventStore, RawRow};
//!
//! let rows = vec![
//!     RawRow::new("35.6", "139.7", "6.8", "40", "03/11/11", "05:46:24"),
//!     RawRow::new("oops", "0", "1", "1", "01/01/2000", "00:00:00"),
//!     RawRow::new("-33.4", "-70.6", "8.8", "22.9", "02/27/2010", "06:34:11"),
//! ];
//! let (store, report) = EventStore::from_rows(&rows);
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(report.rejected(), 1);
//! // Chronological: the 2010 event comes first.
//! assert_eq!(store.get(0).map(|e| e.magnitude()), Some(8.8));
//! ```

pub mod error;
pub mod event;
pub mod row;
pub mod store;

pub use error::{Field, RowError};
pub use event::{Event, EventId};
pub use row::{RawRow, parse_instant, parse_row, resolve_year};
pub use store::{EventStore, LoadReport, Rejection};
