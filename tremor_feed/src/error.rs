// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-level validation errors.

use core::fmt;

/// Numeric column of a raw row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Latitude in degrees.
    Latitude,
    /// Longitude in degrees.
    Longitude,
    /// Magnitude.
    Magnitude,
    /// Depth in kilometres.
    Depth,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Magnitude => "magnitude",
            Self::Depth => "depth",
        })
    }
}

/// Why a raw row was rejected.
///
/// Rejections are local to the row: the store skips it and keeps loading.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RowError {
    /// A numeric field did not parse.
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber {
        /// Offending column.
        field: Field,
        /// Raw text.
        value: String,
    },

    /// A numeric field parsed to NaN or an infinity.
    #[error("{field} is not finite: {value}")]
    NonFinite {
        /// Offending column.
        field: Field,
        /// Parsed value.
        value: f64,
    },

    /// A numeric field is outside the range an event may take.
    #[error("{field} out of range: {value}")]
    OutOfRange {
        /// Offending column.
        field: Field,
        /// Parsed value.
        value: f64,
    },

    /// The date is not in `MM/DD/YYYY` or `MM/DD/YY` form.
    #[error("unparseable date {0:?}")]
    InvalidDate(String),

    /// The time is not in `HH:mm:ss` form.
    #[error("unparseable time {0:?}")]
    InvalidTime(String),

    /// Date and time are well formed but do not name a calendar instant.
    #[error("{date:?} {time:?} is not a valid calendar instant")]
    InvalidInstant {
        /// Raw date text.
        date: String,
        /// Raw time text.
        time: String,
    },
}

impl RowError {
    /// Short, stable label for the kind of rejection (used for counting and logs).
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } => "invalid_number",
            Self::NonFinite { .. } => "non_finite",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidTime(_) => "invalid_time",
            Self::InvalidInstant { .. } => "invalid_instant",
        }
    }
}
