// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw data-source rows and their validation into [`Event`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Field, RowError};
use crate::event::{Event, EventId};

/// Two-digit years below this pivot belong to the 2000s; the rest to the 1900s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 70;

/// One unvalidated row as produced by a data source.
///
/// Field names also accept the capitalised column headers of the usual earthquake CSV
/// exports (`Latitude`, `Date`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Latitude in degrees.
    #[serde(alias = "Latitude")]
    pub latitude: String,
    /// Longitude in degrees.
    #[serde(alias = "Longitude")]
    pub longitude: String,
    /// Magnitude.
    #[serde(alias = "Magnitude")]
    pub magnitude: String,
    /// Depth in kilometres.
    #[serde(alias = "Depth")]
    pub depth: String,
    /// `MM/DD/YYYY` (or `MM/DD/YY`).
    #[serde(alias = "Date")]
    pub date: String,
    /// `HH:mm:ss`, 24-hour clock, UTC.
    #[serde(alias = "Time")]
    pub time: String,
}

impl RawRow {
    /// Build a row from its six text fields.
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        magnitude: impl Into<String>,
        depth: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            magnitude: magnitude.into(),
            depth: depth.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

/// Validate `row` (the `ordinal`-th row of its data source) into an event.
pub fn parse_row(row: &RawRow, ordinal: u64) -> Result<Event, RowError> {
    let latitude = parse_number(Field::Latitude, &row.latitude)?;
    let longitude = parse_number(Field::Longitude, &row.longitude)?;
    let magnitude = parse_number(Field::Magnitude, &row.magnitude)?;
    let depth_km = parse_number(Field::Depth, &row.depth)?;
    let timestamp = parse_instant(&row.date, &row.time)?;
    Event::new(
        EventId::new(timestamp, ordinal),
        latitude,
        longitude,
        magnitude,
        depth_km,
    )
}

fn parse_number(field: Field, raw: &str) -> Result<f64, RowError> {
    let text = raw.trim();
    let value: f64 = text.parse().map_err(|_err| RowError::InvalidNumber {
        field,
        value: raw.to_owned(),
    })?;
    if !value.is_finite() {
        return Err(RowError::NonFinite { field, value });
    }
    Ok(value)
}

/// Combine a `MM/DD/YYYY` date and an `HH:mm:ss` time into a UTC instant.
pub fn parse_instant(date: &str, time: &str) -> Result<DateTime<Utc>, RowError> {
    let (year, month, day) = split_date(date)?;
    let (hour, minute, second) = split_time(time)?;
    let invalid = || RowError::InvalidInstant {
        date: date.to_owned(),
        time: time.to_owned(),
    };
    let d = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let t = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(d, t)))
}

/// Expand a year field: two digits go through the pivot rule, four digits are literal.
pub fn resolve_year(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = raw.parse().ok()?;
    match raw.len() {
        1 | 2 if value < TWO_DIGIT_YEAR_PIVOT => Some(2000 + value),
        1 | 2 => Some(1900 + value),
        4 => Some(value),
        _ => None,
    }
}

fn split_date(raw: &str) -> Result<(i32, u32, u32), RowError> {
    let bad = || RowError::InvalidDate(raw.to_owned());
    let mut parts = raw.trim().split('/');
    let (Some(m), Some(d), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    let month = small_number(m).ok_or_else(bad)?;
    let day = small_number(d).ok_or_else(bad)?;
    let year = resolve_year(y).ok_or_else(bad)?;
    Ok((year, month, day))
}

fn split_time(raw: &str) -> Result<(u32, u32, u32), RowError> {
    let bad = || RowError::InvalidTime(raw.to_owned());
    let mut parts = raw.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    Ok((
        small_number(h).ok_or_else(bad)?,
        small_number(m).ok_or_else(bad)?,
        small_number(s).ok_or_else(bad)?,
    ))
}

/// One or two ASCII digits.
fn small_number(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
