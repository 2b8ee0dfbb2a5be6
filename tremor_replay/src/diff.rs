// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed diff between two consecutive visible sets.
//!
//! ## Minimal example
//!
//! ```
//! use tremor_replay::diff::diff;
//! use tremor_replay::VisibleSet;
//!
//! let empty = VisibleSet::new();
//! let t = diff(&empty, &empty);
//! assert!(t.is_empty());
//! ```

use core::cmp::Ordering;

use tremor_feed::EventId;

use crate::resolver::VisibleSet;

/// Classification of keys between two passes. Every list is in ascending key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transitions {
    /// In the current set only.
    pub entering: Vec<EventId>,
    /// In both sets.
    pub updating: Vec<EventId>,
    /// In the previous set only.
    pub exiting: Vec<EventId>,
}

impl Transitions {
    /// Whether nothing enters or exits.
    pub fn is_stable(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }

    /// Whether all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.is_stable() && self.updating.is_empty()
    }
}

/// Classify the keys of `previous` and `current`.
///
/// Both sets iterate in ascending key order, so this is a single merge pass.
pub fn diff(previous: &VisibleSet, current: &VisibleSet) -> Transitions {
    let mut out = Transitions::default();
    let mut old = previous.keys().peekable();
    let mut new = current.keys().peekable();
    loop {
        match (old.peek().copied(), new.peek().copied()) {
            (Some(a), Some(b)) => match a.cmp(&b) {
                Ordering::Less => {
                    out.exiting.push(a);
                    old.next();
                }
                Ordering::Greater => {
                    out.entering.push(b);
                    new.next();
                }
                Ordering::Equal => {
                    out.updating.push(a);
                    old.next();
                    new.next();
                }
            },
            (Some(_), None) => {
                out.exiting.extend(old);
                break;
            }
            (None, Some(_)) => {
                out.entering.extend(new);
                break;
            }
            (None, None) => break,
        }
    }
    out
}
