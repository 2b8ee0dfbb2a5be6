// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presence ledger: which keys the renderer currently holds a visual for.
//!
//! Removal is two-phase. A key that leaves the visible set is first marked exiting and handed
//! out with an [`ExitTicket`]; the renderer runs its exit animation and then returns the
//! ticket through [`Presence::finalize_removal`]. Until then the key stays in the ledger.
//!
//! If the key comes back before the ticket is returned, the pending removal is cancelled and
//! the key is reported as updating instead of entering. The returned ticket is then stale and
//! is ignored, as is any ticket from an earlier exit of the same key.
//!
//! ```
//! use tremor_replay::presence::Presence;
//! use tremor_replay::diff::Transitions;
//! # use chrono::{TimeZone, Utc};
//! # use tremor_feed::EventId;
//! # let id = EventId::new(Utc.timestamp_opt(0, 0).unwrap(), 0);
//!
//! let mut ledger = Presence::new();
//! ledger.apply(Transitions { entering: vec![id], ..Default::default() });
//!
//! let ticket = ledger.mark_exiting(id).unwrap();
//! let back = ledger.apply(Transitions { entering: vec![id], ..Default::default() });
//! assert_eq!(back.updating, vec![id]);
//! assert!(!ledger.finalize_removal(ticket));
//! assert!(ledger.is_live(id));
//! ```

use std::collections::BTreeMap;

use tremor_feed::EventId;

use crate::diff::Transitions;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Live,
    Exiting(u64),
}

/// Proof that a completion signal belongs to the current exit of a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExitTicket {
    id: EventId,
    generation: u64,
}

impl ExitTicket {
    /// Key being removed.
    pub const fn id(&self) -> EventId {
        self.id
    }
}

/// Ledger of live and exiting keys.
#[derive(Clone, Debug, Default)]
pub struct Presence {
    entries: BTreeMap<EventId, State>,
    next_generation: u64,
}

impl Presence {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys with a visual, live or exiting.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no visuals are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is held and not exiting.
    pub fn is_live(&self, id: EventId) -> bool {
        self.entries.get(&id) == Some(&State::Live)
    }

    /// Whether `id` is waiting for its removal to be finalized.
    pub fn is_exiting(&self, id: EventId) -> bool {
        matches!(self.entries.get(&id), Some(State::Exiting(_)))
    }

    /// The outstanding ticket for `id`, if it is exiting.
    pub fn pending_ticket(&self, id: EventId) -> Option<ExitTicket> {
        match self.entries.get(&id) {
            Some(State::Exiting(generation)) => Some(ExitTicket {
                id,
                generation: *generation,
            }),
            _ => None,
        }
    }

    /// Every outstanding ticket, ascending by key.
    pub fn pending_exits(&self) -> impl Iterator<Item = ExitTicket> + '_ {
        self.entries.iter().filter_map(|(id, s)| match s {
            State::Exiting(generation) => Some(ExitTicket {
                id: *id,
                generation: *generation,
            }),
            State::Live => None,
        })
    }

    /// Move a live key to exiting. Returns `None` when the key is absent or already exiting.
    pub fn mark_exiting(&mut self, id: EventId) -> Option<ExitTicket> {
        let state = self.entries.get_mut(&id)?;
        if *state != State::Live {
            return None;
        }
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        *state = State::Exiting(generation);
        Some(ExitTicket { id, generation })
    }

    /// Drop the key if `ticket` matches its current exit. Returns whether it was removed.
    pub fn finalize_removal(&mut self, ticket: ExitTicket) -> bool {
        if self.entries.get(&ticket.id) == Some(&State::Exiting(ticket.generation)) {
            self.entries.remove(&ticket.id);
            true
        } else {
            tracing::trace!(
                target: "tremor::replay",
                id = %ticket.id,
                "presence.stale_ticket"
            );
            false
        }
    }

    /// Thread a diff through the ledger.
    ///
    /// Entering keys become live; one whose removal is still pending is moved to `updating`.
    /// Exiting keys are marked exiting; use [`pending_ticket`](Self::pending_ticket) to fetch
    /// their tickets. Lists stay in ascending key order.
    pub fn apply(&mut self, transitions: Transitions) -> Transitions {
        let Transitions {
            entering,
            mut updating,
            exiting,
        } = transitions;

        let mut fresh = Vec::with_capacity(entering.len());
        let mut cancelled = 0_usize;
        for id in entering {
            match self.entries.insert(id, State::Live) {
                Some(State::Exiting(_)) => {
                    updating.push(id);
                    cancelled += 1;
                }
                _ => fresh.push(id),
            }
        }
        for id in &updating {
            self.entries.insert(*id, State::Live);
        }
        if cancelled > 0 {
            updating.sort_unstable();
            tracing::debug!(target: "tremor::replay", cancelled, "presence.exit_cancelled");
        }

        let exiting = exiting
            .into_iter()
            .filter(|id| self.mark_exiting(*id).is_some())
            .collect();

        Transitions {
            entering: fresh,
            updating,
            exiting,
        }
    }
}
