// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulation clock: a tick-driven cursor over the event store.
//!
//! ## States
//!
//! ```text
//! Idle ──start──▶ Running ◀──start── Paused
//!                    │  └───pause───▶   ▲
//!                    │                  │ seek(< N)
//!                 tick/seek(N) ──▶ Finished
//! ```
//!
//! The clock knows nothing about wall time. Whoever owns the timer calls [`SimulationClock::tick`];
//! see [`TickDriver`](crate::driver::TickDriver) for converting elapsed time into ticks.

/// Playback state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClockState {
    /// Loaded, never started.
    Idle,
    /// Ticks advance the cursor.
    Running,
    /// Ticks are ignored until the next start.
    Paused,
    /// Cursor reached the end; ticks are ignored.
    Finished,
}

/// Cursor into the event store plus playback state.
///
/// Events at positions `[0, cursor)` are released into the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationClock {
    cursor: usize,
    len: usize,
    state: ClockState,
}

impl SimulationClock {
    /// A clock over `len` events, at position 0.
    ///
    /// With no events there is nothing to play: the clock starts `Finished`.
    pub fn new(len: usize) -> Self {
        Self {
            cursor: 0,
            len,
            state: if len == 0 {
                ClockState::Finished
            } else {
                ClockState::Idle
            },
        }
    }

    /// Current cursor in `[0, len]`.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of events the clock walks over.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there is nothing to play.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current state.
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Whether ticks currently advance the cursor.
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Whether the cursor reached the end.
    pub fn is_finished(&self) -> bool {
        self.state == ClockState::Finished
    }

    /// Start or resume playback. No-op when running or finished.
    pub fn start(&mut self) {
        if matches!(self.state, ClockState::Idle | ClockState::Paused) {
            self.state = ClockState::Running;
        }
    }

    /// Pause playback. No-op unless running.
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// Advance one event if running. Returns whether the cursor moved.
    pub fn tick(&mut self) -> bool {
        if self.state != ClockState::Running || self.cursor >= self.len {
            return false;
        }
        self.cursor += 1;
        if self.cursor == self.len {
            self.state = ClockState::Finished;
        }
        true
    }

    /// Move the cursor to `index`, clamped to `[0, len]`. Returns the new cursor.
    ///
    /// Reaching the end finishes playback. Seeking back from `Finished` pauses; call
    /// [`start`](Self::start) to resume. Other states are kept.
    pub fn seek(&mut self, index: usize) -> usize {
        self.cursor = index.min(self.len);
        if self.cursor == self.len {
            self.state = ClockState::Finished;
        } else if self.state == ClockState::Finished {
            self.state = ClockState::Paused;
        }
        self.cursor
    }
}
