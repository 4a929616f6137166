//! Two-step confirm gate for destructive actions (progress reset).
//!
//! First command arms the gate; a second command inside the window commits;
//! past the deadline the gate silently disarms. Time is passed in by the
//! caller so the transitions stay deterministic under test. The gate is a
//! caller-side convenience on top of the idempotent progress transforms —
//! it never touches the store itself.

use chrono::{DateTime, Duration, Utc};

/// Internal gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Idle,
    Armed { deadline: DateTime<Utc> },
}

/// What a [`ConfirmGate::press`] call decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Gate armed; a second press before the deadline will commit.
    Armed,
    /// Second press landed in time; the caller should perform the action.
    Committed,
}

/// Explicit `idle -> armed -> (commit | timeout)` state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmGate {
    state: GateState,
    window: Duration,
}

impl ConfirmGate {
    pub fn new(window: Duration) -> Self {
        Self {
            state: GateState::Idle,
            window,
        }
    }

    /// Drive the gate with a press at `now`. A press on an expired armed
    /// gate re-arms rather than committing.
    pub fn press(&mut self, now: DateTime<Utc>) -> ConfirmOutcome {
        match &self.state {
            GateState::Armed { deadline } if now <= *deadline => {
                self.state = GateState::Idle;
                ConfirmOutcome::Committed
            }
            _ => {
                self.state = GateState::Armed {
                    deadline: now + self.window,
                };
                ConfirmOutcome::Armed
            }
        }
    }

    /// Expire a stale armed state. Safe to call on every tick.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let GateState::Armed { deadline } = &self.state {
            if now > *deadline {
                self.state = GateState::Idle;
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, GateState::Armed { .. })
    }

    /// Drop any pending confirmation without committing.
    pub fn cancel(&mut self) {
        self.state = GateState::Idle;
    }
}
