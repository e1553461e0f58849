#![forbid(unsafe_code)]

//! Transition events.
//!
//! The driver queues a [`TransitionEvent`] at each milestone of a cycle. The
//! caller polls them with
//! [`drain_events`](crate::driver::TransitionDriver::drain_events), the same
//! way animation milestones are polled instead of registered as closures.
//!
//! # Invariants
//!
//! 1. `CycleStarted` precedes the cycle's `PhaseEntered(Initiate)`.
//! 2. An uninterrupted cycle emits `PhaseEntered` for `Initiate`, `Activate`,
//!    `AwaitTransition`, `Settle`, then `Idle`, in that order.
//! 3. `Mounted` and `Unmounted` fire only when presence actually changes.
//! 4. Draining clears the queue; events are not replayed.

use std::time::Duration;

use crate::classes::{Action, Phase};

/// A milestone in the driver's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEvent {
    /// A visibility edge started a new cycle.
    CycleStarted(Action),
    /// An in-flight cycle was abandoned for a new one.
    Interrupted {
        /// Phase the old cycle was in.
        phase: Phase,
        /// Direction of the old cycle.
        action: Action,
    },
    /// The machine entered a phase.
    PhaseEntered(Phase),
    /// Content became present.
    Mounted,
    /// Content stopped being present.
    Unmounted,
    /// Timing was probed at `AwaitTransition` entry.
    Measured {
        /// Governing duration in milliseconds.
        duration_ms: f64,
        /// Governing delay in milliseconds.
        delay_ms: f64,
        /// The wait scheduled before `Settle`.
        wait: Duration,
    },
    /// A cycle reached `Settle`.
    Settled(Action),
}

/// FIFO of pending events.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventQueue {
    events: Vec<TransitionEvent>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: TransitionEvent) {
        self.events.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<TransitionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}
