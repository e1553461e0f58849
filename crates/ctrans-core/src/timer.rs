#![forbid(unsafe_code)]

//! Single-slot step timer.
//!
//! The driver never has more than one scheduled step. [`TimerSlot`] enforces
//! that structurally: arming replaces whatever was pending, and dropping the
//! slot cancels it.
//!
//! # Invariants
//!
//! 1. At most one [`PendingTimer`] exists per slot.
//! 2. [`TimerSlot::arm`] cancels the previous timer before installing the new one.
//! 3. A fired timer is removed from the slot before it is handed back, so it
//!    can fire at most once.
//! 4. Every timer records the cycle and phase that armed it; the owner checks
//!    both before acting on a fire.

use std::time::Duration;

use crate::classes::Phase;

/// A scheduled step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    /// Cycle number at the time of arming.
    pub cycle: u64,
    /// Phase that armed the timer; the fire advances out of this phase.
    pub armed_in: Phase,
    /// Time left until the fire.
    pub remaining: Duration,
}

/// Result of advancing a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nothing armed.
    Empty,
    /// Armed but not yet due.
    Pending,
    /// The timer expired. `overshoot` is the part of the budget left after it.
    Fired {
        /// The timer that fired, already removed from the slot.
        timer: PendingTimer,
        /// Unused time to forward to whatever is armed next.
        overshoot: Duration,
    },
}

/// Holds at most one [`PendingTimer`].
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
}

impl TimerSlot {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Arm a timer, canceling any previous one. Returns the canceled timer.
    pub fn arm(&mut self, cycle: u64, armed_in: Phase, delay: Duration) -> Option<PendingTimer> {
        let previous = self.cancel();
        crate::trace!(
            cycle = cycle,
            phase = %armed_in,
            delay_us = delay.as_micros() as u64,
            "timer armed"
        );
        self.pending = Some(PendingTimer {
            cycle,
            armed_in,
            remaining: delay,
        });
        previous
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self) -> Option<PendingTimer> {
        let previous = self.pending.take();
        #[cfg(feature = "tracing")]
        if let Some(timer) = &previous {
            tracing::trace!(
                cycle = timer.cycle,
                phase = %timer.armed_in,
                "timer canceled"
            );
        }
        previous
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending timer, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingTimer> {
        self.pending.as_ref()
    }

    /// Time until the pending timer fires.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.map(|t| t.remaining)
    }

    /// Spend up to `budget` on the pending timer.
    pub fn advance(&mut self, budget: Duration) -> Advance {
        let Some(timer) = self.pending.as_mut() else {
            return Advance::Empty;
        };
        if timer.remaining <= budget {
            let overshoot = budget - timer.remaining;
            let mut fired = *timer;
            fired.remaining = Duration::ZERO;
            self.pending = None;
            Advance::Fired {
                timer: fired,
                overshoot,
            }
        } else {
            timer.remaining -= budget;
            Advance::Pending
        }
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_1: Duration = Duration::from_millis(1);
    const MS_80: Duration = Duration::from_millis(80);

    #[test]
    fn empty_slot_advances_to_empty() {
        let mut slot = TimerSlot::new();
        assert_eq!(slot.advance(MS_80), Advance::Empty);
        assert_eq!(slot.remaining(), None);
    }

    #[test]
    fn partial_advance_keeps_timer() {
        let mut slot = TimerSlot::new();
        slot.arm(1, Phase::Activate, MS_80);
        assert_eq!(slot.advance(Duration::from_millis(30)), Advance::Pending);
        assert_eq!(slot.remaining(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn fire_reports_overshoot_and_empties_slot() {
        let mut slot = TimerSlot::new();
        slot.arm(3, Phase::Initiate, MS_1);
        match slot.advance(Duration::from_millis(5)) {
            Advance::Fired { timer, overshoot } => {
                assert_eq!(timer.cycle, 3);
                assert_eq!(timer.armed_in, Phase::Initiate);
                assert_eq!(overshoot, Duration::from_millis(4));
            }
            other => panic!("expected fire, got {other:?}"),
        }
        assert!(!slot.is_armed());
        assert_eq!(slot.advance(MS_80), Advance::Empty);
    }

    #[test]
    fn zero_delay_fires_on_zero_budget() {
        let mut slot = TimerSlot::new();
        slot.arm(1, Phase::AwaitTransition, Duration::ZERO);
        assert!(matches!(
            slot.advance(Duration::ZERO),
            Advance::Fired { overshoot, .. } if overshoot == Duration::ZERO
        ));
    }

    #[test]
    fn arm_replaces_previous() {
        let mut slot = TimerSlot::new();
        assert_eq!(slot.arm(1, Phase::Activate, MS_80), None);
        let replaced = slot.arm(2, Phase::Initiate, MS_1).unwrap();
        assert_eq!(replaced.cycle, 1);
        assert_eq!(slot.pending().unwrap().cycle, 2);
        assert_eq!(slot.remaining(), Some(MS_1));
    }

    #[test]
    fn cancel_clears() {
        let mut slot = TimerSlot::new();
        slot.arm(1, Phase::Activate, MS_80);
        assert!(slot.cancel().is_some());
        assert!(slot.cancel().is_none());
        assert!(!slot.is_armed());
    }
}
