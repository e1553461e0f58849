#![forbid(unsafe_code)]

//! The transition state machine.
//!
//! [`TransitionDriver`] turns a show/hide toggle into timed class-name states
//! on one target element:
//!
//! ```text
//! edge ─▶ Initiate ──frame──▶ Activate ──activate──▶ AwaitTransition ──measured──▶ Settle ─▶ Idle
//!         active+from          mount                  active+to, probe             clear, unmount on leave
//! ```
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use ctrans_core::config::DriverConfig;
//! use ctrans_core::driver::TransitionDriver;
//! use ctrans_core::target::RecordingTarget;
//!
//! let target = RecordingTarget::with_timing("0.3s", "0s");
//! let mut driver = TransitionDriver::new(DriverConfig::default().name("fade"), false)
//!     .with_target(target.clone());
//!
//! driver.set_visible(true);
//! assert_eq!(driver.class_name(), "fade-enter-active fade-enter-from");
//!
//! driver.tick(Duration::from_millis(81)).unwrap();
//! assert!(driver.is_present());
//! assert_eq!(driver.class_name(), "fade-enter-active fade-enter-to");
//!
//! driver.tick(Duration::from_millis(300)).unwrap();
//! assert_eq!(driver.class_name(), "");
//! ```
//!
//! # Time
//!
//! The driver owns no clock. The host advances it with
//! [`tick`](TransitionDriver::tick); timers that expire inside one tick fire in
//! order and hand their overshoot to the next timer. A step armed with no time
//! left over fires on the following tick, even a zero-length one.
//! [`time_until_next_step`](TransitionDriver::time_until_next_step) tells the
//! host how long it may sleep.
//!
//! # Invariants
//!
//! 1. At most one timer is pending; every visibility edge cancels it and
//!    restarts at `Initiate`.
//! 2. The class list is always `class_list(name, action, ClassFlags::for_phase(phase))`.
//! 3. Timing is probed exactly once per cycle, on `AwaitTransition` entry.
//! 4. A timer only advances the machine if its cycle and phase are current.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No target attached | Timing probes as zero; cycle completes |
//! | Last rendered child is text | Target not probed; timing is zero |
//! | Empty computed timing | Treated as zero |
//! | Unit other than `s` | `tick` returns [`TransitionError`]; machine parks in `AwaitTransition` until the next edge |
//! | Edge mid-cycle | Old timer canceled; presence left as is until the new cycle decides |

use std::time::Duration;

use crate::classes::{Action, ClassFlags, Phase, class_list};
use crate::config::{DriverConfig, validate_name};
use crate::error::{ConfigError, TransitionError};
use crate::events::{EventQueue, TransitionEvent};
use crate::target::TransitionTarget;
use crate::timer::{Advance, PendingTimer, TimerSlot};
use crate::timing::MeasuredTiming;

/// Phased enter/leave class driver for a single target.
#[derive(Debug)]
pub struct TransitionDriver<T: TransitionTarget = Box<dyn TransitionTarget>> {
    config: DriverConfig,

    /// Last requested visibility.
    visible: bool,

    /// Direction of the current (or last) cycle.
    action: Action,

    phase: Phase,

    /// Whether the wrapped content is mounted.
    present: bool,

    /// Incremented on every edge; stamps timers.
    cycle: u64,

    timer: TimerSlot,

    target: Option<T>,

    /// Cached class list; the target is only written when it changes.
    class_name: String,

    /// Whether the last child passed to `render` can carry computed style.
    /// Until `render` is called the attached target is trusted.
    pub(crate) child_style_bearing: bool,

    /// Timing probed in the current cycle.
    measured: Option<MeasuredTiming>,

    events: EventQueue,
}

impl<T: TransitionTarget> TransitionDriver<T> {
    /// Create a driver. With `visible = true` an enter cycle starts at once.
    ///
    /// `config.name` is taken as given; see [`try_new`](Self::try_new).
    #[must_use]
    pub fn new(config: DriverConfig, visible: bool) -> Self {
        let mut driver = Self {
            config,
            visible,
            action: Action::from_visible(visible),
            phase: Phase::Idle,
            present: false,
            cycle: 0,
            timer: TimerSlot::new(),
            target: None,
            class_name: String::new(),
            child_style_bearing: true,
            measured: None,
            events: EventQueue::default(),
        };
        if visible {
            driver.start_cycle();
        }
        driver
    }

    /// Like [`new`](Self::new), rejecting a namespace that would not form
    /// single class tokens.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidName`] for an empty name or one with whitespace.
    pub fn try_new(config: DriverConfig, visible: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, visible))
    }

    /// Attach the target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: T) -> Self {
        self.attach_target(target);
        self
    }

    /// Attach a target and write the current class list to it. Returns the
    /// previously attached target.
    pub fn attach_target(&mut self, mut target: T) -> Option<T> {
        target.set_class_name(&self.class_name);
        self.target.replace(target)
    }

    /// Detach the target. Later probes see no element and measure zero.
    pub fn detach_target(&mut self) -> Option<T> {
        self.target.take()
    }

    /// The attached target.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Set the desired visibility. Only an edge starts a cycle; returns
    /// whether one was started.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible == self.visible {
            return false;
        }
        self.visible = visible;
        self.start_cycle();
        true
    }

    /// Change the class-name namespace. The class list is re-derived at once.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidName`] for an empty name or one with whitespace;
    /// the current name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        let name = name.into();
        validate_name(&name)?;
        self.config.name = name;
        self.sync_classes();
        Ok(())
    }

    /// Advance time by `dt`, firing every step that falls due.
    ///
    /// # Errors
    ///
    /// [`TransitionError`] if the timing probe on `AwaitTransition` entry
    /// returns a value that cannot be parsed. Remaining time in `dt` is
    /// dropped and the machine stays in `AwaitTransition` with no timer.
    pub fn tick(&mut self, dt: Duration) -> Result<(), TransitionError> {
        let mut budget = dt;
        loop {
            match self.timer.advance(budget) {
                Advance::Empty | Advance::Pending => return Ok(()),
                Advance::Fired { timer, overshoot } => {
                    self.on_timer(timer)?;
                    // Steps armed by this fire wait for the next tick unless
                    // there is time left over to spend on them.
                    if overshoot.is_zero() {
                        return Ok(());
                    }
                    budget = overshoot;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// Whether the wrapped content should be rendered.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// The derived class list for the current phase.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Direction of the current (or last) cycle.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Flags for the current phase.
    #[must_use]
    pub fn class_flags(&self) -> ClassFlags {
        ClassFlags::for_phase(self.phase)
    }

    /// Last requested visibility.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Class-name namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Number of cycles started so far.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Whether no cycle is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.phase.is_in_flight()
    }

    /// Timing probed in the current cycle, once `AwaitTransition` was reached.
    #[must_use]
    pub fn measured(&self) -> Option<MeasuredTiming> {
        self.measured
    }

    /// Time until the pending step fires, if one is scheduled.
    #[must_use]
    pub fn time_until_next_step(&self) -> Option<Duration> {
        self.timer.remaining()
    }

    /// Drain all pending events. Clears the event queue.
    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.events.drain()
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    // -----------------------------------------------------------------------
    // Phase transitions
    // -----------------------------------------------------------------------

    fn start_cycle(&mut self) {
        if self.phase.is_in_flight() {
            crate::debug!(
                cycle = self.cycle,
                phase = %self.phase,
                action = %self.action,
                "transition interrupted"
            );
            self.events.push(TransitionEvent::Interrupted {
                phase: self.phase,
                action: self.action,
            });
        }
        self.timer.cancel();
        self.cycle += 1;
        self.action = Action::from_visible(self.visible);
        self.measured = None;
        self.events.push(TransitionEvent::CycleStarted(self.action));
        self.enter(Phase::Initiate);
        self.timer
            .arm(self.cycle, Phase::Initiate, self.config.frame_delay);
    }

    fn on_timer(&mut self, timer: PendingTimer) -> Result<(), TransitionError> {
        if timer.cycle != self.cycle || timer.armed_in != self.phase {
            crate::warn!(
                timer_cycle = timer.cycle,
                cycle = self.cycle,
                armed_in = %timer.armed_in,
                phase = %self.phase,
                "discarding stale timer"
            );
            return Ok(());
        }
        match timer.armed_in.successor() {
            Some(Phase::Activate) => self.activate(),
            Some(Phase::AwaitTransition) => self.await_transition()?,
            Some(Phase::Settle) => self.settle(),
            _ => {}
        }
        Ok(())
    }

    fn activate(&mut self) {
        self.enter(Phase::Activate);
        self.set_present(true);
        self.timer
            .arm(self.cycle, Phase::Activate, self.config.activate_delay);
    }

    fn await_transition(&mut self) -> Result<(), TransitionError> {
        self.enter(Phase::AwaitTransition);

        // Probe after the `to` classes are written: the measured style must
        // be the one in effect now. A text child has no style to measure.
        let computed = if self.child_style_bearing {
            self.target.as_ref().and_then(|t| t.computed_timing())
        } else {
            crate::debug!(cycle = self.cycle, "child is not style-bearing; timing is zero");
            None
        };
        let measured =
            match MeasuredTiming::from_computed(computed.as_ref(), self.config.fallback_duration) {
                Ok(measured) => measured,
                Err(err) => {
                    crate::warn!(cycle = self.cycle, error = %err, "timing probe failed");
                    return Err(err);
                }
            };
        let wait = measured.wait(self.config.fallback_duration);

        crate::trace!(
            cycle = self.cycle,
            duration_ms = measured.duration_ms,
            delay_ms = measured.delay_ms,
            wait_us = wait.as_micros() as u64,
            "timing measured"
        );
        self.measured = Some(measured);
        self.events.push(TransitionEvent::Measured {
            duration_ms: measured.duration_ms,
            delay_ms: measured.delay_ms,
            wait,
        });
        self.timer.arm(self.cycle, Phase::AwaitTransition, wait);
        Ok(())
    }

    fn settle(&mut self) {
        self.enter(Phase::Settle);
        self.events.push(TransitionEvent::Settled(self.action));
        if self.action == Action::Leaving {
            self.set_present(false);
        }
        self.enter(Phase::Idle);
    }

    fn enter(&mut self, phase: Phase) {
        crate::debug!(cycle = self.cycle, action = %self.action, phase = %phase, "phase entered");
        self.phase = phase;
        self.events.push(TransitionEvent::PhaseEntered(phase));
        self.sync_classes();
    }

    fn set_present(&mut self, present: bool) {
        if self.present == present {
            return;
        }
        self.present = present;
        self.events.push(if present {
            TransitionEvent::Mounted
        } else {
            TransitionEvent::Unmounted
        });
    }

    fn sync_classes(&mut self) {
        let derived = class_list(&self.config.name, self.action, ClassFlags::for_phase(self.phase));
        if derived == self.class_name {
            return;
        }
        self.class_name = derived;
        if let Some(target) = self.target.as_mut() {
            target.set_class_name(&self.class_name);
        }
    }
}
