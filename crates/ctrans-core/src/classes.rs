#![forbid(unsafe_code)]

//! Transition direction, phases, and class-name derivation.
//!
//! Every class the driver emits has the form `{name}-{action}-{suffix}`:
//!
//! | Phase             | active | from | to |
//! |-------------------|--------|------|----|
//! | `Idle`            |        |      |    |
//! | `Initiate`        | x      | x    |    |
//! | `Activate`        | x      | x    |    |
//! | `AwaitTransition` | x      |      | x  |
//! | `Settle`          |        |      |    |
//!
//! The flags are never stored independently of the phase; [`ClassFlags::for_phase`]
//! is the only way to obtain them.

use std::fmt;

/// Direction of a transition cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Content is being shown.
    Entering,
    /// Content is being hidden.
    Leaving,
}

impl Action {
    /// `Entering` iff `visible`.
    #[must_use]
    pub const fn from_visible(visible: bool) -> Self {
        if visible {
            Self::Entering
        } else {
            Self::Leaving
        }
    }

    /// The word used in class names: `enter` or `leave`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "enter",
            Self::Leaving => "leave",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No cycle in flight.
    #[default]
    Idle,
    /// `from` classes applied; waiting one frame.
    Initiate,
    /// Content mounted; waiting for `from` styles to apply.
    Activate,
    /// `to` classes applied; waiting for the measured transition.
    AwaitTransition,
    /// Classes cleared; leaves unmount here.
    Settle,
}

impl Phase {
    /// The phase a timer armed in `self` leads to, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Initiate => Some(Self::Activate),
            Self::Activate => Some(Self::AwaitTransition),
            Self::AwaitTransition => Some(Self::Settle),
            Self::Idle | Self::Settle => None,
        }
    }

    /// Whether a cycle is in flight.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Initiate => "initiate",
            Self::Activate => "activate",
            Self::AwaitTransition => "await-transition",
            Self::Settle => "settle",
        };
        f.write_str(s)
    }
}

/// The three class-name gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClassFlags {
    /// `{name}-{action}-active`
    pub active: bool,
    /// `{name}-{action}-from`
    pub from: bool,
    /// `{name}-{action}-to`
    pub to: bool,
}

impl ClassFlags {
    /// No classes.
    pub const NONE: Self = Self {
        active: false,
        from: false,
        to: false,
    };

    /// Flags for a phase. Independent of the action.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Idle | Phase::Settle => Self::NONE,
            Phase::Initiate | Phase::Activate => Self {
                active: true,
                from: true,
                to: false,
            },
            Phase::AwaitTransition => Self {
                active: true,
                from: false,
                to: true,
            },
        }
    }

    /// Whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.active && !self.from && !self.to
    }

    /// Suffixes of the set flags, in `active, from, to` order.
    pub fn suffixes(self) -> impl Iterator<Item = &'static str> {
        [
            (self.active, "active"),
            (self.from, "from"),
            (self.to, "to"),
        ]
        .into_iter()
        .filter_map(|(on, suffix)| on.then_some(suffix))
    }
}

/// Space-joined class list for `(name, action, flags)`; empty when no flag is set.
///
/// ```
/// use ctrans_core::classes::{class_list, Action, ClassFlags, Phase};
///
/// let flags = ClassFlags::for_phase(Phase::Initiate);
/// assert_eq!(
///     class_list("fade", Action::Entering, flags),
///     "fade-enter-active fade-enter-from"
/// );
/// ```
#[must_use]
pub fn class_list(name: &str, action: Action, flags: ClassFlags) -> String {
    let mut out = String::new();
    for suffix in flags.suffixes() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
        out.push('-');
        out.push_str(action.as_str());
        out.push('-');
        out.push_str(suffix);
    }
    out
}

/// Append `derived` to a caller-supplied class attribute with a single space.
#[must_use]
pub fn merge_class(base: &str, derived: &str) -> String {
    let base = base.trim();
    match (base.is_empty(), derived.is_empty()) {
        (true, _) => derived.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base} {derived}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_follows_visibility() {
        assert_eq!(Action::from_visible(true), Action::Entering);
        assert_eq!(Action::from_visible(false), Action::Leaving);
        assert_eq!(Action::Entering.to_string(), "enter");
        assert_eq!(Action::Leaving.to_string(), "leave");
    }

    #[test]
    fn successor_chain_ends_at_settle() {
        let mut phase = Phase::Initiate;
        let mut seen = vec![phase];
        while let Some(next) = phase.successor() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(
            seen,
            vec![
                Phase::Initiate,
                Phase::Activate,
                Phase::AwaitTransition,
                Phase::Settle
            ]
        );
        assert_eq!(Phase::Idle.successor(), None);
    }

    #[test]
    fn idle_and_settle_have_no_flags() {
        assert!(ClassFlags::for_phase(Phase::Idle).is_empty());
        assert!(ClassFlags::for_phase(Phase::Settle).is_empty());
    }

    #[test]
    fn initiate_classes() {
        let flags = ClassFlags::for_phase(Phase::Initiate);
        assert_eq!(
            class_list("default", Action::Leaving, flags),
            "default-leave-active default-leave-from"
        );
    }

    #[test]
    fn await_transition_classes() {
        let flags = ClassFlags::for_phase(Phase::AwaitTransition);
        assert_eq!(
            class_list("slide", Action::Entering, flags),
            "slide-enter-active slide-enter-to"
        );
    }

    #[test]
    fn no_flags_is_empty_string() {
        assert_eq!(class_list("x", Action::Entering, ClassFlags::NONE), "");
    }

    #[test]
    fn suffix_order_is_fixed() {
        let all = ClassFlags {
            active: true,
            from: true,
            to: true,
        };
        assert_eq!(
            all.suffixes().collect::<Vec<_>>(),
            vec!["active", "from", "to"]
        );
    }

    #[test]
    fn merge_class_spacing() {
        assert_eq!(merge_class("", "a-enter-to"), "a-enter-to");
        assert_eq!(merge_class("card", ""), "card");
        assert_eq!(merge_class("card ", "a-enter-to"), "card a-enter-to");
        assert_eq!(merge_class("", ""), "");
    }
}
