#![forbid(unsafe_code)]

//! Error types for timing discovery and configuration.

use std::fmt;

// ---------------------------------------------------------------------------
// Timing errors
// ---------------------------------------------------------------------------

/// A computed timing string could not be converted to milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// The value carries a unit other than seconds (e.g. `"300ms"`).
    UnsupportedUnit {
        /// The offending value as read from the target.
        value: String,
        /// The unit that was found.
        unit: String,
    },
    /// The value ends in `s` but its numeric part is not a finite float.
    InvalidNumber {
        /// The offending value as read from the target.
        value: String,
    },
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedUnit { value, unit } => write!(
                f,
                "unsupported unit {unit:?} in {value:?}: only \"s\" (seconds) is supported"
            ),
            Self::InvalidNumber { value } => write!(f, "invalid time value {value:?}"),
        }
    }
}

impl std::error::Error for TimingError {}

/// Which computed property a timing error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingProperty {
    /// `transition-duration`.
    Duration,
    /// `transition-delay`.
    Delay,
}

impl fmt::Display for TimingProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => f.write_str("transition-duration"),
            Self::Delay => f.write_str("transition-delay"),
        }
    }
}

// ---------------------------------------------------------------------------
// Driver errors
// ---------------------------------------------------------------------------

/// Errors surfaced by [`TransitionDriver`](crate::driver::TransitionDriver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The timing probe at `AwaitTransition` entry returned a malformed value.
    Timing {
        /// The property that failed to parse.
        property: TimingProperty,
        /// The underlying parse failure.
        source: TimingError,
    },
}

impl TransitionError {
    /// The underlying timing error.
    #[must_use]
    pub fn timing_error(&self) -> &TimingError {
        match self {
            Self::Timing { source, .. } => source,
        }
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timing { property, source } => write!(f, "failed to read {property}: {source}"),
        }
    }
}

impl std::error::Error for TransitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timing { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// An environment override could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A millisecond variable was not a non-negative integer.
    InvalidMillis {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// The class-name namespace was empty or contained whitespace.
    InvalidName(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMillis { var, value } => {
                write!(f, "{var} must be a whole number of milliseconds, got {value:?}")
            }
            Self::InvalidName(name) => write!(f, "invalid transition name {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
