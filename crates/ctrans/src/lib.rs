#![forbid(unsafe_code)]

//! ctrans public facade crate.
//!
//! Re-exports the transition driver and its collaborators, and offers a
//! prelude plus a single error type for hosts that drive several transitions.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use ctrans_core::classes::{Action, ClassFlags, Phase, class_list, merge_class};
pub use ctrans_core::config::DriverConfig;
pub use ctrans_core::driver::TransitionDriver;
pub use ctrans_core::error::{ConfigError, TimingError, TimingProperty, TransitionError};
pub use ctrans_core::events::TransitionEvent;
pub use ctrans_core::render::{Element, Node};
pub use ctrans_core::target::{RecordingTarget, TransitionTarget};
pub use ctrans_core::timing::{ComputedTiming, MeasuredTiming};

#[cfg(feature = "tracing-json")]
pub use ctrans_core::logging::init_json_logging;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for ctrans hosts.
#[derive(Debug)]
pub enum Error {
    /// A transition could not read its target's timing.
    Transition(TransitionError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transition(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<TransitionError> for Error {
    fn from(err: TransitionError) -> Self {
        Self::Transition(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for ctrans APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a driver from environment configuration.
///
/// # Errors
///
/// [`Error::Config`] when an override is malformed.
pub fn driver_from_env<T: TransitionTarget>(visible: bool) -> Result<TransitionDriver<T>> {
    driver_from_vars(visible, |var| std::env::var(var).ok())
}

/// [`driver_from_env`] over an arbitrary variable source.
///
/// # Errors
///
/// [`Error::Config`] when an override is malformed.
pub fn driver_from_vars<T: TransitionTarget>(
    visible: bool,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TransitionDriver<T>> {
    let config = DriverConfig::try_from_vars(lookup)?;
    Ok(TransitionDriver::try_new(config, visible)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Action, ComputedTiming, DriverConfig, Error, Node, Phase, Result, TransitionDriver,
        TransitionEvent, TransitionTarget,
    };

    pub use crate::core;
}

pub use ctrans_core as core;
