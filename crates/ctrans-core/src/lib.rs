#![forbid(unsafe_code)]

//! Core: phased enter/leave class-name transitions timed by computed style.

pub mod classes;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod logging;
pub mod render;
pub mod target;
pub mod timer;
pub mod timing;

pub use classes::{Action, ClassFlags, Phase};
pub use config::DriverConfig;
pub use driver::TransitionDriver;
pub use error::{ConfigError, TimingError, TransitionError};
pub use events::TransitionEvent;
pub use target::{RecordingTarget, TransitionTarget};
pub use timing::{ComputedTiming, MeasuredTiming};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
