#![forbid(unsafe_code)]

//! Driver configuration.
//!
//! The two fixed delays are empirical: the frame delay only has to outlast one
//! paint so the `from` classes register, and the activate delay gives the
//! `from` styles time to apply before they are swapped for `to`. Tune them per
//! rendering environment.
//!
//! # Environment
//!
//! [`DriverConfig::from_env`] applies these overrides on top of the defaults:
//!
//! | Variable                      | Field               |
//! |-------------------------------|---------------------|
//! | `CTRANS_NAME`                 | `name`              |
//! | `CTRANS_FRAME_DELAY_MS`       | `frame_delay`       |
//! | `CTRANS_ACTIVATE_DELAY_MS`    | `activate_delay`    |
//! | `CTRANS_FALLBACK_DURATION_MS` | `fallback_duration` |

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Default class-name namespace.
pub const DEFAULT_NAME: &str = "default";
/// Default delay between `Initiate` and `Activate`.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(1);
/// Default delay between `Activate` and `AwaitTransition`.
pub const DEFAULT_ACTIVATE_DELAY: Duration = Duration::from_millis(80);

const ENV_NAME: &str = "CTRANS_NAME";
const ENV_FRAME_DELAY: &str = "CTRANS_FRAME_DELAY_MS";
const ENV_ACTIVATE_DELAY: &str = "CTRANS_ACTIVATE_DELAY_MS";
const ENV_FALLBACK_DURATION: &str = "CTRANS_FALLBACK_DURATION_MS";

/// Configuration for a [`TransitionDriver`](crate::driver::TransitionDriver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Class-name namespace: classes are `{name}-{enter|leave}-{active|from|to}`.
    /// Default: `"default"`
    pub name: String,

    /// Delay from `Initiate` to `Activate`.
    /// Default: 1ms
    pub frame_delay: Duration,

    /// Delay from `Activate` to `AwaitTransition`.
    /// Default: 80ms
    pub activate_delay: Duration,

    /// Duration used when the measured transition duration is zero.
    /// Default: 0ms
    pub fallback_duration: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            frame_delay: DEFAULT_FRAME_DELAY,
            activate_delay: DEFAULT_ACTIVATE_DELAY,
            fallback_duration: Duration::ZERO,
        }
    }
}

impl DriverConfig {
    /// Set the class-name namespace.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the `Initiate` → `Activate` delay.
    #[must_use]
    pub fn frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Set the `Activate` → `AwaitTransition` delay.
    #[must_use]
    pub fn activate_delay(mut self, delay: Duration) -> Self {
        self.activate_delay = delay;
        self
    }

    /// Set the duration used when the measured duration is zero.
    #[must_use]
    pub fn fallback_duration(mut self, duration: Duration) -> Self {
        self.fallback_duration = duration;
        self
    }

    /// Check that `name` forms single class tokens. The builders accept
    /// any name; call this (or use [`TransitionDriver::try_new`]) when the
    /// name comes from outside.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidName`] for an empty name or one with whitespace.
    ///
    /// [`TransitionDriver::try_new`]: crate::driver::TransitionDriver::try_new
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_name(&self.name)
    }

    /// Defaults with environment overrides. Malformed variables are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|var| env::var(var).ok())
    }

    /// Defaults with environment overrides, rejecting malformed variables.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for the first variable that cannot be applied.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_vars(|var| env::var(var).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            if validate_name(&name).is_ok() {
                config.name = name;
            }
        }
        if let Ok(Some(d)) = read_millis(&lookup, ENV_FRAME_DELAY) {
            config.frame_delay = d;
        }
        if let Ok(Some(d)) = read_millis(&lookup, ENV_ACTIVATE_DELAY) {
            config.activate_delay = d;
        }
        if let Ok(Some(d)) = read_millis(&lookup, ENV_FALLBACK_DURATION) {
            config.fallback_duration = d;
        }
        config
    }

    /// [`try_from_env`](Self::try_from_env) over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for the first variable that cannot be applied.
    pub fn try_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            validate_name(&name)?;
            config.name = name;
        }
        if let Some(d) = read_millis(&lookup, ENV_FRAME_DELAY)? {
            config.frame_delay = d;
        }
        if let Some(d) = read_millis(&lookup, ENV_ACTIVATE_DELAY)? {
            config.activate_delay = d;
        }
        if let Some(d) = read_millis(&lookup, ENV_FALLBACK_DURATION)? {
            config.fallback_duration = d;
        }
        Ok(config)
    }
}

/// A namespace must be non-empty and free of whitespace, or the derived
/// class list would split into unrelated classes.
///
/// # Errors
///
/// [`ConfigError::InvalidName`] carrying the rejected name.
pub fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn read_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    lookup(var)
        .map(|raw| parse_millis_var(var, &raw))
        .transpose()
}

fn parse_millis_var(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidMillis {
            var,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.frame_delay, Duration::from_millis(1));
        assert_eq!(config.activate_delay, Duration::from_millis(80));
        assert_eq!(config.fallback_duration, Duration::ZERO);
    }

    #[test]
    fn builder_overrides() {
        let config = DriverConfig::default()
            .name("fade")
            .frame_delay(Duration::from_millis(16))
            .activate_delay(Duration::from_millis(40))
            .fallback_duration(Duration::from_millis(200));
        assert_eq!(config.name, "fade");
        assert_eq!(config.frame_delay, Duration::from_millis(16));
        assert_eq!(config.activate_delay, Duration::from_millis(40));
        assert_eq!(config.fallback_duration, Duration::from_millis(200));
    }

    #[test]
    fn millis_var_parsing() {
        assert_eq!(
            parse_millis_var(ENV_FRAME_DELAY, " 16 "),
            Ok(Duration::from_millis(16))
        );
        assert!(matches!(
            parse_millis_var(ENV_FRAME_DELAY, "-1"),
            Err(ConfigError::InvalidMillis { var, .. }) if var == ENV_FRAME_DELAY
        ));
        assert!(parse_millis_var(ENV_ACTIVATE_DELAY, "80ms").is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("fade").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("two words").is_err());
        assert!(DriverConfig::default().validate().is_ok());
        assert!(DriverConfig::default().name("a\tb").validate().is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn no_vars_gives_defaults() {
        assert_eq!(DriverConfig::from_vars(vars(&[])), DriverConfig::default());
        assert_eq!(DriverConfig::try_from_vars(vars(&[])), Ok(DriverConfig::default()));
    }

    #[test]
    fn vars_override_every_field() {
        let lookup = vars(&[
            (ENV_NAME, "slide"),
            (ENV_FRAME_DELAY, "16"),
            (ENV_ACTIVATE_DELAY, "40"),
            (ENV_FALLBACK_DURATION, "250"),
        ]);
        let config = DriverConfig::try_from_vars(lookup).unwrap();
        assert_eq!(
            config,
            DriverConfig::default()
                .name("slide")
                .frame_delay(Duration::from_millis(16))
                .activate_delay(Duration::from_millis(40))
                .fallback_duration(Duration::from_millis(250))
        );
    }

    #[test]
    fn lenient_load_skips_malformed_vars() {
        let lookup = vars(&[
            (ENV_NAME, "two words"),
            (ENV_FRAME_DELAY, "soon"),
            (ENV_ACTIVATE_DELAY, "40"),
        ]);
        let config = DriverConfig::from_vars(lookup);
        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.frame_delay, DEFAULT_FRAME_DELAY);
        assert_eq!(config.activate_delay, Duration::from_millis(40));
    }

    #[test]
    fn strict_load_reports_first_malformed_var() {
        assert_eq!(
            DriverConfig::try_from_vars(vars(&[(ENV_NAME, "")])),
            Err(ConfigError::InvalidName(String::new()))
        );
        assert_eq!(
            DriverConfig::try_from_vars(vars(&[(ENV_ACTIVATE_DELAY, "80ms")])),
            Err(ConfigError::InvalidMillis {
                var: ENV_ACTIVATE_DELAY,
                value: "80ms".to_string(),
            })
        );
    }
}
