#![forbid(unsafe_code)]

//! Computed transition timing: parsing and the final wait before settling.
//!
//! Computed styles report `transition-duration` and `transition-delay` as
//! seconds strings such as `"0.3s"`, or as comma-separated lists when several
//! properties transition (`"0.3s, 0.5s"`). Only the `s` unit is accepted.
//!
//! # Rules
//!
//! - `"<float>s"` converts to `float * 1000` milliseconds.
//! - A bare `"s"` converts to `0`. Absent or empty values are replaced by a
//!   bare `"s"` before parsing, so a target with no transition settles at once.
//! - Any other unit, including `"ms"`, is [`TimingError::UnsupportedUnit`].
//! - Lists pair duration `i` with delay `i`, repeating the shorter list. The
//!   pair with the longest total governs the wait.
//! - A duration of `0` is replaced by the configured fallback.
//! - The wait never goes below zero, even with negative delays.

use std::time::Duration;

use crate::error::{TimingError, TimingProperty, TransitionError};

/// Value substituted for absent or empty computed timings.
pub const BARE_SECONDS: &str = "s";

/// Convert a single `"<float>s"` value to milliseconds.
///
/// # Errors
///
/// [`TimingError::UnsupportedUnit`] when the unit is not `s`, and
/// [`TimingError::InvalidNumber`] when the numeric part is not a finite float.
pub fn parse_millis(value: &str) -> Result<f64, TimingError> {
    let trimmed = value.trim();
    let Some(number) = trimmed.strip_suffix('s') else {
        return Err(TimingError::UnsupportedUnit {
            value: value.to_string(),
            unit: trailing_unit(trimmed).to_string(),
        });
    };

    // "ms", "ks", ...: the `s` belongs to a longer unit.
    let prefix = trailing_unit(number);
    if !prefix.is_empty() {
        return Err(TimingError::UnsupportedUnit {
            value: value.to_string(),
            unit: format!("{prefix}s"),
        });
    }

    if number.is_empty() {
        return Ok(0.0);
    }

    match number.parse::<f64>() {
        Ok(secs) if secs.is_finite() => Ok(secs * 1000.0),
        _ => Err(TimingError::InvalidNumber {
            value: value.to_string(),
        }),
    }
}

/// Convert a comma-separated computed list to milliseconds, entry by entry.
///
/// # Errors
///
/// The first entry that fails [`parse_millis`].
pub fn parse_millis_list(value: &str) -> Result<Vec<f64>, TimingError> {
    value.split(',').map(parse_millis).collect()
}

/// Trailing run of ASCII letters, i.e. the unit of a CSS time value.
fn trailing_unit(s: &str) -> &str {
    let start = s
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(0, |(i, c)| i + c.len_utf8());
    &s[start..]
}

/// Convert milliseconds to a [`Duration`], clamping negatives to zero.
///
/// Rounded to the microsecond so that `0.3s + 0.1s` is exactly 400ms.
#[must_use]
pub fn millis_to_duration(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_micros((ms * 1000.0).round() as u64)
}

// ---------------------------------------------------------------------------
// ComputedTiming
// ---------------------------------------------------------------------------

/// Raw computed-style strings as read from the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedTiming {
    /// Computed `transition-duration`.
    pub transition_duration: String,
    /// Computed `transition-delay`.
    pub transition_delay: String,
}

impl ComputedTiming {
    /// Build from the two computed strings.
    pub fn new(duration: impl Into<String>, delay: impl Into<String>) -> Self {
        Self {
            transition_duration: duration.into(),
            transition_delay: delay.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// MeasuredTiming
// ---------------------------------------------------------------------------

/// The `(duration, delay)` pair that governs one cycle's final wait.
///
/// Produced once per cycle at `AwaitTransition` entry and never reused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredTiming {
    /// Duration in milliseconds, as measured (before fallback).
    pub duration_ms: f64,
    /// Delay in milliseconds; may be negative.
    pub delay_ms: f64,
}

impl MeasuredTiming {
    /// Zero duration and zero delay.
    pub const ZERO: Self = Self {
        duration_ms: 0.0,
        delay_ms: 0.0,
    };

    /// Parse a probe result. `None` (no element to query) behaves like two
    /// bare `"s"` values.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Timing`] naming the property that failed to parse.
    pub fn from_computed(
        computed: Option<&ComputedTiming>,
        fallback: Duration,
    ) -> Result<Self, TransitionError> {
        let (duration, delay) = match computed {
            Some(c) => (
                non_empty_or_bare(&c.transition_duration),
                non_empty_or_bare(&c.transition_delay),
            ),
            None => (BARE_SECONDS, BARE_SECONDS),
        };

        let durations = parse_millis_list(duration).map_err(|source| TransitionError::Timing {
            property: TimingProperty::Duration,
            source,
        })?;
        let delays = parse_millis_list(delay).map_err(|source| TransitionError::Timing {
            property: TimingProperty::Delay,
            source,
        })?;

        Ok(Self::governing_pair(&durations, &delays, fallback))
    }

    fn governing_pair(durations: &[f64], delays: &[f64], fallback: Duration) -> Self {
        let pairs = durations.len().max(delays.len());
        let mut best = Self::ZERO;
        let mut best_total = f64::NEG_INFINITY;
        for i in 0..pairs {
            let candidate = Self {
                duration_ms: durations[i % durations.len()],
                delay_ms: delays[i % delays.len()],
            };
            let total = candidate.total_ms(fallback);
            if total > best_total {
                best = candidate;
                best_total = total;
            }
        }
        best
    }

    fn total_ms(&self, fallback: Duration) -> f64 {
        let duration = if self.duration_ms == 0.0 {
            fallback.as_secs_f64() * 1000.0
        } else {
            self.duration_ms
        };
        duration + self.delay_ms
    }

    /// Time to wait before `Settle`: the duration (or `fallback` when it is
    /// zero) plus the delay, never negative.
    #[must_use]
    pub fn wait(&self, fallback: Duration) -> Duration {
        millis_to_duration(self.total_ms(fallback))
    }
}

fn non_empty_or_bare(value: &str) -> &str {
    if value.trim().is_empty() {
        BARE_SECONDS
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_400: Duration = Duration::from_millis(400);

    // ---- parse_millis ----

    #[test]
    fn seconds_convert_to_millis() {
        assert_eq!(parse_millis("0.3s"), Ok(300.0));
        assert_eq!(parse_millis("2s"), Ok(2000.0));
        assert_eq!(parse_millis(" 1.5s "), Ok(1500.0));
    }

    #[test]
    fn bare_unit_is_zero() {
        assert_eq!(parse_millis("s"), Ok(0.0));
    }

    #[test]
    fn milliseconds_are_rejected() {
        assert_eq!(
            parse_millis("300ms"),
            Err(TimingError::UnsupportedUnit {
                value: "300ms".into(),
                unit: "ms".into(),
            })
        );
    }

    #[test]
    fn missing_unit_is_rejected() {
        assert!(matches!(
            parse_millis("0.3"),
            Err(TimingError::UnsupportedUnit { unit, .. }) if unit.is_empty()
        ));
        assert!(matches!(
            parse_millis(""),
            Err(TimingError::UnsupportedUnit { .. })
        ));
    }

    #[test]
    fn garbage_number_is_invalid() {
        assert!(matches!(
            parse_millis("1.2.3s"),
            Err(TimingError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn negative_seconds_parse() {
        assert_eq!(parse_millis("-0.1s"), Ok(-100.0));
    }

    #[test]
    fn list_parses_each_entry() {
        assert_eq!(parse_millis_list("0.3s, 0.5s"), Ok(vec![300.0, 500.0]));
        assert!(parse_millis_list("0.3s, 20ms").is_err());
    }

    // ---- millis_to_duration ----

    #[test]
    fn negative_millis_clamp_to_zero() {
        assert_eq!(millis_to_duration(-5.0), Duration::ZERO);
        assert_eq!(millis_to_duration(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn fractional_millis_round_to_micros() {
        assert_eq!(millis_to_duration(0.5), Duration::from_micros(500));
    }

    // ---- MeasuredTiming ----

    #[test]
    fn duration_plus_delay() {
        let computed = ComputedTiming::new("0.3s", "0.1s");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(m.wait(Duration::ZERO), MS_400);
    }

    #[test]
    fn empty_values_wait_zero() {
        let computed = ComputedTiming::new("", "");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(m, MeasuredTiming::ZERO);
        assert_eq!(m.wait(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn missing_target_waits_zero() {
        let m = MeasuredTiming::from_computed(None, Duration::ZERO).unwrap();
        assert_eq!(m.wait(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn zero_duration_uses_fallback() {
        let computed = ComputedTiming::new("0s", "0.1s");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(
            m.wait(Duration::from_millis(250)),
            Duration::from_millis(350)
        );
    }

    #[test]
    fn unsupported_duration_names_property() {
        let computed = ComputedTiming::new("300ms", "0s");
        let err = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::Timing {
                property: TimingProperty::Duration,
                source: TimingError::UnsupportedUnit { .. },
            }
        ));
    }

    #[test]
    fn unsupported_delay_names_property() {
        let computed = ComputedTiming::new("0.2s", "5ms");
        let err = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::Timing {
                property: TimingProperty::Delay,
                ..
            }
        ));
    }

    #[test]
    fn list_takes_longest_pair() {
        // Pairs: (0.3 + 0.2), (0.1 + 0.2): delays repeat.
        let computed = ComputedTiming::new("0.3s, 0.1s", "0.2s");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(m.duration_ms, 300.0);
        assert_eq!(m.wait(Duration::ZERO), Duration::from_millis(500));
    }

    #[test]
    fn list_delay_can_govern() {
        let computed = ComputedTiming::new("0.5s, 0.2s", "0s, 0.6s");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(m.wait(Duration::ZERO), Duration::from_millis(800));
    }

    #[test]
    fn negative_delay_clamps_wait() {
        let computed = ComputedTiming::new("0.1s", "-0.5s");
        let m = MeasuredTiming::from_computed(Some(&computed), Duration::ZERO).unwrap();
        assert_eq!(m.wait(Duration::ZERO), Duration::ZERO);
    }
}
