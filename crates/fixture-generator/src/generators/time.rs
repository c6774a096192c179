//! Date and instant generators.
//!
//! Windows relative to "now" are evaluated on every invocation, not when
//! the generator is built.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use fixture_core::{GenerationError, TimeMode};
use rand::{Rng, RngCore};

use super::numeric::int_in_range;
use crate::generator::ValueGenerator;

/// Width of the past and future windows, roughly ten years.
pub const WINDOW_DAYS: i64 = 3650;

const WINDOW_MILLIS: i64 = WINDOW_DAYS * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window<T> {
    Past,
    Present,
    Future,
    Anytime,
    Between(T, T),
}

impl<T> Window<T> {
    fn relative(mode: TimeMode) -> Option<Self> {
        match mode {
            TimeMode::Past => Some(Self::Past),
            TimeMode::Present => Some(Self::Present),
            TimeMode::Future => Some(Self::Future),
            TimeMode::Anytime => Some(Self::Anytime),
            TimeMode::Range => None,
        }
    }
}

fn between<T: PartialOrd + std::fmt::Display>(
    start: Option<T>,
    end: Option<T>,
) -> Result<Window<T>, GenerationError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            GenerationError::check_range(
                start < end,
                format!("start ({start}) must be before end ({end})"),
            )?;
            Ok(Window::Between(start, end))
        }
        _ => Err(GenerationError::invalid_range(
            "range mode requires both start and end",
        )),
    }
}

/// Points in time (UTC).
///
/// Relative windows have millisecond precision; explicit ranges keep the
/// full nanosecond precision of their bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instants {
    window: Window<DateTime<Utc>>,
}

impl ValueGenerator<DateTime<Utc>> for Instants {
    fn generate(&self, rng: &mut dyn RngCore) -> DateTime<Utc> {
        let now = Utc::now();
        match self.window {
            Window::Past => now - Duration::milliseconds(int_in_range(rng, 1, WINDOW_MILLIS)),
            Window::Present => now,
            Window::Future => now + Duration::milliseconds(int_in_range(rng, 1, WINDOW_MILLIS)),
            Window::Anytime => {
                let offset = Duration::milliseconds(int_in_range(rng, 1, WINDOW_MILLIS));
                if rng.random_bool(0.5) {
                    now - offset
                } else {
                    now + offset
                }
            }
            Window::Between(start, end) => {
                // Offsets from `start` keep sub-millisecond bounds intact
                let span = end - start;
                let offset = match span.num_nanoseconds() {
                    Some(nanos) => Duration::nanoseconds(int_in_range(rng, 0, nanos)),
                    None => Duration::milliseconds(int_in_range(rng, 0, span.num_milliseconds())),
                };
                start + offset
            }
        }
    }
}

pub fn instants(mode: TimeMode) -> Result<Instants, GenerationError> {
    Window::relative(mode)
        .map(|window| Instants { window })
        .ok_or_else(|| GenerationError::invalid_range("range mode requires both start and end"))
}

/// Instants in `[start, end)`.
pub fn instants_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Instants, GenerationError> {
    instant_generator(TimeMode::Range, Some(start), Some(end))
}

/// Generator for an `instant` descriptor.
pub fn instant_generator(
    mode: TimeMode,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Instants, GenerationError> {
    match mode {
        TimeMode::Range => Ok(Instants {
            window: between(start, end)?,
        }),
        mode => instants(mode),
    }
}

/// The instant `days` days before now.
pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// The instant `days` days after now.
pub fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn hours_ahead(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn minutes_ahead(minutes: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes)
}

/// Calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dates {
    window: Window<NaiveDate>,
}

impl ValueGenerator<NaiveDate> for Dates {
    fn generate(&self, rng: &mut dyn RngCore) -> NaiveDate {
        let today = Utc::now().date_naive();
        match self.window {
            Window::Past => today - Duration::days(int_in_range(rng, 1, WINDOW_DAYS + 1)),
            Window::Present => today,
            Window::Future => today + Duration::days(int_in_range(rng, 1, WINDOW_DAYS + 1)),
            Window::Anytime => {
                let offset = Duration::days(int_in_range(rng, 1, WINDOW_DAYS + 1));
                if rng.random_bool(0.5) {
                    today - offset
                } else {
                    today + offset
                }
            }
            Window::Between(start, end) => {
                let span = (end - start).num_days();
                start + Duration::days(int_in_range(rng, 0, span))
            }
        }
    }
}

pub fn dates(mode: TimeMode) -> Result<Dates, GenerationError> {
    Window::relative(mode)
        .map(|window| Dates { window })
        .ok_or_else(|| GenerationError::invalid_range("range mode requires both start and end"))
}

/// Dates in `[start, end)`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Result<Dates, GenerationError> {
    date_generator(TimeMode::Range, Some(start), Some(end))
}

/// Generator for a `date` descriptor.
pub fn date_generator(
    mode: TimeMode,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Dates, GenerationError> {
    match mode {
        TimeMode::Range => Ok(Dates {
            window: between(start, end)?,
        }),
        mode => dates(mode),
    }
}
