use std::fmt;

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Publish time written into the front matter and used as the filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        // front matter has seconds precision
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// `date` at a random time of day. Back-dated posts published in a batch
    /// get staggered times this way.
    pub fn on_date<R: Rng + ?Sized>(date: &str, rng: &mut R) -> anyhow::Result<Self> {
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .with_context(|| format!("Invalid date format: {date:?} (expected YYYY-MM-DD)"))?;
        let hour = rng.random_range(0..24);
        let min = rng.random_range(0..60);
        let sec = rng.random_range(0..60);
        let time = date
            .and_hms_opt(hour, min, sec)
            .with_context(|| format!("invalid time {hour:02}:{min:02}:{sec:02}"))?;

        Ok(Self(time))
    }

    /// `now()` when no date is given, `on_date()` otherwise. Empty input counts as absent.
    pub fn resolve<R: Rng + ?Sized>(date: Option<&str>, rng: &mut R) -> anyhow::Result<Self> {
        match date {
            Some(d) if !d.is_empty() => Self::on_date(d, rng),
            _ => Ok(Self::now()),
        }
    }

    pub fn date_prefix(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATETIME_FORMAT))
    }
}
