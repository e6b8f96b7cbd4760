//! Calendar dates, the Julian time axis, and the permissive `yyyy-mm-dd`
//! normalizer used for the session date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use log::debug;

use crate::error::{Result, VsqueryError};
use crate::types::{CalendarDateTime, JulianInstant};

/// Julian Day of 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Hour of day every session is anchored to before evaluating the ephemeris.
pub const ANCHOR_HOUR: u32 = 8;

impl From<NaiveDateTime> for CalendarDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second() as f64 + dt.nanosecond() as f64 / 1e9,
        }
    }
}

impl CalendarDateTime {
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let whole = self.second.trunc();
        let nanos = ((self.second - whole) * 1e9).round().min(999_999_999.0) as u32;
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_nano_opt(
            self.hour,
            self.minute,
            whole as u32,
            nanos,
        )
    }

    /// Same calendar date at 08:00:00.
    pub fn at_anchor(&self) -> CalendarDateTime {
        CalendarDateTime {
            hour: ANCHOR_HOUR,
            minute: 0,
            second: 0.0,
            ..*self
        }
    }
}

/// Resolves a possibly partial `yyyy-mm-dd` string against `now`.
///
/// Empty input returns `now` unchanged. Each `-` separated token overrides
/// year, month, day in that order; a token that is not an integer keeps the
/// field from `now`. A day taken from `now` is clamped to the last day of the
/// resulting month. Time of day always comes from `now`.
pub fn normalize(input: &str, now: &CalendarDateTime) -> Result<CalendarDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(*now);
    }

    let tokens: Vec<&str> = input.split('-').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return Err(VsqueryError::invalid_date(input, "no date tokens"));
    }
    if tokens.len() > 3 {
        return Err(VsqueryError::invalid_date(
            input,
            format!("unknown date token '{}'", tokens[3]),
        ));
    }

    let mut date = *now;
    let mut day_given = false;
    for (index, token) in tokens.iter().enumerate() {
        let token = token.trim();
        let applied = match index {
            0 => token.parse::<i32>().map(|v| date.year = v).is_ok(),
            1 => token.parse::<u32>().map(|v| date.month = v).is_ok(),
            _ => token.parse::<u32>().map(|v| date.day = v).is_ok(),
        };
        if !applied {
            debug!("ignoring date token '{}' at position {}", token, index);
        }
        day_given |= index == 2 && applied;
    }

    // a day inherited from `now` may not exist in the requested month
    if !day_given {
        if let Some(last) = last_day_of_month(date.year, date.month) {
            if date.day > last {
                debug!("clamping day {} to {}", date.day, last);
                date.day = last;
            }
        }
    }

    if NaiveDate::from_ymd_opt(date.year, date.month, date.day).is_none() {
        return Err(VsqueryError::invalid_date(
            input,
            format!(
                "{}-{:02}-{:02} is not a calendar date",
                date.year, date.month, date.day
            ),
        ));
    }
    Ok(date)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    (28..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
}

pub fn julian_from_utc(dt: &DateTime<Utc>) -> JulianInstant {
    JulianInstant(UNIX_EPOCH_JD + dt.timestamp_millis() as f64 / MILLIS_PER_DAY)
}

/// Millisecond resolution; `None` outside chrono's representable range.
pub fn julian_to_utc(jd: JulianInstant) -> Option<DateTime<Utc>> {
    let millis = ((jd.value() - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Interprets a local calendar date/time in `tz` and places it on the Julian axis.
pub fn local_to_julian<Tz: TimeZone>(date: &CalendarDateTime, tz: &Tz) -> Result<JulianInstant> {
    let naive = date.to_naive().ok_or_else(|| {
        VsqueryError::invalid_date(
            format!("{}-{:02}-{:02}", date.year, date.month, date.day),
            "not a calendar date",
        )
    })?;
    let local = tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        VsqueryError::invalid_date(naive.to_string(), "does not exist in the local time zone")
    })?;
    Ok(julian_from_utc(&local.with_timezone(&Utc)))
}

pub fn julian_to_local<Tz: TimeZone>(jd: JulianInstant, tz: &Tz) -> Option<CalendarDateTime> {
    julian_to_utc(jd).map(|utc| utc.with_timezone(tz).naive_local().into())
}
