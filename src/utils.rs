use chrono::{DateTime, Datelike, Duration, LocalResult, Month, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

pub const RECORDING_URI_PREFIX: &str = "https://musicbrainz.org/recording";

/// A calendar month anchored in a timezone.
///
/// `start` is day 1 at 00:00:00 and `end` is the last day of the month at
/// 00:00:00, both local to the timezone. `next_start` is day 1 of the
/// following month, used when the whole last day should be covered.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRange {
    pub label: String,
    pub year: i32,
    pub month: Month,
    pub last_day: u32,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub next_start: DateTime<Tz>,
}

impl MonthRange {
    pub fn start_ts(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_ts(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn next_start_ts(&self) -> i64 {
        self.next_start.timestamp()
    }

    /// The first `max_ts` cursor for this month.
    pub fn cursor_seed(&self, full_last_day: bool) -> i64 {
        if full_last_day {
            self.next_start_ts()
        } else {
            self.end_ts()
        }
    }
}

/// Parses a `YYYY-MM` label into its year and month.
pub fn parse_month(label: &str) -> Result<(i32, Month)> {
    let trimmed = label.trim();
    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(Error::InvalidMonthFormat(label.to_string()));
    }

    let date = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .map_err(|_| Error::InvalidMonthFormat(label.to_string()))?;
    let month = Month::try_from(date.month() as u8)
        .map_err(|_| Error::InvalidMonthFormat(label.to_string()))?;
    Ok((date.year(), month))
}

fn first_of_next_month(year: i32, month: Month) -> Option<NaiveDate> {
    match month {
        Month::December => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1),
    }
}

/// Day count of the month: day 1 of the next month minus one day.
pub fn last_day_of_month(year: i32, month: Month) -> u32 {
    first_of_next_month(year, month)
        .map(|next| (next - Duration::days(1)).day())
        .unwrap_or(31)
}

/// Resolves an IANA timezone name, falling back to a case-insensitive match
/// so `utc` and `europe/berlin` are accepted.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    let trimmed = name.trim();
    trimmed
        .parse::<Tz>()
        .or_else(|_| Tz::from_str_insensitive(trimmed))
        .map_err(|_| Error::UnknownTimezone(name.to_string()))
}

/// Midnight of `date` in `tz`.
///
/// Ambiguous local times take the earlier instant. When midnight does not
/// exist because of a DST jump, the first valid instant after it is used.
fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Turns a `YYYY-MM` label and a timezone name into a [`MonthRange`].
///
/// # Errors
///
/// - [`Error::InvalidMonthFormat`] when the label is not a year and month
/// - [`Error::UnknownTimezone`] when the timezone does not resolve
///
/// # Example
///
/// ```
/// let range = resolve_month("2024-02", "UTC")?;
/// assert_eq!(range.last_day, 29);
/// ```
pub fn resolve_month(label: &str, timezone: &str) -> Result<MonthRange> {
    let (year, month) = parse_month(label)?;
    let tz = parse_timezone(timezone)?;

    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .ok_or_else(|| Error::InvalidMonthFormat(label.to_string()))?;
    let next_first =
        first_of_next_month(year, month).ok_or_else(|| Error::InvalidMonthFormat(label.to_string()))?;
    let last_day = last_day_of_month(year, month);
    let last = next_first - Duration::days(1);

    Ok(MonthRange {
        label: label.trim().to_string(),
        year,
        month,
        last_day,
        start: local_midnight(&tz, first),
        end: local_midnight(&tz, last),
        next_start: local_midnight(&tz, next_first),
    })
}

/// The `YYYY-MM` label of the current month as seen in `timezone`.
pub fn current_month_label(timezone: &str) -> Result<String> {
    let tz = parse_timezone(timezone)?;
    Ok(Utc::now().with_timezone(&tz).format("%Y-%m").to_string())
}

pub fn recording_uri(recording_id: &str) -> String {
    format!("{}/{}", RECORDING_URI_PREFIX, recording_id)
}
