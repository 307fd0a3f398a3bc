use chrono::{DateTime, Days, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Failures of the pure scheduling core. `Format` variants are data-quality
/// problems the grouping engine absorbs per event; handlers convert the rest
/// into validation rejections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid date key '{0}', expected YYYY-MM-DD")]
    DateKeyFormat(String),
    #[error("Unknown weekday '{0}'")]
    WeekdayFormat(String),
    #[error("Unparseable recurrence rule: {0}")]
    RuleFormat(String),
}

/// Strict `YYYY-MM-DD` parse. A date key is a civil calendar date in the
/// deployment timezone, never an instant.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ScheduleError::DateKeyFormat(raw.to_string()))
}

/// The calendar date of `instant` in `tz`. This is the only correct way to
/// turn an instant into a date key: truncating an ISO timestamp reinterprets
/// local midnight as UTC and shifts the date near timezone boundaries.
pub fn date_key_at(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date key in the deployment timezone. The only place the engine's
/// callers read the clock.
pub fn local_today(tz: Tz) -> NaiveDate {
    date_key_at(Utc::now(), tz)
}

/// Calendar-day arithmetic. Pure date math, so daylight-saving transitions
/// cannot shift the result.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n as u64))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// The last moment of `date` in `tz`, as an instant. Used for claim and
/// token expiry. When 23:59:59 local does not exist or is ambiguous around
/// a DST transition, the latest valid reading wins.
pub fn end_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let local = date.and_hms_opt(23, 59, 59).unwrap();
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(_, latest) => latest.with_timezone(&Utc),
        LocalResult::None => {
            let next_midnight = add_days(date, 1).and_hms_opt(0, 0, 0).unwrap();
            match tz.from_local_datetime(&next_midnight) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    dt.with_timezone(&Utc) - chrono::Duration::seconds(1)
                }
                LocalResult::None => Utc.from_utc_datetime(&local),
            }
        }
    }
}
