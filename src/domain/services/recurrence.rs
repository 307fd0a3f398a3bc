use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::models::event::Event;
use crate::domain::services::dates::ScheduleError;

/// Phase anchor for interval rules that carry no DTSTART and whose event has
/// no fixed date: a fixed epoch Monday keeps biweekly expansion stable
/// across display windows.
fn epoch_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 5).unwrap()
}

/// How an event repeats, derived from its stored fields. `recurrence_rule`
/// wins over `day_of_week`, which wins over a fixed `event_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    OneTime(NaiveDate),
    Weekly(Weekday),
    Rule(RecurrenceRule),
    Unknown,
}

impl Schedule {
    /// Derive the schedule for an event. Unparseable rule or weekday text is
    /// a `Format` error, which callers route to the unknown-schedule bucket
    /// rather than letting it abort a whole listing.
    pub fn for_event(event: &Event) -> Result<Self, ScheduleError> {
        if let Some(rule) = non_blank(event.recurrence_rule.as_deref()) {
            return Ok(Schedule::Rule(RecurrenceRule::parse(rule, event.event_date)?));
        }
        if let Some(day) = non_blank(event.day_of_week.as_deref()) {
            let weekday = day
                .parse::<Weekday>()
                .map_err(|_| ScheduleError::WeekdayFormat(day.to_string()))?;
            return Ok(Schedule::Weekly(weekday));
        }
        if let Some(date) = event.event_date {
            return Ok(Schedule::OneTime(date));
        }
        Ok(Schedule::Unknown)
    }

    pub fn is_one_time(&self) -> bool {
        matches!(self, Schedule::OneTime(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Schedule::Unknown)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freq {
    Weekly,
    Monthly,
}

/// One BYDAY entry. `ordinal` is only meaningful for monthly rules
/// (`1MO` first Monday, `-1FR` last Friday); weekly entries are plain
/// weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByDay {
    pub ordinal: Option<i32>,
    pub weekday: Weekday,
}

/// Parsed RRULE-subset recurrence pattern:
/// `FREQ=WEEKLY|MONTHLY;INTERVAL=n;BYDAY=...;BYMONTHDAY=...;UNTIL=...;DTSTART=...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Freq,
    pub interval: u32,
    pub by_day: Vec<ByDay>,
    pub by_month_day: Vec<u32>,
    pub until: Option<NaiveDate>,
    /// Phase anchor for INTERVAL > 1: explicit DTSTART, else the event's
    /// fixed date, else the epoch Monday.
    pub anchor: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn parse(raw: &str, fallback_anchor: Option<NaiveDate>) -> Result<Self, ScheduleError> {
        let body = raw.trim().strip_prefix("RRULE:").unwrap_or(raw.trim());
        if body.is_empty() {
            return Err(ScheduleError::RuleFormat("empty rule".to_string()));
        }

        let mut freq = None;
        let mut interval: u32 = 1;
        let mut by_day = Vec::new();
        let mut by_month_day = Vec::new();
        let mut until = None;
        let mut anchor = fallback_anchor;

        for part in body.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ScheduleError::RuleFormat(format!("malformed component '{}'", part)))?;

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    freq = Some(match value.trim().to_ascii_uppercase().as_str() {
                        "WEEKLY" => Freq::Weekly,
                        "MONTHLY" => Freq::Monthly,
                        other => {
                            return Err(ScheduleError::RuleFormat(format!(
                                "unsupported FREQ '{}'",
                                other
                            )))
                        }
                    });
                }
                "INTERVAL" => {
                    interval = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| {
                            ScheduleError::RuleFormat(format!("bad INTERVAL '{}'", value))
                        })?;
                }
                "BYDAY" => {
                    for token in value.split(',') {
                        by_day.push(parse_by_day(token)?);
                    }
                }
                "BYMONTHDAY" => {
                    for token in value.split(',') {
                        let day = token
                            .trim()
                            .parse::<u32>()
                            .ok()
                            .filter(|d| (1..=31).contains(d))
                            .ok_or_else(|| {
                                ScheduleError::RuleFormat(format!("bad BYMONTHDAY '{}'", token))
                            })?;
                        by_month_day.push(day);
                    }
                }
                "UNTIL" => until = Some(parse_rule_date(value)?),
                "DTSTART" => anchor = Some(parse_rule_date(value)?),
                other => {
                    return Err(ScheduleError::RuleFormat(format!(
                        "unsupported component '{}'",
                        other
                    )))
                }
            }
        }

        let freq = freq.ok_or_else(|| ScheduleError::RuleFormat("missing FREQ".to_string()))?;

        match freq {
            Freq::Weekly => {
                if by_day.iter().any(|b| b.ordinal.is_some()) {
                    return Err(ScheduleError::RuleFormat(
                        "ordinal BYDAY is only valid with FREQ=MONTHLY".to_string(),
                    ));
                }
                if by_day.is_empty() {
                    // RRULE semantics: a weekly rule without BYDAY repeats on
                    // the weekday of its start date.
                    match anchor {
                        Some(a) => by_day.push(ByDay { ordinal: None, weekday: a.weekday() }),
                        None => {
                            return Err(ScheduleError::RuleFormat(
                                "weekly rule needs BYDAY or a start date".to_string(),
                            ))
                        }
                    }
                }
            }
            Freq::Monthly => {
                if by_day.is_empty() && by_month_day.is_empty() {
                    return Err(ScheduleError::RuleFormat(
                        "monthly rule needs BYDAY or BYMONTHDAY".to_string(),
                    ));
                }
            }
        }

        Ok(Self { freq, interval, by_day, by_month_day, until, anchor })
    }

    /// Whether the pattern fires on `date`, ignoring `until` (window clipping
    /// handles that).
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self.freq {
            Freq::Weekly => {
                if !self.by_day.iter().any(|b| b.weekday == date.weekday()) {
                    return false;
                }
                if self.interval <= 1 {
                    return true;
                }
                let anchor = self.anchor.unwrap_or_else(epoch_monday);
                (week_index(date) - week_index(anchor)).rem_euclid(i64::from(self.interval)) == 0
            }
            Freq::Monthly => {
                if self.interval > 1 {
                    let anchor = self.anchor.unwrap_or_else(epoch_monday);
                    let months = month_index(date) - month_index(anchor);
                    if months.rem_euclid(i64::from(self.interval)) != 0 {
                        return false;
                    }
                }
                if self.by_month_day.contains(&date.day()) {
                    return true;
                }
                self.by_day.iter().any(|b| match b.ordinal {
                    None => b.weekday == date.weekday(),
                    Some(ord) => {
                        ordinal_weekday_in_month(date.year(), date.month(), b.weekday, ord)
                            == Some(date.day())
                    }
                })
            }
        }
    }
}

fn parse_by_day(token: &str) -> Result<ByDay, ScheduleError> {
    let token = token.trim().to_ascii_uppercase();
    if token.len() < 2 || !token.is_ascii() {
        return Err(ScheduleError::RuleFormat(format!("bad BYDAY '{}'", token)));
    }
    let (prefix, code) = token.split_at(token.len() - 2);
    let weekday = match code {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return Err(ScheduleError::RuleFormat(format!("bad BYDAY '{}'", token))),
    };
    let ordinal = if prefix.is_empty() {
        None
    } else {
        let ord = prefix
            .parse::<i32>()
            .ok()
            .filter(|o| *o != 0 && o.unsigned_abs() <= 5)
            .ok_or_else(|| ScheduleError::RuleFormat(format!("bad BYDAY ordinal '{}'", token)))?;
        Some(ord)
    };
    Ok(ByDay { ordinal, weekday })
}

/// UNTIL/DTSTART values: `YYYYMMDD`, `YYYY-MM-DD`, or the RFC 5545 UTC form
/// `YYYYMMDDTHHMMSSZ` (the date part is what matters here).
fn parse_rule_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    let value = value.trim();
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y-%m-%d"))
        .map_err(|_| ScheduleError::RuleFormat(format!("bad date '{}'", value)))
}

fn week_index(date: NaiveDate) -> i64 {
    date.signed_duration_since(epoch_monday()).num_days().div_euclid(7)
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Day-of-month of the nth (1-based, negative = from the end) `weekday` in
/// the given month, if it exists.
fn ordinal_weekday_in_month(year: i32, month: u32, weekday: Weekday, ordinal: i32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = days_in_month(year, month);
    let first_match =
        1 + (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let count = (days - first_match) / 7 + 1;
    let index = if ordinal > 0 {
        ordinal as u32
    } else {
        let from_end = ordinal.unsigned_abs();
        if from_end > count {
            return None;
        }
        count - from_end + 1
    };
    if index == 0 || index > count {
        return None;
    }
    Some(first_match + 7 * (index - 1))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Expand a schedule over an inclusive `[start, end]` window: ascending,
/// duplicate-free date keys, clipped at the rule's UNTIL. An inverted window
/// or an UNTIL before the window yields empty, not an error. Callers check
/// `Schedule::Unknown` themselves; this function cannot distinguish it from
/// "no occurrences in window".
pub fn occurrences_in_window(schedule: &Schedule, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    match schedule {
        Schedule::Unknown => Vec::new(),
        Schedule::OneTime(date) => {
            if start <= *date && *date <= end {
                vec![*date]
            } else {
                Vec::new()
            }
        }
        Schedule::Weekly(weekday) => start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| d.weekday() == *weekday)
            .collect(),
        Schedule::Rule(rule) => {
            let clipped_end = match rule.until {
                Some(until) if until < end => until,
                _ => end,
            };
            if clipped_end < start {
                return Vec::new();
            }
            start
                .iter_days()
                .take_while(|d| *d <= clipped_end)
                .filter(|d| rule.matches(*d))
                .collect()
        }
    }
}
