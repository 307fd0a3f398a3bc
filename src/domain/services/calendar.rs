use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

use crate::domain::models::occurrence::Occurrence;

/// Generates an iCalendar (.ics) string for a single merged occurrence.
/// Timed occurrences become timed VEVENTs in the deployment timezone;
/// occurrences without a start time fall back to an all-day entry on the
/// display date.
pub fn occurrence_ics(occ: &Occurrence, tz: Tz) -> String {
    let mut calendar = Calendar::new();

    let mut ical_event = IcalEvent::new();
    ical_event
        .summary(&occ.title)
        .description(&occ.description)
        .uid(&format!("{}-{}", occ.event_id, occ.date));

    if let Some(location) = location_line(occ) {
        ical_event.location(&location);
    }

    match occurrence_start(occ, tz) {
        Some(start) => {
            ical_event.starts(start);
            let end = occurrence_end(occ, tz).unwrap_or(start + Duration::hours(3));
            ical_event.ends(end);
        }
        None => {
            ical_event.starts(occ.display_date);
        }
    }

    calendar.push(ical_event.done());
    calendar.to_string()
}

fn location_line(occ: &Occurrence) -> Option<String> {
    match (occ.venue_name.as_deref(), occ.venue_address.as_deref()) {
        (Some(name), Some(address)) => Some(format!("{}, {}", name, address)),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(address)) => Some(address.to_string()),
        (None, None) => None,
    }
}

fn occurrence_start(occ: &Occurrence, tz: Tz) -> Option<DateTime<Utc>> {
    instant_on_display_date(occ, occ.start_time.as_deref()?, tz)
}

fn occurrence_end(occ: &Occurrence, tz: Tz) -> Option<DateTime<Utc>> {
    instant_on_display_date(occ, occ.end_time.as_deref()?, tz)
}

fn instant_on_display_date(occ: &Occurrence, time: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    tz.from_local_datetime(&occ.display_date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
