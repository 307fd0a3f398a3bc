use serde::Serialize;
use chrono::NaiveDate;

use crate::domain::models::event::Event;

/// One concrete date of an event with any override folded in. Computed on
/// every read, never persisted.
#[derive(Debug, Serialize, Clone)]
pub struct Occurrence {
    pub event_id: String,
    /// The occurrence's own date key. Stays fixed even when the occurrence
    /// has been rescheduled; override lookup and de-duplication key on it.
    pub date: NaiveDate,
    /// Where the occurrence is shown. Equal to `date` unless rescheduled.
    pub display_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_free: bool,
    pub cost: Option<String>,
    pub capacity: Option<i32>,
    pub signup_url: Option<String>,
    pub host_notes: Option<String>,
    pub cancelled: bool,
    pub rescheduled: bool,
}

/// An event together with its computed occurrences inside a display window.
#[derive(Debug, Serialize, Clone)]
pub struct Series {
    pub event: Event,
    pub occurrences: Vec<Occurrence>,
    pub is_one_time: bool,
}

/// Top-level listing aggregation: computable series plus the events whose
/// next occurrence could not be determined.
#[derive(Debug, Serialize, Clone)]
pub struct GroupedListings {
    pub series: Vec<Series>,
    pub unknown_events: Vec<Event>,
}
