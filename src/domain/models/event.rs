use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_NEEDS_VERIFICATION: &str = "needs_verification";
pub const STATUS_UNVERIFIED: &str = "unverified";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const EVENT_STATUSES: [&str; 4] = [
    STATUS_ACTIVE,
    STATUS_NEEDS_VERIFICATION,
    STATUS_UNVERIFIED,
    STATUS_CANCELLED,
];

/// A listing definition. An event either has a recurrence definition
/// (`recurrence_rule` or `day_of_week`), a fixed `event_date`, or neither,
/// in which case its schedule is unknown. Recurrence wins over `event_date`
/// when both are present.
///
/// Venue is either a reference (`venue_id`) or denormalized
/// `venue_name`/`venue_address` fields; the event write path keeps the two
/// mutually exclusive.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub recurrence_rule: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_published: bool,
    pub status: String,
    pub cover_image_url: Option<String>,
    pub is_free: bool,
    pub cost: Option<String>,
    pub capacity: Option<i32>,
    pub signup_url: Option<String>,
    pub host_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
