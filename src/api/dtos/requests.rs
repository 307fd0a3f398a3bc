use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub website: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub recurrence_rule: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_published: Option<bool>,
    pub status: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_free: Option<bool>,
    pub cost: Option<String>,
    pub capacity: Option<i32>,
    pub signup_url: Option<String>,
    pub host_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue_id: Option<String>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub recurrence_rule: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_published: Option<bool>,
    pub status: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_free: Option<bool>,
    pub cost: Option<String>,
    pub capacity: Option<i32>,
    pub signup_url: Option<String>,
    pub host_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct EventOverrideRequest {
    pub date: NaiveDate,
    /// "normal" or "cancelled"; defaults to "normal".
    pub status: Option<String>,
    /// Raw patch object; keys outside the allow-list are dropped silently.
    pub patch: Option<Value>,
    pub override_start_time: Option<String>,
    pub override_cover_image_url: Option<String>,
    pub override_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRsvpRequest {
    pub date: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateClaimRequest {
    pub date: String,
    pub slot: i32,
    pub performer_name: String,
}
