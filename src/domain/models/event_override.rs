use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const OVERRIDE_STATUS_NORMAL: &str = "normal";
pub const OVERRIDE_STATUS_CANCELLED: &str = "cancelled";

/// A stored per-occurrence patch, keyed by (event_id, date) with a unique
/// constraint at the storage layer.
///
/// `patch_json` is the generic patch; the three `override_*` columns are the
/// legacy flat representation that predates it. Both coexist in storage and
/// are folded into one shape by the override map builder, patch winning per
/// field.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventOverride {
    pub id: String,
    pub event_id: String,
    pub date: NaiveDate,
    pub status: String,
    pub patch_json: Option<String>,
    pub override_start_time: Option<String>,
    pub override_cover_image_url: Option<String>,
    pub override_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EventOverride {
    pub fn new(event_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            date,
            status: OVERRIDE_STATUS_NORMAL.to_string(),
            patch_json: None,
            override_start_time: None,
            override_cover_image_url: None,
            override_notes: None,
            created_at: Utc::now(),
        }
    }
}

/// The allow-list of occurrence fields a patch may modify. Anything outside
/// this set is dropped during deserialization, not rejected.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OverridePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reschedule target. Differs from the override's own date key when the
    /// occurrence has been moved; the occurrence stays keyed by its original
    /// date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signup_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl OverridePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.venue_name.is_none()
            && self.venue_address.is_none()
            && self.capacity.is_none()
            && self.cost.is_none()
            && self.is_free.is_none()
            && self.signup_url.is_none()
            && self.cover_image_url.is_none()
            && self.host_notes.is_none()
            && self.is_published.is_none()
    }
}
