use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const CLAIM_STATUS_ACTIVE: &str = "active";
pub const CLAIM_STATUS_EXPIRED: &str = "expired";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Rsvp {
    pub id: String,
    pub event_id: String,
    pub date: NaiveDate,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Rsvp {
    pub fn new(event_id: String, date: NaiveDate, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            date,
            name,
            email,
            created_at: Utc::now(),
        }
    }
}

/// A performer's hold on a numbered slot of one occurrence. Released via its
/// token, or swept to `expired` after `expires_at` (end of the occurrence
/// day in the deployment timezone).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TimeslotClaim {
    pub id: String,
    pub event_id: String,
    pub date: NaiveDate,
    pub slot: i32,
    pub performer_name: String,
    pub token: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TimeslotClaim {
    pub fn new(
        event_id: String,
        date: NaiveDate,
        slot: i32,
        performer_name: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            date,
            slot,
            performer_name,
            token: Uuid::new_v4().to_string(),
            status: CLAIM_STATUS_ACTIVE.to_string(),
            expires_at,
            created_at: Utc::now(),
        }
    }
}
