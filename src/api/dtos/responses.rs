use serde::Serialize;

use crate::domain::models::occurrence::Occurrence;

#[derive(Serialize)]
pub struct OccurrencesResponse {
    pub event_id: String,
    pub occurrences: Vec<Occurrence>,
    pub unknown_schedule: bool,
}

#[derive(Serialize)]
pub struct ClaimCreatedResponse {
    pub slot: i32,
    pub token: String,
    pub expires_at: String,
}
