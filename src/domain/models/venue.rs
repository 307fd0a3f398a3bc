use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    pub fn new(name: String, address: String, city: String, website: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            city,
            website,
            created_at: Utc::now(),
        }
    }
}
