use crate::domain::models::{
    event::Event, event_override::EventOverride, rsvp::{Rsvp, TimeslotClaim}, venue::Venue,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError>;
    async fn list(&self) -> Result<Vec<Venue>, AppError>;
    async fn update(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    /// Published, non-cancelled events: the listing surface's input set.
    async fn list_published(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventOverrideRepository: Send + Sync {
    async fn upsert(&self, override_entity: &EventOverride) -> Result<EventOverride, AppError>;
    async fn find_by_date(&self, event_id: &str, date: NaiveDate) -> Result<Option<EventOverride>, AppError>;
    async fn list_by_range(&self, event_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<EventOverride>, AppError>;
    /// All overrides in a date window, across events; feeds the listing's
    /// override map in one read.
    async fn list_in_window(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<EventOverride>, AppError>;
    async fn delete(&self, event_id: &str, date: NaiveDate) -> Result<(), AppError>;
    /// Like delete but a no-op when the row is absent; the upsert path uses
    /// it to keep empty-override reverts idempotent.
    async fn clear(&self, event_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait RsvpRepository: Send + Sync {
    async fn create(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Rsvp>, AppError>;
    async fn list_by_event_date(&self, event_id: &str, date: NaiveDate) -> Result<Vec<Rsvp>, AppError>;
}

#[async_trait]
pub trait TimeslotClaimRepository: Send + Sync {
    async fn create(&self, claim: &TimeslotClaim) -> Result<TimeslotClaim, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<TimeslotClaim>, AppError>;
    async fn list_by_event_date(&self, event_id: &str, date: NaiveDate) -> Result<Vec<TimeslotClaim>, AppError>;
    async fn delete_by_token(&self, token: &str) -> Result<(), AppError>;
    /// Mark active claims past their expiry; returns how many were swept.
    async fn expire_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}
