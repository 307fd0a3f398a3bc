pub mod sqlite_venue_repo;
pub mod sqlite_event_repo;
pub mod sqlite_event_override_repo;
pub mod sqlite_rsvp_repo;
pub mod sqlite_claim_repo;

pub mod postgres_venue_repo;
pub mod postgres_event_repo;
pub mod postgres_event_override_repo;
pub mod postgres_rsvp_repo;
pub mod postgres_claim_repo;
