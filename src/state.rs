use std::sync::Arc;
use chrono_tz::Tz;
use crate::domain::ports::{
    EmailService, EventOverrideRepository, EventRepository, RsvpRepository,
    TimeslotClaimRepository, VenueRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Parsed once at bootstrap from `config.timezone`.
    pub tz: Tz,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub event_override_repo: Arc<dyn EventOverrideRepository>,
    pub rsvp_repo: Arc<dyn RsvpRepository>,
    pub claim_repo: Arc<dyn TimeslotClaimRepository>,
    pub email_service: Arc<dyn EmailService>,
}
