use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use chrono_tz::Tz;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_venue_repo::PostgresVenueRepo, postgres_event_repo::PostgresEventRepo,
    postgres_event_override_repo::PostgresEventOverrideRepo,
    postgres_rsvp_repo::PostgresRsvpRepo, postgres_claim_repo::PostgresClaimRepo,
    sqlite_venue_repo::SqliteVenueRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_event_override_repo::SqliteEventOverrideRepo,
    sqlite_rsvp_repo::SqliteRsvpRepo, sqlite_claim_repo::SqliteClaimRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let tz: Tz = config.timezone.parse()
        .expect("TIMEZONE must be a valid IANA timezone name");

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            tz,
            venue_repo: Arc::new(PostgresVenueRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            event_override_repo: Arc::new(PostgresEventOverrideRepo::new(pool.clone())),
            rsvp_repo: Arc::new(PostgresRsvpRepo::new(pool.clone())),
            claim_repo: Arc::new(PostgresClaimRepo::new(pool.clone())),
            email_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            tz,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            event_override_repo: Arc::new(SqliteEventOverrideRepo::new(pool.clone())),
            rsvp_repo: Arc::new(SqliteRsvpRepo::new(pool.clone())),
            claim_repo: Arc::new(SqliteClaimRepo::new(pool.clone())),
            email_service,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
