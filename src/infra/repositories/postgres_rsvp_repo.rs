use crate::domain::{models::rsvp::Rsvp, ports::RsvpRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresRsvpRepo {
    pool: PgPool,
}

impl PostgresRsvpRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl RsvpRepository for PostgresRsvpRepo {
    async fn create(&self, rsvp: &Rsvp) -> Result<Rsvp, AppError> {
        sqlx::query_as::<_, Rsvp>(
            r#"INSERT INTO rsvps (id, event_id, date, name, email, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#
        )
            .bind(&rsvp.id)
            .bind(&rsvp.event_id)
            .bind(rsvp.date)
            .bind(&rsvp.name)
            .bind(&rsvp.email)
            .bind(rsvp.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Rsvp>, AppError> {
        sqlx::query_as::<_, Rsvp>(
            "SELECT * FROM rsvps WHERE event_id = $1 ORDER BY date, created_at"
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event_date(&self, event_id: &str, date: NaiveDate) -> Result<Vec<Rsvp>, AppError> {
        sqlx::query_as::<_, Rsvp>(
            "SELECT * FROM rsvps WHERE event_id = $1 AND date = $2 ORDER BY created_at"
        )
            .bind(event_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
