use crate::domain::{models::rsvp::TimeslotClaim, ports::TimeslotClaimRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, NaiveDate, Utc};

pub struct PostgresClaimRepo {
    pool: PgPool,
}

impl PostgresClaimRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl TimeslotClaimRepository for PostgresClaimRepo {
    async fn create(&self, claim: &TimeslotClaim) -> Result<TimeslotClaim, AppError> {
        sqlx::query_as::<_, TimeslotClaim>(
            r#"INSERT INTO timeslot_claims (id, event_id, date, slot, performer_name, token, status, expires_at, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#
        )
            .bind(&claim.id)
            .bind(&claim.event_id)
            .bind(claim.date)
            .bind(claim.slot)
            .bind(&claim.performer_name)
            .bind(&claim.token)
            .bind(&claim.status)
            .bind(claim.expires_at)
            .bind(claim.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<TimeslotClaim>, AppError> {
        sqlx::query_as::<_, TimeslotClaim>("SELECT * FROM timeslot_claims WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event_date(&self, event_id: &str, date: NaiveDate) -> Result<Vec<TimeslotClaim>, AppError> {
        sqlx::query_as::<_, TimeslotClaim>(
            "SELECT * FROM timeslot_claims WHERE event_id = $1 AND date = $2 ORDER BY slot"
        )
            .bind(event_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM timeslot_claims WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Claim not found".into()));
        }
        Ok(())
    }

    async fn expire_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let res = sqlx::query(
            "UPDATE timeslot_claims SET status = 'expired' WHERE status = 'active' AND expires_at < $1"
        )
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(res.rows_affected())
    }
}
