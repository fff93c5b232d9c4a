use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{DataStore, StoreError};
use crate::models::{
    Coupon, NewRegistration, NewSurveyResponse, Origin, Registration, SurveyResponse,
};

/// `DataStore` over PostgreSQL. Uniqueness and claim atomicity come from the schema
/// in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: i64,
    ticket_id: String,
    name: String,
    email: String,
    phone: String,
    referral_source: String,
    origin: String,
    created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        let origin = row.origin.parse().unwrap_or_else(|e| {
            log::warn!("Registration {} has {e}, reading as local", row.id);
            Origin::Local
        });
        Registration {
            id: row.id,
            ticket_id: row.ticket_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            referral_source: row.referral_source,
            origin,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SurveyResponseRow {
    id: i64,
    registration_id: i64,
    answers: Vec<String>,
    feedback: String,
    submitted_at: DateTime<Utc>,
}

impl From<SurveyResponseRow> for SurveyResponse {
    fn from(row: SurveyResponseRow) -> Self {
        SurveyResponse {
            id: row.id,
            registration_id: row.registration_id,
            answers: row.answers,
            feedback: row.feedback,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    id: i64,
    code: String,
    used: bool,
    used_at: Option<DateTime<Utc>>,
    claimed_by: Option<i64>,
}

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Coupon {
            id: row.id,
            code: row.code,
            used: row.used,
            used_at: row.used_at,
            claimed_by: row.claimed_by,
        }
    }
}

const REGISTRATION_COLUMNS: &str =
    "id, ticket_id, name, email, phone, referral_source, origin, created_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl DataStore for PgStore {
    async fn find_registration_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let sql = format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE ticket_id = $1 LIMIT 1"
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Registration::from))
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError> {
        let sql = format!(
            "INSERT INTO registrations \
                (ticket_id, name, email, phone, referral_source, origin, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REGISTRATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(&new.ticket_id)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(&new.referral_source)
            .bind(new.origin.as_str())
            .bind(new.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateTicket(new.ticket_id.clone())
                } else {
                    StoreError::from(e)
                }
            })?;
        Ok(row.into())
    }

    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        let row = sqlx::query_as::<_, SurveyResponseRow>(
            "INSERT INTO survey_responses (registration_id, answers, feedback, submitted_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, registration_id, answers, feedback, submitted_at",
        )
        .bind(new.registration_id)
        .bind(new.answers.to_vec())
        .bind(&new.feedback)
        .bind(new.submitted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateResponse(new.registration_id)
            } else if is_foreign_key_violation(&e) {
                StoreError::RegistrationNotFound(new.registration_id)
            } else {
                StoreError::from(e)
            }
        })?;
        Ok(row.into())
    }

    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError> {
        // Single statement: concurrent claimers skip rows locked by each other.
        let row = sqlx::query_as::<_, CouponRow>(
            "UPDATE coupons SET used = TRUE, used_at = NOW(), claimed_by = $1 \
             WHERE id = ( \
                 SELECT id FROM coupons WHERE used = FALSE \
                 ORDER BY id LIMIT 1 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, code, used, used_at, claimed_by",
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Coupon::from))
    }

    async fn count_unused_coupons(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coupons WHERE used = FALSE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for code in codes {
            let result = sqlx::query("INSERT INTO coupons (code) VALUES ($1) ON CONFLICT (code) DO NOTHING")
                .bind(code)
                .execute(&mut *tx)
                .await?;
            added += result.rows_affected();
        }
        tx.commit().await?;
        Ok(added)
    }
}
