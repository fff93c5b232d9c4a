//! Remote data store capability and its adapters.
//!
//! The workflows only talk to [`DataStore`]; `PgStore` backs production and
//! `MemoryStore` backs tests and the `memory` backend. Both enforce the same
//! constraints: one registration per ticket id, one survey response per
//! registration, and a coupon can be claimed once.

mod error;
mod memory;
mod postgres;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Coupon, NewRegistration, NewSurveyResponse, Registration, SurveyResponse};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type SharedStore = Arc<dyn DataStore>;

#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    /// Point lookup of the registration holding `ticket_id`, if any.
    async fn find_registration_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError>;

    /// Insert a registration.
    ///
    /// Returns `Err(StoreError::DuplicateTicket)` if the ticket id is taken.
    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError>;

    /// Insert a survey response.
    ///
    /// Returns `Err(StoreError::DuplicateResponse)` if the registration already has one,
    /// `Err(StoreError::RegistrationNotFound)` if it does not exist.
    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError>;

    /// Atomically mark one unused coupon as used and return it.
    /// `Ok(None)` means the pool is exhausted.
    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError>;

    async fn count_unused_coupons(&self) -> Result<i64, StoreError>;

    /// Add unused coupons, skipping codes that already exist. Returns how many were added.
    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError>;
}

/// Bound a store call by `limit`, mapping expiry to `StoreError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}
