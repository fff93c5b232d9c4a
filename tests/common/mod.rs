//! Shared test infrastructure for workflow and HTTP tests.
//!
//! Everything runs against `MemoryStore`; the wrappers below inject latency
//! and race conditions that a real backend produces.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use ticket_survey::config::{AppConfig, StoreBackend};
use ticket_survey::models::{
    Coupon, NewRegistration, NewSurveyResponse, Registration, RegistrationInput, SurveyResponse,
};
use ticket_survey::state::AppState;
use ticket_survey::store::{DataStore, MemoryStore, StoreError};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TICKET: &str = "T-1001";
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(50);

// ============================================================================
// SETUP
// ============================================================================

pub fn test_config() -> AppConfig {
    AppConfig {
        store_backend: StoreBackend::Memory,
        remote_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    }
}

pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(store, test_config())
}

pub fn registration_input(ticket_id: &str) -> RegistrationInput {
    RegistrationInput {
        ticket_id: ticket_id.to_string(),
        name: "Ana".to_string(),
        email: "a@x.com".to_string(),
        phone: String::new(),
        referral_source: "friend".to_string(),
    }
}

pub async fn store_with_coupons(codes: &[&str]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
    store.seed_coupons(&codes).await.expect("seed coupons");
    store
}

// ============================================================================
// FAULT-INJECTING STORES
// ============================================================================

/// Delays every call by `delay` before delegating.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self { inner: MemoryStore::new(), delay }
    }
}

#[async_trait]
impl DataStore for SlowStore {
    async fn find_registration_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_registration_by_ticket(ticket_id).await
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_registration(new).await
    }

    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert_survey_response(new).await
    }

    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.claim_coupon(registration_id).await
    }

    async fn count_unused_coupons(&self) -> Result<i64, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.count_unused_coupons().await
    }

    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError> {
        self.inner.seed_coupons(codes).await
    }
}

/// Lookups never see existing rows, as if another session's insert had not
/// committed yet when the check ran. Inserts still enforce uniqueness.
pub struct StaleReadStore {
    pub inner: MemoryStore,
}

impl StaleReadStore {
    pub fn new() -> Self {
        Self { inner: MemoryStore::new() }
    }
}

#[async_trait]
impl DataStore for StaleReadStore {
    async fn find_registration_by_ticket(
        &self,
        _ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        Ok(None)
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError> {
        self.inner.insert_registration(new).await
    }

    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        self.inner.insert_survey_response(new).await
    }

    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError> {
        self.inner.claim_coupon(registration_id).await
    }

    async fn count_unused_coupons(&self) -> Result<i64, StoreError> {
        self.inner.count_unused_coupons().await
    }

    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError> {
        self.inner.seed_coupons(codes).await
    }
}

/// Reads always work; writes fail while `fail_writes` is set.
#[derive(Default)]
pub struct FlakyWriteStore {
    pub inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyWriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Backend("write rejected".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataStore for FlakyWriteStore {
    async fn find_registration_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        self.inner.find_registration_by_ticket(ticket_id).await
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError> {
        self.check_write()?;
        self.inner.insert_registration(new).await
    }

    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        self.check_write()?;
        self.inner.insert_survey_response(new).await
    }

    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError> {
        self.check_write()?;
        self.inner.claim_coupon(registration_id).await
    }

    async fn count_unused_coupons(&self) -> Result<i64, StoreError> {
        self.inner.count_unused_coupons().await
    }

    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError> {
        self.inner.seed_coupons(codes).await
    }
}
