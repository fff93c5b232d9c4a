use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{DataStore, StoreError};
use crate::models::{Coupon, NewRegistration, NewSurveyResponse, Registration, SurveyResponse};

#[derive(Default)]
struct Tables {
    registrations: Vec<Registration>,
    responses: Vec<SurveyResponse>,
    coupons: Vec<Coupon>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process `DataStore`. Every operation runs under one lock, so each
/// check-and-write is atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a backend error until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.lock().registrations.clone()
    }

    pub fn survey_responses(&self) -> Vec<SurveyResponse> {
        self.lock().responses.clone()
    }

    pub fn coupons(&self) -> Vec<Coupon> {
        self.lock().coupons.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn find_registration_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        self.check_online()?;
        let tables = self.lock();
        Ok(tables
            .registrations
            .iter()
            .find(|r| r.ticket_id == ticket_id)
            .cloned())
    }

    async fn insert_registration(&self, new: &NewRegistration) -> Result<Registration, StoreError> {
        self.check_online()?;
        let mut tables = self.lock();
        if tables.registrations.iter().any(|r| r.ticket_id == new.ticket_id) {
            return Err(StoreError::DuplicateTicket(new.ticket_id.clone()));
        }
        let registration = Registration {
            id: tables.next_id(),
            ticket_id: new.ticket_id.clone(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            referral_source: new.referral_source.clone(),
            origin: new.origin,
            created_at: new.created_at,
        };
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn insert_survey_response(
        &self,
        new: &NewSurveyResponse,
    ) -> Result<SurveyResponse, StoreError> {
        self.check_online()?;
        let mut tables = self.lock();
        if !tables.registrations.iter().any(|r| r.id == new.registration_id) {
            return Err(StoreError::RegistrationNotFound(new.registration_id));
        }
        if tables.responses.iter().any(|r| r.registration_id == new.registration_id) {
            return Err(StoreError::DuplicateResponse(new.registration_id));
        }
        let response = SurveyResponse {
            id: tables.next_id(),
            registration_id: new.registration_id,
            answers: new.answers.to_vec(),
            feedback: new.feedback.clone(),
            submitted_at: new.submitted_at,
        };
        tables.responses.push(response.clone());
        Ok(response)
    }

    async fn claim_coupon(&self, registration_id: Option<i64>) -> Result<Option<Coupon>, StoreError> {
        self.check_online()?;
        let mut tables = self.lock();
        let Some(coupon) = tables.coupons.iter_mut().find(|c| !c.used) else {
            return Ok(None);
        };
        coupon.used = true;
        coupon.used_at = Some(Utc::now());
        coupon.claimed_by = registration_id;
        Ok(Some(coupon.clone()))
    }

    async fn count_unused_coupons(&self) -> Result<i64, StoreError> {
        self.check_online()?;
        Ok(self.lock().coupons.iter().filter(|c| !c.used).count() as i64)
    }

    async fn seed_coupons(&self, codes: &[String]) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut tables = self.lock();
        let mut added = 0;
        for code in codes {
            if tables.coupons.iter().any(|c| &c.code == code) {
                continue;
            }
            let id = tables.next_id();
            tables.coupons.push(Coupon {
                id,
                code: code.clone(),
                used: false,
                used_at: None,
                claimed_by: None,
            });
            added += 1;
        }
        Ok(added)
    }
}
