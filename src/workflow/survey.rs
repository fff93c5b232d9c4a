use std::time::Duration;

use chrono::Utc;

use super::guard::{set_stage, FlowStage};
use super::FlowError;
use crate::models::{NewSurveyResponse, PendingRegistration, SurveyInput, SurveyResponse};
use crate::session_cache::{clear_pending, pending_registration, SessionCache, ENTITLEMENT_KEY};
use crate::store::{with_timeout, DataStore, StoreError};

/// What the survey page shows on load.
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyPage {
    Ready(PendingRegistration),
    /// No registration in this session: show the banner, then go back after the delay.
    MissingPrecondition { redirect_after_secs: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurveyOutcome {
    Submitted(SurveyResponse),
    /// The cached registration already has a response; the stale reference was dropped.
    AlreadySubmitted,
    Failed(FlowError),
}

pub struct SurveyWorkflow<'a> {
    store: &'a dyn DataStore,
    timeout: Duration,
}

impl<'a> SurveyWorkflow<'a> {
    pub fn new(store: &'a dyn DataStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn load(cache: &impl SessionCache, redirect_after_secs: u64) -> SurveyPage {
        match pending_registration(cache) {
            Some(pending) => SurveyPage::Ready(pending),
            None => {
                log::warn!("Survey opened without a pending registration");
                SurveyPage::MissingPrecondition { redirect_after_secs }
            }
        }
    }

    /// Insert the response for the cached registration. The cache entry is
    /// consumed only on success; failures leave it for a retry.
    pub async fn submit(&self, input: &SurveyInput, cache: &impl SessionCache) -> SurveyOutcome {
        let Some(pending) = pending_registration(cache) else {
            log::warn!("Survey submitted without a pending registration");
            return SurveyOutcome::Failed(FlowError::MissingPrecondition);
        };

        let new = NewSurveyResponse {
            registration_id: pending.registration_id,
            answers: input.answers(),
            feedback: input.feedback(),
            submitted_at: Utc::now(),
        };

        match with_timeout(self.timeout, self.store.insert_survey_response(&new)).await {
            Ok(response) => {
                clear_pending(cache);
                if let Err(e) = cache.put(ENTITLEMENT_KEY, pending.registration_id.to_string()) {
                    log::error!("Failed to grant coupon to #{}: {e}", pending.registration_id);
                }
                set_stage(cache, FlowStage::Surveyed);
                log::info!(
                    "Survey #{} recorded for ticket {}",
                    response.id,
                    pending.ticket_id
                );
                SurveyOutcome::Submitted(response)
            }
            Err(StoreError::DuplicateResponse(id)) => {
                log::warn!("Registration #{id} already answered the survey");
                clear_pending(cache);
                set_stage(cache, FlowStage::Surveyed);
                SurveyOutcome::AlreadySubmitted
            }
            Err(e) => {
                log::error!(
                    "Saving survey for ticket {} failed: {e}",
                    pending.ticket_id
                );
                SurveyOutcome::Failed(FlowError::RemoteWriteFailed)
            }
        }
    }
}
