use std::time::Duration;

use chrono::Utc;

use super::guard::{set_stage, FlowStage};
use super::inflight::InFlightTickets;
use super::validator::{already_used_message, TicketCheck, TicketValidator};
use super::FlowError;
use crate::models::{NewRegistration, Origin, PendingRegistration, Registration, RegistrationInput};
use crate::session_cache::{store_pending, SessionCache};
use crate::store::{with_timeout, DataStore, StoreError};
use crate::validate;

/// Form control a message is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TicketId,
    Name,
    Email,
    Phone,
    ReferralSource,
    Submit,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TicketId => "ticket_id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::ReferralSource => "referral_source",
            Field::Submit => "submit",
        }
    }
}

/// `Editing -> Validating -> {Blocked, Submitting} -> {Submitted, Failed}`
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationState {
    Editing,
    Validating,
    Blocked { field: Field, reason: FlowError },
    Submitting,
    Submitted(PendingRegistration),
    Failed(FlowError),
}

#[derive(Debug)]
pub enum RegistrationEvent {
    Submit,
    Rejected { field: Field, message: String },
    Checked(TicketCheck),
    Inserted(Result<Registration, StoreError>),
}

impl RegistrationEvent {
    fn name(&self) -> &'static str {
        match self {
            RegistrationEvent::Submit => "submit",
            RegistrationEvent::Rejected { .. } => "rejected",
            RegistrationEvent::Checked(_) => "checked",
            RegistrationEvent::Inserted(_) => "inserted",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid registration transition: {event} while {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl RegistrationState {
    pub fn name(&self) -> &'static str {
        match self {
            RegistrationState::Editing => "editing",
            RegistrationState::Validating => "validating",
            RegistrationState::Blocked { .. } => "blocked",
            RegistrationState::Submitting => "submitting",
            RegistrationState::Submitted(_) => "submitted",
            RegistrationState::Failed(_) => "failed",
        }
    }

    /// The submit control is disabled while a remote call is pending and after success.
    pub fn submit_enabled(&self) -> bool {
        matches!(
            self,
            RegistrationState::Editing | RegistrationState::Blocked { .. } | RegistrationState::Failed(_)
        )
    }

    pub fn apply(self, event: RegistrationEvent) -> Result<RegistrationState, InvalidTransition> {
        use RegistrationEvent as E;
        use RegistrationState as S;

        let next = match (self, event) {
            (S::Editing | S::Blocked { .. } | S::Failed(_), E::Submit) => S::Validating,
            (S::Validating, E::Rejected { field, message }) => S::Blocked {
                field,
                reason: FlowError::ValidationBlocked(message),
            },
            (S::Validating, E::Checked(check)) => match check.to_flow_error() {
                None => S::Submitting,
                Some(reason) => S::Blocked { field: Field::TicketId, reason },
            },
            (S::Submitting, E::Inserted(Ok(registration))) => S::Submitted(registration.pending()),
            (S::Submitting, E::Inserted(Err(StoreError::DuplicateTicket(ticket_id)))) => S::Blocked {
                field: Field::TicketId,
                reason: FlowError::ValidationBlocked(already_used_message(&ticket_id, None)),
            },
            (S::Submitting, E::Inserted(Err(e))) => {
                log::error!("Registration insert failed: {e}");
                S::Failed(FlowError::RemoteWriteFailed)
            }
            (state, event) => {
                return Err(InvalidTransition { state: state.name(), event: event.name() });
            }
        };
        Ok(next)
    }
}

fn step(state: RegistrationState, event: RegistrationEvent) -> RegistrationState {
    state.apply(event).unwrap_or_else(|e| {
        log::error!("{e}");
        RegistrationState::Failed(FlowError::RemoteWriteFailed)
    })
}

/// First failing field check, in form order.
fn check_fields(input: &RegistrationInput) -> Option<(Field, String)> {
    let checks = [
        (Field::TicketId, validate::validate_ticket_id(&input.ticket_id)),
        (Field::Name, validate::validate_required(&input.name, "Name", 120)),
        (Field::Email, validate::validate_email(&input.email)),
        (Field::Phone, validate::validate_optional(&input.phone, "Phone", 40)),
        (Field::ReferralSource, validate::validate_referral(&input.referral_source)),
    ];
    checks
        .into_iter()
        .find_map(|(field, err)| err.map(|message| (field, message)))
}

pub struct RegistrationWorkflow<'a> {
    store: &'a dyn DataStore,
    inflight: &'a InFlightTickets,
    origin: Origin,
    timeout: Duration,
}

impl<'a> RegistrationWorkflow<'a> {
    pub fn new(
        store: &'a dyn DataStore,
        inflight: &'a InFlightTickets,
        origin: Origin,
        timeout: Duration,
    ) -> Self {
        Self { store, inflight, origin, timeout }
    }

    pub fn validator(&self) -> TicketValidator<'a> {
        TicketValidator::new(self.store, self.timeout)
    }

    /// Run one submission to a terminal state. On `Submitted` the pending
    /// reference is already in `cache`.
    pub async fn submit(
        &self,
        input: &RegistrationInput,
        cache: &impl SessionCache,
    ) -> RegistrationState {
        let input = input.trimmed();
        let mut state = step(RegistrationState::Editing, RegistrationEvent::Submit);

        if let Some((field, message)) = check_fields(&input) {
            return step(state, RegistrationEvent::Rejected { field, message });
        }

        let Some(_claim) = self.inflight.acquire(&input.ticket_id) else {
            log::warn!("Concurrent submission for ticket {} rejected", input.ticket_id);
            let message = format!("Ticket {} is already being registered", input.ticket_id);
            return step(state, RegistrationEvent::Rejected { field: Field::TicketId, message });
        };

        let check = self.validator().validate(&input.ticket_id).await;
        state = step(state, RegistrationEvent::Checked(check));
        if state != RegistrationState::Submitting {
            return state;
        }

        let new = NewRegistration::from_input(&input, self.origin, Utc::now());
        let inserted = with_timeout(self.timeout, self.store.insert_registration(&new)).await;
        state = step(state, RegistrationEvent::Inserted(inserted));

        if let RegistrationState::Submitted(pending) = &state {
            if let Err(e) = store_pending(cache, pending) {
                log::error!("Registration #{} saved but not cached: {e}", pending.registration_id);
                return RegistrationState::Failed(FlowError::RemoteWriteFailed);
            }
            set_stage(cache, FlowStage::Registered);
            log::info!(
                "Registered ticket {} as #{}",
                pending.ticket_id,
                pending.registration_id
            );
        }
        state
    }
}
