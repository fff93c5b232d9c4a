use std::time::Duration;

use serde::Serialize;

use super::FlowError;
use crate::models::Registration;
use crate::store::{with_timeout, DataStore};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Valid,
    AlreadyUsed,
    CheckFailed,
}

impl TicketStatus {
    /// Failed checks block exactly like duplicates.
    pub fn blocks_submission(&self) -> bool {
        !matches!(self, TicketStatus::Valid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCheck {
    pub status: TicketStatus,
    pub message: String,
    #[serde(skip)]
    pub existing: Option<Registration>,
}

impl TicketCheck {
    fn valid() -> Self {
        Self {
            status: TicketStatus::Valid,
            message: "Ticket is valid".to_string(),
            existing: None,
        }
    }

    fn check_failed() -> Self {
        Self {
            status: TicketStatus::CheckFailed,
            message: FlowError::RemoteCheckFailed.to_string(),
            existing: None,
        }
    }

    pub fn already_used(ticket_id: &str, existing: Option<Registration>) -> Self {
        Self {
            status: TicketStatus::AlreadyUsed,
            message: already_used_message(ticket_id, existing.as_ref()),
            existing,
        }
    }

    /// The blocking reason for a non-valid check.
    pub fn to_flow_error(&self) -> Option<FlowError> {
        match self.status {
            TicketStatus::Valid => None,
            TicketStatus::AlreadyUsed => Some(FlowError::ValidationBlocked(self.message.clone())),
            TicketStatus::CheckFailed => Some(FlowError::RemoteCheckFailed),
        }
    }
}

pub fn already_used_message(ticket_id: &str, existing: Option<&Registration>) -> String {
    match existing {
        Some(reg) => format!(
            "Ticket {ticket_id} was already registered on {}",
            reg.created_at.format("%B %-d, %Y at %H:%M UTC")
        ),
        None => format!("Ticket {ticket_id} was already registered"),
    }
}

/// Read-only duplicate check against the store.
pub struct TicketValidator<'a> {
    store: &'a dyn DataStore,
    timeout: Duration,
}

impl<'a> TicketValidator<'a> {
    pub fn new(store: &'a dyn DataStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Blank tickets short-circuit to `Valid` without a remote call; the
    /// registration workflow rejects them as a required field instead.
    pub async fn validate(&self, ticket_id: &str) -> TicketCheck {
        let ticket_id = ticket_id.trim();
        if ticket_id.is_empty() {
            return TicketCheck::valid();
        }

        match with_timeout(self.timeout, self.store.find_registration_by_ticket(ticket_id)).await {
            Ok(None) => TicketCheck::valid(),
            Ok(Some(existing)) => {
                log::info!("Ticket {ticket_id} already registered as #{}", existing.id);
                TicketCheck::already_used(ticket_id, Some(existing))
            }
            Err(e) => {
                log::error!("Ticket lookup for {ticket_id} failed: {e}");
                TicketCheck::check_failed()
            }
        }
    }
}

/// Result of the on-blur check, shown next to the ticket field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub submit_enabled: bool,
    pub status: Option<TicketStatus>,
    pub message: Option<String>,
}

/// Advisory check for live feedback. A blank field yields no message and leaves
/// submit enabled; a malformed id is reported without a remote call. Never
/// trusted at submit time.
pub async fn advise(validator: &TicketValidator<'_>, ticket_id: &str) -> Advisory {
    if ticket_id.trim().is_empty() {
        return Advisory { submit_enabled: true, status: None, message: None };
    }
    if let Some(message) = validate::validate_ticket_id(ticket_id) {
        return Advisory { submit_enabled: false, status: None, message: Some(message) };
    }
    let check = validator.validate(ticket_id).await;
    Advisory {
        submit_enabled: !check.status.blocks_submission(),
        status: Some(check.status),
        message: Some(check.message),
    }
}
