use askama::Template;

use super::PageContext;
use crate::models::registration::REFERRAL_SOURCES;
use crate::models::RegistrationInput;
use crate::workflow::{Field, RegistrationState};

pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

/// One message slot per form control.
#[derive(Debug, Default, PartialEq)]
pub struct FormErrors {
    pub ticket_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub referral_source: Option<String>,
    pub submit: Option<String>,
}

impl FormErrors {
    pub fn from_state(state: &RegistrationState) -> Self {
        let mut errors = FormErrors::default();
        let (field, message) = match state {
            RegistrationState::Blocked { field, reason } => (*field, reason.to_string()),
            RegistrationState::Failed(reason) => (Field::Submit, reason.to_string()),
            _ => return errors,
        };
        let slot = match field {
            Field::TicketId => &mut errors.ticket_id,
            Field::Name => &mut errors.name,
            Field::Email => &mut errors.email,
            Field::Phone => &mut errors.phone,
            Field::ReferralSource => &mut errors.referral_source,
            Field::Submit => &mut errors.submit,
        };
        *slot = Some(message);
        errors
    }
}

#[derive(Template)]
#[template(path = "registration.html")]
pub struct RegistrationTemplate {
    pub ctx: PageContext,
    pub values: RegistrationInput,
    pub referral_options: Vec<SelectOption>,
    pub errors: FormErrors,
    pub submit_enabled: bool,
}

impl RegistrationTemplate {
    pub fn new(ctx: PageContext, values: RegistrationInput, state: &RegistrationState) -> Self {
        let referral_options = REFERRAL_SOURCES
            .iter()
            .map(|&value| SelectOption { value, selected: values.referral_source == value })
            .collect();
        Self {
            ctx,
            values,
            referral_options,
            errors: FormErrors::from_state(state),
            submit_enabled: state.submit_enabled(),
        }
    }
}
