use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::redirect;
use crate::csrf;
use crate::errors::{render, AppError};
use crate::models::RegistrationInput;
use crate::state::AppState;
use crate::templates_structs::{PageContext, RegistrationTemplate};
use crate::workflow::guard::{current_stage, guard, GuardDecision, Page};
use crate::workflow::RegistrationState;

#[derive(Deserialize)]
pub struct RegistrationForm {
    pub csrf_token: String,
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub referral_source: String,
}

impl RegistrationForm {
    fn input(&self) -> RegistrationInput {
        RegistrationInput {
            ticket_id: self.ticket_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            referral_source: self.referral_source.clone(),
        }
    }
}

/// GET /
pub async fn form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if let GuardDecision::Redirect(page) = guard(Page::Registration, current_stage(&session)) {
        return Ok(redirect(page));
    }

    let ctx = PageContext::build(&session, &state.config);
    render(RegistrationTemplate::new(ctx, RegistrationInput::default(), &RegistrationState::Editing))
}

/// POST /register
pub async fn submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<RegistrationForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // A stale form from earlier in the flow must not register a second ticket.
    if let GuardDecision::Redirect(page) = guard(Page::Registration, current_stage(&session)) {
        log::info!("Registration submit after stage change; redirecting to {}", page.path());
        return Ok(redirect(page));
    }

    let input = form.input();
    let outcome = state.registration().submit(&input, &session).await;

    if let RegistrationState::Submitted(_) = outcome {
        return Ok(redirect(Page::Survey));
    }

    let ctx = PageContext::build(&session, &state.config);
    render(RegistrationTemplate::new(ctx, input.trimmed(), &outcome))
}
