use actix_session::Session;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::redirect;
use crate::csrf;
use crate::errors::{render, AppError};
use crate::models::SurveyInput;
use crate::session_cache::pending_registration;
use crate::state::AppState;
use crate::templates_structs::{PageContext, QuestionRow, SurveyTemplate};
use crate::workflow::guard::{current_stage, guard, GuardDecision, Page};
use crate::workflow::{FlowError, SurveyOutcome, SurveyPage, SurveyWorkflow};

#[derive(Deserialize)]
pub struct SurveyForm {
    pub csrf_token: String,
    pub p1: Option<String>,
    pub p2: Option<String>,
    pub p3: Option<String>,
    pub p4: Option<String>,
    pub p5: Option<String>,
    pub p6: Option<String>,
    pub p7: Option<String>,
    pub p8: Option<String>,
    pub feedback: Option<String>,
}

impl SurveyForm {
    fn input(&self) -> SurveyInput {
        SurveyInput {
            p1: self.p1.clone(),
            p2: self.p2.clone(),
            p3: self.p3.clone(),
            p4: self.p4.clone(),
            p5: self.p5.clone(),
            p6: self.p6.clone(),
            p7: self.p7.clone(),
            p8: self.p8.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

/// Banner page shown when the survey is reached without a registration.
/// The `Refresh` header and the template's meta refresh both send the browser back.
fn missing_registration(
    session: &Session,
    state: &AppState,
    redirect_after_secs: u64,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, &state.config);
    let tmpl = SurveyTemplate {
        ctx,
        ticket_id: None,
        questions: Vec::new(),
        feedback: String::new(),
        banner: Some(FlowError::MissingPrecondition.to_string()),
        redirect_after_secs: Some(redirect_after_secs),
    };
    let mut response = render(tmpl)?;
    let refresh = format!("{redirect_after_secs}; url={}", Page::Registration.path());
    if let Ok(value) = HeaderValue::from_str(&refresh) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("refresh"), value);
    }
    Ok(response)
}

/// GET /survey
pub async fn form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if let GuardDecision::Redirect(page) = guard(Page::Survey, current_stage(&session)) {
        return Ok(redirect(page));
    }

    match SurveyWorkflow::load(&session, state.config.redirect_delay_secs) {
        SurveyPage::Ready(pending) => {
            let ctx = PageContext::build(&session, &state.config);
            render(SurveyTemplate {
                ctx,
                ticket_id: Some(pending.ticket_id),
                questions: QuestionRow::all(&SurveyInput::default()),
                feedback: String::new(),
                banner: None,
                redirect_after_secs: None,
            })
        }
        SurveyPage::MissingPrecondition { redirect_after_secs } => {
            missing_registration(&session, &state, redirect_after_secs)
        }
    }
}

/// POST /survey
pub async fn submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<SurveyForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if let GuardDecision::Redirect(page) = guard(Page::Survey, current_stage(&session)) {
        return Ok(redirect(page));
    }

    let input = form.input();
    match state.survey().submit(&input, &session).await {
        SurveyOutcome::Submitted(_) | SurveyOutcome::AlreadySubmitted => Ok(redirect(Page::Coupon)),
        SurveyOutcome::Failed(FlowError::MissingPrecondition) => {
            missing_registration(&session, &state, state.config.redirect_delay_secs)
        }
        SurveyOutcome::Failed(reason) => {
            let ticket_id = pending_registration(&session).map(|p| p.ticket_id);
            let ctx = PageContext::build(&session, &state.config);
            render(SurveyTemplate {
                ctx,
                ticket_id,
                questions: QuestionRow::all(&input),
                feedback: input.feedback.clone().unwrap_or_default(),
                banner: Some(reason.to_string()),
                redirect_after_secs: None,
            })
        }
    }
}
