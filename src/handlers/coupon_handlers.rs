use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::redirect;
use crate::csrf;
use crate::errors::{render, AppError};
use crate::state::AppState;
use crate::templates_structs::{CouponTemplate, PageContext};
use crate::workflow::guard::{current_stage, guard, reset, FlowStage, GuardDecision, Page};

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// GET /coupon
pub async fn show(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if let GuardDecision::Redirect(page) = guard(Page::Coupon, current_stage(&session)) {
        return Ok(redirect(page));
    }

    let view = state.coupons().present(&session).await;
    let ctx = PageContext::build(&session, &state.config);
    render(CouponTemplate::new(ctx, view))
}

/// POST /restart
/// Ends a completed flow so the browser can register another ticket.
pub async fn restart(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let stage = current_stage(&session);
    if stage != FlowStage::Surveyed {
        log::warn!("Restart refused while {stage}");
        return Ok(redirect(Page::Registration));
    }
    reset(&session);
    Ok(redirect(Page::Registration))
}
