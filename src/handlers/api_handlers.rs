use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;
use crate::store::with_timeout;
use crate::workflow::validator::advise;

/// GET /api/tickets/{ticket}/check
/// Advisory duplicate check for the ticket field's blur handler.
pub async fn check_ticket(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let ticket_id = path.into_inner();
    let advisory = advise(&state.validator(), &ticket_id).await;
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(advisory)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    store: String,
    coupon_mode: String,
}

/// GET /health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let reachable = with_timeout(state.config.remote_timeout, state.store.count_unused_coupons())
        .await
        .map_err(|e| log::warn!("Health check store call failed: {e}"))
        .is_ok();
    let body = Health {
        status: if reachable { "ok" } else { "degraded" },
        store: state.config.store_backend.to_string(),
        coupon_mode: state.config.coupon_mode.to_string(),
    };
    if reachable {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
