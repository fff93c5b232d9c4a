pub mod api_handlers;
pub mod coupon_handlers;
pub mod registration_handlers;
pub mod survey_handlers;

use actix_web::HttpResponse;

use crate::workflow::Page;

pub fn redirect(page: Page) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", page.path()))
        .insert_header(("Cache-Control", "no-store"))
        .finish()
}
