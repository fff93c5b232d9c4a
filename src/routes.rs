use actix_session::config::{BrowserSession, PersistentSession};
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{time::Duration as CookieDuration, Key};
use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::handlers;

/// Cookie-backed session. Persistent sessions survive a browser restart; browser
/// sessions end with it.
pub fn session_middleware(key: Key, config: &AppConfig) -> SessionMiddleware<CookieSessionStore> {
    let builder = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .cookie_http_only(true);
    if config.session_persistent {
        builder
            .session_lifecycle(
                PersistentSession::default().session_ttl(CookieDuration::hours(config.session_ttl_hours)),
            )
            .build()
    } else {
        builder.session_lifecycle(BrowserSession::default()).build()
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Static files
        .service(actix_files::Files::new("/static", "./static"))
        // Flow pages
        .route("/", web::get().to(handlers::registration_handlers::form))
        .route("/register", web::post().to(handlers::registration_handlers::submit))
        .route("/survey", web::get().to(handlers::survey_handlers::form))
        .route("/survey", web::post().to(handlers::survey_handlers::submit))
        .route("/coupon", web::get().to(handlers::coupon_handlers::show))
        .route("/restart", web::post().to(handlers::coupon_handlers::restart))
        // JSON
        .route("/api/tickets/{ticket}/check", web::get().to(handlers::api_handlers::check_ticket))
        .route("/health", web::get().to(handlers::api_handlers::health))
        // Default 404 handler (must be registered last)
        .default_service(web::to(|| async {
            let html = include_str!("../templates/errors/404.html");
            HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(html)
        }));
}
