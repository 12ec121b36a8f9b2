pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod integrations;
pub mod jobs;

pub use database::Database;

use actix_web::{error, web, HttpResponse, Responder};
use shared_types::ErrorResponse;
use std::sync::Arc;

async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    if db.is_healthy().await {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        }))
    }
}

/// Malformed JSON bodies get a plain `400`, not a field error list
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = err.to_string();
            let response = HttpResponse::BadRequest().json(ErrorResponse {
                error: message.clone(),
            });
            error::InternalError::from_response(message, response).into()
        })
}

/// Every route of the API. The caller registers the app data the handlers
/// expect: `Arc<Database>`, `SubmissionAppState`, `CitiesAppState` and
/// `SettingsAppState`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/settings", web::get().to(handlers::settings::get_settings))
        .route(
            "/api/event-requests",
            web::post().to(handlers::event_requests::create_event_request),
        )
        .route("/api/bookings", web::post().to(handlers::bookings::create_booking))
        .route(
            "/api/contact",
            web::post().to(handlers::contact::create_contact_submission),
        )
        .route("/api/calendar", web::get().to(handlers::calendar::get_month))
        .route("/api/calendar/slots", web::get().to(handlers::calendar::get_slots))
        .route("/api/cities", web::get().to(handlers::cities::suggest_cities));
}
