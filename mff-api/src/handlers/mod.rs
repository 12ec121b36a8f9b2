pub mod bookings;
pub mod calendar;
pub mod cities;
pub mod contact;
pub mod event_requests;
pub mod settings;

use crate::database::AsyncDbConnection;
use crate::helpers::rate_limiter::SubmissionRateLimiter;
use crate::integrations::CitySearch;
use crate::jobs::NotificationQueue;
use actix_web::HttpResponse;
use funnel::{AvailabilityRule, ValidationErrors};
use shared_types::ValidationErrorResponse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared by the three submission endpoints
#[derive(Clone)]
pub struct SubmissionAppState {
    pub db_conn: AsyncDbConnection,
    pub queue: NotificationQueue,
    pub availability: AvailabilityRule,
    pub rate_limiter: Arc<SubmissionRateLimiter>,
}

#[derive(Clone)]
pub struct CitiesAppState {
    pub search: Arc<dyn CitySearch>,
}

pub fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ValidationErrorResponse {
        errors: errors.into_map(),
    })
}

pub fn field_error(field: &str, message: &str) -> ValidationErrorResponse {
    let mut errors = BTreeMap::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    ValidationErrorResponse { errors }
}

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
