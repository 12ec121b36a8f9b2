use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use funnel::validation::validate_event_request;
use shared_types::{EventRequestAcceptedResponse, EventRequestPayload};

use super::{field_error, today, validation_failed, SubmissionAppState};
use crate::jobs::NotificationJob;

pub const MSG_RATE_LIMITED: &str = "Zu viele Anfragen. Bitte versuchen Sie es später erneut.";

pub async fn create_event_request(
    state: web::Data<SubmissionAppState>,
    request: web::Json<EventRequestPayload>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if !state.rate_limiter.check_request(&req) {
        return Ok(HttpResponse::TooManyRequests().json(field_error("email", MSG_RATE_LIMITED)));
    }

    let event_request = match validate_event_request(&request, today()) {
        Ok(event_request) => event_request,
        Err(errors) => return Ok(validation_failed(errors)),
    };

    let job_id = state
        .queue
        .enqueue(NotificationJob::EventRequest(event_request))
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;
    tracing::info!("Event request accepted, notification job {}", job_id);

    Ok(HttpResponse::Accepted().json(EventRequestAcceptedResponse {
        status: "accepted".to_string(),
    }))
}
