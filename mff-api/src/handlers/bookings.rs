use actix_web::{web, HttpResponse, Result as ActixResult};
use funnel::validation::validate_booking_request;
use shared_types::{BookingCreatedResponse, BookingRequestPayload, BookingStatus};

use super::{today, validation_failed, SubmissionAppState};
use crate::database::bookings as db;
use crate::jobs::NotificationJob;

pub async fn create_booking(
    state: web::Data<SubmissionAppState>,
    request: web::Json<BookingRequestPayload>,
) -> ActixResult<HttpResponse> {
    let booking = match validate_booking_request(&request, &state.availability, today()) {
        Ok(booking) => booking,
        Err(errors) => return Ok(validation_failed(errors)),
    };

    let id = db::insert_booking(state.db_conn.clone(), &booking)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if let Err(e) = state.queue.enqueue(NotificationJob::Booking { id, booking }) {
        tracing::error!("Failed to queue notifications for booking {}: {}", id, e);
    }

    Ok(HttpResponse::Created().json(BookingCreatedResponse {
        id,
        status: BookingStatus::Pending,
    }))
}
