use actix_web::{web, HttpResponse, Result as ActixResult};
use funnel::validation::validate_contact_submission;
use shared_types::{ContactSubmissionCreatedResponse, ContactSubmissionPayload, SubmissionStatus};

use super::{validation_failed, SubmissionAppState};
use crate::database::contact_submissions as db;
use crate::jobs::NotificationJob;

pub async fn create_contact_submission(
    state: web::Data<SubmissionAppState>,
    request: web::Json<ContactSubmissionPayload>,
) -> ActixResult<HttpResponse> {
    let submission = match validate_contact_submission(&request) {
        Ok(submission) => submission,
        Err(errors) => return Ok(validation_failed(errors)),
    };

    let id = db::insert_contact_submission(state.db_conn.clone(), &submission)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if let Err(e) = state.queue.enqueue(NotificationJob::Contact { id, submission }) {
        tracing::error!("Failed to queue notifications for contact submission {}: {}", id, e);
    }

    Ok(HttpResponse::Created().json(ContactSubmissionCreatedResponse {
        id,
        status: SubmissionStatus::New,
    }))
}
