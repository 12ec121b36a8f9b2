use crate::database::bookings as bookings_db;
use crate::database::contact_submissions as contacts_db;
use crate::database::AsyncDbConnection;
use crate::integrations::email_templates::{EmailTemplates, RenderedEmail};
use crate::integrations::{
    EmailAddress, IntegrationError, Mailer, OutgoingEmail, SheetTarget, SpreadsheetSink,
};
use chrono::NaiveDateTime;
use mff_agents::CompanyResearchAgent;
use shared_types::{BookingRequest, CompanyProfile, EventRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::NotificationJob;

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOutcome {
    Done,
    Skipped,
    Failed(String),
}

impl ChannelOutcome {
    fn from_result(channel: &str, result: Result<(), IntegrationError>) -> Self {
        match result {
            Ok(()) => ChannelOutcome::Done,
            Err(IntegrationError::NotConfigured(what)) => {
                tracing::info!("Skipping {}: {} is not configured", channel, what);
                ChannelOutcome::Skipped
            }
            Err(e) => {
                tracing::error!("{} failed: {}", channel, e);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }
}

/// What happened on each channel of one job
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub research: ChannelOutcome,
    pub email: ChannelOutcome,
    pub sheets: ChannelOutcome,
}

impl DispatchReport {
    pub fn log(&self, job_id: Uuid) {
        tracing::info!(
            "Notification job {} finished: research={:?} email={:?} sheets={:?}",
            job_id,
            self.research,
            self.email,
            self.sheets
        );
    }
}

/// Runs research, email and spreadsheet delivery for accepted submissions.
///
/// Channels are independent: a failing mailer never stops the row append
/// and neither of them can undo the already stored record.
pub struct NotificationDispatcher {
    db_conn: AsyncDbConnection,
    mailer: Arc<dyn Mailer>,
    sheets: Arc<dyn SpreadsheetSink>,
    research: CompanyResearchAgent,
    templates: EmailTemplates,
    recipients: Vec<String>,
}

impl NotificationDispatcher {
    pub fn new(
        db_conn: AsyncDbConnection,
        mailer: Arc<dyn Mailer>,
        sheets: Arc<dyn SpreadsheetSink>,
        research: CompanyResearchAgent,
        templates: EmailTemplates,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            db_conn,
            mailer,
            sheets,
            research,
            templates,
            recipients,
        }
    }

    pub async fn dispatch(&self, job: &NotificationJob) -> DispatchReport {
        let (research, profile) = self.run_research(job).await;
        let email = self.send_email(job, profile.as_ref()).await;
        let sheets = self.append_row(job).await;

        DispatchReport {
            research,
            email,
            sheets,
        }
    }

    async fn run_research(&self, job: &NotificationJob) -> (ChannelOutcome, Option<CompanyProfile>) {
        let company = match job {
            NotificationJob::EventRequest(request) => Some(request.company.as_str()),
            NotificationJob::Booking { booking, .. } => Some(booking.company.as_str()),
            NotificationJob::Contact { submission, .. } => submission.company.as_deref(),
        };
        let Some(company) = company.filter(|c| !c.trim().is_empty()) else {
            return (ChannelOutcome::Skipped, None);
        };
        if !self.research.is_enabled() {
            return (ChannelOutcome::Skipped, None);
        }

        let Some(profile) = self.research.research(company).await else {
            return (ChannelOutcome::Skipped, None);
        };

        let stored = match job {
            NotificationJob::Booking { id, .. } => {
                bookings_db::set_company_research(self.db_conn.clone(), *id, &profile).await
            }
            NotificationJob::Contact { id, .. } => {
                contacts_db::set_company_research(self.db_conn.clone(), *id, &profile).await
            }
            NotificationJob::EventRequest(_) => Ok(()),
        };
        if let Err(e) = stored {
            tracing::warn!("Failed to store company research for {}: {}", company, e);
        }

        (ChannelOutcome::Done, Some(profile))
    }

    async fn send_email(&self, job: &NotificationJob, profile: Option<&CompanyProfile>) -> ChannelOutcome {
        let (rendered, reply_to) = match job {
            NotificationJob::EventRequest(request) => (
                self.templates.event_request(request, profile),
                EmailAddress {
                    email: request.email.clone(),
                    name: Some(request.full_name()),
                },
            ),
            NotificationJob::Booking { booking, .. } => (
                self.templates.booking(booking, profile),
                EmailAddress {
                    email: booking.email.clone(),
                    name: Some(booking.name.clone()),
                },
            ),
            NotificationJob::Contact { submission, .. } => (
                self.templates.contact(submission, profile),
                EmailAddress {
                    email: submission.email.clone(),
                    name: Some(submission.name.clone()),
                },
            ),
        };

        let result = match rendered {
            Ok(RenderedEmail { subject, html }) => {
                let email = OutgoingEmail {
                    to: self.recipients.clone(),
                    reply_to: Some(reply_to),
                    subject,
                    html,
                };
                self.mailer.send(&email).await
            }
            Err(e) => Err(e),
        };

        ChannelOutcome::from_result("notification email", result)
    }

    async fn append_row(&self, job: &NotificationJob) -> ChannelOutcome {
        let now = chrono::Local::now().naive_local();
        let (target, row) = match job {
            NotificationJob::EventRequest(request) => {
                (SheetTarget::EventRequests, event_request_row(request, now))
            }
            NotificationJob::Booking { booking, .. } => (SheetTarget::Bookings, booking_row(booking, now)),
            NotificationJob::Contact { .. } => return ChannelOutcome::Skipped,
        };

        ChannelOutcome::from_result("spreadsheet append", self.sheets.append_row(target, row).await)
    }
}

/// Leading `'` keeps Sheets from reading `+49 ...` as a formula
fn sheet_phone(phone: Option<&str>) -> String {
    match phone.map(str::trim).filter(|p| !p.is_empty()) {
        Some(phone) => format!("'{}", phone),
        None => "-".to_string(),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Columns A-M of the event request sheet
pub fn event_request_row(request: &EventRequest, received_at: NaiveDateTime) -> Vec<String> {
    vec![
        received_at.format("%Y-%m-%d %H:%M").to_string(),
        request.full_name(),
        request.email.clone(),
        sheet_phone(request.phone.as_deref()),
        request.city.clone(),
        request.date.format("%Y-%m-%d").to_string(),
        request.guests.label().to_string(),
        request.package.label().to_string(),
        // music style, not collected
        "-".to_string(),
        request
            .budget
            .clone()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| "Nicht angegeben".to_string()),
        or_dash(request.message.as_deref()),
        "Neu".to_string(),
        or_dash(Some(request.company.as_str())),
    ]
}

/// Columns A-H of the bookings sheet
pub fn booking_row(booking: &BookingRequest, received_at: NaiveDateTime) -> Vec<String> {
    vec![
        received_at.format("%Y-%m-%d %H:%M").to_string(),
        booking.name.clone(),
        booking.email.clone(),
        sheet_phone(Some(booking.phone.as_str())),
        booking.selected_date.format("%Y-%m-%d").to_string(),
        booking.selected_time.format("%H:%M").to_string(),
        or_dash(booking.message.as_deref()),
        "Neu".to_string(),
    ]
}
