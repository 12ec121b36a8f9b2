pub mod brevo;
pub mod email_templates;
pub mod google_sheets;
pub mod photon;

use async_trait::async_trait;
use shared_types::CitySuggestion;
use thiserror::Error;

pub use brevo::BrevoMailer;
pub use google_sheets::GoogleSheetsClient;
pub use photon::PhotonClient;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} answered with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("template rendering failed: {0}")]
    Template(String),
}

/// A fully rendered internal notification
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub reply_to: Option<EmailAddress>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

/// Which spreadsheet/range a row goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTarget {
    EventRequests,
    Bookings,
}

impl SheetTarget {
    pub fn range(&self) -> &'static str {
        match self {
            SheetTarget::EventRequests => "A:M",
            SheetTarget::Bookings => "Bookings!A:H",
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), IntegrationError>;
}

#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    async fn append_row(&self, target: SheetTarget, row: Vec<String>) -> Result<(), IntegrationError>;
}

#[async_trait]
pub trait CitySearch: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<CitySuggestion>, IntegrationError>;
}

/// Read up to a few hundred bytes of an error body for the log
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > 300 {
        let mut cut = 300;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
