use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::CompanyProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    #[default]
    General,
    Booking,
    Partnership,
    Other,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Booking => "booking",
            InquiryType::Partnership => "partnership",
            InquiryType::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(InquiryType::General),
            "booking" => Some(InquiryType::Booking),
            "partnership" => Some(InquiryType::Partnership),
            "other" => Some(InquiryType::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryType::General => "Allgemeine Anfrage",
            InquiryType::Booking => "Buchungsanfrage",
            InquiryType::Partnership => "Partnerschaft",
            InquiryType::Other => "Sonstiges",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    New,
    InProgress,
    Done,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(SubmissionStatus::New),
            "in_progress" => Some(SubmissionStatus::InProgress),
            "done" => Some(SubmissionStatus::Done),
            _ => None,
        }
    }
}

/// Contact form as sent by the client. The inquiry type stays a string so an
/// unknown value becomes a field error instead of a malformed payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(default)]
pub struct ContactSubmissionPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub inquiry_type: String,
    pub message: String,
    pub storage_consent: bool,
}

impl Default for ContactSubmissionPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            inquiry_type: InquiryType::General.as_str().to_string(),
            message: String::new(),
            storage_consent: false,
        }
    }
}

/// A validated contact form submission, not yet stored
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub status: SubmissionStatus,
    pub company_research: Option<CompanyProfile>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactSubmissionCreatedResponse {
    pub id: i64,
    pub status: SubmissionStatus,
}
