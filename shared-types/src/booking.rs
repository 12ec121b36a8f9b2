use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::CompanyProfile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Intro-call booking as sent by the calendar modal
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(default)]
pub struct BookingRequestPayload {
    /// ISO date (`YYYY-MM-DD`)
    pub selected_date: String,
    /// Slot start (`HH:MM`)
    pub selected_time: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub storage_consent: bool,
}

impl BookingRequestPayload {
    pub fn has_contact_data(&self) -> bool {
        !self.name.trim().is_empty()
            || !self.company.trim().is_empty()
            || !self.email.trim().is_empty()
            || !self.phone.trim().is_empty()
            || !self.message.trim().is_empty()
    }
}

/// A validated intro-call booking
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct BookingRequest {
    #[ts(type = "string")]
    pub selected_date: NaiveDate,
    #[ts(type = "string")]
    pub selected_time: NaiveTime,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

/// Stored intro-call booking
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalendarBooking {
    pub id: i64,
    #[ts(type = "string")]
    pub selected_date: NaiveDate,
    #[ts(type = "string")]
    pub selected_time: NaiveTime,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub company_research: Option<CompanyProfile>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingCreatedResponse {
    pub id: i64,
    pub status: BookingStatus,
}

/// One cell of the month grid shown by the booking calendar
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct CalendarDay {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub day: u32,
    pub is_current_month: bool,
    pub is_past: bool,
    pub is_weekend: bool,
    pub is_available: bool,
    pub is_today: bool,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalendarMonthResponse {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeSlotsResponse {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub slots: Vec<String>,
}
