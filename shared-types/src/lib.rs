use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

pub mod booking;
pub mod company_profile;
pub mod contact;
pub mod event_request;
pub mod settings;

pub use booking::{
    BookingCreatedResponse, BookingRequest, BookingRequestPayload, BookingStatus,
    CalendarBooking, CalendarDay, CalendarMonthResponse, TimeSlotsResponse,
};
pub use company_profile::{CompanyProfile, ProfileLink};
pub use contact::{
    ContactSubmission, ContactSubmissionCreatedResponse, ContactSubmissionPayload, InquiryType,
    NewContactSubmission, SubmissionStatus,
};
pub use event_request::{
    EventRequest, EventRequestAcceptedResponse, EventRequestPayload, GuestCount, Package,
    TimeWindow,
};
pub use settings::{IntegrationStatus, SettingsResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// Field-keyed validation errors, returned with `422`
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationErrorResponse {
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Autocomplete suggestion for the event city field
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct CitySuggestion {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CitySuggestionsResponse {
    pub suggestions: Vec<CitySuggestion>,
}
