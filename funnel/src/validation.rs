//! Field validation shared by the client-side step gates and the server.
//!
//! Every check reports into a [`ValidationErrors`] map keyed by the payload's
//! field names, so the server can return exactly what the form shows inline.

use chrono::{Months, NaiveDate};
use regex::Regex;
use shared_types::{
    BookingRequest, BookingRequestPayload, ContactSubmissionPayload, EventRequest,
    EventRequestPayload, InquiryType, NewContactSubmission,
};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::availability::{parse_slot, AvailabilityRule};

/// Event dates may lie at most this far ahead
pub const MAX_EVENT_YEARS_AHEAD: u32 = 5;
pub const MAX_BOOKING_MESSAGE_CHARS: usize = 500;
pub const MAX_CONTACT_FIELD_CHARS: usize = 255;

pub const MSG_DATE: &str = "Bitte wähle ein Datum das in der Zukunft liegt";
pub const MSG_DATE_TOO_FAR: &str = "Bitte wähle ein Datum innerhalb der nächsten 5 Jahre";
pub const MSG_CITY: &str = "Bitte gib eine Stadt an";
pub const MSG_GUESTS: &str = "Bitte wähle eine Gästeanzahl";
pub const MSG_PACKAGE: &str = "Bitte wähle ein Paket";
pub const MSG_FIRST_NAME: &str = "Bitte gib deinen Vornamen an";
pub const MSG_NAME: &str = "Bitte gib deinen Namen an";
pub const MSG_COMPANY: &str = "Bitte gib deine Firma an";
pub const MSG_EMAIL: &str = "Bitte gib eine gültige E-Mail an";
pub const MSG_PHONE: &str = "Bitte gib eine gültige Telefonnummer an";
pub const MSG_PRIVACY: &str = "Bitte akzeptiere die Datenschutzerklärung";
pub const MSG_BOOKING_DATE: &str = "Bitte wähle einen verfügbaren Werktag";
pub const MSG_BOOKING_TIME: &str = "Bitte wähle eine verfügbare Uhrzeit";
pub const MSG_BOOKING_MESSAGE: &str = "Die Nachricht darf maximal 500 Zeichen lang sein";
pub const MSG_TOO_LONG: &str = "Die Eingabe darf maximal 255 Zeichen lang sein";
pub const MSG_INQUIRY_TYPE: &str = "Bitte wähle eine gültige Anfrageart";
pub const MSG_MESSAGE: &str = "Bitte gib eine Nachricht ein";

fn email_re() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?)+$",
        )
        .expect("email regex compiles")
    })
}

fn phone_re() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(r"^\+?[0-9 ()/.\-]+$").expect("phone regex compiles"))
}

/// Field-keyed error messages
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.len() <= 254 && !value.contains("..") && email_re().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    phone_re().is_match(value) && (6..=20).contains(&digits)
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Wizard step 1: date, city and guest bucket
pub fn validate_event_details(
    payload: &EventRequestPayload,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match parse_iso_date(&payload.date) {
        None => errors.add("date", MSG_DATE),
        Some(date) if date < today => errors.add("date", MSG_DATE),
        Some(date) => {
            let latest = today.checked_add_months(Months::new(12 * MAX_EVENT_YEARS_AHEAD));
            if latest.is_some_and(|latest| date > latest) {
                errors.add("date", MSG_DATE_TOO_FAR);
            }
        }
    }

    if !has_min_chars(&payload.city, 2) {
        errors.add("city", MSG_CITY);
    }

    if payload.guests.is_none() {
        errors.add("guests", MSG_GUESTS);
    }

    errors.into_result()
}

/// Wizard step 2: a package must be chosen
pub fn validate_package(payload: &EventRequestPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if payload.package.is_none() {
        errors.add("package", MSG_PACKAGE);
    }
    errors.into_result()
}

/// Wizard step 3: contact details and privacy acceptance
pub fn validate_contact_details(payload: &EventRequestPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !has_min_chars(&payload.first_name, 2) {
        errors.add("first_name", MSG_FIRST_NAME);
    }
    if !has_min_chars(&payload.company, 2) {
        errors.add("company", MSG_COMPANY);
    }
    if !is_valid_email(&payload.email) {
        errors.add("email", MSG_EMAIL);
    }
    if !payload.phone.trim().is_empty() && !is_valid_phone(&payload.phone) {
        errors.add("phone", MSG_PHONE);
    }
    if !payload.privacy_accepted {
        errors.add("privacy_accepted", MSG_PRIVACY);
    }

    errors.into_result()
}

/// Full event request check, all steps at once
pub fn validate_event_request(
    payload: &EventRequestPayload,
    today: NaiveDate,
) -> Result<EventRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for result in [
        validate_event_details(payload, today),
        validate_package(payload),
        validate_contact_details(payload),
    ] {
        if let Err(step_errors) = result {
            errors.merge(step_errors);
        }
    }

    let (date, guests, package) = match (
        parse_iso_date(&payload.date),
        payload.guests,
        payload.package,
    ) {
        (Some(date), Some(guests), Some(package)) if errors.is_empty() => (date, guests, package),
        _ => return Err(errors),
    };

    Ok(EventRequest {
        date,
        time_window: payload.time_window,
        city: payload.city.trim().to_string(),
        budget: non_blank(&payload.budget),
        guests,
        package,
        first_name: payload.first_name.trim().to_string(),
        last_name: non_blank(&payload.last_name),
        company: payload.company.trim().to_string(),
        email: payload.email.trim().to_string(),
        phone: non_blank(&payload.phone),
        message: non_blank(&payload.message),
        storage_consent: payload.storage_consent,
    })
}

/// Intro-call booking check
pub fn validate_booking_request(
    payload: &BookingRequestPayload,
    rule: &AvailabilityRule,
    today: NaiveDate,
) -> Result<BookingRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let date = parse_iso_date(&payload.selected_date).filter(|d| rule.is_selectable(*d, today));
    if date.is_none() {
        errors.add("selected_date", MSG_BOOKING_DATE);
    }

    let time = parse_slot(&payload.selected_time);
    if time.is_none() {
        errors.add("selected_time", MSG_BOOKING_TIME);
    }

    if !has_min_chars(&payload.name, 2) {
        errors.add("name", MSG_NAME);
    }
    if !has_min_chars(&payload.company, 2) {
        errors.add("company", MSG_COMPANY);
    }
    if !is_valid_email(&payload.email) {
        errors.add("email", MSG_EMAIL);
    }
    if !is_valid_phone(&payload.phone) {
        errors.add("phone", MSG_PHONE);
    }
    if payload.message.chars().count() > MAX_BOOKING_MESSAGE_CHARS {
        errors.add("message", MSG_BOOKING_MESSAGE);
    }

    match (date, time) {
        (Some(selected_date), Some(selected_time)) if errors.is_empty() => Ok(BookingRequest {
            selected_date,
            selected_time,
            name: payload.name.trim().to_string(),
            company: payload.company.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            message: non_blank(&payload.message),
        }),
        _ => Err(errors),
    }
}

/// Contact form check
pub fn validate_contact_submission(
    payload: &ContactSubmissionPayload,
) -> Result<NewContactSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if payload.name.trim().is_empty() {
        errors.add("name", MSG_NAME);
    } else if payload.name.trim().chars().count() > MAX_CONTACT_FIELD_CHARS {
        errors.add("name", MSG_TOO_LONG);
    }
    if !is_valid_email(&payload.email) {
        errors.add("email", MSG_EMAIL);
    }
    if !payload.phone.trim().is_empty() && !is_valid_phone(&payload.phone) {
        errors.add("phone", MSG_PHONE);
    }
    if payload.company.trim().chars().count() > MAX_CONTACT_FIELD_CHARS {
        errors.add("company", MSG_TOO_LONG);
    }
    let inquiry_type = InquiryType::parse(payload.inquiry_type.trim());
    if inquiry_type.is_none() {
        errors.add("inquiry_type", MSG_INQUIRY_TYPE);
    }
    if payload.message.trim().is_empty() {
        errors.add("message", MSG_MESSAGE);
    }

    match inquiry_type {
        Some(inquiry_type) if errors.is_empty() => Ok(NewContactSubmission {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: non_blank(&payload.phone),
            company: non_blank(&payload.company),
            inquiry_type,
            message: payload.message.trim().to_string(),
        }),
        _ => Err(errors),
    }
}
