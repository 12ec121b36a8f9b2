use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use shared_types::{BookingRequest, BookingRequestPayload, CalendarDay};
use std::time::Instant;
use thiserror::Error;

use crate::availability::{format_slot, month_name_de, parse_slot, AvailabilityError, AvailabilityRule};
use crate::draft_store::{Autosave, DraftError, DraftStorage, DraftStore, BOOKING_DRAFT_KEY};
use crate::validation::{validate_booking_request, ValidationErrors};
use crate::CloseOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BookingStep {
    DateSelection,
    TimeSelection,
    ContactDetails,
}

#[derive(Debug, Error, PartialEq)]
pub enum CalendarError {
    #[error("{0} is not bookable")]
    DateNotSelectable(NaiveDate),
    #[error("no date selected")]
    NoDateSelected,
    #[error("{0} is not an offered slot")]
    InvalidSlot(String),
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

/// The intro-call calendar modal.
///
/// Date and time are picked first; the contact fields are the only part kept
/// as a local draft.
pub struct BookingCalendar<S: DraftStorage> {
    rule: AvailabilityRule,
    drafts: DraftStore<BookingRequestPayload, S>,
    autosave: Autosave,
    is_open: bool,
    step: BookingStep,
    current_year: i32,
    current_month: u32,
    selected_date: Option<NaiveDate>,
    selected_time: Option<NaiveTime>,
    contact: BookingRequestPayload,
    show_close_confirm: bool,
    show_success: bool,
}

impl<S: DraftStorage> BookingCalendar<S> {
    pub fn new(rule: AvailabilityRule, storage: S, today: NaiveDate) -> Self {
        Self {
            rule,
            drafts: DraftStore::new(BOOKING_DRAFT_KEY, storage),
            autosave: Autosave::default(),
            is_open: false,
            step: BookingStep::DateSelection,
            current_year: today.year(),
            current_month: today.month(),
            selected_date: None,
            selected_time: None,
            contact: BookingRequestPayload::default(),
            show_close_confirm: false,
            show_success: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn current_month(&self) -> (i32, u32) {
        (self.current_year, self.current_month)
    }

    pub fn month_title(&self) -> String {
        month_name_de(self.current_year, self.current_month).unwrap_or_default()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<NaiveTime> {
        self.selected_time
    }

    pub fn contact(&self) -> &BookingRequestPayload {
        &self.contact
    }

    pub fn show_success(&self) -> bool {
        self.show_success
    }

    pub fn show_close_confirm(&self) -> bool {
        self.show_close_confirm
    }

    /// Opens on the first month with a bookable weekday and pre-selects it
    pub fn open(&mut self, today: NaiveDate) -> Result<(), DraftError> {
        match self.rule.first_available_date(today) {
            Some(first) => {
                self.current_year = first.year();
                self.current_month = first.month();
                self.selected_date = Some(first);
            }
            None => {
                self.current_year = today.year();
                self.current_month = today.month();
                self.selected_date = None;
            }
        }

        if let Some(draft) = self.drafts.load()? {
            self.contact = BookingRequestPayload {
                selected_date: String::new(),
                selected_time: String::new(),
                ..draft
            };
        }

        self.step = BookingStep::DateSelection;
        self.show_success = false;
        self.show_close_confirm = false;
        self.autosave.reset();
        self.is_open = true;
        Ok(())
    }

    pub fn previous_month(&mut self) {
        self.shift_month(-1);
    }

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    fn shift_month(&mut self, delta: i32) {
        let Some(first) = NaiveDate::from_ymd_opt(self.current_year, self.current_month, 1) else {
            return;
        };
        let shifted = if delta < 0 {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        } else {
            first.checked_add_months(Months::new(delta as u32))
        };
        if let Some(shifted) = shifted {
            self.current_year = shifted.year();
            self.current_month = shifted.month();
        }
    }

    pub fn calendar_days(&self, today: NaiveDate) -> Result<Vec<CalendarDay>, CalendarError> {
        Ok(self
            .rule
            .month_grid(self.current_year, self.current_month, today)?)
    }

    /// Slots shown next to the grid for the selected day
    pub fn time_slots(&self, today: NaiveDate) -> Vec<String> {
        self.selected_date
            .and_then(|date| self.rule.slots_for(date, today))
            .map(|slots| slots.into_iter().map(format_slot).collect())
            .unwrap_or_default()
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), CalendarError> {
        if !self.rule.is_selectable(date, today) {
            return Err(CalendarError::DateNotSelectable(date));
        }
        self.selected_date = Some(date);
        self.step = BookingStep::DateSelection;
        Ok(())
    }

    /// Picking a slot jumps straight to the contact form
    pub fn select_time(&mut self, slot: &str) -> Result<(), CalendarError> {
        if self.selected_date.is_none() {
            return Err(CalendarError::NoDateSelected);
        }
        let time = parse_slot(slot).ok_or_else(|| CalendarError::InvalidSlot(slot.to_string()))?;
        self.selected_time = Some(time);
        self.step = BookingStep::ContactDetails;
        Ok(())
    }

    /// One step back, dropping what belonged to the abandoned step.
    /// Leaving the contact step also overwrites the stored draft.
    pub fn go_back(&mut self) -> Result<(), DraftError> {
        self.step = match self.step {
            BookingStep::DateSelection => return Ok(()),
            BookingStep::TimeSelection => {
                self.selected_time = None;
                BookingStep::DateSelection
            }
            BookingStep::ContactDetails => {
                self.contact = BookingRequestPayload {
                    storage_consent: self.contact.storage_consent,
                    ..BookingRequestPayload::default()
                };
                self.drafts.save(&self.contact)?;
                BookingStep::TimeSelection
            }
        };
        Ok(())
    }

    pub fn update_contact<F>(&mut self, mutate: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut BookingRequestPayload),
    {
        mutate(&mut self.contact);
        self.drafts.save(&self.contact)?;
        Ok(())
    }

    pub fn set_storage_consent(&mut self, consent: bool) -> Result<(), DraftError> {
        self.contact.storage_consent = consent;
        self.drafts.apply_consent(&self.contact)
    }

    pub fn tick(&mut self, now: Instant) -> Result<bool, DraftError> {
        if !self.is_open || !self.autosave.due(now) {
            return Ok(false);
        }
        self.drafts.save(&self.contact)
    }

    pub fn request_close(&mut self) -> CloseOutcome {
        if self.step == BookingStep::ContactDetails && self.contact.has_contact_data() {
            self.show_close_confirm = true;
            CloseOutcome::NeedsConfirmation
        } else {
            self.close();
            CloseOutcome::Closed
        }
    }

    pub fn confirm_close(&mut self) {
        self.close();
    }

    pub fn cancel_close(&mut self) {
        self.show_close_confirm = false;
    }

    fn close(&mut self) {
        self.is_open = false;
        self.show_close_confirm = false;
        self.step = BookingStep::DateSelection;
        self.selected_date = None;
        self.selected_time = None;
        self.contact = BookingRequestPayload::default();
        self.show_success = false;
    }

    /// The payload that goes to the server
    pub fn payload(&self) -> BookingRequestPayload {
        BookingRequestPayload {
            selected_date: self
                .selected_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            selected_time: self.selected_time.map(format_slot).unwrap_or_default(),
            ..self.contact.clone()
        }
    }

    pub fn submit(&self, today: NaiveDate) -> Result<BookingRequest, ValidationErrors> {
        validate_booking_request(&self.payload(), &self.rule, today)
    }

    pub fn complete_submission(&mut self) -> Result<(), DraftError> {
        self.show_success = true;
        self.drafts.clear()
    }
}
