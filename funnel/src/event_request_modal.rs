use chrono::NaiveDate;
use shared_types::{EventRequest, EventRequestPayload};
use std::time::Instant;

use crate::draft_store::{
    Autosave, DraftError, DraftStorage, DraftStore, EVENT_REQUEST_DRAFT_KEY,
};
use crate::wizard::{Wizard, WizardError, WizardStep};
use crate::CloseOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

/// The event request ("calculator") modal: wizard + draft + close handling
pub struct EventRequestModal<S: DraftStorage> {
    wizard: Wizard,
    drafts: DraftStore<EventRequestPayload, S>,
    autosave: Autosave,
    is_open: bool,
    show_close_confirm: bool,
    submit_status: SubmitStatus,
}

impl<S: DraftStorage> EventRequestModal<S> {
    pub fn new(storage: S) -> Self {
        Self::with_autosave(storage, Autosave::default())
    }

    pub fn with_autosave(storage: S, autosave: Autosave) -> Self {
        Self {
            wizard: Wizard::new(),
            drafts: DraftStore::new(EVENT_REQUEST_DRAFT_KEY, storage),
            autosave,
            is_open: false,
            show_close_confirm: false,
            submit_status: SubmitStatus::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn data(&self) -> &EventRequestPayload {
        &self.wizard.data
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.submit_status
    }

    pub fn show_close_confirm(&self) -> bool {
        self.show_close_confirm
    }

    /// Opens at step one; a consented draft fills the fields
    pub fn open(&mut self) -> Result<(), DraftError> {
        if self.submit_status == SubmitStatus::Success {
            self.wizard = Wizard::new();
            self.submit_status = SubmitStatus::Idle;
        }

        if let Some(draft) = self.drafts.load()? {
            self.wizard.data = draft;
        }

        self.wizard.rewind();
        self.autosave.reset();
        self.show_close_confirm = false;
        self.is_open = true;
        Ok(())
    }

    /// Close request from the overlay, the X button or Escape
    pub fn request_close(&mut self) -> CloseOutcome {
        let unsaved = self.submit_status != SubmitStatus::Success && self.wizard.data.has_data();
        if unsaved {
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

    /// Discards the in-memory answers; a consented draft survives in storage
    fn close(&mut self) {
        self.is_open = false;
        self.show_close_confirm = false;
        if self.submit_status != SubmitStatus::Success {
            self.wizard = Wizard::new();
        }
    }

    /// Field mutation; persisted right away when consent is given
    pub fn update<F>(&mut self, mutate: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut EventRequestPayload),
    {
        mutate(&mut self.wizard.data);
        self.drafts.save(&self.wizard.data)?;
        Ok(())
    }

    pub fn set_storage_consent(&mut self, consent: bool) -> Result<(), DraftError> {
        self.wizard.data.storage_consent = consent;
        self.drafts.apply_consent(&self.wizard.data)
    }

    /// Periodic autosave; returns whether a save happened
    pub fn tick(&mut self, now: Instant) -> Result<bool, DraftError> {
        if !self.is_open || !self.autosave.due(now) {
            return Ok(false);
        }
        self.drafts.save(&self.wizard.data)
    }

    pub fn next_step(&mut self, today: NaiveDate) -> Result<WizardStep, WizardError> {
        self.wizard.next(today)
    }

    pub fn prev_step(&mut self) -> WizardStep {
        self.wizard.back()
    }

    /// Validates the final step. The caller sends the request and reports back
    /// with `complete_submission` or `fail_submission`.
    pub fn submit(&mut self, today: NaiveDate) -> Result<EventRequest, WizardError> {
        let result = self.wizard.submit(today);
        if result.is_err() {
            self.submit_status = SubmitStatus::Error;
        }
        result
    }

    pub fn complete_submission(&mut self) -> Result<(), DraftError> {
        self.wizard.mark_submitted();
        self.submit_status = SubmitStatus::Success;
        self.drafts.clear()
    }

    pub fn fail_submission(&mut self) {
        self.submit_status = SubmitStatus::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft_store::{DraftStorage, MemoryStorage};
    use shared_types::{GuestCount, Package};
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn fill_step_one(modal: &mut EventRequestModal<MemoryStorage>) {
        modal
            .update(|data| {
                data.date = "2027-05-21".to_string();
                data.city = "Hamburg".to_string();
                data.guests = Some(GuestCount::From300To500);
            })
            .unwrap();
    }

    #[test]
    fn test_reopen_restores_data_at_step_one() {
        let storage = MemoryStorage::new();
        let mut modal = EventRequestModal::new(storage.clone());
        modal.open().unwrap();
        modal.set_storage_consent(true).unwrap();
        fill_step_one(&mut modal);
        modal.next_step(today()).unwrap();
        modal.update(|data| data.package = Some(Package::Band)).unwrap();
        modal.next_step(today()).unwrap();
        assert_eq!(modal.step(), WizardStep::ContactDetails);

        assert_eq!(modal.request_close(), CloseOutcome::NeedsConfirmation);
        modal.confirm_close();
        assert!(!modal.is_open());

        modal.open().unwrap();
        assert_eq!(modal.step(), WizardStep::EventDetails);
        assert_eq!(modal.data().city, "Hamburg");
        assert_eq!(modal.data().package, Some(Package::Band));
        assert!(modal.data().storage_consent);
    }

    #[test]
    fn test_reopen_without_consent_starts_empty() {
        let storage = MemoryStorage::new();
        let mut modal = EventRequestModal::new(storage.clone());
        modal.open().unwrap();
        fill_step_one(&mut modal);

        assert_eq!(modal.request_close(), CloseOutcome::NeedsConfirmation);
        modal.confirm_close();
        modal.open().unwrap();

        assert!(!modal.data().has_data());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_close_without_data_is_silent() {
        let mut modal = EventRequestModal::new(MemoryStorage::new());
        modal.open().unwrap();
        assert_eq!(modal.request_close(), CloseOutcome::Closed);
        assert!(!modal.is_open());
        assert!(!modal.show_close_confirm());
    }

    #[test]
    fn test_cancel_close_keeps_modal_open() {
        let mut modal = EventRequestModal::new(MemoryStorage::new());
        modal.open().unwrap();
        fill_step_one(&mut modal);

        modal.request_close();
        assert!(modal.show_close_confirm());
        modal.cancel_close();
        assert!(modal.is_open());
        assert_eq!(modal.data().city, "Hamburg");
    }

    #[test]
    fn test_revoking_consent_clears_draft() {
        let storage = MemoryStorage::new();
        let mut modal = EventRequestModal::new(storage.clone());
        modal.open().unwrap();
        modal.set_storage_consent(true).unwrap();
        fill_step_one(&mut modal);
        assert!(storage.get_item(EVENT_REQUEST_DRAFT_KEY).unwrap().is_some());

        modal.set_storage_consent(false).unwrap();
        assert!(storage.get_item(EVENT_REQUEST_DRAFT_KEY).unwrap().is_none());

        modal.update(|data| data.city = "Bremen".to_string()).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_tick_saves_on_interval() {
        let storage = MemoryStorage::new();
        let mut modal =
            EventRequestModal::with_autosave(storage.clone(), Autosave::new(Duration::from_secs(5)));
        let start = Instant::now();

        assert!(!modal.tick(start).unwrap());

        modal.open().unwrap();
        modal.wizard.data.storage_consent = true;
        modal.wizard.data.city = "Leipzig".to_string();
        assert!(modal.tick(start).unwrap());
        assert!(!modal.tick(start + Duration::from_secs(1)).unwrap());
        assert!(modal.tick(start + Duration::from_secs(5)).unwrap());
        assert!(storage
            .get_item(EVENT_REQUEST_DRAFT_KEY)
            .unwrap()
            .unwrap()
            .contains("Leipzig"));
    }

    #[test]
    fn test_successful_submission_clears_draft_and_resets_on_reopen() {
        let storage = MemoryStorage::new();
        let mut modal = EventRequestModal::new(storage.clone());
        modal.open().unwrap();
        modal.set_storage_consent(true).unwrap();
        fill_step_one(&mut modal);
        modal.next_step(today()).unwrap();
        modal.update(|data| data.package = Some(Package::Dj)).unwrap();
        modal.next_step(today()).unwrap();
        modal
            .update(|data| {
                data.first_name = "Max".to_string();
                data.company = "Mustermann GmbH".to_string();
                data.email = "max@example.com".to_string();
                data.privacy_accepted = true;
            })
            .unwrap();

        let request = modal.submit(today()).unwrap();
        assert_eq!(request.company, "Mustermann GmbH");
        modal.complete_submission().unwrap();

        assert_eq!(modal.submit_status(), SubmitStatus::Success);
        assert_eq!(modal.step(), WizardStep::Submitted);
        assert!(storage.is_empty());

        assert_eq!(modal.request_close(), CloseOutcome::Closed);
        modal.open().unwrap();
        assert_eq!(modal.submit_status(), SubmitStatus::Idle);
        assert!(!modal.data().has_data());
    }

    #[test]
    fn test_failed_submit_marks_error() {
        let mut modal = EventRequestModal::new(MemoryStorage::new());
        modal.open().unwrap();
        assert!(modal.submit(today()).is_err());
        assert_eq!(modal.submit_status(), SubmitStatus::Error);
    }
}
