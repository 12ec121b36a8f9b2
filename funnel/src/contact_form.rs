use shared_types::{ContactSubmissionPayload, NewContactSubmission};
use std::time::Instant;

use crate::draft_store::{Autosave, DraftError, DraftStorage, DraftStore, CONTACT_DRAFT_KEY};
use crate::validation::{validate_contact_submission, ValidationErrors};

/// The standalone contact form on the contact page
pub struct ContactForm<S: DraftStorage> {
    data: ContactSubmissionPayload,
    drafts: DraftStore<ContactSubmissionPayload, S>,
    autosave: Autosave,
    submitted: bool,
}

impl<S: DraftStorage> ContactForm<S> {
    /// Starts from a consented draft if there is one
    pub fn load(storage: S) -> Result<Self, DraftError> {
        let drafts = DraftStore::new(CONTACT_DRAFT_KEY, storage);
        let data = drafts.load()?.unwrap_or_default();
        Ok(Self {
            data,
            drafts,
            autosave: Autosave::default(),
            submitted: false,
        })
    }

    pub fn data(&self) -> &ContactSubmissionPayload {
        &self.data
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn update<F>(&mut self, mutate: F) -> Result<(), DraftError>
    where
        F: FnOnce(&mut ContactSubmissionPayload),
    {
        mutate(&mut self.data);
        self.drafts.save(&self.data)?;
        Ok(())
    }

    pub fn set_storage_consent(&mut self, consent: bool) -> Result<(), DraftError> {
        self.data.storage_consent = consent;
        self.drafts.apply_consent(&self.data)
    }

    pub fn tick(&mut self, now: Instant) -> Result<bool, DraftError> {
        if self.submitted || !self.autosave.due(now) {
            return Ok(false);
        }
        self.drafts.save(&self.data)
    }

    pub fn submit(&self) -> Result<NewContactSubmission, ValidationErrors> {
        validate_contact_submission(&self.data)
    }

    /// Empties the form and forgets the draft after the server accepted it
    pub fn complete_submission(&mut self) -> Result<(), DraftError> {
        self.data = ContactSubmissionPayload::default();
        self.submitted = true;
        self.drafts.clear()
    }

    /// "Send another message"
    pub fn reset(&mut self) {
        self.submitted = false;
        self.autosave.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft_store::MemoryStorage;
    use shared_types::InquiryType;

    fn fill(form: &mut ContactForm<MemoryStorage>) {
        form.update(|data| {
            data.name = "Erika Musterfrau".to_string();
            data.email = "erika@example.com".to_string();
            data.inquiry_type = "partnership".to_string();
            data.message = "Wir suchen eine Band für unser Jubiläum.".to_string();
        })
        .unwrap();
    }

    #[test]
    fn test_defaults_to_general_inquiry() {
        let form = ContactForm::load(MemoryStorage::new()).unwrap();
        assert_eq!(form.data().inquiry_type, "general");
        assert!(form.submit().unwrap_err().has("message"));
    }

    #[test]
    fn test_draft_survives_reload_with_consent() {
        let storage = MemoryStorage::new();
        let mut form = ContactForm::load(storage.clone()).unwrap();
        form.set_storage_consent(true).unwrap();
        fill(&mut form);

        let reloaded = ContactForm::load(storage.clone()).unwrap();
        assert_eq!(reloaded.data().name, "Erika Musterfrau");
        assert!(reloaded.data().storage_consent);
    }

    #[test]
    fn test_no_draft_without_consent() {
        let storage = MemoryStorage::new();
        let mut form = ContactForm::load(storage.clone()).unwrap();
        fill(&mut form);

        assert!(storage.is_empty());
        let reloaded = ContactForm::load(storage).unwrap();
        assert!(reloaded.data().name.is_empty());
    }

    #[test]
    fn test_submit_then_complete_clears_everything() {
        let storage = MemoryStorage::new();
        let mut form = ContactForm::load(storage.clone()).unwrap();
        form.set_storage_consent(true).unwrap();
        fill(&mut form);

        let submission = form.submit().unwrap();
        assert_eq!(submission.inquiry_type, InquiryType::Partnership);
        assert_eq!(submission.company, None);

        form.complete_submission().unwrap();
        assert!(form.is_submitted());
        assert!(storage.is_empty());
        assert!(!form.tick(Instant::now()).unwrap());

        form.reset();
        assert!(!form.is_submitted());
        assert_eq!(form.data().inquiry_type, "general");
    }
}
