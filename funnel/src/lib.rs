//! Funnel Crate
//!
//! Client-side state of the three musikfürfirmen.de funnels, kept free of any
//! UI toolkit so it can be driven from a web front end, a CLI or tests.
//!
//! # Architecture
//!
//! - **Types**: Payloads and validated records live in the `shared-types` crate
//! - **Rules**: `validation` and `availability` are shared with the API server
//! - **Controllers**: `EventRequestModal`, `BookingCalendar` and `ContactForm`
//!   hold the open/close, step and draft state of each funnel
//!
//! # Example
//!
//! ```rust,ignore
//! use funnel::{EventRequestModal, MemoryStorage};
//!
//! let mut modal = EventRequestModal::new(MemoryStorage::new());
//! modal.open()?;
//! modal.update(|data| data.city = "Hamburg".to_string())?;
//! modal.next_step(today)?;
//! ```

pub mod availability;
pub mod booking_calendar;
pub mod contact_form;
pub mod draft_store;
pub mod event_request_modal;
pub mod validation;
pub mod wizard;

/// Result of a close request on a modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Unsaved input; the host shows the "really close?" dialog
    NeedsConfirmation,
    Closed,
}

// Re-export commonly used types
pub use availability::{AvailabilityError, AvailabilityRule};
pub use booking_calendar::{BookingCalendar, BookingStep, CalendarError};
pub use contact_form::ContactForm;
pub use draft_store::{
    Autosave, DraftError, DraftStorage, DraftStore, FileStorage, MemoryStorage,
};
pub use event_request_modal::{EventRequestModal, SubmitStatus};
pub use validation::ValidationErrors;
pub use wizard::{Wizard, WizardError, WizardStep};
