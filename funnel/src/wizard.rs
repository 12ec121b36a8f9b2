use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{EventRequest, EventRequestPayload};
use thiserror::Error;

use crate::validation::{
    validate_event_details, validate_event_request, validate_package, ValidationErrors,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    EventDetails,
    PackageSelection,
    ContactDetails,
    Submitted,
}

impl WizardStep {
    /// 1-based position shown in the progress indicator
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::EventDetails => 1,
            WizardStep::PackageSelection => 2,
            WizardStep::ContactDetails => 3,
            WizardStep::Submitted => 4,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("step is incomplete: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("no further step after {0:?}")]
    NoNextStep(WizardStep),
    #[error("submission is only possible from the contact step, currently at {0:?}")]
    NotOnFinalStep(WizardStep),
}

impl WizardError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            WizardError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// The linear event request wizard: details, package, contact.
///
/// Moving forward runs the current step's gate; moving back never touches
/// the entered data.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: WizardStep,
    pub data: EventRequestPayload,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: EventRequestPayload) -> Self {
        Self {
            step: WizardStep::EventDetails,
            data,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn next(&mut self, today: NaiveDate) -> Result<WizardStep, WizardError> {
        self.step = match self.step {
            WizardStep::EventDetails => {
                validate_event_details(&self.data, today)?;
                WizardStep::PackageSelection
            }
            WizardStep::PackageSelection => {
                validate_package(&self.data)?;
                WizardStep::ContactDetails
            }
            step => return Err(WizardError::NoNextStep(step)),
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::PackageSelection => WizardStep::EventDetails,
            WizardStep::ContactDetails => WizardStep::PackageSelection,
            step => step,
        };
        self.step
    }

    /// Final gate: every event request invariant at once
    pub fn submit(&self, today: NaiveDate) -> Result<EventRequest, WizardError> {
        if self.step != WizardStep::ContactDetails {
            return Err(WizardError::NotOnFinalStep(self.step));
        }
        Ok(validate_event_request(&self.data, today)?)
    }

    pub fn mark_submitted(&mut self) {
        self.step = WizardStep::Submitted;
    }

    /// Back to the first step, keeping the data
    pub fn rewind(&mut self) {
        self.step = WizardStep::EventDetails;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{GuestCount, Package};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn step_one_data() -> EventRequestPayload {
        EventRequestPayload {
            date: "2026-12-11".to_string(),
            city: "München".to_string(),
            guests: Some(GuestCount::Under100),
            ..Default::default()
        }
    }

    #[test]
    fn test_step_one_gate() {
        let mut wizard = Wizard::new();
        let err = wizard.next(today()).unwrap_err();
        assert!(err.validation_errors().unwrap().has("city"));
        assert_eq!(wizard.step(), WizardStep::EventDetails);

        wizard.data = step_one_data();
        assert_eq!(wizard.next(today()).unwrap(), WizardStep::PackageSelection);
    }

    #[test]
    fn test_step_two_gate() {
        let mut wizard = Wizard::with_data(step_one_data());
        wizard.next(today()).unwrap();

        let err = wizard.next(today()).unwrap_err();
        assert!(err.validation_errors().unwrap().has("package"));

        wizard.data.package = Some(Package::Dj);
        assert_eq!(wizard.next(today()).unwrap(), WizardStep::ContactDetails);
        assert_eq!(
            wizard.next(today()),
            Err(WizardError::NoNextStep(WizardStep::ContactDetails))
        );
    }

    #[test]
    fn test_back_keeps_data() {
        let mut wizard = Wizard::with_data(step_one_data());
        wizard.data.package = Some(Package::Band);
        wizard.next(today()).unwrap();
        wizard.next(today()).unwrap();

        assert_eq!(wizard.back(), WizardStep::PackageSelection);
        assert_eq!(wizard.back(), WizardStep::EventDetails);
        assert_eq!(wizard.back(), WizardStep::EventDetails);
        assert_eq!(wizard.data.package, Some(Package::Band));
        assert_eq!(wizard.data.city, "München");
    }

    #[test]
    fn test_submit_only_from_contact_step() {
        let wizard = Wizard::with_data(step_one_data());
        assert_eq!(
            wizard.submit(today()),
            Err(WizardError::NotOnFinalStep(WizardStep::EventDetails))
        );
    }

    #[test]
    fn test_submit_without_privacy_fails() {
        let mut wizard = Wizard::with_data(step_one_data());
        wizard.data.package = Some(Package::BandDj);
        wizard.next(today()).unwrap();
        wizard.next(today()).unwrap();
        wizard.data.first_name = "Max".to_string();
        wizard.data.company = "Mustermann GmbH".to_string();
        wizard.data.email = "max@example.com".to_string();

        let err = wizard.submit(today()).unwrap_err();
        assert_eq!(err.validation_errors().unwrap().fields(), vec!["privacy_accepted"]);

        wizard.data.privacy_accepted = true;
        let request = wizard.submit(today()).unwrap();
        assert_eq!(request.city, "München");
        wizard.mark_submitted();
        assert_eq!(wizard.step().number(), 4);
    }
}
