use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rough part of the day the event takes place in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Morning,
    Afternoon,
    Evening,
}

impl TimeWindow {
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Morning => "Vormittag",
            TimeWindow::Afternoon => "Nachmittag",
            TimeWindow::Evening => "Abend",
        }
    }
}

/// Guest count bucket offered in the first wizard step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
pub enum GuestCount {
    #[serde(rename = "lt100")]
    Under100,
    #[serde(rename = "100-300")]
    From100To300,
    #[serde(rename = "300-500")]
    From300To500,
    #[serde(rename = "gt500")]
    Over500,
}

impl GuestCount {
    pub const ALL: [GuestCount; 4] = [
        GuestCount::Under100,
        GuestCount::From100To300,
        GuestCount::From300To500,
        GuestCount::Over500,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuestCount::Under100 => "lt100",
            GuestCount::From100To300 => "100-300",
            GuestCount::From300To500 => "300-500",
            GuestCount::Over500 => "gt500",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuestCount::Under100 => "Unter 100",
            GuestCount::From100To300 => "100 - 300",
            GuestCount::From300To500 => "300 - 500",
            GuestCount::Over500 => ">500",
        }
    }
}

/// Music package chosen in the second wizard step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    /// Live band
    Band,
    Dj,
    /// Sound, light and stage without musicians
    Technik,
    BandDj,
}

impl Package {
    pub const ALL: [Package; 4] = [Package::Dj, Package::Band, Package::BandDj, Package::Technik];

    pub fn as_str(&self) -> &'static str {
        match self {
            Package::Band => "band",
            Package::Dj => "dj",
            Package::Technik => "technik",
            Package::BandDj => "band_dj",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Package::Band => "Full Band",
            Package::Dj => "Nur DJ",
            Package::Technik => "Nur Technik",
            Package::BandDj => "Full Band + DJ",
        }
    }
}

/// Event request as it travels from the client: every field may still be
/// empty. This is also the shape of the locally stored draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(default)]
pub struct EventRequestPayload {
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub time_window: Option<TimeWindow>,
    pub city: String,
    pub budget: String,
    pub guests: Option<GuestCount>,
    pub package: Option<Package>,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub privacy_accepted: bool,
    pub storage_consent: bool,
}

impl EventRequestPayload {
    /// True when the user typed or picked anything worth keeping
    pub fn has_data(&self) -> bool {
        !self.date.trim().is_empty()
            || self.time_window.is_some()
            || !self.city.trim().is_empty()
            || !self.budget.trim().is_empty()
            || self.guests.is_some()
            || self.package.is_some()
            || !self.first_name.trim().is_empty()
            || !self.last_name.trim().is_empty()
            || !self.company.trim().is_empty()
            || !self.email.trim().is_empty()
            || !self.phone.trim().is_empty()
            || !self.message.trim().is_empty()
    }
}

/// A validated event request, ready to be handed to the notification job
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct EventRequest {
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub time_window: Option<TimeWindow>,
    pub city: String,
    pub budget: Option<String>,
    pub guests: GuestCount,
    pub package: Package,
    pub first_name: String,
    pub last_name: Option<String>,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub storage_consent: bool,
}

impl EventRequest {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last).trim().to_string(),
            None => self.first_name.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventRequestAcceptedResponse {
    pub status: String,
}
