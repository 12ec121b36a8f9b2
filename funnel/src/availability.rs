use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};
use shared_types::CalendarDay;
use thiserror::Error;

/// First and last intro-call slot of a day, and the slot length
pub const FIRST_SLOT: (u32, u32) = (9, 0);
pub const LAST_SLOT: (u32, u32) = (17, 0);
pub const SLOT_MINUTES: u32 = 30;

/// How many months `first_available_date` looks ahead
pub const MONTHS_TO_SEARCH: u32 = 3;

const MONTH_NAMES_DE: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AvailabilityError {
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Which days can be booked for an intro call.
///
/// Weekends and past days are never bookable. Everything else is bookable up
/// to `horizon_days` after today.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityRule {
    pub horizon_days: u32,
}

impl Default for AvailabilityRule {
    fn default() -> Self {
        Self { horizon_days: 365 }
    }
}

impl AvailabilityRule {
    pub fn new(horizon_days: u32) -> Self {
        Self { horizon_days }
    }

    pub fn is_selectable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        if is_weekend(date) || date < today {
            return false;
        }

        match today.checked_add_days(Days::new(self.horizon_days as u64)) {
            Some(last) => date <= last,
            None => true,
        }
    }

    /// Slots for a selectable day, `None` otherwise
    pub fn slots_for(&self, date: NaiveDate, today: NaiveDate) -> Option<Vec<NaiveTime>> {
        if self.is_selectable(date, today) {
            Some(available_slots())
        } else {
            None
        }
    }

    /// The month grid, padded to whole Monday-first weeks
    pub fn month_grid(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<Vec<CalendarDay>, AvailabilityError> {
        let invalid = AvailabilityError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
        let last = last_day_of_month(first).ok_or(invalid.clone())?;

        let start = first
            .checked_sub_days(Days::new(first.weekday().num_days_from_monday() as u64))
            .ok_or(invalid.clone())?;
        let end = last
            .checked_add_days(Days::new(6 - last.weekday().num_days_from_monday() as u64))
            .ok_or(invalid)?;

        let days = start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| {
                let is_current_month = day.month() == month && day.year() == year;
                CalendarDay {
                    date: day,
                    day: day.day(),
                    is_current_month,
                    is_past: day < today,
                    is_weekend: is_weekend(day),
                    is_available: is_current_month && self.is_selectable(day, today),
                    is_today: day == today,
                }
            })
            .collect();

        Ok(days)
    }

    /// First bookable day within the next few months
    pub fn first_available_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let first_of_month = today.with_day(1)?;
        let search_end = last_day_of_month(
            first_of_month.checked_add_months(Months::new(MONTHS_TO_SEARCH - 1))?,
        )?;

        today
            .iter_days()
            .take_while(|day| *day <= search_end)
            .find(|day| self.is_selectable(*day, today))
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The fixed intro-call slots: 09:00 to 17:00 every 30 minutes
pub fn available_slots() -> Vec<NaiveTime> {
    let first = FIRST_SLOT.0 * 60 + FIRST_SLOT.1;
    let last = LAST_SLOT.0 * 60 + LAST_SLOT.1;

    (first..=last)
        .step_by(SLOT_MINUTES as usize)
        .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
        .collect()
}

pub fn format_slot(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

/// Parses `HH:MM` and accepts it only if it is one of the fixed slots
pub fn parse_slot(value: &str) -> Option<NaiveTime> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
    available_slots().into_iter().find(|slot| *slot == time)
}

pub fn month_name_de(year: i32, month: u32) -> Option<String> {
    let name = MONTH_NAMES_DE.get(month.checked_sub(1)? as usize)?;
    Some(format!("{} {}", name, year))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}
