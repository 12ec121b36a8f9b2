use actix_web::{web, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use funnel::availability::{format_slot, month_name_de};
use funnel::validation::{parse_iso_date, MSG_BOOKING_DATE};
use serde::Deserialize;
use shared_types::{CalendarMonthResponse, TimeSlotsResponse};

use super::{field_error, today, SubmissionAppState};

/// Years the month view is served for
pub const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 2000..=2100;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

/// Month grid; defaults to the current month
pub async fn get_month(
    state: web::Data<SubmissionAppState>,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    let today = today();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    if !CALENDAR_YEARS.contains(&year) {
        return Err(actix_web::error::ErrorBadRequest("year out of range"));
    }

    let days = state
        .availability
        .month_grid(year, month, today)
        .map_err(|e| actix_web::error::ErrorBadRequest(e.to_string()))?;
    let month_name = month_name_de(year, month)
        .ok_or_else(|| actix_web::error::ErrorBadRequest("invalid month"))?;

    Ok(HttpResponse::Ok().json(CalendarMonthResponse {
        year,
        month,
        month_name,
        days,
    }))
}

pub async fn get_slots(
    state: web::Data<SubmissionAppState>,
    query: web::Query<SlotsQuery>,
) -> ActixResult<HttpResponse> {
    let slots = parse_iso_date(&query.date).and_then(|date| {
        state
            .availability
            .slots_for(date, today())
            .map(|slots| (date, slots))
    });

    match slots {
        Some((date, slots)) => Ok(HttpResponse::Ok().json(TimeSlotsResponse {
            date,
            slots: slots.into_iter().map(format_slot).collect(),
        })),
        None => Ok(HttpResponse::UnprocessableEntity()
            .json(field_error("selected_date", MSG_BOOKING_DATE))),
    }
}
