use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Row};
use shared_types::{BookingRequest, BookingStatus, CalendarBooking, CompanyProfile};

const BOOKING_COLUMNS: &str = "id, selected_date, selected_time, name, company, email, phone,
    message, status, company_research, created_at, updated_at";

pub async fn insert_booking(conn: AsyncDbConnection, booking: &BookingRequest) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO calendar_bookings
         (selected_date, selected_time, name, company, email, phone, message, status,
          created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            booking.selected_date.format("%Y-%m-%d").to_string(),
            booking.selected_time.format("%H:%M").to_string(),
            &booking.name,
            &booking.company,
            &booking.email,
            &booking.phone,
            booking.message.as_ref(),
            BookingStatus::Pending.as_str(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_booking(conn: AsyncDbConnection, id: i64) -> Result<CalendarBooking> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM calendar_bookings WHERE id = ?",
        BOOKING_COLUMNS
    ))?;

    let booking = stmt.query_row([id], map_booking_row)?;
    Ok(booking)
}

pub async fn list_bookings(conn: AsyncDbConnection, limit: usize) -> Result<Vec<CalendarBooking>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM calendar_bookings ORDER BY created_at DESC, id DESC LIMIT ?",
        BOOKING_COLUMNS
    ))?;

    let bookings = stmt
        .query_map([limit as i64], map_booking_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(bookings)
}

pub async fn set_company_research(
    conn: AsyncDbConnection,
    id: i64,
    profile: &CompanyProfile,
) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let json = serde_json::to_string(profile)?;

    conn.execute(
        "UPDATE calendar_bookings SET company_research = ?, updated_at = ? WHERE id = ?",
        params![json, now, id],
    )?;

    Ok(())
}

fn map_booking_row(row: &Row) -> rusqlite::Result<CalendarBooking> {
    let date: String = row.get(1)?;
    let time: String = row.get(2)?;
    let status: String = row.get(8)?;
    let research: Option<String> = row.get(9)?;

    Ok(CalendarBooking {
        id: row.get(0)?,
        selected_date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?,
        selected_time: NaiveTime::parse_from_str(&time, "%H:%M").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        name: row.get(3)?,
        company: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        message: row.get(7)?,
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        company_research: research.and_then(|json| serde_json::from_str(&json).ok()),
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}
