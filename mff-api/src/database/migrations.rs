use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create calendar_bookings table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS calendar_bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            selected_date VARCHAR NOT NULL,
            selected_time VARCHAR NOT NULL,
            name VARCHAR NOT NULL,
            company VARCHAR NOT NULL,
            email VARCHAR NOT NULL,
            phone VARCHAR NOT NULL,
            message VARCHAR,
            status VARCHAR NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'confirmed', 'cancelled')),
            company_research VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create contact_submissions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contact_submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            email VARCHAR NOT NULL,
            phone VARCHAR,
            company VARCHAR,
            inquiry_type VARCHAR NOT NULL DEFAULT 'general' CHECK (inquiry_type IN ('general', 'booking', 'partnership', 'other')),
            message VARCHAR NOT NULL,
            status VARCHAR NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'in_progress', 'done')),
            company_research VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create indexes for performance
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calendar_bookings_date ON calendar_bookings(selected_date, selected_time)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contact_submissions_status ON contact_submissions(status)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('calendar_bookings', 'contact_submissions')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
