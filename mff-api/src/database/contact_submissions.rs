use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, Row};
use shared_types::{CompanyProfile, ContactSubmission, InquiryType, NewContactSubmission, SubmissionStatus};

const SUBMISSION_COLUMNS: &str = "id, name, email, phone, company, inquiry_type, message,
    status, company_research, created_at, updated_at";

pub async fn insert_contact_submission(
    conn: AsyncDbConnection,
    submission: &NewContactSubmission,
) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO contact_submissions
         (name, email, phone, company, inquiry_type, message, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            &submission.name,
            &submission.email,
            submission.phone.as_ref(),
            submission.company.as_ref(),
            submission.inquiry_type.as_str(),
            &submission.message,
            SubmissionStatus::New.as_str(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_contact_submission(conn: AsyncDbConnection, id: i64) -> Result<ContactSubmission> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contact_submissions WHERE id = ?",
        SUBMISSION_COLUMNS
    ))?;

    let submission = stmt.query_row([id], map_submission_row)?;
    Ok(submission)
}

pub async fn list_contact_submissions(
    conn: AsyncDbConnection,
    limit: usize,
) -> Result<Vec<ContactSubmission>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contact_submissions ORDER BY created_at DESC, id DESC LIMIT ?",
        SUBMISSION_COLUMNS
    ))?;

    let submissions = stmt
        .query_map([limit as i64], map_submission_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(submissions)
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
        "UPDATE contact_submissions SET company_research = ?, updated_at = ? WHERE id = ?",
        params![json, now, id],
    )?;

    Ok(())
}

fn map_submission_row(row: &Row) -> rusqlite::Result<ContactSubmission> {
    let inquiry_type: String = row.get(5)?;
    let status: String = row.get(7)?;
    let research: Option<String> = row.get(8)?;

    Ok(ContactSubmission {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        company: row.get(4)?,
        inquiry_type: InquiryType::parse(&inquiry_type).unwrap_or_default(),
        message: row.get(6)?,
        status: SubmissionStatus::parse(&status).unwrap_or(SubmissionStatus::New),
        company_research: research.and_then(|json| serde_json::from_str(&json).ok()),
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[tokio::test]
    async fn test_insert_defaults_to_new() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("db.sqlite")).unwrap();

        let submission = NewContactSubmission {
            name: "Erika Musterfrau".to_string(),
            email: "erika@example.com".to_string(),
            phone: None,
            company: Some("Beispiel AG".to_string()),
            inquiry_type: InquiryType::Partnership,
            message: "Hallo!".to_string(),
        };

        let id = insert_contact_submission(db.async_connection.clone(), &submission)
            .await
            .unwrap();
        let stored = get_contact_submission(db.async_connection.clone(), id)
            .await
            .unwrap();

        assert_eq!(stored.status, SubmissionStatus::New);
        assert_eq!(stored.inquiry_type, InquiryType::Partnership);
        assert_eq!(stored.company.as_deref(), Some("Beispiel AG"));
        assert_eq!(
            list_contact_submissions(db.async_connection.clone(), 5)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
