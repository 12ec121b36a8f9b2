use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use funnel::AvailabilityRule;
use mff_agents::CompanyResearchAgent;
use mff_api::config::ApiConfig;
use mff_api::database::bookings as bookings_db;
use mff_api::handlers::settings::SettingsAppState;
use mff_api::handlers::{CitiesAppState, SubmissionAppState};
use mff_api::helpers::rate_limiter::SubmissionRateLimiter;
use mff_api::integrations::email_templates::EmailTemplates;
use mff_api::integrations::{
    CitySearch, IntegrationError, Mailer, OutgoingEmail, SheetTarget, SpreadsheetSink,
};
use mff_api::jobs::{NotificationDispatcher, NotificationQueue};
use mff_api::Database;
use serde_json::{json, Value};
use shared_types::{BookingStatus, CitySuggestion};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), IntegrationError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(IntegrationError::Status {
                service: "brevo",
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSheets {
    rows: Mutex<Vec<(SheetTarget, Vec<String>)>>,
}

#[async_trait]
impl SpreadsheetSink for RecordingSheets {
    async fn append_row(&self, target: SheetTarget, row: Vec<String>) -> Result<(), IntegrationError> {
        self.rows.lock().unwrap().push((target, row));
        Ok(())
    }
}

struct StaticCities;

#[async_trait]
impl CitySearch for StaticCities {
    async fn suggest(&self, query: &str) -> Result<Vec<CitySuggestion>, IntegrationError> {
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }
        Ok(vec![CitySuggestion {
            city: "Hamburg".to_string(),
            state: "Hamburg".to_string(),
        }])
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    db: Arc<Database>,
    mailer: Arc<RecordingMailer>,
    sheets: Arc<RecordingSheets>,
    submission_state: SubmissionAppState,
    cities_state: CitiesAppState,
    settings_state: SettingsAppState,
}

impl Fixture {
    fn new(mailer_fails: bool, requests_per_hour: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::new(&dir.path().join("db.sqlite")).unwrap());
        let mailer = Arc::new(RecordingMailer {
            fail: mailer_fails,
            ..Default::default()
        });
        let sheets = Arc::new(RecordingSheets::default());

        let dispatcher = Arc::new(NotificationDispatcher::new(
            db.async_connection.clone(),
            mailer.clone(),
            sheets.clone(),
            CompanyResearchAgent::disabled(),
            EmailTemplates::new().unwrap(),
            vec!["team@example.com".to_string()],
        ));
        let (queue, _worker) = NotificationQueue::spawn(dispatcher);

        Self {
            _dir: dir,
            submission_state: SubmissionAppState {
                db_conn: db.async_connection.clone(),
                queue,
                availability: AvailabilityRule::default(),
                rate_limiter: Arc::new(SubmissionRateLimiter::per_hour(requests_per_hour)),
            },
            cities_state: CitiesAppState {
                search: Arc::new(StaticCities),
            },
            settings_state: SettingsAppState {
                config: Arc::new(ApiConfig::default()),
            },
            db,
            mailer,
            sheets,
        }
    }

    fn emails(&self) -> usize {
        self.mailer.sent.lock().unwrap().len()
    }

    fn rows(&self) -> usize {
        self.sheets.rows.lock().unwrap().len()
    }

    /// Waits for the background worker to reach the expected email count
    async fn wait_for_emails(&self, expected: usize) {
        for _ in 0..100 {
            if self.emails() >= expected {
                // the append runs right after the email
                tokio::time::sleep(Duration::from_millis(20)).await;
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {} emails, got {}", expected, self.emails());
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.db.clone()))
                .app_data(web::Data::new($fixture.submission_state.clone()))
                .app_data(web::Data::new($fixture.cities_state.clone()))
                .app_data(web::Data::new($fixture.settings_state.clone()))
                .configure(mff_api::configure_routes),
        )
        .await
    };
}

fn next_weekday() -> NaiveDate {
    let mut day = chrono::Local::now().date_naive() + Days::new(1);
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day = day + Days::new(1);
    }
    day
}

fn next_saturday() -> NaiveDate {
    let mut day = chrono::Local::now().date_naive() + Days::new(1);
    while day.weekday() != Weekday::Sat {
        day = day + Days::new(1);
    }
    day
}

fn booking_payload(email: &str) -> Value {
    json!({
        "selected_date": next_weekday().format("%Y-%m-%d").to_string(),
        "selected_time": "10:00",
        "name": "Max Mustermann",
        "company": "Mustermann GmbH",
        "email": email,
        "phone": "+49 123 456789",
        "message": ""
    })
}

fn event_request_payload() -> Value {
    let date = chrono::Local::now().date_naive() + Days::new(30);
    json!({
        "date": date.format("%Y-%m-%d").to_string(),
        "city": "Hamburg",
        "guests": "100-300",
        "package": "band",
        "first_name": "Max",
        "company": "Mustermann GmbH",
        "email": "max@example.com",
        "privacy_accepted": true
    })
}

#[actix_web::test]
async fn test_booking_is_stored_mailed_and_appended() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .set_json(booking_payload("max@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "pending");

    fixture.wait_for_emails(1).await;
    assert_eq!(fixture.emails(), 1);
    assert_eq!(fixture.rows(), 1);

    let bookings = bookings_db::list_bookings(fixture.db.async_connection.clone(), 10)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, body["id"].as_i64().unwrap());
    assert_eq!(bookings[0].status, BookingStatus::Pending);
    assert_eq!(bookings[0].name, "Max Mustermann");
}

#[actix_web::test]
async fn test_blank_email_is_rejected_without_side_effects() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .set_json(booking_payload("   "))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["email"].is_array());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fixture.emails(), 0);
    assert_eq!(fixture.rows(), 0);
    let bookings = bookings_db::list_bookings(fixture.db.async_connection.clone(), 10)
        .await
        .unwrap();
    assert!(bookings.is_empty());
}

#[actix_web::test]
async fn test_failed_email_still_appends_row() {
    let fixture = Fixture::new(true, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/event-requests")
        .set_json(event_request_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 202);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "accepted");

    fixture.wait_for_emails(1).await;
    let rows = fixture.sheets.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, SheetTarget::EventRequests);
    assert_eq!(rows[0].1[4], "Hamburg");
}

#[actix_web::test]
async fn test_event_requests_are_rate_limited() {
    let fixture = Fixture::new(false, 2);
    let app = init_app!(fixture);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/event-requests")
            .peer_addr("203.0.113.7:5000".parse().unwrap())
            .set_json(event_request_payload())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 202);
    }

    let req = test::TestRequest::post()
        .uri("/api/event-requests")
        .peer_addr("203.0.113.7:5001".parse().unwrap())
        .set_json(event_request_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 429);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"]["email"][0],
        "Zu viele Anfragen. Bitte versuchen Sie es später erneut."
    );
}

#[actix_web::test]
async fn test_rotating_forwarded_for_from_untrusted_peer_is_still_limited() {
    let fixture = Fixture::new(false, 1);
    let app = init_app!(fixture);

    let mut statuses = Vec::new();
    for i in 0..10 {
        let req = test::TestRequest::post()
            .uri("/api/event-requests")
            .peer_addr("198.51.100.2:4000".parse().unwrap())
            .insert_header(("X-Forwarded-For", format!("10.0.0.{}", i)))
            .set_json(json!({}))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status().as_u16());
    }

    assert_eq!(statuses[0], 422);
    assert!(statuses[1..].iter().all(|status| *status == 429), "{:?}", statuses);
}

#[actix_web::test]
async fn test_contact_submission_created() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "name": "Erika Musterfrau",
            "email": "erika@example.com",
            "inquiry_type": "booking",
            "message": "Habt ihr im Mai Zeit?"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "new");

    fixture.wait_for_emails(1).await;
    assert_eq!(fixture.rows(), 0);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_calendar_and_slots() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/calendar?year=2027&month=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["month_name"], "Februar 2027");
    assert_eq!(body["days"].as_array().unwrap().len() % 7, 0);

    let uri = format!(
        "/api/calendar/slots?date={}",
        next_weekday().format("%Y-%m-%d")
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 17);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[16], "17:00");

    let uri = format!(
        "/api/calendar/slots?date={}",
        next_saturday().format("%Y-%m-%d")
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 422);
}

#[actix_web::test]
async fn test_calendar_rejects_extreme_years() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    for uri in [
        "/api/calendar?year=262142&month=12",
        "/api/calendar?year=-262143&month=1",
        "/api/calendar?year=2027&month=13",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400, "{}", uri);
    }
}

#[actix_web::test]
async fn test_cities_health_and_settings() {
    let fixture = Fixture::new(false, 5);
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/cities?q=H").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["suggestions"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/cities?q=Hamb").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["suggestions"][0]["city"], "Hamburg");

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/settings").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["integrations"].as_array().unwrap().len(), 4);
    assert_eq!(body["integrations"][0]["is_configured"], false);
    assert!(body.get("notification_recipients").is_none());
    assert!(body["integrations"][0].get("key").is_none());
}
