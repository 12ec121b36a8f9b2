use crate::config::ApiConfig;
use actix_web::{web, HttpResponse, Result};
use shared_types::{IntegrationStatus, SettingsResponse};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<ApiConfig>,
}

fn status(name: &str, is_configured: bool) -> IntegrationStatus {
    IntegrationStatus {
        name: name.to_string(),
        is_configured,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn integration_statuses(config: &ApiConfig) -> Vec<IntegrationStatus> {
    let sheets = config.google_sheets.clone().unwrap_or_default();
    let spreadsheet_id = non_blank(sheets.event_requests_spreadsheet_id.as_deref())
        .or(non_blank(sheets.bookings_spreadsheet_id.as_deref()));
    let has_credentials = non_blank(sheets.credentials_path.as_deref()).is_some()
        || (non_blank(sheets.client_email.as_deref()).is_some()
            && non_blank(sheets.private_key.as_deref()).is_some());

    vec![
        status("brevo", config.brevo_api_key().is_some()),
        status("google_sheets", spreadsheet_id.is_some() && has_credentials),
        status("tavily", config.research.tavily_key().is_some()),
        status("groq", config.research.groq_key().is_some()),
    ]
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let response = SettingsResponse {
        integrations: integration_statuses(&data.config),
    };

    Ok(HttpResponse::Ok().json(response))
}
