use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether one outbound integration is configured
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntegrationStatus {
    pub name: String,
    pub is_configured: bool,
}

/// Response for settings endpoint. Public, so it carries no key material,
/// recipients or filesystem paths.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsResponse {
    pub integrations: Vec<IntegrationStatus>,
}
