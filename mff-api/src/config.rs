use config::{Config, ConfigError, Environment, File};
use mff_agents::ResearchSettings;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_RECIPIENTS: &str =
    "kontakt@xn--musikfrfirmen-1ob.de,moin@nickheymann.de,moin@jonasglamann.de";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    pub brevo: Option<BrevoConfig>,
    pub google_sheets: Option<GoogleSheetsConfig>,
    #[serde(default)]
    pub research: ResearchSettings,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotificationsConfig {
    /// Comma-separated list of internal recipients
    #[serde(default = "default_recipients")]
    pub recipients: String,
    #[serde(default = "default_sender_email")]
    pub sender_email: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            recipients: default_recipients(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
        }
    }
}

impl NotificationsConfig {
    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BrevoConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GoogleSheetsConfig {
    pub event_requests_spreadsheet_id: Option<String>,
    /// Falls back to the event request spreadsheet
    pub bookings_spreadsheet_id: Option<String>,
    /// Service account JSON key file
    pub credentials_path: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_event_requests_per_hour")]
    pub event_requests_per_hour: u32,
    /// Reverse proxies allowed to set `X-Forwarded-For`
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            event_requests_per_hour: default_event_requests_per_hour(),
            trusted_proxies: Vec::new(),
        }
    }
}

fn default_recipients() -> String {
    DEFAULT_RECIPIENTS.to_string()
}

fn default_sender_email() -> String {
    "noreply@xn--musikfrfirmen-1ob.de".to_string()
}

fn default_sender_name() -> String {
    "musikfürfirmen.de".to_string()
}

fn default_event_requests_per_hour() -> u32 {
    5
}

impl ApiConfig {
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3000"]

[database]
# path = "/var/lib/musikfuerfirmen/db.sqlite"

[notifications]
recipients = "kontakt@xn--musikfrfirmen-1ob.de,moin@nickheymann.de,moin@jonasglamann.de"
sender_email = "noreply@xn--musikfrfirmen-1ob.de"
sender_name = "musikfürfirmen.de"

[brevo]
# api_key = "xkeysib-..."

[google_sheets]
# event_requests_spreadsheet_id = "..."
# bookings_spreadsheet_id = "..."
# credentials_path = "/etc/musikfuerfirmen/service-account.json"

[research]
# tavily_api_key = "tvly-..."
# groq_api_key = "gsk_..."
groq_model = "llama-3.3-70b-versatile"
search_timeout_secs = 8
summary_timeout_secs = 15

[rate_limit]
event_requests_per_hour = 5
# trusted_proxies = ["127.0.0.1"]
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(Environment::with_prefix("MFF").separator("__"))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn server_address(&self) -> (String, u16) {
        match &self.server {
            Some(server) => (server.host.clone(), server.port),
            None => ("127.0.0.1".to_string(), 8080),
        }
    }

    pub fn brevo_api_key(&self) -> Option<&str> {
        self.brevo
            .as_ref()
            .and_then(|b| b.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("musikfuerfirmen").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
