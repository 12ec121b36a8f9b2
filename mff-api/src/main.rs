use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use funnel::AvailabilityRule;
use mff_agents::CompanyResearchAgent;
use mff_api::config::ApiConfig;
use mff_api::handlers::settings::SettingsAppState;
use mff_api::handlers::{CitiesAppState, SubmissionAppState};
use mff_api::helpers::rate_limiter::SubmissionRateLimiter;
use mff_api::integrations::brevo::DisabledMailer;
use mff_api::integrations::email_templates::EmailTemplates;
use mff_api::integrations::google_sheets::DisabledSheets;
use mff_api::integrations::{
    BrevoMailer, CitySearch, GoogleSheetsClient, Mailer, PhotonClient, SpreadsheetSink,
};
use mff_api::jobs::{NotificationDispatcher, NotificationQueue};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file, defaults to <config_dir>/musikfuerfirmen/api.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("mff-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn build_mailer(config: &ApiConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match config.brevo_api_key() {
        Some(api_key) => Ok(Arc::new(BrevoMailer::new(
            api_key,
            config.notifications.sender_email.clone(),
            config.notifications.sender_name.clone(),
        )?)),
        None => {
            tracing::warn!("Brevo API key not configured, notification emails are disabled");
            Ok(Arc::new(DisabledMailer))
        }
    }
}

fn build_sheets(config: &ApiConfig) -> anyhow::Result<Arc<dyn SpreadsheetSink>> {
    let sheets_config = config.google_sheets.clone().unwrap_or_default();
    match GoogleSheetsClient::from_config(&sheets_config)? {
        Some(client) => Ok(Arc::new(client)),
        None => {
            tracing::warn!("Google Sheets not configured, spreadsheet mirroring is disabled");
            Ok(Arc::new(DisabledSheets))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    let (config, config_path) = ApiConfig::load(args.config.as_deref())?;
    tracing::info!("Loaded config from {:?}", config_path);

    let db = mff_api::helpers::database::initialize_database(&config)?;

    let research = CompanyResearchAgent::from_settings(&config.research)?;
    if !research.is_enabled() {
        tracing::info!("Company research disabled, Tavily or Groq key missing");
    }

    let dispatcher = Arc::new(NotificationDispatcher::new(
        db.async_connection.clone(),
        build_mailer(&config)?,
        build_sheets(&config)?,
        research,
        EmailTemplates::new()?,
        config.notifications.recipient_list(),
    ));
    let (queue, worker) = NotificationQueue::spawn(dispatcher);

    let rate_limiter = Arc::new(
        SubmissionRateLimiter::per_hour(config.rate_limit.event_requests_per_hour)
            .with_trusted_proxies(config.rate_limit.trusted_proxies.clone()),
    );
    let pruning = rate_limiter.spawn_pruning();

    let submission_state = SubmissionAppState {
        db_conn: db.async_connection.clone(),
        queue,
        availability: AvailabilityRule::default(),
        rate_limiter,
    };
    let city_search: Arc<dyn CitySearch> = Arc::new(PhotonClient::new()?);
    let cities_state = CitiesAppState {
        search: city_search,
    };
    let settings_state = SettingsAppState {
        config: Arc::new(config.clone()),
    };

    let (host, port) = config.server_address();
    tracing::info!("Starting server on {}:{}", host, port);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let cors = if let Some(cors_config) = &cors_config {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(submission_state.clone()))
            .app_data(web::Data::new(cities_state.clone()))
            .app_data(web::Data::new(settings_state.clone()))
            .configure(mff_api::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await?;
    pruning.abort();

    // Worker exits once the last queue sender is gone
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Err(e)) => tracing::warn!("Notification worker ended abnormally: {}", e),
        Err(_) => tracing::warn!("Notification worker did not drain in time"),
        Ok(Ok(())) => {}
    }

    Ok(())
}
