use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use mff_agents::company_research::{CompanyResearchAgent, ResearchSettings};

#[derive(Parser, Debug)]
#[command(name = "company-research", about = "Print the sales briefing for a company")]
struct Cli {
    /// Company name as entered in a form
    company: String,

    /// Path to api.toml (defaults to the API server's config file)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the Groq model ID
    #[arg(long)]
    model: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
struct ApiConfig {
    #[serde(default)]
    research: ResearchSettings,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let config = load_api_config(&config_path)
        .with_context(|| format!("Failed to load config at {:?}", config_path))?;

    let mut settings = config.research;
    if let Some(model) = cli.model {
        settings.groq_model = model;
    }

    let agent = CompanyResearchAgent::from_settings(&settings)?;
    if !agent.is_enabled() {
        return Err(anyhow::anyhow!(
            "Missing tavily_api_key or groq_api_key in [research] of {:?}",
            config_path
        ));
    }

    match agent.research(&cli.company).await {
        Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
        None => println!("No profile found for {:?}", cli.company),
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

fn load_api_config(path: &PathBuf) -> Result<ApiConfig> {
    let builder = Config::builder()
        .add_source(File::from(path.clone()).required(false))
        .add_source(Environment::with_prefix("MFF").separator("__"))
        .build()?;

    Ok(builder.try_deserialize()?)
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("musikfuerfirmen").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
