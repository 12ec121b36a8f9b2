use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 15;
pub const MAX_SEARCH_RESULTS: u32 = 5;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} answered with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// One hit of a web search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// The three searches run for every company
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery {
    General,
    Events,
    Financial,
}

impl SearchQuery {
    pub const ALL: [SearchQuery; 3] = [SearchQuery::General, SearchQuery::Events, SearchQuery::Financial];

    pub fn for_company(&self, company: &str) -> String {
        match self {
            SearchQuery::General => format!("{} Unternehmen Branche Mitarbeiter", company),
            SearchQuery::Events => format!("{} Firmenevent Sommerfest Weihnachtsfeier", company),
            SearchQuery::Financial => format!("{} Umsatz Jahresbericht Gewinn Finanzen", company),
        }
    }

    /// Section heading inside the summarizer prompt
    pub fn heading(&self) -> &'static str {
        match self {
            SearchQuery::General => "Allgemeine Suchergebnisse",
            SearchQuery::Events => "Event-Suchergebnisse",
            SearchQuery::Financial => "Finanz-Suchergebnisse",
        }
    }
}

/// `[research]` section of the API config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
    #[serde(default = "default_summary_timeout")]
    pub summary_timeout_secs: u64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            groq_api_key: None,
            groq_model: default_groq_model(),
            search_timeout_secs: default_search_timeout(),
            summary_timeout_secs: default_summary_timeout(),
        }
    }
}

impl ResearchSettings {
    pub fn tavily_key(&self) -> Option<&str> {
        non_empty(self.tavily_api_key.as_deref())
    }

    pub fn groq_key(&self) -> Option<&str> {
        non_empty(self.groq_api_key.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.to_string()
}

fn default_search_timeout() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_SECS
}

fn default_summary_timeout() -> u64 {
    DEFAULT_SUMMARY_TIMEOUT_SECS
}
