use async_trait::async_trait;
use regex::Regex;
use shared_types::CompanyProfile;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use super::groq::GroqSummarizer;
use super::system_prompt::{build_system_prompt, build_user_prompt, format_snippets};
use super::tavily::TavilySearch;
use super::types::{ResearchError, ResearchSettings, SearchQuery, SearchResult};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ResearchError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Returns the raw completion text
    async fn summarize(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ResearchError>;
}

/// Best-effort company briefing for the sales team.
///
/// Never fails: missing keys, blank names, HTTP errors and unparsable
/// completions all end in `None`.
#[derive(Clone)]
pub struct CompanyResearchAgent {
    search: Option<Arc<dyn SearchProvider>>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl CompanyResearchAgent {
    pub fn new(
        search: Option<Arc<dyn SearchProvider>>,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        Self { search, summarizer }
    }

    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Builds the Tavily and Groq clients for whichever keys are configured
    pub fn from_settings(settings: &ResearchSettings) -> Result<Self, ResearchError> {
        let search: Option<Arc<dyn SearchProvider>> = match settings.tavily_key() {
            Some(key) => Some(Arc::new(TavilySearch::new(
                key,
                Duration::from_secs(settings.search_timeout_secs),
            )?)),
            None => None,
        };

        let summarizer: Option<Arc<dyn Summarizer>> = match settings.groq_key() {
            Some(key) => Some(Arc::new(GroqSummarizer::new(
                key,
                settings.groq_model.clone(),
                Duration::from_secs(settings.summary_timeout_secs),
            )?)),
            None => None,
        };

        Ok(Self::new(search, summarizer))
    }

    pub fn is_enabled(&self) -> bool {
        self.search.is_some() && self.summarizer.is_some()
    }

    pub async fn research(&self, company: &str) -> Option<CompanyProfile> {
        let company = company.trim();
        if company.is_empty() {
            return None;
        }

        let (Some(search), Some(summarizer)) = (&self.search, &self.summarizer) else {
            tracing::info!("Company research skipped: missing API keys");
            return None;
        };

        let mut sections = Vec::with_capacity(SearchQuery::ALL.len());
        for query in SearchQuery::ALL {
            let text = query.for_company(company);
            let results = match search.search(&text).await {
                Ok(results) => results,
                Err(ResearchError::Status { service, status }) => {
                    tracing::warn!("{} search failed with status {} for {:?}", service, status, text);
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!("Company research for {:?} failed: {}", company, e);
                    return None;
                }
            };
            sections.push((query, results));
        }

        if sections.iter().all(|(_, results)| results.is_empty()) {
            tracing::info!("No search results for {:?}", company);
            return None;
        }

        let user_prompt = build_user_prompt(company, &format_snippets(&sections));
        let content = match summarizer.summarize(&build_system_prompt(), &user_prompt).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Summarizing research for {:?} failed: {}", company, e);
                return None;
            }
        };

        let profile = parse_profile(&content);
        if profile.is_none() {
            tracing::warn!("Failed to parse summarizer response: {}", content);
        }
        profile
    }
}

fn json_object_re() -> &'static Regex {
    static JSON_OBJECT_RE: OnceLock<Regex> = OnceLock::new();
    JSON_OBJECT_RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("json object regex compiles"))
}

/// The outermost `{...}` of a completion, ignoring code fences and prose
pub fn extract_json_object(content: &str) -> Option<serde_json::Value> {
    let matched = json_object_re().find(content)?;
    match serde_json::from_str::<serde_json::Value>(matched.as_str()) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}

/// A profile with at least one fact, or `None`
pub fn parse_profile(content: &str) -> Option<CompanyProfile> {
    let value = extract_json_object(content)?;
    let profile: CompanyProfile = serde_json::from_value(value).ok()?;
    if profile.is_empty() {
        None
    } else {
        Some(profile)
    }
}
