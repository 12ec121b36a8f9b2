pub mod agent;
pub mod groq;
pub mod system_prompt;
pub mod tavily;
pub mod types;

pub use agent::{CompanyResearchAgent, SearchProvider, Summarizer};
pub use groq::GroqSummarizer;
pub use tavily::TavilySearch;
pub use types::{ResearchError, ResearchSettings, SearchQuery, SearchResult};
