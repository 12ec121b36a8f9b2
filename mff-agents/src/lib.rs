pub mod company_research;

pub use company_research::{
    CompanyResearchAgent, ResearchError, ResearchSettings, SearchProvider, SearchResult,
    Summarizer,
};
