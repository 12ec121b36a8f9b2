use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A titled link found while researching a company
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct ProfileLink {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
}

/// Short company briefing attached to internal notification emails.
///
/// Produced by the research agent from search snippets, so every field is
/// optional and numbers may arrive as strings or the other way round.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct CompanyProfile {
    #[serde(default, deserialize_with = "loose_string")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub employee_count: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub financials: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub call_prep: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub talking_points: Vec<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub potential_needs: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recent_news: Vec<ProfileLink>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub past_events: Vec<ProfileLink>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
}

impl CompanyProfile {
    /// A profile without any facts is not worth rendering
    pub fn is_empty(&self) -> bool {
        self.industry.is_none()
            && self.employee_count.is_none()
            && self.website.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.recent_news.is_empty()
            && self.past_events.is_empty()
    }
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_string(deserializer)?.unwrap_or_default())
}

/// `null` lists arrive as often as missing ones
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
