/// Catalog API request and response types for (de)serialization.
///
/// These structures mirror the JSON format of the catalog API. Almost every
/// field is optional; defaults are applied when converting to domain types.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of the login request.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub apikey: &'a str,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponse {
    pub token: String,
}

/// Response of the series search endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<SeriesSummary>,
}

/// One hit of a series search.
#[derive(Debug, Deserialize)]
pub(super) struct SeriesSummary {
    /// Catalog series id; hits without one are dropped
    pub id: Option<u64>,
    #[serde(rename = "seriesName")]
    pub series_name: Option<String>,
}

/// Response of the series detail endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct SeriesResponse {
    pub data: SeriesRecord,
}

/// Series detail record.
#[derive(Debug, Deserialize)]
pub(super) struct SeriesRecord {
    #[serde(rename = "seriesName")]
    pub series_name: Option<String>,
    /// Airing status string, e.g. "Continuing" or "Ended"
    pub status: Option<String>,
}

/// One page of the episode list endpoint.
///
/// Records are kept as raw JSON so a single malformed record cannot fail the
/// whole page.
#[derive(Debug, Deserialize)]
pub(super) struct EpisodePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: PageLinks,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Value>,
}

/// Pagination metadata of an episode page.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PageLinks {
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl PageLinks {
    /// Returns the page to fetch after `current`, if the server declares one.
    ///
    /// An explicit `next` wins; otherwise pages continue up to `last`. The
    /// returned page is always greater than `current`.
    pub fn next_page(&self, current: u32) -> Option<u32> {
        match (self.next, self.last) {
            (Some(next), _) => (next > current).then_some(next),
            (None, Some(last)) => (current < last).then_some(current + 1),
            (None, None) => None,
        }
    }
}

/// A single episode record.
#[derive(Debug, Deserialize)]
pub(super) struct EpisodeRecord {
    #[serde(rename = "episodeName")]
    pub episode_name: Option<String>,
    /// Season number; null or non-numeric values become 0
    #[serde(rename = "airedSeason", default, deserialize_with = "lenient_number")]
    pub aired_season: u32,
    /// Episode number within the season; null or non-numeric values become 0
    #[serde(
        rename = "airedEpisodeNumber",
        default,
        deserialize_with = "lenient_number"
    )]
    pub aired_episode_number: u32,
    /// Air date in `YYYY-MM-DD` format
    #[serde(rename = "firstAired")]
    pub first_aired: Option<String>,
    #[serde(rename = "productionCode")]
    pub production_code: Option<String>,
}

/// Deserializes a number that may arrive as a number, a numeric string, null
/// or garbage. Anything unusable becomes 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
