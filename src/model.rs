//! Domain records for tracked shows and their episodes.
//!
//! These structures are what the catalog client hands to its callers. They
//! carry no knowledge of the remote payload format; all defaults for missing
//! remote fields are applied before an `Episode` is built.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Production code used when the catalog has none for an episode.
pub const UNKNOWN_PRODNUM: &str = "UNK";

/// Title used when the catalog has no name for an episode.
pub const UNNAMED_EPISODE: &str = "Unnamed episode";

/// Airing status of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShowStatus {
    /// New episodes are still being produced
    Running,
    /// The show has finished airing
    Ended,
    /// The catalog reported no status, or one we do not recognise
    #[default]
    Unknown,
}

impl ShowStatus {
    /// Maps a catalog status string onto a `ShowStatus`.
    ///
    /// Matching ignores case and surrounding whitespace. Anything not listed
    /// here maps to `Unknown`.
    pub fn from_catalog(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "continuing" | "running" | "returning series" => ShowStatus::Running,
            "ended" | "canceled" | "cancelled" => ShowStatus::Ended,
            _ => ShowStatus::Unknown,
        }
    }
}

/// A tracked TV series.
///
/// The caller owns the show; `CatalogClient::parse` updates `name`, `status`
/// and `updated` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    /// Display name of the show
    pub name: String,
    /// Source identifier; for this catalog a bare numeric series id
    pub url: String,
    /// Identifier assigned by the caller's episode store, if any
    pub show_id: Option<i64>,
    /// Current airing status
    pub status: ShowStatus,
    /// When the show was last refreshed from the catalog
    pub updated: Option<DateTime<Utc>>,
}

impl Show {
    /// Creates a show that has never been refreshed.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            show_id: None,
            status: ShowStatus::Unknown,
            updated: None,
        }
    }
}

/// A single episode of a show, as handed to the episode store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// The episode title
    pub title: String,
    /// The season number this episode belongs to (0 when unknown)
    pub season: u32,
    /// The episode number within the season (0 when unknown)
    pub episode: u32,
    /// Date the episode first aired
    pub airdate: NaiveDate,
    /// Production code, `"UNK"` when the catalog has none
    pub prodnum: String,
    /// Position of this episode across the whole show, starting at 1
    pub total: u32,
}
