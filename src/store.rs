//! The episode store seam.
//!
//! The catalog client never reads from a store; it only pushes freshly parsed
//! episodes into it and commits once a show has been fully ingested.

use crate::model::Episode;
use thiserror::Error;

/// Errors reported by an episode store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused or failed to record an episode
    #[error("Failed to add episode: {0}")]
    AddFailed(String),

    /// The store failed to persist pending episodes
    #[error("Failed to commit episodes: {0}")]
    CommitFailed(String),
}

/// Destination for episodes parsed from the catalog.
///
/// Implementors typically wrap a local episode database. Episodes are handed
/// over by value in catalog order, followed by a single `commit` per show.
pub trait EpisodeStore {
    /// Records one episode.
    fn add_episode(&mut self, episode: Episode) -> Result<(), StoreError>;

    /// Persists every episode added since the last commit.
    fn commit(&mut self) -> Result<(), StoreError>;
}
