/// Catalog service client.
///
/// This module provides the client that logs in to the remote TV catalog,
/// searches it for shows and ingests a show's full episode list into an
/// episode store.
mod client;
#[cfg(test)]
mod testing;
mod types;

pub use client::{CatalogClient, is_catalog_id};

use crate::store::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An operation needing a session was attempted before logging in
    #[error("Not logged in to the catalog service")]
    NotLoggedIn,

    /// The catalog rejected the API key
    #[error("Login rejected: invalid API key")]
    InvalidLogin,

    /// The catalog rejected a previously issued session token
    #[error("Session token rejected by the catalog service, log in again")]
    TokenRejected,

    /// The search term or series id matched nothing
    #[error("Show not found: {0}")]
    ShowNotFound(String),

    /// The show's identifier is not a bare catalog id
    #[error("Not a catalog series id: {0}")]
    InvalidShowId(String),

    /// The catalog answered with a status we do not handle
    #[error("Unexpected HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The request never got a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The episode store failed
    #[error("Episode store error: {0}")]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Returns true when logging in again could make a retry succeed.
    pub fn requires_login(&self) -> bool {
        matches!(self, CatalogError::NotLoggedIn | CatalogError::TokenRejected)
    }
}
