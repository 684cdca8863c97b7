//! episode_catalog - Fetch TV show and episode metadata from a remote catalog
//!
//! This library logs in to a TV catalog service with an API key, searches it
//! for shows by title and ingests a show's full, paginated episode list into
//! a caller-provided episode store.
//!
//! # Examples
//!
//! ```no_run
//! use episode_catalog::{ApiKey, CatalogClient, Episode, EpisodeStore, Show, StoreError};
//!
//! struct PrintStore;
//!
//! impl EpisodeStore for PrintStore {
//!     fn add_episode(&mut self, episode: Episode) -> Result<(), StoreError> {
//!         println!("S{:02}E{:02} {}", episode.season, episode.episode, episode.title);
//!         Ok(())
//!     }
//!
//!     fn commit(&mut self) -> Result<(), StoreError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut client = CatalogClient::new().unwrap();
//! client.login(&ApiKey::new("my-api-key")).unwrap();
//!
//! for mut show in client.lookup("Frasier").unwrap() {
//!     client.parse(&mut show, &mut PrintStore).unwrap();
//! }
//! ```

mod catalog;
mod config;
mod model;
mod store;
mod transport;

pub use catalog::{CatalogClient, CatalogError, is_catalog_id};
pub use config::{ApiKey, ClientConfig, ConfigError, Credentials, DEFAULT_BASE_URL};
pub use model::{Episode, Show, ShowStatus, UNKNOWN_PRODNUM, UNNAMED_EPISODE};
pub use store::{EpisodeStore, StoreError};
pub use transport::{
    DEFAULT_TIMEOUT_SECS, Headers, Params, ReqwestTransport, Response, Transport, TransportError,
};
