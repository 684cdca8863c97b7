/// Catalog client implementation.
use super::CatalogError;
use super::types::{
    EpisodePage, EpisodeRecord, LoginRequest, LoginResponse, SearchResponse, SeriesRecord,
    SeriesResponse, SeriesSummary,
};
use crate::config::{ClientConfig, Credentials, DEFAULT_BASE_URL};
use crate::model::{Episode, Show, ShowStatus, UNKNOWN_PRODNUM, UNNAMED_EPISODE};
use crate::store::EpisodeStore;
use crate::transport::{Params, ReqwestTransport, Response, Transport};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Content type header sent with every request
const CONTENT_TYPE: (&str, &str) = ("Content-type", "application/json");

/// Date format of episode air dates
const AIRDATE_FORMAT: &str = "%Y-%m-%d";

/// Client for the TV catalog API.
///
/// The client holds the session token obtained by `login` and attaches it to
/// every subsequent request. If the server rejects the token, the token is
/// dropped and the call fails with `CatalogError::TokenRejected`; calling
/// `login` again fetches a fresh one.
///
/// All operations are blocking and issue their requests sequentially.
pub struct CatalogClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    token: Option<String>,
}

impl CatalogClient<ReqwestTransport> {
    /// Creates a client for the public catalog with default settings.
    pub fn new() -> Result<Self, CatalogError> {
        Ok(Self::with_transport(ReqwestTransport::new()?, DEFAULT_BASE_URL))
    }

    /// Creates a client using the base URL and timeout from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CatalogError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::with_transport(transport, config.base_url.as_str()))
    }
}

impl<T: Transport> CatalogClient<T> {
    /// Creates a client talking to `base_url` through `transport`.
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            token: None,
        }
    }

    /// Returns true if `identifier` is a bare numeric catalog id.
    ///
    /// Callers use this to route a show's source url to this client; full
    /// URLs belong to other sources. See also `is_catalog_id`.
    pub fn accept(identifier: &str) -> bool {
        is_catalog_id(identifier)
    }

    /// Returns true while a session token is held.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Drops the session token, if any.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// Logs in with the API key from `credentials`.
    ///
    /// Does nothing if a token is already held. A rejected key leaves the
    /// client logged out, so a later call with a valid key can still succeed.
    pub fn login<C: Credentials + ?Sized>(&mut self, credentials: &C) -> Result<(), CatalogError> {
        if self.token.is_some() {
            return Ok(());
        }

        let url = self.endpoint("/login");
        let body = serde_json::to_string(&LoginRequest {
            apikey: credentials.api_key(),
        })
        .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        tracing::debug!("POST {}", url);
        let headers = [(CONTENT_TYPE.0, CONTENT_TYPE.1.to_string())];
        let response = self.transport.post(&url, &headers, &body)?;

        match response.status {
            401 | 403 => Err(CatalogError::InvalidLogin),
            _ if response.is_success() => {
                let login: LoginResponse = decode(&response)?;
                self.token = Some(login.token);
                tracing::info!("Logged in to catalog at {}", self.base_url);
                Ok(())
            }
            status => Err(CatalogError::UnexpectedStatus { status, url }),
        }
    }

    /// Searches the catalog for shows matching `term`.
    ///
    /// Shows are returned in the order the server lists them, each with its
    /// catalog id as `url`. No hits is reported as `ShowNotFound`.
    pub fn lookup(&mut self, term: &str) -> Result<Vec<Show>, CatalogError> {
        let response = match self.authorized_get("/search/series", &[("name", term.to_string())])? {
            Some(response) if !response.is_empty() => response,
            _ => return Err(CatalogError::ShowNotFound(term.to_string())),
        };

        let results: SearchResponse = decode(&response)?;
        let shows: Vec<Show> = results.data.into_iter().filter_map(convert_summary).collect();

        if shows.is_empty() {
            return Err(CatalogError::ShowNotFound(term.to_string()));
        }

        tracing::debug!("Found {} show(s) for '{}'", shows.len(), term);
        Ok(shows)
    }

    /// Refreshes `show` from the catalog and pushes all of its episodes
    /// into `store`.
    ///
    /// The show's name, status and update time are set from the catalog.
    /// Every page of the episode list is fetched before anything is written,
    /// so a failing request leaves both the show and the store untouched.
    /// Episode records that cannot be parsed are skipped.
    pub fn parse<S: EpisodeStore + ?Sized>(
        &mut self,
        show: &mut Show,
        store: &mut S,
    ) -> Result<(), CatalogError> {
        if self.token.is_none() {
            return Err(CatalogError::NotLoggedIn);
        }

        let series_id = show.url.trim().to_string();
        if !is_catalog_id(&series_id) {
            return Err(CatalogError::InvalidShowId(show.url.clone()));
        }

        let response = self
            .authorized_get(&format!("/series/{series_id}"), &[])?
            .filter(|response| !response.is_empty())
            .ok_or_else(|| CatalogError::ShowNotFound(series_id.clone()))?;
        let series: SeriesResponse = decode(&response)?;

        let episodes = self.fetch_episodes(&series_id)?;
        let count = episodes.len();

        update_show(show, series.data);

        for episode in episodes {
            store.add_episode(episode)?;
        }
        store.commit()?;

        tracing::info!(
            "Stored {} episode(s) for '{}' ({:?})",
            count,
            show.name,
            show.status
        );
        Ok(())
    }

    /// Fetches and converts every page of a series' episode list.
    fn fetch_episodes(&mut self, series_id: &str) -> Result<Vec<Episode>, CatalogError> {
        let path = format!("/series/{series_id}/episodes");
        let mut episodes = Vec::new();
        let mut total = 0;
        let mut page = 1;

        loop {
            let response = match self.authorized_get(&path, &[("page", page.to_string())])? {
                Some(response) if !response.is_empty() => response,
                _ if page == 1 => return Err(CatalogError::ShowNotFound(series_id.to_string())),
                _ => {
                    tracing::debug!("Episode page {} of series {} is gone", page, series_id);
                    break;
                }
            };

            let episode_page: EpisodePage = decode(&response)?;

            for record in episode_page.data {
                match convert_episode(record, total + 1) {
                    Ok(episode) => {
                        total += 1;
                        episodes.push(episode);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping episode of series {}: {}", series_id, e);
                    }
                }
            }

            match episode_page.links.next_page(page) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(episodes)
    }

    /// Sends an authenticated GET request.
    ///
    /// Returns `None` for 404. A 401 drops the token and fails with
    /// `TokenRejected`.
    fn authorized_get(
        &mut self,
        path: &str,
        params: &Params,
    ) -> Result<Option<Response>, CatalogError> {
        let token = self.token.as_deref().ok_or(CatalogError::NotLoggedIn)?;
        let url = self.endpoint(path);
        let headers = [
            (CONTENT_TYPE.0, CONTENT_TYPE.1.to_string()),
            ("Authorization", format!("Bearer {token}")),
        ];

        tracing::debug!("GET {} {:?}", url, params);
        let response = self.transport.get(&url, &headers, params)?;

        match response.status {
            401 => {
                tracing::warn!("Catalog rejected the session token for {}", url);
                self.token = None;
                Err(CatalogError::TokenRejected)
            }
            404 => Ok(None),
            _ if response.is_success() => Ok(Some(response)),
            status => Err(CatalogError::UnexpectedStatus { status, url }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Returns true if `identifier` is a bare catalog id: a non-empty run of
/// ASCII digits.
pub fn is_catalog_id(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

fn decode<R: DeserializeOwned>(response: &Response) -> Result<R, CatalogError> {
    response
        .json()
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

/// Converts a search hit into a show. Hits without an id or a name are
/// dropped.
fn convert_summary(summary: SeriesSummary) -> Option<Show> {
    let Some(id) = summary.id else {
        tracing::warn!("Dropping search hit without a series id");
        return None;
    };
    let name = summary.series_name.filter(|name| !name.trim().is_empty())?;
    Some(Show::new(name, id.to_string()))
}

fn update_show(show: &mut Show, series: SeriesRecord) {
    if let Some(name) = series.series_name.filter(|name| !name.trim().is_empty()) {
        show.name = name;
    }
    show.status = series
        .status
        .as_deref()
        .map(ShowStatus::from_catalog)
        .unwrap_or_default();
    show.updated = Some(Utc::now());
}

/// Converts a raw episode record, applying defaults for missing fields.
///
/// Fails if the record is not an episode object or has no usable air date.
fn convert_episode(record: Value, total: u32) -> Result<Episode, CatalogError> {
    let record: EpisodeRecord =
        serde_json::from_value(record).map_err(|e| CatalogError::ParseError(e.to_string()))?;

    let aired = record
        .first_aired
        .as_deref()
        .map(str::trim)
        .filter(|aired| !aired.is_empty())
        .ok_or_else(|| CatalogError::ParseError("missing air date".to_string()))?;
    let airdate = NaiveDate::parse_from_str(aired, AIRDATE_FORMAT)
        .map_err(|e| CatalogError::ParseError(format!("invalid air date '{aired}': {e}")))?;

    let title = record
        .episode_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNNAMED_EPISODE.to_string());

    let prodnum = record
        .production_code
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODNUM.to_string());

    Ok(Episode {
        title,
        season: record.aired_season,
        episode: record.aired_episode_number,
        airdate,
        prodnum,
        total,
    })
}
