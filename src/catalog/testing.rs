//! Test doubles for the catalog client: a fake catalog server replaying JSON
//! fixtures, and in-memory episode stores.

use crate::model::Episode;
use crate::store::{EpisodeStore, StoreError};
use crate::transport::{Headers, Params, Response, Transport, TransportError};
use serde_json::Value;
use std::cell::{Cell, RefCell};

pub(crate) const BASE_URL: &str = "https://api.thetvdb.com";
pub(crate) const VALID_KEY: &str = "fake-api-key";
const VALID_TOKEN: &str = "fake-token";

/// A request as seen by the fake catalog.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        lookup(&self.params, name)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn to_owned_pairs(pairs: &[(&'static str, String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn fixture(name: &str) -> Option<&'static str> {
    let content = match name {
        "error_404" => include_str!("fixtures/error_404.json"),
        "search_frasier" => include_str!("fixtures/search_frasier.json"),
        "search_friends" => include_str!("fixtures/search_friends.json"),
        "search_nothing" => include_str!("fixtures/search_nothing.json"),
        "search_partial" => include_str!("fixtures/search_partial.json"),
        "test_show_260" => include_str!("fixtures/test_show_260.json"),
        "test_show_260_1_eps" => include_str!("fixtures/test_show_260_1_eps.json"),
        "test_show_261" => include_str!("fixtures/test_show_261.json"),
        "test_show_261_1_eps" => include_str!("fixtures/test_show_261_1_eps.json"),
        "test_show_261_2_eps" => include_str!("fixtures/test_show_261_2_eps.json"),
        "test_show_261_3_eps" => include_str!("fixtures/test_show_261_3_eps.json"),
        "test_show_262" => include_str!("fixtures/test_show_262.json"),
        "test_show_262_1_eps" => include_str!("fixtures/test_show_262_1_eps.json"),
        "test_show_263" => include_str!("fixtures/test_show_263.json"),
        "test_show_264" => include_str!("fixtures/test_show_264.json"),
        "test_show_264_1_eps" => include_str!("fixtures/test_show_264_1_eps.json"),
        _ => return None,
    };
    Some(content)
}

fn fixture_or_404(name: &str) -> Response {
    match fixture(name) {
        Some(content) => Response::new(200, content),
        None => not_found(),
    }
}

fn not_found() -> Response {
    Response::new(404, fixture("error_404").unwrap_or_default())
}

fn unauthorized() -> Response {
    Response::new(401, r#"{"Error": "Not Authorized"}"#)
}

/// In-process stand-in for the catalog API.
///
/// Accepts the key `fake-api-key`, hands out the token `fake-token` and
/// serves fixtures for the shows 260 to 264 and the search terms "Frasier",
/// "Friends", "Nothing", "Partial" and "Empty". Every request is recorded.
#[derive(Debug, Default)]
pub(crate) struct FakeCatalog {
    requests: RefCell<Vec<RecordedRequest>>,
    token_expired: Cell<bool>,
    forced_status: Cell<Option<u16>>,
    offline: Cell<bool>,
}

impl FakeCatalog {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    /// Makes the server reject the current token until the next login.
    pub fn expire_token(&self) {
        self.token_expired.set(true);
    }

    /// Answers every authorized GET with `status` and an empty JSON body.
    pub fn fail_with_status(&self, status: u16) {
        self.forced_status.set(Some(status));
    }

    /// Makes every request fail before reaching the server.
    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    fn authorized(&self, request: &RecordedRequest) -> bool {
        !self.token_expired.get()
            && request.header("Authorization") == Some(format!("Bearer {VALID_TOKEN}").as_str())
    }

    fn get_search(&self, request: &RecordedRequest) -> Response {
        match request.param("name") {
            Some("Frasier") => fixture_or_404("search_frasier"),
            Some("Friends") => fixture_or_404("search_friends"),
            Some("Nothing") => fixture_or_404("search_nothing"),
            Some("Partial") => fixture_or_404("search_partial"),
            Some("Empty") => Response::new(200, ""),
            _ => not_found(),
        }
    }

    fn get_series(&self, request: &RecordedRequest) -> Response {
        let path = &request.url[BASE_URL.len()..];
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["series", id] => fixture_or_404(&format!("test_show_{id}")),
            ["series", id, "episodes"] => {
                let page = request.param("page").unwrap_or("1");
                fixture_or_404(&format!("test_show_{id}_{page}_eps"))
            }
            _ => not_found(),
        }
    }

    fn post_login(&self, request: &RecordedRequest) -> Response {
        let key = serde_json::from_str::<Value>(&request.body)
            .ok()
            .and_then(|body| body.get("apikey").and_then(Value::as_str).map(str::to_string));

        if key.as_deref() == Some(VALID_KEY) {
            self.token_expired.set(false);
            return Response::new(200, format!(r#"{{ "token": "{VALID_TOKEN}" }}"#));
        }

        unauthorized()
    }
}

impl Transport for FakeCatalog {
    fn get(
        &self,
        url: &str,
        headers: &Headers,
        params: &Params,
    ) -> Result<Response, TransportError> {
        let request = RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: to_owned_pairs(headers),
            params: to_owned_pairs(params),
            body: String::new(),
        };
        self.requests.borrow_mut().push(request.clone());

        if self.offline.get() {
            return Err(TransportError::RequestFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        if !url.starts_with(BASE_URL) {
            return Ok(not_found());
        }
        if !self.authorized(&request) {
            return Ok(unauthorized());
        }
        if let Some(status) = self.forced_status.get() {
            return Ok(Response::new(status, "{}"));
        }

        let response = if url.starts_with(&format!("{BASE_URL}/search/series")) {
            self.get_search(&request)
        } else if url.starts_with(&format!("{BASE_URL}/series")) {
            self.get_series(&request)
        } else {
            not_found()
        };

        Ok(response)
    }

    fn post(&self, url: &str, headers: &Headers, body: &str) -> Result<Response, TransportError> {
        let request = RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: to_owned_pairs(headers),
            params: Vec::new(),
            body: body.to_string(),
        };
        self.requests.borrow_mut().push(request.clone());

        if self.offline.get() {
            return Err(TransportError::RequestFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        if url == format!("{BASE_URL}/login") {
            return Ok(self.post_login(&request));
        }

        Ok(not_found())
    }
}

/// Episode store that keeps everything in memory.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub episodes: Vec<Episode>,
    pub commits: usize,
}

impl EpisodeStore for MemoryStore {
    fn add_episode(&mut self, episode: Episode) -> Result<(), StoreError> {
        self.episodes.push(episode);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        Ok(())
    }
}

/// Episode store whose commits always fail.
pub(crate) struct FailingStore;

impl EpisodeStore for FailingStore {
    fn add_episode(&mut self, _episode: Episode) -> Result<(), StoreError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        Err(StoreError::CommitFailed("disk full".to_string()))
    }
}
