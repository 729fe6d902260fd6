// Async HTTP client for the Looker 4.0 REST API.
//
// Base path: /api/4.0/
// Auth: `Authorization: token <access_token>`
//
// This module owns transport mechanics only: URL construction, auth header
// injection, cancellation, response decoding, error classification, and
// pagination. Endpoint methods live in sibling modules as inherent
// `impl LookerClient` blocks.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use futures_util::{Stream, TryStreamExt};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{AccessToken, Credentials};
use crate::error::{Error, FieldError};
use crate::transport::TransportConfig;

/// API version segment prepended to every endpoint path.
pub const API_VERSION: &str = "4.0";

/// Upper bound on pages fetched by one list walk.
pub const MAX_PAGES: usize = 1000;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    documentation_url: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

// ── Response envelope ────────────────────────────────────────────────

/// A decoded 2xx response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: T,
    /// `rel="next"` target from the `Link` header, if the server sent one.
    pub next_page: Option<Url>,
}

impl<T> ApiResponse<T> {
    pub fn into_body(self) -> T {
        self.body
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            body: f(self.body),
            next_page: self.next_page,
        }
    }
}

// ── List options ─────────────────────────────────────────────────────

/// Query parameters for list and search endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Page size. Also enables offset-based paging when the server sends
    /// no `Link` header.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Comma-separated field projection (`fields=id,name`).
    pub fields: Option<String>,
    /// Endpoint-specific filters, e.g. `("name", "Engineering")`.
    pub filters: Vec<(String, String)>,
}

impl ListOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    fn append_to(&self, url: &mut Url, offset: Option<u32>) {
        let mut pairs: Vec<(&str, String)> = self
            .filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        if let Some(fields) = &self.fields {
            pairs.push(("fields", fields.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            pairs.push(("offset", offset.to_string()));
        }

        // An empty serializer would still leave a bare `?` behind.
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Looker API.
///
/// Immutable after construction and safe to share behind an `Arc` across
/// concurrent resource operations. Every request takes the caller's
/// [`CancellationToken`]; a fired token aborts the in-flight request with
/// [`Error::Cancelled`].
#[derive(Debug, Clone)]
pub struct LookerClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl LookerClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Authenticate and build a client.
    ///
    /// Token credentials are used directly. API client credentials are
    /// exchanged for an access token via `POST 4.0/login` first.
    pub async fn connect(
        base_url: &str,
        credentials: &Credentials,
        transport: &TransportConfig,
        cancel: &CancellationToken,
    ) -> Result<Self, Error> {
        let base = Self::normalize_base_url(base_url)?;
        match credentials {
            Credentials::Token(token) => Self::with_token(base_url, token, transport),
            Credentials::ApiClient {
                client_id,
                client_secret,
            } => {
                let token =
                    Self::login(&base, client_id, client_secret, transport, cancel).await?;
                let secret = SecretString::from(token.access_token);
                Self::with_token(base_url, &secret, transport)
            }
        }
    }

    /// Build from an already-issued access token.
    pub fn with_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("token {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid access token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    ///
    /// `timeout` should match the one `http` was built with; it is only
    /// used to report [`Error::Timeout`].
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        timeout: Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Exchange API3 client credentials for an access token.
    async fn login(
        base: &Url,
        client_id: &str,
        client_secret: &SecretString,
        transport: &TransportConfig,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, Error> {
        let http = transport.build_client()?;
        let url = base.join(&format!("{API_VERSION}/login"))?;
        debug!("logging in at {url}");

        let request = http.post(url).form(&[
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
        ]);
        let timeout_secs = transport.timeout_secs();
        let resp = Self::race(request, cancel, timeout_secs).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match read_body(resp, cancel, timeout_secs).await {
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                other => other.unwrap_or_default(),
            };
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let body = read_body(resp, cancel, timeout_secs).await?;
        let token: AccessToken = decode(&body)?;
        debug!(expires_in = ?token.expires_in, "login successful");
        Ok(token)
    }

    /// Root the base URL at `/api/` with a trailing slash.
    ///
    /// Accepts `https://host:19999/api`, `https://host:19999/api/` and
    /// `https://host:19999/api/4.0`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/');
        let path = path
            .strip_suffix(&format!("/{API_VERSION}"))
            .unwrap_or(path)
            .to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The normalized API root (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join a relative path (e.g. `"4.0/folders/12"`) onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Generic verbs ────────────────────────────────────────────────

    /// `GET path`, decoding the body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(path)?;
        self.send(Method::GET, url, None::<&()>, cancel).await
    }

    /// `POST path` with a JSON body.
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(path)?;
        self.send(Method::POST, url, Some(body), cancel).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// Only fields the body serializes are sent; unset optional fields must
    /// be skipped by the body type so unrelated remote values survive.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(path)?;
        self.send(Method::PATCH, url, Some(body), cancel).await
    }

    /// `DELETE path`. Any 2xx succeeds, including `204 No Content`.
    pub async fn delete(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<()>, Error> {
        let url = self.url(path)?;
        let resp: ApiResponse<serde_json::Value> =
            self.send(Method::DELETE, url, None::<&()>, cancel).await?;
        Ok(resp.map(|_| ()))
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Lazily walk every page of a list endpoint, yielding whole pages.
    ///
    /// Follows `Link: <...>; rel="next"` headers. Without a link, a page
    /// that fills `options.limit` advances `offset` by the page length.
    ///
    /// The stream always ends. It stops at an empty page, at a next link
    /// that was already visited, at a page whose body repeats the previous
    /// one (the server ignored `offset`), or after [`MAX_PAGES`] pages.
    pub fn pages<'a, T>(
        &'a self,
        path: &'a str,
        options: &'a ListOptions,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = Result<ApiResponse<Vec<T>>, Error>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        async_stream::try_stream! {
            let mut offset = options.offset;
            let mut url = self.list_url(path, options, offset)?;
            let mut visited = HashSet::from([url.clone()]);
            let mut last_digest = None;
            let mut fetched: usize = 0;

            loop {
                let (raw, status, next_page) = self.fetch_raw(url.clone(), cancel).await?;
                let page_digest = digest(&raw);
                if last_digest == Some(page_digest) {
                    warn!(path, page = fetched + 1, "page repeats the previous one; stopping");
                    break;
                }
                last_digest = Some(page_digest);

                let body: Vec<T> = decode(&raw)?;
                fetched += 1;

                let received = body.len();
                trace!(page = fetched, received, "list page");
                yield ApiResponse { status, body, next_page: next_page.clone() };

                if received == 0 {
                    break;
                }
                if fetched >= MAX_PAGES {
                    warn!(path, pages = fetched, "page limit reached; stopping");
                    break;
                }

                url = match next_page {
                    Some(next) if visited.insert(next.clone()) => next,
                    Some(_) => break,
                    None => match options.limit {
                        Some(limit) if usize::try_from(limit).ok() == Some(received) => {
                            let step = u32::try_from(received).unwrap_or(u32::MAX);
                            offset = Some(offset.unwrap_or(0).saturating_add(step));
                            self.list_url(path, options, offset)?
                        }
                        _ => break,
                    },
                };
            }
        }
    }

    /// Lazily walk every item of a list endpoint, in server order.
    ///
    /// The stream is finite and not restartable; build a new one to walk
    /// the collection again.
    pub fn list_stream<'a, T>(
        &'a self,
        path: &'a str,
        options: &'a ListOptions,
        cancel: &'a CancellationToken,
    ) -> impl Stream<Item = Result<T, Error>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        self.pages(path, options, cancel)
            .map_ok(|page| futures_util::stream::iter(page.body.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }

    /// Collect every page of a list endpoint.
    ///
    /// The returned status is that of the last page fetched.
    pub async fn list<T>(
        &self,
        path: &str,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<T>>, Error>
    where
        T: DeserializeOwned + Send,
    {
        let mut pages = std::pin::pin!(self.pages::<T>(path, options, cancel));
        let mut status = StatusCode::OK;
        let mut items = Vec::new();

        while let Some(page) = pages.try_next().await? {
            status = page.status;
            items.extend(page.body);
        }

        debug!(path, count = items.len(), "list complete");
        Ok(ApiResponse {
            status,
            body: items,
            next_page: None,
        })
    }

    fn list_url(&self, path: &str, options: &ListOptions, offset: Option<u32>) -> Result<Url, Error> {
        let mut url = self.url(path)?;
        options.append_to(&mut url, offset);
        Ok(url)
    }

    // ── Request execution ────────────────────────────────────────────

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<T>, Error> {
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = Self::race(request, cancel, self.timeout_secs).await?;
        let (raw, status, next_page) = self.read_response(resp, cancel).await?;
        Ok(ApiResponse {
            status,
            body: decode(&raw)?,
            next_page,
        })
    }

    /// `GET url`, returning the undecoded 2xx body.
    async fn fetch_raw(
        &self,
        url: Url,
        cancel: &CancellationToken,
    ) -> Result<(String, StatusCode, Option<Url>), Error> {
        debug!("GET {url}");
        let resp = Self::race(self.http.get(url), cancel, self.timeout_secs).await?;
        self.read_response(resp, cancel).await
    }

    /// Send the request unless cancelled first, aborting it if the token
    /// fires while it is in flight.
    async fn race(
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
        timeout_secs: u64,
    ) -> Result<reqwest::Response, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            resp = request.send() => resp.map_err(|e| classify(e, timeout_secs)),
        }
    }

    /// Classify the status and read the body, with the next-page link.
    async fn read_response(
        &self,
        resp: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<(String, StatusCode, Option<Url>), Error> {
        let status = resp.status();
        trace!(%status, "response");

        if !status.is_success() {
            return Err(parse_error(status, resp, cancel, self.timeout_secs).await);
        }

        let next_page = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| next_link(v, resp.url()));

        let raw = read_body(resp, cancel, self.timeout_secs).await?;
        Ok((raw, status, next_page))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn classify(err: reqwest::Error, timeout_secs: u64) -> Error {
    if err.is_timeout() {
        Error::Timeout { timeout_secs }
    } else {
        Error::Transport(err)
    }
}

/// Decode a 2xx body. An empty body decodes as JSON `null`, which lets
/// `()` and `Option<T>` targets accept `204 No Content`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let src = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(src).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

/// Read the whole body, giving up as soon as the token fires.
async fn read_body(
    resp: reqwest::Response,
    cancel: &CancellationToken,
    timeout_secs: u64,
) -> Result<String, Error> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        text = resp.text() => text.map_err(|e| classify(e, timeout_secs)),
    }
}

fn digest(body: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    hasher.finish()
}

async fn parse_error(
    status: StatusCode,
    resp: reqwest::Response,
    cancel: &CancellationToken,
    timeout_secs: u64,
) -> Error {
    let raw = match read_body(resp, cancel, timeout_secs).await {
        Ok(raw) => raw,
        Err(Error::Cancelled) => return Error::Cancelled,
        Err(_) => String::new(),
    };

    if status == StatusCode::UNAUTHORIZED {
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| "access token missing, expired, or invalid".into());
        return Error::Authentication { message };
    }

    match serde_json::from_str::<ErrorResponse>(&raw) {
        Ok(err) => Error::Api {
            status: status.as_u16(),
            message: err.message.unwrap_or_else(|| status.to_string()),
            errors: err.errors,
            documentation_url: err.documentation_url,
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                preview(&raw).to_owned()
            },
            errors: Vec::new(),
            documentation_url: None,
        },
    }
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}

/// Percent-encode a single path segment (ids, user ids).
pub(crate) fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
///
/// Relative targets are resolved against the URL of the response.
pub(crate) fn next_link(header: &str, current: &Url) -> Option<Url> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"'))
                .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
        });
        if is_next { current.join(target).ok() } else { None }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn normalizes_base_url_variants() {
        for raw in [
            "https://acme.looker.com:19999/api",
            "https://acme.looker.com:19999/api/",
            "https://acme.looker.com:19999/api/4.0",
            "https://acme.looker.com:19999/api/4.0/",
        ] {
            let url = LookerClient::normalize_base_url(raw).unwrap();
            assert_eq!(url.as_str(), "https://acme.looker.com:19999/api/", "{raw}");
        }
    }

    #[test]
    fn parses_next_link_among_several() {
        let current = Url::parse("https://h/api/4.0/folders?offset=0").unwrap();
        let header = r#"<https://h/api/4.0/folders?offset=2>; rel="next", <https://h/api/4.0/folders?offset=8>; rel="last""#;
        let next = next_link(header, &current).unwrap();
        assert_eq!(next.as_str(), "https://h/api/4.0/folders?offset=2");
    }

    #[test]
    fn resolves_relative_next_link() {
        let current = Url::parse("https://h/api/4.0/folders").unwrap();
        let next = next_link(r#"</api/4.0/folders?page=2>; rel="next""#, &current).unwrap();
        assert_eq!(next.as_str(), "https://h/api/4.0/folders?page=2");
    }

    #[test]
    fn no_next_link_when_only_prev() {
        let current = Url::parse("https://h/x").unwrap();
        assert!(next_link(r#"<https://h/x?p=1>; rel="prev""#, &current).is_none());
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let () = decode::<()>("").unwrap();
        assert_eq!(decode::<Option<u8>>("  ").unwrap(), None);
    }

    #[test]
    fn segment_escapes_path_characters() {
        assert_eq!(segment("12"), "12");
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn list_options_build_query() {
        let mut url = Url::parse("https://h/api/4.0/folders/search").unwrap();
        ListOptions::default()
            .with_filter("name", "Engineering")
            .with_limit(2)
            .append_to(&mut url, Some(4));
        assert_eq!(url.query(), Some("name=Engineering&limit=2&offset=4"));
    }
}
