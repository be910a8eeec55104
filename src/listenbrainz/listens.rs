use std::{future::Future, time::Duration};

use reqwest::{Client, Url, header::HeaderMap};
use tokio::time::sleep;

use crate::{
    debug,
    error::{Error, Result},
    types::{ListensResponse, Page},
};

/// Identifies this tool to the ListenBrainz service.
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (monthly playlist generator)"
);

/// Source of newest-first listen pages.
///
/// [`ListenClient`] is the real implementation. The collector only depends on
/// this trait so its loop can be driven by scripted pages in tests.
pub trait ListenSource {
    /// Returns listens of `user` at or before `max_ts`, newest first.
    fn fetch_page(&self, user: &str, max_ts: i64) -> impl Future<Output = Result<Page>> + Send;
}

/// Rate-limit headers reported by the service. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<String>,
    pub remaining: Option<String>,
    pub reset_in: Option<String>,
    pub reset: Option<String>,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            limit: get("X-RateLimit-Limit"),
            remaining: get("X-RateLimit-Remaining"),
            reset_in: get("X-RateLimit-Reset-In"),
            reset: get("X-RateLimit-Reset"),
        }
    }
}

/// HTTP client for `GET /1/user/{user}/listens`.
#[derive(Debug, Clone)]
pub struct ListenClient {
    http: Client,
    base_url: Url,
    delay: Duration,
}

impl ListenClient {
    /// Creates a client against `base_url` that waits `delay` before every
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a base URL that cannot carry a path and
    /// [`Error::Fetch`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, delay: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("invalid API URL '{}'", base_url)));
        }

        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url,
            delay,
        })
    }

    /// Full request URL for `user` with the `max_ts` cursor applied.
    ///
    /// # Example
    ///
    /// ```
    /// let client = ListenClient::new("https://api.listenbrainz.org", Duration::ZERO)?;
    /// assert_eq!(
    ///     client.listens_url("rob", 1706659200)?.as_str(),
    ///     "https://api.listenbrainz.org/1/user/rob/listens?max_ts=1706659200"
    /// );
    /// ```
    pub fn listens_url(&self, user: &str, max_ts: i64) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(["1", "user", user, "listens"]);
        url.query_pairs_mut()
            .append_pair("max_ts", &max_ts.to_string());
        Ok(url)
    }

    /// Fetches one page of listens at or before `max_ts`.
    ///
    /// Sleeps for the configured delay first, then issues the request. The
    /// body is read completely and decoded separately so transport failures
    /// and malformed JSON stay distinguishable.
    ///
    /// # Errors
    ///
    /// - [`Error::Fetch`] on connection or body read failures
    /// - [`Error::Status`] on any non-2xx answer
    /// - [`Error::Decode`] when the body is not a listens payload
    pub async fn get_listens(&self, user: &str, max_ts: i64) -> Result<Page> {
        let url = self.listens_url(user, max_ts)?;
        debug!("{}", url);

        sleep(self.delay).await;
        let response = self.http.get(url.clone()).send().await?;

        let rate_limit = RateLimit::from_headers(response.headers());
        debug!(
            "X-RateLimit-Limit {}",
            rate_limit.limit.as_deref().unwrap_or("-")
        );
        debug!(
            "X-RateLimit-Remaining {}",
            rate_limit.remaining.as_deref().unwrap_or("-")
        );
        debug!(
            "X-RateLimit-Reset-In {}",
            rate_limit.reset_in.as_deref().unwrap_or("-")
        );
        debug!(
            "X-RateLimit-Reset {}",
            rate_limit.reset.as_deref().unwrap_or("-")
        );

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let decoded: ListensResponse = serde_json::from_slice(&body).map_err(Error::Decode)?;
        debug!("max_ts={}: {}({})", max_ts, status, decoded.payload.reported_count());

        Ok(decoded.payload)
    }
}

impl ListenSource for ListenClient {
    async fn fetch_page(&self, user: &str, max_ts: i64) -> Result<Page> {
        self.get_listens(user, max_ts).await
    }
}
