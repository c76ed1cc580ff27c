//! Blocking HTTP fetcher. One GET per call, no retries, no explicit timeout.

use crate::fetch::error::FetchError;
use crate::fetch::user_agent::DEFAULT_USER_AGENT;
use crate::fetch::{Content, Fetch};
use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED};
use reqwest::Url;
use std::time::Duration;

/// Blocking HTTP(S) fetcher sending a fixed User-Agent.
#[derive(Debug)]
pub struct HttpFetcher {
    inner: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the default User-Agent.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&mut self, url: &str) -> Result<Content, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            input: url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(FetchError::UnsupportedScheme {
                    scheme: other.to_string(),
                    url: url.to_string(),
                })
            }
        }

        let response = self
            .inner
            .get(parsed)
            .send()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let base_uri = Some(response.url().to_string());
        let content_type = header_value(&response, CONTENT_TYPE);
        let last_modified = header_value(&response, LAST_MODIFIED);
        let body = response
            .bytes()
            .map_err(|e| FetchError::BodyRead { source: e })?;

        Ok(Content {
            body: body.to_vec(),
            base_uri,
            content_type,
            last_modified,
        })
    }
}

fn header_value(
    response: &reqwest::blocking::Response,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Builder for HttpFetcher with an optional User-Agent.
#[derive(Debug, Default)]
pub struct HttpFetcherBuilder {
    user_agent: Option<String>,
}

impl HttpFetcherBuilder {
    /// Set the User-Agent header verbatim. Shortcut expansion happens before this.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the blocking client. The reqwest default timeout is disabled.
    pub fn build(self) -> Result<HttpFetcher, FetchError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| FetchError::Client { source: e })?;
        Ok(HttpFetcher { inner })
    }
}
