// src/fetch/http.rs

use encoding_rs::{Encoding, UTF_8};
use reqwest::{blocking::Client, header::CONTENT_TYPE, StatusCode};
use std::{thread::sleep, time::Duration};
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("plscraper/", env!("CARGO_PKG_VERSION"));
const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 60_000;

/// Status, `Content-Type` and raw body of one GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `charset` parameter of the `Content-Type` header, if any.
    pub fn charset(&self) -> Option<&str> {
        self.content_type
            .as_deref()?
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"'))
    }

    /// Body decoded with the declared charset, UTF-8 when none is declared or
    /// the label is unknown. Invalid sequences are replaced.
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }
}

/// Delay before retry number `attempt + 1`: 500 ms doubling, capped at a minute.
fn backoff_ms(attempt: u32) -> u64 {
    2u64.checked_pow(attempt)
        .and_then(|factor| INITIAL_BACKOFF_MS.checked_mul(factor))
        .map_or(MAX_BACKOFF_MS, |ms| ms.min(MAX_BACKOFF_MS))
}

/// Blocking GET. Implementations own any timeout and retry policy; callers
/// decide what a non-success status means.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// `reqwest` blocking client with exponential backoff on connection errors
/// and 5xx responses.
pub struct ReqwestTransport {
    client: Client,
    max_retries: u32,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Transport {
                endpoint: "<client setup>".to_string(),
                source,
            })?;
        Ok(Self {
            client,
            max_retries,
        })
    }

    fn get_once(&self, url: &Url) -> std::result::Result<HttpResponse, reqwest::Error> {
        debug!(%url, "GET");
        let resp = self.client.get(url.clone()).send()?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = resp.bytes()?.to_vec();
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        let mut attempts = 0;
        loop {
            let backoff = backoff_ms(attempts);
            match self.get_once(url) {
                Ok(resp) if resp.status.is_server_error() && attempts < self.max_retries => {
                    attempts += 1;
                    warn!(%url, attempt = attempts, delay_ms = backoff, status = %resp.status, "Retrying");
                    sleep(Duration::from_millis(backoff));
                }
                Ok(resp) => return Ok(resp),
                Err(e) if attempts < self.max_retries => {
                    attempts += 1;
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff));
                }
                Err(e) => {
                    error!(%url, error = %e, "Exhausted retries");
                    return Err(Error::Transport {
                        endpoint: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }
}
