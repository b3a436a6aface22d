use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::{prelude::*, Error};

/// HTTP status codes that indicate transient errors (retryable)
const RETRYABLE_STATUS_CODES: &[u16] = &[429, 502, 503, 504];

/// Maximum number of retry attempts for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds (doubles with each retry)
const INITIAL_BACKOFF_MS: u64 = 100;

/// Error body shape the Bot API front-end returns on non-2xx statuses.
#[derive(Deserialize, Debug)]
struct ErrorData {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

pub(crate) struct HttpClient {
    client: Client,
    base_url: String,
}

// The bot token is embedded in the base URL path, so never print it
impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &"<redacted>")
            .finish()
    }
}

async fn parse_response(response: Response) -> Result<String> {
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| Error::request(e.to_string()))?;

    if status_code < 400 {
        return Ok(text);
    }

    match serde_json::from_str::<ErrorData>(&text) {
        Ok(error_data) => Err(Error::api(
            error_data.error_code,
            error_data
                .description
                .unwrap_or_else(|| format!("status {status_code}")),
        )),
        Err(_) => Err(Error::http(status_code, text)),
    }
}

impl HttpClient {
    /// Create a client rooted at `base_url` (the Bot API prefix including
    /// the token path segment).
    pub(crate) fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// POST a JSON body to an API method with automatic retry for transient
    /// errors (429, 502, 503, 504).
    ///
    /// Uses exponential backoff: 100ms, 200ms, 400ms between retries.
    pub(crate) async fn post(&self, method: &str, data: String) -> Result<String> {
        let full_url = format!("{}/{method}", self.base_url);

        for attempt in 0..=MAX_RETRIES {
            let request = self
                .client
                .post(&full_url)
                .header("Content-Type", "application/json")
                .body(data.clone())
                .build()
                .map_err(|e| Error::request(e.to_string()))?;

            let result = self
                .client
                .execute(request)
                .await
                .map_err(|e| Error::request(e.to_string()))?;

            let status = result.status().as_u16();

            if RETRYABLE_STATUS_CODES.contains(&status) && attempt < MAX_RETRIES {
                let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    status = status,
                    attempt = attempt + 1,
                    max_attempts = MAX_RETRIES + 1,
                    backoff_ms = backoff.as_millis(),
                    method = %method,
                    "Retryable HTTP error, backing off"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            return parse_response(result).await;
        }

        // Unreachable given the loop structure, but keep the error explicit
        Err(Error::request(format!(
            "Max retries ({MAX_RETRIES}) exceeded for {method}"
        )))
    }
}
