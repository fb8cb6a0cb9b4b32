//! HTTP retry helpers for transient store errors.
//!
//! Every request to the store goes through [`send`] or [`send_json`]
//! rather than `reqwest::RequestBuilder::send()` directly, so timeouts,
//! connection resets, rate limiting and server errors are retried with
//! exponential backoff.
//!
//! ```ignore
//! let rows = retry::send_json("users", || client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::GatewayError;

/// Maximum number of retries after the first attempt.
///
/// Backoff is 1s, 2s, 4s, so a request gives up after 7 seconds of
/// waiting plus four request timeouts.
pub const MAX_RETRIES: u32 = 3;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Delay before retry number `attempt` (1-based).
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(16))
}

/// Whether a response status is worth retrying.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Sends a request and parses the response body as JSON.
///
/// `build_request` is called once per attempt since request builders are
/// consumed by `send()`.
///
/// # Errors
///
/// Returns [`GatewayError`] if the request fails after all retries, the
/// store answers with a non-retryable status, or the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(table: &str, build_request: F) -> Result<Value, GatewayError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send(&build_request).await?;
    let status = response.status();
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|e| {
        log::error!(
            "JSON parse failed for {table}\n  \
             status: {status}\n  \
             received: {} bytes\n  \
             parse error: {e}\n  \
             body preview: {}",
            text.len(),
            preview(&text),
        );
        GatewayError::Json(e)
    })
}

/// Sends a request, retrying transient failures, and returns the
/// successful response.
///
/// # Errors
///
/// Returns [`GatewayError::Http`] for connection failures that persist
/// past the last retry, and [`GatewayError::Status`] for error statuses.
/// 4xx statuses other than 429 are returned immediately.
#[allow(clippy::future_not_send)]
pub async fn send<F>(build_request: &F) -> Result<reqwest::Response, GatewayError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff_delay(attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {e}");
                    attempt += 1;
                    continue;
                }
                log::error!("Store request failed: {e}");
                return Err(GatewayError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if is_retryable_status(status) && attempt < MAX_RETRIES {
                    log::warn!("  HTTP {status}");
                    attempt += 1;
                    continue;
                }

                if status.is_client_error() || status.is_server_error() {
                    let body = response.text().await.unwrap_or_default();
                    log::error!("Store returned HTTP {status}: {}", preview(&body));
                    return Err(GatewayError::Status {
                        status: status.as_u16(),
                        message: if body.is_empty() {
                            status.to_string()
                        } else {
                            body
                        },
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}

fn preview(text: &str) -> String {
    if text.chars().count() > BODY_PREVIEW_LEN {
        format!("{}...", text.chars().take(BODY_PREVIEW_LEN).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::OK));
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(BODY_PREVIEW_LEN + 10);
        let out = preview(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), BODY_PREVIEW_LEN + 3);
        assert_eq!(preview("short"), "short");
    }
}
