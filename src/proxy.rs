// src/proxy.rs
use crate::config::UpstreamConfig;
use crate::errors::{DogError, Result};
use crate::upstream::{fetch_with_retry, RetryOutcome, Upstream};
use crate::validator::{validate_body, DogImage, ValidationPolicy};

/// Longest slice of an error body kept in an error value.
const MAX_LOGGED_BODY: usize = 512;

/// Fetches one random dog image from the upstream API and validates it.
///
/// Transport failures and timeouts are retried according to `config.retry`.
/// A non-2xx status or an untrusted payload fails immediately.
pub async fn fetch_dog_image(upstream: &dyn Upstream, config: &UpstreamConfig) -> Result<DogImage> {
    let resp = match fetch_with_retry(upstream, &config.url, &config.retry).await {
        RetryOutcome::Success(resp) => resp,
        RetryOutcome::Exhausted { attempts, last_error } => {
            return Err(DogError::Fetch {
                attempts,
                source: last_error,
            });
        }
    };

    if !resp.is_success() {
        let mut body = resp.body_text();
        if body.len() > MAX_LOGGED_BODY {
            let cut = (0..=MAX_LOGGED_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
            body.truncate(cut);
        }
        return Err(DogError::UpstreamStatus {
            status: resp.status,
            body,
        });
    }

    let policy = ValidationPolicy {
        require_success_status: config.require_success_status,
    };
    Ok(validate_body(&resp.body, policy)?)
}
