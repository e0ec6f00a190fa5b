use pulseboard_core::models::Platform;

use crate::{Error, Result};

/// Upper bound on sequential page requests per fetch.
pub(crate) const MAX_PAGES: usize = 10;

pub(crate) const USER_AGENT: &str = concat!("pulseboard/", env!("CARGO_PKG_VERSION"));

/// Turn a non-2xx response into `Error::Api`, keeping the body as the message.
pub(crate) async fn check_status(
    platform: Platform,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!("{} request failed with {}", platform, status);
    Err(Error::Api {
        platform,
        status: status.as_u16(),
        message,
    })
}
