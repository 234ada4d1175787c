//! Backend health check command.

use thiserror::Error;

/// Errors from the ping command.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("COMMERCE_API_URL is not set")]
    MissingUrl,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Unhealthy(u16),
}

/// GET the backend's health endpoint and report the result.
///
/// # Errors
///
/// Returns an error if `COMMERCE_API_URL` is unset, the request fails, or
/// the backend reports unhealthy.
pub async fn ping() -> Result<(), PingError> {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("COMMERCE_API_URL").map_err(|_| PingError::MissingUrl)?;
    let url = format!("{}/health", base_url.trim_end_matches('/'));

    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(PingError::Unhealthy(response.status().as_u16()));
    }

    tracing::info!("backend healthy at {url}");
    Ok(())
}
