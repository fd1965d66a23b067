use crate::remote::error::FetchError;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

/// Thin HTTP GET wrapper shared by all remote sources.
///
/// Failed requests are never retried. Non-2xx responses are logged with the
/// URL (API key redacted) and status, then surfaced as
/// [`FetchError::HttpStatus`].
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Downloads the full response body of `url`.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let shown_url = redact_api_key(url);
        info!("Downloading data from {}", shown_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(shown_url.clone(), e.without_url()))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                let e = e.without_url();
                return Err(if let Some(status) = e.status() {
                    warn!("{} Failed to download from URL: {}", status.as_u16(), shown_url);
                    FetchError::HttpStatus {
                        url: shown_url,
                        status,
                        source: e,
                    }
                } else {
                    warn!("HTTP error for {}: {:?}", shown_url, e);
                    FetchError::NetworkRequest(shown_url, e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        info!("Successfully downloaded {} bytes from {}", body.len(), shown_url);
        Ok(body)
    }
}

/// Replaces the value of an `api_key` query parameter so URLs can be logged
/// and carried in errors.
pub(crate) fn redact_api_key(url: &str) -> String {
    const KEY_PARAM: &str = "api_key=";
    let Some(start) = url.find(KEY_PARAM).map(|i| i + KEY_PARAM.len()) else {
        return url.to_string();
    };
    let end = url[start..]
        .find('&')
        .map(|i| start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..start], &url[end..])
}
