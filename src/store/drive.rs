//! Share-URL resolution and file download
//!
//! Photo records hold a drive-style share URL. The durable file identifier is
//! embedded in the path (`/d/<id>`, 33 or 19 characters); downloads go
//! through a direct-download URL built from that identifier. Large files are
//! gated by a virus-scan interstitial that answers with a `download_warning`
//! cookie whose value must be echoed back as a `confirm` query parameter.

use std::path::Path;
use std::sync::LazyLock;

use futures::StreamExt;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use crate::{Error, Result};

static FILE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/d/([0-9A-Za-z_-]{33}|[0-9A-Za-z_-]{19})").expect("file id pattern is valid")
});

/// Extract the durable file identifier from a share URL
#[must_use]
pub fn extract_file_id(share_url: &str) -> Option<&str> {
    FILE_ID
        .captures(share_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Extract the file identifier, failing with `NoFileId` when absent
///
/// # Errors
///
/// Returns `NoFileId` carrying the offending URL
pub fn require_file_id(share_url: &str) -> Result<&str> {
    extract_file_id(share_url).ok_or_else(|| Error::NoFileId(share_url.to_string()))
}

/// Build the direct-download URL for a file identifier
#[must_use]
pub fn direct_download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?id={file_id}&export=download")
}

/// Download `url` to `dest`, overwriting any previous copy
///
/// # Errors
///
/// Returns error if the request fails or the file cannot be written
pub async fn download_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Store(format!("download request failed: {e}")))?;

    // Interstitial answer: retry with the confirm token echoed back
    let response = match confirm_token(&response) {
        Some(token) => client
            .get(url)
            .query(&[("confirm", token)])
            .send()
            .await
            .map_err(|e| Error::Store(format!("confirmed download failed: {e}")))?,
        None => response,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Store(format!("download error {status}")));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Store(format!("download interrupted: {e}")))?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(dest = %dest.display(), "reference image downloaded");
    Ok(())
}

/// Value of the `download_warning` cookie, if the response set one
fn confirm_token(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let (name, rest) = cookie.split_once('=')?;
            if !name.trim().starts_with("download_warning") {
                return None;
            }
            Some(rest.split(';').next().unwrap_or(rest).to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_ID: &str = "1A2b3C4d5E6f7G8h9I0j1K2l3M4n5O6p7"; // 33 chars
    const SHORT_ID: &str = "0B1xYzAbCdEfGhIjKlM"; // 19 chars

    #[test]
    fn extracts_33_char_identifier() {
        let url = format!("https://drive.google.com/file/d/{LONG_ID}/view?usp=sharing");
        assert_eq!(extract_file_id(&url), Some(LONG_ID));
    }

    #[test]
    fn extracts_19_char_identifier() {
        let url = format!("https://drive.google.com/file/d/{SHORT_ID}/view");
        assert_eq!(extract_file_id(&url), Some(SHORT_ID));
    }

    #[test]
    fn rejects_url_without_identifier() {
        assert_eq!(extract_file_id("https://example.com/photo.jpg"), None);
        assert_eq!(extract_file_id("https://drive.google.com/d/short"), None);
    }

    #[test]
    fn missing_identifier_aborts_with_no_file_id() {
        let err = require_file_id("https://example.com/photo.jpg").unwrap_err();
        assert!(matches!(err, Error::NoFileId(url) if url == "https://example.com/photo.jpg"));
    }

    #[test]
    fn direct_url_carries_identifier_and_export_flag() {
        let url = direct_download_url(LONG_ID);
        assert_eq!(
            url,
            format!("https://drive.google.com/uc?id={LONG_ID}&export=download")
        );
    }
}
