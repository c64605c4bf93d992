//! Idempotent single-attachment download.

use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use super::{TadpolesArchiver, ensure_success, staging_path};
use crate::error::Result;
use crate::types::FetchOutcome;

impl TadpolesArchiver {
    /// Download one attachment body to `destination`, unless it is already there
    ///
    /// An existing destination is a completed download from an earlier run:
    /// no request is made and [`FetchOutcome::AlreadyExists`] is returned.
    /// Otherwise the body is streamed chunk by chunk into a `.part` sibling
    /// and renamed into place once complete, so the final name never holds a
    /// truncated file.
    pub async fn fetch_attachment(&self, key: &str, destination: &Path) -> Result<FetchOutcome> {
        if tokio::fs::try_exists(destination).await? {
            tracing::debug!(
                key,
                destination = %destination.display(),
                "destination exists, skipping"
            );
            return Ok(FetchOutcome::AlreadyExists);
        }

        let response = self.http.get(self.attachment_url(key)?).send().await?;
        let response = ensure_success(response)?;

        let staging = staging_path(destination);
        let mut file = tokio::fs::File::create(&staging).await?;
        append_body(response, &mut file).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&staging, destination).await?;

        tracing::info!(key, destination = %destination.display(), "attachment downloaded");
        Ok(FetchOutcome::Downloaded)
    }
}

/// Stream a response body into an open file, chunk by chunk, in order
pub(crate) async fn append_body(
    response: reqwest::Response,
    file: &mut tokio::fs::File,
) -> Result<()> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    Ok(())
}
