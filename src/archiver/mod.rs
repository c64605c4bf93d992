//! Core archiver implementation split into focused submodules.
//!
//! The `TadpolesArchiver` struct and its methods are organized by domain:
//! - [`catalog`] - Event listing for one month range
//! - [`fetch`] - Idempotent single-attachment download
//! - [`playlist`] - Recursive playlist resolution and segment reassembly
//!
//! Execution is deliberately sequential: one request in flight at a time,
//! each period finished before the next begins. The filesystem is the only
//! persistent state; a destination that exists is a completed download.

mod catalog;
mod fetch;
mod playlist;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use playlist::PlaylistDocument;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::calendar::month_ranges;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{
    ArchiveSummary, DateRange, DownloadTarget, EventAttachment, FetchOutcome, TargetKind,
    extension_for_mime,
};

/// Header carrying the account identifier on every request
const ACCOUNT_HEADER: &str = "x-tadpoles-uid";

/// Main archiver instance
///
/// Holds the validated configuration and one HTTP client whose default
/// headers carry the static credentials, so event listings, attachment
/// fetches, and playlist and segment fetches are all authenticated the
/// same way.
#[derive(Clone)]
pub struct TadpolesArchiver {
    /// Configuration (wrapped in Arc so clones stay cheap)
    pub(crate) config: Arc<Config>,
    /// Shared HTTP client with credentials installed as default headers
    pub(crate) http: reqwest::Client,
    /// Parsed service origin all request URLs derive from
    pub(crate) base_url: Url,
}

impl TadpolesArchiver {
    /// Create an archiver from a validated configuration
    ///
    /// Fails if the configuration is contradictory ([`Config::validate`]) or
    /// if a credential value cannot be carried in an HTTP header.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.http.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&config.auth.cookie).map_err(|e| Error::Config {
                message: format!("cookie is not a valid header value: {e}"),
                key: Some("auth.cookie".into()),
            })?,
        );
        headers.insert(
            HeaderName::from_static(ACCOUNT_HEADER),
            HeaderValue::from_str(&config.auth.account_id).map_err(|e| Error::Config {
                message: format!("account_id is not a valid header value: {e}"),
                key: Some("auth.account_id".into()),
            })?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http.timeout)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
            base_url,
        })
    }

    /// Archive every configured year, month by month, oldest first
    ///
    /// Each period is processed to completion before the next begins. The
    /// first error aborts the run; everything already written stays on disk
    /// and is skipped by the next run.
    pub async fn archive_all(&self) -> Result<ArchiveSummary> {
        let mut summary = ArchiveSummary::default();
        for range in month_ranges(self.config.archive.year_from, self.config.archive.year_to) {
            let period = self.archive_period(&range).await?;
            summary.absorb(&period);
        }
        tracing::info!(
            periods = summary.periods,
            attachments = summary.attachments,
            downloaded = summary.downloaded,
            already_present = summary.already_present,
            playlists_assembled = summary.playlists_assembled,
            playlists_skipped = summary.playlists_skipped,
            unknown_types = summary.unknown_types,
            "archive run complete"
        );
        Ok(summary)
    }

    /// Archive one date range: list its attachments and dispatch each in order
    pub async fn archive_period(&self, range: &DateRange) -> Result<ArchiveSummary> {
        tracing::info!(period = %range, "archiving period");
        let mut summary = ArchiveSummary {
            periods: 1,
            ..Default::default()
        };

        let attachments = self.events_between(range).await?;
        for (ordinal, attachment) in attachments.iter().enumerate() {
            let outcome = self.dispatch(attachment, ordinal).await?;
            if extension_for_mime(&attachment.mime_type).is_none() {
                summary.unknown_types += 1;
            }
            summary.record(outcome);
        }
        Ok(summary)
    }

    /// Route one attachment to the fetcher or the playlist resolver
    async fn dispatch(
        &self,
        attachment: &EventAttachment,
        ordinal: usize,
    ) -> Result<FetchOutcome> {
        let target = DownloadTarget::plan(self.config.download_dir(), attachment, ordinal);
        if let Some(parent) = target.destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if extension_for_mime(&attachment.mime_type).is_none() {
            tracing::warn!(
                key = %attachment.key,
                mime_type = %attachment.mime_type,
                "unrecognized attachment type, saving as opaque file"
            );
        }

        match target.kind {
            TargetKind::Playlist => {
                if !self.config.archive.include_playlists {
                    tracing::info!(
                        key = %attachment.key,
                        destination = %target.destination.display(),
                        "playlist attachment skipped (playlist handling disabled)"
                    );
                    return Ok(FetchOutcome::SkippedPlaylist);
                }
                let locator = self.attachment_url(&attachment.key)?;
                // The playlist's own extension never reaches disk; assembled
                // streams are named from the extension-less base.
                let output_base = target.destination.with_extension("");
                self.assemble_playlist(&locator, &output_base).await?;
                Ok(FetchOutcome::Assembled)
            }
            TargetKind::Media => self.fetch_attachment(&attachment.key, &target.destination).await,
        }
    }

    /// Absolute URL an attachment body is fetched from
    pub(crate) fn attachment_url(&self, key: &str) -> Result<Url> {
        let mut url = self.base_url.join("remote/v1/attachment")?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }

    /// Absolute URL of the event listing endpoint
    pub(crate) fn events_url(&self) -> Result<Url> {
        Ok(self.base_url.join("remote/v1/events")?)
    }
}

/// Map HTTP status failures onto the error taxonomy
///
/// 401/403 become the dedicated auth error; any other non-success status
/// propagates as a network error.
pub(crate) fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Auth {
            status: status.as_u16(),
        });
    }
    Ok(response.error_for_status()?)
}

/// Sibling path used to stage content before the final rename
///
/// Streaming straight into the destination would let a crash leave a
/// truncated file that the existence check then trusts forever; the `.part`
/// suffix keeps incomplete content out of the ledger.
pub(crate) fn staging_path(destination: &std::path::Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
