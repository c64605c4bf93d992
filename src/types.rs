//! Core types for tadpoles-dl

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extension assigned to attachments whose media type is not in the table
///
/// Unknown types are still downloaded as opaque files; the sentinel extension
/// makes them easy to find and triage afterwards.
pub const UNKNOWN_EXTENSION: &str = ".unknown";

/// Extension that marks a segmented-playlist attachment
pub const PLAYLIST_EXTENSION: &str = ".m3u8";

/// Map a media type reported by the event listing to a file extension
///
/// Returns `None` for types outside the table; callers decide between the
/// [`UNKNOWN_EXTENSION`] sentinel and their own handling.
#[must_use]
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" => Some(".jpg"),
        "video/mp4" => Some(".mp4"),
        "application/pdf" => Some(".pdf"),
        "image/png" => Some(".png"),
        "application/x-mpegURL" => Some(PLAYLIST_EXTENSION),
        _ => None,
    }
}

/// One downloadable media object attached to a dated event
///
/// Produced by the event catalog client, one record per attachment; an event
/// with several attachments yields several records sharing its date. Records
/// live for a single run and are never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttachment {
    /// Calendar date of the event the attachment belongs to
    pub event_date: NaiveDate,
    /// Opaque identifier used to fetch the attachment body
    pub key: String,
    /// Media type as reported by the service (e.g., "image/jpeg")
    pub mime_type: String,
}

impl EventAttachment {
    /// The `YYYY-MM` directory bucket this attachment files under
    #[must_use]
    pub fn month_bucket(&self) -> String {
        self.event_date.format("%Y-%m").to_string()
    }
}

/// Half-open calendar interval `[start, end)`
///
/// Produced by [`month_ranges`](crate::calendar::month_ranges); each range
/// spans exactly one calendar month except possibly the first, which starts
/// at the configured year boundary (in practice also a month start).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day inside the range
    pub start: NaiveDate,
    /// First day after the range
    pub end: NaiveDate,
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How an attachment is materialized on disk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A single opaque file, streamed to its destination as-is
    Media,
    /// A segmented playlist that must be resolved and reassembled
    Playlist,
}

/// Planned destination for one attachment
///
/// Deterministic function of the attachment, its ordinal within the period,
/// and the download root; stability across runs is what makes the
/// skip-if-exists check a completion ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Final path the attachment content lands at
    pub destination: PathBuf,
    /// Dispatch decision derived from the media type
    pub kind: TargetKind,
}

impl DownloadTarget {
    /// Plan the destination for the `ordinal`-th attachment of a period
    ///
    /// Layout: `<download_root>/<YYYY-MM>/tadpoles_<key>_<ordinal><ext>`,
    /// where the extension comes from [`extension_for_mime`] with
    /// [`UNKNOWN_EXTENSION`] as the fallback.
    #[must_use]
    pub fn plan(download_root: &Path, attachment: &EventAttachment, ordinal: usize) -> Self {
        let extension =
            extension_for_mime(&attachment.mime_type).unwrap_or(UNKNOWN_EXTENSION);
        let kind = if extension == PLAYLIST_EXTENSION {
            TargetKind::Playlist
        } else {
            TargetKind::Media
        };
        let filename = format!("tadpoles_{}_{}{}", attachment.key, ordinal, extension);
        DownloadTarget {
            destination: download_root
                .join(attachment.month_bucket())
                .join(filename),
            kind,
        }
    }
}

/// What happened to one dispatched attachment
///
/// Skips are deliberate, observable decisions rather than swallowed errors;
/// every dispatched attachment produces exactly one outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Content was fetched and written during this run
    Downloaded,
    /// The destination already existed; no request was made
    AlreadyExists,
    /// Playlist attachment left untouched because playlist handling is off
    SkippedPlaylist,
    /// Playlist attachment was resolved and assembled into media files
    Assembled,
}

/// Counters for one archive run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSummary {
    /// Month-sized periods processed
    pub periods: usize,
    /// Attachment records seen across all periods
    pub attachments: usize,
    /// Files fetched during this run
    pub downloaded: usize,
    /// Attachments skipped because their destination already existed
    pub already_present: usize,
    /// Playlists resolved and reassembled
    pub playlists_assembled: usize,
    /// Playlists skipped because playlist handling is disabled
    pub playlists_skipped: usize,
    /// Attachments with a media type outside the extension table
    pub unknown_types: usize,
}

impl ArchiveSummary {
    /// Add another summary's counters into this one
    pub(crate) fn absorb(&mut self, other: &ArchiveSummary) {
        self.periods += other.periods;
        self.attachments += other.attachments;
        self.downloaded += other.downloaded;
        self.already_present += other.already_present;
        self.playlists_assembled += other.playlists_assembled;
        self.playlists_skipped += other.playlists_skipped;
        self.unknown_types += other.unknown_types;
    }

    /// Fold one attachment outcome into the counters
    pub(crate) fn record(&mut self, outcome: FetchOutcome) {
        self.attachments += 1;
        match outcome {
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::AlreadyExists => self.already_present += 1,
            FetchOutcome::SkippedPlaylist => self.playlists_skipped += 1,
            FetchOutcome::Assembled => self.playlists_assembled += 1,
        }
    }
}
