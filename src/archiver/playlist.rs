//! Recursive playlist resolution and segment reassembly.
//!
//! A playlist attachment is not media itself: it either points at
//! alternate-quality sub-playlists or lists the ordered segments of one
//! stream. Resolution walks that tree depth-first and concatenates each
//! stream's segments into a single `.ts` file, byte for byte, in document
//! order. The transport-stream format concatenates cleanly, so no container
//! repair is needed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use m3u8_rs::Playlist;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::fetch::append_body;
use super::{TadpolesArchiver, ensure_success, staging_path};
use crate::error::{Error, Result};

/// Maximum playlist nesting the resolver will follow
///
/// Real streams are two levels deep (master then media); anything past this
/// limit is a malformed or adversarial document.
const MAX_PLAYLIST_DEPTH: usize = 8;

/// Parsed representation of one playlist document
///
/// Carries both reference lists so the resolver handles any combination;
/// a parsed HLS document populates exactly one of them (master documents
/// list sub-playlists, media documents list segments).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistDocument {
    /// Locators of variant sub-playlists, in document order
    pub sub_playlists: Vec<String>,
    /// Locators of media segments, in document order
    pub segments: Vec<String>,
}

impl PlaylistDocument {
    /// Parse an M3U8 body into its reference lists
    pub fn parse(body: &[u8]) -> Result<Self> {
        match m3u8_rs::parse_playlist_res(body) {
            Ok(Playlist::MasterPlaylist(master)) => Ok(PlaylistDocument {
                sub_playlists: master
                    .variants
                    .into_iter()
                    // I-frame entries are trick-play indexes, not renditions
                    // of the stream
                    .filter(|variant| !variant.is_i_frame)
                    .map(|variant| variant.uri)
                    .collect(),
                segments: Vec::new(),
            }),
            Ok(Playlist::MediaPlaylist(media)) => Ok(PlaylistDocument {
                sub_playlists: Vec::new(),
                segments: media
                    .segments
                    .into_iter()
                    .map(|segment| segment.uri)
                    .collect(),
            }),
            Err(e) => Err(Error::InvalidPlaylist(format!("{e:?}"))),
        }
    }

    /// Whether the document references nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_playlists.is_empty() && self.segments.is_empty()
    }
}

impl TadpolesArchiver {
    /// Materialize every stream reachable from `locator` into files next to `output_base`
    ///
    /// The document at `locator` is fetched and parsed; the i-th sub-playlist
    /// (0-indexed, document order) resolves recursively with output base
    /// `<output_base>_<i>`, and a document with segments assembles them into
    /// `<output_base>.ts`. A document with neither produces nothing at its
    /// level.
    ///
    /// Two guards reject pathological trees: a locator reappearing among its
    /// own ancestors is a cycle, and nesting past [`MAX_PLAYLIST_DEPTH`] is
    /// refused.
    pub async fn assemble_playlist(&self, locator: &Url, output_base: &Path) -> Result<()> {
        let mut ancestors = HashSet::new();
        self.resolve_level(locator.clone(), output_base.to_path_buf(), 0, &mut ancestors)
            .await
    }

    /// Resolve one playlist document and recurse into its references
    ///
    /// Boxed future because the recursion depth is data-dependent.
    fn resolve_level<'a>(
        &'a self,
        locator: Url,
        output_base: PathBuf,
        depth: usize,
        ancestors: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if depth >= MAX_PLAYLIST_DEPTH {
                return Err(Error::PlaylistNesting {
                    locator: locator.to_string(),
                    depth: MAX_PLAYLIST_DEPTH,
                });
            }
            if !ancestors.insert(locator.to_string()) {
                return Err(Error::PlaylistCycle {
                    locator: locator.to_string(),
                });
            }

            let response = ensure_success(self.http.get(locator.clone()).send().await?)?;
            let body = response.bytes().await?;
            let document = PlaylistDocument::parse(&body)?;
            tracing::debug!(
                locator = %locator,
                sub_playlists = document.sub_playlists.len(),
                segments = document.segments.len(),
                "parsed playlist document"
            );

            for (index, reference) in document.sub_playlists.iter().enumerate() {
                let child = locator.join(reference)?;
                let child_base = with_suffix(&output_base, &format!("_{index}"));
                self.resolve_level(child, child_base, depth + 1, ancestors)
                    .await?;
            }

            if !document.segments.is_empty() {
                self.assemble_segments(&locator, &document.segments, &output_base)
                    .await?;
            }

            // Only the live ancestor chain counts for cycle detection; the
            // same sub-playlist may legitimately appear under two variants.
            ancestors.remove(locator.as_str());
            Ok(())
        })
    }

    /// Concatenate a media playlist's segments into `<output_base>.ts`
    ///
    /// Segment locators resolve against the playlist's own URL: absolute
    /// references pass through, relative ones join onto the parent directory.
    /// Bytes are appended strictly in document order.
    async fn assemble_segments(
        &self,
        playlist_url: &Url,
        segments: &[String],
        output_base: &Path,
    ) -> Result<()> {
        let destination = with_suffix(output_base, ".ts");
        if tokio::fs::try_exists(&destination).await? {
            tracing::debug!(
                destination = %destination.display(),
                "assembled stream exists, skipping"
            );
            return Ok(());
        }

        let staging = staging_path(&destination);
        let mut file = tokio::fs::File::create(&staging).await?;
        for reference in segments {
            let segment_url = playlist_url.join(reference)?;
            let response = ensure_success(self.http.get(segment_url).send().await?)?;
            append_body(response, &mut file).await?;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&staging, &destination).await?;

        tracing::info!(
            destination = %destination.display(),
            segments = segments.len(),
            "assembled media stream"
        );
        Ok(())
    }
}

/// Append a literal suffix to a path's final component
///
/// Unlike `Path::with_extension`, this never clips existing dots, which
/// matters because attachment keys are opaque and may contain them.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(suffix);
    base.with_file_name(name)
}
