//! # tadpoles-dl
//!
//! Backend library for archiving event media from the Tadpoles parent
//! dashboard.
//!
//! ## Design Philosophy
//!
//! tadpoles-dl is designed to be:
//! - **Deliberately sequential** - One request in flight at a time; the
//!   service is someone else's infrastructure and a family archive is not in
//!   a hurry
//! - **Idempotent** - The download tree doubles as the completion ledger:
//!   a file that exists is never fetched again, so an interrupted run is
//!   simply re-run
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use tadpoles_dl::{AuthConfig, Config, TadpolesArchiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         auth: AuthConfig {
//!             cookie: "<cookie header from a logged-in session>".to_string(),
//!             account_id: "parent@example.com".to_string(),
//!         },
//!         ..Default::default()
//!     };
//!
//!     let archiver = TadpolesArchiver::new(config)?;
//!     let summary = archiver.archive_all().await?;
//!     println!(
//!         "{} downloaded, {} already present",
//!         summary.downloaded, summary.already_present
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Core archiver implementation (decomposed into focused submodules)
pub mod archiver;
/// Calendar-month partitioning of the year range
pub mod calendar;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Core types
pub mod types;

// Re-export commonly used types
pub use archiver::{PlaylistDocument, TadpolesArchiver};
pub use calendar::month_ranges;
pub use config::{ArchiveConfig, AuthConfig, Config, HttpConfig};
pub use error::{Error, Result};
pub use types::{
    ArchiveSummary, DateRange, DownloadTarget, EventAttachment, FetchOutcome, TargetKind,
    extension_for_mime,
};
