//! Basic archive example
//!
//! This example demonstrates the core functionality of tadpoles-dl:
//! - Supplying the two static credentials
//! - Choosing the year range and download directory
//! - Running a full archive pass
//! - Reading the run summary

use tadpoles_dl::config::{ArchiveConfig, AuthConfig, Config};
use tadpoles_dl::TadpolesArchiver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Both values come from a logged-in dashboard session: the Cookie header
    // and the account email the dashboard sends as X-TADPOLES-UID.
    let config = Config {
        auth: AuthConfig {
            cookie: "<cookie header value>".to_string(),
            account_id: "parent@example.com".to_string(),
        },
        archive: ArchiveConfig {
            year_from: 2019,
            year_to: 2024,
            download_dir: "images".into(),
            ..Default::default()
        },
        ..Default::default()
    };

    let archiver = TadpolesArchiver::new(config)?;
    let summary = archiver.archive_all().await?;

    println!("✓ {} periods processed", summary.periods);
    println!("⬇ {} files downloaded", summary.downloaded);
    println!("↻ {} already present, skipped", summary.already_present);
    if summary.playlists_skipped > 0 {
        println!(
            "• {} playlist attachments skipped (enable include_playlists to assemble them)",
            summary.playlists_skipped
        );
    }
    if summary.unknown_types > 0 {
        println!(
            "? {} attachments had unrecognized types, saved with .unknown",
            summary.unknown_types
        );
    }

    Ok(())
}
