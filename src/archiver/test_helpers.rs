//! Shared helpers for archiver unit tests.

use std::path::Path;

use super::TadpolesArchiver;
use crate::config::{ArchiveConfig, AuthConfig, Config, HttpConfig};

/// Cookie value every test archiver sends
pub(crate) const TEST_COOKIE: &str = "session=abc";
/// Account id every test archiver sends
pub(crate) const TEST_ACCOUNT: &str = "parent@example.com";

/// Build an archiver aimed at a mock server, downloading into `download_dir`
///
/// Playlist handling is enabled so resolver tests can drive it directly; the
/// orchestrator's skip path is covered by disabling it per test.
pub(crate) fn archiver_for(base_url: &str, download_dir: &Path) -> TadpolesArchiver {
    let config = Config {
        auth: AuthConfig {
            cookie: TEST_COOKIE.into(),
            account_id: TEST_ACCOUNT.into(),
        },
        archive: ArchiveConfig {
            year_from: 2020,
            year_to: 2020,
            download_dir: download_dir.to_path_buf(),
            include_playlists: true,
        },
        http: HttpConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        },
    };
    TadpolesArchiver::new(config).expect("test config must construct")
}
