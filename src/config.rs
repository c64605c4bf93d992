//! Configuration types for tadpoles-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Static credentials sent with every request
///
/// The dashboard authenticates with a session cookie plus an account
/// identifier header. Both are captured once from a logged-in browser
/// session and never derived at runtime.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Value of the `Cookie` header
    #[serde(default)]
    pub cookie: String,

    /// Value of the `X-TADPOLES-UID` header (the account email)
    #[serde(default)]
    pub account_id: String,
}

/// What to archive and where to put it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// First year to archive, inclusive (default: 2019)
    #[serde(default = "default_year_from")]
    pub year_from: i32,

    /// Last year to archive, inclusive (default: 2024)
    #[serde(default = "default_year_to")]
    pub year_to: i32,

    /// Root directory for downloaded media (default: "downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Resolve and reassemble playlist attachments (default: false)
    ///
    /// Playlist entries appear to be internal dashboard material the service
    /// exposes alongside regular media; they are skipped unless explicitly
    /// requested.
    #[serde(default)]
    pub include_playlists: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            year_from: default_year_from(),
            year_to: default_year_to(),
            download_dir: default_download_dir(),
            include_playlists: false,
        }
    }
}

/// HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Service origin requests are issued against (default: "https://www.tadpoles.com")
    ///
    /// Overridable so tests and mirrors can point the archiver elsewhere.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

/// Main configuration for [`TadpolesArchiver`](crate::TadpolesArchiver)
///
/// Fields are organized into logical sub-configs:
/// - [`auth`](AuthConfig) — static request headers
/// - [`archive`](ArchiveConfig) — year range, destination, playlist handling
/// - [`http`](HttpConfig) — service origin and timeouts
///
/// All sub-config fields are flattened so the JSON/TOML format stays flat
/// (no nesting), and every field has a serde default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Static request headers
    #[serde(flatten)]
    pub auth: AuthConfig,

    /// Year range, destination directory, playlist handling
    #[serde(flatten)]
    pub archive: ArchiveConfig,

    /// Service origin and timeouts
    #[serde(flatten)]
    pub http: HttpConfig,
}

impl Config {
    /// Root directory for downloaded media
    #[must_use]
    pub fn download_dir(&self) -> &PathBuf {
        &self.archive.download_dir
    }

    /// Check the configuration for contradictions before any request is made
    ///
    /// Rejects an inverted year range, an unparseable base URL, and missing
    /// credentials. Called by the archiver constructor.
    pub fn validate(&self) -> Result<()> {
        if self.archive.year_from > self.archive.year_to {
            return Err(Error::Config {
                message: format!(
                    "year_from ({}) must not exceed year_to ({})",
                    self.archive.year_from, self.archive.year_to
                ),
                key: Some("archive.year_from".into()),
            });
        }

        let base = url::Url::parse(&self.http.base_url).map_err(|e| Error::Config {
            message: format!("base_url is not a valid URL: {e}"),
            key: Some("http.base_url".into()),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!("base_url must use http or https, got {}", base.scheme()),
                key: Some("http.base_url".into()),
            });
        }

        if self.auth.cookie.is_empty() {
            return Err(Error::Config {
                message: "cookie must be set to a logged-in session cookie".into(),
                key: Some("auth.cookie".into()),
            });
        }
        if self.auth.account_id.is_empty() {
            return Err(Error::Config {
                message: "account_id must be set to the dashboard account email".into(),
                key: Some("auth.account_id".into()),
            });
        }

        Ok(())
    }
}

// Default value functions
fn default_year_from() -> i32 {
    2019
}

fn default_year_to() -> i32 {
    2024
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_base_url() -> String {
    "https://www.tadpoles.com".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
