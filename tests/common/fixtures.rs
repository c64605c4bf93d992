//! Fixture builders for driving an archiver against a mock dashboard.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use serde_json::{Value, json};
use tadpoles_dl::{ArchiveConfig, AuthConfig, Config, HttpConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Cookie value every test archiver sends
pub const TEST_COOKIE: &str = "session=fixture";
/// Account id every test archiver sends
pub const TEST_ACCOUNT: &str = "parent@example.com";

/// Mock priority for month-specific catalog responses
const SPECIFIC: u8 = 1;
/// Mock priority for the catch-all empty catalog response
const FALLBACK: u8 = 200;

/// Build a config for a single archive year against a mock server
pub fn config_for_year(
    base_url: &str,
    download_dir: &Path,
    year: i32,
    include_playlists: bool,
) -> Config {
    Config {
        auth: AuthConfig {
            cookie: TEST_COOKIE.into(),
            account_id: TEST_ACCOUNT.into(),
        },
        archive: ArchiveConfig {
            year_from: year,
            year_to: year,
            download_dir: download_dir.to_path_buf(),
            include_playlists,
        },
        http: HttpConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        },
    }
}

/// One event object in the listing wire format
pub fn event(date: &str, attachments: &[(&str, &str)]) -> Value {
    json!({
        "event_date": date,
        "new_attachments": attachments
            .iter()
            .map(|(key, mime)| json!({"key": key, "mime_type": mime}))
            .collect::<Vec<_>>(),
    })
}

/// Epoch seconds of local midnight, matching the archiver's range boundaries
pub fn midnight_epoch(date: &str) -> i64 {
    let date: NaiveDate = date.parse().expect("fixture date must parse");
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .expect("fixture midnight must exist")
        .timestamp()
}

/// Serve `events` for the month starting at `month_start` (`YYYY-MM-DD`)
pub async fn mount_month(server: &MockServer, month_start: &str, events: &[Value]) {
    Mock::given(method("GET"))
        .and(path("/remote/v1/events"))
        .and(query_param(
            "earliest_event_time",
            midnight_epoch(month_start).to_string(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": events})))
        .with_priority(SPECIFIC)
        .mount(server)
        .await;
}

/// Serve an empty listing for every month not covered by [`mount_month`]
pub async fn mount_empty_months(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/remote/v1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .with_priority(FALLBACK)
        .mount(server)
        .await;
}

/// Serve `body` for the attachment with `key`, expecting exactly one fetch
pub async fn mount_attachment_once(server: &MockServer, key: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path("/remote/v1/attachment"))
        .and(query_param("key", key))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve `body` for the attachment with `key`, with no call-count expectation
pub async fn mount_attachment(server: &MockServer, key: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path("/remote/v1/attachment"))
        .and(query_param("key", key))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Relative paths of all regular files under `root`, sorted
pub fn tree_of(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .expect("walked path is under root")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}
