//! End-to-end archive runs against a mock dashboard.

mod common;

use common::*;
use tadpoles_dl::{Error, TadpolesArchiver};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn full_year_run_files_attachments_into_month_buckets() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2020-03-01",
        &[
            event("2020-03-05", &[("photo1", "image/jpeg")]),
            event("2020-03-20", &[("doc1", "application/pdf"), ("vid1", "application/x-mpegURL")]),
        ],
    )
    .await;
    mount_month(
        &server,
        "2020-07-01",
        &[event("2020-07-04", &[("blob1", "application/octet-stream")])],
    )
    .await;
    mount_empty_months(&server).await;

    mount_attachment(&server, "photo1", b"jpeg data").await;
    mount_attachment(&server, "doc1", b"pdf data").await;
    mount_attachment(&server, "blob1", b"mystery bytes").await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, false)).unwrap();
    let summary = archiver.archive_all().await.unwrap();

    assert_eq!(summary.periods, 12, "one period per month of 2020");
    assert_eq!(summary.attachments, 4);
    assert_eq!(summary.downloaded, 3);
    assert_eq!(
        summary.playlists_skipped, 1,
        "the playlist attachment must be skipped while handling is disabled"
    );
    assert_eq!(summary.unknown_types, 1);
    assert_eq!(summary.already_present, 0);

    assert_eq!(
        tree_of(temp.path()),
        vec![
            "2020-03/tadpoles_doc1_1.pdf".to_string(),
            "2020-03/tadpoles_photo1_0.jpg".to_string(),
            "2020-07/tadpoles_blob1_0.unknown".to_string(),
        ],
        "ordinals follow listing order and the skipped playlist leaves no file"
    );
    assert_eq!(
        std::fs::read(temp.path().join("2020-07/tadpoles_blob1_0.unknown")).unwrap(),
        b"mystery bytes",
        "unknown types are still fetched as opaque files"
    );
}

#[tokio::test]
async fn second_run_skips_everything_without_refetching() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2020-05-01",
        &[event("2020-05-11", &[("pic", "image/png"), ("mov", "video/mp4")])],
    )
    .await;
    mount_empty_months(&server).await;

    // expect(1): the second run must never touch these again
    mount_attachment_once(&server, "pic", b"png!").await;
    mount_attachment_once(&server, "mov", b"mp4!").await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, false)).unwrap();

    let first = archiver.archive_all().await.unwrap();
    assert_eq!(first.downloaded, 2);
    assert_eq!(first.already_present, 0);

    let second = archiver.archive_all().await.unwrap();
    assert_eq!(second.downloaded, 0, "nothing new on the second run");
    assert_eq!(
        second.already_present, 2,
        "every file from the first run must be treated as complete"
    );

    assert_eq!(
        tree_of(temp.path()),
        vec![
            "2020-05/tadpoles_mov_1.mp4".to_string(),
            "2020-05/tadpoles_pic_0.png".to_string(),
        ]
    );
    // MockServer verifies the expect(1) counts on drop
}

#[tokio::test]
async fn playlist_attachment_assembles_when_enabled() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2020-09-01",
        &[event("2020-09-02", &[("vid1", "application/x-mpegURL")])],
    )
    .await;
    mount_empty_months(&server).await;

    // The attachment endpoint serves the master document; its single variant
    // points at a media playlist whose segments are relative references.
    let variant = format!("{}/hls/720p.m3u8", server.uri());
    let master = format!("#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1000000\n{variant}\n");
    mount_attachment(&server, "vid1", master.as_bytes()).await;

    let media = "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:6\n\
#EXTINF:4.0,\nchunk0.ts\n#EXTINF:4.0,\nchunk1.ts\n#EXT-X-ENDLIST\n";
    Mock::given(method("GET"))
        .and(path("/hls/720p.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(media))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hls/chunk0.ts"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"FIRST".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hls/chunk1.ts"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second".to_vec()))
        .mount(&server)
        .await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, true)).unwrap();
    let summary = archiver.archive_all().await.unwrap();

    assert_eq!(summary.playlists_assembled, 1);
    assert_eq!(summary.playlists_skipped, 0);

    assert_eq!(
        tree_of(temp.path()),
        vec!["2020-09/tadpoles_vid1_0_0.ts".to_string()],
        "the variant's stream lands under the attachment's numbered base"
    );
    assert_eq!(
        std::fs::read(temp.path().join("2020-09/tadpoles_vid1_0_0.ts")).unwrap(),
        b"FIRSTsecond",
        "segment bytes concatenate in document order"
    );
}

#[tokio::test]
async fn dispatch_outcomes_surface_through_archive_period() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    mount_month(
        &server,
        "2020-01-01",
        &[event("2020-01-15", &[("skip_me", "application/x-mpegURL")])],
    )
    .await;
    mount_empty_months(&server).await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, false)).unwrap();
    let ranges = tadpoles_dl::month_ranges(2020, 2020);
    let summary = archiver.archive_period(&ranges[0]).await.unwrap();

    assert_eq!(summary.periods, 1);
    assert_eq!(summary.attachments, 1);
    assert_eq!(summary.playlists_skipped, 1);
    assert!(
        tree_of(temp.path()).is_empty(),
        "a skipped playlist writes nothing"
    );
}

#[tokio::test]
async fn listing_failure_aborts_the_run() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/remote/v1/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, false)).unwrap();
    let result = archiver.archive_all().await;

    assert!(matches!(result, Err(Error::Network(_))));
    assert!(tree_of(temp.path()).is_empty());
}

#[tokio::test]
async fn expired_credentials_abort_with_an_auth_error() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/remote/v1/events"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let archiver =
        TadpolesArchiver::new(config_for_year(&server.uri(), temp.path(), 2020, false)).unwrap();
    match archiver.archive_all().await {
        Err(error) => {
            assert!(matches!(error, Error::Auth { status: 401 }));
            assert!(
                !error.is_transient(),
                "an expired cookie is not worth retrying"
            );
        }
        Ok(_) => panic!("a 401 listing must abort the run"),
    }
}
