//! Loading configuration documents through the broker.

mod support;

use std::io::Write;
use std::sync::Arc;

use hlsview_core::{
    BrokerSettings, ConfigLoadError, LocationFetcher, PlayerBroker, PlayerError,
    PlayerSource, PlayerState,
};
use support::{STREAM_CONFIG, StaticFetcher};
use url::Url;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn file_broker() -> PlayerBroker {
    PlayerBroker::new(Arc::new(LocationFetcher::default()), BrokerSettings::default())
}

#[tokio::test]
async fn loads_from_file_url_and_plain_path() {
    let file = write_config(
        r#"[{
            "id": "lobby",
            "autoplay": true,
            "width": 1280,
            "height": 720,
            "controls": { "enabled": true, "volume": 0.25 },
            "source": { "url": "http://host/lobby.m3u8", "title": "Lobby" }
        }]"#,
    );
    let broker = file_broker();

    let url = Url::from_file_path(file.path()).expect("file url");
    let from_url = broker.load_configuration(url.as_str()).await.unwrap();
    assert_eq!(from_url.id, "lobby");
    assert!(from_url.autoplay);
    assert_eq!(from_url.size(), (1280, 720));
    assert_eq!(from_url.controls.volume, 0.25);
    assert_eq!(from_url.source.title, "Lobby");

    let path = file.path().to_str().expect("utf-8 path");
    let from_path = broker.load_configuration(path).await.unwrap();
    assert_eq!(from_path, from_url);
}

#[tokio::test]
async fn missing_file_reports_load_error() {
    let broker = file_broker();
    let err = broker
        .load_configuration("/no/such/dir/player.json")
        .await
        .unwrap_err();

    match err {
        PlayerError::ConfigurationLoad { location, source } => {
            assert_eq!(location, "/no/such/dir/player.json");
            assert!(matches!(source, ConfigLoadError::Io { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!broker.is_loaded());
}

#[tokio::test]
async fn failed_reload_keeps_previous_configuration() {
    let good = write_config(STREAM_CONFIG);
    let bad = write_config(r#"{"id":"not-an-array"}"#);
    let broker = file_broker();

    broker
        .load_configuration(good.path().to_str().unwrap())
        .await
        .unwrap();
    let mut configs = broker.subscribe_config();
    assert!(configs.try_recv().is_some(), "config channel replays");

    let err = broker
        .load_configuration(bad.path().to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlayerError::ConfigurationLoad {
            source: ConfigLoadError::NotAnArray { found: "object" },
            ..
        }
    ));

    assert_eq!(
        broker.current_source().unwrap().url,
        "http://host/stream.m3u8"
    );
    assert_eq!(configs.try_recv(), None, "failed load must not publish");
}

#[tokio::test]
async fn load_issues_exactly_one_fetch() {
    let fetcher = StaticFetcher::document(STREAM_CONFIG);
    let broker = PlayerBroker::new(fetcher.clone(), BrokerSettings::default());

    broker.load_configuration("http://config/a.json").await.unwrap();
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn http_status_failures_are_not_retried() {
    let fetcher = StaticFetcher::status(503);
    let broker = PlayerBroker::new(fetcher.clone(), BrokerSettings::default());

    let err = broker
        .load_configuration("http://config/a.json")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlayerError::ConfigurationLoad {
            source: ConfigLoadError::Status { status: 503, .. },
            ..
        }
    ));
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn configuration_without_source_publishes_no_source() {
    let fetcher = StaticFetcher::document(r#"[{ "id": "blank" }]"#);
    let broker = PlayerBroker::new(fetcher, BrokerSettings::default());
    broker.load_configuration("cfg").await.unwrap();

    let mut sources = broker.subscribe_source();
    assert_eq!(sources.try_recv(), None);
    let mut configs = broker.subscribe_config();
    assert_eq!(configs.try_recv().map(|model| model.id), Some("blank".into()));
}

#[tokio::test]
async fn reload_replays_only_the_new_configuration() {
    let first = write_config(STREAM_CONFIG);
    let second = write_config(r#"[{ "id": "blank" }]"#);
    let broker = file_broker();

    broker
        .load_configuration(first.path().to_str().unwrap())
        .await
        .unwrap();
    broker.set_player_state(PlayerState::Playing).unwrap();

    let reloaded = broker
        .load_configuration(second.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(reloaded.id, "blank");
    assert_eq!(broker.current_state(), None);
    assert_eq!(broker.current_source(), Some(PlayerSource::default()));

    assert_eq!(broker.subscribe_source().try_recv(), None);
    assert_eq!(broker.subscribe_state().try_recv(), None);
    assert_eq!(
        broker.subscribe_config().try_recv().map(|model| model.id),
        Some("blank".into())
    );
}

#[tokio::test]
async fn reload_with_new_stream_replays_new_source() {
    let first = write_config(STREAM_CONFIG);
    let second = write_config(r#"[{ "source": "http://host/replacement.m3u8" }]"#);
    let broker = file_broker();

    broker
        .load_configuration(first.path().to_str().unwrap())
        .await
        .unwrap();
    broker.set_player_state(PlayerState::Paused).unwrap();
    let mut running = broker.subscribe_source();
    assert!(running.try_recv().is_some());

    broker
        .load_configuration(second.path().to_str().unwrap())
        .await
        .unwrap();

    let replacement = PlayerSource::new("http://host/replacement.m3u8");
    assert_eq!(running.try_recv(), Some(replacement.clone()));
    assert_eq!(broker.subscribe_source().try_recv(), Some(replacement));
    assert_eq!(broker.subscribe_state().try_recv(), None);
}
