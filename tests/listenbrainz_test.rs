use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT as USER_AGENT_HEADER},
    response::{IntoResponse, Response},
    routing::get,
};
use indicatif::ProgressBar;
use monthplgen::cli::monthly_playlist;
use monthplgen::error::Error;
use monthplgen::listenbrainz::{ListenClient, USER_AGENT};
use monthplgen::management::CollectOptions;
use monthplgen::utils::resolve_month;
use serde_json::json;

#[derive(Debug, Clone)]
struct Request {
    user: String,
    max_ts: Option<String>,
    user_agent: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockState {
    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

async fn listens(
    State(state): State<MockState>,
    Path(user): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.requests.lock().unwrap().push(Request {
        user,
        max_ts: query.get("max_ts").cloned(),
        user_agent: headers
            .get(USER_AGENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let reply = state.replies.lock().unwrap().pop_front();
    let (status, body) = reply.unwrap_or((StatusCode::NOT_FOUND, String::new()));
    (
        status,
        [
            ("X-RateLimit-Limit", "30"),
            ("X-RateLimit-Remaining", "29"),
            ("X-RateLimit-Reset-In", "10"),
            ("X-RateLimit-Reset", "1709164810"),
        ],
        body,
    )
        .into_response()
}

async fn serve(replies: Vec<(StatusCode, String)>) -> (String, MockState) {
    let state = MockState {
        replies: Arc::new(Mutex::new(replies.into())),
        ..Default::default()
    };
    let app = Router::new()
        .route("/1/user/{user}/listens", get(listens))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn body(listens: &[(i64, &str)]) -> (StatusCode, String) {
    let listens: Vec<_> = listens
        .iter()
        .map(|(ts, mbid)| {
            json!({
                "listened_at": ts,
                "track_metadata": {
                    "artist_name": "Artist",
                    "track_name": "Track",
                    "mbid_mapping": { "recording_mbid": mbid }
                }
            })
        })
        .collect();
    let payload = json!({
        "payload": { "count": listens.len(), "user_id": "rob", "listens": listens }
    });
    (StatusCode::OK, payload.to_string())
}

#[tokio::test]
async fn test_two_pages_over_http() {
    let range = resolve_month("2024-02", "UTC").unwrap();
    let start = range.start_ts();
    let (url, state) = serve(vec![
        body(&[(start + 900, "a"), (start + 600, "b")]),
        body(&[(start + 300, "a"), (start - 60, "c")]),
    ])
    .await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    let (document, collected) = monthly_playlist(
        &client,
        "rob",
        &range,
        CollectOptions::default(),
        None,
        ProgressBar::hidden(),
        std::future::pending(),
    )
    .await
    .unwrap();

    let requests = state.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.user == "rob"));
    assert_eq!(requests[0].max_ts, Some(range.end_ts().to_string()));
    assert_eq!(requests[1].max_ts, Some((start + 600).to_string()));
    assert_eq!(requests[0].user_agent.as_deref(), Some(USER_AGENT));

    assert_eq!(collected.tally.get("a"), 2);
    let ids: Vec<&str> = document
        .playlist
        .track
        .iter()
        .map(|t| t.identifier.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "https://musicbrainz.org/recording/a",
            "https://musicbrainz.org/recording/b",
            "https://musicbrainz.org/recording/c",
        ]
    );
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let (url, _state) = serve(vec![(
        StatusCode::INTERNAL_SERVER_ERROR,
        "oops".to_string(),
    )])
    .await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    let err = client.get_listens("rob", 1709164800).await.unwrap_err();
    assert!(err.is_fetch());
    match err {
        Error::Status { status, url } => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/1/user/rob/listens?max_ts=1709164800"));
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (url, _state) = serve(vec![(StatusCode::OK, "{\"payload\": [".to_string())]).await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    let err = client.get_listens("rob", 1709164800).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(!err.is_fetch());
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let (url, _state) = serve(vec![(StatusCode::OK, json!({ "listens": [] }).to_string())]).await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    let err = client.get_listens("rob", 1709164800).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn test_payload_without_listens_is_decode_error() {
    let (url, _state) = serve(vec![
        (StatusCode::OK, json!({ "payload": { "count": 25 } }).to_string()),
        (StatusCode::OK, json!({ "payload": {} }).to_string()),
    ])
    .await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    for _ in 0..2 {
        let err = client.get_listens("rob", 1709164800).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    }
}

#[tokio::test]
async fn test_connection_failure_is_fetch_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ListenClient::new(&format!("http://{}", addr), Duration::ZERO).unwrap();

    let err = client.get_listens("rob", 1709164800).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn test_delay_precedes_every_request() {
    let (url, state) = serve(vec![body(&[(100, "a")]), body(&[(50, "a")])]).await;
    let client = ListenClient::new(&url, Duration::from_millis(50)).unwrap();

    let started = Instant::now();
    client.get_listens("rob", 200).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
    client.get_listens("rob", 100).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(state.requests().len(), 2);
}

#[tokio::test]
async fn test_page_decodes_listen_fields() {
    let (url, _state) = serve(vec![body(&[(1709000000, "a"), (1708000000, "")])]).await;
    let client = ListenClient::new(&url, Duration::ZERO).unwrap();

    let page = client.get_listens("rob", 1709164800).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.reported_count(), 2);
    assert_eq!(page.listens()[0].listened_at(), 1709000000);
    assert_eq!(page.listens()[0].recording_id(), Some("a"));
    assert_eq!(page.listens()[1].recording_id(), None);
    assert_eq!(page.oldest().map(|l| l.listened_at()), Some(1708000000));
}
