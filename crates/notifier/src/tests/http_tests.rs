use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};
use url::Url;

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<Option<oneshot::Sender<(Option<String>, Value)>>>>,
    status: StatusCode,
}

async fn handle_email(
    State(state): State<CaptureState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, &'static str) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send((auth, payload));
    }
    (state.status, "{\"message\":\"handled\"}")
}

async fn spawn_email_api(
    status: StatusCode,
) -> anyhow::Result<(Url, oneshot::Receiver<(Option<String>, Value)>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
    };
    let app = Router::new()
        .route("/emails", post(handle_email))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/emails"))?, rx))
}

fn sample_message() -> EmailMessage {
    EmailMessage {
        to: "ada@example.com".into(),
        subject: "RSVP confirmed".into(),
        html: "<p>See you there</p>".into(),
        text: "See you there".into(),
    }
}

fn notifier_for(endpoint: Url) -> HttpNotifier {
    HttpNotifier::new(HttpNotifierConfig {
        endpoint,
        api_key: "test-key".into(),
        from: "Party <party@example.com>".into(),
    })
}

#[tokio::test]
async fn http_notifier_posts_json_with_bearer_key() {
    let (endpoint, rx) = spawn_email_api(StatusCode::OK).await.expect("spawn api");
    let notifier = notifier_for(endpoint);

    notifier.send(&sample_message()).await.expect("send");

    let (auth, payload) = rx.await.expect("captured request");
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(payload["from"], "Party <party@example.com>");
    assert_eq!(payload["to"], serde_json::json!(["ada@example.com"]));
    assert_eq!(payload["subject"], "RSVP confirmed");
    assert_eq!(payload["html"], "<p>See you there</p>");
    assert_eq!(payload["text"], "See you there");
}

#[tokio::test]
async fn http_notifier_treats_rejection_as_failure() {
    let (endpoint, _rx) = spawn_email_api(StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .expect("spawn api");
    let notifier = notifier_for(endpoint);

    let err = notifier
        .send(&sample_message())
        .await
        .expect_err("must fail");
    let text = err.to_string();
    assert!(text.contains("422"), "unexpected error: {text}");
    assert!(text.contains("ada@example.com"), "unexpected error: {text}");
}

#[tokio::test]
async fn http_notifier_reports_unreachable_endpoint() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let notifier = notifier_for(Url::parse(&format!("http://{addr}/emails")).expect("url"));
    let err = notifier
        .send(&sample_message())
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("failed to reach notification api"));
}

#[test]
fn config_debug_redacts_api_key() {
    let config = HttpNotifierConfig {
        endpoint: Url::parse(DEFAULT_ENDPOINT).expect("url"),
        api_key: "super-secret".into(),
        from: "party@example.com".into(),
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[tokio::test]
async fn memory_notifier_records_and_rejects_by_recipient() {
    let notifier = MemoryNotifier::new();
    notifier.reject("ada@example.com").await;

    assert!(notifier.send(&sample_message()).await.is_err());
    assert!(notifier.delivered().await.is_empty());

    notifier.accept("ada@example.com").await;
    notifier.send(&sample_message()).await.expect("send");
    assert_eq!(notifier.delivered().await, vec![sample_message()]);
}

#[tokio::test]
async fn log_notifier_always_accepts() {
    LogNotifier.send(&sample_message()).await.expect("dry run");
}
