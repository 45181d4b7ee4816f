//! Integration tests for the REST session client
//!
//! Each test starts an in-process fake router that speaks the subset of the
//! RouterOS REST interface the client uses.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use routeros_client::{
    DialOptions, RestDialer, RouterDialer, RouterOSError, RouterSession, SentenceTag,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// admin:secret
const AUTHORIZATION: &str = "Basic YWRtaW46c2VjcmV0";

#[derive(Clone, Default)]
struct FakeRouter {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == AUTHORIZATION)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": 401, "message": "Unauthorized"})),
    )
        .into_response()
}

async fn identity(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"name": "fake-router"})).into_response()
}

async fn interface_print(
    State(router): State<FakeRouter>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    router.bodies.lock().unwrap().push(("/interface/print".to_string(), body));
    Json(json!([
        {".id": "*1", "name": "ether1", "type": "ether", "running": "true"},
        {".id": "*2", "name": "bridge", "type": "bridge", "running": "true"}
    ]))
    .into_response()
}

async fn address_add(
    State(router): State<FakeRouter>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    router.bodies.lock().unwrap().push(("/ip/address/add".to_string(), body));
    Json(json!({"ret": "*5"})).into_response()
}

async fn address_remove(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": 400, "message": "Bad Request", "detail": "no such item"})),
    )
        .into_response()
}

async fn start_fake_router() -> (SocketAddr, FakeRouter) {
    let router = FakeRouter::default();
    let app = Router::new()
        .route("/rest/system/identity", get(identity))
        .route("/rest/interface/print", post(interface_print))
        .route("/rest/ip/address/add", post(address_add))
        .route("/rest/ip/address/remove", post(address_remove))
        .with_state(router.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, router)
}

fn dialer() -> RestDialer {
    RestDialer::new(DialOptions {
        timeout: Duration::from_secs(2),
        ..DialOptions::default()
    })
}

#[tokio::test]
async fn test_print_returns_records_then_done() {
    let (addr, router) = start_fake_router().await;
    let mut session = dialer()
        .dial(&addr.to_string(), "admin", "secret")
        .await
        .expect("dial should succeed");

    let reply = session.run("/interface/print").await.expect("print should succeed");
    session.close().await.unwrap();

    let tags: Vec<SentenceTag> = reply.sentences.iter().map(|s| s.tag).collect();
    assert_eq!(tags, vec![SentenceTag::Re, SentenceTag::Re, SentenceTag::Done]);
    let first = reply.sentences[0].attributes.as_ref().unwrap();
    assert_eq!(first["name"], "ether1");
    assert_eq!(router.bodies.lock().unwrap()[0].1, json!({}));
}

#[tokio::test]
async fn test_run_args_sends_attributes_and_queries() {
    let (addr, router) = start_fake_router().await;
    let mut session = dialer()
        .dial(&addr.to_string(), "admin", "secret")
        .await
        .unwrap();

    session
        .run_args(&[
            "/interface print".to_string(),
            "?type=ether".to_string(),
            "=.proplist=name,type".to_string(),
        ])
        .await
        .unwrap();

    let bodies = router.bodies.lock().unwrap();
    assert_eq!(bodies[0].0, "/interface/print");
    assert_eq!(
        bodies[0].1,
        json!({".proplist": "name,type", ".query": ["type=ether"]})
    );
}

#[tokio::test]
async fn test_add_return_value_is_on_done() {
    let (addr, _router) = start_fake_router().await;
    let mut session = dialer()
        .dial(&addr.to_string(), "admin", "secret")
        .await
        .unwrap();

    let reply = session
        .run_args(&[
            "/ip/address/add".to_string(),
            "=address=10.0.0.1/24".to_string(),
            "=interface=ether1".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(reply.sentences.len(), 1);
    assert_eq!(reply.sentences[0].tag, SentenceTag::Done);
    assert_eq!(reply.done_attributes().unwrap()["ret"], "*5");
}

#[tokio::test]
async fn test_router_error_becomes_trap() {
    let (addr, _router) = start_fake_router().await;
    let mut session = dialer()
        .dial(&addr.to_string(), "admin", "secret")
        .await
        .unwrap();

    let result = session
        .run_args(&["/ip/address/remove".to_string(), "=.id=*99".to_string()])
        .await;

    match result {
        Err(RouterOSError::Trap { message }) => assert_eq!(message, "Bad Request: no such item"),
        other => panic!("expected trap, got {:?}", other.map(|r| r.sentences)),
    }
}

#[tokio::test]
async fn test_dial_with_wrong_password_fails_authentication() {
    let (addr, _router) = start_fake_router().await;

    let result = dialer().dial(&addr.to_string(), "admin", "wrong").await;

    assert!(matches!(result, Err(RouterOSError::Authentication(_))));
}

#[tokio::test]
async fn test_dial_unreachable_router_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = dialer().dial(&addr.to_string(), "admin", "secret").await;

    assert!(matches!(result, Err(RouterOSError::Http(_))));
}
