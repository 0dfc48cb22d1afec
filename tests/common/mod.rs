#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use smoke_runner::load_catalog;
use smoke_runner::parser::CATALOG_FILE;
use smoke_runner::parser::EMBEDDED_CATALOG;
use smoke_runner::validator::IR;

/// Requests seen by the fixture service, in arrival order.
#[derive(Clone, Default)]
pub struct Fixture {
    pub hits: Arc<Mutex<Vec<String>>>,
    pub login_bodies: Arc<Mutex<Vec<Value>>>,
}

impl Fixture {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn login_bodies(&self) -> Vec<Value> {
        self.login_bodies.lock().unwrap().clone()
    }
}

async fn health(State(fixture): State<Fixture>) -> StatusCode {
    fixture.hits.lock().unwrap().push("/health".into());
    StatusCode::OK
}

async fn login(State(fixture): State<Fixture>, Json(body): Json<Value>) -> StatusCode {
    fixture.hits.lock().unwrap().push("/login".into());
    fixture.login_bodies.lock().unwrap().push(body.clone());

    if body == json!({ "username": "test", "password": "test" }) {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

/// Service that accepts the credentials the catalog sends.
pub fn healthy_service(fixture: Fixture) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .with_state(fixture)
}

/// Service whose login rejects every request.
pub fn rejecting_login_service() -> Router {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/login", post(|| async { StatusCode::UNAUTHORIZED }))
}

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    format!("http://127.0.0.1:{port}")
}

/// The embedded catalog, pointed at `base_url`.
pub fn catalog_for(base_url: &str) -> IR {
    let src = EMBEDDED_CATALOG.replace("http://localhost:3000", base_url);
    load_catalog(&src, CATALOG_FILE).unwrap()
}

pub fn plain_lines(out: &[u8]) -> Vec<String> {
    console::strip_ansi_codes(std::str::from_utf8(out).unwrap())
        .lines()
        .map(str::to_owned)
        .collect()
}
