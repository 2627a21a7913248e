#![allow(dead_code)]

use axum::{
    body::{ to_bytes, Body },
    extract::State,
    http::{ HeaderMap, Request, StatusCode },
    response::IntoResponse,
    routing::post,
    Json,
    Router,
};
use serde_json::Value;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const GEMINI_ROUTE: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const OPENAI_ROUTE: &str = "/v1/chat/completions";

#[derive(Clone, Debug)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Canned upstream provider: answers every call with the same status and body.
#[derive(Clone)]
pub struct StubUpstream {
    status: StatusCode,
    reply: Value,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Captured>>>,
}

impl StubUpstream {
    pub fn new(status: StatusCode, reply: Value) -> Self {
        Self { status, reply, delay: None, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Captured> {
        self.calls.lock().unwrap().clone()
    }

    /// Serves the stub on an ephemeral port and returns its base URL.
    pub async fn spawn(&self, route: &str) -> String {
        let app = Router::new().route(route, post(stub_handler)).with_state(self.clone());
        spawn_router(app).await
    }
}

async fn stub_handler(
    State(stub): State<StubUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>
) -> impl IntoResponse {
    stub.calls.lock().unwrap().push(Captured { headers, body });
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    (stub.status, Json(stub.reply.clone()))
}

pub async fn spawn_router(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
