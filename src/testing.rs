// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process THORNode / RPC stand-in for tests.
//!
//! Requests are matched against route patterns by substring on the decoded
//! `path?key=value&...` string; the first match wins. Unmatched requests get
//! a 404. JSON bodies of POST requests are recorded.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::blockchain::types::NodeUrl;

#[derive(Clone)]
struct Route {
    pattern: String,
    status: StatusCode,
    body: Value,
}

struct MockState {
    routes: Vec<Route>,
    posted: Mutex<Vec<Value>>,
}

/// Canned routes, turned into a running server by [`MockNode::start`].
#[derive(Default)]
pub struct MockNode {
    routes: Vec<Route>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, pattern: &str, body: Value) -> Self {
        self.route_status(pattern, StatusCode::OK, body)
    }

    pub fn route_status(mut self, pattern: &str, status: StatusCode, body: Value) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            status,
            body,
        });
        self
    }

    pub async fn start(self) -> MockServer {
        let state = Arc::new(MockState {
            routes: self.routes,
            posted: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        MockServer { addr, state }
    }
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The same server acting as both THORNode and RPC.
    pub fn urls(&self) -> NodeUrl {
        NodeUrl {
            node: self.url(),
            rpc: self.url(),
        }
    }

    /// JSON bodies of every POST so far.
    pub fn posted(&self) -> Vec<Value> {
        self.state.posted.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    if method == Method::POST {
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        state.posted.lock().unwrap().push(value);
    }

    let target = decoded_target(&uri);
    match state
        .routes
        .iter()
        .find(|route| target.contains(&route.pattern))
    {
        Some(route) => (route.status, Json(route.body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": 5, "message": format!("no route for {target}")})),
        ),
    }
}

fn decoded_target(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => {
            let params: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            format!("{}?{}", uri.path(), params.join("&"))
        }
        None => uri.path().to_string(),
    }
}
