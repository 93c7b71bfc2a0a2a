//! Shared helpers for the getting conformance test suite.
//!
//! Provides [`spawn_server`], which serves an axum router on an ephemeral
//! loopback port from a background thread, and [`spawn_hal_api`], a small
//! HAL+JSON order API built on it. The server runs on its own tokio runtime
//! so tests can drive it with the blocking client without nesting runtimes.
//!
//! # Routes served by [`spawn_hal_api`]
//!
//! | Path | Response |
//! |------|----------|
//! | `/` | root document: `self`, `test`, `orders`, `find` (templated), `search` (templated) |
//! | `/orders` | order list: `item` links, embedded orders, echoes `q` |
//! | `/orders/{id}` | one order with `up` back to the list |
//! | `/echo` | HAL body echoing the `accept` and `x-*` request headers |
//! | `/json` | plain `application/json` |
//! | `/plain` | `text/plain` |
//! | `/bare` | empty body with no content type |
//! | anything else | `404` with a HAL error body |

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

/// Counts every request the API has served.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Serve `router` on `127.0.0.1:<ephemeral>` and return its base URL,
/// e.g. `http://127.0.0.1:51234`.
///
/// The listener is bound before this returns, so requests made immediately
/// afterwards queue until the server thread accepts them.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub fn spawn_server(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener
        .set_nonblocking(true)
        .expect("set listener non-blocking");
    let addr = listener.local_addr().expect("get local addr");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build server runtime");
        runtime.block_on(async move {
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("adopt std listener");
            axum::serve(listener, router)
                .await
                .expect("conformance server error");
        });
    });

    format!("http://{addr}")
}

/// Start the order API and return `(base_url, hits)`.
pub fn spawn_hal_api() -> (String, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/", get(root))
        .route("/orders", get(orders))
        .route("/orders/{id}", get(order))
        .route("/echo", get(echo))
        .route("/json", get(plain_json))
        .route("/plain", get(plain_text))
        .route("/bare", get(bare))
        .fallback(not_found)
        .with_state(hits.clone());
    (spawn_server(router), hits)
}

/// A response with `Content-Type: application/hal+json`.
pub fn hal(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/hal+json")],
        body.to_string(),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root(State(hits): State<Hits>) -> Response {
    hits.record();
    hal(
        StatusCode::OK,
        json!({
            "_links": {
                "self": { "href": "/", "title": "Test" },
                "test": { "href": "/", "title": "WINNING" },
                "orders": { "href": "/orders", "title": "Orders" },
                "find": { "href": "/orders{/id}", "templated": true },
                "search": { "href": "orders{?q}", "templated": true }
            },
            "foo": "bar"
        }),
    )
}

async fn orders(
    State(hits): State<Hits>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.record();
    let mut body = json!({
        "_links": {
            "self": { "href": "/orders" },
            "up": { "href": "/" },
            "item": [
                { "href": "/orders/1", "name": "first" },
                { "href": "/orders/2", "name": "second" }
            ]
        },
        "_embedded": {
            "item": [order_body(1), order_body(2)]
        },
        "count": 2
    });
    if let Some(q) = params.get("q") {
        body["q"] = json!(q);
    }
    hal(StatusCode::OK, body)
}

async fn order(State(hits): State<Hits>, Path(id): Path<u32>) -> Response {
    hits.record();
    if !(1..=2).contains(&id) {
        return hal(StatusCode::NOT_FOUND, json!({ "error": "no such order" }));
    }
    hal(StatusCode::OK, order_body(id))
}

fn order_body(id: u32) -> Value {
    json!({
        "_links": {
            "self": { "href": format!("/orders/{id}") },
            "up": { "href": "/orders" }
        },
        "id": id,
        "total": id * 10
    })
}

async fn echo(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    hits.record();
    let mut echoed = serde_json::Map::new();
    for (name, value) in &headers {
        let name = name.as_str();
        if name == "accept" || name.starts_with("x-") {
            echoed.insert(name.to_string(), json!(value.to_str().unwrap_or_default()));
        }
    }
    hal(
        StatusCode::OK,
        json!({ "_links": { "self": { "href": "/echo" } }, "headers": echoed }),
    )
}

async fn plain_json(State(hits): State<Hits>) -> Response {
    hits.record();
    (
        [(header::CONTENT_TYPE, "application/json")],
        json!({ "kind": "plain", "_links": { "self": { "href": "/json" } } }).to_string(),
    )
        .into_response()
}

async fn plain_text(State(hits): State<Hits>) -> Response {
    hits.record();
    ([(header::CONTENT_TYPE, "text/plain")], "just text").into_response()
}

async fn bare(State(hits): State<Hits>) -> Response {
    hits.record();
    StatusCode::OK.into_response()
}

async fn not_found(State(hits): State<Hits>, uri: Uri) -> Response {
    hits.record();
    hal(
        StatusCode::NOT_FOUND,
        json!({ "error": "not found", "path": uri.path() }),
    )
}
