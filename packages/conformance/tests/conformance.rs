//! End-to-end conformance tests for hypermedia navigation.
//!
//! Each test spawns the loopback order API via
//! [`getting_conformance::spawn_hal_api`] (real TCP, real HTTP) and drives it
//! through a [`getting::Client`] using the default `reqwest` transport.
//!
//! # Coverage
//!
//! | Test | Behaviour |
//! |------|-----------|
//! | `follow_self_then_get` | bookmark → `self` → body properties and link resolution |
//! | `follow_shortcut_from_bookmark` | `Client::follow` |
//! | `missing_resource_unknown_rel_is_link_not_found` | error kinds on a 404 HAL body |
//! | `empty_bookmark_is_rejected` | configuration error |
//! | `each_resource_is_fetched_once` | at-most-one fetch per resource |
//! | `navigates_a_chain_of_rels` | multi-step `follow` |
//! | `embedded_orders_are_parsed` | recursive `_embedded` |
//! | `templated_path_link` / `templated_query_link` | `follow_with` |
//! | `relative_go_from_resource` | `Resource::go` |
//! | `plain_json_has_no_links` | second registered representor |
//! | `text_plain_is_unsupported` / `missing_content_type_is_reported` | factory dispatch errors |
//! | `accept_and_one_shot_headers_are_sent` | request headers |
//! | `connection_refused_is_transport_error` | transport error |
//! | `fetched_document_reserializes` | HAL round trip |

use std::collections::HashMap;

use getting::{Client, ClientConfig, Error, RepresentorFactory};
use getting_conformance::spawn_hal_api;
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn client(base: &str) -> Client {
    let config = ClientConfig {
        timeout_secs: 5,
        ..ClientConfig::default()
    };
    Client::builder(base).config(config).build().unwrap()
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn follow_self_then_get() {
    let (base, _) = spawn_hal_api();
    let client = client(&base);

    let mut me = client.follow("self").unwrap();
    let body = me.get().unwrap();
    assert_eq!(body.property("foo"), Some(&json!("bar")));

    let self_link = &body.links.get("self")[0];
    assert_eq!(self_link.title.as_deref(), Some("Test"));
    assert_eq!(self_link.resolve().unwrap().as_str(), format!("{base}/"));
}

#[test]
fn follow_shortcut_from_bookmark() {
    let (base, _) = spawn_hal_api();
    let mut test = client(&base).follow("test").unwrap();

    let link = test.link("test").unwrap();
    assert_eq!(link.href, "/");
    assert_eq!(link.title.as_deref(), Some("WINNING"));
}

#[test]
fn missing_resource_unknown_rel_is_link_not_found() {
    let (base, _) = spawn_hal_api();
    let mut missing = client(&base).go("/missing").unwrap();

    let err = missing.follow("nonexistent-rel").unwrap_err();
    assert!(matches!(err, Error::LinkNotFound(rel) if rel == "nonexistent-rel"));
    assert_eq!(missing.status(), Some(404));
    assert_eq!(
        missing.get().unwrap().property("path"),
        Some(&json!("/missing"))
    );
}

#[test]
fn empty_bookmark_is_rejected() {
    assert!(matches!(Client::new(""), Err(Error::Configuration(_))));
}

#[test]
fn each_resource_is_fetched_once() {
    let (base, hits) = spawn_hal_api();
    let mut root = client(&base).go("").unwrap();

    root.representation().unwrap();
    root.get().unwrap();
    root.link("orders").unwrap();
    let _orders = root.follow("orders").unwrap();
    let _again = root.follow("orders").unwrap();

    assert_eq!(hits.count(), 1);
}

#[test]
fn navigates_a_chain_of_rels() {
    let (base, hits) = spawn_hal_api();

    let mut second = client(&base)
        .follow("orders")
        .unwrap()
        .follow("item")
        .unwrap()
        .follow("up")
        .unwrap()
        .links("item")
        .unwrap()
        .iter()
        .find(|l| l.name.as_deref() == Some("second"))
        .map(|l| l.resolve().unwrap())
        .map(|uri| client(&base).go(uri.as_str()).unwrap())
        .unwrap();

    assert_eq!(second.get().unwrap().property("total"), Some(&json!(20)));
    // root, orders, orders/1, orders, orders/2
    assert_eq!(hits.count(), 5);
}

#[test]
fn embedded_orders_are_parsed() {
    let (base, _) = spawn_hal_api();
    let mut orders = client(&base).follow("orders").unwrap();
    let body = orders.get().unwrap();

    let embedded = body.embedded("item");
    assert_eq!(embedded.len(), 2);
    assert_eq!(embedded[1].property("id"), Some(&json!(2)));
    assert_eq!(
        embedded[1].links.get("self")[0].resolve().unwrap().as_str(),
        format!("{base}/orders/2")
    );
}

#[test]
fn templated_path_link() {
    let (base, _) = spawn_hal_api();
    let mut order = client(&base)
        .follow_with("find", &vars(&[("id", "2")]))
        .unwrap();

    assert_eq!(order.uri().as_str(), format!("{base}/orders/2"));
    assert_eq!(order.get().unwrap().property("total"), Some(&json!(20)));
}

#[test]
fn templated_query_link() {
    let (base, _) = spawn_hal_api();
    let mut found = client(&base)
        .follow_with("search", &vars(&[("q", "blue shoes")]))
        .unwrap();

    assert_eq!(found.uri().as_str(), format!("{base}/orders?q=blue%20shoes"));
    assert_eq!(found.get().unwrap().property("q"), Some(&json!("blue shoes")));
}

#[test]
fn relative_go_from_resource() {
    let (base, _) = spawn_hal_api();
    let order = client(&base).go("/orders/1").unwrap();
    let mut sibling = order.go("2").unwrap();

    assert_eq!(sibling.uri().as_str(), format!("{base}/orders/2"));
    assert_eq!(sibling.get().unwrap().property("id"), Some(&json!(2)));
}

// ---------------------------------------------------------------------------
// Representor dispatch
// ---------------------------------------------------------------------------

#[test]
fn plain_json_has_no_links() {
    let (base, _) = spawn_hal_api();
    let mut plain = client(&base).go("/json").unwrap();

    let representation = plain.representation().unwrap();
    assert_eq!(representation.content_type(), "application/json");
    assert_eq!(representation.body().property("kind"), Some(&json!("plain")));
    assert!(!representation.has_link("self"));
}

#[test]
fn text_plain_is_unsupported() {
    let (base, _) = spawn_hal_api();
    let mut text = client(&base).go("/plain").unwrap();

    let err = text.get().map(|_| ()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedContentType(ct) if ct.starts_with("text/plain")));
    assert!(!text.is_fetched());
}

#[test]
fn missing_content_type_is_reported() {
    let (base, _) = spawn_hal_api();
    let mut bare = client(&base).go("/bare").unwrap();

    let err = bare.get().map(|_| ()).unwrap_err();
    assert!(matches!(err, Error::MissingContentType));
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[test]
fn accept_and_one_shot_headers_are_sent() {
    let (base, _) = spawn_hal_api();
    let mut echo = client(&base).go("/echo").unwrap();
    echo.set_next_header("X-Request-Id", "abc-123");

    let headers = echo.get().unwrap().property("headers").cloned().unwrap();
    assert_eq!(headers["accept"], json!("application/hal+json"));
    assert_eq!(headers["x-request-id"], json!("abc-123"));
}

#[test]
fn connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut root = client(&format!("http://127.0.0.1:{port}")).go("").unwrap();

    assert!(matches!(root.get(), Err(Error::Transport(_))));
    assert!(!root.is_fetched());
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn fetched_document_reserializes() {
    let (base, _) = spawn_hal_api();
    let mut orders = client(&base).follow("orders").unwrap();
    let uri = orders.uri().clone();

    let representation = orders.representation().unwrap();
    let bytes = representation.to_bytes().unwrap();
    let reparsed = RepresentorFactory::default()
        .create(&uri, "application/hal+json", &bytes)
        .unwrap();

    assert_eq!(reparsed.body(), representation.body());

    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["_links"]["self"], json!({ "href": "/orders" }));
    assert!(value["_links"]["item"].is_array());
}
