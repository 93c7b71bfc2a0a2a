//! Hypermedia navigation over HAL+JSON.
//!
//! Start from a bookmark URI and move between server-side resources by
//! relationship name ("rel") instead of building URLs by hand. Resources are
//! fetched lazily, at most once each, and parsed by a representor chosen from
//! the response's content type.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`Client`]: bookmark, shared transport and representor registry |
//! | [`resource`] | [`Resource`]: lazy single-fetch endpoint with `get`/`link`/`follow` |
//! | [`link`] | [`Link`] resolution and the rel-keyed [`LinkSet`] |
//! | [`template`] | RFC 6570 URI template expansion |
//! | [`representor`] | [`Representor`] trait, HAL and JSON variants, [`RepresentorFactory`] |
//! | [`transport`] | [`Transport`] contract and the `reqwest`-backed [`HttpTransport`] |
//! | [`config`] | [`ClientConfig`] and HAL serialization options |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use getting::Client;
//!
//! let client = Client::new("https://api.example.com/")?;
//!
//! // GET / once, find its "orders" link, then GET the orders resource.
//! let mut orders = client.follow("orders")?;
//! let body = orders.get()?;
//! println!("{} orders", body.property("count").unwrap_or(&0.into()));
//!
//! // Templated links take variables.
//! let vars = [("id".to_string(), "42".to_string())].into();
//! let order = orders.follow_with("find", &vars)?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod link;
pub mod representor;
pub mod resource;
pub mod template;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, HalOptions, SingleLinkEncoding};
pub use error::{Error, Result};
pub use link::{Link, LinkSet};
pub use representor::{Body, Representor, RepresentorFactory};
pub use resource::Resource;
pub use transport::{FetchRequest, FetchResponse, HttpTransport, Transport, TransportError};
