//! Format-specific views of fetched bodies.
//!
//! A [`Representor`] is what a [`Resource`](crate::Resource) caches after a
//! successful fetch: the decoded [`Body`] plus the links found in it. Which
//! representor is built depends only on the response's content type, via the
//! [`RepresentorFactory`] registry.
//!
//! | Type | Content type |
//! |------|--------------|
//! | [`HalRepresentor`] | `application/hal+json` |
//! | [`JsonRepresentor`] | `application/json` |

pub mod factory;
pub mod hal;
pub mod json;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, Result};
use crate::link::{Link, LinkSet};

pub use factory::{Constructor, RepresentorFactory};
pub use hal::HalRepresentor;
pub use json::JsonRepresentor;

/// A decoded document: plain properties, nested bodies and links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    /// Every top-level member that is not a hypermedia control.
    pub properties: Map<String, Value>,

    /// Nested bodies by rel, in document order within a rel.
    pub embedded: BTreeMap<String, Vec<Body>>,

    /// Links by rel.
    pub links: LinkSet,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a top-level property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Nested bodies under `rel`, empty if there are none.
    pub fn embedded(&self, rel: &str) -> &[Body] {
        self.embedded.get(rel).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A parsed representation of one fetched resource.
///
/// Built once per successful fetch and never modified afterwards; the links
/// are derived from the body when the representor is constructed.
pub trait Representor: fmt::Debug + Send + Sync {
    /// URI the representation was fetched from; the context of its links.
    fn source_uri(&self) -> &Url;

    /// Content type the representation was parsed as.
    fn content_type(&self) -> &str;

    fn body(&self) -> &Body;

    /// Serialize back into this representor's wire format.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    fn links(&self) -> &LinkSet {
        &self.body().links
    }

    /// The first link for `rel`.
    fn get_link(&self, rel: &str) -> Result<&Link> {
        self.links()
            .get(rel)
            .first()
            .ok_or_else(|| Error::LinkNotFound(rel.to_string()))
    }

    /// Every link for `rel`; an empty `rel` returns all links.
    fn get_links(&self, rel: &str) -> Vec<&Link> {
        if rel.is_empty() {
            self.links().values()
        } else {
            self.links().get(rel).iter().collect()
        }
    }

    fn has_link(&self, rel: &str) -> bool {
        self.links().has(rel)
    }
}

/// Decode `bytes` as a JSON object, the shared first step of the JSON-based formats.
pub(crate) fn decode_object(bytes: &[u8]) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::UnsupportedBody(format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::UnsupportedBody(format!(
            "top level must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
