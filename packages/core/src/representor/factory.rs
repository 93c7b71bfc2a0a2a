//! Content-type dispatch to representor constructors.
//!
//! The factory is a registry: adding a format is one
//! [`RepresentorFactory::register`] call, and nothing that calls
//! [`RepresentorFactory::create`] changes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use url::Url;

use super::{HalRepresentor, JsonRepresentor, Representor};
use crate::config::{HalOptions, HAL_JSON, JSON};
use crate::error::{Error, Result};

/// Builds a representor from `(source_uri, content_type, bytes)`.
pub type Constructor =
    Arc<dyn Fn(&Url, &str, &[u8]) -> Result<Box<dyn Representor>> + Send + Sync>;

/// Registry mapping media types to representor constructors.
///
/// Lookups use the media-type essence: parameters such as `charset` are
/// dropped and the comparison is ASCII case-insensitive.
#[derive(Clone)]
pub struct RepresentorFactory {
    constructors: BTreeMap<String, Constructor>,
}

impl RepresentorFactory {
    /// A factory with no formats registered.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A factory serving HAL+JSON (with `hal` settings) and plain JSON.
    pub fn new(hal: HalOptions) -> Self {
        let mut factory = Self::empty();
        factory.register(
            HAL_JSON,
            Arc::new(move |uri: &Url, content_type: &str, bytes: &[u8]| {
                HalRepresentor::parse(uri.clone(), content_type, bytes, hal.clone())
                    .map(|r| Box::new(r) as Box<dyn Representor>)
            }),
        );
        factory.register(
            JSON,
            Arc::new(|uri: &Url, content_type: &str, bytes: &[u8]| {
                JsonRepresentor::parse(uri.clone(), content_type, bytes)
                    .map(|r| Box::new(r) as Box<dyn Representor>)
            }),
        );
        factory
    }

    /// Map `media_type` to `constructor`, replacing any earlier mapping.
    pub fn register(&mut self, media_type: &str, constructor: Constructor) {
        self.constructors.insert(essence(media_type), constructor);
    }

    pub fn supports(&self, content_type: &str) -> bool {
        self.constructors.contains_key(&essence(content_type))
    }

    /// Registered media types, sorted.
    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Parse `bytes` with the representor registered for `content_type`.
    ///
    /// Fails with [`Error::UnsupportedContentType`] when nothing is registered.
    pub fn create(
        &self,
        source_uri: &Url,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Box<dyn Representor>> {
        let key = essence(content_type);
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| Error::UnsupportedContentType(content_type.to_string()))?;
        debug!("representor: parsing {} bytes from {source_uri} as {key}", bytes.len());
        constructor(source_uri, content_type, bytes)
    }

    /// Read `Content-Type` from `headers` and delegate to [`create`](Self::create).
    ///
    /// Fails with [`Error::MissingContentType`] when the header is absent or blank.
    pub fn create_from_response(
        &self,
        source_uri: &Url,
        headers: &[(String, String)],
        bytes: &[u8],
    ) -> Result<Box<dyn Representor>> {
        let content_type = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or(Error::MissingContentType)?;
        self.create(source_uri, content_type, bytes)
    }
}

impl Default for RepresentorFactory {
    fn default() -> Self {
        Self::new(HalOptions::default())
    }
}

impl fmt::Debug for RepresentorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepresentorFactory")
            .field("media_types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// `"Application/HAL+JSON; charset=utf-8"` → `"application/hal+json"`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
