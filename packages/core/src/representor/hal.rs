//! HAL+JSON: `_links`, `_embedded` and everything else as properties.
//!
//! Parsing accepts a rel's link objects (and embedded bodies) either as a
//! single object or as an array. Writing follows [`HalOptions`]: by default a
//! rel with exactly one entry is written as an object, which re-parses to a
//! one-element list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use super::{decode_object, json_kind, Body, Representor};
use crate::config::HalOptions;
use crate::error::{Error, Result};
use crate::link::{Link, LinkSet};

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";

/// A HAL+JSON representation.
#[derive(Debug, Clone, PartialEq)]
pub struct HalRepresentor {
    source_uri: Url,
    content_type: String,
    body: Body,
    options: HalOptions,
}

impl HalRepresentor {
    /// Parse `bytes` fetched from `source_uri`.
    ///
    /// Fails with [`Error::UnsupportedBody`] if the bytes are not a JSON
    /// object (or `_links`/`_embedded` have the wrong shape) and with
    /// [`Error::InvalidLink`] if a link object is unusable.
    pub fn parse(
        source_uri: Url,
        content_type: impl Into<String>,
        bytes: &[u8],
        options: HalOptions,
    ) -> Result<Self> {
        let object = decode_object(bytes)?;
        let body = parse_body(object, &source_uri)?;
        Ok(Self {
            source_uri,
            content_type: content_type.into(),
            body,
            options,
        })
    }

    /// Wrap an already-built body, e.g. to serialize a document assembled in code.
    pub fn from_body(source_uri: Url, body: Body, options: HalOptions) -> Self {
        Self {
            source_uri,
            content_type: crate::config::HAL_JSON.into(),
            body,
            options,
        }
    }

    /// The body as a HAL JSON value.
    pub fn to_value(&self) -> Value {
        body_to_value(&self.body, &self.options)
    }
}

impl Representor for HalRepresentor {
    fn source_uri(&self) -> &Url {
        &self.source_uri
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.to_value())
            .map_err(|e| Error::UnsupportedBody(format!("cannot serialize body: {e}")))
    }
}

// --- link objects ------------------------------------------------------------

/// One HAL link object as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct LinkObject {
    href: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    templated: bool,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    deprecation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hreflang: Option<String>,
}

impl LinkObject {
    fn into_link(self, context: &Url) -> Link {
        Link {
            context: context.clone(),
            href: self.href,
            templated: self.templated,
            name: self.name,
            title: self.title,
            media_type: self.media_type,
            deprecation: self.deprecation,
            profile: self.profile,
            hreflang: self.hreflang,
        }
    }
}

impl From<&Link> for LinkObject {
    fn from(link: &Link) -> Self {
        Self {
            href: link.href.clone(),
            templated: link.templated,
            media_type: link.media_type.clone(),
            deprecation: link.deprecation.clone(),
            name: link.name.clone(),
            profile: link.profile.clone(),
            title: link.title.clone(),
            hreflang: link.hreflang.clone(),
        }
    }
}

// --- parsing -----------------------------------------------------------------

fn parse_body(object: Map<String, Value>, context: &Url) -> Result<Body> {
    let mut body = Body::new();

    for (key, value) in object {
        match key.as_str() {
            LINKS => body.links = parse_links(value, context)?,
            EMBEDDED => {
                let rels = match value {
                    Value::Object(rels) => rels,
                    other => {
                        return Err(Error::UnsupportedBody(format!(
                            "_embedded must be an object, got {}",
                            json_kind(&other)
                        )))
                    }
                };
                for (rel, nested) in rels {
                    let bodies = one_or_many(nested)
                        .into_iter()
                        .map(|item| match item {
                            Value::Object(map) => parse_body(map, context),
                            other => Err(Error::UnsupportedBody(format!(
                                "_embedded.{rel} must hold objects, got {}",
                                json_kind(&other)
                            ))),
                        })
                        .collect::<Result<Vec<_>>>()?;
                    if !bodies.is_empty() {
                        body.embedded.insert(rel, bodies);
                    }
                }
            }
            _ => {
                body.properties.insert(key, value);
            }
        }
    }

    Ok(body)
}

fn parse_links(value: Value, context: &Url) -> Result<LinkSet> {
    let rels = match value {
        Value::Object(rels) => rels,
        other => {
            return Err(Error::UnsupportedBody(format!(
                "_links must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut links = LinkSet::new();
    for (rel, entry) in rels {
        if rel.is_empty() {
            return Err(Error::invalid_link(rel, "relation name must not be empty"));
        }
        for item in one_or_many(entry) {
            if !item.is_object() {
                return Err(Error::invalid_link(
                    rel.as_str(),
                    format!("link must be an object, got {}", json_kind(&item)),
                ));
            }
            let object: LinkObject = serde_json::from_value(item)
                .map_err(|e| Error::invalid_link(rel.as_str(), e.to_string()))?;
            links.add(rel.as_str(), object.into_link(context));
        }
    }
    Ok(links)
}

fn one_or_many(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        single => vec![single],
    }
}

// --- serialization -----------------------------------------------------------

fn body_to_value(body: &Body, options: &HalOptions) -> Value {
    let mut out = body.properties.clone();

    if !body.links.is_empty() {
        let mut rels = Map::new();
        for (rel, links) in body.links.iter() {
            let objects = links
                .iter()
                .map(|l| serde_json::to_value(LinkObject::from(l)).unwrap_or(Value::Null))
                .collect();
            rels.insert(rel.to_string(), shape(rel, objects, options));
        }
        out.insert(LINKS.into(), Value::Object(rels));
    }

    if !body.embedded.is_empty() {
        let mut rels = Map::new();
        for (rel, bodies) in &body.embedded {
            let values = bodies.iter().map(|b| body_to_value(b, options)).collect();
            rels.insert(rel.clone(), shape(rel, values, options));
        }
        out.insert(EMBEDDED.into(), Value::Object(rels));
    }

    Value::Object(out)
}

fn shape(rel: &str, mut values: Vec<Value>, options: &HalOptions) -> Value {
    if options.writes_array(rel, values.len()) {
        Value::Array(values)
    } else {
        values.pop().unwrap_or(Value::Null)
    }
}
