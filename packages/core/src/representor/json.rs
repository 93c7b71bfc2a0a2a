//! Plain `application/json`: properties only, no hypermedia controls.

use url::Url;

use super::{decode_object, Body, Representor};
use crate::error::{Error, Result};

/// A JSON object with no links. Every member, including any `_links` a
/// server might send, is kept as an ordinary property.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRepresentor {
    source_uri: Url,
    content_type: String,
    body: Body,
}

impl JsonRepresentor {
    pub fn parse(source_uri: Url, content_type: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let properties = decode_object(bytes)?;
        Ok(Self {
            source_uri,
            content_type: content_type.into(),
            body: Body {
                properties,
                ..Body::default()
            },
        })
    }
}

impl Representor for JsonRepresentor {
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
        serde_json::to_vec(&self.body.properties)
            .map_err(|e| Error::UnsupportedBody(format!("cannot serialize body: {e}")))
    }
}
