//! Client configuration, populated from environment variables.

use std::collections::BTreeSet;

/// Media type requested by default and served by [`HalRepresentor`](crate::representor::HalRepresentor).
pub const HAL_JSON: &str = "application/hal+json";

/// Media type served by [`JsonRepresentor`](crate::representor::JsonRepresentor).
pub const JSON: &str = "application/json";

/// Runtime configuration for a [`Client`](crate::Client).
///
/// Every field has a default, so a client works with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `GETTING_ACCEPT` | `application/hal+json` | `Accept` header sent by new resources |
/// | `GETTING_TIMEOUT_SECS` | `30` | Request timeout of the default HTTP transport |
/// | `GETTING_USER_AGENT` | `getting/<version>` | User agent of the default HTTP transport |
/// | `GETTING_HAL_SINGLE_LINK` | `object` | How a one-link rel is written back out: `object` or `array` |
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Preferred content type, sent as `Accept` on every fetch.
    pub accept: String,

    /// Seconds before the default transport gives up on a request.
    pub timeout_secs: u64,

    /// `User-Agent` of the default transport.
    pub user_agent: String,

    /// HAL serialization settings.
    pub hal: HalOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            accept: HAL_JSON.into(),
            timeout_secs: 30,
            user_agent: concat!("getting/", env!("CARGO_PKG_VERSION")).into(),
            hal: HalOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Populate config from environment variables, applying defaults where
    /// a variable is absent or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout_secs = std::env::var("GETTING_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_secs);

        let single_link = std::env::var("GETTING_HAL_SINGLE_LINK")
            .ok()
            .and_then(|v| v.parse::<SingleLinkEncoding>().ok())
            .unwrap_or(defaults.hal.single_link);

        Self {
            accept: std::env::var("GETTING_ACCEPT").unwrap_or(defaults.accept),
            timeout_secs,
            user_agent: std::env::var("GETTING_USER_AGENT").unwrap_or(defaults.user_agent),
            hal: HalOptions {
                single_link,
                ..defaults.hal
            },
        }
    }
}

/// How HAL output represents a rel that holds exactly one link or embedded body.
///
/// Producers disagree here, so it is a setting. Parsing accepts both forms
/// regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleLinkEncoding {
    /// `"self": { "href": "/" }`
    #[default]
    Object,
    /// `"self": [{ "href": "/" }]`
    Array,
}

impl std::str::FromStr for SingleLinkEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object" => Ok(SingleLinkEncoding::Object),
            "array" => Ok(SingleLinkEncoding::Array),
            other => Err(format!(
                "unknown single-link encoding {other:?}; expected \"object\" or \"array\""
            )),
        }
    }
}

/// HAL serialization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalOptions {
    /// Encoding for rels with a single entry.
    pub single_link: SingleLinkEncoding,

    /// Rels always written as arrays, whatever their length.
    /// Defaults to `curies`, which HAL requires to be an array.
    pub array_rels: BTreeSet<String>,
}

impl Default for HalOptions {
    fn default() -> Self {
        Self {
            single_link: SingleLinkEncoding::Object,
            array_rels: BTreeSet::from(["curies".to_string()]),
        }
    }
}

impl HalOptions {
    /// Whether a rel with `count` entries is written as a JSON array.
    pub fn writes_array(&self, rel: &str, count: usize) -> bool {
        count != 1
            || self.single_link == SingleLinkEncoding::Array
            || self.array_rels.contains(rel)
    }
}
