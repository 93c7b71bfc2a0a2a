//! Links between resources and the rel-keyed sets that hold them.
//!
//! A [`Link`] pairs the absolute URI of the document it was found in (its
//! *context*) with the raw `href` from that document. Resolution to an
//! absolute target happens on demand, following RFC 3986 reference
//! resolution, so the original href is preserved for re-serialization.

use std::collections::{BTreeMap, HashMap};

use url::Url;

use crate::error::{Error, Result};
use crate::template;

/// A single relationship pointer, as found in a representation.
///
/// The relationship name is not stored here: it is the key under which the
/// link lives in a [`LinkSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute URI of the document the link was read from.
    pub context: Url,

    /// Target reference, possibly relative, possibly an RFC 6570 template.
    pub href: String,

    /// Whether `href` is a URI template that must be expanded before use.
    pub templated: bool,

    /// Secondary key for selecting among links that share a rel.
    pub name: Option<String>,

    /// Human-readable label.
    pub title: Option<String>,

    /// Media type hint for the target (HAL `type`).
    pub media_type: Option<String>,

    /// Present when the link is deprecated; points at an explanation.
    pub deprecation: Option<String>,

    /// Profile URI of the target.
    pub profile: Option<String>,

    /// Language of the target.
    pub hreflang: Option<String>,
}

impl Link {
    /// A plain, non-templated link with no metadata.
    pub fn new(context: Url, href: impl Into<String>) -> Self {
        Self {
            context,
            href: href.into(),
            templated: false,
            name: None,
            title: None,
            media_type: None,
            deprecation: None,
            profile: None,
            hreflang: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn templated(mut self, templated: bool) -> Self {
        self.templated = templated;
        self
    }

    /// Resolve `href` against `context`.
    ///
    /// Absolute hrefs replace the context entirely, path-relative hrefs merge
    /// with the context path, and query- or fragment-only hrefs keep the
    /// context path. A templated href is resolved verbatim; use
    /// [`Link::expand`] to fill in its variables first.
    pub fn resolve(&self) -> Result<Url> {
        join(&self.context, &self.href)
    }

    /// Expand the href as a URI template with `vars`, then resolve it.
    ///
    /// For a link that is not templated the variables are ignored and this is
    /// exactly [`Link::resolve`].
    pub fn expand(&self, vars: &HashMap<String, String>) -> Result<Url> {
        if !self.templated {
            return self.resolve();
        }
        let href = template::expand(&self.href, vars)?;
        join(&self.context, &href)
    }
}

/// Resolve `reference` against `base`, mapping parse failures to
/// [`Error::MalformedUri`].
pub(crate) fn join(base: &Url, reference: &str) -> Result<Url> {
    base.join(reference)
        .map_err(|e| Error::malformed_uri(reference, e))
}

/// Links grouped by relationship name, in document order within each rel.
///
/// A rel is present only while it has at least one link; looking up an
/// absent rel yields an empty slice, never an error. Rels iterate in name
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: BTreeMap<String, Vec<Link>>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `link` to the list for `rel`.
    pub fn add(&mut self, rel: impl Into<String>, link: Link) {
        self.links.entry(rel.into()).or_default().push(link);
    }

    /// Replace the whole list for `rel`. An empty list removes the rel.
    pub fn set(&mut self, rel: impl Into<String>, links: Vec<Link>) {
        let rel = rel.into();
        if links.is_empty() {
            self.links.remove(&rel);
        } else {
            self.links.insert(rel, links);
        }
    }

    /// All links for `rel`, empty if there are none.
    pub fn get(&self, rel: &str) -> &[Link] {
        self.links.get(rel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, rel: &str) -> bool {
        self.links.contains_key(rel)
    }

    /// Every link across every rel, rels in name order, document order within a rel.
    pub fn values(&self) -> Vec<&Link> {
        self.links.values().flatten().collect()
    }

    /// `(rel, links)` pairs in rel-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Link])> {
        self.links.iter().map(|(rel, links)| (rel.as_str(), links.as_slice()))
    }

    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Total number of links across all rels.
    pub fn len(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
