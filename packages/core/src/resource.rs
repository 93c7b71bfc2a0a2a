//! Addressable endpoints with a lazily fetched, cached representation.
//!
//! A [`Resource`] starts *unfetched*. The first call that needs its body or
//! links performs exactly one GET through the client's transport and caches
//! the parsed [`Representor`]; every later call reads the cache. A failed
//! fetch leaves the resource unfetched so the caller can retry.
//!
//! Every method that may fetch takes `&mut self`, so one instance can never
//! be fetched from two threads at once. Share navigation across threads by
//! giving each thread its own `Resource` (they are cheap: a URI and a handle
//! to the client).

use std::collections::HashMap;

use tracing::{debug, warn};
use url::Url;

use crate::client::Client;
use crate::error::Result;
use crate::link::{self, Link};
use crate::representor::{Body, Representor};
use crate::transport::FetchRequest;

/// Cache state of a [`Resource`]. Moves from `Unfetched` to `Fetched` once.
#[derive(Debug)]
enum State {
    Unfetched,
    Fetched {
        status: u16,
        representor: Box<dyn Representor>,
    },
}

/// An endpoint on a server, identified by an absolute URI.
#[derive(Debug)]
pub struct Resource {
    client: Client,
    uri: Url,
    content_type: String,
    next_headers: Vec<(String, String)>,
    state: State,
}

impl Resource {
    pub(crate) fn new(client: Client, uri: Url) -> Self {
        let content_type = client.config().accept.clone();
        Self {
            client,
            uri,
            content_type,
            next_headers: Vec::new(),
            state: State::Unfetched,
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Content type sent as `Accept` when the resource is fetched.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Change the `Accept` type. Has no effect once the resource is fetched.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Queue a header for the next fetch only.
    ///
    /// Queued headers are cleared by a successful fetch and kept for the
    /// retry after a failed one. An `Accept` header here overrides
    /// [`content_type`](Self::content_type).
    pub fn set_next_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.next_headers.push((name.into(), value.into()));
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self.state, State::Fetched { .. })
    }

    /// HTTP status of the cached fetch, `None` while unfetched.
    pub fn status(&self) -> Option<u16> {
        match &self.state {
            State::Fetched { status, .. } => Some(*status),
            State::Unfetched => None,
        }
    }

    /// The parsed representation, fetching it on first use.
    pub fn representation(&mut self) -> Result<&dyn Representor> {
        if !self.is_fetched() {
            self.state = self.fetch()?;
        }
        match &self.state {
            State::Fetched { representor, .. } => Ok(&**representor),
            State::Unfetched => unreachable!("state is populated by a successful fetch"),
        }
    }

    /// The decoded body.
    pub fn get(&mut self) -> Result<&Body> {
        Ok(self.representation()?.body())
    }

    /// The first link for `rel`; [`Error::LinkNotFound`](crate::Error::LinkNotFound) if there is none.
    pub fn link(&mut self, rel: &str) -> Result<&Link> {
        self.representation()?.get_link(rel)
    }

    /// Every link for `rel`, or every link at all when `rel` is empty.
    pub fn links(&mut self, rel: &str) -> Result<Vec<&Link>> {
        Ok(self.representation()?.get_links(rel))
    }

    /// A new resource at `relative`, resolved against this resource's URI.
    pub fn go(&self, relative: &str) -> Result<Resource> {
        let target = link::join(&self.uri, relative)?;
        self.client.go(target.as_str())
    }

    /// Navigate to the first `rel` link.
    pub fn follow(&mut self, rel: &str) -> Result<Resource> {
        self.follow_with(rel, &HashMap::new())
    }

    /// Navigate to the first `rel` link, expanding it with `vars` if it is templated.
    pub fn follow_with(&mut self, rel: &str, vars: &HashMap<String, String>) -> Result<Resource> {
        let target = self.link(rel)?.expand(vars)?;
        debug!("resource: {} --{rel}--> {target}", self.uri);
        self.go(target.as_str())
    }

    fn fetch(&mut self) -> Result<State> {
        let mut request = FetchRequest::get(self.uri.clone());
        let accept_overridden = self
            .next_headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("accept"));
        if !accept_overridden {
            request
                .headers
                .push(("Accept".into(), self.content_type.clone()));
        }
        request.headers.extend(self.next_headers.iter().cloned());

        debug!("resource: GET {} (accept {})", self.uri, self.content_type);
        let response = self.client.transport().fetch(&request)?;
        if !response.is_success() {
            warn!("resource: GET {} returned status {}", self.uri, response.status);
        }

        let representor =
            self.client
                .factory()
                .create_from_response(&self.uri, &response.headers, &response.body)?;

        self.next_headers.clear();
        Ok(State::Fetched {
            status: response.status,
            representor,
        })
    }
}
