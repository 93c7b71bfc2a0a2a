//! The navigation root: a bookmark URI plus the shared transport and
//! representor registry that every [`Resource`] it creates uses.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::link;
use crate::representor::RepresentorFactory;
use crate::resource::Resource;
use crate::transport::{HttpTransport, Transport};

struct Inner {
    bookmark: Url,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    factory: RepresentorFactory,
}

/// Entry point for hypermedia navigation.
///
/// Cloning is cheap; clones share the bookmark, transport and registry.
/// Resources hold a clone, so the client lives as long as any of them.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// A client anchored at `bookmark` with default config and the HTTP transport.
    ///
    /// Fails with [`Error::Configuration`] when `bookmark` is empty.
    pub fn new(bookmark: &str) -> Result<Self> {
        Self::builder(bookmark).build()
    }

    pub fn builder(bookmark: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            bookmark: bookmark.into(),
            config: ClientConfig::default(),
            transport: None,
            factory: None,
        }
    }

    pub fn bookmark(&self) -> &Url {
        &self.inner.bookmark
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn factory(&self) -> &RepresentorFactory {
        &self.inner.factory
    }

    /// The resource at `uri`, resolved against the bookmark.
    ///
    /// An empty `uri` is the bookmark itself. Nothing is fetched until the
    /// resource's body or links are needed.
    pub fn go(&self, uri: &str) -> Result<Resource> {
        let target = link::join(&self.inner.bookmark, uri)?;
        Ok(Resource::new(self.clone(), target))
    }

    /// Shortcut for `go("")?.follow(rel)`.
    pub fn follow(&self, rel: &str) -> Result<Resource> {
        self.go("")?.follow(rel)
    }

    /// Shortcut for `go("")?.follow_with(rel, vars)`.
    pub fn follow_with(&self, rel: &str, vars: &HashMap<String, String>) -> Result<Resource> {
        self.go("")?.follow_with(rel, vars)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("bookmark", &self.inner.bookmark.as_str())
            .field("config", &self.inner.config)
            .field("factory", &self.inner.factory)
            .finish_non_exhaustive()
    }
}

/// Configures a [`Client`] before construction.
pub struct ClientBuilder {
    bookmark: String,
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    factory: Option<RepresentorFactory>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `transport` instead of building an [`HttpTransport`] from the config.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use `factory` instead of the default HAL + JSON registry.
    pub fn factory(mut self, factory: RepresentorFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn build(self) -> Result<Client> {
        let bookmark = self.bookmark.trim();
        if bookmark.is_empty() {
            return Err(Error::Configuration("bookmark unspecified".into()));
        }
        let bookmark = Url::parse(bookmark).map_err(|e| Error::malformed_uri(bookmark, e))?;
        if bookmark.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "bookmark {bookmark} cannot be used as a base URI"
            )));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        let factory = self
            .factory
            .unwrap_or_else(|| RepresentorFactory::new(self.config.hal.clone()));

        Ok(Client {
            inner: Arc::new(Inner {
                bookmark,
                config: self.config,
                transport,
                factory,
            }),
        })
    }
}
