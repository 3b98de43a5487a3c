//! Redirects looked up per request in the urlmap table

use crate::database::UrlStore;
use crate::error::Result;
use crate::handler::Handler;
use crate::response::{Body, internal_error, redirect_response};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::{debug, error};

/// Issues a 301 for stored shortpaths and forwards misses to the fallback
///
/// A failed lookup is logged and answered with a bare 500; the database
/// error never reaches the client.
pub struct DbHandler {
    store: UrlStore,
    fallback: Arc<dyn Handler>,
}

impl DbHandler {
    /// Ensure the urlmap table exists, failing construction if it cannot be created
    pub fn new(store: UrlStore, fallback: Arc<dyn Handler>) -> Result<Self> {
        store.ensure_schema()?;
        Ok(Self::degraded(store, fallback))
    }

    /// Build without touching the schema.
    ///
    /// For callers that choose to keep serving after `new` failed; lookups
    /// against a missing table then answer 500.
    pub fn degraded(store: UrlStore, fallback: Arc<dyn Handler>) -> Self {
        Self { store, fallback }
    }
}

#[async_trait]
impl Handler for DbHandler {
    async fn handle(&self, req: Request<Bytes>) -> Response<Body> {
        let path = req.uri().path();

        match self.store.find_url(path) {
            Ok(Some(url)) => {
                debug!("{} -> {} (stored)", path, url);
                redirect_response(StatusCode::MOVED_PERMANENTLY, req.method(), path, &url)
            }
            Ok(None) => self.fallback.handle(req).await,
            Err(e) => {
                error!("Lookup for {} failed: {}", path, e);
                internal_error()
            }
        }
    }
}
