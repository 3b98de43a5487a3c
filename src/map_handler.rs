//! Redirects from an in-memory path mapping (literal, YAML or JSON sourced)

use crate::error::Result;
use crate::handler::Handler;
use crate::mapping::PathMapping;
use crate::response::{Body, redirect_response};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Issues a 302 for mapped paths and forwards everything else to the fallback
pub struct MapHandler {
    paths: PathMapping,
    fallback: Arc<dyn Handler>,
}

impl MapHandler {
    pub fn new(paths: PathMapping, fallback: Arc<dyn Handler>) -> Self {
        Self { paths, fallback }
    }

    /// Build from a YAML list of `{path, url}` records.
    /// Later records win over earlier ones with the same path.
    pub fn from_yaml(yaml: &[u8], fallback: Arc<dyn Handler>) -> Result<Self> {
        Ok(Self::new(PathMapping::from_yaml(yaml)?, fallback))
    }

    /// Build from a JSON object of path to URL.
    pub fn from_json(json: &[u8], fallback: Arc<dyn Handler>) -> Result<Self> {
        Ok(Self::new(PathMapping::from_json(json)?, fallback))
    }

    pub fn paths(&self) -> &PathMapping {
        &self.paths
    }
}

#[async_trait]
impl Handler for MapHandler {
    async fn handle(&self, req: Request<Bytes>) -> Response<Body> {
        let path = req.uri().path();

        match self.paths.get(path) {
            Some(url) => {
                debug!("{} -> {}", path, url);
                redirect_response(StatusCode::FOUND, req.method(), path, url)
            }
            None => self.fallback.handle(req).await,
        }
    }
}
