//! Request handler abstraction and the terminal handlers used as fallbacks

use crate::response::{Body, text_response};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;

/// Anything that can turn a request into a response
///
/// Redirect handlers hold their fallback as `Arc<dyn Handler>` and forward
/// every request they cannot map to it unchanged.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: Request<Bytes>) -> Response<Body>;
}

/// Responds 404 with a plain text body
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait]
impl Handler for NotFound {
    async fn handle(&self, _req: Request<Bytes>) -> Response<Body> {
        text_response(StatusCode::NOT_FOUND, "404 page not found")
    }
}

/// Responds 200 with a fixed plain text body
#[derive(Debug, Clone)]
pub struct Text {
    body: String,
}

impl Text {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl Handler for Text {
    async fn handle(&self, _req: Request<Bytes>) -> Response<Body> {
        text_response(StatusCode::OK, &self.body)
    }
}

/// Serves `/` from one handler and every other path from another
///
/// This is the default route of the server binary: a greeting on the root
/// and a 404 elsewhere.
pub struct RootOr {
    root: Arc<dyn Handler>,
    other: Arc<dyn Handler>,
}

impl RootOr {
    pub fn new(root: Arc<dyn Handler>, other: Arc<dyn Handler>) -> Self {
        Self { root, other }
    }
}

#[async_trait]
impl Handler for RootOr {
    async fn handle(&self, req: Request<Bytes>) -> Response<Body> {
        if req.uri().path() == "/" {
            self.root.handle(req).await
        } else {
            self.other.handle(req).await
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use parking_lot::Mutex;

    /// Fallback that records every request it receives
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub seen: Mutex<Vec<Request<Bytes>>>,
    }

    #[async_trait]
    impl Handler for Recorder {
        async fn handle(&self, req: Request<Bytes>) -> Response<Body> {
            self.seen.lock().push(req);
            text_response(StatusCode::IM_A_TEAPOT, "fallback")
        }
    }

    pub(crate) fn get(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    pub(crate) async fn body_text(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = NotFound.handle(get("/anything")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 page not found");
    }

    #[tokio::test]
    async fn test_root_or() {
        let handler = RootOr::new(Arc::new(Text::new("Hello, world!")), Arc::new(NotFound));

        let response = handler.handle(get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello, world!");

        let response = handler.handle(get("/elsewhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
