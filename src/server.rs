//! HTTP/1 listener that feeds every request to one handler chain

use crate::handler::Handler;
use crate::response::Body;
use anyhow::{Result, anyhow};
use bytes::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

/// Listener configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.http_port)
    }
}

/// Redirect server
pub struct RedirectServer {
    config: ServerConfig,
    handler: Arc<dyn Handler>,
}

impl RedirectServer {
    pub fn new(config: ServerConfig, handler: Arc<dyn Handler>) -> Self {
        Self { config, handler }
    }

    /// Bind the configured address and serve until the listener fails
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(addr).await?;
        info!("HTTP server listening on {}", addr);

        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let handler = self.handler.clone();

            tokio::spawn(async move {
                if let Err(e) = Self::handle_connection(stream, remote_addr, handler).await {
                    debug!("HTTP connection error from {}: {}", remote_addr, e);
                }
            });
        }
    }

    /// Handle a single HTTP connection
    async fn handle_connection(
        stream: TcpStream,
        remote_addr: SocketAddr,
        handler: Arc<dyn Handler>,
    ) -> Result<()> {
        let io = TokioIo::new(stream);

        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(move |req| {
                    let handler = handler.clone();
                    async move { Self::handle_request(req, remote_addr, handler).await }
                }),
            )
            .await
            .map_err(|e| anyhow!("HTTP service error: {}", e))
    }

    /// Pass the request head down the chain
    ///
    /// Handlers route on method and path alone, so the body is never read:
    /// a redirect goes out as soon as the head has been parsed, whatever
    /// Content-Length the client declared. Hyper closes the connection after
    /// the response when the body was left unread.
    async fn handle_request(
        req: Request<Incoming>,
        remote_addr: SocketAddr,
        handler: Arc<dyn Handler>,
    ) -> Result<Response<Body>, Infallible> {
        debug!("{} {} from {}", req.method(), req.uri().path(), remote_addr);

        let (parts, _body) = req.into_parts();
        Ok(handler.handle(Request::from_parts(parts, Bytes::new())).await)
    }
}
