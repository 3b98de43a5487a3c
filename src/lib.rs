//! Redirectmap - path-to-URL redirect handlers
//!
//! Maps exact request paths to redirect targets from:
//! - Literal in-memory maps and YAML/JSON documents (302 Found)
//! - A SQLite `urlmap` table queried per request (301 Moved Permanently)
//!
//! Every handler forwards requests it cannot map to a fallback handler, so
//! sources chain into one another and end in a default handler.

pub mod chain;
pub mod database;
pub mod db_handler;
pub mod error;
pub mod handler;
pub mod map_handler;
pub mod mapping;
pub mod response;
pub mod server;

pub use chain::ChainConfig;
pub use database::{UrlRecord, UrlStore};
pub use db_handler::DbHandler;
pub use error::{Error, Result};
pub use handler::{Handler, NotFound, RootOr, Text};
pub use map_handler::MapHandler;
pub use mapping::{PathMapping, YamlEntry};
pub use server::{RedirectServer, ServerConfig};
