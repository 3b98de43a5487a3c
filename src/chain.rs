//! Composition of the configured sources into one handler chain
//!
//! Outermost first: literal redirects, YAML file, JSON file, database, then
//! the default handler. A path mapped by an earlier source shadows the later ones.

use crate::database::UrlStore;
use crate::db_handler::DbHandler;
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::map_handler::MapHandler;
use crate::mapping::PathMapping;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Which sources to load, and how to treat a database without a usable schema
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    pub redirects: Vec<(String, String)>,
    pub yaml_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub degraded_start: bool,
}

impl ChainConfig {
    /// Build every configured source on top of `default`
    pub fn build(&self, default: Arc<dyn Handler>) -> Result<Arc<dyn Handler>> {
        let mut handler = default;

        if let Some(db_path) = &self.db_path {
            let store = UrlStore::open(db_path)?;
            handler = match DbHandler::new(store.clone(), handler.clone()) {
                Ok(db) => Arc::new(db),
                Err(e @ Error::Schema(_)) if self.degraded_start => {
                    warn!("Serving {} without a usable schema: {}", db_path.display(), e);
                    Arc::new(DbHandler::degraded(store, handler))
                }
                Err(e) => return Err(e),
            };
            info!("Database redirects from {}", db_path.display());
        }

        if let Some(json_file) = &self.json_file {
            let json = std::fs::read(json_file)?;
            let map = MapHandler::from_json(&json, handler)?;
            info!("Loaded {} JSON redirects from {}", map.paths().len(), json_file.display());
            handler = Arc::new(map);
        }

        if let Some(yaml_file) = &self.yaml_file {
            let yaml = std::fs::read(yaml_file)?;
            let map = MapHandler::from_yaml(&yaml, handler)?;
            info!("Loaded {} YAML redirects from {}", map.paths().len(), yaml_file.display());
            handler = Arc::new(map);
        }

        if !self.redirects.is_empty() {
            let paths: PathMapping = self.redirects.iter().cloned().collect();
            info!("Loaded {} literal redirects", paths.len());
            handler = Arc::new(MapHandler::new(paths, handler));
        }

        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::NotFound;
    use crate::handler::tests::get;
    use hyper::StatusCode;
    use hyper::header::LOCATION;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_precedence() {
        let dir = tempdir().unwrap();
        let yaml_file = dir.path().join("paths.yaml");
        let json_file = dir.path().join("paths.json");
        let db_path = dir.path().join("urls.db");

        fs::write(&yaml_file, "- path: /yaml\n  url: https://yaml.example\n- path: /shared\n  url: https://yaml.example/shared\n").unwrap();
        fs::write(&json_file, r#"{"/json":"https://json.example","/shared":"https://json.example/shared"}"#).unwrap();

        let store = UrlStore::open(&db_path).unwrap();
        store.ensure_schema().unwrap();
        store.set_url("/db", "https://db.example").unwrap();
        store.set_url("/json", "https://db.example/json").unwrap();

        let config = ChainConfig {
            redirects: vec![("/shared".into(), "https://literal.example".into())],
            yaml_file: Some(yaml_file),
            json_file: Some(json_file),
            db_path: Some(db_path),
            degraded_start: false,
        };
        let handler = config.build(Arc::new(NotFound)).unwrap();

        let cases = [
            ("/shared", StatusCode::FOUND, "https://literal.example"),
            ("/yaml", StatusCode::FOUND, "https://yaml.example"),
            ("/json", StatusCode::FOUND, "https://json.example"),
            ("/db", StatusCode::MOVED_PERMANENTLY, "https://db.example"),
        ];
        for (path, status, location) in cases {
            let response = handler.handle(get(path)).await;
            assert_eq!(response.status(), status, "{}", path);
            assert_eq!(response.headers()[LOCATION], location, "{}", path);
        }

        let response = handler.handle(get("/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_no_sources_is_default() {
        let handler = ChainConfig::default().build(Arc::new(NotFound)).unwrap();
        assert_eq!(handler.handle(get("/a")).await.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_malformed_source_fails() {
        let dir = tempdir().unwrap();
        let json_file = dir.path().join("paths.json");
        fs::write(&json_file, "[]").unwrap();

        let config = ChainConfig {
            json_file: Some(json_file),
            ..Default::default()
        };
        let err = config.build(Arc::new(NotFound)).err().unwrap();
        assert!(err.is_decode());
    }

    #[test]
    fn test_missing_source_file_fails() {
        let config = ChainConfig {
            yaml_file: Some(PathBuf::from("/nonexistent/paths.yaml")),
            ..Default::default()
        };
        assert!(matches!(config.build(Arc::new(NotFound)), Err(Error::Io(_))));
    }
}
