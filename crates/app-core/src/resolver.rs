//! Asynchronous "fetch the theme map" indirection
//!
//! The engine never reads the catalog it was built with when switching. It asks
//! a [`ThemeResolver`] for the whole map every time, so the themes can later be
//! served remotely without touching the engine.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{ThemeCatalog, ThemeMap};

/// Failures of the resolver itself, distinct from "key not found"
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The response body is not a theme document
    #[error("Invalid theme document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::Parse(err.to_string())
    }
}

/// Source of the full theme map
#[async_trait]
pub trait ThemeResolver: Send + Sync {
    /// Fetch every theme definition, keyed by theme key
    async fn fetch_themes(&self) -> Result<ThemeMap, ResolveError>;
}

/// Resolver answering from a map held in memory
#[derive(Debug, Clone)]
pub struct StaticThemeResolver {
    themes: ThemeMap,
}

impl StaticThemeResolver {
    /// Serve the given map
    pub fn new(themes: ThemeMap) -> Self {
        Self { themes }
    }

    /// Serve the contents of a validated catalog
    pub fn from_catalog(catalog: &ThemeCatalog) -> Self {
        Self::new(catalog.themes().clone())
    }
}

#[async_trait]
impl ThemeResolver for StaticThemeResolver {
    async fn fetch_themes(&self) -> Result<ThemeMap, ResolveError> {
        Ok(self.themes.clone())
    }
}
