//! Presence site theme runtime
//!
//! Wires the theme crates together for one process: loads the catalog, opens
//! the device store, picks a resolver, and runs the initial theme switch.
//!
//! ```no_run
//! use presence_site::{init_tracing, SiteConfig, ThemeRuntime};
//!
//! # async fn run() -> Result<(), presence_site::SiteError> {
//! init_tracing();
//! let runtime = ThemeRuntime::bootstrap(SiteConfig::default()).await?;
//! let mut selector = runtime.selector();
//! selector.select("midnight").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use app_core::catalog::{CatalogError, ThemeCatalog};
use app_core::document::DocumentRoot;
use app_core::resolver::{ResolveError, StaticThemeResolver, ThemeResolver};
use app_state::theme_engine::{SwitchError, SwitchReport, ThemeEngine, ThemeEngineConfig};
use app_ui::theme_selector::ThemeSelector;
use networking::{HttpThemeResolver, ThemeApiConfig};
use std::path::PathBuf;
use std::sync::{Arc, Once};
use storage::{DeviceStore, KvConfig, KvError, KvStore};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub use app_core;
pub use app_state;
pub use app_ui;
pub use networking;
pub use storage;

/// Bootstrap failures
#[derive(Debug, Error)]
pub enum SiteError {
    /// The catalog could not be loaded or failed validation
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The device store could not be opened
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),

    /// The remote resolver could not be built
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolveError),

    /// A theme switch failed
    #[error("Theme error: {0}")]
    Switch(#[from] SwitchError),
}

/// Result type for site operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Process configuration
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Device store settings
    pub kv: KvConfig,
    /// Theme engine settings
    pub engine: ThemeEngineConfig,
    /// Remote theme endpoint; the local catalog is served when absent
    pub api: Option<ThemeApiConfig>,
    /// Catalog file to use instead of the bundled one
    pub catalog_path: Option<PathBuf>,
}

impl SiteConfig {
    /// Set the device store settings
    pub fn with_kv(mut self, kv: KvConfig) -> Self {
        self.kv = kv;
        self
    }

    /// Set the theme engine settings
    pub fn with_engine(mut self, engine: ThemeEngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Fetch themes from a remote endpoint
    pub fn with_api(mut self, api: ThemeApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Load the catalog from a file
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global fmt subscriber
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Calling this more than
/// once is harmless.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

/// A running theme subsystem
pub struct ThemeRuntime {
    engine: Arc<ThemeEngine>,
    root: Arc<DocumentRoot>,
    initial: std::result::Result<SwitchReport, SwitchError>,
}

impl ThemeRuntime {
    /// Assemble every component and apply the initial theme
    ///
    /// Catalog, storage, and resolver problems fail the bootstrap. A failed
    /// initial switch does not; it is available through
    /// [`ThemeRuntime::initial_switch`].
    pub async fn bootstrap(config: SiteConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => ThemeCatalog::from_path(path)?,
            None => ThemeCatalog::bundled()?,
        };
        let catalog = Arc::new(catalog);

        let kv = Arc::new(KvStore::new(config.kv.clone())?);
        let store = Arc::new(DeviceStore::new(kv));

        let resolver: Arc<dyn ThemeResolver> = match &config.api {
            Some(api) => Arc::new(HttpThemeResolver::new(api.clone())?),
            None => Arc::new(StaticThemeResolver::from_catalog(&catalog)),
        };

        let root = Arc::new(DocumentRoot::new());
        let engine = Arc::new(ThemeEngine::new(
            config.engine,
            catalog,
            resolver,
            root.clone(),
            store,
        ));

        let initial = engine.init().await;
        tracing::info!(
            theme = %engine.current_key().await,
            applied = initial.is_ok(),
            remote = config.api.is_some(),
            "theme runtime ready"
        );

        Ok(Self { engine, root, initial })
    }

    /// The theme engine
    pub fn engine(&self) -> &Arc<ThemeEngine> {
        &self.engine
    }

    /// The style surface themes are written to
    pub fn root(&self) -> &Arc<DocumentRoot> {
        &self.root
    }

    /// Outcome of the initial switch
    pub fn initial_switch(&self) -> std::result::Result<&SwitchReport, &SwitchError> {
        self.initial.as_ref()
    }

    /// A fresh, closed selector bound to this runtime's engine
    pub fn selector(&self) -> ThemeSelector {
        ThemeSelector::new(Arc::clone(&self.engine))
    }
}
