//! Active theme state and the theme switch
//!
//! [`ThemeEngine`] is the only writer of the style surface and of the persisted
//! theme key. A switch resolves the theme through the async resolver, writes
//! every style variable, swaps the root marker class, persists the key,
//! updates the active state, and broadcasts a [`ThemeEvent`].
//!
//! Switches are not serialized against each other. Two overlapping switches
//! both run to completion and whichever finishes its state update last wins.
//!
//! # Example
//!
//! ```no_run
//! use app_core::{DocumentRoot, StaticThemeResolver, ThemeCatalog};
//! use app_state::theme_engine::{ThemeEngine, ThemeEngineConfig};
//! use std::sync::Arc;
//! use storage::MemoryPreferenceStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = Arc::new(ThemeCatalog::bundled().unwrap());
//!     let engine = ThemeEngine::new(
//!         ThemeEngineConfig::default(),
//!         Arc::clone(&catalog),
//!         Arc::new(StaticThemeResolver::from_catalog(&catalog)),
//!         Arc::new(DocumentRoot::new()),
//!         Arc::new(MemoryPreferenceStore::new()),
//!     );
//!
//!     let mut events = engine.subscribe_events();
//!     engine.init().await.unwrap();
//!     engine.switch_theme("midnight").await.unwrap();
//!     assert_eq!(engine.current_key().await, "midnight");
//!     let _ = events.recv().await;
//! }
//! ```

use app_core::catalog::{ThemeCatalog, ThemeDefinition, DEFAULT_THEME_KEY};
use app_core::color::{channel_triple, variable_name, with_alpha};
use app_core::document::{
    marker_class, StyleSurface, GRADIENT_FROM_VARIABLE, GRADIENT_TO_VARIABLE,
    RECENT_EDIT_VARIABLE, TRANSITION_CLASS,
};
use app_core::resolver::{ResolveError, ThemeResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use storage::PreferenceStore;
use tokio::sync::{broadcast, watch, RwLock};

/// Preference key the active theme is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "presence-theme";

/// How long the transition flag stays on the root after a switch
pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(200);

/// Name of the theme-changed notification
pub const THEME_CHANGE_EVENT: &str = "themechange";

/// Theme switch errors
///
/// All of these leave the active theme, the style surface, and the persisted
/// key untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwitchError {
    /// The key is not in the resolved theme map
    #[error("Invalid theme '{key}' (available: {})", .available.join(", "))]
    UnknownTheme {
        /// Requested key
        key: String,
        /// Keys that were available
        available: Vec<String>,
    },

    /// The resolved entry has no colors
    #[error("Theme '{key}' has no colors")]
    MissingColors {
        /// Requested key
        key: String,
    },

    /// The resolved entry carries a color that cannot be converted
    #[error("Theme '{key}' has invalid color for '{role}': {value}")]
    InvalidColor {
        /// Requested key
        key: String,
        /// Offending role
        role: String,
        /// Offending value
        value: String,
    },

    /// The resolver failed before a theme map was available
    #[error("Failed to resolve themes: {0}")]
    Resolve(#[from] ResolveError),
}

/// Result type for theme engine operations
pub type Result<T> = std::result::Result<T, SwitchError>;

/// Theme engine configuration
#[derive(Debug, Clone)]
pub struct ThemeEngineConfig {
    /// Theme used when nothing valid is persisted
    pub default_key: String,
    /// Preference key the active theme is stored under
    pub storage_key: String,
    /// Delay before the transition flag is cleared
    pub transition_delay: Duration,
    /// Capacity of the event broadcast channel
    pub event_buffer: usize,
}

impl Default for ThemeEngineConfig {
    fn default() -> Self {
        Self {
            default_key: DEFAULT_THEME_KEY.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            transition_delay: DEFAULT_TRANSITION_DELAY,
            event_buffer: 16,
        }
    }
}

impl ThemeEngineConfig {
    /// Set the fallback theme
    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }

    /// Set the preference key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the transition delay
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }

    /// Set the event channel capacity (at least 1)
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }
}

/// Process-wide theme state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveThemeState {
    /// Key of the applied theme
    pub current_key: String,
    /// True until the initial switch has settled
    pub is_loading: bool,
}

/// Notifications broadcast by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEvent {
    /// A switch completed
    Changed {
        /// The new theme key
        theme: String,
    },
}

impl ThemeEvent {
    /// Event name as seen by listeners
    pub fn name(&self) -> &'static str {
        match self {
            ThemeEvent::Changed { .. } => THEME_CHANGE_EVENT,
        }
    }
}

/// Outcome of a completed switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchReport {
    /// Applied theme key
    pub key: String,
    /// Marker class now on the root
    pub marker_class: String,
    /// False when the key could not be written to the preference store
    pub persisted: bool,
}

/// Style variables a theme sets, in write order
///
/// One `--<role>` channel triple per color, then the optional highlight
/// color, then both gradient endpoints. Every color is checked before anything
/// is returned, so callers can apply the list without partial failure.
pub fn theme_variables(theme: &ThemeDefinition) -> Result<Vec<(String, String)>> {
    if theme.colors.is_empty() {
        return Err(SwitchError::MissingColors { key: theme.key.clone() });
    }

    let invalid = |role: &str, value: &str| SwitchError::InvalidColor {
        key: theme.key.clone(),
        role: role.to_string(),
        value: value.to_string(),
    };

    let mut variables = Vec::with_capacity(theme.colors.len() + 3);
    for (role, hex) in &theme.colors {
        let channels = channel_triple(hex).ok_or_else(|| invalid(role.as_str(), hex.as_str()))?;
        variables.push((variable_name(role), channels));
    }

    if let Some(color) = &theme.recent_edit_color {
        let opacity = theme.recent_edit_opacity.unwrap_or(1.0);
        let rgba = with_alpha(color, opacity)
            .ok_or_else(|| invalid("recentEditColor", color.as_str()))?;
        variables.push((RECENT_EDIT_VARIABLE.to_string(), rgba));
    }

    if let Some((from, to)) = theme.gradient_endpoints() {
        variables.push((GRADIENT_FROM_VARIABLE.to_string(), from.to_string()));
        variables.push((GRADIENT_TO_VARIABLE.to_string(), to.to_string()));
    }

    Ok(variables)
}

/// Owner of the active theme
pub struct ThemeEngine {
    config: ThemeEngineConfig,
    catalog: Arc<ThemeCatalog>,
    resolver: Arc<dyn ThemeResolver>,
    surface: Arc<dyn StyleSurface>,
    store: Arc<dyn PreferenceStore>,
    state: RwLock<ActiveThemeState>,
    current_tx: watch::Sender<String>,
    events_tx: broadcast::Sender<ThemeEvent>,
}

impl ThemeEngine {
    /// Create an engine; nothing is applied until [`ThemeEngine::init`]
    pub fn new(
        config: ThemeEngineConfig,
        catalog: Arc<ThemeCatalog>,
        resolver: Arc<dyn ThemeResolver>,
        surface: Arc<dyn StyleSurface>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let (current_tx, _) = watch::channel(config.default_key.clone());
        let (events_tx, _) = broadcast::channel(config.event_buffer.max(1));
        let state = ActiveThemeState { current_key: config.default_key.clone(), is_loading: true };

        Self {
            config,
            catalog,
            resolver,
            surface,
            store,
            state: RwLock::new(state),
            current_tx,
            events_tx,
        }
    }

    /// Apply the persisted theme, or the default when none is valid
    ///
    /// Loading is cleared once the initial switch settles, whether or not it
    /// succeeded.
    pub async fn init(&self) -> Result<SwitchReport> {
        let initial = match self.persisted_key() {
            Some(key) if self.catalog.contains(&key) => key,
            Some(key) => {
                tracing::debug!(theme = %key, "ignoring persisted theme not in catalog");
                self.config.default_key.clone()
            }
            None => self.config.default_key.clone(),
        };

        let result = self.switch_theme(&initial).await;
        self.state.write().await.is_loading = false;

        if let Err(err) = &result {
            tracing::warn!(theme = %initial, error = %err, "initial theme could not be applied");
        }
        result
    }

    /// Switch the active theme
    pub async fn switch_theme(&self, key: &str) -> Result<SwitchReport> {
        let themes = match self.resolver.fetch_themes().await {
            Ok(themes) => themes,
            Err(err) => {
                tracing::error!(theme = %key, error = %err, "failed to change theme");
                return Err(err.into());
            }
        };
        tracing::debug!(theme = %key, available = themes.len(), "resolved theme map");

        let variables = match themes.get(key) {
            Some(theme) => theme_variables(theme),
            None => Err(SwitchError::UnknownTheme {
                key: key.to_string(),
                available: themes.keys(),
            }),
        };
        let variables = match variables {
            Ok(variables) => variables,
            Err(err) => {
                tracing::warn!(
                    theme = %key,
                    available = ?themes.keys(),
                    error = %err,
                    "invalid theme"
                );
                return Err(err);
            }
        };

        // Held until the watch channel is updated, so the surface, the record,
        // the state and the channel all carry the same winner
        let mut state = self.state.write().await;

        self.surface.add_class(TRANSITION_CLASS);

        for (name, value) in &variables {
            self.surface.set_property(name, value);
        }

        let marker = marker_class(key);
        self.surface.replace_marker(&marker);

        let persisted = match self.store.save(&self.config.storage_key, key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(theme = %key, error = %err, "failed to persist theme");
                false
            }
        };

        state.current_key = key.to_string();
        self.current_tx.send_replace(key.to_string());
        drop(state);

        // No listeners is fine
        let _ = self.events_tx.send(ThemeEvent::Changed { theme: key.to_string() });

        let surface = Arc::clone(&self.surface);
        let delay = self.config.transition_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            surface.remove_class(TRANSITION_CLASS);
        });

        tracing::info!(theme = %key, marker = %marker, persisted, "theme changed");

        Ok(SwitchReport { key: key.to_string(), marker_class: marker, persisted })
    }

    /// Key of the applied theme
    pub async fn current_key(&self) -> String {
        self.state.read().await.current_key.clone()
    }

    /// Whether the initial switch is still pending
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Snapshot of the active state
    pub async fn state(&self) -> ActiveThemeState {
        self.state.read().await.clone()
    }

    /// Subscribe to the current theme key
    pub fn subscribe_current(&self) -> watch::Receiver<String> {
        self.current_tx.subscribe()
    }

    /// Subscribe to theme events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ThemeEvent> {
        self.events_tx.subscribe()
    }

    /// Catalog used to validate persisted keys
    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    /// Engine configuration
    pub fn config(&self) -> &ThemeEngineConfig {
        &self.config
    }

    fn persisted_key(&self) -> Option<String> {
        match self.store.load(&self.config.storage_key) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted theme");
                None
            }
        }
    }
}
