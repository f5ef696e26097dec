//! Theme catalog and the ordered theme listing
//!
//! The catalog is the packaged, read-only registry of every theme the site can
//! show. It is parsed once from `themes.json`, validated, and then only read:
//! the selector lists it through [`ThemeCatalog::list_themes`] and the engine
//! checks persisted keys against it.
//!
//! # Usage
//!
//! ```rust
//! use app_core::catalog::ThemeCatalog;
//!
//! let catalog = ThemeCatalog::bundled().expect("packaged catalog is valid");
//! let themes = catalog.list_themes();
//! assert_eq!(themes[0].key, "emerald");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::color::{is_hex_color, kebab_case};

/// The packaged theme configuration
pub const BUNDLED_THEMES: &str = include_str!("../themes.json");

/// Theme applied when nothing valid has been persisted
pub const DEFAULT_THEME_KEY: &str = "emerald";

/// Color roles every theme must define, in their kebab-case variable form
pub const REQUIRED_ROLES: [&str; 12] = [
    "background",
    "foreground",
    "primary",
    "secondary",
    "primary-foreground",
    "card",
    "card-foreground",
    "border",
    "muted-foreground",
    "success",
    "success-foreground",
    "accent",
];

/// Catalog integrity errors
///
/// These are packaging defects: they surface when the catalog is loaded and are
/// never papered over with a blank theme.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configuration is not valid JSON or does not match the schema
    #[error("Failed to parse theme catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read
    #[error("Failed to read theme catalog {path}: {source}")]
    Io {
        /// File that was being read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalog contains no themes
    #[error("Theme catalog is empty")]
    Empty,

    /// A theme lacks a color role the presentation layer reads
    #[error("Theme '{theme}' is missing required color role '{role}'")]
    MissingRole {
        /// Theme key
        theme: String,
        /// Missing role, kebab-case
        role: String,
    },

    /// A theme color is not a `#RGB` / `#RRGGBB` hex string
    #[error("Theme '{theme}' has invalid color for '{role}': {value}")]
    InvalidColor {
        /// Theme key
        theme: String,
        /// Offending role
        role: String,
        /// Offending value
        value: String,
    },

    /// The highlight opacity lies outside `[0, 1]`
    #[error("Theme '{theme}' has recentEditOpacity {value} outside [0, 1]")]
    InvalidOpacity {
        /// Theme key
        theme: String,
        /// Offending value
        value: f64,
    },
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Gradient endpoints for progress indicators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressGradient {
    /// Start color (any CSS color)
    pub from: String,
    /// End color (any CSS color)
    pub to: String,
}

/// One theme entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDefinition {
    /// Stable identifier, taken from the key of the `themes` object
    #[serde(skip)]
    pub key: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Short description shown under the name
    #[serde(default)]
    pub description: String,

    /// Sort position; absent sorts as `0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    /// Role name → hex color
    #[serde(default)]
    pub colors: BTreeMap<String, String>,

    /// Color of the transient "recently edited" highlight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_edit_color: Option<String>,

    /// Alpha of the highlight, in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_edit_opacity: Option<f64>,

    /// Explicit progress gradient; synthesized from primary/secondary when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_gradient: Option<ProgressGradient>,
}

impl ThemeDefinition {
    /// Effective sort position
    pub fn sort_order(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Look up a color by role, accepting camelCase or kebab-case
    pub fn color(&self, role: &str) -> Option<&str> {
        if let Some(value) = self.colors.get(role) {
            return Some(value.as_str());
        }
        let wanted = kebab_case(role);
        self.colors
            .iter()
            .find(|(name, _)| kebab_case(name) == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Gradient endpoints, falling back to the raw primary and secondary colors
    pub fn gradient_endpoints(&self) -> Option<(&str, &str)> {
        match &self.progress_gradient {
            Some(gradient) => Some((gradient.from.as_str(), gradient.to.as_str())),
            None => Some((self.color("primary")?, self.color("secondary")?)),
        }
    }

    /// Project into the listing shape used by the selector
    pub fn summary(&self) -> ThemeSummary {
        ThemeSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            background_color: self.color("background").unwrap_or_default().to_string(),
            primary_color: self.color("primary").unwrap_or_default().to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        for role in REQUIRED_ROLES {
            if self.color(role).is_none() {
                return Err(CatalogError::MissingRole {
                    theme: self.key.clone(),
                    role: role.to_string(),
                });
            }
        }

        for (role, value) in &self.colors {
            if !is_hex_color(value) {
                return Err(CatalogError::InvalidColor {
                    theme: self.key.clone(),
                    role: role.clone(),
                    value: value.clone(),
                });
            }
        }

        if let Some(color) = &self.recent_edit_color {
            if !is_hex_color(color) {
                return Err(CatalogError::InvalidColor {
                    theme: self.key.clone(),
                    role: "recentEditColor".to_string(),
                    value: color.clone(),
                });
            }
        }

        if let Some(opacity) = self.recent_edit_opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(CatalogError::InvalidOpacity { theme: self.key.clone(), value: opacity });
            }
        }

        Ok(())
    }
}

/// Read-only projection of a theme for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummary {
    /// Theme key
    pub key: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Hex background color
    pub background_color: String,
    /// Hex primary color
    pub primary_color: String,
}

#[derive(Deserialize)]
struct ThemeDocument {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    themes: serde_json::Map<String, serde_json::Value>,
}

/// Themes keyed by their identifier, in declaration order
///
/// This is what a resolver hands back. It is not validated: an entry may be
/// missing roles or carry an empty color map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeMap {
    version: Option<u32>,
    entries: Vec<ThemeDefinition>,
}

impl ThemeMap {
    /// Parse a `{ "themes": { key: definition } }` document
    ///
    /// Entries are parsed one by one. An entry that does not match the
    /// definition shape is kept under its key with no colors, so only that key
    /// fails to apply.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        Self::parse(json, false)
    }

    /// Parse a document, failing on the first malformed entry
    pub fn from_json_strict(json: &str) -> std::result::Result<Self, serde_json::Error> {
        Self::parse(json, true)
    }

    fn parse(json: &str, strict: bool) -> std::result::Result<Self, serde_json::Error> {
        let document: ThemeDocument = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(document.themes.len());
        for (key, value) in document.themes {
            let mut definition = match serde_json::from_value::<ThemeDefinition>(value) {
                Ok(definition) => definition,
                Err(err) if strict => return Err(err),
                Err(err) => {
                    tracing::warn!(theme = %key, error = %err, "malformed theme entry");
                    ThemeDefinition::default()
                }
            };
            definition.key = key;
            entries.push(definition);
        }

        Ok(Self { version: document.version, entries })
    }

    /// Build a map from definitions; a repeated key replaces the earlier entry
    pub fn from_definitions(definitions: impl IntoIterator<Item = ThemeDefinition>) -> Self {
        let mut map = Self::default();
        for definition in definitions {
            map.insert(definition);
        }
        map
    }

    /// Insert or replace a definition, keeping the original position on replace
    pub fn insert(&mut self, definition: ThemeDefinition) {
        match self.entries.iter_mut().find(|d| d.key == definition.key) {
            Some(existing) => *existing = definition,
            None => self.entries.push(definition),
        }
    }

    /// Serialize back to the document shape
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let mut themes = serde_json::Map::new();
        for definition in &self.entries {
            themes.insert(definition.key.clone(), serde_json::to_value(definition)?);
        }
        let mut document = serde_json::Map::new();
        if let Some(version) = self.version {
            document.insert("version".to_string(), version.into());
        }
        document.insert("themes".to_string(), serde_json::Value::Object(themes));
        serde_json::to_string(&document)
    }

    /// Look up a theme by key
    pub fn get(&self, key: &str) -> Option<&ThemeDefinition> {
        self.entries.iter().find(|d| d.key == key)
    }

    /// Whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in declaration order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.key.clone()).collect()
    }

    /// Definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.entries.iter()
    }

    /// Document version, if the configuration declares one
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Number of themes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no themes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries sorted by `order` (absent = 0), ties kept in declaration order
    pub fn list_themes(&self) -> Vec<ThemeSummary> {
        let mut sorted: Vec<&ThemeDefinition> = self.entries.iter().collect();
        // sort_by_key is stable, which is what keeps declaration order on ties
        sorted.sort_by_key(|d| d.sort_order());
        sorted.into_iter().map(ThemeDefinition::summary).collect()
    }
}

/// The validated, packaged theme registry
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCatalog {
    themes: ThemeMap,
}

impl ThemeCatalog {
    /// Validate a theme map into a catalog
    pub fn new(themes: ThemeMap) -> Result<Self> {
        if themes.is_empty() {
            return Err(CatalogError::Empty);
        }
        for definition in themes.iter() {
            definition.validate()?;
        }
        tracing::debug!(themes = themes.len(), "theme catalog validated");
        Ok(Self { themes })
    }

    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(ThemeMap::from_json_strict(json)?)
    }

    /// Load and validate a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into this crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_THEMES)
    }

    /// The full key → definition mapping
    pub fn themes(&self) -> &ThemeMap {
        &self.themes
    }

    /// Look up a theme by key
    pub fn get(&self, key: &str) -> Option<&ThemeDefinition> {
        self.themes.get(key)
    }

    /// Whether a key is part of the catalog
    pub fn contains(&self, key: &str) -> bool {
        self.themes.contains(key)
    }

    /// Ordered summaries for display
    pub fn list_themes(&self) -> Vec<ThemeSummary> {
        self.themes.list_themes()
    }
}
