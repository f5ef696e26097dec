//! Core theme logic for the Presence site
//!
//! This crate holds everything about themes that does not depend on runtime
//! state: the packaged catalog, the color conversions behind the style
//! variables, the resolver seam the engine fetches themes through, and the
//! style surface themes are written to.
//!
//! # Modules
//!
//! - [`catalog`] - Theme definitions, validation, and the ordered listing
//! - [`color`] - Hex parsing, channel strings, alpha bytes, variable names
//! - [`document`] - Style surface, marker classes, variable name constants
//! - [`resolver`] - Async "fetch the theme map" indirection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod color;
pub mod document;
pub mod resolver;

pub use catalog::{
    CatalogError, ProgressGradient, ThemeCatalog, ThemeDefinition, ThemeMap, ThemeSummary,
    DEFAULT_THEME_KEY, REQUIRED_ROLES,
};
pub use document::{DocumentRoot, StyleSurface};
pub use resolver::{ResolveError, StaticThemeResolver, ThemeResolver};
