//! Networking for the Presence site
//!
//! This crate provides the HTTP theme resolver, with retry logic and timeout
//! handling on top of reqwest.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme_api;

pub use theme_api::{HttpThemeResolver, ThemeApiConfig};
