//! Runtime theme state for the Presence site
//!
//! This crate owns the active theme: which key is applied, whether the initial
//! switch has settled, and the channels other components observe it through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme_engine;

pub use theme_engine::{
    ActiveThemeState, SwitchError, SwitchReport, ThemeEngine, ThemeEngineConfig, ThemeEvent,
};
