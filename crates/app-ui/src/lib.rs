//! User interface for the Presence site theme picker
//!
//! The selector is presentation-agnostic: it exposes the menu entries and
//! open/closed state, and hands selections to the theme engine.
//!
//! # Example
//!
//! ```rust,no_run
//! use app_ui::theme_selector::{SelectorInput, ThemeSelector};
//! # async fn demo(engine: std::sync::Arc<app_state::ThemeEngine>) {
//! let mut selector = ThemeSelector::new(engine);
//! selector.handle(SelectorInput::Toggle).await;
//! for option in selector.options().await {
//!     println!("{} {}", option.summary.name, option.is_selected);
//! }
//! selector.handle(SelectorInput::Select("midnight".into())).await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod theme_selector;

pub use theme_selector::{SelectorInput, ThemeOption, ThemeSelector, ARIA_LABEL, TITLE};
