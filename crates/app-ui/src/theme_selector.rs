//! Theme selector dropdown
//!
//! A thin caller of the theme engine. It lists the catalog summaries in display
//! order, marks the active one, and forwards a selection to
//! [`ThemeEngine::switch_theme`]. The only state it owns is whether the menu is
//! open.

use app_core::catalog::ThemeSummary;
use app_state::theme_engine::{SwitchReport, ThemeEngine};
use app_state::SwitchError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Menu heading
pub const TITLE: &str = "Choose Theme";

/// Accessible label of the trigger button
pub const ARIA_LABEL: &str = "Change theme";

// =============================================================================
// View Model
// =============================================================================

/// Interaction fed to the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key")]
pub enum SelectorInput {
    /// Trigger button pressed
    Toggle,
    /// Pointer pressed outside the selector bounds
    PointerDownOutside,
    /// Pointer pressed inside the selector bounds
    PointerDownInside,
    /// Cancel key
    Escape,
    /// Menu entry chosen
    Select(String),
}

/// One menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOption {
    /// Catalog summary
    pub summary: ThemeSummary,
    /// Whether this is the active theme
    pub is_selected: bool,
    /// Two-tone preview background
    pub swatch: String,
}

impl ThemeOption {
    fn new(summary: ThemeSummary, current_key: &str) -> Self {
        let swatch = swatch(&summary);
        let is_selected = summary.key == current_key;
        Self { summary, is_selected, swatch }
    }
}

/// CSS preview splitting the swatch between background and primary
pub fn swatch(summary: &ThemeSummary) -> String {
    format!(
        "linear-gradient(135deg, {} 50%, {} 50%)",
        summary.background_color, summary.primary_color
    )
}

// =============================================================================
// Selector
// =============================================================================

/// Dropdown state machine
pub struct ThemeSelector {
    engine: Arc<ThemeEngine>,
    is_open: bool,
}

impl ThemeSelector {
    /// Create a closed selector
    pub fn new(engine: Arc<ThemeEngine>) -> Self {
        Self { engine, is_open: false }
    }

    /// Whether the menu is showing
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip the menu
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Show the menu
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the menu
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Entries in display order, with the active theme marked
    pub async fn options(&self) -> Vec<ThemeOption> {
        let current = self.engine.current_key().await;
        self.engine
            .catalog()
            .list_themes()
            .into_iter()
            .map(|summary| ThemeOption::new(summary, &current))
            .collect()
    }

    /// Switch to `key` and close the menu, whatever the outcome
    pub async fn select(&mut self, key: &str) -> Result<SwitchReport, SwitchError> {
        tracing::debug!(theme = %key, "theme selected");
        let result = self.engine.switch_theme(key).await;
        self.close();
        result
    }

    /// Apply an interaction
    ///
    /// Returns the switch result when the input was a selection.
    pub async fn handle(
        &mut self,
        input: SelectorInput,
    ) -> Option<Result<SwitchReport, SwitchError>> {
        match input {
            SelectorInput::Toggle => self.toggle(),
            SelectorInput::PointerDownOutside | SelectorInput::Escape => self.close(),
            SelectorInput::PointerDownInside => {}
            SelectorInput::Select(key) => return Some(self.select(&key).await),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{DocumentRoot, StaticThemeResolver, ThemeCatalog};
    use app_state::ThemeEngineConfig;
    use storage::MemoryPreferenceStore;

    fn selector() -> ThemeSelector {
        let catalog = Arc::new(ThemeCatalog::bundled().unwrap());
        let engine = ThemeEngine::new(
            ThemeEngineConfig::default(),
            Arc::clone(&catalog),
            Arc::new(StaticThemeResolver::from_catalog(&catalog)),
            Arc::new(DocumentRoot::new()),
            Arc::new(MemoryPreferenceStore::new()),
        );
        ThemeSelector::new(Arc::new(engine))
    }

    // =========================================================================
    // Open/Close Tests
    // =========================================================================

    #[tokio::test]
    async fn test_starts_closed_and_toggles() {
        let mut selector = selector();
        assert!(!selector.is_open());

        selector.handle(SelectorInput::Toggle).await;
        assert!(selector.is_open());

        selector.handle(SelectorInput::Toggle).await;
        assert!(!selector.is_open());
    }

    #[tokio::test]
    async fn test_closes_on_outside_pointer_and_escape() {
        let mut selector = selector();

        selector.open();
        selector.handle(SelectorInput::PointerDownInside).await;
        assert!(selector.is_open());

        selector.handle(SelectorInput::PointerDownOutside).await;
        assert!(!selector.is_open());

        selector.open();
        assert!(selector.handle(SelectorInput::Escape).await.is_none());
        assert!(!selector.is_open());
    }

    #[tokio::test]
    async fn test_select_switches_and_closes() {
        let mut selector = selector();
        selector.open();

        let result = selector.handle(SelectorInput::Select("sunset".to_string())).await;
        let report = result.unwrap().unwrap();
        assert_eq!(report.key, "sunset");
        assert!(!selector.is_open());

        let selected: Vec<String> = selector
            .options()
            .await
            .into_iter()
            .filter(|o| o.is_selected)
            .map(|o| o.summary.key)
            .collect();
        assert_eq!(selected, vec!["sunset"]);
    }

    #[tokio::test]
    async fn test_failed_select_still_closes() {
        let mut selector = selector();
        selector.open();

        let err = selector.select("nonexistent").await.unwrap_err();
        assert!(matches!(err, SwitchError::UnknownTheme { .. }));
        assert!(!selector.is_open());
    }

    // =========================================================================
    // Options Tests
    // =========================================================================

    #[tokio::test]
    async fn test_options_follow_catalog_order() {
        let selector = selector();
        let options = selector.options().await;

        let keys: Vec<&str> = options.iter().map(|o| o.summary.key.as_str()).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys[0], "emerald");
        assert_eq!(keys[11], "storm");

        // Before init the default key is reported as current
        assert!(options[0].is_selected);
        assert_eq!(options.iter().filter(|o| o.is_selected).count(), 1);
    }

    #[test]
    fn test_swatch() {
        let summary = ThemeSummary {
            key: "midnight".to_string(),
            name: "🌙 Midnight".to_string(),
            description: String::new(),
            background_color: "#0f1729".to_string(),
            primary_color: "#3b82f6".to_string(),
        };
        assert_eq!(swatch(&summary), "linear-gradient(135deg, #0f1729 50%, #3b82f6 50%)");
    }

    #[test]
    fn test_input_serialization() {
        let json = serde_json::to_string(&SelectorInput::Select("storm".to_string())).unwrap();
        assert_eq!(json, r#"{"type":"Select","key":"storm"}"#);

        let parsed: SelectorInput = serde_json::from_str(r#"{"type":"Escape"}"#).unwrap();
        assert_eq!(parsed, SelectorInput::Escape);
    }
}
