//! The global style surface themes are applied to
//!
//! In the browser this is the root element: a set of CSS custom properties and
//! a class list. [`StyleSurface`] abstracts it so the engine can be driven and
//! inspected in-process through [`DocumentRoot`].

use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Prefix shared by every theme marker class
pub const THEME_CLASS_PREFIX: &str = "theme-";

/// Class present on the root while a theme switch is animating
pub const TRANSITION_CLASS: &str = "theme-transition";

/// Variable holding the RGBA highlight color
pub const RECENT_EDIT_VARIABLE: &str = "--recent-edit-color";

/// Variable holding the progress gradient start
pub const GRADIENT_FROM_VARIABLE: &str = "--progress-gradient-from";

/// Variable holding the progress gradient end
pub const GRADIENT_TO_VARIABLE: &str = "--progress-gradient-to";

/// Theme keys whose marker class differs from the key
///
/// These names are part of the stylesheet contract, spelling included.
const MARKER_SUFFIXES: [(&str, &str); 12] = [
    ("emerald", "emerald"),
    ("emnight", "emerald-night"),
    ("celeste", "celeste"),
    ("maya", "maya"),
    ("arctic", "arctic"),
    ("mono", "monochrome"),
    ("sunset", "sunset"),
    ("sepia", "sepia"),
    ("coral", "coral-fushia"),
    ("midnight", "midnight"),
    ("rosegarden", "rosey"),
    ("storm", "storm"),
];

/// Class suffix for a theme key, falling back to the key itself
pub fn marker_suffix(key: &str) -> &str {
    MARKER_SUFFIXES
        .iter()
        .find(|(theme, _)| *theme == key)
        .map(|(_, suffix)| *suffix)
        .unwrap_or(key)
}

/// Full marker class for a theme key (`coral` → `theme-coral-fushia`)
pub fn marker_class(key: &str) -> String {
    format!("{}{}", THEME_CLASS_PREFIX, marker_suffix(key))
}

/// Whether a class is a theme marker (the transition flag is not one)
pub fn is_marker_class(class: &str) -> bool {
    class.starts_with(THEME_CLASS_PREFIX) && class != TRANSITION_CLASS
}

/// Writable global style state
pub trait StyleSurface: Send + Sync {
    /// Set a custom property
    fn set_property(&self, name: &str, value: &str);

    /// Read a custom property
    fn property(&self, name: &str) -> Option<String>;

    /// Add a class to the root (no-op when present)
    fn add_class(&self, class: &str);

    /// Remove a class from the root
    fn remove_class(&self, class: &str);

    /// Current root classes, in insertion order
    fn classes(&self) -> Vec<String>;

    /// Whether the root carries a class
    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Remove every theme marker and add `class` in their place
    fn replace_marker(&self, class: &str) {
        for existing in self.classes() {
            if is_marker_class(&existing) {
                self.remove_class(&existing);
            }
        }
        self.add_class(class);
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    properties: BTreeMap<String, String>,
    classes: Vec<String>,
}

/// In-process root element
#[derive(Debug, Default)]
pub struct DocumentRoot {
    state: RwLock<DocumentState>,
}

impl DocumentRoot {
    /// Create an empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every custom property
    pub fn properties(&self) -> BTreeMap<String, String> {
        self.state.read().properties.clone()
    }

    /// The single theme marker currently applied, if any
    pub fn marker(&self) -> Option<String> {
        self.state.read().classes.iter().find(|c| is_marker_class(c)).cloned()
    }
}

impl StyleSurface for DocumentRoot {
    fn set_property(&self, name: &str, value: &str) {
        self.state.write().properties.insert(name.to_string(), value.to_string());
    }

    fn property(&self, name: &str) -> Option<String> {
        self.state.read().properties.get(name).cloned()
    }

    fn add_class(&self, class: &str) {
        let mut state = self.state.write();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.state.write().classes.retain(|c| c != class);
    }

    fn classes(&self) -> Vec<String> {
        self.state.read().classes.clone()
    }
}
