// Extension selector
//
// Numan Thabit 2025 Nov

use crate::model::Extension;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSelector {
    pub selected: String,
    pub selected_label: String,
    /// Sorted by display name, case-insensitively.
    pub options: Vec<Extension>,
}

impl ExtensionSelector {
    pub fn new(mut options: Vec<Extension>, selected: &str) -> Self {
        options.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        let selected_label = options
            .iter()
            .find(|e| e.extension_name == selected)
            .map(|e| e.display_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(selected)
            .to_string();
        Self {
            selected: selected.to_string(),
            selected_label,
            options,
        }
    }

    /// Whether the selection is one of the listed options.
    pub fn has_selected_option(&self) -> bool {
        self.options.iter().any(|e| e.extension_name == self.selected)
    }

    pub fn is_visible(&self) -> bool {
        !self.options.is_empty()
    }
}
