//! Snapshot parsing for agent-browser output
//!
//! Parses the accessibility tree JSON from `agent-browser snapshot --json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parsed snapshot from agent-browser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Whether the operation succeeded
    #[serde(default)]
    pub success: bool,
    /// Snapshot data
    #[serde(default)]
    pub data: Option<SnapshotData>,
}

/// Snapshot data content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Raw snapshot string (accessibility tree)
    #[serde(default)]
    pub snapshot: String,
    /// Element refs mapped to their info
    #[serde(default)]
    pub refs: HashMap<String, Element>,
}

/// An element in the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    /// ARIA role
    #[serde(default)]
    pub role: String,
    /// Accessible name
    #[serde(default)]
    pub name: String,
    /// Element value (for inputs)
    #[serde(default)]
    pub value: Option<String>,
    /// Whether element is focused
    #[serde(default)]
    pub focused: bool,
}

impl Snapshot {
    /// Count the number of elements with refs
    pub fn count_elements(&self) -> usize {
        self.data.as_ref().map(|d| d.refs.len()).unwrap_or(0)
    }

    /// Interactive elements ordered by ref number (e1, e2, ..., e10)
    pub fn interactive_elements(&self) -> Vec<(&String, &Element)> {
        let mut elements: Vec<_> = self
            .data
            .as_ref()
            .map(|d| d.refs.iter().filter(|(_, el)| el.is_interactive()).collect())
            .unwrap_or_default();

        elements.sort_by_key(|(ref_id, _)| ref_sort_key(ref_id));
        elements
    }

    /// Render the interactive elements for the act model
    pub fn format_for_prompt(&self) -> String {
        let elements = self.interactive_elements();
        if elements.is_empty() {
            return "No interactive elements on the page.".to_string();
        }

        let mut output = String::from("Page elements:\n");
        for (ref_id, element) in elements {
            let value_str = element
                .value
                .as_ref()
                .map(|v| format!(" = \"{}\"", v))
                .unwrap_or_default();

            output.push_str(&format!(
                "  @{}: {} \"{}\"{}",
                ref_id, element.role, element.name, value_str
            ));

            if element.focused {
                output.push_str(" [focused]");
            }

            output.push('\n');
        }
        output
    }
}

fn ref_sort_key(ref_id: &str) -> (u64, String) {
    let number = ref_id
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(u64::MAX);
    (number, ref_id.to_string())
}

impl Element {
    /// Check if this is an interactive element
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.role.as_str(),
            "button"
                | "link"
                | "textbox"
                | "checkbox"
                | "radio"
                | "combobox"
                | "menuitem"
                | "tab"
                | "switch"
                | "searchbox"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(role: &str, name: &str) -> Element {
        Element {
            role: role.to_string(),
            name: name.to_string(),
            value: None,
            focused: false,
        }
    }

    fn snapshot_with(refs: Vec<(&str, Element)>) -> Snapshot {
        Snapshot {
            success: true,
            data: Some(SnapshotData {
                snapshot: String::new(),
                refs: refs
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_parse_agent_browser_json() {
        let raw = r#"{
            "success": true,
            "data": {
                "snapshot": "- heading \"Example Domain\"",
                "refs": {
                    "e1": {"role": "heading", "name": "Example Domain"},
                    "e2": {"role": "link", "name": "More information..."}
                }
            }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.count_elements(), 2);
        assert_eq!(snapshot.interactive_elements().len(), 1);
    }

    #[test]
    fn test_format_for_prompt_orders_refs() {
        let snapshot = snapshot_with(vec![
            ("e10", element("link", "Ten")),
            ("e2", element("button", "Two")),
            ("e3", element("heading", "Skipped")),
        ]);

        let text = snapshot.format_for_prompt();
        let two = text.find("@e2").unwrap();
        let ten = text.find("@e10").unwrap();
        assert!(two < ten);
        assert!(!text.contains("Skipped"));
    }

    #[test]
    fn test_format_for_prompt_empty() {
        let text = Snapshot::default().format_for_prompt();
        assert_eq!(text, "No interactive elements on the page.");
    }
}
