use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The only element attributes whose values are translation candidates.
/// DOM walkers consult this before creating attribute nodes; everything
/// else (`src`, `href`, `id`, ...) passes through untouched.
pub const TRANSLATABLE_ATTRIBUTES: [&str; 6] =
    ["title", "alt", "label", "aria-label", "placeholder", "summary"];

/// Whether an attribute's value may be translated.
pub fn is_translatable_attribute(name: &str) -> bool {
    TRANSLATABLE_ATTRIBUTES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Formatting captured around a node's text so the merge can reproduce it
/// verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFormat {
    /// Whitespace preceding the text, preserved verbatim.
    pub leading_ws: String,

    /// Whitespace following the text, preserved verbatim.
    pub trailing_ws: String,

    /// For complex nodes: the original HTML fragment, used for
    /// in-structure replacement at merge time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_html_fragment: Option<String>,
}

/// One translatable text unit discovered in a document.
///
/// Global IDs are dense `0..N-1` in discovery order and stable across
/// runs; the merge back into the document is keyed on them, never on
/// completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub global_id: u32,

    /// The trimmed original text (surrounding whitespace lives in
    /// `format`).
    pub original_text: String,

    /// Empty until the engine sets it.
    #[serde(default)]
    pub translated_text: String,

    /// Diagnostic location (block index, DOM path, ...).
    pub path: String,

    pub format: NodeFormat,

    /// Whether this node is an element attribute value rather than a text
    /// node.
    #[serde(default)]
    pub is_attribute: bool,

    /// The attribute name when `is_attribute` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
}

impl TextNode {
    /// Creates a node from raw text, splitting off the surrounding
    /// whitespace into `format`.
    pub fn from_raw(global_id: u32, raw: &str, path: impl Into<String>) -> Self {
        let trimmed_start = raw.trim_start();
        let leading_len = raw.len() - trimmed_start.len();
        let trimmed = trimmed_start.trim_end();
        let trailing_len = trimmed_start.len() - trimmed.len();

        Self {
            global_id,
            original_text: trimmed.to_string(),
            translated_text: String::new(),
            path: path.into(),
            format: NodeFormat {
                leading_ws: raw[..leading_len].to_string(),
                trailing_ws: trimmed_start[trimmed_start.len() - trailing_len..].to_string(),
                original_html_fragment: None,
            },
            is_attribute: false,
            attribute_name: None,
        }
    }

    /// Creates an attribute node.
    pub fn attribute(
        global_id: u32,
        value: &str,
        attribute_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let mut node = Self::from_raw(global_id, value, path);
        node.is_attribute = true;
        node.attribute_name = Some(attribute_name.into());
        node
    }

    /// Whether the engine produced a translation for this node.
    pub fn is_translated(&self) -> bool {
        !self.translated_text.is_empty()
    }

    /// Whether there is anything to translate.
    pub fn is_translatable(&self) -> bool {
        !self.original_text.is_empty()
    }
}

/// One member of a [`NodeGroup`]: the node ID plus the text snapshot sent
/// to the provider.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub id: u32,
    pub text: String,
}

/// An ordered bundle of nodes sent in one provider call under the marker
/// protocol.
#[derive(Debug, Clone, Default)]
pub struct NodeGroup {
    pub members: Vec<GroupMember>,
}

impl NodeGroup {
    /// Combined character count of all member texts.
    pub fn char_len(&self) -> usize {
        self.members.iter().map(|m| m.text.chars().count()).sum()
    }

    /// The set of member IDs, for validating parsed output.
    pub fn id_set(&self) -> HashSet<u32> {
        self.members.iter().map(|m| m.id).collect()
    }
}
