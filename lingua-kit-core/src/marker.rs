//! The marker protocol: translating many small nodes in one LLM call
//! while keeping their identity.
//!
//! Each node is wrapped in `@@NODE_START_<id>@@` / `@@NODE_END_<id>@@`
//! markers derived from its global ID, and the prompt instructs the model
//! to reproduce the markers around each translation. [`parse_group_output`]
//! recovers per-node translations from the bulk response; nodes whose
//! markers the model dropped become *failed nodes* and feed the repair
//! loop.
//!
//! The sibling submodules handle the two adjacent concerns: opaque
//! `@@PROTECTED_<n>@@` sentinels for content that must survive translation
//! byte-identical ([`protect`]), and removal of model reasoning spans
//! before output is propagated or cached ([`reasoning`]).

pub mod protect;
pub mod reasoning;

use crate::node::NodeGroup;
use fancy_regex::Regex;
use log::warn;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Paired markers: the back-reference guarantees the closing marker
/// carries the same ID as the opening one.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)@@NODE_START_(\d+)@@\n(.*?)\n@@NODE_END_\1@@")
        .expect("marker pattern is valid")
});

/// Wraps every member of a group in its ID markers, joined by blank lines.
pub fn wrap_group(group: &NodeGroup) -> String {
    group
        .members
        .iter()
        .map(|m| format!("@@NODE_START_{0}@@\n{1}\n@@NODE_END_{0}@@", m.id, m.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extracts `(id, translation)` pairs from a provider response.
///
/// IDs outside `valid_ids` are logged and discarded; duplicate IDs keep
/// the first occurrence; surrounding whitespace is trimmed. Members absent
/// from the returned map are the group's failed nodes.
pub fn parse_group_output(output: &str, valid_ids: &HashSet<u32>) -> HashMap<u32, String> {
    let mut translations = HashMap::new();

    for captures in MARKER.captures_iter(output) {
        let captures = match captures {
            Ok(captures) => captures,
            Err(e) => {
                warn!("marker scan aborted: {e}");
                break;
            }
        };
        let (Some(id_match), Some(text_match)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let Ok(id) = id_match.as_str().parse::<u32>() else {
            continue;
        };
        if !valid_ids.contains(&id) {
            warn!("discarding translation for unknown node {id}");
            continue;
        }
        translations
            .entry(id)
            .or_insert_with(|| text_match.as_str().trim().to_string());
    }

    translations
}
