use crate::node::TextNode;

/// Renders a node back into its document position: preserved leading
/// whitespace, the translation (or the original text when translation
/// failed — never an empty hole, never markers), preserved trailing
/// whitespace.
///
/// Nodes carrying an original HTML fragment get in-structure replacement
/// first, falling back to plain text when the original no longer appears
/// inside the fragment.
pub fn render_node(node: &TextNode) -> String {
    let body = if node.is_translated() {
        node.translated_text.as_str()
    } else {
        node.original_text.as_str()
    };

    if node.is_translated()
        && let Some(fragment) = &node.format.original_html_fragment
        && let Some(replaced) = replace_in_fragment(fragment, &node.original_text, body)
    {
        return format!(
            "{}{}{}",
            node.format.leading_ws, replaced, node.format.trailing_ws
        );
    }

    format!(
        "{}{}{}",
        node.format.leading_ws, body, node.format.trailing_ws
    )
}

/// Replaces the first occurrence of `original` inside `fragment`,
/// preserving the surrounding tags. `None` when the original text is not
/// found (caller falls back to plain text).
pub fn replace_in_fragment(fragment: &str, original: &str, translated: &str) -> Option<String> {
    if original.is_empty() || !fragment.contains(original) {
        return None;
    }
    Some(fragment.replacen(original, translated, 1))
}
