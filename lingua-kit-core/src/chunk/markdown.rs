use crate::chunk::{Chunk, split_text};
use regex::Regex;
use std::sync::LazyLock;

/// Constructs that must never be translated or split across chunks:
/// fenced and inline code, image markup, link targets, HTML comments and
/// tags, protection sentinels, and bare image paths.
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?sx)
        (?:```.*?(?:```|\z))                          # fenced code
        |(?:~~~.*?(?:~~~|\z))
        |(?:`[^`\n]+`)                                # inline code
        |(?:!\[[^\]]*\]\([^)]*\))                     # image markup
        |(?:\]\([^)]+\))                              # link target
        |(?:<!--.*?-->)                               # HTML comment
        |(?:</?[A-Za-z][^>\n]*>)                      # HTML tag
        |(?:@@PROTECTED_\d+@@)                        # protection sentinel
        |(?:[^\s()\[\]]+\.(?:png|jpe?g|gif|svg|webp)) # bare image path
        ",
    )
    .expect("protected-content pattern is valid")
});

/// Splits block text into translatable and protected chunks.
///
/// Protected spans round-trip verbatim; the gaps between them are split
/// with [`split_text`] under `max_size`, and adjacent translatable chunks
/// below `min_size` are merged back together. Chunk texts concatenate to
/// the input byte-for-byte.
pub fn chunk_markdown(text: &str, min_size: usize, max_size: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut cursor = 0;

    for m in PROTECTED.find_iter(text) {
        if m.start() > cursor {
            push_translatable(&mut chunks, &text[cursor..m.start()], max_size);
        }
        chunks.push(Chunk::protected(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        push_translatable(&mut chunks, &text[cursor..], max_size);
    }

    merge_small(chunks, min_size, max_size)
}

fn push_translatable(chunks: &mut Vec<Chunk>, gap: &str, max_size: usize) {
    if gap.trim().is_empty() {
        // Pure whitespace between protected regions stays untouched.
        chunks.push(Chunk::protected(gap));
        return;
    }
    for piece in split_text(gap, max_size) {
        if piece.trim().is_empty() {
            chunks.push(Chunk::protected(piece));
        } else {
            chunks.push(Chunk::translatable(piece));
        }
    }
}

/// Merges adjacent translatable chunks while one of them is below
/// `min_size`. The merged chunk may exceed `max_size` by at most
/// `min_size` — the same slack an indivisible sentence already gets.
fn merge_small(chunks: Vec<Chunk>, min_size: usize, max_size: usize) -> Vec<Chunk> {
    let budget = max_size.saturating_add(min_size);
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if let Some(last) = merged.last_mut()
            && last.need_translate
            && chunk.need_translate
        {
            let last_len = last.text.chars().count();
            let chunk_len = chunk.text.chars().count();
            let undersized = last_len < min_size || chunk_len < min_size;
            if undersized && (max_size == 0 || last_len + chunk_len <= budget) {
                last.text.push_str(&chunk.text);
                continue;
            }
        }
        merged.push(chunk);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_code_fence_is_protected() {
        let text = "Hello\n\n```go\nfunc main(){}\n```\n";
        let chunks = chunk_markdown(text, 0, 1000);
        assert_eq!(rejoin(&chunks), text);

        let protected: Vec<&Chunk> = chunks.iter().filter(|c| !c.need_translate).collect();
        assert!(
            protected
                .iter()
                .any(|c| c.text == "```go\nfunc main(){}\n```")
        );
        let translatable: Vec<&Chunk> = chunks.iter().filter(|c| c.need_translate).collect();
        assert_eq!(translatable.len(), 1);
        assert_eq!(translatable[0].text, "Hello\n\n");
    }

    #[test]
    fn test_inline_code_and_link_target() {
        let text = "Use `cargo build` to compile, docs at [the site](https://example.com).";
        let chunks = chunk_markdown(text, 0, 1000);
        assert_eq!(rejoin(&chunks), text);
        assert!(
            chunks
                .iter()
                .any(|c| !c.need_translate && c.text == "`cargo build`")
        );
        assert!(
            chunks
                .iter()
                .any(|c| !c.need_translate && c.text == "](https://example.com)")
        );
        // The link label stays translatable.
        assert!(
            chunks
                .iter()
                .any(|c| c.need_translate && c.text.contains("[the site"))
        );
    }

    #[test]
    fn test_image_markup_protected() {
        let text = "Before ![a diagram](fig/one.png) after";
        let chunks = chunk_markdown(text, 0, 1000);
        assert_eq!(rejoin(&chunks), text);
        assert!(
            chunks
                .iter()
                .any(|c| !c.need_translate && c.text == "![a diagram](fig/one.png)")
        );
    }

    #[test]
    fn test_html_tags_and_sentinels_protected() {
        let text = "<p>Hello @@PROTECTED_0@@ world</p>";
        let chunks = chunk_markdown(text, 0, 1000);
        assert_eq!(rejoin(&chunks), text);

        let translatable: Vec<&str> = chunks
            .iter()
            .filter(|c| c.need_translate)
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(translatable, vec!["Hello ", " world"]);
    }

    #[test]
    fn test_bare_image_path_protected() {
        let text = "See assets/logo.svg for the mark";
        let chunks = chunk_markdown(text, 0, 1000);
        assert!(
            chunks
                .iter()
                .any(|c| !c.need_translate && c.text == "assets/logo.svg")
        );
    }

    #[test]
    fn test_small_adjacent_chunks_merged() {
        // The splitter leaves a short leading chunk; the min-size pass
        // glues it onto its neighbor.
        let text = "One. Two. Three four five six seven eight.";
        let chunks = chunk_markdown(text, 10, 30);
        assert_eq!(rejoin(&chunks), text);

        let translatable: Vec<&Chunk> = chunks.iter().filter(|c| c.need_translate).collect();
        assert!(translatable[0].text.starts_with("One. Two. Three"));
        assert!(translatable.len() < 3);
    }

    #[test]
    fn test_whitespace_gap_not_translatable() {
        let text = "```a```\n\n```b```";
        let chunks = chunk_markdown(text, 0, 1000);
        assert_eq!(rejoin(&chunks), text);
        assert!(chunks.iter().all(|c| !c.need_translate));
    }

    #[test]
    fn test_plain_text_single_chunk() {
        let text = "Just a plain sentence.";
        let chunks = chunk_markdown(text, 100, 1000);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].need_translate);
    }
}
