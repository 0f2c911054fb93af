//! Opaque sentinels for content that must survive translation verbatim.

use regex::Regex;
use std::sync::LazyLock;

/// Regions replaced before translation: script/style/pre/code elements,
/// SVG subtrees (never traversed for translation), HTML comments, empty
/// page anchors, and empty id-only anchors.
static PROTECTED_REGIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?isx)
        (?:<script\b.*?</script\s*>)
        |(?:<style\b.*?</style\s*>)
        |(?:<pre\b.*?</pre\s*>)
        |(?:<code\b.*?</code\s*>)
        |(?:<svg\b.*?</svg\s*>)
        |(?:<!--.*?-->)
        |(?:<a\s+class="page"[^>]*/>)
        |(?:<a\s+id="[^"]*"\s*/>)
        |(?:<a\s+id="[^"]*"\s*>\s*</a\s*>)
        "#,
    )
    .expect("protected-region pattern is valid")
});

static SENTINEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@PROTECTED_(\d+)@@").expect("sentinel pattern is valid"));

/// The protected originals, in sentinel order.
#[derive(Debug, Default, Clone)]
pub struct ProtectedRegions {
    originals: Vec<String>,
}

impl ProtectedRegions {
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

/// Replaces every protected region with an `@@PROTECTED_<n>@@` sentinel.
///
/// Restoration with [`restore_content`] is the exact inverse; applying
/// both without translation is the identity.
pub fn protect_content(text: &str) -> (String, ProtectedRegions) {
    let mut regions = ProtectedRegions::default();
    let protected = PROTECTED_REGIONS
        .replace_all(text, |captures: &regex::Captures| {
            let index = regions.originals.len();
            regions.originals.push(captures[0].to_string());
            format!("@@PROTECTED_{index}@@")
        })
        .into_owned();
    (protected, regions)
}

/// Substitutes every sentinel back with its original bytes.
pub fn restore_content(text: &str, regions: &ProtectedRegions) -> String {
    SENTINEL
        .replace_all(text, |captures: &regex::Captures| {
            captures[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| regions.originals.get(index))
                .cloned()
                // A sentinel the engine never issued; drop it rather than
                // leak it into the rendered document.
                .unwrap_or_default()
        })
        .into_owned()
}

/// Whether any sentinel survives in `text`. Used by restoration tests.
pub fn contains_sentinel(text: &str) -> bool {
    SENTINEL.is_match(text)
}
