//! Chunking and grouping of translatable text.
//!
//! [`split_text`] cuts oversized text along the strongest available
//! boundary (paragraphs, then lines, then sentences, then words, then a
//! hard character cut). [`chunk_markdown`] additionally fences off
//! markdown/HTML constructs that must never be translated or split, and
//! [`group_members`] packs text nodes into provider-call-sized groups.

mod group;
mod markdown;
mod split;

pub use group::group_members;
pub use markdown::chunk_markdown;
pub use split::split_text;

use serde::{Deserialize, Serialize};

/// A contiguous span of source text. Non-translatable chunks round-trip
/// byte-identical; translatable chunks become [`TextNode`]s.
///
/// [`TextNode`]: crate::node::TextNode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub text: String,
    pub need_translate: bool,
}

impl Chunk {
    pub fn translatable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            need_translate: true,
        }
    }

    pub fn protected(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            need_translate: false,
        }
    }
}
