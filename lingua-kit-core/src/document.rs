use serde::{Deserialize, Serialize};

/// Source format of a document, as reported by the external parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Markdown,
    Html,
    Xhtml,
    Epub,
    PlainText,
}

/// The kind of a parsed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Heading,
    CodeBlock,
    Math,
    Table,
    Image,
    RawHtml,
    Text,
    Anchor,
}

impl BlockKind {
    /// Whether blocks of this kind carry translatable text by default.
    pub fn translatable_by_default(self) -> bool {
        matches!(
            self,
            Self::Paragraph | Self::Heading | Self::Table | Self::RawHtml | Self::Text
        )
    }
}

/// One parsed block. Non-translatable blocks pass through the engine
/// byte-identical; translatable blocks get their `translated` field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,

    /// Original content, never mutated.
    pub content: String,

    /// Whether the engine may translate this block.
    pub translatable: bool,

    /// Translated content, set by the engine. `None` for blocks that were
    /// not translated (non-translatable, empty, or all-protected).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
}

impl Block {
    /// Creates a block with the kind's default translatability.
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            translatable: kind.translatable_by_default(),
            translated: None,
        }
    }

    /// Overrides the translatable flag.
    pub fn with_translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    /// The content an external renderer should emit: the translation when
    /// present, the original otherwise.
    pub fn output(&self) -> &str {
        self.translated.as_deref().unwrap_or(&self.content)
    }
}

/// A parsed document: identifier, format tag, and an ordered block
/// sequence. Identity is stable across translation; only `translated`
/// fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub format: DocumentFormat,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(id: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            id: id.into(),
            format,
            blocks: Vec::new(),
        }
    }

    /// Appends a block.
    pub fn push_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Whether any block carries translatable, non-whitespace content.
    pub fn has_translatable_content(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.translatable && !b.content.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_translatability() {
        assert!(BlockKind::Paragraph.translatable_by_default());
        assert!(BlockKind::RawHtml.translatable_by_default());
        assert!(!BlockKind::CodeBlock.translatable_by_default());
        assert!(!BlockKind::Math.translatable_by_default());
        assert!(!BlockKind::Image.translatable_by_default());
        assert!(!BlockKind::Anchor.translatable_by_default());
    }

    #[test]
    fn test_output_prefers_translation() {
        let mut block = Block::new(BlockKind::Paragraph, "Hello");
        assert_eq!(block.output(), "Hello");
        block.translated = Some("Hallo".to_string());
        assert_eq!(block.output(), "Hallo");
    }

    #[test]
    fn test_has_translatable_content() {
        let empty = Document::new("doc", DocumentFormat::Markdown)
            .push_block(Block::new(BlockKind::CodeBlock, "fn main() {}"))
            .push_block(Block::new(BlockKind::Paragraph, "   \n"));
        assert!(!empty.has_translatable_content());

        let doc = Document::new("doc", DocumentFormat::Markdown)
            .push_block(Block::new(BlockKind::Paragraph, "Hello"));
        assert!(doc.has_translatable_content());
    }
}
