//! Block tokens produced by the scanner.

/// A block-level element.
///
/// Each token covers a contiguous, non-overlapping run of input lines.
/// Text payloads are raw markdown; escaping happens at render time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum Token {
    /// ATX heading, `level` in `1..=6`.
    Heading { level: u8, text: String },
    /// One trimmed source line.
    Paragraph { text: String },
    UnorderedList { items: Vec<String> },
    OrderedList { items: Vec<String> },
    /// Quoted lines with their markers stripped, joined with `\n`.
    Blockquote { text: String },
    /// Pipe-delimited rows as written: header, delimiter, then body rows.
    Table { rows: Vec<String> },
    /// Fenced code block. `lines` are verbatim, without the fences.
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    /// A line that is exactly one image.
    Image { alt: String, src: String },
    /// A line that is exactly one link.
    Link { text: String, href: String },
    HorizontalRule,
}

impl Token {
    /// Short snake-case name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::UnorderedList { .. } => "unordered_list",
            Self::OrderedList { .. } => "ordered_list",
            Self::Blockquote { .. } => "blockquote",
            Self::Table { .. } => "table",
            Self::CodeBlock { .. } => "code_block",
            Self::Image { .. } => "image",
            Self::Link { .. } => "link",
            Self::HorizontalRule => "horizontal_rule",
        }
    }

    pub(crate) fn paragraph(text: &str) -> Self {
        Self::Paragraph {
            text: text.to_owned(),
        }
    }
}
