//! Inline formatting for paragraph text.
//!
//! The text is escaped first. Images and links are then lifted out of the
//! escaped text and replaced by placeholders, so emphasis delimiters inside a
//! URL or alt text stay literal. Bold, italic, strikethrough and inline code
//! run in that order over the remaining text, and the placeholders are filled
//! back in last. Delimiters do not nest.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").expect("invalid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*|_(.*?)_").expect("invalid italic regex"));
static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(.*?)~~").expect("invalid strikethrough regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("invalid code span regex"));
/// Image or link; groups 1 and 2 are alt and src, groups 3 and 4 text and href.
static MEDIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)|\[([^\]]+)\]\(([^)]+)\)").expect("invalid media regex")
});
static TAG_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("invalid tag regex"));

/// Stands in for a lifted image or link while emphasis runs.
const PLACEHOLDER: char = '\u{fffc}';

/// Attributes added to links in link-safety mode.
const SAFE_LINK_ATTRS: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// Applies inline markdown substitutions to a single paragraph.
///
/// # Example
///
/// ```
/// use marklet::InlineTransformer;
///
/// let inline = InlineTransformer::new();
/// assert_eq!(
///     inline.transform("**bold** & `code`"),
///     "<strong>bold</strong> &amp; <code>code</code>"
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineTransformer {
    safe_links: bool,
}

impl InlineTransformer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open links in a new tab with `rel="noopener noreferrer"`.
    #[must_use]
    pub fn with_safe_links(mut self, enabled: bool) -> Self {
        self.safe_links = enabled;
        self
    }

    /// Whether link-safety mode is enabled.
    pub fn safe_links(&self) -> bool {
        self.safe_links
    }

    /// Attributes appended to every generated `<a>` tag.
    pub(crate) fn link_attrs(&self) -> &'static str {
        if self.safe_links { SAFE_LINK_ATTRS } else { "" }
    }

    /// Escape `text` and apply every inline substitution.
    ///
    /// Link and image attributes come from the escaped text, so they are
    /// escaped exactly once and never pick up emphasis markup.
    pub fn transform(&self, text: &str) -> String {
        let escaped = escape_html(text);

        // One slot per placeholder in `masked`, in order. `None` marks a
        // placeholder character that was already part of the text.
        let mut masked = String::with_capacity(escaped.len());
        let mut slots: Vec<Option<String>> = Vec::new();
        let mut last = 0;
        for caps in MEDIA.captures_iter(&escaped) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_segment(&escaped[last..whole.start()], &mut masked, &mut slots);
            slots.push(Some(self.media(&caps)));
            masked.push(PLACEHOLDER);
            last = whole.end();
        }
        push_segment(&escaped[last..], &mut masked, &mut slots);

        // Emphasis only strips delimiters and wraps text, so placeholders keep
        // their relative order.
        let emphasized = emphasize(&masked);
        let mut slots = slots.into_iter();
        let mut html = String::with_capacity(emphasized.len());
        for c in emphasized.chars() {
            match (c == PLACEHOLDER).then(|| slots.next().flatten()).flatten() {
                Some(markup) => html.push_str(&markup),
                None => html.push(c),
            }
        }
        html
    }

    /// Render one `MEDIA` match. Captured values are already escaped.
    fn media(&self, caps: &regex::Captures<'_>) -> String {
        if let (Some(alt), Some(src)) = (caps.get(1), caps.get(2)) {
            return format!(r#"<img src="{}" alt="{}">"#, src.as_str(), alt.as_str());
        }
        let text = caps.get(3).map_or("", |m| m.as_str());
        let href = caps.get(4).map_or("", |m| m.as_str());
        format!(
            r#"<a href="{href}"{}>{}</a>"#,
            self.link_attrs(),
            emphasize(text)
        )
    }

    /// Render a paragraph as `<p>...</p>`.
    ///
    /// Text with no tag look-alike and no inline delimiter is wrapped as-is,
    /// without escaping. A bare `a < b & c` therefore passes through raw while
    /// `a < b & *c*` is escaped.
    pub fn paragraph(&self, text: &str) -> String {
        if needs_transform(text) {
            format!("<p>{}</p>", self.transform(text))
        } else {
            format!("<p>{text}</p>")
        }
    }
}

/// Bold, italic, strikethrough and inline code, in that order.
fn emphasize(text: &str) -> String {
    let html = BOLD.replace_all(text, "<strong>${1}${2}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}${2}</em>");
    let html = STRIKETHROUGH.replace_all(&html, "<del>${1}</del>");
    CODE.replace_all(&html, "<code>${1}</code>").into_owned()
}

fn push_segment(segment: &str, masked: &mut String, slots: &mut Vec<Option<String>>) {
    slots.extend(segment.matches(PLACEHOLDER).map(|_| None));
    masked.push_str(segment);
}

/// Check whether any inline pattern or tag look-alike occurs in `text`.
fn needs_transform(text: &str) -> bool {
    [&TAG_LIKE, &BOLD, &ITALIC, &STRIKETHROUGH, &CODE, &MEDIA]
        .iter()
        .any(|pattern| pattern.is_match(text))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn transform(text: &str) -> String {
        InlineTransformer::new().transform(text)
    }

    fn paragraph(text: &str) -> String {
        InlineTransformer::new().paragraph(text)
    }

    #[test]
    fn test_bold_both_delimiters() {
        assert_eq!(
            transform("**a** and __b__"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn test_bold_requires_same_delimiter() {
        assert_eq!(transform("**a__"), "<em></em>a<em></em>");
    }

    #[test]
    fn test_italic_both_delimiters() {
        assert_eq!(transform("*a* and _b_"), "<em>a</em> and <em>b</em>");
    }

    #[test]
    fn test_bold_runs_before_italic() {
        assert_eq!(
            transform("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(transform("~~gone~~"), "<del>gone</del>");
    }

    #[test]
    fn test_code_span_content_is_escaped() {
        assert_eq!(transform("`<div>`"), "<code>&lt;div&gt;</code>");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            transform("see ![alt text](https://example.com/a.png)"),
            r#"see <img src="https://example.com/a.png" alt="alt text">"#
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            transform("This is a [link](https://example.com)"),
            r#"This is a <a href="https://example.com">link</a>"#
        );
    }

    #[test]
    fn test_safe_link() {
        let inline = InlineTransformer::new().with_safe_links(true);
        assert_eq!(
            inline.transform("[link](https://example.com)"),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">link</a>"#
        );
    }

    #[test]
    fn test_link_target_escaped_once() {
        assert_eq!(
            transform("[q](/search?a=1&b=2)"),
            r#"<a href="/search?a=1&amp;b=2">q</a>"#
        );
    }

    #[test]
    fn test_image_is_not_also_a_link() {
        let html = transform("![a](b.png)");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_link_href_keeps_underscores() {
        assert_eq!(
            transform("[docs](https://x.io/my_page_name)"),
            r#"<a href="https://x.io/my_page_name">docs</a>"#
        );
    }

    #[test]
    fn test_link_href_keeps_asterisks() {
        assert_eq!(transform("[q](/a*b*c)"), r#"<a href="/a*b*c">q</a>"#);
    }

    #[test]
    fn test_image_attributes_keep_underscores() {
        assert_eq!(
            transform("![a_b_c](x_y.png)"),
            r#"<img src="x_y.png" alt="a_b_c">"#
        );
    }

    #[test]
    fn test_paragraph_with_link_and_image_attributes_untouched() {
        assert_eq!(
            paragraph("see [docs](https://x.io/my_page_name) and ![my_logo_x](a_b_c.png)"),
            r#"<p>see <a href="https://x.io/my_page_name">docs</a> and <img src="a_b_c.png" alt="my_logo_x"></p>"#
        );
    }

    #[test]
    fn test_emphasis_around_link() {
        assert_eq!(
            transform("**[a](b_c)** and *x*"),
            r#"<strong><a href="b_c">a</a></strong> and <em>x</em>"#
        );
    }

    #[test]
    fn test_link_text_is_emphasized() {
        assert_eq!(
            transform("[**a**](b)"),
            r#"<a href="b"><strong>a</strong></a>"#
        );
    }

    #[test]
    fn test_literal_placeholder_char_survives() {
        assert_eq!(
            transform("\u{fffc} [a](b) \u{fffc}"),
            "\u{fffc} <a href=\"b\">a</a> \u{fffc}"
        );
    }

    #[test]
    fn test_paragraph_with_tag_is_escaped() {
        assert_eq!(paragraph("This is <b>bold"), "<p>This is &lt;b&gt;bold</p>");
    }

    #[test]
    fn test_plain_paragraph_passes_through_unescaped() {
        assert_eq!(paragraph("a < b & c"), "<p>a < b & c</p>");
    }

    #[test]
    fn test_plain_paragraph_with_delimiter_is_escaped() {
        assert_eq!(paragraph("a < b & *c*"), "<p>a &lt; b &amp; <em>c</em></p>");
    }

    #[test]
    fn test_incomplete_syntax_untouched() {
        assert_eq!(paragraph("This is [an example"), "<p>This is [an example</p>");
        assert_eq!(
            paragraph("This is a ^superscript^"),
            "<p>This is a ^superscript^</p>"
        );
    }

    #[test]
    fn test_quotes_escaped_in_transformed_text() {
        assert_eq!(
            transform(r#"*"it's"*"#),
            "<em>&quot;it&#39;s&quot;</em>"
        );
    }
}
