//! Default HTML templates.
//!
//! Each function appends one block fragment to `out`. Text is escaped here;
//! paragraph content is the exception and arrives pre-rendered from
//! [`InlineTransformer`](crate::InlineTransformer).

use crate::escape::escape_html;

pub(crate) fn heading(level: u8, text: &str, out: &mut String) {
    out.push_str(&format!("<h{level}>{}</h{level}>", escape_html(text)));
}

pub(crate) fn list(ordered: bool, items: &[String], out: &mut String) {
    let tag = if ordered { "ol" } else { "ul" };
    out.push_str(&format!("<{tag}>"));
    for item in items {
        out.push_str("<li>");
        out.push_str(&escape_html(item));
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}

/// One `<p>` per quoted line.
pub(crate) fn blockquote(text: &str, out: &mut String) {
    out.push_str("<blockquote>");
    for line in text.split('\n') {
        out.push_str("<p>");
        out.push_str(&escape_html(line));
        out.push_str("</p>");
    }
    out.push_str("</blockquote>");
}

/// Render table rows. Row 0 is the header, row 1 the delimiter (always
/// skipped), the rest are body rows.
pub(crate) fn table(rows: &[String], out: &mut String) {
    out.push_str("<table><thead><tr>");
    if let Some(header) = rows.first() {
        for cell in split_row(header) {
            out.push_str("<th>");
            out.push_str(&escape_html(cell));
            out.push_str("</th>");
        }
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows.iter().skip(2) {
        out.push_str("<tr>");
        for cell in split_row(row) {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

/// Split a pipe-delimited row into trimmed cells.
///
/// The empty cells produced by the bounding pipes are dropped; empty cells in
/// the middle of the row are kept.
pub(crate) fn split_row(row: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = row.split('|').map(str::trim).collect();
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    cells
}

pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    code_block_open(lang, out);
    out.push_str(&escape_html(content));
    code_block_close(out);
}

pub(crate) fn code_block_open(lang: Option<&str>, out: &mut String) {
    match lang {
        Some(lang) => out.push_str(&format!(
            r#"<pre><code class="language-{}">"#,
            escape_html(lang)
        )),
        None => out.push_str("<pre><code>"),
    }
}

pub(crate) fn code_block_close(out: &mut String) {
    out.push_str("</code></pre>");
}

pub(crate) fn image(src: &str, alt: &str, out: &mut String) {
    out.push_str(&format!(
        r#"<img src="{}" alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    ));
}

/// `attrs` is appended verbatim after the `href` attribute.
pub(crate) fn link(href: &str, text: &str, attrs: &str, out: &mut String) {
    out.push_str(&format!(
        r#"<a href="{}"{attrs}>{}</a>"#,
        escape_html(href),
        escape_html(text)
    ));
}

pub(crate) fn horizontal_rule(out: &mut String) {
    out.push_str("<hr />");
}
