//! Block scanner.
//!
//! Walks the document line by line and groups lines into [`Token`]s. At each
//! non-blank line the detectors are tried in a fixed order and the first match
//! wins:
//!
//! 1. heading
//! 2. horizontal rule
//! 3. list (ordered or unordered)
//! 4. blockquote
//! 5. standalone image or link
//! 6. table
//! 7. fenced code block
//! 8. paragraph (always matches)
//!
//! Multi-line detectors are greedy and never backtrack: a run ends at the first
//! line that does not continue the pattern. Unordered list items continue across
//! `-` and `*` markers.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{fence_language, is_fence};
use crate::token::Token;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("invalid heading regex"));
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("invalid rule regex")
});
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("invalid ordered item regex"));
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").expect("invalid unordered item regex"));
static IMAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!\[([^\]]*)\]\(([^)]+)\)\.?$").expect("invalid image line regex")
});
static LINK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)\.?$").expect("invalid link line regex")
});
static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|.*\|$").expect("invalid table row regex"));

/// What a detector recognised: the tokens it produced and the index of the
/// first line it did not consume.
struct Detected {
    next: usize,
    tokens: Vec<Token>,
}

impl Detected {
    fn one(next: usize, token: Token) -> Self {
        Self {
            next,
            tokens: vec![token],
        }
    }
}

/// A detector looks at the line at `start` and either declines or reports
/// everything it consumed. It is only called on non-blank lines.
type Detector = fn(&[&str], usize) -> Option<Detected>;

const DETECTORS: [(&str, Detector); 7] = [
    ("heading", detect_heading),
    ("horizontal_rule", detect_rule),
    ("list", detect_list),
    ("blockquote", detect_blockquote),
    ("standalone", detect_standalone),
    ("table", detect_table),
    ("code_block", detect_code_block),
];

/// Split a document into block tokens.
///
/// Total: every input produces a token sequence, with paragraphs as the
/// fallback for anything no other detector claims.
///
/// # Examples
///
/// ```
/// use marklet::{Token, scan};
///
/// let tokens = scan("# Title\n\n1. a\n2. b");
/// assert_eq!(tokens, vec![
///     Token::Heading { level: 1, text: "Title".to_owned() },
///     Token::OrderedList { items: vec!["a".to_owned(), "b".to_owned()] },
/// ]);
/// ```
pub fn scan(text: &str) -> Vec<Token> {
    let lines: Vec<&str> = text.lines().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < lines.len() {
        if lines[pos].trim().is_empty() {
            pos += 1;
            continue;
        }

        let detected = DETECTORS
            .iter()
            .find_map(|(name, detect)| {
                let detected = detect(&lines[..], pos)?;
                tracing::trace!(detector = *name, line = pos + 1, "Block detected");
                Some(detected)
            })
            .unwrap_or_else(|| detect_paragraph(&lines[..], pos));

        debug_assert!(detected.next > pos, "detector must consume at least one line");
        pos = detected.next;
        tokens.extend(detected.tokens);
    }

    tokens
}

/// Parse an ATX heading line into its level and text.
pub(crate) fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING.captures(line.trim())?;
    let level = u8::try_from(caps[1].len()).unwrap_or(6);
    let text = caps.get(2).map_or("", |text| text.as_str());
    Some((level, text))
}

fn detect_heading(lines: &[&str], start: usize) -> Option<Detected> {
    let (level, text) = parse_heading(lines[start])?;
    Some(Detected::one(
        start + 1,
        Token::Heading {
            level,
            text: text.to_owned(),
        },
    ))
}

fn detect_rule(lines: &[&str], start: usize) -> Option<Detected> {
    // Leading indentation is significant here, so only the end is trimmed.
    RULE.is_match(lines[start].trim_end())
        .then_some(Detected::one(start + 1, Token::HorizontalRule))
}

fn detect_list(lines: &[&str], start: usize) -> Option<Detected> {
    let first = lines[start].trim();
    let (pattern, ordered) = if ORDERED_ITEM.is_match(first) {
        (&*ORDERED_ITEM, true)
    } else if UNORDERED_ITEM.is_match(first) {
        (&*UNORDERED_ITEM, false)
    } else {
        return None;
    };

    let mut items = Vec::new();
    let mut next = start;
    while let Some(line) = lines.get(next) {
        let Some(caps) = pattern.captures(line.trim()) else {
            break;
        };
        items.push(caps[1].to_owned());
        next += 1;
    }

    let token = if ordered {
        Token::OrderedList { items }
    } else {
        Token::UnorderedList { items }
    };
    Some(Detected::one(next, token))
}

fn detect_blockquote(lines: &[&str], start: usize) -> Option<Detected> {
    let mut quoted = Vec::new();
    let mut next = start;
    while let Some(rest) = lines.get(next).and_then(|line| line.trim().strip_prefix('>')) {
        quoted.push(rest.strip_prefix(' ').unwrap_or(rest));
        next += 1;
    }

    if quoted.is_empty() {
        return None;
    }
    Some(Detected::one(
        next,
        Token::Blockquote {
            text: quoted.join("\n"),
        },
    ))
}

fn detect_standalone(lines: &[&str], start: usize) -> Option<Detected> {
    let line = lines[start].trim();
    if let Some(caps) = IMAGE_LINE.captures(line) {
        return Some(Detected::one(
            start + 1,
            Token::Image {
                alt: caps[1].to_owned(),
                src: caps[2].to_owned(),
            },
        ));
    }
    let caps = LINK_LINE.captures(line)?;
    Some(Detected::one(
        start + 1,
        Token::Link {
            text: caps[1].to_owned(),
            href: caps[2].to_owned(),
        },
    ))
}

fn detect_table(lines: &[&str], start: usize) -> Option<Detected> {
    let header = lines[start].trim();
    if !TABLE_ROW.is_match(header) {
        return None;
    }

    // Continuation rows only need a leading pipe, so a row missing its closing
    // pipe still belongs to the table.
    let mut rows = vec![header.to_owned()];
    let mut next = start + 1;
    while let Some(row) = lines.get(next).map(|line| line.trim()) {
        if !row.starts_with('|') {
            break;
        }
        rows.push(row.to_owned());
        next += 1;
    }

    if rows.len() < 2 {
        tracing::debug!(line = start + 1, "Table without delimiter row, treating as paragraph");
        return None;
    }
    Some(Detected::one(next, Token::Table { rows }))
}

fn detect_code_block(lines: &[&str], start: usize) -> Option<Detected> {
    let opening = lines[start];
    if !is_fence(opening) {
        return None;
    }

    let body = start + 1;
    let closing = lines[body..]
        .iter()
        .position(|line| is_fence(line))
        .map(|offset| body + offset);

    if let Some(end) = closing {
        return Some(Detected::one(
            end + 1,
            Token::CodeBlock {
                language: fence_language(opening),
                lines: lines[body..end].iter().map(|&line| line.to_owned()).collect(),
            },
        ));
    }

    tracing::debug!(
        line = start + 1,
        "Unterminated code fence, emitting remaining lines as paragraphs"
    );
    let tokens = lines[start..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(Token::paragraph)
        .collect();
    Some(Detected {
        next: lines.len(),
        tokens,
    })
}

fn detect_paragraph(lines: &[&str], start: usize) -> Detected {
    Detected::one(start + 1, Token::paragraph(lines[start].trim()))
}
