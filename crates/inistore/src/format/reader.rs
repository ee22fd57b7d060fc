//! Logical-line reader: one raw file line split into content and trailing
//! comment.
//!
//! Splitting happens here, once, so the parser only ever sees trimmed
//! content plus a verbatim comment tail.  The comment tail keeps the
//! whitespace run in front of the `#` marker (and a line's plain trailing
//! whitespace when there is no marker at all), which is what lets the writer
//! reproduce the source line byte-for-byte.

use std::io::{self, BufRead};

/// One logical line of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// No bytes were left in the input.
    Eof,

    /// The raw line began with `#` in column 0: the whole line, verbatim.
    Comment(String),

    /// A content line with its trailing comment split off.  `comment` is
    /// empty when the line had neither a `#` comment nor trailing
    /// whitespace.
    Content { text: String, comment: String },
}

/// Reads the next logical line, accumulating raw bytes until a newline or
/// the end of input is seen.
///
/// The input must be valid UTF-8.
///
/// # Errors
///
/// Returns the underlying I/O error, or [`io::ErrorKind::InvalidData`] for
/// byte sequences that are not UTF-8.
pub fn read_logical_line<R: BufRead>(reader: &mut R) -> io::Result<Line> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(Line::Eof);
    }
    if raw.last() == Some(&b'\n') {
        raw.pop();
    }

    let line = String::from_utf8(raw)
        .map_err(|source| io::Error::new(io::ErrorKind::InvalidData, source))?;

    if line.starts_with('#') {
        return Ok(Line::Comment(line));
    }
    Ok(split_trailing_comment(line))
}

/// Index of the first unescaped `#`, or the line length when none exists.
/// A `#` directly preceded by `\` does not open a comment.
fn comment_start(line: &str) -> usize {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .find(|&i| bytes[i] == b'#' && (i == 0 || bytes[i - 1] != b'\\'))
        .unwrap_or(bytes.len())
}

/// Splits `line` at the comment boundary.
///
/// Starting from the first unescaped `#` (or the end of line), the split
/// point walks backward over space, tab, CR and LF; everything from there on
/// becomes the comment, everything before it the content.  A line whose
/// content collapses to nothing yields empty content with no comment.
fn split_trailing_comment(line: String) -> Line {
    let bytes = line.as_bytes();
    let mut split = comment_start(&line);
    while split > 0 && matches!(bytes[split - 1], b' ' | b'\t' | b'\r' | b'\n') {
        split -= 1;
    }

    if split == 0 {
        // Nothing but whitespace in front of the marker; the whole line is
        // swallowed, comment included.
        return Line::Content {
            text: String::new(),
            comment: String::new(),
        };
    }
    if split == line.len() {
        return Line::Content {
            text: line,
            comment: String::new(),
        };
    }

    let comment = line[split..].to_owned();
    let mut text = line;
    text.truncate(split);
    Line::Content { text, comment }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
