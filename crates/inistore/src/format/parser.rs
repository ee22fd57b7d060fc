//! File parse: a stream of logical lines assembled into a [`Document`].

use std::io::{self, BufRead};

use tracing::debug;

use crate::document::{Document, Entry};
use crate::format::reader::{read_logical_line, Line};

/// Parses a whole configuration file into a [`Document`].
///
/// The global section is created first; every line before the first `[...]`
/// header lands in it.  Malformed input is tolerated, never fatal: a header
/// without `]` takes its name to the end of the line, and a line without `=`
/// becomes a name-less free-text entry.
///
/// Entries are inserted through a cursor that starts at `None` (head of the
/// section), advances to each inserted entry, and resets on every header,
/// so a single pass keeps reading order.
///
/// # Errors
///
/// Propagates the first I/O error from the reader.  The document built up to
/// that point is discarded; there is no partial-parse recovery.
pub fn parse_document<R: BufRead>(reader: &mut R) -> io::Result<Document> {
    let mut document = Document::new();
    let mut section = 0;
    let mut cursor = None;

    loop {
        match read_logical_line(reader)? {
            Line::Eof => break,
            Line::Comment(comment) => {
                cursor = Some(document.insert_entry(section, cursor, Entry::comment_slot(comment)));
            }
            Line::Content { text, comment } if text.starts_with('[') => {
                section = document.push_section(section_name(&text).to_owned(), comment);
                cursor = None;
            }
            Line::Content { text, comment } => {
                let entry = match text.find('=') {
                    Some(eq) => Entry::named(&text[..eq], &text[eq + 1..], comment),
                    None => Entry::free_text(text, comment),
                };
                cursor = Some(document.insert_entry(section, cursor, entry));
            }
        }
    }

    debug!(sections = document.section_count(), "parsed configuration document");
    Ok(document)
}

/// Extracts the name from a `[...]` header line (comment already removed).
///
/// The name runs up to the last `]`; a header without one is tolerated and
/// takes the rest of the line as its name.
fn section_name(text: &str) -> &str {
    let inner = &text[1..];
    match inner.rfind(']') {
        Some(end) => &inner[..end],
        None => inner,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
