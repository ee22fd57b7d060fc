//! Serializer: a [`Document`] rendered back to configuration file text.
//!
//! Exact inverse of the parser for everything the parser produces: sections
//! in list order, `[name]comment` headers for all but the global section,
//! `name=valuecomment` per entry, or just `valuecomment` when the entry has
//! no (or an empty) name, which covers free-text lines, blank lines and
//! comment slots alike.

use std::io::{self, Write};

use crate::document::Document;

/// Renders the whole document as configuration file text.
///
/// The file is small by design (the store keeps it entirely in memory), so
/// rendering to one `String` before writing keeps the I/O path to a single
/// `write_all`.
pub fn render_document(document: &Document) -> String {
    let mut out = String::new();

    for (index, section) in document.sections().enumerate() {
        // The leading global section has no header line.
        if index > 0 {
            out.push('[');
            out.push_str(section.name().unwrap_or_default());
            out.push(']');
            out.push_str(section.comment());
            out.push('\n');
        }

        for entry in section.entries() {
            match entry.name() {
                Some(name) if !name.is_empty() => {
                    out.push_str(name);
                    out.push('=');
                    out.push_str(entry.value());
                }
                _ => out.push_str(entry.value()),
            }
            out.push_str(entry.comment());
            out.push('\n');
        }
    }

    out
}

/// Writes the rendered document to `out`.
///
/// # Errors
///
/// Propagates the first I/O error; a partially written target is left as-is.
pub fn write_document<W: Write>(document: &Document, out: &mut W) -> io::Result<()> {
    out.write_all(render_document(document).as_bytes())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
