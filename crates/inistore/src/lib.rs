//! # inistore
//!
//! A comment-preserving INI-style configuration store used by the
//! device-control tooling to persist small amounts of named configuration.
//! A file is parsed into an ordered model of sections and entries, values
//! can be looked up and changed through a [`ConfigStore`] handle, and the
//! changes are written back through an atomic temp-file rewrite when the
//! handle is closed.
//!
//! # File format (primer)
//!
//! The format is the classic line-oriented INI dialect:
//!
//! ```text
//! # full-line comment
//! GlobalEntry=before the first header
//! [Drive8]          # header comment
//! Transfer=serial
//! free text line
//! ```
//!
//! Everything before the first `[...]` header belongs to an implicit,
//! unnamed *global* section.  A `#` starts a comment; the comment text
//! (including the whitespace in front of the marker) is carried through the
//! model verbatim, which is what makes a rewrite reproduce an untouched file
//! byte-for-byte.
//!
//! This crate defines:
//!
//! - **`document`** – the in-memory model: ordered sections owning ordered
//!   entries, with the insertion rules that keep rewrites stable.
//!
//! - **`format`** – how text becomes a [`Document`] and back.  A logical-line
//!   reader splits each raw line into content and trailing comment, the
//!   parser assembles sections, and the writer emits the exact inverse.
//!
//! - **`store`** – the [`ConfigStore`] lifecycle: open or create a file,
//!   get/set values, flush changes to disk via `write`-to-temp + rename.

// Declare the three top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/format/mod.rs).
pub mod document;
pub mod format;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `inistore::ConfigStore` instead of `inistore::store::ConfigStore`.
pub use document::{Document, Entry, Section};
pub use format::{parse_document, render_document, write_document};
pub use store::{ConfigStore, StoreError};
