//! Ordered sections owning ordered entries.
//!
//! The model keeps everything the parser saw (comments, free-text lines,
//! duplicate names, blank lines) so that serializing an unmodified document
//! reproduces the source file exactly.  Lines the file format cannot express
//! as `name=value` still occupy an [`Entry`] slot (with `name == None`), and
//! that slot's position is significant: comments meant for a following
//! section must stay below any entry inserted later into the current one.

/// One line of a configuration file in parsed form.
///
/// `name == None` means the line carried no `=` sign at all: either free
/// text (the raw content lives in `value`) or a comment-only line (the text
/// lives entirely in `comment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) name: Option<String>,
    pub(crate) value: String,
    pub(crate) comment: String,
}

impl Entry {
    /// An entry parsed from a `name=value` line.  Neither side is trimmed;
    /// exact-match lookup relies on the name being kept verbatim.
    pub(crate) fn named(name: &str, value: &str, comment: String) -> Self {
        Self {
            name: Some(name.to_owned()),
            value: value.to_owned(),
            comment,
        }
    }

    /// A non-conforming line without `=`; the whole content is the value.
    pub(crate) fn free_text(value: String, comment: String) -> Self {
        Self {
            name: None,
            value,
            comment,
        }
    }

    /// A comment-only line.  The slot has no name and no value, so the
    /// writer emits just the comment text.
    pub(crate) fn comment_slot(comment: String) -> Self {
        Self {
            name: None,
            value: String::new(),
            comment,
        }
    }

    /// The entry name, or `None` for free-text and comment slots.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The entry value; empty when the line had none.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The verbatim trailing comment, including its leading whitespace run
    /// and the `#` delimiter; empty when the line had none.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub(crate) fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
    }
}

/// A named `[...]` grouping of entries, or the implicit global section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub(crate) name: Option<String>,
    pub(crate) comment: String,
    pub(crate) entries: Vec<Entry>,
}

impl Section {
    /// The section name; `None` only for the implicit global section.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The verbatim comment attached to the `[...]` header line.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The entries of this section in file order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of entries, counting free-text and comment slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the section holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A whole configuration file in memory.
///
/// Invariant: exactly one section has `name == None` (the global section
/// holding every line before the first `[...]` header) and it is always
/// `sections[0]`.  [`Document::new`] establishes it; nothing removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Creates an empty document containing only the global section.
    pub fn new() -> Self {
        Self {
            sections: vec![Section {
                name: None,
                comment: String::new(),
                entries: Vec::new(),
            }],
        }
    }

    /// The sections in file order; the global section comes first.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Number of sections, counting the global one.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    // ── Insertion ─────────────────────────────────────────────────────────────

    /// Appends a new section after all existing ones and returns its index.
    pub(crate) fn push_section(&mut self, name: String, comment: String) -> usize {
        self.sections.push(Section {
            name: Some(name),
            comment,
            entries: Vec::new(),
        });
        self.sections.len() - 1
    }

    /// Inserts `entry` into the section at `section` and returns the new
    /// entry's index.
    ///
    /// `cursor == None` places the entry at the head of the list, pushing
    /// everything else down; `cursor == Some(i)` places it directly after
    /// index `i`.  Parsing chains the returned index as the next cursor, so
    /// consecutive lines keep their reading order.
    pub(crate) fn insert_entry(
        &mut self,
        section: usize,
        cursor: Option<usize>,
        entry: Entry,
    ) -> usize {
        let at = match cursor {
            Some(index) => index + 1,
            None => 0,
        };
        self.sections[section].entries.insert(at, entry);
        at
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Finds an entry by exact, case-sensitive match.
    ///
    /// `section == None` addresses the global section.  With duplicate
    /// section or entry names the first match in file order wins; free-text
    /// and comment slots never match.
    pub fn find_entry(&self, section: Option<&str>, name: &str) -> Option<&Entry> {
        let section = self
            .sections
            .iter()
            .find(|s| s.name.as_deref() == section)?;
        section
            .entries
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Finds an entry, creating section and entry as needed.
    ///
    /// A missing section is appended after all existing ones with an empty
    /// header comment.  A new entry starts with an empty value and comment
    /// and is inserted *after the last named entry* of the section, never
    /// after trailing comment slots, which usually belong to whatever
    /// section follows.
    pub fn find_or_create_entry(&mut self, section: Option<&str>, name: &str) -> &mut Entry {
        let section_index = match self
            .sections
            .iter()
            .position(|s| s.name.as_deref() == section)
        {
            Some(index) => index,
            None => {
                // The global section always exists, so a miss here carries a name.
                let section_name = section.unwrap_or_default().to_owned();
                self.push_section(section_name, String::new())
            }
        };

        let entries = &self.sections[section_index].entries;
        let entry_index = match entries
            .iter()
            .position(|e| e.name.as_deref() == Some(name))
        {
            Some(index) => index,
            None => {
                let cursor = entries.iter().rposition(|e| e.name.is_some());
                self.insert_entry(
                    section_index,
                    cursor,
                    Entry {
                        name: Some(name.to_owned()),
                        value: String::new(),
                        comment: String::new(),
                    },
                )
            }
        };

        &mut self.sections[section_index].entries[entry_index]
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
