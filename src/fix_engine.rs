//!
//! Batch fix engine: turns a chosen set of violations into one
//! conflict-free, offset-safe set of text edits and applies them as a
//! single transaction.
//!
//! All edits are expressed against the original snapshot the violations
//! were computed from. Application is ordered bottom-to-top and
//! right-to-left, so an applied edit never shifts the offsets an
//! unapplied edit depends on. Competing blank-line insertions are
//! deduplicated through boundary keys before anything is applied.

use std::collections::HashSet;

use thiserror::Error;

use crate::document::DocumentIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    #[error("edit range {start}..{end} exceeds snapshot length {len}")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("batch was computed against a snapshot of length {expected}, got {actual}")]
    StaleSnapshot { expected: usize, actual: usize },
    #[error("edit range {start}..{end} does not fall on character boundaries")]
    SplitsCharacter { start: usize, end: usize },
}

/// A logical blank-line insertion point: "insert a blank line immediately
/// before original line N". Two edits from different rules targeting the
/// same boundary are the same fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Boundary(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Replace,
    Delete,
}

/// One text mutation anchored at a byte offset in the original snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub kind: EditKind,
    pub anchor: usize,
    pub length: usize,
    pub new_text: String,
    pub boundary: Option<Boundary>,
}

impl TextEdit {
    pub fn insert(anchor: usize, new_text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            anchor,
            length: 0,
            new_text: new_text.into(),
            boundary: None,
        }
    }

    pub fn replace(anchor: usize, length: usize, new_text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Replace,
            anchor,
            length,
            new_text: new_text.into(),
            boundary: None,
        }
    }

    pub fn delete(anchor: usize, length: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            anchor,
            length,
            new_text: String::new(),
            boundary: None,
        }
    }

    /// Blank-line insertion immediately before 1-based `line`, claiming
    /// the corresponding boundary key. `count` is the number of blank
    /// lines to insert.
    pub fn insert_blank_lines_before(doc: &DocumentIndex, line: usize, count: usize) -> Self {
        let anchor = doc.line_offset(line).unwrap_or(doc.content().len());
        Self {
            kind: EditKind::Insert,
            anchor,
            length: 0,
            new_text: "\n".repeat(count.max(1)),
            boundary: Some(Boundary(line)),
        }
    }

    pub fn end(&self) -> usize {
        self.anchor + self.length
    }
}

/// What a rule proposes for one violation: a single edit, or a pair of
/// independently claimable blank-line insertions surrounding a block.
#[derive(Debug, Clone, PartialEq)]
pub enum FixPlan {
    Single(TextEdit),
    Surround { above: TextEdit, below: TextEdit },
}

impl FixPlan {
    /// The edit a host applies for a lone violation fix. For a surround
    /// plan this is the leading insertion.
    pub fn primary_edit(&self) -> &TextEdit {
        match self {
            FixPlan::Single(edit) => edit,
            FixPlan::Surround { above, .. } => above,
        }
    }

    pub fn into_edits(self) -> Vec<TextEdit> {
        match self {
            FixPlan::Single(edit) => vec![edit],
            FixPlan::Surround { above, below } => vec![above, below],
        }
    }
}

/// Accumulates fix plans, claiming boundary keys and dropping conflicts,
/// then seals them into a [`FixBatch`].
#[derive(Debug, Default)]
pub struct FixBatchBuilder {
    edits: Vec<TextEdit>,
    claimed: HashSet<Boundary>,
}

impl FixBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_plan(&mut self, plan: FixPlan) {
        match plan {
            FixPlan::Single(edit) => self.push_edit(edit),
            FixPlan::Surround { above, below } => {
                let above_claimed = self.is_claimed(&above);
                let below_claimed = self.is_claimed(&below);
                // Both sides already claimed by other violations: the
                // whole surrounding fix is skipped. One side claimed:
                // the other side is still applied.
                if above_claimed && below_claimed {
                    return;
                }
                if !above_claimed {
                    self.push_edit(above);
                }
                if !below_claimed {
                    self.push_edit(below);
                }
            }
        }
    }

    fn is_claimed(&self, edit: &TextEdit) -> bool {
        edit.boundary.is_some_and(|b| self.claimed.contains(&b))
    }

    fn push_edit(&mut self, edit: TextEdit) {
        if let Some(boundary) = edit.boundary
            && !self.claimed.insert(boundary)
        {
            log::debug!("dropping edit for already-claimed boundary before line {}", boundary.0);
            return;
        }
        self.edits.push(edit);
    }

    /// Order, deduplicate, and drop overlapping edits, producing a batch
    /// that is safe to apply against a snapshot of `snapshot_len` bytes.
    pub fn build(self, snapshot_len: usize) -> FixBatch {
        let mut edits = self.edits;
        // Descending anchor, then descending end: bottom-to-top,
        // right-to-left application order.
        edits.sort_by(|a, b| b.anchor.cmp(&a.anchor).then(b.end().cmp(&a.end())));
        edits.dedup_by(|a, b| a.anchor == b.anchor && a.length == b.length && a.new_text == b.new_text);

        let mut accepted: Vec<TextEdit> = Vec::with_capacity(edits.len());
        for edit in edits {
            match accepted.last() {
                // `edit` sits at or before the previously accepted edit;
                // it conflicts when its end reaches past that anchor.
                Some(prev) if edit.end() > prev.anchor => {
                    log::debug!(
                        "dropping edit {}..{} overlapping accepted edit at {}",
                        edit.anchor,
                        edit.end(),
                        prev.anchor
                    );
                }
                _ => accepted.push(edit),
            }
        }

        FixBatch {
            edits: accepted,
            snapshot_len,
        }
    }
}

/// An ordered, validated, non-overlapping set of edits; the atomic unit
/// of application.
#[derive(Debug, Clone, PartialEq)]
pub struct FixBatch {
    /// Ordered by descending anchor.
    edits: Vec<TextEdit>,
    snapshot_len: usize,
}

impl FixBatch {
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply the whole batch against `text`, returning the new text.
    ///
    /// Every edit is validated before anything is built; on any error the
    /// input is left untouched and no partial application is observable.
    pub fn apply_to(&self, text: &str) -> Result<String, FixError> {
        if text.len() != self.snapshot_len {
            return Err(FixError::StaleSnapshot {
                expected: self.snapshot_len,
                actual: text.len(),
            });
        }
        for edit in &self.edits {
            if edit.end() > text.len() {
                return Err(FixError::OutOfBounds {
                    start: edit.anchor,
                    end: edit.end(),
                    len: text.len(),
                });
            }
            if !text.is_char_boundary(edit.anchor) || !text.is_char_boundary(edit.end()) {
                return Err(FixError::SplitsCharacter {
                    start: edit.anchor,
                    end: edit.end(),
                });
            }
        }
        let mut result = text.to_string();
        for edit in &self.edits {
            result.replace_range(edit.anchor..edit.end(), &edit.new_text);
        }
        Ok(result)
    }
}
