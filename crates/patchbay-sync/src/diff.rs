//! Text patch construction and application.
//!
//! A [`TextPatch`] is a serializable description of the edits transforming
//! one text blob into another, built from a line diff. Applying a patch
//! validates its baseline: `Equal` and `Delete` ops must match the old text
//! exactly, so a patch handed a wrong baseline fails instead of producing
//! silently corrupted output.

use crate::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Kind of a single patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Delete,
    Insert,
}

/// One run of consecutive lines sharing a diff tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOp {
    pub tag: OpTag,
    pub text: String,
}

/// An ordered list of operations reconstructing a new text from an old one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPatch {
    pub ops: Vec<PatchOp>,
}

impl TextPatch {
    /// Compute the patch transforming `old` into `new`.
    pub fn make(old: &str, new: &str) -> Self {
        let diff = TextDiff::from_lines(old, new);
        let mut ops: Vec<PatchOp> = Vec::new();

        for change in diff.iter_all_changes() {
            let tag = match change.tag() {
                ChangeTag::Equal => OpTag::Equal,
                ChangeTag::Delete => OpTag::Delete,
                ChangeTag::Insert => OpTag::Insert,
            };

            // Merge consecutive lines with the same tag into one op
            match ops.last_mut() {
                Some(last) if last.tag == tag => last.text.push_str(change.value()),
                _ => ops.push(PatchOp {
                    tag,
                    text: change.value().to_string(),
                }),
            }
        }

        Self { ops }
    }

    /// Apply the patch to `old`, reconstructing the new text.
    ///
    /// Fails when `old` is not the baseline this patch was computed against.
    pub fn apply(&self, old: &str) -> SyncResult<String> {
        let mut output = String::new();
        let mut cursor = 0usize;

        for op in &self.ops {
            match op.tag {
                OpTag::Equal | OpTag::Delete => {
                    let end = cursor + op.text.len();
                    if old.get(cursor..end) != Some(op.text.as_str()) {
                        return Err(SyncError::PatchApply(format!(
                            "baseline mismatch at byte {}",
                            cursor
                        )));
                    }
                    if op.tag == OpTag::Equal {
                        output.push_str(&op.text);
                    }
                    cursor = end;
                }
                OpTag::Insert => output.push_str(&op.text),
            }
        }

        if cursor != old.len() {
            return Err(SyncError::PatchApply(format!(
                "baseline has {} trailing bytes the patch does not cover",
                old.len() - cursor
            )));
        }

        Ok(output)
    }

    /// True when the patch carries no actual edits.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| op.tag == OpTag::Equal)
    }
}
