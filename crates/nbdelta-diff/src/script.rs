//! Edit scripts: ordered, gapless opcode lists.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// The kind of a single opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// The source and target ranges hold the same units.
    Equal,
    /// The source range is replaced by the target range.
    Replace,
    /// The source range is removed; the target range is empty.
    Delete,
    /// The target range is inserted; the source range is empty.
    Insert,
}

impl OpKind {
    /// Lowercase name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Equal => "equal",
            OpKind::Replace => "replace",
            OpKind::Delete => "delete",
            OpKind::Insert => "insert",
        }
    }
}

/// One typed range operation: `source[i1..i2)` becomes `target[j1..j2)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opcode {
    pub kind: OpKind,
    pub source: Range<usize>,
    pub target: Range<usize>,
}

impl Opcode {
    pub fn new(kind: OpKind, source: Range<usize>, target: Range<usize>) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    /// How much this opcode grows (positive) or shrinks (negative) the sequence.
    pub fn delta(&self) -> isize {
        self.target_len() as isize - self.source_len() as isize
    }

    /// `(kind, i1, i2, j1, j2)`.
    pub fn as_tuple(&self) -> (OpKind, usize, usize, usize, usize) {
        (
            self.kind,
            self.source.start,
            self.source.end,
            self.target.start,
            self.target.end,
        )
    }
}

/// An ordered edit script transforming a source sequence into a target
/// sequence.
///
/// Invariants, checked by [`EditScript::validate`]:
/// - source ranges partition `[0, source_len)` in order, without gaps;
/// - target ranges partition `[0, target_len)` in order, without gaps;
/// - `equal` opcodes have equal-length ranges, `delete` has an empty target,
///   `insert` has an empty source, `replace` has neither empty.
///
/// The only zero-width opcode allowed is the single `equal` opcode describing
/// two empty sequences.
///
/// Deserialization checks the invariants too, so a decoded script is always
/// valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEditScript")]
pub struct EditScript {
    opcodes: Vec<Opcode>,
    source_len: usize,
    target_len: usize,
}

/// Wire form of [`EditScript`], before validation.
#[derive(Deserialize)]
struct RawEditScript {
    opcodes: Vec<Opcode>,
    source_len: usize,
    target_len: usize,
}

impl TryFrom<RawEditScript> for EditScript {
    type Error = DiffError;

    fn try_from(raw: RawEditScript) -> DiffResult<Self> {
        let script = Self::from_parts(raw.opcodes, raw.source_len, raw.target_len);
        script.validate()?;
        Ok(script)
    }
}

impl EditScript {
    /// Build a script from caller-supplied opcodes, validating the partition
    /// invariants.
    pub fn from_opcodes(opcodes: Vec<Opcode>) -> DiffResult<Self> {
        let source_len = opcodes.last().map_or(0, |op| op.source.end);
        let target_len = opcodes.last().map_or(0, |op| op.target.end);
        let script = Self {
            opcodes,
            source_len,
            target_len,
        };
        script.validate()?;
        Ok(script)
    }

    pub(crate) fn from_parts(opcodes: Vec<Opcode>, source_len: usize, target_len: usize) -> Self {
        Self {
            opcodes,
            source_len,
            target_len,
        }
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Opcode> {
        self.opcodes.iter()
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    /// Length of the source sequence this script was computed from.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Length of the target sequence this script produces.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Returns `true` if the script contains only `equal` opcodes.
    pub fn is_identity(&self) -> bool {
        self.opcodes.iter().all(|op| op.kind == OpKind::Equal)
    }

    /// Total length of all non-`equal` target ranges: the number of target
    /// units that must be recomputed.
    pub fn changed_target_len(&self) -> usize {
        self.opcodes
            .iter()
            .filter(|op| op.kind != OpKind::Equal)
            .map(Opcode::target_len)
            .sum()
    }

    /// Total length of all `equal` ranges: the number of units reused as-is.
    pub fn reused_len(&self) -> usize {
        self.opcodes
            .iter()
            .filter(|op| op.kind == OpKind::Equal)
            .map(Opcode::target_len)
            .sum()
    }

    /// Check the partition invariants.
    pub fn validate(&self) -> DiffResult<()> {
        let invalid = |index: usize, reason: String| DiffError::InvalidScript { index, reason };

        let mut i = 0;
        let mut j = 0;
        for (index, op) in self.opcodes.iter().enumerate() {
            if op.source.start != i || op.target.start != j {
                return Err(invalid(
                    index,
                    format!(
                        "expected ranges to start at ({i}, {j}), got ({}, {})",
                        op.source.start, op.target.start
                    ),
                ));
            }
            if op.source.end < op.source.start || op.target.end < op.target.start {
                return Err(invalid(index, "range end precedes start".into()));
            }

            let (src, tgt) = (op.source_len(), op.target_len());
            let shape_ok = match op.kind {
                OpKind::Equal => src == tgt,
                OpKind::Replace => src > 0 && tgt > 0,
                OpKind::Delete => src > 0 && tgt == 0,
                OpKind::Insert => src == 0 && tgt > 0,
            };
            if !shape_ok {
                return Err(invalid(
                    index,
                    format!("{} opcode with ranges of length {src} and {tgt}", op.kind.name()),
                ));
            }
            if src == 0 && tgt == 0 && self.opcodes.len() > 1 {
                return Err(invalid(index, "zero-width opcode".into()));
            }

            i = op.source.end;
            j = op.target.end;
        }

        if i != self.source_len || j != self.target_len {
            return Err(invalid(
                self.opcodes.len(),
                format!(
                    "ranges cover ({i}, {j}) but sequences have lengths ({}, {})",
                    self.source_len, self.target_len
                ),
            ));
        }
        Ok(())
    }

    /// Reconstruct the target sequence from `source`, taking only the units
    /// of non-`equal` opcodes from `target`.
    ///
    /// Both slices must have the lengths the script was computed for,
    /// otherwise [`DiffError::InputLength`] is returned.
    pub fn apply<T: Clone>(&self, source: &[T], target: &[T]) -> DiffResult<Vec<T>> {
        if source.len() != self.source_len {
            return Err(DiffError::InputLength {
                input: "source",
                expected: self.source_len,
                actual: source.len(),
            });
        }
        if target.len() != self.target_len {
            return Err(DiffError::InputLength {
                input: "target",
                expected: self.target_len,
                actual: target.len(),
            });
        }

        let mut out = Vec::with_capacity(self.target_len);
        for op in &self.opcodes {
            match op.kind {
                OpKind::Equal => out.extend_from_slice(&source[op.source.clone()]),
                _ => out.extend_from_slice(&target[op.target.clone()]),
            }
        }
        Ok(out)
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Opcode;
    type IntoIter = std::slice::Iter<'a, Opcode>;

    fn into_iter(self) -> Self::IntoIter {
        self.opcodes.iter()
    }
}
