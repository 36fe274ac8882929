//! Read-only pre-pass over an edit script.
//!
//! Patching applies opcodes in order because each one shifts the positions
//! of everything after it. [`plan`] computes those shifts up front so every
//! step carries its own absolute position and can be handled independently.

use std::ops::Range;

use nbdelta_diff::{EditScript, OpKind, Opcode};

/// One opcode together with its cumulative offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchStep {
    pub opcode: Opcode,
    /// Growth of the target relative to the source before this opcode.
    pub offset: isize,
    /// The slice of the partially patched sequence that this opcode
    /// replaces, i.e. `[i1 + offset, i2 + offset)`.
    pub splice: Range<usize>,
}

impl PatchStep {
    /// Returns `true` if this step needs the transform.
    pub fn is_change(&self) -> bool {
        self.opcode.kind != OpKind::Equal
    }
}

/// Compute the cumulative offset of every opcode in `script`.
pub fn plan(script: &EditScript) -> Vec<PatchStep> {
    let mut offset = 0isize;
    script
        .iter()
        .map(|op| {
            let start = shift(op.source.start, offset);
            let end = shift(op.source.end, offset);
            let step = PatchStep {
                opcode: op.clone(),
                offset,
                splice: start..end,
            };
            offset += op.delta();
            step
        })
        .collect()
}

fn shift(index: usize, offset: isize) -> usize {
    // Offsets never push a valid script's positions below zero.
    index.saturating_add_signed(offset)
}
