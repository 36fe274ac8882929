//! Fingerprint sequence diff.
//!
//! Uses the `similar` crate to compute the raw operations, then normalizes
//! them so that equal runs are maximal and each changed region is a single
//! opcode.

use std::ops::Range;
use std::time::{Duration, Instant};

use nbdelta_types::Fingerprint;
use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices_deadline, Algorithm, DiffTag};
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::script::{EditScript, OpKind, Opcode};

/// The underlying sequence-matching algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Myers' O(ND) algorithm.
    #[default]
    Myers,
    /// Patience diff, anchored on unique common units.
    Patience,
    /// Classic longest-common-subsequence table.
    Lcs,
}

impl DiffAlgorithm {
    fn to_similar(self) -> Algorithm {
        match self {
            DiffAlgorithm::Myers => Algorithm::Myers,
            DiffAlgorithm::Patience => Algorithm::Patience,
            DiffAlgorithm::Lcs => Algorithm::Lcs,
        }
    }
}

/// Options for [`diff_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Which algorithm to run.
    pub algorithm: DiffAlgorithm,
    /// Optional time budget in milliseconds. Past the deadline the algorithm
    /// returns a valid but possibly non-minimal script.
    pub timeout_ms: Option<u64>,
}

impl DiffOptions {
    pub fn with_algorithm(algorithm: DiffAlgorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }
}

/// Compute the edit script converting `old` into `new` with default options.
pub fn diff(old: &[Fingerprint], new: &[Fingerprint]) -> DiffResult<EditScript> {
    diff_with(old, new, &DiffOptions::default())
}

/// Compute the edit script converting `old` into `new`.
///
/// Only fingerprint equality is consulted. Fails with
/// [`DiffError::MixedAlgorithms`] if the inputs were produced by more than
/// one digest algorithm.
pub fn diff_with(
    old: &[Fingerprint],
    new: &[Fingerprint],
    options: &DiffOptions,
) -> DiffResult<EditScript> {
    check_single_algorithm(old, new)?;

    let deadline = options
        .timeout_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let raw = capture_diff_slices_deadline(options.algorithm.to_similar(), old, new, deadline);

    let opcodes = normalize(raw.iter().map(|op| {
        let (tag, source, target) = op.as_tag_tuple();
        let kind = match tag {
            DiffTag::Equal => OpKind::Equal,
            DiffTag::Delete => OpKind::Delete,
            DiffTag::Insert => OpKind::Insert,
            DiffTag::Replace => OpKind::Replace,
        };
        (kind, source, target)
    }));

    let script = EditScript::from_parts(opcodes, old.len(), new.len());
    debug!(
        algorithm = ?options.algorithm,
        old_len = old.len(),
        new_len = new.len(),
        opcodes = script.len(),
        changed = script.changed_target_len(),
        "computed edit script"
    );
    Ok(script)
}

fn check_single_algorithm(old: &[Fingerprint], new: &[Fingerprint]) -> DiffResult<()> {
    let mut all = old.iter().chain(new);
    let Some(first) = all.next().map(Fingerprint::algorithm) else {
        return Ok(());
    };
    match all.find(|fp| fp.algorithm() != first) {
        Some(other) => Err(DiffError::MixedAlgorithms {
            first,
            second: other.algorithm(),
        }),
        None => Ok(()),
    }
}

/// Merge adjacent equal opcodes, fold adjacent changes into a single opcode
/// of the right kind, and drop zero-width opcodes. Two empty inputs yield a
/// single zero-width `equal`.
fn normalize(raw: impl Iterator<Item = (OpKind, Range<usize>, Range<usize>)>) -> Vec<Opcode> {
    let mut out: Vec<Opcode> = Vec::new();

    for (kind, source, target) in raw {
        if source.is_empty() && target.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if (last.kind == OpKind::Equal) == (kind == OpKind::Equal) => {
                last.source.end = source.end;
                last.target.end = target.end;
                if last.kind != OpKind::Equal {
                    last.kind = change_kind(&last.source, &last.target);
                }
            }
            _ => out.push(Opcode::new(kind, source, target)),
        }
    }

    if out.is_empty() {
        out.push(Opcode::new(OpKind::Equal, 0..0, 0..0));
    }
    out
}

fn change_kind(source: &Range<usize>, target: &Range<usize>) -> OpKind {
    match (source.is_empty(), target.is_empty()) {
        (false, false) => OpKind::Replace,
        (false, true) => OpKind::Delete,
        _ => OpKind::Insert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbdelta_types::{HashAlgorithm, DIGEST_LEN};
    use proptest::prelude::*;

    fn fps(s: &str) -> Vec<Fingerprint> {
        s.bytes()
            .map(|b| Fingerprint::from_digest(HashAlgorithm::Blake3, [b; DIGEST_LEN]))
            .collect()
    }

    fn tuples(script: &EditScript) -> Vec<(OpKind, usize, usize, usize, usize)> {
        script.iter().map(Opcode::as_tuple).collect()
    }

    #[test]
    fn mixed_edit() {
        let script = diff(&fps("qabxcd"), &fps("abycdf")).unwrap();
        script.validate().unwrap();
        assert_eq!(
            tuples(&script),
            vec![
                (OpKind::Delete, 0, 1, 0, 0),
                (OpKind::Equal, 1, 3, 0, 2),
                (OpKind::Replace, 3, 4, 2, 3),
                (OpKind::Equal, 4, 6, 3, 5),
                (OpKind::Insert, 6, 6, 5, 6),
            ]
        );
        assert_eq!(script.changed_target_len(), 2);
    }

    #[test]
    fn empty_to_populated_is_single_insert() {
        let script = diff(&[], &fps("ab")).unwrap();
        assert_eq!(tuples(&script), vec![(OpKind::Insert, 0, 0, 0, 2)]);
    }

    #[test]
    fn populated_to_empty_is_single_delete() {
        let script = diff(&fps("abc"), &[]).unwrap();
        assert_eq!(tuples(&script), vec![(OpKind::Delete, 0, 3, 0, 0)]);
    }

    #[test]
    fn both_empty_is_single_zero_width_equal() {
        let script = diff(&[], &[]).unwrap();
        assert_eq!(tuples(&script), vec![(OpKind::Equal, 0, 0, 0, 0)]);
        script.validate().unwrap();
    }

    #[test]
    fn identical_is_single_equal() {
        let script = diff(&fps("abc"), &fps("abc")).unwrap();
        assert_eq!(tuples(&script), vec![(OpKind::Equal, 0, 3, 0, 3)]);
        assert!(script.is_identity());
    }

    #[test]
    fn completely_different_is_single_replace() {
        let script = diff(&fps("abc"), &fps("xyz")).unwrap();
        assert_eq!(tuples(&script), vec![(OpKind::Replace, 0, 3, 0, 3)]);
    }

    #[test]
    fn deterministic() {
        let a = fps("the quick brown fox");
        let b = fps("the quack brown fix");
        assert_eq!(diff(&a, &b).unwrap(), diff(&a, &b).unwrap());
    }

    #[test]
    fn mixed_algorithms_rejected() {
        let a = vec![Fingerprint::from_digest(HashAlgorithm::Blake3, [1; DIGEST_LEN])];
        let b = vec![Fingerprint::from_digest(HashAlgorithm::Sha256, [1; DIGEST_LEN])];
        assert_eq!(
            diff(&a, &b),
            Err(DiffError::MixedAlgorithms {
                first: HashAlgorithm::Blake3,
                second: HashAlgorithm::Sha256,
            })
        );
    }

    #[test]
    fn normalize_folds_adjacent_changes() {
        let raw = vec![
            (OpKind::Delete, 0..2, 0..0),
            (OpKind::Insert, 2..2, 0..1),
            (OpKind::Equal, 2..3, 1..2),
            (OpKind::Equal, 3..4, 2..3),
            (OpKind::Equal, 4..4, 3..3),
        ];
        let ops = normalize(raw.into_iter());
        assert_eq!(
            ops,
            vec![
                Opcode::new(OpKind::Replace, 0..2, 0..1),
                Opcode::new(OpKind::Equal, 2..4, 1..3),
            ]
        );
    }

    fn arb_seq() -> impl Strategy<Value = String> {
        "[a-e]{0,24}"
    }

    fn arb_algorithm() -> impl Strategy<Value = DiffAlgorithm> {
        prop_oneof![
            Just(DiffAlgorithm::Myers),
            Just(DiffAlgorithm::Patience),
            Just(DiffAlgorithm::Lcs),
        ]
    }

    proptest! {
        #[test]
        fn script_partitions_both_sequences(a in arb_seq(), b in arb_seq(), alg in arb_algorithm()) {
            let (fa, fb) = (fps(&a), fps(&b));
            let script = diff_with(&fa, &fb, &DiffOptions::with_algorithm(alg)).unwrap();
            prop_assert!(script.validate().is_ok());
            prop_assert_eq!(script.source_len(), fa.len());
            prop_assert_eq!(script.target_len(), fb.len());
        }

        #[test]
        fn equal_ranges_really_match(a in arb_seq(), b in arb_seq(), alg in arb_algorithm()) {
            let (fa, fb) = (fps(&a), fps(&b));
            let script = diff_with(&fa, &fb, &DiffOptions::with_algorithm(alg)).unwrap();
            for op in script.iter().filter(|op| op.kind == OpKind::Equal) {
                prop_assert_eq!(&fa[op.source.clone()], &fb[op.target.clone()]);
            }
            prop_assert_eq!(script.apply(&fa, &fb).unwrap(), fb);
        }
    }
}
