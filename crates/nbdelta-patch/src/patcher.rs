use std::convert::Infallible;

use nbdelta_diff::{EditScript, OpKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoxError, PatchError, PatchResult, Side};
use crate::plan::plan;

/// Options for [`patch_with`] and [`try_patch`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchOptions {
    /// Transform every new unit from scratch and compare against the patched
    /// result. Meant for tests and debugging: it costs a full transform.
    pub verify: bool,
}

impl PatchOptions {
    pub fn verified() -> Self {
        Self { verify: true }
    }
}

/// Counters describing one patch operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchStats {
    /// Units passed to the transform.
    pub transformed: usize,
    /// Units copied from the previous output.
    pub reused: usize,
    /// Net growth of the sequence after the last opcode.
    pub final_offset: isize,
}

/// The patched output and its statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchOutcome<T> {
    pub output: Vec<T>,
    pub stats: PatchStats,
}

/// Patch `old` into the transformed form of `new_raw`.
///
/// `old` must be index-aligned with the source sequence of `script` and
/// `new_raw` with its target sequence; mismatched lengths fail with
/// [`PatchError::Alignment`] before any unit is transformed. The script's
/// own ranges are checked as well, so a malformed script is an error rather
/// than an out-of-bounds slice.
pub fn patch<U, T, F>(script: &EditScript, old: &[T], new_raw: &[U], mut transform: F) -> PatchResult<Vec<T>>
where
    T: Clone,
    F: FnMut(&U) -> T,
{
    let outcome = splice(script, old, new_raw, |unit: &U| Ok::<_, Infallible>(transform(unit)))?;
    Ok(outcome.output)
}

/// Like [`patch`], with options and statistics.
pub fn patch_with<U, T, F>(
    script: &EditScript,
    old: &[T],
    new_raw: &[U],
    mut transform: F,
    options: &PatchOptions,
) -> PatchResult<PatchOutcome<T>>
where
    T: Clone + PartialEq,
    F: FnMut(&U) -> T,
{
    try_patch(script, old, new_raw, |unit: &U| Ok::<_, Infallible>(transform(unit)), options)
}

/// Patch with a fallible transform.
///
/// Stops at the first failing unit and reports its index in `new_raw`.
pub fn try_patch<U, T, E, F>(
    script: &EditScript,
    old: &[T],
    new_raw: &[U],
    mut transform: F,
    options: &PatchOptions,
) -> PatchResult<PatchOutcome<T>>
where
    T: Clone + PartialEq,
    E: Into<BoxError>,
    F: FnMut(&U) -> Result<T, E>,
{
    let outcome = splice(script, old, new_raw, &mut transform)?;
    if options.verify {
        verify(&outcome.output, new_raw, &mut transform)?;
    }
    Ok(outcome)
}

fn splice<U, T, E, F>(
    script: &EditScript,
    old: &[T],
    new_raw: &[U],
    mut transform: F,
) -> PatchResult<PatchOutcome<T>>
where
    T: Clone,
    E: Into<BoxError>,
    F: FnMut(&U) -> Result<T, E>,
{
    check_alignment(script, old, new_raw)?;

    let mut output = Vec::with_capacity(script.target_len());
    let mut stats = PatchStats::default();

    for step in plan(script) {
        debug_assert_eq!(output.len(), step.splice.start);
        let op = &step.opcode;
        if op.kind == OpKind::Equal {
            output.extend_from_slice(&old[op.source.clone()]);
            stats.reused += op.source_len();
        } else {
            for index in op.target.clone() {
                let unit = transform(&new_raw[index])
                    .map_err(|e| PatchError::Transform { index, source: e.into() })?;
                output.push(unit);
            }
            stats.transformed += op.target_len();
        }
        stats.final_offset = step.offset + op.delta();
    }

    debug!(
        opcodes = script.len(),
        transformed = stats.transformed,
        reused = stats.reused,
        offset = stats.final_offset,
        "patched transformed output"
    );
    Ok(PatchOutcome { output, stats })
}

fn check_alignment<T, U>(script: &EditScript, old: &[T], new_raw: &[U]) -> PatchResult<()> {
    script.validate()?;
    if old.len() != script.source_len() {
        return Err(PatchError::Alignment {
            side: Side::Old,
            expected: script.source_len(),
            actual: old.len(),
        });
    }
    if new_raw.len() != script.target_len() {
        return Err(PatchError::Alignment {
            side: Side::New,
            expected: script.target_len(),
            actual: new_raw.len(),
        });
    }
    Ok(())
}

fn verify<U, T, E, F>(patched: &[T], new_raw: &[U], transform: &mut F) -> PatchResult<()>
where
    T: PartialEq,
    E: Into<BoxError>,
    F: FnMut(&U) -> Result<T, E>,
{
    for (index, (unit, got)) in new_raw.iter().zip(patched).enumerate() {
        let expected = transform(unit).map_err(|e| PatchError::Transform { index, source: e.into() })?;
        if expected != *got {
            return Err(PatchError::Verification { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbdelta_diff::{diff, Opcode};
    use nbdelta_hash::ContentHasher;
    use nbdelta_types::Fingerprint;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    fn fps(units: &[String]) -> Vec<Fingerprint> {
        let hasher = ContentHasher::default();
        units.iter().map(|u| hasher.hash(u.as_bytes())).collect()
    }

    fn upper_all(units: &[String]) -> Vec<String> {
        units.iter().map(|u| u.to_uppercase()).collect()
    }

    /// Run `patch_with` with an uppercase transform, recording every unit it
    /// was called on.
    fn run(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
        let script = diff(&fps(a), &fps(b)).unwrap();
        let mut calls = Vec::new();
        let outcome = patch_with(
            &script,
            &upper_all(a),
            b,
            |u: &String| {
                calls.push(u.clone());
                u.to_uppercase()
            },
            &PatchOptions::default(),
        )
        .unwrap();
        (outcome.output, calls)
    }

    #[test]
    fn patches_only_changed_units() {
        let (a, b) = (chars("qabxcd"), chars("abycdf"));
        let (output, calls) = run(&a, &b);
        assert_eq!(output, chars("ABYCDF"));
        assert_eq!(calls, chars("yf"));
    }

    #[test]
    fn empty_old_transforms_everything() {
        let script = diff(&[], &fps(&chars("ab"))).unwrap();
        assert_eq!(script.opcodes(), &[Opcode::new(OpKind::Insert, 0..0, 0..2)]);
        let (output, calls) = run(&[], &chars("ab"));
        assert_eq!(output, chars("AB"));
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn identical_reuses_everything() {
        let a = chars("abc");
        let old = vec!["cached-a".to_string(), "cached-b".into(), "cached-c".into()];
        let script = diff(&fps(&a), &fps(&a)).unwrap();
        assert_eq!(script.len(), 1);
        assert!(script.is_identity());

        let mut calls = 0;
        let outcome = patch_with(
            &script,
            &old,
            &a,
            |u: &String| {
                calls += 1;
                u.to_uppercase()
            },
            &PatchOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.output, old);
        assert_eq!(calls, 0);
        assert_eq!(outcome.stats.reused, 3);
        assert_eq!(outcome.stats.transformed, 0);
    }

    #[test]
    fn stats_track_offset() {
        let (a, b) = (chars("qabxcd"), chars("abycdf"));
        let script = diff(&fps(&a), &fps(&b)).unwrap();
        let outcome =
            patch_with(&script, &upper_all(&a), &b, |u: &String| u.to_uppercase(), &PatchOptions::verified())
                .unwrap();
        assert_eq!(outcome.stats.transformed, 2);
        assert_eq!(outcome.stats.reused, 4);
        assert_eq!(outcome.stats.final_offset, 0);
    }

    #[test]
    fn everything_deleted() {
        let (output, calls) = run(&chars("abc"), &[]);
        assert!(output.is_empty());
        assert!(calls.is_empty());
    }

    #[test]
    fn misaligned_old_output_is_rejected() {
        let (a, b) = (chars("abc"), chars("abd"));
        let script = diff(&fps(&a), &fps(&b)).unwrap();
        let err = patch(&script, &upper_all(&chars("ab")), &b, |u: &String| u.to_uppercase()).unwrap_err();
        assert!(matches!(
            err,
            PatchError::Alignment { side: Side::Old, expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn misaligned_new_units_are_rejected() {
        let (a, b) = (chars("abc"), chars("abd"));
        let script = diff(&fps(&a), &fps(&b)).unwrap();
        let err = patch(&script, &upper_all(&a), &chars("abdz"), |u: &String| u.to_uppercase()).unwrap_err();
        assert!(matches!(
            err,
            PatchError::Alignment { side: Side::New, expected: 3, actual: 4 }
        ));
    }

    #[test]
    fn decoded_script_with_overrunning_range_never_reaches_splice() {
        let json = r#"{
            "opcodes": [{"kind": "equal", "source": {"start": 0, "end": 5}, "target": {"start": 0, "end": 5}}],
            "source_len": 1,
            "target_len": 1
        }"#;
        assert!(serde_json::from_str::<EditScript>(json).is_err());

        // The well-formed one-unit script patches normally.
        let ok = r#"{
            "opcodes": [{"kind": "replace", "source": {"start": 0, "end": 1}, "target": {"start": 0, "end": 1}}],
            "source_len": 1,
            "target_len": 1
        }"#;
        let script: EditScript = serde_json::from_str(ok).unwrap();
        let output = patch(&script, &["A".to_string()], &chars("b"), |u: &String| u.to_uppercase()).unwrap();
        assert_eq!(output, chars("B"));
    }

    #[test]
    fn verification_catches_stale_cache() {
        let (a, b) = (chars("abc"), chars("abd"));
        let script = diff(&fps(&a), &fps(&b)).unwrap();
        // The cached output for `a` is wrong at index 1.
        let stale = vec!["A".to_string(), "?".into(), "C".into()];

        let err = patch_with(&script, &stale, &b, |u: &String| u.to_uppercase(), &PatchOptions::verified())
            .unwrap_err();
        assert!(matches!(err, PatchError::Verification { index: 1 }));

        // Without verification the stale unit is silently reused.
        let output = patch(&script, &stale, &b, |u: &String| u.to_uppercase()).unwrap();
        assert_eq!(output, vec!["A", "?", "D"]);
    }

    #[test]
    fn transform_failure_reports_index() {
        let (a, b) = (chars("ab"), chars("abxy"));
        let script = diff(&fps(&a), &fps(&b)).unwrap();
        let err = try_patch(
            &script,
            &upper_all(&a),
            &b,
            |u: &String| {
                if u == "y" {
                    Err("cannot convert y")
                } else {
                    Ok(u.to_uppercase())
                }
            },
            &PatchOptions::default(),
        )
        .unwrap_err();
        match err {
            PatchError::Transform { index, source } => {
                assert_eq!(index, 3);
                assert_eq!(source.to_string(), "cannot convert y");
            }
            other => panic!("expected Transform, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn patch_equals_full_transform(a in "[a-f]{0,20}", b in "[a-f]{0,20}") {
            let (a, b) = (chars(&a), chars(&b));
            let (output, _) = run(&a, &b);
            prop_assert_eq!(output, upper_all(&b));
        }

        #[test]
        fn transform_calls_are_minimal(a in "[a-f]{0,20}", b in "[a-f]{0,20}") {
            let (a, b) = (chars(&a), chars(&b));
            let script = diff(&fps(&a), &fps(&b)).unwrap();
            let (_, calls) = run(&a, &b);
            prop_assert_eq!(calls.len(), script.changed_target_len());
            if script.reused_len() > 0 {
                prop_assert!(calls.len() < b.len());
            }
        }
    }
}
