//! Property checks for the equivalence checker

use parity_compare::{DivergenceKind, EquivalenceChecker};
use parity_value::{PathSegment, Record, ResultValue, Scalar};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::Bool),
        any::<i64>().prop_map(Scalar::Int),
        any::<f64>().prop_map(Scalar::Float),
        "[a-z]{0,8}".prop_map(Scalar::Text),
        proptest::collection::vec(any::<u8>(), 0..4).prop_map(Scalar::Bytes),
    ]
}

fn value() -> impl Strategy<Value = ResultValue> {
    let leaf = scalar().prop_map(ResultValue::Scalar);
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(ResultValue::Sequence),
            proptest::collection::btree_map("[a-d]", inner.clone(), 0..4)
                .prop_map(ResultValue::Mapping),
            proptest::collection::vec(("[a-d]", inner), 0..4).prop_map(|attrs| {
                let mut record = Record::new("Entry");
                for (name, v) in attrs {
                    record.set(name, v);
                }
                ResultValue::Record(record)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_every_value_is_equivalent_to_itself(v in value()) {
        prop_assert!(EquivalenceChecker::new().compare(&v, &v.clone()).is_equivalent());
    }

    #[test]
    fn prop_scalar_outcome_matches_equality(a in scalar(), b in scalar()) {
        let outcome = EquivalenceChecker::new()
            .compare(&ResultValue::Scalar(a.clone()), &ResultValue::Scalar(b.clone()));
        if a == b {
            prop_assert!(outcome.is_equivalent());
        } else {
            let records = outcome.records();
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(records[0].direct.clone(), Some(ResultValue::Scalar(a)));
            prop_assert_eq!(records[0].indirect.clone(), Some(ResultValue::Scalar(b)));
        }
    }

    #[test]
    fn prop_single_changed_index_is_located(
        items in proptest::collection::vec(any::<i64>(), 1..16),
        pick in any::<prop::sample::Index>(),
    ) {
        let at = pick.index(items.len());
        let mut changed = items.clone();
        changed[at] = changed[at].wrapping_add(1);

        let records = EquivalenceChecker::new()
            .compare(&ResultValue::sequence(items), &ResultValue::sequence(changed))
            .into_records();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].path.segments(), &[PathSegment::Index(at)][..]);
    }

    #[test]
    fn prop_length_mismatch_never_compares_elements(
        a in proptest::collection::vec(any::<i64>(), 0..8),
        b in proptest::collection::vec(any::<i64>(), 0..8),
    ) {
        prop_assume!(a.len() != b.len());
        let records = EquivalenceChecker::new()
            .compare(&ResultValue::sequence(a.clone()), &ResultValue::sequence(b.clone()))
            .into_records();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(
            records[0].kind.clone(),
            DivergenceKind::LengthMismatch { direct: a.len(), indirect: b.len() }
        );
    }
}
