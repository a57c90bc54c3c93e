//! Property-based tests for plans and collections using proptest.

use std::cmp::Ordering;

use proptest::prelude::*;
use standout_criteria::{
    Criteria, Dir, LazyCollection, Number, PredicateExpr, QueryPlan, Record, RecordStream,
    Selectable, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

// Rows carry their source position in "id" so stability can be checked.
fn rows(values: &[(i64, String)]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(id, (n, name))| {
            Record::from_pairs([
                ("id", Value::from(id as i64)),
                ("n", Value::from(*n)),
                ("name", Value::from(name.as_str())),
            ])
        })
        .collect()
}

fn values_strategy() -> impl Strategy<Value = Vec<(i64, String)>> {
    prop::collection::vec((-20i64..20, "[a-c]{0,3}"), 0..60)
}

fn dir_strategy() -> impl Strategy<Value = Dir> {
    prop_oneof![Just(Dir::Asc), Just(Dir::Desc)]
}

const P53: i64 = 1 << 53;

// Integers and floats around 2^53, where f64 stops representing every integer.
fn wide_number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        (-4i64..4).prop_map(|d| Number::I64(P53 + d)),
        (-4i64..4).prop_map(|d| Number::F64((P53 + d) as f64)),
        (-4i64..4).prop_map(|d| Number::F64((P53 + d) as f64 + 0.5)),
        (-4i64..4).prop_map(|d| Number::I64(-P53 + d)),
        (-4i64..4).prop_map(|d| Number::F64((-P53 + d) as f64)),
        any::<i64>().prop_map(Number::I64),
        any::<u64>().prop_map(Number::U64),
        (-1e20f64..1e20).prop_map(Number::F64),
    ]
}

fn id(record: &Record) -> i64 {
    record.get("id").and_then(|v| v.as_number()).map_or(-1, |n| n.to_f64() as i64)
}

fn n(record: &Record) -> i64 {
    record.get("n").and_then(|v| v.as_number()).map_or(0, |n| n.to_f64() as i64)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Empty criteria return every record in source order.
    #[test]
    fn empty_criteria_is_identity(values in values_strategy()) {
        let records = rows(&values);
        let result = QueryPlan::build(&Criteria::new()).unwrap().apply(&records).unwrap();
        prop_assert_eq!(result.into_records(), records);
    }

    /// The result never exceeds the limit nor the records left after the offset.
    #[test]
    fn interval_bounds_result_size(
        values in values_strategy(),
        offset in 0usize..80,
        limit in 0usize..80,
    ) {
        let records = rows(&values);
        let criteria = Criteria::new().offset(offset).limit(limit);
        let result = QueryPlan::build(&criteria).unwrap().apply(&records).unwrap();

        prop_assert_eq!(result.len(), limit.min(records.len().saturating_sub(offset)));
        for (i, record) in result.iter().enumerate() {
            prop_assert_eq!(record, &records[offset + i]);
        }
    }

    /// Filtering keeps exactly the matching records, in source order.
    #[test]
    fn filter_keeps_matches_in_order(values in values_strategy(), threshold in -20i64..20) {
        let records = rows(&values);
        let criteria = Criteria::new().filter(PredicateExpr::gt("n", threshold));
        let result = QueryPlan::build(&criteria).unwrap().apply(&records).unwrap();

        let expected: Vec<Record> = records.iter().filter(|r| n(r) > threshold).cloned().collect();
        prop_assert_eq!(result.into_records(), expected);
    }

    /// Sorting is stable: equal keys keep their source order.
    #[test]
    fn sort_is_stable(values in values_strategy(), dir in dir_strategy()) {
        let records = rows(&values);
        let criteria = Criteria::new().order_by("n", dir);
        let result = QueryPlan::build(&criteria).unwrap().apply(&records).unwrap();

        prop_assert_eq!(result.len(), records.len());
        for pair in result.records().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = match dir {
                Dir::Asc => n(a) <= n(b),
                Dir::Desc => n(a) >= n(b),
            };
            prop_assert!(ordered);
            if n(a) == n(b) {
                prop_assert!(id(a) < id(b));
            }
        }
    }

    /// Running the same plan twice over the same records gives the same result.
    #[test]
    fn execution_is_deterministic(
        values in values_strategy(),
        threshold in -20i64..20,
        dir in dir_strategy(),
        offset in 0usize..10,
    ) {
        let records = rows(&values);
        let criteria = Criteria::new()
            .filter(PredicateExpr::lte("n", threshold))
            .order_by("name", dir)
            .order_desc("n")
            .offset(offset);
        let plan = QueryPlan::build(&criteria).unwrap();

        prop_assert_eq!(plan.apply(&records).unwrap(), plan.apply(&records).unwrap());
    }

    /// Querying a single-pass source and querying a collection's cache agree.
    #[test]
    fn source_and_cache_agree(
        values in values_strategy(),
        threshold in -20i64..20,
        dir in dir_strategy(),
        offset in 0usize..10,
        limit in 0usize..20,
    ) {
        let records = rows(&values);
        let criteria = Criteria::new()
            .filter(PredicateExpr::gte("n", threshold).or(PredicateExpr::starts_with("name", "a")))
            .order_by("n", dir)
            .offset(offset)
            .limit(limit);

        let mut stream = RecordStream::infallible(records.clone().into_iter());
        let source_level = QueryPlan::build(&criteria).unwrap().process(&mut stream).unwrap();

        let collection = LazyCollection::from_source(records);
        let cache_level = collection.matching(&criteria).unwrap();

        prop_assert_eq!(source_level, cache_level);
    }

    /// Number comparison is a consistent, transitive order across representations.
    #[test]
    fn mixed_number_order_is_transitive(
        a in wide_number_strategy(),
        b in wide_number_strategy(),
        c in wide_number_strategy(),
    ) {
        let ab = a.compare(b).unwrap();
        let bc = b.compare(c).unwrap();
        prop_assert_eq!(b.compare(a).unwrap(), ab.reverse());
        if ab != Ordering::Greater && bc != Ordering::Greater {
            prop_assert_ne!(a.compare(c).unwrap(), Ordering::Greater);
        }
        if ab == Ordering::Equal && bc == Ordering::Equal {
            prop_assert_eq!(a.compare(c).unwrap(), Ordering::Equal);
        }
    }

    /// Sorting mixed integer and float keys never fails and yields a sorted result.
    #[test]
    fn mixed_number_keys_sort(
        keys in prop::collection::vec(wide_number_strategy(), 0..80),
        dir in dir_strategy(),
    ) {
        let records: Vec<Record> = keys
            .iter()
            .map(|k| Record::from_pairs([("k", Value::from(*k))]))
            .collect();
        let result = QueryPlan::build(&Criteria::new().order_by("k", dir))
            .unwrap()
            .apply(&records)
            .unwrap();

        prop_assert_eq!(result.len(), records.len());
        for pair in result.records().windows(2) {
            let a = pair[0].get("k").and_then(Value::as_number).unwrap();
            let b = pair[1].get("k").and_then(Value::as_number).unwrap();
            let wrong = match dir {
                Dir::Asc => Ordering::Greater,
                Dir::Desc => Ordering::Less,
            };
            prop_assert_ne!(a.compare(b).unwrap(), wrong);
        }
    }
}
