//! Property tests for entry counting.

use proptest::prelude::*;
use tp_tree::{Dataset, count_entries};

fn dataset(rows: &[(f64, f64)]) -> Dataset {
    Dataset::from_columns(
        "h1",
        [("wallv", rows.iter().map(|r| r.0).collect()), ("pmu", rows.iter().map(|r| r.1).collect())],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn blank_selection_counts_all_rows(rows in prop::collection::vec((0.0..1000.0f64, 0.0..500.0f64), 0..200)) {
        let ds = dataset(&rows);
        prop_assert_eq!(count_entries(&ds, "").unwrap(), rows.len() as u64);
    }

    #[test]
    fn conjunction_never_increases_count(
        rows in prop::collection::vec((0.0..1000.0f64, 0.0..500.0f64), 0..200),
        wall in 0.0..1000.0f64,
        pmu in 0.0..500.0f64,
    ) {
        let ds = dataset(&rows);
        let base = count_entries(&ds, &format!("wallv > {wall}")).unwrap();
        let tighter = count_entries(&ds, &format!("wallv > {wall} && pmu < {pmu}")).unwrap();
        let tightest =
            count_entries(&ds, &format!("wallv > {wall} && pmu < {pmu} && pmu > {}", pmu / 2.0)).unwrap();
        prop_assert!(tighter <= base);
        prop_assert!(tightest <= tighter);
    }
}
