mod common;

use common::{ids, mapping, sample_rows};
use mapping_ledger::{
    FilterOperator, FilterPredicate, Gap, MappingColumns, MappingRecord, MappingStatus, PageSlot,
    SortDirection, SortKey, TableQuery,
};
use proptest::prelude::*;

fn all_ids(query: &TableQuery, rows: &[MappingRecord]) -> Vec<String> {
    ids(query.evaluate(rows, &MappingColumns, 1_000).items.iter().copied())
}

#[test]
fn filters_fold_case_and_replace_by_column() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.apply_filter(FilterPredicate::contains("sourceTable", "CUSTOMER"));
    assert_eq!(
        all_ids(&query, &rows),
        vec!["m-00", "m-02", "m-04", "m-06", "m-08", "m-10"]
    );

    query.apply_filter(FilterPredicate::equals("sourceTable", "Orders"));
    assert_eq!(query.filters().len(), 1);
    assert_eq!(
        all_ids(&query, &rows),
        vec!["m-01", "m-03", "m-05", "m-07", "m-09", "m-11"]
    );
}

#[test]
fn applying_the_same_filter_twice_is_idempotent() {
    let rows = sample_rows();
    let predicate = FilterPredicate::new("targetTable", FilterOperator::StartsWith, "dim_c");
    let mut once = TableQuery::new();
    once.apply_filter(predicate.clone());
    let mut twice = once.clone();
    twice.apply_filter(predicate);
    assert_eq!(once, twice);
    assert_eq!(all_ids(&once, &rows), all_ids(&twice, &rows));
}

#[test]
fn filters_combine_with_and() {
    let rows = sample_rows();
    let by_table = FilterPredicate::contains("sourceTable", "customer");
    let by_pod = FilterPredicate::equals("pod", "finance");

    let mut both = TableQuery::new();
    both.apply_filter(by_table.clone());
    both.apply_filter(by_pod.clone());
    assert_eq!(all_ids(&both, &rows), vec!["m-00", "m-06"]);

    let mut left = TableQuery::new();
    left.apply_filter(by_table);
    let mut right = TableQuery::new();
    right.apply_filter(by_pod);
    let right_ids = all_ids(&right, &rows);
    let intersection = all_ids(&left, &rows)
        .into_iter()
        .filter(|id| right_ids.contains(id))
        .collect::<Vec<_>>();
    assert_eq!(all_ids(&both, &rows), intersection);
}

#[test]
fn suffix_filter_on_target_column() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.apply_filter(FilterPredicate::new("targetColumn", FilterOperator::EndsWith, "_11"));
    assert_eq!(all_ids(&query, &rows), vec!["m-11"]);
}

#[test]
fn unknown_columns_compare_as_empty_strings() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.apply_filter(FilterPredicate::contains("owner", "x"));
    assert!(all_ids(&query, &rows).is_empty());

    query.apply_filter(FilterPredicate::equals("owner", ""));
    assert_eq!(all_ids(&query, &rows).len(), rows.len());

    let mut sorted = TableQuery::new();
    sorted.set_sort("owner");
    assert_eq!(all_ids(&sorted, &rows), ids(&rows));
}

#[test]
fn clearing_filters_restores_rows() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.apply_filter(FilterPredicate::equals("status", "approved"));
    query.apply_filter(FilterPredicate::contains("sourceTable", "orders"));
    assert!(all_ids(&query, &rows).is_empty());

    query.clear_filter("sourceTable");
    assert_eq!(all_ids(&query, &rows), vec!["m-00", "m-04", "m-08"]);

    query.clear_filter("not-present");
    query.clear_all_filters();
    assert!(query.filters().is_empty());
    assert_eq!(all_ids(&query, &rows).len(), 12);
}

#[test]
fn no_sort_key_preserves_input_order() {
    let mut rows = sample_rows();
    rows.reverse();
    let query = TableQuery::new();
    assert_eq!(all_ids(&query, &rows), ids(&rows));
}

#[test]
fn set_sort_toggles_on_same_column_and_resets_on_another() {
    let mut query = TableQuery::new();
    query.set_sort("sourceColumn");
    assert_eq!(query.sort(), Some(&SortKey::asc("sourceColumn")));
    query.set_sort("sourceColumn");
    assert_eq!(query.sort(), Some(&SortKey::desc("sourceColumn")));
    query.set_sort("status");
    assert_eq!(
        query.sort().map(|key| key.direction),
        Some(SortDirection::Asc)
    );
    query.clear_sort();
    assert!(query.sort().is_none());
}

#[test]
fn sorting_is_stable_within_equal_keys() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.set_sort("status");
    assert_eq!(
        all_ids(&query, &rows),
        vec![
            "m-00", "m-04", "m-08", // approved
            "m-03", "m-07", "m-11", // draft
            "m-01", "m-05", "m-09", // pending
            "m-02", "m-06", "m-10", // rejected
        ]
    );

    query.set_sort("status");
    let descending = all_ids(&query, &rows);
    assert_eq!(&descending[..3], &["m-02", "m-06", "m-10"]);
}

#[test]
fn sort_uses_locale_style_ordering() {
    let rows = vec![
        mapping("b", "A.T.beta", "B.T.x", None),
        mapping("A", "A.T.Alpha", "B.T.x", None),
        mapping("a", "A.T.alpha", "B.T.x", None),
        mapping("z", "A.T.Zulu", "B.T.x", None),
    ];
    let mut query = TableQuery::new();
    query.set_sort("sourceColumn");
    assert_eq!(all_ids(&query, &rows), vec!["a", "A", "b", "z"]);
}

#[test]
fn underscores_sort_before_digits_and_letters() {
    let rows = vec![
        mapping("d", "A.T.col1", "B.T.x", None),
        mapping("l", "A.T.cola", "B.T.x", None),
        mapping("u", "A.T.col_a", "B.T.x", None),
        mapping("p", "A.T.col", "B.T.x", None),
    ];
    let mut query = TableQuery::new();
    query.set_sort("sourceColumn");
    assert_eq!(all_ids(&query, &rows), vec!["p", "u", "d", "l"]);
    query.set_sort("sourceColumn");
    assert_eq!(all_ids(&query, &rows), vec!["l", "d", "u", "p"]);
}

#[test]
fn pages_cover_the_filtered_sorted_rows_exactly_once() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.set_sort_key(SortKey::desc("targetColumn"));
    let expected = all_ids(&query, &rows);

    let first = query.evaluate(&rows, &MappingColumns, 5);
    assert_eq!(first.total_pages(), 3);
    let mut collected = Vec::new();
    for page in 1..=first.total_pages() {
        query.set_page(page);
        let result = query.evaluate(&rows, &MappingColumns, 5);
        assert_eq!(result.current_page(), page);
        collected.extend(ids(result.items.iter().copied()));
    }
    assert_eq!(collected, expected);
}

#[test]
fn page_bounds_are_reported_with_exclusive_end() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.set_page(3);
    let page = query.evaluate(&rows, &MappingColumns, 5);
    assert_eq!(page.total_items(), 12);
    assert_eq!(page.start_index(), 10);
    assert_eq!(page.end_index(), 12);
    assert_eq!(ids(page.items.iter().copied()), vec!["m-10", "m-11"]);
}

#[test]
fn filter_changes_reset_to_first_page_but_sorting_does_not() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.set_page(3);
    assert_eq!(query.evaluate(&rows, &MappingColumns, 4).current_page(), 3);

    query.set_sort("sourceColumn");
    assert_eq!(query.page(), 3);

    query.apply_filter(FilterPredicate::contains("pod", "growth"));
    assert_eq!(query.page(), 1);
    let page = query.evaluate(&rows, &MappingColumns, 4);
    assert_eq!(page.current_page(), 1);
    assert_eq!(ids(page.items.iter().copied()), vec!["m-01", "m-02", "m-04", "m-05"]);

    query.set_page(2);
    query.clear_filter("pod");
    assert_eq!(query.page(), 1);
    query.set_page(2);
    query.clear_all_filters();
    assert_eq!(query.page(), 1);
}

#[test]
fn out_of_range_pages_are_clamped() {
    let rows = sample_rows();
    let mut query = TableQuery::new();
    query.set_page(40);
    let page = query.evaluate(&rows, &MappingColumns, 5);
    assert_eq!(page.current_page(), 3);
    assert_eq!(page.items.len(), 2);

    query.set_page(0);
    assert_eq!(query.page(), 1);
}

#[test]
fn empty_input_yields_empty_page() {
    let rows: Vec<MappingRecord> = Vec::new();
    let page = TableQuery::new().evaluate(&rows, &MappingColumns, 10);
    assert!(page.items.is_empty());
    assert_eq!(page.total_items(), 0);
    assert_eq!(page.total_pages(), 0);
    assert!(page.page_numbers().is_empty());
}

#[test]
fn long_result_sets_compress_the_page_strip() {
    let rows = (0..60)
        .map(|i| mapping(&format!("r{i}"), "A.T.c", "B.T.c", None))
        .collect::<Vec<_>>();
    let mut query = TableQuery::new();
    query.set_page(6);
    let page = query.evaluate(&rows, &MappingColumns, 5);
    assert_eq!(
        page.page_numbers(),
        vec![
            PageSlot::Page(1),
            PageSlot::Ellipsis(Gap::Leading),
            PageSlot::Page(5),
            PageSlot::Page(6),
            PageSlot::Page(7),
            PageSlot::Ellipsis(Gap::Trailing),
            PageSlot::Page(12),
        ]
    );
}

#[test]
fn closures_can_supply_pseudo_columns() {
    let rows = sample_rows();
    let reviewed = |record: &MappingRecord, column: &str| -> String {
        match column {
            "reviewed" => (record.status != MappingStatus::Draft).to_string(),
            _ => String::new(),
        }
    };
    let mut query = TableQuery::new();
    query.apply_filter(FilterPredicate::equals("reviewed", "false"));
    let page = query.evaluate(&rows, &reviewed, 10);
    assert_eq!(ids(page.items.iter().copied()), vec!["m-03", "m-07", "m-11"]);
}

fn arb_rows() -> impl Strategy<Value = Vec<MappingRecord>> {
    let tables = prop_oneof![Just("customer"), Just("Orders"), Just("ledger"), Just("")];
    proptest::collection::vec((tables, 0u8..6, 0usize..4), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (table, col, status))| {
                mapping(
                    &format!("r{idx}"),
                    &format!("SRC.{table}.c{col}"),
                    &format!("TGT.{table}_cz.c{col}"),
                    None,
                )
                .with_status(MappingStatus::ALL[status])
            })
            .collect()
    })
}

fn arb_predicate() -> impl Strategy<Value = FilterPredicate> {
    let operator = prop_oneof![
        Just(FilterOperator::Contains),
        Just(FilterOperator::Equals),
        Just(FilterOperator::StartsWith),
        Just(FilterOperator::EndsWith),
    ];
    let column = prop_oneof![Just("sourceTable"), Just("sourceColumn"), Just("status")];
    (column, operator, "[a-zA-Z0-9]{0,3}")
        .prop_map(|(column, operator, value)| FilterPredicate::new(column, operator, value))
}

proptest! {
    #[test]
    fn reapplying_a_predicate_never_changes_results(rows in arb_rows(), predicate in arb_predicate()) {
        let mut once = TableQuery::new();
        once.apply_filter(predicate.clone());
        let mut twice = once.clone();
        twice.apply_filter(predicate);
        prop_assert_eq!(all_ids(&once, &rows), all_ids(&twice, &rows));
    }

    #[test]
    fn two_predicates_on_different_columns_intersect(
        rows in arb_rows(),
        value_a in "[a-z]{0,2}",
        value_b in "[a-z0-9]{0,2}",
    ) {
        let first = FilterPredicate::contains("sourceTable", value_a);
        let second = FilterPredicate::contains("sourceColumn", value_b);
        let mut both = TableQuery::new();
        both.apply_filter(first.clone());
        both.apply_filter(second.clone());
        let mut only_first = TableQuery::new();
        only_first.apply_filter(first);
        let mut only_second = TableQuery::new();
        only_second.apply_filter(second);
        let second_ids = all_ids(&only_second, &rows);
        let expected = all_ids(&only_first, &rows)
            .into_iter()
            .filter(|id| second_ids.contains(id))
            .collect::<Vec<_>>();
        prop_assert_eq!(all_ids(&both, &rows), expected);
    }

    #[test]
    fn concatenated_pages_reproduce_the_full_result(
        rows in arb_rows(),
        page_size in 1usize..8,
        sort_desc in any::<bool>(),
    ) {
        let mut query = TableQuery::new();
        query.set_sort("sourceTable");
        if sort_desc {
            query.set_sort("sourceTable");
        }
        let expected = all_ids(&query, &rows);
        let total_pages = query.evaluate(&rows, &MappingColumns, page_size).total_pages();
        prop_assert_eq!(total_pages, rows.len().div_ceil(page_size));
        let mut collected = Vec::new();
        for page in 1..=total_pages {
            query.set_page(page);
            collected.extend(ids(query.evaluate(&rows, &MappingColumns, page_size).items.iter().copied()));
        }
        prop_assert_eq!(collected, expected);
    }
}
