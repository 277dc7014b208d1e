use proptest::prelude::*;
use sqlscope_core::{analyze_context, segment_statements, split_statements};

const FRAGMENTS: &[&str] = &[
    "SELECT ", "FROM ", "WHERE ", "JOIN ", "ON ", "GROUP BY ", "ORDER BY ", "WITH ", "AS ", "(",
    ")", ",", ".", ";", "'", "\"", "$$", "$t$", "--", "\n", "/*", "*/", "users ", "u", "é", "日",
    " ", "'./data/", "1",
];

fn sql_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn analyze_never_panics_on_fragments(sql in sql_soup(), cursor in 0usize..400) {
        let context = analyze_context(&sql, cursor);
        prop_assert!(context.statement_span.end <= sql.len());
        prop_assert!(context.raw_qualified_prefix_length <= sql.len());
    }

    #[test]
    fn analyze_never_panics_on_arbitrary_text(sql in any::<String>(), cursor in any::<usize>()) {
        let _ = analyze_context(&sql, cursor);
    }

    #[test]
    fn analyze_is_idempotent(sql in sql_soup(), cursor in 0usize..400) {
        prop_assert_eq!(analyze_context(&sql, cursor), analyze_context(&sql, cursor));
    }

    #[test]
    fn segment_count_matches_expected(sql in sql_soup(), expected in 0usize..12) {
        let segments = segment_statements(&sql, expected);
        prop_assert_eq!(segments.len(), expected);
    }

    #[test]
    fn split_bounds_are_trimmed_slices(sql in sql_soup()) {
        for statement in split_statements(&sql) {
            prop_assert_eq!(&sql[statement.start_offset..statement.end_offset], statement.text.as_str());
            prop_assert!(!statement.text.is_empty());
        }
    }

    #[test]
    fn plain_statements_round_trip_through_segmenter(
        tables in prop::collection::vec("[a-z]{1,8}", 1..6),
    ) {
        let sql = tables
            .iter()
            .map(|table| format!("SELECT * FROM {table}"))
            .collect::<Vec<_>>()
            .join(";\n");
        let statements = segment_statements(&sql, tables.len());
        for (statement, table) in statements.iter().zip(&tables) {
            prop_assert_eq!(statement, &format!("SELECT * FROM {table}"));
        }
    }
}
