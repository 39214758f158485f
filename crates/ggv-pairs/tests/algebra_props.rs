use ggv_pairs::{CriticalPairTable, PairCategory};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn category() -> impl Strategy<Value = PairCategory> {
    proptest::sample::select(PairCategory::ALL.to_vec())
}

fn table() -> impl Strategy<Value = CriticalPairTable> {
    (
        category(),
        any::<bool>(),
        proptest::collection::vec((0..NAMES.len(), 0..NAMES.len(), 0..4u32), 0..30),
    )
        .prop_map(|(kind, transposed, entries)| {
            let mut table = CriticalPairTable::with_rows(kind, NAMES);
            table.transposed = transposed;
            for (row, column, weight) in entries {
                table.insert(NAMES[row], NAMES[column], weight);
            }
            table
        })
}

proptest! {
    #[test]
    fn prop_transpose_is_involutive(table in table()) {
        let twice = table.transpose().transpose();
        prop_assert_eq!(&twice.pairs, &table.pairs);
        prop_assert_eq!(twice.transposed, table.transposed);
        prop_assert_eq!(twice.kind, table.kind);
    }

    #[test]
    fn prop_transpose_mirrors_every_weight(table in table()) {
        let flipped = table.transpose();
        for row in NAMES {
            for column in NAMES {
                prop_assert_eq!(flipped.weight(column, row), table.weight(row, column));
            }
        }
    }

    #[test]
    fn prop_remove_self_loops_is_idempotent(table in table()) {
        let once = table.remove_self_loops();
        prop_assert!(once.pairs.iter().all(|(row, columns)| !columns.contains_key(row)));
        prop_assert_eq!(once.remove_self_loops(), once);
    }

    #[test]
    fn prop_remove_self_loops_keeps_other_entries(table in table()) {
        let cleaned = table.remove_self_loops();
        for row in NAMES {
            for column in NAMES {
                if row != column {
                    prop_assert_eq!(cleaned.weight(row, column), table.weight(row, column));
                }
            }
        }
    }

    #[test]
    fn prop_get_transposed_always_transposed(table in table()) {
        prop_assert!(table.get_transposed().transposed);
    }

    #[test]
    fn prop_rule_names_survive_algebra(table in table()) {
        prop_assert!(table.transpose().check_rule_names(NAMES).is_ok());
        prop_assert!(table.remove_self_loops().check_rule_names(NAMES).is_ok());
    }
}

#[test]
fn every_category_is_exactly_one_kind() {
    for category in PairCategory::ALL {
        assert!(category.is_dependency() ^ category.is_conflict());
    }
}
