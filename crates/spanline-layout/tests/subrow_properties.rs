//! Property checks for subrow packing.

use proptest::prelude::*;
use spanline_core::{ItemDefinition, Range, Span};
use spanline_layout::group_items_to_subrows;

fn items_strategy() -> impl Strategy<Value = Vec<ItemDefinition>> {
    prop::collection::vec((0u8..3, 0u32..500, 1u32..120), 0..40).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (row, start, len))| {
                let start = f64::from(start);
                ItemDefinition::new(
                    format!("item-{index}"),
                    format!("row-{row}"),
                    Span::new(start, start + f64::from(len)).unwrap(),
                )
            })
            .collect()
    })
}

/// Largest number of items of `row` covering a single instant.
fn max_overlap(items: &[ItemDefinition], row: &str) -> usize {
    let row_items: Vec<_> = items.iter().filter(|i| i.row_id.as_str() == row).collect();
    row_items
        .iter()
        .map(|probe| {
            let t = probe.span.start();
            row_items
                .iter()
                .filter(|i| i.span.start() <= t && t < i.span.end())
                .count()
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn subrows_never_contain_overlaps(items in items_strategy()) {
        let grouped = group_items_to_subrows(&items, None);
        for subrows in grouped.values() {
            for subrow in subrows {
                for pair in subrow.windows(2) {
                    prop_assert!(pair[0].span.end() <= pair[1].span.start());
                }
            }
        }
    }

    #[test]
    fn subrow_count_matches_peak_overlap(items in items_strategy()) {
        let grouped = group_items_to_subrows(&items, None);
        for (row, subrows) in &grouped {
            prop_assert_eq!(subrows.len(), max_overlap(&items, row.as_str()));
        }
    }

    #[test]
    fn every_visible_item_is_placed_once(items in items_strategy()) {
        let range = Range::new(100.0, 400.0).unwrap();
        let grouped = group_items_to_subrows(&items, Some(&range));
        let placed: usize = grouped.values().flatten().map(Vec::len).sum();
        let expected = items.iter().filter(|i| range.intersects(&i.span)).count();
        prop_assert_eq!(placed, expected);
    }

    #[test]
    fn packing_is_deterministic(items in items_strategy()) {
        prop_assert_eq!(
            group_items_to_subrows(&items, None),
            group_items_to_subrows(&items, None)
        );
    }
}
