#![forbid(unsafe_code)]

//! Subrow packing: stack overlapping items of a row into visual lanes.
//!
//! # Algorithm
//!
//! Items are stably sorted by span start. Each item, in that order, joins the
//! earliest-created subrow of its row whose last item ends at or before the
//! item's start; if none qualifies a new subrow is opened. This is greedy
//! interval colouring, so the number of subrows in a row equals the largest
//! set of mutually overlapping items in it.
//!
//! # Invariants
//!
//! 1. Two items in the same subrow never overlap.
//! 2. Items within a subrow are ordered by span start.
//! 3. Equal inputs produce identical output (ties keep input order).
//!
//! Complexity is O(n · s) with `s` the subrow count of the busiest row.

use std::collections::BTreeMap;

use spanline_core::{ItemDefinition, Range, RowId};

/// One stacking lane within a row.
pub type Subrow<'a> = Vec<&'a ItemDefinition>;

/// Subrows of every row that has at least one visible item.
pub type SubrowsByRow<'a> = BTreeMap<RowId, Vec<Subrow<'a>>>;

/// Items of every row that has at least one visible item, without stacking.
pub type ItemsByRow<'a> = BTreeMap<RowId, Vec<&'a ItemDefinition>>;

/// Group items into non-overlapping subrows per row.
///
/// When `range` is given, items entirely outside it are skipped.
#[must_use]
pub fn group_items_to_subrows<'a>(
    items: &'a [ItemDefinition],
    range: Option<&Range>,
) -> SubrowsByRow<'a> {
    let mut order: Vec<&ItemDefinition> = visible(items, range).collect();
    order.sort_by(|a, b| a.span.start().total_cmp(&b.span.start()));

    let mut rows: SubrowsByRow<'a> = BTreeMap::new();
    for item in order {
        let subrows = rows.entry(item.row_id.clone()).or_default();
        let slot = subrows.iter_mut().find(|subrow| {
            subrow
                .last()
                .is_none_or(|last| last.span.end() <= item.span.start())
        });
        match slot {
            Some(subrow) => subrow.push(item),
            None => subrows.push(vec![item]),
        }
    }
    rows
}

/// Group items per row without subrow packing, keeping input order.
///
/// Used for background items that may overlap visually.
#[must_use]
pub fn group_items_to_rows<'a>(
    items: &'a [ItemDefinition],
    range: Option<&Range>,
) -> ItemsByRow<'a> {
    let mut rows: ItemsByRow<'a> = BTreeMap::new();
    for item in visible(items, range) {
        rows.entry(item.row_id.clone()).or_default().push(item);
    }
    rows
}

fn visible<'a>(
    items: &'a [ItemDefinition],
    range: Option<&Range>,
) -> impl Iterator<Item = &'a ItemDefinition> {
    items
        .iter()
        .filter(move |item| range.is_none_or(|range| range.intersects(&item.span)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spanline_core::Span;

    fn item(id: &str, row: &str, start: f64, end: f64) -> ItemDefinition {
        ItemDefinition::new(id, row, Span::new(start, end).unwrap())
    }

    fn ids(subrows: &[Subrow<'_>]) -> Vec<Vec<String>> {
        subrows
            .iter()
            .map(|subrow| subrow.iter().map(|item| item.id.to_string()).collect())
            .collect()
    }

    #[test]
    fn overlapping_middle_item_moves_to_second_subrow() {
        let items = vec![
            item("a", "r", 0.0, 100.0),
            item("b", "r", 50.0, 150.0),
            item("c", "r", 200.0, 300.0),
        ];
        let grouped = group_items_to_subrows(&items, None);
        assert_eq!(
            ids(&grouped[&RowId::new("r")]),
            vec![vec!["a", "c"], vec!["b"]]
        );
    }

    #[test]
    fn touching_items_share_a_subrow() {
        let items = vec![item("a", "r", 0.0, 100.0), item("b", "r", 100.0, 200.0)];
        let grouped = group_items_to_subrows(&items, None);
        assert_eq!(ids(&grouped[&RowId::new("r")]), vec![vec!["a", "b"]]);
    }

    #[test]
    fn first_eligible_subrow_wins() {
        // After a/b/c open three lanes, d fits lanes 0 and 1; lane 0 must win.
        let items = vec![
            item("a", "r", 0.0, 10.0),
            item("b", "r", 1.0, 5.0),
            item("c", "r", 2.0, 30.0),
            item("d", "r", 12.0, 14.0),
        ];
        let grouped = group_items_to_subrows(&items, None);
        assert_eq!(
            ids(&grouped[&RowId::new("r")]),
            vec![vec!["a", "d"], vec!["b"], vec!["c"]]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![item("x", "r", 0.0, 10.0), item("y", "r", 0.0, 10.0)];
        let grouped = group_items_to_subrows(&items, None);
        assert_eq!(ids(&grouped[&RowId::new("r")]), vec![vec!["x"], vec!["y"]]);
    }

    #[test]
    fn rows_are_packed_independently() {
        let items = vec![item("a", "r1", 0.0, 10.0), item("b", "r2", 0.0, 10.0)];
        let grouped = group_items_to_subrows(&items, None);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&RowId::new("r1")].len(), 1);
        assert_eq!(grouped[&RowId::new("r2")].len(), 1);
    }

    #[test]
    fn items_outside_range_are_skipped() {
        let items = vec![
            item("before", "r", -100.0, -10.0),
            item("inside", "r", 10.0, 20.0),
            item("clipped", "r", 990.0, 1100.0),
            item("after", "r", 1000.0, 1200.0),
        ];
        let range = Range::new(0.0, 1000.0).unwrap();
        let grouped = group_items_to_subrows(&items, Some(&range));
        assert_eq!(
            ids(&grouped[&RowId::new("r")]),
            vec![vec!["inside", "clipped"]]
        );
    }

    #[test]
    fn flat_grouping_keeps_overlaps_together() {
        let items = vec![
            item("b", "r", 50.0, 150.0),
            item("a", "r", 0.0, 100.0),
            item("z", "other", 0.0, 1.0),
        ];
        let grouped = group_items_to_rows(&items, None);
        let row: Vec<_> = grouped[&RowId::new("r")]
            .iter()
            .map(|item| item.id.to_string())
            .collect();
        assert_eq!(row, vec!["b", "a"]);
        assert_eq!(grouped[&RowId::new("other")].len(), 1);
    }
}
