//! Property checks for pan/zoom and drop arithmetic.

use proptest::prelude::*;
use spanline::{
    Direction, ElementId, GridSizeDefinition, PanEndEvent, Range, RowDefinition, RowId, Span,
    Timeline, TimelineOptions, TimelineRect,
};
use spanline_web::{ActiveDrag, DragDelta, DragItemData, DragSnapshot};

const VIEWPORT: ElementId = ElementId(5);

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

fn timeline(direction: Direction, grid: GridSizeDefinition) -> Timeline {
    let options = TimelineOptions::new(Range::new(0.0, 1000.0).unwrap(), |_| {}, |_| {})
        .with_grid_size(grid);
    let mut timeline = Timeline::new(options).unwrap();
    timeline.attach_viewport(VIEWPORT, direction);
    timeline.viewport_resized(VIEWPORT, TimelineRect::new(0.0, 500.0));
    timeline.mount_row(&RowDefinition::new("row"));
    timeline
}

proptest! {
    #[test]
    fn zoom_keeps_value_under_cursor(cursor_px in 1.0f64..499.0, delta_y in -50.0f64..50.0) {
        let timeline = timeline(Direction::Ltr, GridSizeDefinition::None);
        let bag = timeline.bag().unwrap();
        let before = bag.value_from_screen_x(cursor_px);

        let update = timeline
            .pan_end(&PanEndEvent {
                delta_x: 0.0,
                delta_y,
                client_x: Some(cursor_px),
                client_y: None,
            })
            .unwrap();
        let next = update.apply(&timeline.range());
        let fraction = cursor_px / 500.0;
        let after = next.start() + fraction * next.duration();
        prop_assert!(approx_eq(before, after), "{before} vs {after}");
    }

    #[test]
    fn horizontal_pan_preserves_duration(delta_x in -1000.0f64..1000.0) {
        let timeline = timeline(Direction::Ltr, GridSizeDefinition::None);
        let update = timeline
            .pan_end(&PanEndEvent {
                delta_x,
                delta_y: 0.0,
                client_x: None,
                client_y: None,
            })
            .unwrap();
        let next = update.apply(&timeline.range());
        prop_assert!(approx_eq(next.duration(), 1000.0));
    }

    #[test]
    fn dropped_spans_snap_start_and_keep_duration(
        start in 0.0f64..9000.0,
        duration in 0.5f64..500.0,
        delta_px in -300.0f64..300.0,
        rtl in any::<bool>(),
    ) {
        let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
        let grid = 10.0;
        let timeline = timeline(direction, GridSizeDefinition::Fixed(grid));
        let span = Span::new(start, start + duration).unwrap();
        let snapshot = DragSnapshot {
            active: ActiveDrag {
                id: "item".into(),
                data: DragItemData::with_span(span),
            },
            delta: DragDelta { x: delta_px, y: 0.0 },
            over: Some(RowId::new("row")),
            activator_x: 250.0,
            activator_y: 0.0,
        };
        let dropped = timeline.span_from_drag_event(&snapshot);
        prop_assert!(dropped.is_some(), "valid drop of {span:?} discarded");
        let dropped = dropped.unwrap();
        prop_assert!(approx_eq(dropped.duration(), duration));
        let steps = dropped.start() / grid;
        prop_assert!(approx_eq(steps, steps.round()), "{} off grid", dropped.start());
    }
}
