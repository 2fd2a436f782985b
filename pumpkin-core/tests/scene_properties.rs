//! Property tests for the scene invariants:
//! - drag positions stay inside the zone
//! - at most one decoration is selected

use pumpkin_core::{DecorationId, DecoratorConfig, DecoratorController, Zone};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(usize, f32, f32),
    Grab(u64, f32, f32),
    Move(f32, f32),
    Release,
    Select(u64),
    Background,
    DoubleClick(u64),
    Key(bool),
}

const TAGS: [&str; 5] = ["skull", "bat", "ghost", "candy-corn", "unknown-thing"];

fn arb_op() -> impl Strategy<Value = Op> {
    let coord = -2000.0f32..2000.0f32;
    prop_oneof![
        (0..TAGS.len(), coord.clone(), coord.clone()).prop_map(|(t, x, y)| Op::Add(t, x, y)),
        (1u64..12, coord.clone(), coord.clone()).prop_map(|(id, x, y)| Op::Grab(id, x, y)),
        (coord.clone(), coord).prop_map(|(x, y)| Op::Move(x, y)),
        Just(Op::Release),
        (1u64..12).prop_map(Op::Select),
        Just(Op::Background),
        (1u64..12).prop_map(Op::DoubleClick),
        any::<bool>().prop_map(Op::Key),
    ]
}

fn apply(c: &mut DecoratorController, op: &Op) {
    match *op {
        Op::Add(t, x, y) => {
            c.add_decoration(TAGS[t], x, y);
        }
        Op::Grab(id, x, y) => {
            let _ = c.begin_drag(DecorationId::from_raw(id), x, y);
        }
        Op::Move(x, y) => {
            c.drag_to(x, y);
        }
        Op::Release => {
            c.end_drag();
        }
        Op::Select(id) => {
            let _ = c.select(DecorationId::from_raw(id));
        }
        Op::Background => c.clear_selection(),
        Op::DoubleClick(id) => {
            let _ = c.delete(DecorationId::from_raw(id));
        }
        Op::Key(delete) => {
            c.handle_key(if delete { "Delete" } else { "x" });
        }
    }
}

proptest! {
    #[test]
    fn prop_dragged_positions_stay_in_zone(
        width in 0.0f32..800.0,
        height in 0.0f32..800.0,
        ops in prop::collection::vec(arb_op(), 0..60),
    ) {
        let mut c = DecoratorController::headless(&DecoratorConfig {
            zone: Zone::new(width, height).with_origin(25.0, 40.0),
            flicker_seed: Some(0),
            ..DecoratorConfig::default()
        });
        let mut dragged = std::collections::HashSet::new();

        for op in &ops {
            apply(&mut c, op);
            if let Op::Move(..) = op {
                for d in c.scene().decorations().filter(|d| d.is_dragging()) {
                    dragged.insert(d.id);
                }
            }
            for d in c.scene().decorations().filter(|d| dragged.contains(&d.id)) {
                prop_assert!(d.position.x >= 0.0 && d.position.x <= (width - 40.0).max(0.0),
                    "x {} outside zone width {}", d.position.x, width);
                prop_assert!(d.position.y >= 0.0 && d.position.y <= (height - 40.0).max(0.0),
                    "y {} outside zone height {}", d.position.y, height);
            }
        }
    }

    #[test]
    fn prop_at_most_one_selected(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut c = DecoratorController::headless(&DecoratorConfig::default());
        for op in &ops {
            apply(&mut c, op);
            let flagged: Vec<_> = c.scene().decorations().filter(|d| d.selected).map(|d| d.id).collect();
            prop_assert!(flagged.len() <= 1, "selected flags: {:?}", flagged);
            prop_assert_eq!(flagged.first().copied(), c.selected());
        }
    }
}
