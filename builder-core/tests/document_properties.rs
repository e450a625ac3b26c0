//! Property tests for document invariants under arbitrary operation sequences.

use builder_core::{
    element_for_drop, geometry, CanvasBounds, Document, ElementKind, ElementPatch, Frame,
    FramePatch, Point, VISIBLE_SLIVER,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(ElementKind, f32, f32),
    Relocate(usize, f32, f32),
    Update(usize, f32, f32),
    Select(usize),
    ClearSelection,
    Delete(usize),
}

fn arb_kind() -> impl Strategy<Value = ElementKind> {
    prop::sample::select(ElementKind::ALL.to_vec())
}

fn arb_coord() -> impl Strategy<Value = f32> {
    prop_oneof![
        -2000.0f32..2000.0f32,
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_kind(), arb_coord(), arb_coord()).prop_map(|(k, x, y)| Op::Create(k, x, y)),
        (any::<usize>(), arb_coord(), arb_coord()).prop_map(|(i, dx, dy)| Op::Relocate(i, dx, dy)),
        (any::<usize>(), arb_coord(), arb_coord()).prop_map(|(i, l, t)| Op::Update(i, l, t)),
        any::<usize>().prop_map(Op::Select),
        Just(Op::ClearSelection),
        any::<usize>().prop_map(Op::Delete),
    ]
}

/// Pick an existing id by index, or a fresh (stale) one when empty.
fn pick(doc: &Document, index: usize) -> builder_core::ElementId {
    if doc.is_empty() {
        builder_core::ElementId::new()
    } else {
        doc.elements()[index % doc.len()].id
    }
}

fn run(ops: &[Op], bounds: Option<CanvasBounds>) -> Document {
    let mut doc = Document::new();
    for op in ops {
        match *op {
            Op::Create(kind, x, y) => {
                doc.create(element_for_drop(kind, Point::new(x, y)));
            }
            Op::Relocate(i, dx, dy) => {
                let id = pick(&doc, i);
                doc.relocate(id, dx, dy, bounds);
            }
            Op::Update(i, left, top) => {
                let id = pick(&doc, i);
                doc.update(id, &ElementPatch::frame(FramePatch::position(left, top)));
            }
            Op::Select(i) => {
                let id = pick(&doc, i);
                doc.select(id);
            }
            Op::ClearSelection => {
                doc.clear_selection();
            }
            Op::Delete(i) => {
                let id = pick(&doc, i);
                doc.delete(id);
            }
        }
    }
    doc
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_any_sequence(
        ops in prop::collection::vec(arb_op(), 0..40),
        measured in any::<bool>(),
    ) {
        let bounds = measured.then(|| CanvasBounds::sized(500.0, 400.0));
        let doc = run(&ops, bounds);

        let mut seen = std::collections::HashSet::new();
        for element in doc.elements() {
            prop_assert!(seen.insert(element.id), "duplicate id {}", element.id);
            prop_assert!(element.frame.left >= 0.0 && element.frame.left.is_finite());
            prop_assert!(element.frame.top >= 0.0 && element.frame.top.is_finite());
        }
        if let Some(selected) = doc.selected_id() {
            prop_assert!(doc.contains(selected), "dangling selection {selected}");
        }
    }

    #[test]
    fn prop_relocation_matches_clamp_formula(
        left in 0.0f32..1000.0f32,
        top in 0.0f32..1000.0f32,
        dx in -1500.0f32..1500.0f32,
        dy in -1500.0f32..1500.0f32,
        width in 20.0f32..2000.0f32,
        height in 20.0f32..2000.0f32,
    ) {
        let frame = Frame::new(left, top, 100.0, 40.0);
        let bounds = CanvasBounds::sized(width, height);
        let patch = geometry::relocate(&frame, dx, dy, Some(bounds));

        let expected_left = (left + dx).max(0.0).min(width - VISIBLE_SLIVER);
        let expected_top = (top + dy).max(0.0).min(height - VISIBLE_SLIVER);
        prop_assert_eq!(patch.left, Some(expected_left));
        prop_assert_eq!(patch.top, Some(expected_top));
    }

    #[test]
    fn prop_select_twice_equals_select_once(
        ops in prop::collection::vec(arb_op(), 1..20),
        index in any::<usize>(),
    ) {
        let mut once = run(&ops, None);
        let id = pick(&once, index);
        once.select(id);

        let mut twice = once.clone();
        twice.select(id);

        prop_assert_eq!(once, twice);
    }
}
