//! The editable page document: elements in paint order plus the selection.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementPatch, Frame};
use crate::geometry::{self, CanvasBounds};
use crate::selection::ZOrderPolicy;
use crate::{BuilderError, BuilderResult};

/// Elements in paint order and the current selection.
///
/// Invariants upheld by every mutator:
/// - element ids are unique;
/// - a set selection names an element that exists;
/// - every frame has `left >= 0` and `top >= 0`.
///
/// Mutators return `true` when the document changed and `false` for a
/// no-op. Ids that are not present are never an error: they may have gone
/// stale between an event being queued and processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDocument")]
pub struct Document {
    /// Paint order: later elements are drawn on top.
    elements: Vec<Element>,
    /// Currently selected element.
    selected_id: Option<ElementId>,
}

/// Wire shape of a document before its invariants are restored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default)]
    selected_id: Option<ElementId>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let mut document = Self {
            elements: raw.elements,
            selected_id: raw.selected_id,
        };
        document.normalize();
        document
    }
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in paint order (back to front).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Check whether an element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Currently selected element ID.
    #[must_use]
    pub const fn selected_id(&self) -> Option<ElementId> {
        self.selected_id
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected(&self) -> Option<&Element> {
        self.selected_id.and_then(|id| self.get(id))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Find the topmost element under a canvas-local point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.frame.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Append an element and select it.
    ///
    /// A colliding id is a caller contract violation; it is refused so ids
    /// stay unique.
    pub fn create(&mut self, mut element: Element) -> bool {
        if self.contains(element.id) {
            tracing::warn!("Refusing to create element with duplicate id {}", element.id);
            return false;
        }
        let Frame {
            left,
            top,
            width,
            height,
        } = element.frame;
        element.frame = Frame::new(left, top, width, height);

        tracing::debug!("Created {} element {}", element.kind, element.id);
        self.selected_id = Some(element.id);
        self.elements.push(element);
        true
    }

    /// Merge a partial update into an element.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.get_mut(id) else {
            tracing::debug!("Ignoring update of missing element {id}");
            return false;
        };
        element.apply(patch)
    }

    /// Move an element by a pointer delta, clamped to the canvas.
    pub fn relocate(
        &mut self,
        id: ElementId,
        dx: f32,
        dy: f32,
        bounds: Option<CanvasBounds>,
    ) -> bool {
        let Some(element) = self.get(id) else {
            tracing::debug!("Ignoring relocation of missing element {id}");
            return false;
        };
        let position = geometry::relocate(&element.frame, dx, dy, bounds);
        self.update(id, &ElementPatch::frame(position))
    }

    /// Select an element, bringing it to the front.
    pub fn select(&mut self, id: ElementId) -> bool {
        self.select_with(id, ZOrderPolicy::default())
    }

    /// Select an element, reordering according to `policy`.
    ///
    /// No-op if the element is already selected or does not exist.
    pub fn select_with(&mut self, id: ElementId, policy: ZOrderPolicy) -> bool {
        if self.selected_id == Some(id) {
            return false;
        }
        if !self.contains(id) {
            tracing::debug!("Ignoring selection of missing element {id}");
            return false;
        }
        self.selected_id = Some(id);
        policy.apply(&mut self.elements, id);
        true
    }

    /// Clear the selection without reordering.
    pub fn clear_selection(&mut self) -> bool {
        self.selected_id.take().is_some()
    }

    /// Remove an element, clearing the selection if it was selected.
    pub fn delete(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        if self.elements.len() == before {
            tracing::debug!("Ignoring deletion of missing element {id}");
            return false;
        }
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        true
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        serde_json::to_string(self).map_err(BuilderError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// Input that breaks the document invariants is repaired: duplicate ids
    /// keep their first occurrence, frames are clamped and a dangling
    /// selection is cleared. Any serde deserialization of [`Document`]
    /// goes through the same repair.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.elements.retain(|e| seen.insert(e.id));
        for element in &mut self.elements {
            let Frame {
                left,
                top,
                width,
                height,
            } = element.frame;
            element.frame = Frame::new(left, top, width, height);
        }
        if self.selected_id.is_some_and(|id| !self.contains(id)) {
            self.selected_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, VisualPatch};
    use crate::geometry::element_for_drop;
    use crate::Point;

    fn dropped(kind: ElementKind, x: f32, y: f32) -> Element {
        element_for_drop(kind, Point::new(x, y))
    }

    fn order(doc: &Document) -> Vec<ElementId> {
        doc.elements().iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_create_appends_and_selects() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        let first = dropped(ElementKind::Text, 200.0, 200.0);
        let second = dropped(ElementKind::Image, 300.0, 300.0);
        let (a, b) = (first.id, second.id);

        assert!(doc.create(first));
        assert!(doc.create(second));

        assert_eq!(order(&doc), vec![a, b]);
        assert_eq!(doc.selected_id(), Some(b));
    }

    #[test]
    fn test_create_duplicate_id_is_refused() {
        let mut doc = Document::new();
        let element = dropped(ElementKind::Button, 150.0, 100.0);
        let duplicate = element.clone();

        assert!(doc.create(element));
        assert!(!doc.create(duplicate));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_create_clamps_negative_frame() {
        let mut doc = Document::new();
        let mut element = dropped(ElementKind::Text, 200.0, 200.0);
        element.frame.left = -30.0;
        element.frame.top = f32::NEG_INFINITY;
        let id = element.id;

        doc.create(element);
        let frame = doc.get(id).expect("created").frame;
        assert!(frame.left.abs() < f32::EPSILON);
        assert!(frame.top.abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_merges_visual_fields() {
        let mut doc = Document::new();
        let element = dropped(ElementKind::Button, 150.0, 100.0);
        let id = element.id;
        doc.create(element);

        let patch = ElementPatch::visual(VisualPatch {
            font_size: Some(22.0),
            ..VisualPatch::default()
        });
        assert!(doc.update(id, &patch));

        let updated = doc.get(id).expect("exists");
        assert!((updated.visual.font_size - 22.0).abs() < f32::EPSILON);
        assert_eq!(updated.visual.background_color, "#4a90e2");
        assert_eq!(updated.content, "Button");
    }

    #[test]
    fn test_stale_id_operations_are_noops() {
        let mut doc = Document::new();
        doc.create(dropped(ElementKind::Heading, 300.0, 100.0));
        let before = doc.clone();
        let stale = ElementId::new();

        assert!(!doc.update(stale, &ElementPatch::content("x")));
        assert!(!doc.relocate(stale, 10.0, 10.0, None));
        assert!(!doc.delete(stale));
        assert!(!doc.select(stale));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_select_brings_to_front_idempotently() {
        let mut doc = Document::new();
        let elements: Vec<_> = ElementKind::ALL
            .iter()
            .map(|&k| dropped(k, 200.0, 200.0))
            .collect();
        let ids: Vec<_> = elements.iter().map(|e| e.id).collect();
        for e in elements {
            doc.create(e);
        }

        assert!(doc.select(ids[1]));
        let once = order(&doc);
        assert_eq!(once, vec![ids[0], ids[2], ids[3], ids[1]]);

        assert!(!doc.select(ids[1]));
        assert_eq!(order(&doc), once);
    }

    #[test]
    fn test_select_with_preserve_keeps_order() {
        let mut doc = Document::new();
        let a = dropped(ElementKind::Text, 200.0, 200.0);
        let b = dropped(ElementKind::Text, 400.0, 200.0);
        let (ida, idb) = (a.id, b.id);
        doc.create(a);
        doc.create(b);

        assert!(doc.select_with(ida, ZOrderPolicy::Preserve));
        assert_eq!(doc.selected_id(), Some(ida));
        assert_eq!(order(&doc), vec![ida, idb]);
    }

    #[test]
    fn test_clear_selection_keeps_order() {
        let mut doc = Document::new();
        let a = dropped(ElementKind::Text, 200.0, 200.0);
        let b = dropped(ElementKind::Text, 400.0, 200.0);
        let (ida, idb) = (a.id, b.id);
        doc.create(a);
        doc.create(b);

        assert!(doc.clear_selection());
        assert!(!doc.clear_selection());
        assert_eq!(doc.selected_id(), None);
        assert_eq!(order(&doc), vec![ida, idb]);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut doc = Document::new();
        let a = dropped(ElementKind::Text, 200.0, 200.0);
        let b = dropped(ElementKind::Image, 400.0, 200.0);
        let (ida, idb) = (a.id, b.id);
        doc.create(a);
        doc.create(b);

        assert!(doc.delete(ida));
        assert_eq!(doc.selected_id(), Some(idb));

        assert!(doc.delete(idb));
        assert_eq!(doc.selected_id(), None);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_relocate_clamps_to_bounds() {
        let mut doc = Document::new();
        let mut element = dropped(ElementKind::Button, 150.0, 100.0);
        element.frame.left = 490.0;
        let id = element.id;
        doc.create(element);

        assert!(doc.relocate(id, 50.0, 0.0, Some(CanvasBounds::sized(500.0, 500.0))));
        let frame = doc.get(id).expect("exists").frame;
        assert!((frame.left - 480.0).abs() < f32::EPSILON);
        assert!((frame.top - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut doc = Document::new();
        let under = dropped(ElementKind::Image, 100.0, 100.0);
        let over = dropped(ElementKind::Button, 100.0, 100.0);
        let (under_id, over_id) = (under.id, over.id);
        doc.create(under);
        doc.create(over);

        assert_eq!(doc.element_at(100.0, 100.0), Some(over_id));
        doc.select(under_id);
        assert_eq!(doc.element_at(100.0, 100.0), Some(under_id));
        assert_eq!(doc.element_at(700.0, 700.0), None);
    }

    #[test]
    fn test_json_roundtrip_and_repair() {
        let mut doc = Document::new();
        doc.create(dropped(ElementKind::Heading, 300.0, 100.0));
        let json = doc.to_json().expect("serialize");
        assert!(json.contains("\"selectedId\""));
        assert_eq!(Document::from_json(&json).expect("parse"), doc);

        let dangling = format!(
            "{{\"elements\":[],\"selectedId\":\"{}\"}}",
            ElementId::new()
        );
        let repaired = Document::from_json(&dangling).expect("parse");
        assert_eq!(repaired.selected_id(), None);
    }

    #[test]
    fn test_plain_serde_deserialize_restores_invariants() {
        let element = dropped(ElementKind::Button, 150.0, 100.0);
        let id = element.id;
        let mut value = serde_json::json!({
            "elements": [element.clone(), element],
            "selectedId": ElementId::new(),
        });
        value["elements"][0]["frame"]["left"] = serde_json::json!(-40.0);

        let doc: Document = serde_json::from_value(value).expect("deserialize");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.selected_id(), None);
        let frame = doc.get(id).expect("first occurrence kept").frame;
        assert!(frame.left.abs() < f32::EPSILON);

        let dangling = format!(
            "{{\"elements\":[],\"selectedId\":\"{}\"}}",
            ElementId::new()
        );
        let doc: Document = serde_json::from_str(&dangling).expect("deserialize");
        assert_eq!(doc.selected_id(), None);
    }
}
