//! Selection and paint-order policy.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};

/// How selecting an element affects paint order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZOrderPolicy {
    /// Move the selected element to the end of the paint list (topmost).
    #[default]
    BringToFront,
    /// Leave paint order untouched.
    Preserve,
}

impl ZOrderPolicy {
    /// Reorder `elements` for a newly selected `id`.
    ///
    /// Other elements keep their relative order. Returns `true` if the order
    /// changed.
    pub fn apply(self, elements: &mut Vec<Element>, id: ElementId) -> bool {
        match self {
            Self::BringToFront => bring_to_front(elements, id),
            Self::Preserve => false,
        }
    }
}

/// Move the element with `id` to the end of the paint list.
///
/// Returns `true` if the order changed; `false` if the element is absent or
/// already topmost.
pub fn bring_to_front(elements: &mut Vec<Element>, id: ElementId) -> bool {
    let Some(pos) = elements.iter().position(|e| e.id == id) else {
        return false;
    };
    if pos + 1 == elements.len() {
        return false;
    }
    let element = elements.remove(pos);
    elements.push(element);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::element_for_drop;
    use crate::{ElementKind, Point};

    fn three() -> Vec<Element> {
        ElementKind::ALL[..3]
            .iter()
            .map(|&kind| element_for_drop(kind, Point::new(100.0, 100.0)))
            .collect()
    }

    fn ids(elements: &[Element]) -> Vec<ElementId> {
        elements.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_bring_to_front_keeps_relative_order() {
        let mut elements = three();
        let [a, b, c] = [elements[0].id, elements[1].id, elements[2].id];

        assert!(bring_to_front(&mut elements, a));
        assert_eq!(ids(&elements), vec![b, c, a]);
    }

    #[test]
    fn test_bring_to_front_topmost_is_noop() {
        let mut elements = three();
        let before = ids(&elements);
        assert!(!bring_to_front(&mut elements, before[2]));
        assert_eq!(ids(&elements), before);
    }

    #[test]
    fn test_bring_to_front_missing_is_noop() {
        let mut elements = three();
        let before = ids(&elements);
        assert!(!bring_to_front(&mut elements, ElementId::new()));
        assert_eq!(ids(&elements), before);
    }

    #[test]
    fn test_preserve_policy_never_reorders() {
        let mut elements = three();
        let before = ids(&elements);
        assert!(!ZOrderPolicy::Preserve.apply(&mut elements, before[0]));
        assert_eq!(ids(&elements), before);
    }
}
