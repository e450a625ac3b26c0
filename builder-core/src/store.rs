//! Shared document storage with change subscriptions.
//!
//! [`DocumentStore`] holds the current [`Document`] as an immutable snapshot
//! behind a `tokio::sync::watch` channel. Every mutation builds the next
//! document from a private copy and publishes it in one step, so readers
//! only ever see complete states. No-op mutations publish nothing and leave
//! the current snapshot reference-equal.

use std::sync::Arc;

use tokio::sync::watch;

use crate::element::{Element, ElementId, ElementPatch};
use crate::geometry::{self, CanvasBounds};
use crate::gesture::Intent;
use crate::selection::ZOrderPolicy;
use crate::Document;

/// Thread-safe document store shared between the input layer and views.
///
/// # Example
///
/// ```
/// use builder_core::store::DocumentStore;
/// use builder_core::{element_for_drop, ElementKind, Point};
///
/// let store = DocumentStore::new();
/// let mut updates = store.subscribe();
///
/// let element = element_for_drop(ElementKind::Button, Point::new(150.0, 100.0));
/// let id = element.id;
/// assert!(store.create(element));
///
/// assert!(updates.has_changed().unwrap());
/// assert_eq!(updates.borrow_and_update().selected_id(), Some(id));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    tx: Arc<watch::Sender<Arc<Document>>>,
    policy: ZOrderPolicy,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create a store holding an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ZOrderPolicy::default())
    }

    /// Create a store with a specific selection z-order policy.
    #[must_use]
    pub fn with_policy(policy: ZOrderPolicy) -> Self {
        let (tx, _) = watch::channel(Arc::new(Document::new()));
        Self {
            tx: Arc::new(tx),
            policy,
        }
    }

    /// The z-order policy applied on selection.
    #[must_use]
    pub const fn policy(&self) -> ZOrderPolicy {
        self.policy
    }

    /// Current document snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.tx.borrow())
    }

    /// Subscribe to document changes.
    ///
    /// The receiver yields a new snapshot after every effective mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.tx.subscribe()
    }

    /// Apply `f` to a copy of the document and publish it if it changed.
    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Document) -> bool,
    {
        self.tx.send_if_modified(|current| {
            let mut next = Document::clone(current);
            if f(&mut next) {
                *current = Arc::new(next);
                true
            } else {
                false
            }
        })
    }

    /// Append an element and select it.
    pub fn create(&self, element: Element) -> bool {
        self.mutate(|doc| doc.create(element))
    }

    /// Merge a partial update into an element.
    pub fn update(&self, id: ElementId, patch: &ElementPatch) -> bool {
        self.mutate(|doc| doc.update(id, patch))
    }

    /// Move an element by a pointer delta, clamped to `bounds` when known.
    pub fn relocate(
        &self,
        id: ElementId,
        dx: f32,
        dy: f32,
        bounds: Option<CanvasBounds>,
    ) -> bool {
        self.mutate(|doc| doc.relocate(id, dx, dy, bounds))
    }

    /// Select an element.
    pub fn select(&self, id: ElementId) -> bool {
        let policy = self.policy;
        self.mutate(|doc| doc.select_with(id, policy))
    }

    /// Clear the selection.
    pub fn clear_selection(&self) -> bool {
        self.mutate(Document::clear_selection)
    }

    /// Remove an element.
    pub fn delete(&self, id: ElementId) -> bool {
        self.mutate(|doc| doc.delete(id))
    }

    /// Apply a gesture intent.
    ///
    /// Insert drop points are converted from client to canvas-local
    /// coordinates with `bounds`; without bounds they are taken as local.
    pub fn apply(&self, intent: Intent, bounds: Option<CanvasBounds>) -> bool {
        match intent {
            Intent::Select { id } => self.select(id),
            Intent::Insert { kind, drop } => {
                let local = bounds.map_or(drop, |b| b.to_local(drop));
                self.create(geometry::element_for_drop(kind, local))
            }
            Intent::Relocate { id, dx, dy } => self.relocate(id, dx, dy, bounds),
            Intent::ClearSelection => self.clear_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::VisualPatch;
    use crate::{ElementKind, Point};

    fn button_at(x: f32, y: f32) -> Element {
        geometry::element_for_drop(ElementKind::Button, Point::new(x, y))
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = DocumentStore::new();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.snapshot().selected_id(), None);
    }

    #[test]
    fn test_noop_keeps_snapshot_reference() {
        let store = DocumentStore::new();
        store.create(button_at(150.0, 100.0));
        let before = store.snapshot();

        let stale = ElementId::new();
        assert!(!store.update(stale, &ElementPatch::content("gone")));
        assert!(!store.relocate(stale, 5.0, 5.0, None));
        assert!(!store.delete(stale));
        assert!(!store.select(stale));

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let store = DocumentStore::new();
        let element = button_at(150.0, 100.0);
        let id = element.id;
        store.create(element);

        let held = store.snapshot();
        store.update(id, &ElementPatch::content("Buy now"));

        assert_eq!(held.get(id).map(|e| e.content.as_str()), Some("Button"));
        assert_eq!(
            store.snapshot().get(id).map(|e| e.content.clone()),
            Some("Buy now".to_string())
        );
    }

    #[test]
    fn test_subscriber_sees_only_effective_changes() {
        let store = DocumentStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().expect("sender alive"));

        let element = button_at(150.0, 100.0);
        let id = element.id;
        store.create(element);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.select(id);
        assert!(!rx.has_changed().expect("sender alive"));

        store.update(
            id,
            &ElementPatch::visual(VisualPatch {
                padding: Some(4.0),
                ..VisualPatch::default()
            }),
        );
        assert!(rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn test_apply_insert_converts_client_coordinates() {
        let store = DocumentStore::new();
        let bounds = CanvasBounds {
            left: 200.0,
            top: 50.0,
            width: 800.0,
            height: 600.0,
        };
        store.apply(
            Intent::Insert {
                kind: ElementKind::Button,
                drop: Point::new(350.0, 150.0),
            },
            Some(bounds),
        );

        let doc = store.snapshot();
        let created = doc.selected().expect("new element is selected");
        assert!((created.frame.left - 100.0).abs() < f32::EPSILON);
        assert!((created.frame.top - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_insert_without_bounds_treats_drop_as_local() {
        let store = DocumentStore::new();
        assert!(store.apply(
            Intent::Insert {
                kind: ElementKind::Button,
                drop: Point::new(350.0, 150.0),
            },
            None,
        ));

        let doc = store.snapshot();
        let created = doc.selected().expect("new element is selected");
        assert!((created.frame.left - 300.0).abs() < f32::EPSILON);
        assert!((created.frame.top - 130.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clones_share_state() {
        let store = DocumentStore::new();
        let view = store.clone();
        store.create(button_at(150.0, 100.0));
        assert_eq!(view.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_async_subscription_wakes_on_change() {
        let store = DocumentStore::new();
        let mut rx = store.subscribe();

        let writer = store.clone();
        let handle = tokio::spawn(async move {
            writer.create(button_at(150.0, 100.0));
        });

        rx.changed().await.expect("sender alive");
        assert_eq!(rx.borrow().len(), 1);
        handle.await.expect("writer task");
    }
}
