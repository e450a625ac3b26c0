//! Editor state: the document store wired to gesture input.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::element::{ElementId, ElementPatch, Frame};
use crate::geometry::{self, BoundsProvider, CanvasBounds, Point};
use crate::gesture::{DragSource, GestureClassifier, GestureEvent, GesturePhase, Transition};
use crate::selection::ZOrderPolicy;
use crate::store::DocumentStore;
use crate::{BuilderError, BuilderResult, Document};

/// Device the canvas is previewed at.
///
/// Purely cosmetic: it changes the preview width hint, not the layout of
/// elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Phone-sized preview.
    Mobile,
    /// Tablet-sized preview.
    Tablet,
    /// Full-width preview.
    #[default]
    Desktop,
}

impl DeviceType {
    /// Lowercase device name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }

    /// Nominal preview width, or `None` for full width.
    #[must_use]
    pub const fn preview_width(self) -> Option<f32> {
        match self {
            Self::Mobile => Some(375.0),
            Self::Tablet => Some(768.0),
            Self::Desktop => None,
        }
    }
}

impl FromStr for DeviceType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            "desktop" => Ok(Self::Desktop),
            other => Err(BuilderError::UnknownDevice(other.to_string())),
        }
    }
}

/// Editor configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Initial preview device.
    #[serde(default)]
    pub device: DeviceType,
    /// Paint-order policy applied on selection.
    #[serde(default)]
    pub z_order: ZOrderPolicy,
}

/// The page editor.
///
/// Owns the gesture classifier and routes its intents into a
/// [`DocumentStore`]. Canvas bounds are read from the injected
/// [`BoundsProvider`] each time an intent is applied.
pub struct Editor {
    store: DocumentStore,
    classifier: GestureClassifier,
    bounds: Arc<dyn BoundsProvider>,
    device: DeviceType,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("store", &self.store)
            .field("classifier", &self.classifier)
            .field("bounds", &self.bounds.canvas_bounds())
            .field("device", &self.device)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with default configuration and unmeasured bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), Arc::new(None::<CanvasBounds>))
    }

    /// Create an editor with a configuration and bounds provider.
    #[must_use]
    pub fn with_config(config: EditorConfig, bounds: Arc<dyn BoundsProvider>) -> Self {
        Self {
            store: DocumentStore::with_policy(config.z_order),
            classifier: GestureClassifier::new(),
            bounds,
            device: config.device,
        }
    }

    /// The underlying document store.
    #[must_use]
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Current document snapshot.
    #[must_use]
    pub fn document(&self) -> Arc<Document> {
        self.store.snapshot()
    }

    /// Subscribe to document changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.store.subscribe()
    }

    /// Canvas bounds as currently reported by the provider.
    #[must_use]
    pub fn canvas_bounds(&self) -> Option<CanvasBounds> {
        self.bounds.canvas_bounds()
    }

    /// Current gesture phase.
    #[must_use]
    pub const fn gesture_phase(&self) -> GesturePhase {
        self.classifier.phase()
    }

    /// Feed a gesture event and apply the resulting intent.
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> Transition {
        let transition = self.classifier.handle(event);
        if let Some(intent) = transition.intent {
            self.store.apply(intent, self.canvas_bounds());
        }
        transition
    }

    /// Abandon the gesture in progress, if any.
    pub fn cancel_gesture(&mut self) -> Transition {
        self.handle_gesture(&GestureEvent::Cancel)
    }

    /// A plain click on empty canvas background.
    pub fn click_background(&mut self) -> bool {
        self.classifier
            .background_click()
            .is_some_and(|intent| self.store.apply(intent, self.canvas_bounds()))
    }

    /// A plain click at a client point on the canvas.
    ///
    /// Selects the topmost element under the point, or clears the selection
    /// when the click lands on empty background.
    pub fn click_at(&mut self, client: Point) -> bool {
        let local = self.local_point(client);
        match self.document().element_at(local.x, local.y) {
            Some(id) => self.store.select(id),
            None => self.click_background(),
        }
    }

    /// Select an element directly.
    pub fn select(&mut self, id: ElementId) -> bool {
        self.store.select(id)
    }

    /// Apply a property-form patch to an element.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.update(id, patch)
    }

    /// Apply a single property-form field to an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the value is invalid.
    pub fn update_field(
        &mut self,
        id: ElementId,
        field: &str,
        value: &str,
    ) -> BuilderResult<bool> {
        let patch = ElementPatch::from_field(field, value)?;
        Ok(self.store.update(id, &patch))
    }

    /// Delete an element.
    pub fn delete(&mut self, id: ElementId) -> bool {
        self.store.delete(id)
    }

    /// Current preview device.
    #[must_use]
    pub const fn device(&self) -> DeviceType {
        self.device
    }

    /// Switch the preview device.
    pub fn set_device(&mut self, device: DeviceType) {
        if self.device != device {
            tracing::debug!("Preview device {:?} -> {:?}", self.device, device);
            self.device = device;
        }
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.classifier.is_dragging()
    }

    /// Whether the drag in progress came from the palette.
    #[must_use]
    pub fn is_palette_drag(&self) -> bool {
        self.classifier
            .active()
            .is_some_and(|a| matches!(a.source, DragSource::Palette(_)))
    }

    /// Frame a palette drag would create if dropped at the current pointer.
    #[must_use]
    pub fn drop_preview(&self) -> Option<Frame> {
        let active = self.classifier.active()?;
        match active.source {
            DragSource::Palette(kind) => Some(geometry::placement_for_drop(
                kind,
                self.local_point(active.pointer),
            )),
            DragSource::Element(_) => None,
        }
    }

    /// Visual offset of an element while it is being dragged.
    ///
    /// The offset is only a preview: the document frame changes when the
    /// drag is committed, and an abandoned drag leaves no offset behind.
    #[must_use]
    pub fn drag_offset(&self, id: ElementId) -> Option<Point> {
        self.classifier
            .active()
            .filter(|a| a.source == DragSource::Element(id))
            .map(|a| a.delta)
    }

    fn local_point(&self, client: Point) -> Point {
        match self.canvas_bounds() {
            Some(bounds) => bounds.to_local(client),
            None => Point::new(
                geometry::non_negative(client.x),
                geometry::non_negative(client.y),
            ),
        }
    }
}
