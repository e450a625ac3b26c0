//! Pointer gesture classification.
//!
//! A drag gesture runs `Idle -> Active -> {Committed | Abandoned} -> Idle`.
//! The classifier tracks the single active gesture as plain data (source,
//! origin, accumulated delta) and turns the start/move/end stream into
//! [`Intent`]s for the document:
//!
//! ```text
//! start  element-<id>           -> Select(id)
//! start  sidebar-<kind>         -> (drag feedback only)
//! end    over canvas, palette   -> Insert { kind, drop }
//! end    over canvas, element   -> Relocate { id, accumulated delta }
//! end    elsewhere / cancel     -> (nothing; gesture abandoned)
//! click  on empty background    -> ClearSelection
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementKind};
use crate::geometry::{finite_or_zero, saturate, Point};
use crate::{BuilderError, BuilderResult};

/// Tag prefix of palette drag sources.
pub const PALETTE_TAG_PREFIX: &str = "sidebar-";
/// Tag prefix of canvas element drag sources.
pub const ELEMENT_TAG_PREFIX: &str = "element-";
/// Tag of the canvas drop zone.
pub const CANVAS_TAG: &str = "canvas";

/// What a drag gesture picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DragSource {
    /// A palette template of the given kind.
    Palette(ElementKind),
    /// An element already on the canvas.
    Element(ElementId),
}

impl DragSource {
    /// Tagged identifier, e.g. `sidebar-button` or `element-<uuid>`.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::Palette(kind) => format!("{PALETTE_TAG_PREFIX}{kind}"),
            Self::Element(id) => format!("{ELEMENT_TAG_PREFIX}{id}"),
        }
    }
}

impl std::fmt::Display for DragSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for DragSource {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = s.strip_prefix(PALETTE_TAG_PREFIX) {
            return Ok(Self::Palette(kind.parse()?));
        }
        if let Some(id) = s.strip_prefix(ELEMENT_TAG_PREFIX) {
            return Ok(Self::Element(ElementId::parse(id)?));
        }
        Err(BuilderError::UnrecognizedTag(s.to_string()))
    }
}

impl TryFrom<String> for DragSource {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DragSource> for String {
    fn from(source: DragSource) -> Self {
        source.tag()
    }
}

/// Droppable zones a gesture can end over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZone {
    /// The canvas surface.
    Canvas,
}

impl DropZone {
    /// Resolve a drop zone tag.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnrecognizedTag`] for anything but `canvas`.
    pub fn from_tag(tag: &str) -> BuilderResult<Self> {
        match tag {
            CANVAS_TAG => Ok(Self::Canvas),
            other => Err(BuilderError::UnrecognizedTag(other.to_string())),
        }
    }
}

/// One event of a pointer drag gesture, as reported by the host.
///
/// `pointer` is in client coordinates. `delta` on move and end events is
/// the pointer movement since the previous event of the same gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum GestureEvent {
    /// Drag started.
    Start {
        /// What was picked up.
        source: DragSource,
        /// Pointer position.
        pointer: Point,
    },
    /// Pointer moved while dragging.
    Move {
        /// Pointer position.
        pointer: Point,
        /// Movement since the previous event.
        delta: Point,
    },
    /// Pointer released.
    End {
        /// Pointer position.
        pointer: Point,
        /// Movement since the previous event.
        #[serde(default)]
        delta: Point,
        /// Droppable zone under the pointer, if any.
        #[serde(default)]
        over: Option<DropZone>,
    },
    /// Drag cancelled by the host (e.g. escape key).
    Cancel,
}

/// Phase of the gesture state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture has started and not yet ended.
    Active,
    /// The gesture ended over a valid drop target.
    Committed,
    /// The gesture ended elsewhere or was cancelled.
    Abandoned,
}

/// Document change requested by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    /// Select an element (and bring it to the front).
    Select {
        /// Element to select.
        id: ElementId,
    },
    /// Insert a new element from the palette.
    Insert {
        /// Kind to create.
        kind: ElementKind,
        /// Drop point in client coordinates.
        drop: Point,
    },
    /// Move an existing element.
    Relocate {
        /// Element to move.
        id: ElementId,
        /// Horizontal movement.
        dx: f32,
        /// Vertical movement.
        dy: f32,
    },
    /// Clear the selection.
    ClearSelection,
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveGesture {
    /// What was picked up.
    pub source: DragSource,
    /// Pointer position at start.
    pub origin: Point,
    /// Latest pointer position.
    pub pointer: Point,
    /// Accumulated movement since start.
    pub delta: Point,
}

impl ActiveGesture {
    fn accumulate(&mut self, pointer: Point, delta: Point) {
        self.pointer = pointer;
        self.delta.x = saturate(self.delta.x + finite_or_zero(delta.x));
        self.delta.y = saturate(self.delta.y + finite_or_zero(delta.y));
    }
}

/// Result of feeding one event to the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Phase reached by this event.
    pub phase: GesturePhase,
    /// Document change to apply, if any.
    pub intent: Option<Intent>,
}

impl Transition {
    const fn new(phase: GesturePhase, intent: Option<Intent>) -> Self {
        Self { phase, intent }
    }
}

/// State machine routing pointer gestures to document intents.
///
/// Only one gesture may be active at a time: a second start while active
/// is ignored, as are move and end events while idle.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    active: Option<ActiveGesture>,
}

impl GestureClassifier {
    /// Create an idle classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase: [`GesturePhase::Active`] or [`GesturePhase::Idle`].
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        if self.active.is_some() {
            GesturePhase::Active
        } else {
            GesturePhase::Idle
        }
    }

    /// The gesture in progress, if any.
    #[must_use]
    pub const fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    /// Whether something is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Feed one gesture event.
    pub fn handle(&mut self, event: &GestureEvent) -> Transition {
        match *event {
            GestureEvent::Start { source, pointer } => self.start(source, pointer),
            GestureEvent::Move { pointer, delta } => {
                if let Some(active) = self.active.as_mut() {
                    active.accumulate(pointer, delta);
                    tracing::trace!(
                        "Drag {} at ({}, {})",
                        active.source,
                        active.delta.x,
                        active.delta.y
                    );
                } else {
                    tracing::debug!("Ignoring move without an active gesture");
                }
                Transition::new(self.phase(), None)
            }
            GestureEvent::End {
                pointer,
                delta,
                over,
            } => self.end(pointer, delta, over),
            GestureEvent::Cancel => {
                if self.active.take().is_some() {
                    tracing::debug!("Gesture cancelled");
                    Transition::new(GesturePhase::Abandoned, None)
                } else {
                    Transition::new(GesturePhase::Idle, None)
                }
            }
        }
    }

    /// A plain click on empty canvas background.
    ///
    /// Clears the selection unless a drag gesture is in progress.
    #[must_use]
    pub fn background_click(&self) -> Option<Intent> {
        if self.is_dragging() {
            tracing::debug!("Ignoring background click during a drag");
            None
        } else {
            Some(Intent::ClearSelection)
        }
    }

    fn start(&mut self, source: DragSource, pointer: Point) -> Transition {
        if let Some(active) = &self.active {
            tracing::debug!("Ignoring start of {source}: {} is still active", active.source);
            return Transition::new(GesturePhase::Active, None);
        }
        self.active = Some(ActiveGesture {
            source,
            origin: pointer,
            pointer,
            delta: Point::default(),
        });
        tracing::debug!("Drag started from {source}");

        let intent = match source {
            DragSource::Element(id) => Some(Intent::Select { id }),
            DragSource::Palette(_) => None,
        };
        Transition::new(GesturePhase::Active, intent)
    }

    fn end(&mut self, pointer: Point, delta: Point, over: Option<DropZone>) -> Transition {
        let Some(mut active) = self.active.take() else {
            tracing::debug!("Ignoring end without an active gesture");
            return Transition::new(GesturePhase::Idle, None);
        };
        active.accumulate(pointer, delta);

        if over != Some(DropZone::Canvas) {
            tracing::debug!("Drag from {} abandoned outside the canvas", active.source);
            return Transition::new(GesturePhase::Abandoned, None);
        }

        let intent = match active.source {
            DragSource::Palette(kind) => Intent::Insert {
                kind,
                drop: active.pointer,
            },
            DragSource::Element(id) => Intent::Relocate {
                id,
                dx: active.delta.x,
                dy: active.delta.y,
            },
        };
        tracing::debug!("Drag from {} committed", active.source);
        Transition::new(GesturePhase::Committed, Some(intent))
    }
}
