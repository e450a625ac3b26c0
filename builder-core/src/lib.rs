//! # Builder Core
//!
//! Core logic for the drag-and-drop page builder.
//! Compiles to WASM so the same engine runs behind the browser canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              builder-core.wasm              │
//! ├─────────────────────────────────────────────┤
//! │  Gesture Classifier  │  Geometry            │
//! │  - Palette drops     │  - Default sizes     │
//! │  - Element drags     │  - Centered drops    │
//! │  - Background clicks │  - Clamped moves     │
//! ├─────────────────────────────────────────────┤
//! │  Document Store      │  Selection Policy    │
//! │  - Paint order       │  - Bring to front    │
//! │  - Subscriptions     │                      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Pointer gestures go through [`GestureClassifier`], which emits
//! [`Intent`]s; the [`Editor`] applies them to a [`DocumentStore`], and
//! subscribers receive each new immutable [`Document`] snapshot.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod palette;
pub mod selection;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::Document;
pub use editor::{DeviceType, Editor, EditorConfig};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, Frame, FramePatch, TextAlign, Visual,
    VisualPatch,
};
pub use error::{BuilderError, BuilderResult};
pub use geometry::{
    element_for_drop, placement_for_drop, BoundsProvider, CanvasBounds, Point, SharedBounds,
    VISIBLE_SLIVER,
};
pub use gesture::{
    ActiveGesture, DragSource, DropZone, GestureClassifier, GestureEvent, GesturePhase, Intent,
    Transition,
};
pub use palette::{PaletteEntry, PALETTE};
pub use selection::ZOrderPolicy;
pub use store::DocumentStore;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
