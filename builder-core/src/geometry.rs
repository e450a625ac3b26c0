//! Placement and relocation geometry.
//!
//! Pure functions: the default size table, centered drop placement, and
//! clamped relocation against the canvas bounds. Canvas bounds come from a
//! [`BoundsProvider`] supplied by the host, queried lazily when a relocation
//! is computed.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementKind, Frame, FramePatch, TextAlign, Visual};

/// Minimum extent of an element kept inside the canvas after a move.
pub const VISIBLE_SLIVER: f32 = 20.0;

/// Replace NaN and infinities with zero.
#[must_use]
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Saturate an overflowed sum at the largest finite magnitude; NaN becomes zero.
#[must_use]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f32::MIN, f32::MAX)
    }
}

/// Clamp a coordinate to the nearest valid value (finite and `>= 0`).
#[must_use]
pub fn non_negative(value: f32) -> f32 {
    finite_or_zero(value).max(0.0)
}

/// A point in canvas or client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rendered pixel bounds of the canvas surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    /// Client x of the canvas left edge.
    pub left: f32,
    /// Client y of the canvas top edge.
    pub top: f32,
    /// Rendered width.
    pub width: f32,
    /// Rendered height.
    pub height: f32,
}

impl CanvasBounds {
    /// Bounds of a canvas rendered at the client origin.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Convert a client point to canvas-local coordinates, clamped at zero.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point {
            x: non_negative(client.x - self.left),
            y: non_negative(client.y - self.top),
        }
    }
}

/// Source of the canvas's current rendered bounds.
///
/// Returns `None` while the canvas has not been measured yet; clamping then
/// degrades to non-negativity only.
pub trait BoundsProvider: Send + Sync {
    /// Current canvas bounds, if known.
    fn canvas_bounds(&self) -> Option<CanvasBounds>;
}

impl BoundsProvider for Option<CanvasBounds> {
    fn canvas_bounds(&self) -> Option<CanvasBounds> {
        *self
    }
}

/// Bounds cell the view layer updates whenever the canvas is measured.
#[derive(Debug, Clone, Default)]
pub struct SharedBounds(Arc<RwLock<Option<CanvasBounds>>>);

impl SharedBounds {
    /// Create an unmeasured cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new measurement (or `None` when the canvas is unmounted).
    pub fn set(&self, bounds: Option<CanvasBounds>) {
        *self
            .0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = bounds;
    }
}

impl BoundsProvider for SharedBounds {
    fn canvas_bounds(&self) -> Option<CanvasBounds> {
        *self
            .0
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Creation-time defaults for one element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    /// Default width.
    pub width: f32,
    /// Default height.
    pub height: f32,
    /// Default content.
    pub content: &'static str,
    /// Default background color.
    pub background: &'static str,
}

/// Default foreground color for new elements.
pub const DEFAULT_COLOR: &str = "#000000";
/// Default font size for new elements.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Default padding for new elements.
pub const DEFAULT_PADDING: f32 = 10.0;

/// Look up the default geometry and content for a kind.
#[must_use]
pub const fn defaults(kind: ElementKind) -> KindDefaults {
    match kind {
        ElementKind::Text => KindDefaults {
            width: 200.0,
            height: 100.0,
            content: "Add your text here",
            background: "transparent",
        },
        ElementKind::Heading => KindDefaults {
            width: 300.0,
            height: 50.0,
            content: "Heading",
            background: "transparent",
        },
        ElementKind::Image => KindDefaults {
            width: 150.0,
            height: 150.0,
            content: "https://via.placeholder.com/150",
            background: "transparent",
        },
        ElementKind::Button => KindDefaults {
            width: 100.0,
            height: 40.0,
            content: "Button",
            background: "#4a90e2",
        },
    }
}

/// Fully defaulted visual style for a kind.
#[must_use]
pub fn default_visual(kind: ElementKind) -> Visual {
    Visual {
        color: DEFAULT_COLOR.to_string(),
        background_color: defaults(kind).background.to_string(),
        font_size: DEFAULT_FONT_SIZE,
        text_align: TextAlign::Left,
        padding: DEFAULT_PADDING,
    }
}

/// Frame for a new element dropped at a canvas-local point.
///
/// The drop point becomes the element's center, clamped so the frame never
/// starts left of or above the canvas origin.
#[must_use]
pub fn placement_for_drop(kind: ElementKind, drop: Point) -> Frame {
    let KindDefaults { width, height, .. } = defaults(kind);
    Frame::new(
        non_negative(drop.x) - width / 2.0,
        non_negative(drop.y) - height / 2.0,
        width,
        height,
    )
}

/// Build a fully defaulted element of `kind` centered on `drop`.
#[must_use]
pub fn element_for_drop(kind: ElementKind, drop: Point) -> Element {
    Element::new(
        kind,
        defaults(kind).content,
        placement_for_drop(kind, drop),
        default_visual(kind),
    )
}

/// Compute the origin of a frame moved by `(dx, dy)`.
///
/// The origin never goes negative. With known bounds it is also kept at
/// most [`VISIBLE_SLIVER`] units short of the canvas's right and bottom
/// edges, so part of the element stays visible.
///
/// Non-finite deltas count as zero. A sum that overflows saturates at
/// `f32::MAX` before clamping, so a huge drag still lands on the far edge.
#[must_use]
pub fn relocate(frame: &Frame, dx: f32, dy: f32, bounds: Option<CanvasBounds>) -> FramePatch {
    let mut left = non_negative(saturate(frame.left + finite_or_zero(dx)));
    let mut top = non_negative(saturate(frame.top + finite_or_zero(dy)));

    if let Some(bounds) = bounds {
        left = non_negative(left.min(bounds.width - VISIBLE_SLIVER));
        top = non_negative(top.min(bounds.height - VISIBLE_SLIVER));
    }

    FramePatch::position(left, top)
}
