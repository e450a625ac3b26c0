//! Canvas elements - the items users drop onto the page.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{finite_or_zero, non_negative};
use crate::{BuilderError, BuilderResult};

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    ///
    /// Random (v4) ids do not depend on the clock, so elements created within
    /// the same millisecond never collide.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an id from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidElementId`] if `s` is not a UUID.
    pub fn parse(s: &str) -> BuilderResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|source| BuilderError::InvalidElementId {
                id: s.to_string(),
                source,
            })
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of element kinds the palette offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A paragraph of text.
    Text,
    /// A heading line.
    Heading,
    /// An image; its content is the image URL.
    Image,
    /// A button with a text label.
    Button,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Heading, Self::Image, Self::Button];

    /// Lowercase name used in tags and snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Image => "image",
            Self::Button => "button",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BuilderError::UnknownKind(s.to_string()))
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center the text.
    Center,
    /// Align to the right edge.
    Right,
}

impl FromStr for TextAlign {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(BuilderError::UnknownAlignment(other.to_string())),
        }
    }
}

/// Position and size of an element in canvas-local units.
///
/// `left` and `top` are never negative once stored in a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Distance from the canvas top edge.
    pub top: f32,
    /// Distance from the canvas left edge.
    pub left: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Frame {
    /// Create a frame, clamping the origin and size to valid values.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top: non_negative(top),
            left: non_negative(left),
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Check if a canvas-local point lies within this frame.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }
}

/// Visual style properties edited through the property form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visual {
    /// Foreground color as a CSS color string.
    pub color: String,
    /// Background color as a CSS color string.
    pub background_color: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text alignment.
    pub text_align: TextAlign,
    /// Inner padding in pixels.
    pub padding: f32,
}

/// A placed element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element kind, fixed at creation.
    pub kind: ElementKind,
    /// Text payload, or the URL for images.
    pub content: String,
    /// Position and size.
    pub frame: Frame,
    /// Visual style.
    pub visual: Visual,
}

impl Element {
    /// Create an element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind, content: impl Into<String>, frame: Frame, visual: Visual) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            content: content.into(),
            frame,
            visual,
        }
    }

    /// Merge a patch into this element.
    ///
    /// Each sub-object is merged field by field, so patching one visual field
    /// leaves its siblings alone. Returns `true` if anything changed.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();

        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        patch.frame.merge_into(&mut self.frame);
        patch.visual.merge_into(&mut self.visual);

        *self != before
    }
}

/// Partial update of an element's frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePatch {
    /// New top offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    /// New left offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl FramePatch {
    /// Patch that only moves the origin.
    #[must_use]
    pub const fn position(left: f32, top: f32) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            width: None,
            height: None,
        }
    }

    /// Whether the patch sets no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none() && self.left.is_none() && self.width.is_none() && self.height.is_none()
    }

    fn merge_into(&self, frame: &mut Frame) {
        if let Some(top) = self.top {
            frame.top = non_negative(top);
        }
        if let Some(left) = self.left {
            frame.left = non_negative(left);
        }
        if let Some(width) = self.width {
            frame.width = non_negative(width);
        }
        if let Some(height) = self.height {
            frame.height = non_negative(height);
        }
    }
}

/// Partial update of an element's visual style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualPatch {
    /// New foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// New background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// New font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// New alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// New padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
}

impl VisualPatch {
    /// Whether the patch sets no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.background_color.is_none()
            && self.font_size.is_none()
            && self.text_align.is_none()
            && self.padding.is_none()
    }

    fn merge_into(&self, visual: &mut Visual) {
        if let Some(color) = &self.color {
            visual.color.clone_from(color);
        }
        if let Some(background) = &self.background_color {
            visual.background_color.clone_from(background);
        }
        if let Some(font_size) = self.font_size {
            visual.font_size = finite_or_zero(font_size);
        }
        if let Some(text_align) = self.text_align {
            visual.text_align = text_align;
        }
        if let Some(padding) = self.padding {
            visual.padding = non_negative(padding);
        }
    }
}

/// Partial update of an element: content plus per-sub-object patches.
///
/// The element kind is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Frame fields to change.
    #[serde(default)]
    pub frame: FramePatch,
    /// Visual fields to change.
    #[serde(default)]
    pub visual: VisualPatch,
}

impl ElementPatch {
    /// Patch that replaces the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Patch that only touches the frame.
    #[must_use]
    pub fn frame(frame: FramePatch) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    /// Patch that only touches the visual style.
    #[must_use]
    pub fn visual(visual: VisualPatch) -> Self {
        Self {
            visual,
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.frame.is_empty() && self.visual.is_empty()
    }

    /// Build a patch from a single property-form field.
    ///
    /// Field names follow the form: `content`, `top`, `left`, `width`,
    /// `height`, `color`, `backgroundColor`, `fontSize`, `textAlign`,
    /// `padding`. Numeric fields accept an empty string as zero.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidField`] for unknown fields or values
    /// that cannot be coerced, and [`BuilderError::UnknownAlignment`] for a
    /// bad alignment name.
    pub fn from_field(field: &str, value: &str) -> BuilderResult<Self> {
        let number = || -> BuilderResult<f32> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f32>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| BuilderError::InvalidField {
                    field: field.to_string(),
                    value: value.to_string(),
                })
        };

        let mut patch = Self::default();
        match field {
            "content" => patch.content = Some(value.to_string()),
            "top" => patch.frame.top = Some(number()?),
            "left" => patch.frame.left = Some(number()?),
            "width" => patch.frame.width = Some(number()?),
            "height" => patch.frame.height = Some(number()?),
            "fontSize" => patch.visual.font_size = Some(number()?),
            "padding" => patch.visual.padding = Some(number()?),
            "color" => patch.visual.color = Some(value.to_string()),
            "backgroundColor" => patch.visual.background_color = Some(value.to_string()),
            "textAlign" => patch.visual.text_align = Some(value.parse()?),
            _ => {
                return Err(BuilderError::InvalidField {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
        }
        Ok(patch)
    }
}
