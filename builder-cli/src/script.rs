//! Replay scripts.
//!
//! A script is a sequence of JSON lines, one [`ScriptStep`] per line.
//! Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use builder_core::{
    BuilderError, CanvasBounds, DeviceType, Document, DragSource, DropZone, Editor, ElementId,
    ElementKind, GestureEvent, GesturePhase, Point, SharedBounds, Transition,
};
use serde::{Deserialize, Serialize};

use crate::ReplayConfig;

/// Reference to an element from a script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementRef {
    /// The currently selected element.
    Selected,
    /// The topmost element in paint order.
    Top,
    /// The element at a paint-order index (`@0` is the bottom).
    Index(usize),
    /// An element id. Stale ids are passed through untouched.
    Id(ElementId),
}

impl ElementRef {
    /// Resolve the reference against a document.
    #[must_use]
    pub fn resolve(self, document: &Document) -> Option<ElementId> {
        match self {
            Self::Selected => document.selected_id(),
            Self::Top => document.elements().last().map(|e| e.id),
            Self::Index(index) => document.elements().get(index).map(|e| e.id),
            Self::Id(id) => Some(id),
        }
    }
}

impl FromStr for ElementRef {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selected" => Ok(Self::Selected),
            "top" => Ok(Self::Top),
            _ => match s.strip_prefix('@') {
                Some(index) => index
                    .parse()
                    .map(Self::Index)
                    .map_err(|_| BuilderError::UnrecognizedTag(s.to_string())),
                None => ElementId::parse(s).map(Self::Id),
            },
        }
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selected => f.write_str("selected"),
            Self::Top => f.write_str("top"),
            Self::Index(index) => write!(f, "@{index}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl TryFrom<String> for ElementRef {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementRef> for String {
    fn from(element: ElementRef) -> Self {
        element.to_string()
    }
}

#[allow(clippy::unnecessary_wraps)]
const fn canvas() -> Option<DropZone> {
    Some(DropZone::Canvas)
}

const fn one_step() -> u16 {
    1
}

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptStep {
    /// A raw gesture event.
    Gesture {
        /// The event to feed the editor.
        event: GestureEvent,
    },
    /// Drag a palette item and release it at a client point.
    #[serde(rename_all = "camelCase")]
    DropPalette {
        /// Kind to create.
        kind: ElementKind,
        /// Release point in client coordinates.
        at: Point,
        /// Drop zone under the pointer; `null` releases outside the canvas.
        #[serde(default = "canvas")]
        over: Option<DropZone>,
    },
    /// Drag an element by a total offset.
    #[serde(rename_all = "camelCase")]
    DragElement {
        /// Element to drag.
        target: ElementRef,
        /// Total pointer movement.
        by: Point,
        /// Number of move events the movement is split into.
        #[serde(default = "one_step")]
        steps: u16,
        /// Drop zone under the pointer; `null` releases outside the canvas.
        #[serde(default = "canvas")]
        over: Option<DropZone>,
    },
    /// A plain click at a client point.
    Click {
        /// Client x.
        x: f32,
        /// Client y.
        y: f32,
    },
    /// A plain click on empty canvas background.
    ClickBackground,
    /// Select an element.
    Select {
        /// Element to select.
        target: ElementRef,
    },
    /// Apply one property-form field.
    Update {
        /// Element to edit.
        target: ElementRef,
        /// Form field name, e.g. `fontSize`.
        field: String,
        /// Raw form value.
        value: String,
    },
    /// Delete an element.
    Delete {
        /// Element to delete.
        target: ElementRef,
    },
    /// Switch the preview device.
    Device {
        /// New device.
        device: DeviceType,
    },
    /// Change the measured canvas bounds; `null` marks it unmeasured.
    Bounds {
        /// New bounds.
        bounds: Option<CanvasBounds>,
    },
}

/// Counters collected during a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Steps executed.
    pub steps: usize,
    /// Gestures that ended over a drop zone.
    pub committed: usize,
    /// Gestures released elsewhere or cancelled.
    pub abandoned: usize,
    /// Steps skipped because their target could not be resolved or applied.
    pub skipped: usize,
}

impl ReplayReport {
    fn record(&mut self, transition: Transition) {
        match transition.phase {
            GesturePhase::Committed => self.committed += 1,
            GesturePhase::Abandoned => self.abandoned += 1,
            GesturePhase::Idle | GesturePhase::Active => {}
        }
    }
}

/// Result of a replay.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Final document snapshot.
    pub document: Arc<Document>,
    /// Replay counters.
    pub report: ReplayReport,
}

/// Parse a script from a reader.
///
/// # Errors
///
/// Returns an error naming the line number of the first line that fails to
/// read or parse.
pub fn parse_script<R: BufRead>(reader: R) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid script step on line {line_no}"))?;
        steps.push(step);
    }
    Ok(steps)
}

/// Replay a script against a fresh editor.
///
/// # Errors
///
/// Returns an error if the script cannot be parsed. Steps whose target
/// cannot be resolved are logged and skipped.
pub fn replay<R: BufRead>(reader: R, config: &ReplayConfig) -> anyhow::Result<Replay> {
    let steps = parse_script(reader)?;
    tracing::debug!("Parsed {} script steps", steps.len());

    let bounds = SharedBounds::new();
    bounds.set(config.bounds);
    let mut editor = Editor::with_config(config.editor, Arc::new(bounds.clone()));

    let mut report = ReplayReport::default();
    for step in &steps {
        report.steps += 1;
        if !run_step(&mut editor, &bounds, step, &mut report) {
            report.skipped += 1;
        }
    }

    tracing::info!(
        "Replayed {} steps: {} committed, {} abandoned, {} skipped",
        report.steps,
        report.committed,
        report.abandoned,
        report.skipped
    );

    Ok(Replay {
        document: editor.document(),
        report,
    })
}

/// Run one step; returns `false` when it had to be skipped.
fn run_step(
    editor: &mut Editor,
    bounds: &SharedBounds,
    step: &ScriptStep,
    report: &mut ReplayReport,
) -> bool {
    match step {
        ScriptStep::Gesture { event } => {
            report.record(editor.handle_gesture(event));
        }
        ScriptStep::DropPalette { kind, at, over } => {
            let origin = Point::default();
            editor.handle_gesture(&GestureEvent::Start {
                source: DragSource::Palette(*kind),
                pointer: origin,
            });
            report.record(editor.handle_gesture(&GestureEvent::End {
                pointer: *at,
                delta: Point::new(at.x - origin.x, at.y - origin.y),
                over: *over,
            }));
        }
        ScriptStep::DragElement {
            target,
            by,
            steps,
            over,
        } => {
            let Some(id) = resolve(editor, *target) else {
                return false;
            };
            drag(editor, id, *by, *steps, *over, report);
        }
        ScriptStep::Click { x, y } => {
            editor.click_at(Point::new(*x, *y));
        }
        ScriptStep::ClickBackground => {
            editor.click_background();
        }
        ScriptStep::Select { target } => {
            let Some(id) = resolve(editor, *target) else {
                return false;
            };
            editor.select(id);
        }
        ScriptStep::Update {
            target,
            field,
            value,
        } => {
            let Some(id) = resolve(editor, *target) else {
                return false;
            };
            if let Err(e) = editor.update_field(id, field, value) {
                tracing::warn!("Skipping update of {}: {}", field, e);
                return false;
            }
        }
        ScriptStep::Delete { target } => {
            let Some(id) = resolve(editor, *target) else {
                return false;
            };
            editor.delete(id);
        }
        ScriptStep::Device { device } => {
            editor.set_device(*device);
        }
        ScriptStep::Bounds { bounds: new_bounds } => {
            bounds.set(*new_bounds);
        }
    }
    true
}

fn resolve(editor: &Editor, target: ElementRef) -> Option<ElementId> {
    let id = target.resolve(&editor.document());
    if id.is_none() {
        tracing::warn!("No element matches {}", target);
    }
    id
}

/// Drag an element from its client position, splitting the movement into
/// `steps` move events.
fn drag(
    editor: &mut Editor,
    id: ElementId,
    by: Point,
    steps: u16,
    over: Option<DropZone>,
    report: &mut ReplayReport,
) {
    let offset = editor
        .canvas_bounds()
        .map_or(Point::default(), |b| Point::new(b.left, b.top));
    let start = editor
        .document()
        .get(id)
        .map_or(offset, |e| Point::new(offset.x + e.frame.left, offset.y + e.frame.top));

    editor.handle_gesture(&GestureEvent::Start {
        source: DragSource::Element(id),
        pointer: start,
    });

    let count = steps.max(1);
    let step = Point::new(by.x / f32::from(count), by.y / f32::from(count));
    let mut pointer = start;
    for _ in 0..count {
        pointer = Point::new(pointer.x + step.x, pointer.y + step.y);
        editor.handle_gesture(&GestureEvent::Move {
            pointer,
            delta: step,
        });
    }

    report.record(editor.handle_gesture(&GestureEvent::End {
        pointer,
        delta: Point::default(),
        over,
    }));
}
