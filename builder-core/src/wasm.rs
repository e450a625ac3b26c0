//! WebAssembly bindings for builder-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Documents cross the boundary as JSON.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::{
    CanvasBounds, DragSource, DropZone, Editor, EditorConfig, ElementId, GestureEvent, Point,
    SharedBounds,
};

/// Initialize the builder WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    bounds: SharedBounds,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create a new editor instance.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        let bounds = SharedBounds::new();
        Self {
            editor: Editor::with_config(EditorConfig::default(), Arc::new(bounds.clone())),
            bounds,
        }
    }

    /// Get the current document as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        self.editor.document().to_json().unwrap_or_default()
    }

    /// Record the canvas's measured client rectangle.
    #[wasm_bindgen(js_name = setCanvasBounds)]
    pub fn set_canvas_bounds(&self, left: f32, top: f32, width: f32, height: f32) {
        self.bounds.set(Some(CanvasBounds {
            left,
            top,
            width,
            height,
        }));
    }

    /// Forget the canvas measurement (e.g. when it unmounts).
    #[wasm_bindgen(js_name = clearCanvasBounds)]
    pub fn clear_canvas_bounds(&self) {
        self.bounds.set(None);
    }

    /// Start a drag from a tagged source (`sidebar-<kind>` or `element-<id>`).
    ///
    /// # Errors
    ///
    /// Returns an error string if the tag is not recognized.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, tag: &str, x: f32, y: f32) -> Result<(), String> {
        let source: DragSource = tag.parse().map_err(|e: crate::BuilderError| e.to_string())?;
        self.editor.handle_gesture(&GestureEvent::Start {
            source,
            pointer: Point::new(x, y),
        });
        Ok(())
    }

    /// Report pointer movement during a drag.
    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        self.editor.handle_gesture(&GestureEvent::Move {
            pointer: Point::new(x, y),
            delta: Point::new(dx, dy),
        });
    }

    /// Report the end of a drag; `over` is the drop zone tag, if any.
    ///
    /// Returns the resulting phase name.
    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self, x: f32, y: f32, dx: f32, dy: f32, over: Option<String>) -> String {
        let over = over.and_then(|tag| DropZone::from_tag(&tag).ok());
        let transition = self.editor.handle_gesture(&GestureEvent::End {
            pointer: Point::new(x, y),
            delta: Point::new(dx, dy),
            over,
        });
        format!("{:?}", transition.phase).to_lowercase()
    }

    /// Abandon the drag in progress.
    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.editor.cancel_gesture();
    }

    /// Whether a drag is in progress.
    #[wasm_bindgen(js_name = isDragging)]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.editor.is_dragging()
    }

    /// Whether the drag in progress came from the palette.
    #[wasm_bindgen(js_name = isPaletteDrag)]
    #[must_use]
    pub fn is_palette_drag(&self) -> bool {
        self.editor.is_palette_drag()
    }

    /// Frame a palette drag would create at the current pointer, as JSON.
    #[wasm_bindgen(js_name = dropPreview)]
    #[must_use]
    pub fn drop_preview(&self) -> Option<String> {
        self.editor
            .drop_preview()
            .and_then(|frame| serde_json::to_string(&frame).ok())
    }

    /// Live preview offset of an element being dragged, as `{"x","y"}` JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the id is not a valid UUID.
    #[wasm_bindgen(js_name = dragOffset)]
    pub fn drag_offset(&self, id: &str) -> Result<Option<String>, String> {
        let id = ElementId::parse(id).map_err(|e| e.to_string())?;
        Ok(self
            .editor
            .drag_offset(id)
            .and_then(|offset| serde_json::to_string(&offset).ok()))
    }

    /// Select an element, as a click on it does.
    ///
    /// # Errors
    ///
    /// Returns an error string if the id is not a valid UUID.
    #[wasm_bindgen(js_name = selectElement)]
    pub fn select_element(&mut self, id: &str) -> Result<bool, String> {
        let id = ElementId::parse(id).map_err(|e| e.to_string())?;
        Ok(self.editor.select(id))
    }

    /// Click at a client point: selects the topmost element under it, or
    /// clears the selection over empty background.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f32, y: f32) -> bool {
        self.editor.click_at(Point::new(x, y))
    }

    /// Id of the selected element, if any.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.editor.document().selected_id().map(|id| id.to_string())
    }

    /// Click on empty canvas background.
    #[wasm_bindgen(js_name = clickBackground)]
    pub fn click_background(&mut self) -> bool {
        self.editor.click_background()
    }

    /// Apply one property-form field to an element.
    ///
    /// # Errors
    ///
    /// Returns an error string if the id, field or value is invalid.
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(&mut self, id: &str, field: &str, value: &str) -> Result<bool, String> {
        let id = ElementId::parse(id).map_err(|e| e.to_string())?;
        self.editor
            .update_field(id, field, value)
            .map_err(|e| e.to_string())
    }

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Returns an error string if the id is not a valid UUID.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> Result<bool, String> {
        let id = ElementId::parse(id).map_err(|e| e.to_string())?;
        Ok(self.editor.delete(id))
    }

    /// Switch the preview device (`mobile`, `tablet` or `desktop`).
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown device name.
    #[wasm_bindgen(js_name = setDevice)]
    pub fn set_device(&mut self, device: &str) -> Result<(), String> {
        let device = device.parse().map_err(|e: crate::BuilderError| e.to_string())?;
        self.editor.set_device(device);
        Ok(())
    }
}

    /// Current preview device name.
    #[wasm_bindgen(js_name = getDevice)]
    #[must_use]
    pub fn device(&self) -> String {
        self.editor.device().as_str().to_string()
    }

    /// Nominal preview width of the current device, or `undefined` for full
    /// width.
    #[wasm_bindgen(js_name = previewWidth)]
    #[must_use]
    pub fn preview_width(&self) -> Option<f32> {
        self.editor.device().preview_width()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;

    fn measured() -> WasmEditor {
        let editor = WasmEditor::new();
        editor.set_canvas_bounds(250.0, 60.0, 500.0, 400.0);
        editor
    }

    fn drop_button(editor: &mut WasmEditor, x: f32, y: f32) -> String {
        editor
            .drag_start("sidebar-button", 20.0, 100.0)
            .expect("palette tag");
        editor.drag_move(x, y, x - 20.0, y - 100.0);
        assert_eq!(editor.drag_end(x, y, 0.0, 0.0, Some("canvas".into())), "committed");
        editor.selected_id().expect("dropped element is selected")
    }

    #[test]
    fn test_new_editor_has_empty_document() {
        let editor = WasmEditor::default();
        let parsed: serde_json::Value =
            serde_json::from_str(&editor.get_document_json()).expect("valid JSON");
        assert_eq!(parsed["elements"], serde_json::json!([]));
        assert!(!editor.is_dragging());
        assert_eq!(editor.device(), "desktop");
        assert_eq!(editor.preview_width(), None);
    }

    #[test]
    fn test_drag_start_rejects_unknown_tag() {
        let mut editor = WasmEditor::new();
        assert!(editor.drag_start("toolbar-button", 0.0, 0.0).is_err());
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_palette_drag_exposes_drop_preview() {
        let mut editor = measured();
        editor
            .drag_start("sidebar-button", 20.0, 100.0)
            .expect("palette tag");
        editor.drag_move(400.0, 160.0, 380.0, 60.0);

        assert!(editor.is_palette_drag());
        let preview: Frame =
            serde_json::from_str(&editor.drop_preview().expect("preview")).expect("frame JSON");
        assert!((preview.left - 100.0).abs() < f32::EPSILON);
        assert!((preview.top - 80.0).abs() < f32::EPSILON);

        editor.cancel_drag();
        assert!(!editor.is_palette_drag());
        assert!(editor.drop_preview().is_none());
    }

    #[test]
    fn test_element_drag_exposes_offset() {
        let mut editor = measured();
        let id = drop_button(&mut editor, 400.0, 160.0);

        editor
            .drag_start(&format!("element-{id}"), 400.0, 160.0)
            .expect("element tag");
        editor.drag_move(430.0, 170.0, 30.0, 10.0);

        let offset: Point = serde_json::from_str(
            &editor
                .drag_offset(&id)
                .expect("valid id")
                .expect("element is dragging"),
        )
        .expect("point JSON");
        assert_eq!(offset, Point::new(30.0, 10.0));
        assert!(editor.drag_offset("not-a-uuid").is_err());
    }

    #[test]
    fn test_click_selection() {
        let mut editor = measured();
        let first = drop_button(&mut editor, 400.0, 160.0);
        let second = drop_button(&mut editor, 600.0, 360.0);
        assert_eq!(editor.selected_id().as_deref(), Some(second.as_str()));

        assert!(editor.click_at(400.0, 160.0));
        assert_eq!(editor.selected_id().as_deref(), Some(first.as_str()));

        assert!(editor.select_element(&second).expect("valid id"));
        assert_eq!(editor.selected_id().as_deref(), Some(second.as_str()));

        assert!(editor.click_background());
        assert_eq!(editor.selected_id(), None);
    }

    #[test]
    fn test_device_switch() {
        let mut editor = WasmEditor::new();
        editor.set_device("tablet").expect("known device");
        assert_eq!(editor.device(), "tablet");
        assert_eq!(editor.preview_width(), Some(768.0));
        assert!(editor.set_device("watch").is_err());
    }
}
