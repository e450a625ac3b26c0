//! The static palette of creatable element templates.

use serde::Serialize;

use crate::element::ElementKind;
use crate::gesture::DragSource;

/// One draggable palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Kind created when this entry is dropped on the canvas.
    pub kind: ElementKind,
    /// Display label.
    pub label: &'static str,
}

impl PaletteEntry {
    /// Drag source for this entry.
    #[must_use]
    pub const fn source(&self) -> DragSource {
        DragSource::Palette(self.kind)
    }
}

/// Palette entries in display order.
pub const PALETTE: [PaletteEntry; 4] = [
    PaletteEntry {
        kind: ElementKind::Heading,
        label: "Heading",
    },
    PaletteEntry {
        kind: ElementKind::Text,
        label: "Text Block",
    },
    PaletteEntry {
        kind: ElementKind::Image,
        label: "Image",
    },
    PaletteEntry {
        kind: ElementKind::Button,
        label: "Button",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_covers_every_kind_once() {
        for kind in ElementKind::ALL {
            assert_eq!(PALETTE.iter().filter(|e| e.kind == kind).count(), 1);
        }
    }

    #[test]
    fn test_palette_tags() {
        let tags: Vec<String> = PALETTE.iter().map(|e| e.source().tag()).collect();
        assert_eq!(
            tags,
            vec![
                "sidebar-heading",
                "sidebar-text",
                "sidebar-image",
                "sidebar-button"
            ]
        );
    }
}
