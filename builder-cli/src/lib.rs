//! # Builder CLI
//!
//! Command-line host for the page builder engine.
//!
//! Replays a script of gestures and property edits against a fresh editor
//! and prints the resulting document as JSON. Useful for exercising the
//! drag/drop engine without a browser.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p builder-cli -- session.jsonl --canvas-width 800 --canvas-height 600
//! ```
//!
//! Each script line is one JSON step:
//!
//! ```text
//! {"action":"dropPalette","kind":"button","at":{"x":150,"y":100}}
//! {"action":"dragElement","target":"selected","by":{"x":40,"y":0},"over":"canvas"}
//! {"action":"update","target":"selected","field":"color","value":"#ff0000"}
//! {"action":"clickBackground"}
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Canvas bounds, device and output options
//! - `script` - Script steps and the replay loop

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod script;

pub use script::{parse_script, replay, ElementRef, Replay, ReplayReport, ScriptStep};

use std::path::PathBuf;

use builder_core::{CanvasBounds, DeviceType, EditorConfig};
use clap::Parser;

/// Command-line arguments for builder-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "builder-cli")]
#[command(about = "Replay page builder gesture scripts")]
#[command(version)]
pub struct CliArgs {
    /// Script file (JSON lines); reads stdin when omitted
    pub script: Option<PathBuf>,

    /// Rendered canvas width; enables edge clamping together with the height
    #[arg(long, env = "BUILDER_CANVAS_WIDTH")]
    pub canvas_width: Option<f32>,

    /// Rendered canvas height
    #[arg(long, env = "BUILDER_CANVAS_HEIGHT")]
    pub canvas_height: Option<f32>,

    /// Client x of the canvas left edge
    #[arg(long, default_value = "0")]
    pub canvas_left: f32,

    /// Client y of the canvas top edge
    #[arg(long, default_value = "0")]
    pub canvas_top: f32,

    /// Preview device (mobile, tablet, desktop)
    #[arg(long, env = "BUILDER_DEVICE", default_value = "desktop")]
    pub device: DeviceType,

    /// Pretty-print the resulting document
    #[arg(long)]
    pub pretty: bool,
}

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Script path, or `None` for stdin.
    pub script: Option<PathBuf>,
    /// Canvas bounds, when both dimensions are known.
    pub bounds: Option<CanvasBounds>,
    /// Editor configuration.
    pub editor: EditorConfig,
    /// Pretty-print output.
    pub pretty: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayConfig {
    /// Create a configuration reading stdin with an unmeasured canvas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: None,
            bounds: None,
            editor: EditorConfig::default(),
            pretty: false,
        }
    }
}

impl From<CliArgs> for ReplayConfig {
    fn from(args: CliArgs) -> Self {
        let bounds = match (args.canvas_width, args.canvas_height) {
            (Some(width), Some(height)) => Some(CanvasBounds {
                left: args.canvas_left,
                top: args.canvas_top,
                width,
                height,
            }),
            _ => None,
        };
        Self {
            script: args.script,
            bounds,
            editor: EditorConfig {
                device: args.device,
                ..EditorConfig::default()
            },
            pretty: args.pretty,
        }
    }
}
