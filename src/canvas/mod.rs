//! The canvas collaborator seam.
//!
//! Stroke capture, stroke storage and on-screen rendering belong to the host's
//! input framework. The session only needs the handful of operations in
//! [`Canvas`]: round-trip the stroke blob, clear, step through the native
//! undo history, receive the active tool, and render a preview. Hosts forward
//! stroke-change notifications through [`CanvasEvents`].
//!
//! [`SketchCanvas`] is the in-crate implementation used by the CLI and tests.

mod sketch;

pub use sketch::{DEFAULT_MAX_DECODED_BYTES, SKETCH_FORMAT_VERSION, SketchCanvas};

use crate::draw::RenderError;
use crate::tool::InkTool;
use thiserror::Error;

/// Errors reported by a canvas collaborator.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The stroke blob could not be decoded into a drawing.
    #[error("failed to decode stroke data: {0}")]
    Decode(String),

    /// The current drawing could not be serialised.
    #[error("failed to encode stroke data: {0}")]
    Encode(String),

    /// The preview image could not be produced.
    #[error("failed to render preview: {0}")]
    Render(#[from] RenderError),
}

/// Operations the drawing session needs from the stroke canvas.
pub trait Canvas {
    /// Serialises the current strokes into the canvas' own blob format.
    fn encode(&self) -> Result<Vec<u8>, CanvasError>;

    /// Replaces the current strokes with the drawing stored in `blob`.
    ///
    /// On failure the canvas must be left empty, never half-loaded.
    fn decode(&mut self, blob: &[u8]) -> Result<(), CanvasError>;

    /// Removes every stroke.
    fn clear(&mut self);

    /// Steps back in the native history. Returns false when there was nothing to undo.
    fn undo(&mut self) -> bool;

    /// Steps forward in the native history. Returns false when there was nothing to redo.
    fn redo(&mut self) -> bool;

    /// Configures the tool used for subsequent strokes.
    fn apply_tool(&mut self, tool: &InkTool);

    /// Rasterises the drawing into a `size`×`size` PNG.
    fn render_preview(&self, size: u32) -> Result<Vec<u8>, CanvasError>;
}

/// Sink for notifications raised by the canvas collaborator.
pub trait CanvasEvents {
    /// Called whenever the stroke content changed (stroke added, erased, moved).
    fn strokes_changed(&mut self);
}
