use super::{Canvas, CanvasError};
use crate::draw::{BLACK, Stroke, render_thumbnail_png};
use crate::tool::{DEFAULT_LINE_WIDTH, InkTool};
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Version written into every stroke blob produced by [`SketchCanvas`].
pub const SKETCH_FORMAT_VERSION: u32 = 1;

/// Number of history steps kept for undo.
const HISTORY_LIMIT: usize = 100;

/// Default cap on the decompressed size of a stroke blob.
pub const DEFAULT_MAX_DECODED_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct SketchFile {
    version: u32,
    #[serde(default)]
    strokes: Vec<Stroke>,
}

/// Reference canvas: a list of freehand strokes with snapshot-based history.
///
/// Stroke blobs are versioned JSON, gzip-compressed. Plain JSON blobs are
/// accepted on decode as well.
#[derive(Debug, Clone)]
pub struct SketchCanvas {
    strokes: Vec<Stroke>,
    undo_stack: Vec<Vec<Stroke>>,
    redo_stack: Vec<Vec<Stroke>>,
    tool: InkTool,
    max_decoded_bytes: u64,
}

impl Default for SketchCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchCanvas {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            tool: InkTool::Pen {
                color: BLACK,
                width: DEFAULT_LINE_WIDTH,
            },
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }

    /// Caps how large a stroke blob may grow when decompressed.
    pub fn with_decode_limit(mut self, bytes: u64) -> Self {
        self.max_decoded_bytes = bytes;
        self
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn tool(&self) -> InkTool {
        self.tool
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Adds a stroke through `points` using the active tool.
    ///
    /// Returns false (and records nothing) when `points` is empty or holds a
    /// non-finite coordinate.
    pub fn draw(&mut self, points: Vec<(f64, f64)>) -> bool {
        if points.is_empty() {
            return false;
        }
        if !points.iter().all(|(x, y)| x.is_finite() && y.is_finite()) {
            debug!("Ignoring stroke with non-finite coordinates");
            return false;
        }
        let stroke = match self.tool {
            InkTool::Pen { color, width } => Stroke::new(points, color, width),
            InkTool::Eraser { width } => Stroke::eraser(points, width),
        };
        self.record_history();
        self.strokes.push(stroke);
        true
    }

    fn record_history(&mut self) {
        self.undo_stack.push(self.strokes.clone());
        if self.undo_stack.len() > HISTORY_LIMIT {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }
}

impl Canvas for SketchCanvas {
    fn encode(&self) -> Result<Vec<u8>, CanvasError> {
        if let Some(index) = self.strokes.iter().position(|stroke| !is_finite_stroke(stroke)) {
            return Err(CanvasError::Encode(format!(
                "stroke {index} has non-finite coordinates or width"
            )));
        }

        let file = SketchFile {
            version: SKETCH_FORMAT_VERSION,
            strokes: self.strokes.clone(),
        };
        let json =
            serde_json::to_vec(&file).map_err(|err| CanvasError::Encode(err.to_string()))?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&json)
            .map_err(|err| CanvasError::Encode(err.to_string()))?;
        encoder
            .finish()
            .map_err(|err| CanvasError::Encode(err.to_string()))
    }

    fn decode(&mut self, blob: &[u8]) -> Result<(), CanvasError> {
        self.strokes.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();

        let json = if is_gzip(blob) {
            let limit = self.max_decoded_bytes;
            let mut out = Vec::new();
            GzDecoder::new(blob)
                .take(limit.saturating_add(1))
                .read_to_end(&mut out)
                .map_err(|err| CanvasError::Decode(format!("corrupt gzip stream: {err}")))?;
            if out.len() as u64 > limit {
                return Err(CanvasError::Decode(format!(
                    "stroke data expands beyond {limit} bytes"
                )));
            }
            out
        } else {
            blob.to_vec()
        };

        let file: SketchFile =
            serde_json::from_slice(&json).map_err(|err| CanvasError::Decode(err.to_string()))?;
        if file.version > SKETCH_FORMAT_VERSION {
            return Err(CanvasError::Decode(format!(
                "stroke format version {} is newer than supported version {}",
                file.version, SKETCH_FORMAT_VERSION
            )));
        }

        debug!("Decoded {} strokes", file.strokes.len());
        self.strokes = file.strokes;
        Ok(())
    }

    fn clear(&mut self) {
        if self.strokes.is_empty() {
            return;
        }
        self.record_history();
        self.strokes.clear();
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.strokes, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.strokes, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    fn apply_tool(&mut self, tool: &InkTool) {
        self.tool = *tool;
    }

    fn render_preview(&self, size: u32) -> Result<Vec<u8>, CanvasError> {
        Ok(render_thumbnail_png(&self.strokes, size)?)
    }
}

fn is_finite_stroke(stroke: &Stroke) -> bool {
    stroke.width.is_finite()
        && stroke
            .points
            .iter()
            .all(|(x, y)| x.is_finite() && y.is_finite())
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}
