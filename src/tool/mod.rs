//! Tool selection and canvas view transform.
//!
//! [`ToolState`] is the set of preferences a drawing session edits: ink color,
//! line width, eraser mode, toolbar visibility and the zoom/pan transform. The
//! pen and the eraser are mutually exclusive and each keeps its own width;
//! switching to the eraser keeps the pen's color and width so they come back
//! when a color is picked again.

use crate::draw::{BLACK, Color};

/// Smallest zoom scale the canvas allows.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom scale the canvas allows.
pub const MAX_ZOOM: f64 = 3.0;
/// Smallest accepted line width.
pub const MIN_LINE_WIDTH: f64 = 1.0;
/// Largest accepted line width.
pub const MAX_LINE_WIDTH: f64 = 50.0;
/// Line width used when nothing else was chosen.
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;
/// Eraser width used when nothing else was chosen.
pub const DEFAULT_ERASER_WIDTH: f64 = 20.0;

/// Clamps a zoom scale to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
///
/// Non-finite input resets to 1.0.
pub fn clamp_zoom(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        1.0
    }
}

/// Clamps a line width to [`MIN_LINE_WIDTH`]..=[`MAX_LINE_WIDTH`].
pub fn clamp_line_width(width: f64) -> f64 {
    if width.is_finite() {
        width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
    } else {
        DEFAULT_LINE_WIDTH
    }
}

/// Zoom scale and pan offset of the canvas view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    zoom: f64,
    offset: (f64, f64),
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: (0.0, 0.0),
        }
    }
}

impl CanvasTransform {
    /// Builds a transform, clamping `zoom` into range.
    pub fn new(zoom: f64, offset: (f64, f64)) -> Self {
        let offset = if offset.0.is_finite() && offset.1.is_finite() {
            offset
        } else {
            (0.0, 0.0)
        };
        Self {
            zoom: clamp_zoom(zoom),
            offset,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Sets the zoom scale, clamped. Returns the applied value.
    pub fn set_zoom(&mut self, scale: f64) -> f64 {
        self.zoom = clamp_zoom(scale);
        self.zoom
    }

    /// Multiplies the zoom scale by `factor` (pinch gesture), clamped.
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        self.set_zoom(self.zoom * factor)
    }

    /// Moves the view by `(dx, dy)`.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset = (self.offset.0 + dx, self.offset.1 + dy);
        }
    }

    /// Back to 1.0 zoom with no offset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The tool the canvas should ink with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InkTool {
    /// Draws with the given color and width
    Pen { color: Color, width: f64 },
    /// Removes ink under a stroke of the given width
    Eraser { width: f64 },
}

/// Tool preferences edited during a drawing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    /// Remembered pen color (kept while the eraser is active)
    pub color: Color,
    /// Remembered pen width (kept while the eraser is active)
    pub line_width: f64,
    /// Eraser width
    pub eraser_width: f64,
    /// Whether the eraser replaces the pen
    pub eraser_active: bool,
    /// Whether the tool palette is shown
    pub toolbar_visible: bool,
    /// Canvas zoom and pan
    pub transform: CanvasTransform,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            color: BLACK,
            line_width: DEFAULT_LINE_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            eraser_active: false,
            toolbar_visible: true,
            transform: CanvasTransform::default(),
        }
    }
}

impl ToolState {
    /// Returns a copy with every field pulled back into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.color = self.color.clamped();
        self.line_width = clamp_line_width(self.line_width);
        self.eraser_width = clamp_line_width(self.eraser_width);
        self.transform = CanvasTransform::new(self.transform.zoom, self.transform.offset);
        self
    }

    /// The tool the canvas should currently ink with.
    pub fn active_tool(&self) -> InkTool {
        if self.eraser_active {
            InkTool::Eraser {
                width: self.eraser_width,
            }
        } else {
            InkTool::Pen {
                color: self.color,
                width: self.line_width,
            }
        }
    }

    /// Picks a pen color. Leaves eraser mode and keeps the previous width.
    pub fn select_color(&mut self, color: Color) {
        self.color = color.clamped();
        self.eraser_active = false;
    }

    /// Sets the width of whichever tool is active. Returns the applied value.
    pub fn set_line_width(&mut self, width: f64) -> f64 {
        let width = clamp_line_width(width);
        if self.eraser_active {
            self.eraser_width = width;
        } else {
            self.line_width = width;
        }
        width
    }

    pub fn activate_eraser(&mut self) {
        self.eraser_active = true;
    }

    pub fn deactivate_eraser(&mut self) {
        self.eraser_active = false;
    }

    /// Flips eraser mode. Returns the new state.
    pub fn toggle_eraser(&mut self) -> bool {
        self.eraser_active = !self.eraser_active;
        self.eraser_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, RED};

    #[test]
    fn zoom_is_clamped_to_range() {
        let mut transform = CanvasTransform::default();
        assert_eq!(transform.set_zoom(10.0), 3.0);
        assert_eq!(transform.set_zoom(0.1), 0.5);
        assert_eq!(transform.set_zoom(1.75), 1.75);
        assert_eq!(transform.set_zoom(f64::NAN), 1.0);
    }

    #[test]
    fn zoom_by_multiplies_then_clamps() {
        let mut transform = CanvasTransform::new(2.0, (0.0, 0.0));
        assert_eq!(transform.zoom_by(1.25), 2.5);
        assert_eq!(transform.zoom_by(4.0), 3.0);
        assert_eq!(transform.zoom_by(0.01), 0.5);
    }

    #[test]
    fn new_transform_clamps_out_of_range_zoom() {
        assert_eq!(CanvasTransform::new(100.0, (1.0, 2.0)).zoom(), MAX_ZOOM);
        assert_eq!(CanvasTransform::new(0.0, (1.0, 2.0)).zoom(), MIN_ZOOM);
    }

    #[test]
    fn pan_accumulates_and_reset_restores_identity() {
        let mut transform = CanvasTransform::default();
        transform.pan_by(10.0, -5.0);
        transform.pan_by(2.5, 2.5);
        assert_eq!(transform.offset(), (12.5, -2.5));

        transform.pan_by(f64::INFINITY, 0.0);
        assert_eq!(transform.offset(), (12.5, -2.5));

        transform.set_zoom(2.0);
        transform.reset();
        assert_eq!(transform, CanvasTransform::default());
    }

    #[test]
    fn defaults_match_documented_values() {
        let state = ToolState::default();
        assert_eq!(state.color, BLACK);
        assert_eq!(state.line_width, 5.0);
        assert!(!state.eraser_active);
        assert!(state.toolbar_visible);
        assert_eq!(state.transform.zoom(), 1.0);
        assert_eq!(state.transform.offset(), (0.0, 0.0));
    }

    #[test]
    fn eraser_keeps_remembered_color_and_width() {
        let mut state = ToolState::default();
        state.select_color(RED);
        state.set_line_width(12.0);

        state.activate_eraser();
        assert_eq!(
            state.active_tool(),
            InkTool::Eraser {
                width: DEFAULT_ERASER_WIDTH
            }
        );
        assert_eq!(state.color, RED);
        assert_eq!(state.line_width, 12.0);

        state.set_line_width(30.0);
        assert_eq!(state.active_tool(), InkTool::Eraser { width: 30.0 });

        state.select_color(BLUE);
        assert!(!state.eraser_active);
        assert_eq!(
            state.active_tool(),
            InkTool::Pen {
                color: BLUE,
                width: 12.0
            }
        );
    }

    #[test]
    fn reselecting_color_restores_prior_width() {
        let mut state = ToolState::default();
        state.set_line_width(8.0);
        state.toggle_eraser();
        assert!(state.eraser_active);

        state.select_color(RED);
        assert_eq!(
            state.active_tool(),
            InkTool::Pen {
                color: RED,
                width: 8.0
            }
        );
    }

    #[test]
    fn line_width_is_clamped() {
        let mut state = ToolState::default();
        assert_eq!(state.set_line_width(0.0), MIN_LINE_WIDTH);
        assert_eq!(state.set_line_width(500.0), MAX_LINE_WIDTH);
    }

    #[test]
    fn sanitized_repairs_every_field() {
        let state = ToolState {
            color: Color::new(2.0, 0.5, -1.0, 1.0),
            line_width: f64::NAN,
            eraser_width: 0.2,
            eraser_active: true,
            toolbar_visible: false,
            transform: CanvasTransform {
                zoom: 9.0,
                offset: (f64::NAN, 1.0),
            },
        }
        .sanitized();

        assert_eq!(state.color, Color::new(1.0, 0.5, 0.0, 1.0));
        assert_eq!(state.line_width, DEFAULT_LINE_WIDTH);
        assert_eq!(state.eraser_width, MIN_LINE_WIDTH);
        assert_eq!(state.transform.zoom(), MAX_ZOOM);
        assert_eq!(state.transform.offset(), (0.0, 0.0));
        assert!(state.eraser_active);
        assert!(!state.toolbar_visible);
    }
}
