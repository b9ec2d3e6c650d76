//! Rendering primitives and stroke definitions (Cairo-based).
//!
//! This module defines the drawing types used by the reference canvas:
//! - [`Color`]: RGBA color representation with the ink palette
//! - [`Stroke`]: A freehand polyline with color, width and eraser flag
//! - Thumbnail rendering to PNG through Cairo

pub mod color;
pub mod render;
pub mod stroke;

pub use color::Color;
pub use render::{RenderError, render_stroke, render_strokes, render_thumbnail_png};
pub use stroke::{Bounds, Stroke, ink_bounds};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PURPLE, RED, WHITE, YELLOW};
