//! Cairo-based rendering of strokes into PNG thumbnails.

use super::color::{Color, WHITE};
use super::stroke::{Stroke, ink_bounds};
use thiserror::Error;

/// Blank border kept around the drawing inside a thumbnail, in pixels.
const THUMBNAIL_MARGIN: f64 = 8.0;

/// Errors raised while rasterising a preview.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("thumbnail size must be positive, got {0}")]
    InvalidSize(u32),

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] cairo::IoError),
}

/// Renders strokes into a square PNG of `size`×`size` pixels.
///
/// The ink bounding box is scaled uniformly and centred so the whole drawing
/// fits, on a white background. Eraser strokes clear ink painted before them.
/// An empty drawing yields a blank white image.
pub fn render_thumbnail_png(strokes: &[Stroke], size: u32) -> Result<Vec<u8>, RenderError> {
    if size == 0 || size > i32::MAX as u32 {
        return Err(RenderError::InvalidSize(size));
    }
    let side = size as i32;
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, side, side)?;

    {
        let ctx = cairo::Context::new(&surface)?;
        fill_background(&ctx, WHITE)?;

        if let Some(bounds) = ink_bounds(strokes) {
            let available = (size as f64 - THUMBNAIL_MARGIN * 2.0).max(1.0);
            let extent = bounds.width().max(bounds.height()).max(1.0);
            let scale = available / extent;
            let offset_x = (size as f64 - bounds.width() * scale) / 2.0;
            let offset_y = (size as f64 - bounds.height() * scale) / 2.0;

            // Erasers clear to transparent inside the group, then the group
            // is composited over the background.
            ctx.push_group();
            ctx.translate(offset_x, offset_y);
            ctx.scale(scale, scale);
            ctx.translate(-bounds.min_x, -bounds.min_y);
            render_strokes(&ctx, strokes);
            ctx.pop_group_to_source()?;
            ctx.paint()?;
        }
    }

    let mut png = Vec::new();
    surface.write_to_png(&mut png)?;
    Ok(png)
}

/// Renders all strokes in draw order (first stroke = bottom).
pub fn render_strokes(ctx: &cairo::Context, strokes: &[Stroke]) {
    for stroke in strokes {
        render_stroke(ctx, stroke);
    }
}

/// Render one freehand stroke (polyline through its points).
///
/// A single-point stroke is drawn as a dot.
pub fn render_stroke(ctx: &cairo::Context, stroke: &Stroke) {
    let Some((&(x0, y0), rest)) = stroke.points.split_first() else {
        return;
    };

    let _ = ctx.save();
    if stroke.eraser {
        ctx.set_operator(cairo::Operator::Clear);
    } else {
        let color = stroke.color;
        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    }
    ctx.set_line_width(stroke.width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(x0, y0);
    if rest.is_empty() {
        ctx.line_to(x0, y0);
    }
    for &(x, y) in rest {
        ctx.line_to(x, y);
    }

    let _ = ctx.stroke();
    let _ = ctx.restore();
}

fn fill_background(ctx: &cairo::Context, color: Color) -> Result<(), cairo::Error> {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.paint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BLUE;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn png_dimensions(png: &[u8]) -> (u32, u32) {
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        (width, height)
    }

    #[test]
    fn empty_drawing_renders_blank_png_of_requested_size() {
        let png = render_thumbnail_png(&[], 200).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
        assert_eq!(png_dimensions(&png), (200, 200));
    }

    #[test]
    fn strokes_render_into_square_thumbnail() {
        let strokes = vec![
            Stroke::new(vec![(0.0, 0.0), (400.0, 100.0)], BLUE, 6.0),
            Stroke::eraser(vec![(200.0, 50.0)], 30.0),
        ];
        let png = render_thumbnail_png(&strokes, 64).unwrap();
        assert_eq!(png_dimensions(&png), (64, 64));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            render_thumbnail_png(&[], 0),
            Err(RenderError::InvalidSize(0))
        ));
    }
}
