//! Freehand stroke definitions used by the reference canvas.

use super::color::Color;
use serde::{Deserialize, Serialize};

/// A single freehand stroke: a polyline traced by the stylus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Sampled points in canvas coordinates, in drawing order
    pub points: Vec<(f64, f64)>,
    /// Ink color (ignored for eraser strokes)
    pub color: Color,
    /// Line width in canvas units
    pub width: f64,
    /// Eraser strokes remove ink underneath instead of adding it
    #[serde(default)]
    pub eraser: bool,
}

impl Stroke {
    pub fn new(points: Vec<(f64, f64)>, color: Color, width: f64) -> Self {
        Self {
            points,
            color,
            width,
            eraser: false,
        }
    }

    pub fn eraser(points: Vec<(f64, f64)>, width: f64) -> Self {
        Self {
            points,
            color: Color::new(0.0, 0.0, 0.0, 0.0),
            width,
            eraser: true,
        }
    }

    /// Returns the stroke's bounding box, inflated by half the line width.
    ///
    /// Returns `None` for strokes without points.
    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.points.split_first()?;
        let mut bounds = Bounds {
            min_x: first.0,
            min_y: first.1,
            max_x: first.0,
            max_y: first.1,
        };
        for &(x, y) in rest {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        Some(bounds.inflate(self.width / 2.0))
    }
}

/// Axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn inflate(self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Bounding box covering every ink stroke in `strokes`.
///
/// Eraser strokes never extend the drawing, so they are skipped.
pub fn ink_bounds(strokes: &[Stroke]) -> Option<Bounds> {
    strokes
        .iter()
        .filter(|stroke| !stroke.eraser)
        .filter_map(Stroke::bounds)
        .reduce(Bounds::union)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BLACK;

    #[test]
    fn bounds_include_half_the_line_width() {
        let stroke = Stroke::new(vec![(10.0, 10.0), (20.0, 30.0)], BLACK, 4.0);
        let bounds = stroke.bounds().unwrap();
        assert_eq!(bounds.min_x, 8.0);
        assert_eq!(bounds.max_y, 32.0);
    }

    #[test]
    fn ink_bounds_ignore_eraser_and_empty_strokes() {
        let strokes = vec![
            Stroke::new(vec![(0.0, 0.0), (10.0, 10.0)], BLACK, 2.0),
            Stroke::eraser(vec![(-100.0, -100.0)], 20.0),
            Stroke::new(Vec::new(), BLACK, 2.0),
        ];
        let bounds = ink_bounds(&strokes).unwrap();
        assert_eq!(bounds.min_x, -1.0);
        assert_eq!(bounds.max_x, 11.0);
        assert!(ink_bounds(&strokes[1..]).is_none());
    }
}
