//! RGBA color type and the built-in ink palette.

use serde::{Deserialize, Serialize};

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum). Preferences
/// persist colors as four float channels, see [`Color::to_channels`].
///
/// # Examples
///
/// ```
/// use sketchbook::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// assert_eq!(Color::from_channels(red.to_channels()), red);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the components as `[r, g, b, a]`.
    pub fn to_channels(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_channels([r, g, b, a]: [f64; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Returns a copy with every channel clamped to 0.0-1.0.
    ///
    /// Non-finite channels collapse to 0.0.
    pub fn clamped(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            r: fix(self.r),
            g: fix(self.g),
            b: fix(self.b),
            a: fix(self.a),
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Predefined red color (R=1.0, G=0.0, B=0.0)
pub const RED: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined green color (R=0.0, G=1.0, B=0.0)
pub const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined blue color (R=0.0, G=0.0, B=1.0)
pub const BLUE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined yellow color (R=1.0, G=1.0, B=0.0)
pub const YELLOW: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined orange color (R=1.0, G=0.5, B=0.0)
pub const ORANGE: Color = Color {
    r: 1.0,
    g: 0.5,
    b: 0.0,
    a: 1.0,
};

/// Predefined purple color (R=0.5, G=0.0, B=0.5)
pub const PURPLE: Color = Color {
    r: 0.5,
    g: 0.0,
    b: 0.5,
    a: 1.0,
};

/// Predefined white color, also the thumbnail background
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined black color, the default ink
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_pulls_channels_into_unit_range() {
        let color = Color::new(1.5, -0.2, f64::NAN, 0.5).clamped();
        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn channels_keep_component_order() {
        assert_eq!(ORANGE.to_channels(), [1.0, 0.5, 0.0, 1.0]);
    }
}
