//! Configuration type definitions.

use super::enums::{ColorSpec, StorageMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Provide the tool defaults used when no preference has been stored yet and
/// when the user resets their preferences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, green, blue, yellow, orange, purple, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default pen width (valid range: 1.0 - 50.0)
    #[serde(default = "default_line_width")]
    pub default_line_width: f64,

    /// Default eraser width (valid range: 1.0 - 50.0)
    #[serde(default = "default_eraser_width")]
    pub default_eraser_width: f64,

    /// Show the tool palette when no preference has been stored
    #[serde(default = "default_show_toolbar")]
    pub show_toolbar: bool,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_line_width: default_line_width(),
            default_eraser_width: default_eraser_width(),
            show_toolbar: default_show_toolbar(),
        }
    }
}

/// Gallery storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GalleryConfig {
    /// Where drawings are stored: "auto", "config", or "custom"
    #[serde(default = "default_storage")]
    pub storage: StorageMode,

    /// Directory used when `storage = "custom"` (`~/` is expanded)
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Edge length of the square preview images in pixels (valid range: 32 - 1024)
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Largest stroke blob accepted for a single drawing, in MiB
    #[serde(default = "default_max_drawing_size_mb")]
    pub max_drawing_size_mb: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            custom_directory: None,
            thumbnail_size: default_thumbnail_size(),
            max_drawing_size_mb: default_max_drawing_size_mb(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_line_width() -> f64 {
    crate::tool::DEFAULT_LINE_WIDTH
}

fn default_eraser_width() -> f64 {
    crate::tool::DEFAULT_ERASER_WIDTH
}

fn default_show_toolbar() -> bool {
    true
}

fn default_storage() -> StorageMode {
    StorageMode::Auto
}

fn default_thumbnail_size() -> u32 {
    200
}

fn default_max_drawing_size_mb() -> u64 {
    64
}
