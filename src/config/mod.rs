//! Configuration file support for sketchbook.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/sketchbook/config.toml`. Settings include the tool defaults
//! and where the gallery stores drawings and previews.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, StorageMode};
pub use types::{DrawingConfig, GalleryConfig};

use crate::tool::{self, CanvasTransform, ToolState};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "sketchbook";

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "black"
/// default_line_width = 5.0
/// show_toolbar = true
///
/// [gallery]
/// storage = "auto"
/// thumbnail_size = 200
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Tool defaults (color, widths, toolbar)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Gallery storage and preview settings
    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_line_width`: 1.0 - 50.0
    /// - `default_eraser_width`: 1.0 - 50.0
    /// - `thumbnail_size`: 32 - 1024
    /// - `max_drawing_size_mb`: at least 1
    fn validate_and_clamp(&mut self) {
        let width_range = tool::MIN_LINE_WIDTH..=tool::MAX_LINE_WIDTH;

        if !width_range.contains(&self.drawing.default_line_width) {
            log::warn!(
                "Invalid default_line_width {:.1}, clamping to {:.1}-{:.1} range",
                self.drawing.default_line_width,
                tool::MIN_LINE_WIDTH,
                tool::MAX_LINE_WIDTH
            );
            self.drawing.default_line_width =
                tool::clamp_line_width(self.drawing.default_line_width);
        }

        if !width_range.contains(&self.drawing.default_eraser_width) {
            log::warn!(
                "Invalid default_eraser_width {:.1}, clamping to {:.1}-{:.1} range",
                self.drawing.default_eraser_width,
                tool::MIN_LINE_WIDTH,
                tool::MAX_LINE_WIDTH
            );
            self.drawing.default_eraser_width =
                tool::clamp_line_width(self.drawing.default_eraser_width);
        }

        if !(32..=1024).contains(&self.gallery.thumbnail_size) {
            log::warn!(
                "Invalid thumbnail_size {}, clamping to 32-1024 range",
                self.gallery.thumbnail_size
            );
            self.gallery.thumbnail_size = self.gallery.thumbnail_size.clamp(32, 1024);
        }

        if self.gallery.max_drawing_size_mb == 0 {
            log::warn!("max_drawing_size_mb must be at least 1, using 1");
            self.gallery.max_drawing_size_mb = 1;
        }

        if self.gallery.storage == StorageMode::Custom
            && self
                .gallery
                .custom_directory
                .as_deref()
                .is_none_or(|dir| dir.trim().is_empty())
        {
            log::warn!("gallery.storage = \"custom\" without custom_directory, falling back to auto");
            self.gallery.storage = StorageMode::Auto;
        }
    }

    /// Tool state used before any preference is stored, and after a reset.
    pub fn tool_defaults(&self) -> ToolState {
        ToolState {
            color: self.drawing.default_color.to_color(),
            line_width: self.drawing.default_line_width,
            eraser_width: self.drawing.default_eraser_width,
            eraser_active: false,
            toolbar_visible: self.drawing.show_toolbar,
            transform: CanvasTransform::default(),
        }
        .sanitized()
    }

    /// Returns the directory holding `config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_DIR_NAME))
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/sketchbook/config.toml`.
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the bundled `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists or cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the config file, for editors and tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
