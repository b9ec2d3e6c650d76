//! Utility functions for color names, paths, and titles.
//!
//! This module provides:
//! - Name-to-color mapping for the config file palette
//! - Tilde expansion for user-supplied directories
//! - Title normalisation shared by the session and gallery

use crate::draw::{Color, color::*};
use std::path::PathBuf;

/// Title given to drawings that have not been named yet.
pub const DEFAULT_TITLE: &str = "Untitled";

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color names to palette colors (case-insensitive).
///
/// # Supported Names
/// red, green, blue, yellow, orange, purple, white, black
///
/// # Returns
/// - `Some(Color)` if the name matches a palette entry
/// - `None` otherwise
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "purple" => Some(PURPLE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Maps a Color value to its human-readable name.
///
/// Uses approximate matching (threshold-based) to identify colors. Used by the
/// CLI when printing the stored tool state.
pub fn color_to_name(color: &Color) -> &'static str {
    if color.r > 0.9 && color.g < 0.1 && color.b < 0.1 {
        "Red"
    } else if color.r < 0.1 && color.g > 0.9 && color.b < 0.1 {
        "Green"
    } else if color.r < 0.1 && color.g < 0.1 && color.b > 0.9 {
        "Blue"
    } else if color.r > 0.9 && color.g > 0.9 && color.b < 0.1 {
        "Yellow"
    } else if color.r > 0.9 && (0.4..=0.6).contains(&color.g) && color.b < 0.1 {
        "Orange"
    } else if (0.4..=0.6).contains(&color.r) && color.g < 0.1 && (0.4..=0.6).contains(&color.b) {
        "Purple"
    } else if color.r > 0.9 && color.g > 0.9 && color.b > 0.9 {
        "White"
    } else if color.r < 0.1 && color.g < 0.1 && color.b < 0.1 {
        "Black"
    } else {
        "Custom"
    }
}

// ============================================================================
// Paths and titles
// ============================================================================

/// Expands a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Returns true when a title still needs to be chosen by the user.
///
/// Blank titles and the placeholder [`DEFAULT_TITLE`] both count as unnamed.
pub fn is_placeholder_title(title: &str) -> bool {
    let trimmed = title.trim();
    trimmed.is_empty() || trimmed == DEFAULT_TITLE
}
