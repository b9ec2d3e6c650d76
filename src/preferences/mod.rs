//! Persistent tool preferences.
//!
//! [`SettingsStore`] keeps the user's [`ToolState`] and the last-opened drawing
//! id in `preferences.toml`, next to `config.toml` in the config directory. It
//! is created once and handed to whoever needs it; there is no global instance.
//!
//! Every key is defaulted on its own, so a file written by an older build (or
//! edited by hand) still loads. Write failures are logged as warnings by
//! [`SettingsStore::save`]; use [`SettingsStore::try_save`] to surface them.

use crate::draw::Color;
use crate::tool::{CanvasTransform, ToolState};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the preferences file inside the storage directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.toml";

/// On-disk layout of the preferences file. Missing keys are filled per field
/// from the store's defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eraser_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eraser_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    toolbar_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zoom_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pan_offset: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_opened_drawing: Option<Uuid>,
}

impl PreferencesFile {
    fn tool_state(&self, defaults: &ToolState) -> ToolState {
        let transform = CanvasTransform::new(
            self.zoom_scale.unwrap_or(defaults.transform.zoom()),
            self.pan_offset
                .map(|[x, y]| (x, y))
                .unwrap_or(defaults.transform.offset()),
        );
        ToolState {
            color: self.color.map(Color::from_channels).unwrap_or(defaults.color),
            line_width: self.line_width.unwrap_or(defaults.line_width),
            eraser_width: self.eraser_width.unwrap_or(defaults.eraser_width),
            eraser_active: self.eraser_active.unwrap_or(defaults.eraser_active),
            toolbar_visible: self.toolbar_visible.unwrap_or(defaults.toolbar_visible),
            transform,
        }
        .sanitized()
    }

    fn set_tool_state(&mut self, state: &ToolState) {
        let (x, y) = state.transform.offset();
        self.color = Some(state.color.to_channels());
        self.line_width = Some(state.line_width);
        self.eraser_width = Some(state.eraser_width);
        self.eraser_active = Some(state.eraser_active);
        self.toolbar_visible = Some(state.toolbar_visible);
        self.zoom_scale = Some(state.transform.zoom());
        self.pan_offset = Some([x, y]);
    }
}

/// Loads and stores tool preferences.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    defaults: ToolState,
}

impl SettingsStore {
    /// Store backed by `path`, defaulting to the built-in tool state.
    pub fn new(path: PathBuf) -> Self {
        Self::with_defaults(path, ToolState::default())
    }

    /// Store backed by `path` with custom defaults (usually from the config file).
    pub fn with_defaults(path: PathBuf, defaults: ToolState) -> Self {
        Self {
            path,
            defaults: defaults.sanitized(),
        }
    }

    /// Store at `preferences.toml` inside `dir`.
    pub fn in_dir(dir: &Path, defaults: ToolState) -> Self {
        Self::with_defaults(dir.join(PREFERENCES_FILE_NAME), defaults)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn defaults(&self) -> &ToolState {
        &self.defaults
    }

    /// Returns the persisted tool state, defaulting each missing key.
    pub fn load(&self) -> ToolState {
        self.read_file().tool_state(&self.defaults)
    }

    /// Persists every tool field, keeping the last-opened drawing id.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&self, state: &ToolState) {
        if let Err(err) = self.try_save(state) {
            warn!("Failed to save preferences: {:#}", err);
        }
    }

    /// Persists every tool field, returning any I/O or serialisation error.
    pub fn try_save(&self, state: &ToolState) -> Result<()> {
        let mut file = self.read_file();
        file.set_tool_state(&state.sanitized());
        self.write_file(&file)
    }

    /// Restores and persists the defaults. Returns them.
    pub fn reset(&self) -> ToolState {
        let defaults = self.defaults;
        self.save(&defaults);
        info!("Preferences reset to defaults");
        defaults
    }

    /// Id of the drawing that was open last, if any.
    pub fn last_opened(&self) -> Option<Uuid> {
        self.read_file().last_opened_drawing
    }

    /// Records (or clears) the last-opened drawing id.
    pub fn set_last_opened(&self, id: Option<Uuid>) {
        let mut file = self.read_file();
        if file.last_opened_drawing == id {
            return;
        }
        file.last_opened_drawing = id;
        if let Err(err) = self.write_file(&file) {
            warn!("Failed to save last opened drawing: {:#}", err);
        }
    }

    fn read_file(&self) -> PreferencesFile {
        if !self.path.exists() {
            debug!(
                "No preferences at {}, using defaults",
                self.path.display()
            );
            return PreferencesFile::default();
        }

        let parsed = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read preferences {}", self.path.display()))
            .and_then(|raw| {
                toml::from_str::<PreferencesFile>(&raw).with_context(|| {
                    format!("failed to parse preferences {}", self.path.display())
                })
            });

        match parsed {
            Ok(file) => file,
            Err(err) => {
                warn!("{:#}; using defaults", err);
                PreferencesFile::default()
            }
        }
    }

    fn write_file(&self, file: &PreferencesFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create preferences directory {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(file).context("failed to serialise preferences")?;
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("failed to write preferences {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move preferences {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        debug!("Preferences written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
