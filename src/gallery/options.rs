use crate::config::{GalleryConfig, StorageMode};
use crate::util::expand_tilde;
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_DRAWING_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Runtime options derived from configuration for the gallery.
#[derive(Debug, Clone)]
pub struct GalleryOptions {
    pub base_dir: PathBuf,
    pub thumbnail_size: u32,
    pub max_drawing_bytes: u64,
}

impl GalleryOptions {
    /// Creates a basic options struct with sensible defaults. Intended mainly for tests.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            thumbnail_size: 200,
            max_drawing_bytes: DEFAULT_MAX_DRAWING_BYTES,
        }
    }

    pub fn drawings_dir(&self) -> PathBuf {
        self.base_dir.join("drawings")
    }

    pub fn lock_file_path(&self) -> PathBuf {
        self.base_dir.join("gallery.lock")
    }
}

/// Build runtime gallery options from configuration values.
pub fn options_from_config(gallery_cfg: &GalleryConfig, config_dir: &Path) -> Result<GalleryOptions> {
    let base_dir = match gallery_cfg.storage {
        StorageMode::Auto => {
            let root = dirs::data_dir().unwrap_or_else(|| config_dir.to_path_buf());
            root.join(crate::config::APP_DIR_NAME)
        }
        StorageMode::Config => config_dir.to_path_buf(),
        StorageMode::Custom => {
            let raw = gallery_cfg.custom_directory.as_ref().ok_or_else(|| {
                anyhow!("gallery.custom_directory must be set when storage = \"custom\"")
            })?;
            let expanded = expand_tilde(raw);
            if expanded.as_os_str().is_empty() {
                return Err(anyhow!(
                    "gallery.custom_directory resolved to an empty path"
                ));
            }
            expanded
        }
    };

    let mut options = GalleryOptions::new(base_dir);
    options.thumbnail_size = gallery_cfg.thumbnail_size.max(1);
    options.max_drawing_bytes = gallery_cfg
        .max_drawing_size_mb
        .saturating_mul(1024 * 1024)
        .max(1);

    Ok(options)
}
