//! Drawing gallery persistence.
//!
//! Stores [`DrawingRecord`]s (stroke blob, title, timestamps, preview image)
//! behind the [`DrawingRepository`] trait. [`FileRepository`] keeps one set of
//! files per drawing in a directory, writes atomically under an advisory lock,
//! and lists drawings newest first.

mod options;
mod storage;

pub use options::{DEFAULT_MAX_DRAWING_BYTES, GalleryOptions, options_from_config};
pub use storage::FileRepository;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A persisted drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingRecord {
    pub id: Uuid,
    pub title: String,
    /// Opaque stroke blob owned by the canvas collaborator
    pub drawing_data: Vec<u8>,
    pub created: DateTime<Utc>,
    /// Never earlier than `created`
    pub modified: DateTime<Utc>,
    /// PNG preview, regenerated on every save
    pub thumbnail: Option<Vec<u8>>,
}

/// Errors raised by the gallery storage.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("drawing {0} not found")]
    NotFound(Uuid),

    #[error("a drawing needs a title other than {title:?}")]
    TitleRequired { title: String },

    #[error("drawing data is {size} bytes which exceeds the limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("gallery storage error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt drawing metadata at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for gallery operations.
pub type GalleryResult<T> = Result<T, GalleryError>;

/// CRUD over persisted drawings.
///
/// All operations are synchronous and act on a single local store.
pub trait DrawingRepository {
    /// Stores a new drawing and returns its id.
    ///
    /// Blank and placeholder titles fail with [`GalleryError::TitleRequired`].
    fn create(&mut self, title: &str, drawing_data: &[u8]) -> GalleryResult<Uuid>;

    /// Replaces the stroke data of `id` and refreshes its modified time.
    ///
    /// A `None` preview keeps the existing thumbnail. Fails with
    /// [`GalleryError::NotFound`] when `id` does not resolve.
    fn update(
        &mut self,
        id: Uuid,
        drawing_data: &[u8],
        thumbnail: Option<&[u8]>,
    ) -> GalleryResult<()>;

    /// Changes the title of `id` and refreshes its modified time.
    ///
    /// Blank and placeholder titles fail with [`GalleryError::TitleRequired`].
    fn rename(&mut self, id: Uuid, title: &str) -> GalleryResult<()>;

    /// Loads one drawing.
    fn fetch(&self, id: Uuid) -> GalleryResult<Option<DrawingRecord>>;

    /// Loads every drawing, most recently modified first.
    fn fetch_all(&self) -> GalleryResult<Vec<DrawingRecord>>;

    /// Removes a drawing. Returns false when it was already gone.
    fn delete(&mut self, id: Uuid) -> GalleryResult<bool>;
}

#[cfg(test)]
mod tests;
