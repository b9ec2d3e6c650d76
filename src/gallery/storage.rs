use super::options::GalleryOptions;
use super::{DrawingRecord, DrawingRepository, GalleryError, GalleryResult};
use crate::util::is_placeholder_title;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const CURRENT_VERSION: u32 = 1;

const META_SUFFIX: &str = "json";
const DATA_SUFFIX: &str = "strokes";
const THUMBNAIL_SUFFIX: &str = "png";

/// Metadata file written next to each stroke blob. Its presence is what makes
/// a drawing exist; data and thumbnail files are written before it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordMeta {
    version: u32,
    id: Uuid,
    title: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    #[serde(default)]
    has_thumbnail: bool,
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Directory-backed drawing repository.
///
/// Layout under `<base_dir>/drawings/`: `<id>.json` (metadata), `<id>.strokes`
/// (stroke blob) and `<id>.png` (thumbnail). `<base_dir>/gallery.lock` is held
/// exclusively while writing and shared while reading.
pub struct FileRepository {
    options: GalleryOptions,
    clock: Clock,
}

impl std::fmt::Debug for FileRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRepository")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FileRepository {
    /// Opens (and creates if needed) the gallery directory.
    pub fn open(options: GalleryOptions) -> GalleryResult<Self> {
        let drawings_dir = options.drawings_dir();
        fs::create_dir_all(&drawings_dir).map_err(io_error(&drawings_dir))?;
        debug!("Gallery opened at {}", options.base_dir.display());
        Ok(Self {
            options,
            clock: Box::new(Utc::now),
        })
    }

    /// Replaces the timestamp source.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &GalleryOptions {
        &self.options
    }

    fn path_for(&self, id: Uuid, suffix: &str) -> PathBuf {
        self.options
            .drawings_dir()
            .join(format!("{}.{}", id.as_hyphenated(), suffix))
    }

    fn check_size(&self, data: &[u8]) -> GalleryResult<()> {
        let size = data.len() as u64;
        if size > self.options.max_drawing_bytes {
            warn!(
                "Drawing data size {} bytes exceeds the configured limit of {} bytes; refusing to store",
                size, self.options.max_drawing_bytes
            );
            return Err(GalleryError::TooLarge {
                size,
                limit: self.options.max_drawing_bytes,
            });
        }
        Ok(())
    }

    fn check_title(&self, title: &str) -> GalleryResult<()> {
        if is_placeholder_title(title) {
            warn!("Refusing to store drawing under placeholder title {:?}", title);
            return Err(GalleryError::TitleRequired {
                title: title.trim().to_string(),
            });
        }
        Ok(())
    }

    fn with_lock<T>(
        &self,
        exclusive: bool,
        op: impl FnOnce() -> GalleryResult<T>,
    ) -> GalleryResult<T> {
        let lock_path = self.options.lock_file_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error(&lock_path))?;

        if exclusive {
            FileExt::lock_exclusive(&lock_file).map_err(io_error(&lock_path))?;
        } else {
            FileExt::lock_shared(&lock_file).map_err(io_error(&lock_path))?;
        }

        let result = op();

        FileExt::unlock(&lock_file).unwrap_or_else(|err| {
            warn!(
                "failed to unlock gallery lock {}: {}",
                lock_path.display(),
                err
            )
        });

        result
    }

    fn read_meta(&self, id: Uuid) -> GalleryResult<Option<RecordMeta>> {
        read_meta_file(&self.path_for(id, META_SUFFIX))
    }

    fn write_meta(&self, meta: &RecordMeta) -> GalleryResult<()> {
        let path = self.path_for(meta.id, META_SUFFIX);
        let json = serde_json::to_vec_pretty(meta).map_err(|source| GalleryError::Corrupt {
            path: path.display().to_string(),
            source,
        })?;
        write_atomic(&path, &json)
    }

    fn load_record(&self, meta: RecordMeta) -> GalleryResult<DrawingRecord> {
        let data_path = self.path_for(meta.id, DATA_SUFFIX);
        let drawing_data = fs::read(&data_path).map_err(io_error(&data_path))?;

        let thumbnail = if meta.has_thumbnail {
            let thumb_path = self.path_for(meta.id, THUMBNAIL_SUFFIX);
            match fs::read(&thumb_path) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    warn!(
                        "Thumbnail for drawing {} unreadable ({}): {}",
                        meta.id,
                        thumb_path.display(),
                        err
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(DrawingRecord {
            id: meta.id,
            title: meta.title,
            drawing_data,
            created: meta.created,
            modified: meta.modified.max(meta.created),
            thumbnail,
        })
    }

    /// Timestamp for a mutation of a record created at `created`.
    fn touch(&self, created: DateTime<Utc>) -> DateTime<Utc> {
        (self.clock)().max(created)
    }

    fn require_meta(&self, id: Uuid, operation: &str) -> GalleryResult<RecordMeta> {
        match self.read_meta(id)? {
            Some(meta) => Ok(meta),
            None => {
                warn!("Cannot {} drawing {}: not found", operation, id);
                Err(GalleryError::NotFound(id))
            }
        }
    }
}

impl DrawingRepository for FileRepository {
    fn create(&mut self, title: &str, drawing_data: &[u8]) -> GalleryResult<Uuid> {
        self.check_title(title)?;
        self.check_size(drawing_data)?;

        self.with_lock(true, || {
            let id = Uuid::new_v4();
            let now = (self.clock)();
            write_atomic(&self.path_for(id, DATA_SUFFIX), drawing_data)?;
            self.write_meta(&RecordMeta {
                version: CURRENT_VERSION,
                id,
                title: title.trim().to_string(),
                created: now,
                modified: now,
                has_thumbnail: false,
            })?;

            info!(
                "Created drawing {} '{}' ({} bytes)",
                id,
                title.trim(),
                drawing_data.len()
            );
            Ok(id)
        })
    }

    fn update(
        &mut self,
        id: Uuid,
        drawing_data: &[u8],
        thumbnail: Option<&[u8]>,
    ) -> GalleryResult<()> {
        self.check_size(drawing_data)?;

        self.with_lock(true, || {
            let mut meta = self.require_meta(id, "update")?;

            write_atomic(&self.path_for(id, DATA_SUFFIX), drawing_data)?;
            if let Some(png) = thumbnail {
                write_atomic(&self.path_for(id, THUMBNAIL_SUFFIX), png)?;
                meta.has_thumbnail = true;
            }
            meta.version = CURRENT_VERSION;
            meta.modified = self.touch(meta.created);
            self.write_meta(&meta)?;

            info!(
                "Updated drawing {} ({} bytes, thumbnail={})",
                id,
                drawing_data.len(),
                thumbnail.is_some()
            );
            Ok(())
        })
    }

    fn rename(&mut self, id: Uuid, title: &str) -> GalleryResult<()> {
        self.check_title(title)?;
        self.with_lock(true, || {
            let mut meta = self.require_meta(id, "rename")?;
            meta.title = title.trim().to_string();
            meta.modified = self.touch(meta.created);
            self.write_meta(&meta)?;
            info!("Renamed drawing {} to '{}'", id, meta.title);
            Ok(())
        })
    }

    fn fetch(&self, id: Uuid) -> GalleryResult<Option<DrawingRecord>> {
        self.with_lock(false, || match self.read_meta(id)? {
            Some(meta) => self.load_record(meta).map(Some),
            None => {
                debug!("Drawing {} not present", id);
                Ok(None)
            }
        })
    }

    fn fetch_all(&self) -> GalleryResult<Vec<DrawingRecord>> {
        self.with_lock(false, || {
            let dir = self.options.drawings_dir();
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(io_error(&dir)(err)),
            };

            let mut records = Vec::new();
            for entry in entries {
                let path = entry.map_err(io_error(&dir))?.path();
                if !path.is_file()
                    || path.extension().and_then(|ext| ext.to_str()) != Some(META_SUFFIX)
                {
                    continue;
                }

                let meta = match read_meta_file(&path) {
                    Ok(Some(meta)) => meta,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!("Skipping drawing: {}", err);
                        continue;
                    }
                };

                match self.load_record(meta) {
                    Ok(record) => records.push(record),
                    Err(err) => warn!("Skipping drawing: {}", err),
                }
            }

            records.sort_by(|a, b| {
                b.modified
                    .cmp(&a.modified)
                    .then_with(|| b.created.cmp(&a.created))
                    .then_with(|| a.id.cmp(&b.id))
            });
            debug!("Listed {} drawings", records.len());
            Ok(records)
        })
    }

    fn delete(&mut self, id: Uuid) -> GalleryResult<bool> {
        self.with_lock(true, || {
            let meta_path = self.path_for(id, META_SUFFIX);
            if !meta_path.exists() {
                debug!("Drawing {} already absent; nothing to delete", id);
                return Ok(false);
            }

            fs::remove_file(&meta_path).map_err(io_error(&meta_path))?;
            for suffix in [DATA_SUFFIX, THUMBNAIL_SUFFIX] {
                remove_file_if_exists(&self.path_for(id, suffix))?;
            }

            info!("Deleted drawing {}", id);
            Ok(true)
        })
    }
}

fn read_meta_file(path: &Path) -> GalleryResult<Option<RecordMeta>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(path)(err)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| GalleryError::Corrupt {
            path: path.display().to_string(),
            source,
        })
}

fn remove_file_if_exists(path: &Path) -> GalleryResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_error(path)(err)),
    }
}

/// Writes `bytes` to a sibling temp file, syncs it, then renames over `target`.
fn write_atomic(target: &Path, bytes: &[u8]) -> GalleryResult<()> {
    let tmp_path = temp_path(target);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .map_err(io_error(&tmp_path))?;
        tmp_file.write_all(bytes).map_err(io_error(&tmp_path))?;
        tmp_file.sync_all().map_err(io_error(&tmp_path))?;
    }

    fs::rename(&tmp_path, target).map_err(|err| {
        fs::remove_file(&tmp_path).ok();
        io_error(target)(err)
    })
}

fn temp_path(target: &Path) -> PathBuf {
    let base = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut candidate = target.with_file_name(format!("{base}.tmp"));
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_file_name(format!("{base}.tmp{counter}"));
    }
    candidate
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> GalleryError + '_ {
    move |source| GalleryError::Io {
        path: path.display().to_string(),
        source,
    }
}
