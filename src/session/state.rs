use crate::canvas::{Canvas, CanvasError, CanvasEvents};
use crate::draw::Color;
use crate::gallery::{DrawingRepository, GalleryError};
use crate::tool::ToolState;
use crate::util::{DEFAULT_TITLE, is_placeholder_title};
use log::{debug, info, warn};
use thiserror::Error;
use uuid::Uuid;

/// Edge length of generated previews unless configured otherwise.
pub const DEFAULT_PREVIEW_SIZE: u32 = 200;

/// Lifecycle phase of a drawing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not bound to a record and not edited yet
    New,
    /// Has edits that are not persisted
    Dirty,
    /// Bound to a record and matches it
    Clean,
    /// Terminal; the session no longer accepts edits or saves
    Closed,
}

/// Errors raised by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the drawing session is closed")]
    Closed,

    #[error("drawing {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

/// Result of [`DrawingSession::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The drawing was written; `created` is true when a new record was made.
    Saved { id: Uuid, created: bool },
    /// The drawing has never been named; ask the user for a title first.
    TitleRequired,
}

/// Result of [`DrawingSession::request_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    /// Nothing was pending; the session is now closed.
    Closed,
    /// There are unsaved edits; the caller must pick a [`CloseDecision`].
    ConfirmUnsaved { title_required: bool },
}

/// What to do with unsaved edits when closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseDecision {
    /// Save (optionally naming the drawing first), then close.
    Save { title: Option<String> },
    /// Drop the edits and close.
    Discard,
}

/// Result of [`DrawingSession::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The session is closed; `saved` holds the record written on the way out.
    Closed { saved: Option<Uuid> },
    /// Saving needs a title; the session stays open.
    TitleRequired,
}

/// One open drawing: its canvas, its tool state, and its save state.
#[derive(Debug)]
pub struct DrawingSession<C: Canvas> {
    canvas: C,
    record_id: Option<Uuid>,
    title: String,
    /// Title as last persisted, for bound sessions
    saved_title: Option<String>,
    dirty: bool,
    closed: bool,
    tools: ToolState,
    preview_size: u32,
}

impl<C: Canvas> DrawingSession<C> {
    /// Starts a new, unnamed drawing on `canvas`.
    pub fn new(mut canvas: C, tools: ToolState) -> Self {
        let tools = tools.sanitized();
        canvas.apply_tool(&tools.active_tool());
        Self {
            canvas,
            record_id: None,
            title: DEFAULT_TITLE.to_string(),
            saved_title: None,
            dirty: false,
            closed: false,
            tools,
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }

    /// Sets the edge length of previews rendered on save.
    pub fn with_preview_size(mut self, size: u32) -> Self {
        self.preview_size = size.max(1);
        self
    }

    pub fn phase(&self) -> SessionPhase {
        if self.closed {
            SessionPhase::Closed
        } else if self.dirty {
            SessionPhase::Dirty
        } else if self.record_id.is_some() {
            SessionPhase::Clean
        } else {
            SessionPhase::New
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn record_id(&self) -> Option<Uuid> {
        self.record_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Direct canvas access for hosts that report changes through [`CanvasEvents`].
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Runs a stroke edit against the canvas and marks the session dirty.
    pub fn edit<R>(&mut self, op: impl FnOnce(&mut C) -> R) -> R {
        let result = op(&mut self.canvas);
        self.mark_dirty();
        result
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    /// Loads record `id` into the canvas and binds the session to it.
    ///
    /// If the stroke data cannot be decoded the canvas is left empty, the
    /// session becomes an unbound new drawing, and the decode error is returned.
    pub fn load<R: DrawingRepository>(&mut self, repo: &R, id: Uuid) -> Result<(), SessionError> {
        self.ensure_open()?;

        let Some(record) = repo.fetch(id)? else {
            warn!("Cannot open drawing {}: not found", id);
            return Err(SessionError::NotFound(id));
        };

        if let Err(err) = self.canvas.decode(&record.drawing_data) {
            warn!("Drawing {} could not be decoded: {}", id, err);
            self.record_id = None;
            self.saved_title = None;
            self.title = DEFAULT_TITLE.to_string();
            self.dirty = false;
            return Err(err.into());
        }

        self.canvas.apply_tool(&self.tools.active_tool());
        self.record_id = Some(id);
        self.saved_title = Some(record.title.clone());
        self.title = record.title;
        self.dirty = false;
        info!("Opened drawing {} '{}'", id, self.title);
        Ok(())
    }

    /// Records that strokes or metadata changed. Idempotent.
    pub fn mark_dirty(&mut self) {
        if self.closed {
            return;
        }
        if !self.dirty {
            debug!("Session has unsaved changes");
        }
        self.dirty = true;
    }

    /// Renames the working drawing. Marks dirty when the title changes.
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        if self.closed || title == self.title {
            return;
        }
        self.title = title.to_string();
        self.mark_dirty();
    }

    /// Persists the drawing.
    ///
    /// A drawing that was never saved needs a real title first; with an empty
    /// or placeholder title nothing is written and
    /// [`SaveOutcome::TitleRequired`] is returned. Otherwise the strokes are
    /// encoded, a preview is rendered (a failed preview is logged and skipped),
    /// and the record is created or updated.
    pub fn save<R: DrawingRepository>(&mut self, repo: &mut R) -> Result<SaveOutcome, SessionError> {
        self.ensure_open()?;

        if self.record_id.is_none() && is_placeholder_title(&self.title) {
            debug!("Save requested for an unnamed drawing; title required");
            return Ok(SaveOutcome::TitleRequired);
        }

        let blob = self.canvas.encode()?;
        let preview = match self.canvas.render_preview(self.preview_size) {
            Ok(png) => Some(png),
            Err(err) => {
                warn!("Failed to render preview, saving without it: {}", err);
                None
            }
        };

        let (id, created) = match self.record_id {
            None => {
                let id = repo.create(&self.title, &blob)?;
                // Bind before the preview write so a retry updates instead of duplicating.
                self.record_id = Some(id);
                self.saved_title = Some(self.title.clone());
                if let Some(png) = preview.as_deref() {
                    repo.update(id, &blob, Some(png))?;
                }
                (id, true)
            }
            Some(id) => {
                if is_placeholder_title(&self.title) {
                    if let Some(saved) = &self.saved_title {
                        self.title = saved.clone();
                    }
                } else if self.saved_title.as_deref() != Some(self.title.as_str()) {
                    repo.rename(id, &self.title)?;
                    self.saved_title = Some(self.title.clone());
                }
                repo.update(id, &blob, preview.as_deref())?;
                (id, false)
            }
        };

        self.dirty = false;
        info!(
            "Saved drawing {} '{}' ({} bytes, new={})",
            id,
            self.title,
            blob.len(),
            created
        );
        Ok(SaveOutcome::Saved { id, created })
    }

    /// Names the drawing, then saves it.
    pub fn save_as<R: DrawingRepository>(
        &mut self,
        repo: &mut R,
        title: &str,
    ) -> Result<SaveOutcome, SessionError> {
        self.ensure_open()?;
        self.set_title(title);
        self.save(repo)
    }

    /// Replaces the drawing with an empty one.
    pub fn clear(&mut self) {
        if self.closed {
            return;
        }
        self.canvas.clear();
        self.mark_dirty();
    }

    /// Steps back in the canvas history. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.closed || !self.canvas.undo() {
            return false;
        }
        self.mark_dirty();
        true
    }

    /// Steps forward in the canvas history. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if self.closed || !self.canvas.redo() {
            return false;
        }
        self.mark_dirty();
        true
    }

    fn sync_tool(&mut self) {
        self.canvas.apply_tool(&self.tools.active_tool());
    }

    /// Picks a pen color, leaving eraser mode.
    pub fn select_color(&mut self, color: Color) {
        self.tools.select_color(color);
        self.sync_tool();
    }

    /// Sets the active tool's width. Returns the clamped value.
    pub fn set_line_width(&mut self, width: f64) -> f64 {
        let applied = self.tools.set_line_width(width);
        self.sync_tool();
        applied
    }

    pub fn activate_eraser(&mut self) {
        self.tools.activate_eraser();
        self.sync_tool();
    }

    pub fn deactivate_eraser(&mut self) {
        self.tools.deactivate_eraser();
        self.sync_tool();
    }

    pub fn toggle_eraser(&mut self) -> bool {
        let active = self.tools.toggle_eraser();
        self.sync_tool();
        active
    }

    pub fn set_toolbar_visible(&mut self, visible: bool) {
        self.tools.toolbar_visible = visible;
    }

    /// Sets the zoom scale. Returns the clamped value.
    pub fn zoom_to(&mut self, scale: f64) -> f64 {
        self.tools.transform.set_zoom(scale)
    }

    /// Scales the zoom by `factor`. Returns the clamped value.
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        self.tools.transform.zoom_by(factor)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.tools.transform.pan_by(dx, dy);
    }

    pub fn reset_view(&mut self) {
        self.tools.transform.reset();
    }

    /// Asks to close the session.
    ///
    /// Closes immediately unless there are unsaved edits, in which case the
    /// caller must follow up with [`DrawingSession::close`].
    pub fn request_close(&mut self) -> CloseRequest {
        if self.closed {
            return CloseRequest::Closed;
        }
        if self.dirty {
            let title_required = self.record_id.is_none() && is_placeholder_title(&self.title);
            return CloseRequest::ConfirmUnsaved { title_required };
        }
        self.closed = true;
        debug!("Session closed without pending changes");
        CloseRequest::Closed
    }

    /// Closes the session, saving or discarding pending edits.
    ///
    /// When saving needs a title that was not supplied, returns
    /// [`CloseOutcome::TitleRequired`] and keeps the session open.
    pub fn close<R: DrawingRepository>(
        &mut self,
        repo: &mut R,
        decision: CloseDecision,
    ) -> Result<CloseOutcome, SessionError> {
        if self.closed {
            return Ok(CloseOutcome::Closed { saved: None });
        }

        match decision {
            CloseDecision::Discard => {
                if self.dirty {
                    info!("Discarding unsaved changes to '{}'", self.title);
                }
                self.closed = true;
                Ok(CloseOutcome::Closed { saved: None })
            }
            CloseDecision::Save { title } => {
                if let Some(title) = title {
                    self.set_title(&title);
                }
                match self.save(repo)? {
                    SaveOutcome::TitleRequired => Ok(CloseOutcome::TitleRequired),
                    SaveOutcome::Saved { id, .. } => {
                        self.closed = true;
                        Ok(CloseOutcome::Closed { saved: Some(id) })
                    }
                }
            }
        }
    }
}

impl<C: Canvas> CanvasEvents for DrawingSession<C> {
    fn strokes_changed(&mut self) {
        self.mark_dirty();
    }
}
