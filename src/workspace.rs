//! Wires configuration, tool preferences and the gallery together for a host.

use crate::canvas::Canvas;
use crate::config::Config;
use crate::gallery::{
    DrawingRecord, DrawingRepository, FileRepository, GalleryResult, options_from_config,
};
use crate::preferences::SettingsStore;
use crate::session::{DrawingSession, SessionError};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use uuid::Uuid;

/// Everything a drawing host needs: config, preference store and gallery.
#[derive(Debug)]
pub struct Workspace {
    config: Config,
    settings: SettingsStore,
    gallery: FileRepository,
}

impl Workspace {
    /// Opens the workspace rooted at the user's config directory.
    pub fn open(config: Config) -> Result<Self> {
        let config_dir = Config::config_dir()?;
        Self::open_at(config, &config_dir)
    }

    /// Opens the workspace with `config_dir` standing in for the config directory.
    pub fn open_at(config: Config, config_dir: &Path) -> Result<Self> {
        let options = options_from_config(&config.gallery, config_dir)?;
        let gallery = FileRepository::open(options).with_context(|| {
            format!("Failed to open drawing gallery for {}", config_dir.display())
        })?;
        let settings = SettingsStore::in_dir(config_dir, config.tool_defaults());
        debug!(
            "Workspace ready (preferences {}, gallery {})",
            settings.path().display(),
            gallery.options().base_dir.display()
        );
        Ok(Self::from_parts(config, settings, gallery))
    }

    pub fn from_parts(config: Config, settings: SettingsStore, gallery: FileRepository) -> Self {
        Self {
            config,
            settings,
            gallery,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn gallery(&self) -> &FileRepository {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut FileRepository {
        &mut self.gallery
    }

    /// Starts an unnamed drawing with the stored tool preferences.
    pub fn new_session<C: Canvas>(&self, canvas: C) -> DrawingSession<C> {
        DrawingSession::new(canvas, self.settings.load())
            .with_preview_size(self.gallery.options().thumbnail_size)
    }

    /// Opens drawing `id` and remembers it as the last opened drawing.
    pub fn open_session<C: Canvas>(
        &self,
        canvas: C,
        id: Uuid,
    ) -> Result<DrawingSession<C>, SessionError> {
        let mut session = self.new_session(canvas);
        session.load(&self.gallery, id)?;
        self.settings.set_last_opened(Some(id));
        Ok(session)
    }

    /// Reopens the last opened drawing, if it still exists.
    ///
    /// A remembered id whose record is gone is forgotten and `None` is returned.
    pub fn resume_last<C: Canvas>(
        &self,
        canvas: C,
    ) -> Result<Option<DrawingSession<C>>, SessionError> {
        let Some(id) = self.settings.last_opened() else {
            return Ok(None);
        };
        match self.open_session(canvas, id) {
            Ok(session) => Ok(Some(session)),
            Err(SessionError::NotFound(_)) => {
                info!("Last opened drawing {} no longer exists", id);
                self.settings.set_last_opened(None);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Persists the session's tool state and remembers its drawing.
    pub fn finish_session<C: Canvas>(&self, session: &DrawingSession<C>) {
        self.settings.save(session.tools());
        if let Some(id) = session.record_id() {
            self.settings.set_last_opened(Some(id));
        }
    }

    pub fn list(&self) -> GalleryResult<Vec<DrawingRecord>> {
        self.gallery.fetch_all()
    }

    pub fn fetch(&self, id: Uuid) -> GalleryResult<Option<DrawingRecord>> {
        self.gallery.fetch(id)
    }

    pub fn rename(&mut self, id: Uuid, title: &str) -> GalleryResult<()> {
        self.gallery.rename(id, title)
    }

    /// Deletes drawing `id`. Returns false when it did not exist.
    pub fn delete(&mut self, id: Uuid) -> GalleryResult<bool> {
        let removed = self.gallery.delete(id)?;
        if self.settings.last_opened() == Some(id) {
            self.settings.set_last_opened(None);
        }
        if !removed {
            warn!("Drawing {} was not in the gallery", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SketchCanvas;
    use crate::config::StorageMode;
    use crate::draw::GREEN;
    use crate::session::SaveOutcome;

    fn open_workspace(temp: &tempfile::TempDir) -> Workspace {
        let mut config = Config::default();
        config.gallery.storage = StorageMode::Config;
        Workspace::open_at(config, temp.path()).unwrap()
    }

    fn saved_drawing(workspace: &mut Workspace, title: &str) -> Uuid {
        let mut session = workspace.new_session(SketchCanvas::new());
        session.edit(|canvas| canvas.draw(vec![(0.0, 0.0), (4.0, 4.0)]));
        match session.save_as(workspace.gallery_mut(), title).unwrap() {
            SaveOutcome::Saved { id, .. } => id,
            SaveOutcome::TitleRequired => panic!("title was supplied"),
        }
    }

    #[test]
    fn finished_session_tools_seed_next_session() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = open_workspace(&temp);

        let mut session = workspace.new_session(SketchCanvas::new());
        session.select_color(GREEN);
        session.set_line_width(12.0);
        workspace.finish_session(&session);

        let next = workspace.new_session(SketchCanvas::new());
        assert_eq!(next.tools().color, GREEN);
        assert_eq!(next.tools().line_width, 12.0);
    }

    #[test]
    fn resume_last_reopens_remembered_drawing() {
        let temp = tempfile::tempdir().unwrap();
        let mut workspace = open_workspace(&temp);
        let id = saved_drawing(&mut workspace, "Pier");

        let session = workspace.open_session(SketchCanvas::new(), id).unwrap();
        workspace.finish_session(&session);

        let resumed = workspace
            .resume_last(SketchCanvas::new())
            .unwrap()
            .expect("last drawing resumed");
        assert_eq!(resumed.record_id(), Some(id));
        assert_eq!(resumed.title(), "Pier");
        assert!(!resumed.is_dirty());
    }

    #[test]
    fn deleting_last_opened_drawing_forgets_it() {
        let temp = tempfile::tempdir().unwrap();
        let mut workspace = open_workspace(&temp);
        let id = saved_drawing(&mut workspace, "Gone soon");
        workspace.open_session(SketchCanvas::new(), id).unwrap();
        assert_eq!(workspace.settings().last_opened(), Some(id));

        assert!(workspace.delete(id).unwrap());
        assert_eq!(workspace.settings().last_opened(), None);
        assert!(workspace.resume_last(SketchCanvas::new()).unwrap().is_none());
        assert!(!workspace.delete(id).unwrap());
    }

    #[test]
    fn stale_last_opened_id_is_cleared_on_resume() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = open_workspace(&temp);
        workspace.settings().set_last_opened(Some(Uuid::new_v4()));

        assert!(workspace.resume_last(SketchCanvas::new()).unwrap().is_none());
        assert_eq!(workspace.settings().last_opened(), None);
    }

    #[test]
    fn list_and_rename_go_through_gallery() {
        let temp = tempfile::tempdir().unwrap();
        let mut workspace = open_workspace(&temp);
        let id = saved_drawing(&mut workspace, "Sketch");

        workspace.rename(id, "Study").unwrap();
        let records = workspace.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Study");
        assert_eq!(workspace.fetch(id).unwrap().unwrap().id, id);
    }
}
