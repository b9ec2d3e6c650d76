//! Core of a freehand drawing app.
//!
//! Exposes the tool preference store, the drawing session state machine and
//! the drawing gallery so that a host (UI shell or the `sketchbook` CLI) can
//! drive them against any [`canvas::Canvas`] implementation.

pub mod canvas;
pub mod config;
pub mod draw;
pub mod gallery;
pub mod preferences;
pub mod session;
pub mod tool;
pub mod util;
pub mod workspace;

pub use config::Config;
pub use workspace::Workspace;
