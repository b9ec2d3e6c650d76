//! Drawing session lifecycle.
//!
//! A [`DrawingSession`] owns the canvas for one open drawing and tracks whether
//! it is bound to a gallery record and whether it has unsaved edits:
//!
//! ```text
//!   ┌─────┐  edit   ┌───────┐  save   ┌───────┐
//!   │ New ├────────►│ Dirty ├────────►│ Clean │
//!   └──┬──┘         └───┬───┘◄────────┴───┬───┘
//!      │                │        edit     │
//!      │      close (save / discard)      │
//!      └────────────────┼─────────────────┘
//!                       ▼
//!                  ┌────────┐
//!                  │ Closed │
//!                  └────────┘
//! ```
//!
//! Closing a dirty session requires a [`CloseDecision`]; saving a drawing that
//! was never named yields [`SaveOutcome::TitleRequired`] instead of storing it
//! under a placeholder title.

mod state;

pub use state::{
    CloseDecision, CloseOutcome, CloseRequest, DEFAULT_PREVIEW_SIZE, DrawingSession, SaveOutcome,
    SessionError, SessionPhase,
};
