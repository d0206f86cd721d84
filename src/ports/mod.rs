//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the command core and an
//! external system (the bug tracker, the terminal, an editor, files).
//! Implementations live in `src/adapters/`.

pub mod editor;
pub mod filesystem;
pub mod tracker;
pub mod ui;

pub use editor::Editor;
pub use filesystem::FileSystem;
pub use tracker::BugTracker;
pub use ui::Ui;
