//! Port implementations.
//!
//! - `live`: real tracker, terminal, editor and filesystem.
//! - `recording`: wraps a live adapter and writes every call to a cassette.
//! - `replaying`: serves calls from a cassette, for tests and offline runs.

pub(crate) mod calls;
pub mod live;
pub mod recording;
pub mod replaying;
