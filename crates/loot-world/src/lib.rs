//! World-side services touched by opening sessions.
//!
//! Everything in this crate is shared across partition worker threads and
//! internally locked; callers are expected to reach it from tasks running
//! on the partition that owns the touched position.

pub mod actor;
pub mod cues;
pub mod display;
pub mod markers;

pub use actor::Actor;
pub use cues::{Cue, CueKind, CueSink, Effect, RecordingCues, TracingCues};
pub use display::{DisplayEntity, DisplayHandle, WorldError, WorldState};
pub use markers::IdleMarkers;
