//! Crate-opening sessions.
//!
//! A session animates one reward reveal: the reward is rolled and
//! committed at construction, previews spin on a fixed tick schedule at a
//! resolved world position, and the committed reward is delivered exactly
//! once when the timeline ends. A fast-forward ([`OpeningSession::insta_roll`])
//! reaches the same terminal state as letting the ticks play out.
//!
//! # Timeline
//!
//! ```text
//! tick 0        resolve position, refundable -> false, spin 1
//! tick k*i      spin k+1, preview a fresh roll
//! final spin    preview switches to the committed reward, boom + firework
//! finish delay  counts down to zero
//! stop          deliver committed reward, destroy display, restore marker
//! ```
//!
//! World-touching work (display entity, anchor block reads, cues) is
//! dispatched to the partitioned executor and runs on the worker owning
//! the touched region; the session itself is driven from a single tick
//! thread and needs no locking for its own counters.

pub mod config;
pub mod driver;
pub mod session;
pub mod sinks;

pub use config::{ConfigError, OpeningConfig};
pub use driver::drive_to_completion;
pub use session::{OpeningServices, OpeningSession};
pub use sinks::{
    DeliverySink, ErrorSink, LogDelivery, RecordingDelivery, RecordingSink, TracingSink,
};
