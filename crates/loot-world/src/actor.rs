//! Participant state read by opening sessions.

use loot_reward::ActorId;
use loot_spatial::{Position, Rotation};

/// A participant as seen at session start: identity plus the eye position
/// and facing used to place an actor-relative reveal.
#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub eye: Position,
    pub rotation: Rotation,
}

impl Actor {
    /// Create a new actor snapshot.
    #[must_use]
    pub const fn new(id: ActorId, eye: Position, rotation: Rotation) -> Self {
        Self { id, eye, rotation }
    }
}
