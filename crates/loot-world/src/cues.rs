//! Audio cues and visual flourishes for the reveal.
//!
//! The session fires cues at a position; what a cue sounds like is up to
//! the sink. Volumes follow the reveal design: spin cues at half volume,
//! the completion boom slightly louder.

use loot_spatial::Position;
use parking_lot::Mutex;
use tracing::debug;

/// Kind of audio cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueKind {
    /// UI click accompanying every spin.
    Click,
    /// Bell chime accompanying every spin.
    Bell,
    /// Explosion played once the final reward is revealed.
    Boom,
}

/// An audio cue with a playback volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cue {
    pub kind: CueKind,
    pub volume: f32,
}

impl Cue {
    /// Create a cue with an explicit volume.
    #[must_use]
    pub const fn new(kind: CueKind, volume: f32) -> Self {
        Self { kind, volume }
    }

    /// Spin click cue.
    #[must_use]
    pub const fn click() -> Self {
        Self::new(CueKind::Click, 0.5)
    }

    /// Spin bell cue.
    #[must_use]
    pub const fn bell() -> Self {
        Self::new(CueKind::Bell, 0.5)
    }

    /// Completion boom cue.
    #[must_use]
    pub const fn boom() -> Self {
        Self::new(CueKind::Boom, 0.7)
    }
}

/// Visual flourish effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Celebratory firework at the reveal position.
    Firework,
}

/// Receives cues and effects fired by a session.
pub trait CueSink: Send + Sync {
    /// Play an audio cue at a position.
    fn cue(&self, cue: Cue, at: Position);

    /// Trigger a visual effect at a position.
    fn effect(&self, effect: Effect, at: Position);
}

/// Sink that logs cues at debug level.
#[derive(Default)]
pub struct TracingCues;

impl CueSink for TracingCues {
    fn cue(&self, cue: Cue, at: Position) {
        debug!(kind = ?cue.kind, volume = cue.volume, ?at, "cue");
    }

    fn effect(&self, effect: Effect, at: Position) {
        debug!(?effect, ?at, "effect");
    }
}

/// Sink that records every cue and effect, for tests.
#[derive(Default)]
pub struct RecordingCues {
    cues: Mutex<Vec<(Cue, Position)>>,
    effects: Mutex<Vec<(Effect, Position)>>,
}

impl RecordingCues {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues recorded so far.
    #[must_use]
    pub fn cues(&self) -> Vec<(Cue, Position)> {
        self.cues.lock().clone()
    }

    /// All effects recorded so far.
    #[must_use]
    pub fn effects(&self) -> Vec<(Effect, Position)> {
        self.effects.lock().clone()
    }

    /// Number of cues of a given kind.
    #[must_use]
    pub fn count(&self, kind: CueKind) -> usize {
        self.cues.lock().iter().filter(|(c, _)| c.kind == kind).count()
    }
}

impl CueSink for RecordingCues {
    fn cue(&self, cue: Cue, at: Position) {
        self.cues.lock().push((cue, at));
    }

    fn effect(&self, effect: Effect, at: Position) {
        self.effects.lock().push((effect, at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_volumes() {
        assert_eq!(Cue::click().volume, 0.5);
        assert_eq!(Cue::bell().volume, 0.5);
        assert_eq!(Cue::boom().volume, 0.7);
    }

    #[test]
    fn test_recording_sink_counts() {
        let sink = RecordingCues::new();
        let at = Position::new(1.0, 2.0, 3.0);

        sink.cue(Cue::click(), at);
        sink.cue(Cue::bell(), at);
        sink.cue(Cue::click(), at);
        sink.effect(Effect::Firework, at);

        assert_eq!(sink.count(CueKind::Click), 2);
        assert_eq!(sink.count(CueKind::Bell), 1);
        assert_eq!(sink.count(CueKind::Boom), 0);
        assert_eq!(sink.effects().len(), 1);
    }
}
