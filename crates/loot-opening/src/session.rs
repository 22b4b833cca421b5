//! The opening session state machine.
//!
//! One session drives one reward reveal: a committed reward is rolled at
//! construction, previews spin on a fixed tick schedule, and the committed
//! reward is delivered exactly once at stop. Everything that touches world
//! state (display entity, anchor block, cues) runs as a task on the
//! partition owning the touched position.
//!
//! The tick thread owns the counters; the partition workers only ever see
//! the shared cells: the set-once resolved position, the display-handle
//! slot, and the stop flag. Destroy wins every race: any task finding its
//! handle dead, or the session stopped, backs off silently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use loot_executor::PartitionedExecutor;
use loot_reward::{Reward, RewardSource};
use loot_spatial::{BlockPos, Position};
use loot_world::{Actor, Cue, CueSink, Effect, IdleMarkers, WorldError, WorldState};
use parking_lot::Mutex;
use tracing::debug;

use crate::sinks::{DeliverySink, ErrorSink};
use crate::OpeningConfig;

/// State shared with tasks running on partition workers.
struct Shared {
    /// Reveal position; written once, synchronously for actor-relative
    /// sessions and by a partition task for anchored ones.
    resolved: OnceLock<Position>,
    /// At most one live display entity.
    display: Mutex<Option<loot_world::DisplayHandle>>,
    /// Set at stop, before teardown; in-flight spawn tasks check it and
    /// self-destruct instead of resurrecting the display.
    stopped: AtomicBool,
}

/// Capabilities a session needs from its surroundings.
#[derive(Clone)]
pub struct OpeningServices {
    pub executor: Arc<PartitionedExecutor>,
    pub world: Arc<WorldState>,
    pub markers: Arc<IdleMarkers>,
    pub cues: Arc<dyn CueSink>,
    pub delivery: Arc<dyn DeliverySink>,
    pub errors: Arc<dyn ErrorSink>,
}

/// A single crate-opening reveal timeline.
pub struct OpeningSession {
    actor: Actor,
    anchor: Option<BlockPos>,
    source: Arc<dyn RewardSource>,
    services: OpeningServices,

    committed: Reward,
    spins_required: u32,
    spin_interval: u64,
    display_y_offset: f64,

    finish_delay: u64,
    spin_count: u32,
    tick_count: u64,
    refundable: bool,

    shared: Arc<Shared>,
}

impl OpeningSession {
    /// Start a session for an actor.
    ///
    /// The committed reward is rolled here, once; nothing that happens
    /// afterwards changes what gets delivered. `anchor` binds the reveal
    /// to a crate block; without one the reveal floats in front of the
    /// actor. The config is assumed validated.
    #[must_use]
    pub fn new(
        actor: Actor,
        anchor: Option<BlockPos>,
        source: Arc<dyn RewardSource>,
        config: &OpeningConfig,
        services: OpeningServices,
    ) -> Self {
        let committed = source.roll(actor.id);
        debug!(actor = actor.id.0, reward = %committed.name, "opening started");

        Self {
            actor,
            anchor,
            source,
            services,
            committed,
            spins_required: config.spins_required,
            spin_interval: config.spin_interval,
            display_y_offset: config.display_y_offset,
            finish_delay: config.finish_delay,
            spin_count: 0,
            tick_count: 0,
            refundable: true,
            shared: Arc::new(Shared {
                resolved: OnceLock::new(),
                display: Mutex::new(None),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Tick granularity expected from the driver.
    #[must_use]
    pub const fn interval(&self) -> u64 {
        1
    }

    /// The reward this session will deliver.
    #[must_use]
    pub fn reward(&self) -> &Reward {
        &self.committed
    }

    /// Spins performed so far.
    #[must_use]
    pub fn spin_count(&self) -> u32 {
        self.spin_count
    }

    /// Ticks processed so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Remaining linger ticks after the final spin.
    #[must_use]
    pub fn finish_delay(&self) -> u64 {
        self.finish_delay
    }

    /// Whether the opening can still be refunded. True only until visible
    /// progress begins.
    #[must_use]
    pub fn is_refundable(&self) -> bool {
        self.refundable
    }

    /// Whether the timeline has fully played out.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.spins_completed() && self.finish_delay == 0
    }

    /// Whether the session has stopped processing.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Acquire)
    }

    /// Advance the timeline by one tick.
    pub fn on_tick(&mut self) {
        if self.is_stopped() {
            return;
        }

        if self.spins_completed() {
            if self.finish_delay > 0 {
                self.finish_delay -= 1;
            }
            self.tick_count += 1;
            return;
        }

        if self.tick_count == 0 {
            self.resolve_position();
            self.refundable = false;
        }

        if self.tick_count % self.spin_interval == 0 {
            self.spin();
            self.display_reward();
        }

        self.tick_count += 1;
    }

    /// Fast-forward to the terminal state.
    ///
    /// Skips the remaining spins and linger, shows the committed reward
    /// once if anything was visible yet, and stops. The delivered reward
    /// and final world state are identical to a natural run.
    pub fn insta_roll(&mut self) {
        if self.is_stopped() {
            return;
        }

        self.refundable = false;
        self.spin_count = self.spins_required.saturating_sub(1);
        self.finish_delay = 0;

        self.spin();

        // Only finish the visual part if the animation ever started.
        if self.tick_count > 0 {
            self.display_reward();
        }

        self.stop();
    }

    /// Deliver the committed reward and tear the reveal down.
    ///
    /// Exactly-once: later calls are no-ops. The display entity is
    /// destroyed asynchronously on its owning partition.
    pub fn stop(&mut self) {
        if self.shared.stopped.swap(true, Ordering::AcqRel) {
            return;
        }

        self.services
            .delivery
            .deliver(self.actor.id, self.committed.clone());

        if let Some(handle) = self.shared.display.lock().take() {
            if let Some(at) = self.services.world.display_position(handle) {
                let world = Arc::clone(&self.services.world);
                let errors = Arc::clone(&self.services.errors);
                self.services.executor.submit(at, move || {
                    if let Err(e) = world.destroy(handle) {
                        errors.report(&format!("failed to remove reward display: {e}"));
                    }
                });
            }
        }

        if let Some(anchor) = self.anchor {
            self.services.markers.show(anchor);
        }

        debug!(actor = self.actor.id.0, reward = %self.committed.name, "opening stopped");
    }

    fn spin(&mut self) {
        self.spin_count += 1;
    }

    fn spins_completed(&self) -> bool {
        self.spin_count >= self.spins_required
    }

    /// Resolve where the reveal floats. Runs on the first tick only.
    fn resolve_position(&mut self) {
        match self.anchor {
            None => {
                // Three blocks ahead of the actor's eyes, snapped to the
                // block center. Only reads actor state, so no dispatch.
                let dir = self.actor.rotation.direction();
                let mut point = self.actor.eye;
                for _ in 0..3 {
                    point = point.step(dir);
                }
                let _ = self.shared.resolved.set(point.block().center());
            }
            Some(anchor) => {
                // The anchor's bounding height is physical block state and
                // must be read on the owning partition. Until this task
                // lands, the resolved cell stays empty and display updates
                // skip.
                let shared = Arc::clone(&self.shared);
                let world = Arc::clone(&self.services.world);
                let markers = Arc::clone(&self.services.markers);
                let errors = Arc::clone(&self.services.errors);
                let y_offset = self.display_y_offset.max(0.0);

                self.services.executor.submit(anchor.center(), move || {
                    let height = match world.block_height(anchor) {
                        Ok(height) => height,
                        Err(e) => {
                            errors.report(&format!("failed to resolve display position: {e}"));
                            return;
                        }
                    };

                    markers.hide(anchor);

                    let point = anchor.center_xz().offset(0.0, y_offset + height, 0.0);
                    let _ = shared.resolved.set(point);
                });
            }
        }
    }

    /// One spin's worth of visuals: preview item, label, and cues.
    fn display_reward(&mut self) {
        // Preview a fresh roll for variety until the spins settle; after
        // that only the committed reward is ever shown.
        let reward = if self.spins_completed() {
            self.committed.clone()
        } else {
            self.source.roll(self.actor.id)
        };

        let Some(at) = self.shared.resolved.get().copied() else {
            // Anchored resolution still in flight; nothing to show yet.
            return;
        };

        if self.shared.display.lock().is_none() {
            let shared = Arc::clone(&self.shared);
            let world = Arc::clone(&self.services.world);
            let errors = Arc::clone(&self.services.errors);

            self.services.executor.submit(at, move || {
                match world.spawn_display(at) {
                    Ok(handle) => {
                        let mut slot = shared.display.lock();
                        if shared.stopped.load(Ordering::Acquire) || slot.is_some() {
                            // Teardown, or an earlier spawn, raced this
                            // one; the session keeps at most one display.
                            drop(slot);
                            let _ = world.destroy(handle);
                        } else {
                            *slot = Some(handle);
                        }
                    }
                    Err(e) => errors.report(&format!("failed to spawn reward display: {e}")),
                }
            });
        }

        if let Some(handle) = *self.shared.display.lock() {
            let at = self.services.world.display_position(handle).unwrap_or(at);
            let world = Arc::clone(&self.services.world);
            let errors = Arc::clone(&self.services.errors);
            let item = reward.item;
            let label = reward.name.clone();

            self.services.executor.submit(at, move || {
                // Item and label are guarded independently; a dead handle
                // means a destroy won the race and is not a failure.
                match world.set_item(handle, item) {
                    Ok(()) | Err(WorldError::Gone(_)) => {}
                    Err(e) => errors.report(&format!("failed to set reward display item: {e}")),
                }
                match world.set_label(handle, label) {
                    Ok(()) | Err(WorldError::Gone(_)) => {}
                    Err(e) => errors.report(&format!("failed to set reward display label: {e}")),
                }
            });
        }

        let complete = self.spins_completed();
        let cues = Arc::clone(&self.services.cues);
        self.services.executor.submit(at, move || {
            cues.cue(Cue::click(), at);
            cues.cue(Cue::bell(), at);

            if complete {
                cues.cue(Cue::boom(), at);
                cues.effect(Effect::Firework, at);
            }
        });
    }
}
