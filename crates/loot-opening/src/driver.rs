//! Minimal tick driver.
//!
//! The host environment normally owns the tick loop; this drives a single
//! session to completion for the demo binary and tests. One logical
//! thread of control, one `on_tick` per step.

use loot_executor::PartitionedExecutor;

use crate::OpeningSession;

/// Tick a session until it completes, then stop it.
///
/// Flushes the executor around the stop so in-flight display work lands
/// before teardown and the destroy itself has run on return. Returns the
/// number of ticks processed.
pub fn drive_to_completion(session: &mut OpeningSession, executor: &PartitionedExecutor) -> u64 {
    let interval = session.interval().max(1);
    let mut step: u64 = 0;
    let mut ticks: u64 = 0;

    while !session.is_completed() {
        if step % interval == 0 {
            session.on_tick();
            ticks += 1;
        }
        step += 1;
    }

    executor.flush();
    session.stop();
    executor.flush();

    ticks
}
