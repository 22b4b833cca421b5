//! Demo runner for crate openings.
//!
//! Builds a world, a partitioned executor, and a weighted reward table,
//! then runs two openings: one floating in front of the actor and driven
//! to natural completion, one anchored to a crate block and fast-forwarded
//! partway through.
//!
//! Set `LOOT_CONFIG` to a JSON file to override the timeline defaults.

use std::sync::Arc;

use eyre::WrapErr as _;
use loot_executor::PartitionedExecutor;
use loot_opening::{
    LogDelivery, OpeningConfig, OpeningServices, OpeningSession, TracingSink, drive_to_completion,
};
use loot_reward::{ActorId, ItemKind, Reward, RewardSource, WeightedTable};
use loot_spatial::{BlockPos, Position, Rotation};
use loot_world::{Actor, IdleMarkers, TracingCues, WorldState};
use tracing::info;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loot_runner=info".parse()?)
                .add_directive("loot_opening=debug".parse()?),
        )
        .init();

    let config = load_config()?;
    config.validate()?;
    info!(
        spins = config.spins_required,
        interval = config.spin_interval,
        delay = config.finish_delay,
        "starting loot runner"
    );

    let table = WeightedTable::new(vec![
        Reward::new("Loaf of Bread", ItemKind::Bread, 60),
        Reward::new("Iron Ingot", ItemKind::IronIngot, 25),
        Reward::new("Gold Ingot", ItemKind::GoldIngot, 10),
        Reward::new("Ender Pearl", ItemKind::EnderPearl, 4),
        Reward::new("Diamond", ItemKind::Diamond, 1),
    ])?;
    let source: Arc<dyn RewardSource> = Arc::new(table);

    let executor = Arc::new(PartitionedExecutor::new(4));
    let world = Arc::new(WorldState::new());
    let markers = Arc::new(IdleMarkers::new());

    let services = OpeningServices {
        executor: Arc::clone(&executor),
        world: Arc::clone(&world),
        markers: Arc::clone(&markers),
        cues: Arc::new(TracingCues),
        delivery: Arc::new(LogDelivery),
        errors: Arc::new(TracingSink),
    };

    let actor = Actor::new(
        ActorId(1),
        Position::new(0.5, 65.62, 0.5),
        Rotation::new(0.0, 0.0),
    );

    // Floating reveal in front of the actor, played out in full.
    let mut session =
        OpeningSession::new(actor, None, Arc::clone(&source), &config, services.clone());
    let ticks = drive_to_completion(&mut session, &executor);
    info!(ticks, reward = %session.reward().name, "unanchored opening finished");

    // Anchored reveal above a crate block, fast-forwarded mid-animation.
    let anchor = BlockPos::new(12, 64, -7);
    world.set_block_height(anchor, 0.875);

    let mut session = OpeningSession::new(actor, Some(anchor), source, &config, services);
    for _ in 0..3 {
        session.on_tick();
    }
    session.insta_roll();
    executor.flush();
    info!(
        reward = %session.reward().name,
        marker_restored = markers.is_visible(anchor),
        "anchored opening fast-forwarded"
    );

    Ok(())
}

fn load_config() -> eyre::Result<OpeningConfig> {
    match std::env::var("LOOT_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("reading config file {path}"))?;
            serde_json::from_str(&raw).wrap_err("parsing opening config")
        }
        Err(_) => Ok(OpeningConfig::default()),
    }
}
