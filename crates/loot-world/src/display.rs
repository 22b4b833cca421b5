//! Transient display entities and the world state that owns them.

use hashbrown::{HashMap, HashSet};
use loot_reward::ItemKind;
use loot_spatial::{BlockPos, ChunkPos, Position};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Handle to a display entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

/// World operation error.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The chunk containing the touched position is not loaded.
    #[error("chunk ({x}, {z}) is not loaded")]
    ChunkUnloaded { x: i32, z: i32 },

    /// The display entity no longer exists. Callers that race a destroy
    /// treat this as "the destroy won", not as a failure.
    #[error("display entity {0:?} is no longer live")]
    Gone(DisplayHandle),
}

/// A transient item entity used to preview a reward.
///
/// Spawned with the fixed flag set a reveal needs: not persisted, label
/// visible, no gravity, never collectible, unlimited lifetime, invulnerable.
#[derive(Clone, Debug)]
pub struct DisplayEntity {
    pub position: Position,
    pub item: Option<ItemKind>,
    pub label: Option<String>,
    pub persistent: bool,
    pub label_visible: bool,
    pub gravity: bool,
    pub collectible: bool,
    pub unlimited_lifetime: bool,
    pub invulnerable: bool,
}

impl DisplayEntity {
    fn new(position: Position) -> Self {
        Self {
            position,
            item: None,
            label: None,
            persistent: false,
            label_visible: true,
            gravity: false,
            collectible: false,
            unlimited_lifetime: true,
            invulnerable: true,
        }
    }
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    displays: HashMap<u64, DisplayEntity>,
    unloaded: HashSet<ChunkPos>,
    block_heights: HashMap<BlockPos, f64>,
}

/// Mutable world state reachable from partition workers.
///
/// Every chunk is loaded until [`WorldState::unload_chunk`] says otherwise;
/// operations touching an unloaded chunk fail with
/// [`WorldError::ChunkUnloaded`].
#[derive(Default)]
pub struct WorldState {
    inner: Mutex<Inner>,
}

/// Bounding height of a block nothing was registered for.
const DEFAULT_BLOCK_HEIGHT: f64 = 1.0;

impl WorldState {
    /// Create an empty world with every chunk loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a chunk as unloaded.
    pub fn unload_chunk(&self, chunk: ChunkPos) {
        self.inner.lock().unloaded.insert(chunk);
    }

    /// Mark a chunk as loaded again.
    pub fn load_chunk(&self, chunk: ChunkPos) {
        self.inner.lock().unloaded.remove(&chunk);
    }

    /// Register the physical bounding height of a block.
    pub fn set_block_height(&self, block: BlockPos, height: f64) {
        self.inner.lock().block_heights.insert(block, height);
    }

    /// Bounding height of the block at the given position.
    ///
    /// Reads physical block state, so it must run on the owning partition.
    pub fn block_height(&self, block: BlockPos) -> Result<f64, WorldError> {
        let inner = self.inner.lock();
        check_loaded(&inner, block.center())?;
        Ok(inner
            .block_heights
            .get(&block)
            .copied()
            .unwrap_or(DEFAULT_BLOCK_HEIGHT))
    }

    /// Spawn a display entity at the given position.
    pub fn spawn_display(&self, at: Position) -> Result<DisplayHandle, WorldError> {
        let mut inner = self.inner.lock();
        check_loaded(&inner, at)?;

        let id = inner.next_id;
        inner.next_id += 1;
        inner.displays.insert(id, DisplayEntity::new(at));

        debug!(id, ?at, "spawned display entity");
        Ok(DisplayHandle(id))
    }

    /// Set the previewed item of a display entity.
    pub fn set_item(&self, handle: DisplayHandle, item: ItemKind) -> Result<(), WorldError> {
        self.with_display(handle, |entity| entity.item = Some(item))
    }

    /// Set the label of a display entity.
    pub fn set_label(&self, handle: DisplayHandle, label: String) -> Result<(), WorldError> {
        self.with_display(handle, |entity| entity.label = Some(label))
    }

    /// Remove a display entity.
    ///
    /// Idempotent: destroying an already-destroyed or never-spawned handle
    /// is a no-op. Teardown can race an in-flight spawn, so the second
    /// destroy must not be an error.
    pub fn destroy(&self, handle: DisplayHandle) -> Result<(), WorldError> {
        let mut inner = self.inner.lock();

        let Some(entity) = inner.displays.get(&handle.0) else {
            return Ok(());
        };
        check_loaded(&inner, entity.position)?;

        inner.displays.remove(&handle.0);
        debug!(id = handle.0, "destroyed display entity");
        Ok(())
    }

    /// Whether the display entity still exists.
    #[must_use]
    pub fn is_live(&self, handle: DisplayHandle) -> bool {
        self.inner.lock().displays.contains_key(&handle.0)
    }

    /// Current position of a display entity, if live.
    #[must_use]
    pub fn display_position(&self, handle: DisplayHandle) -> Option<Position> {
        self.inner
            .lock()
            .displays
            .get(&handle.0)
            .map(|entity| entity.position)
    }

    /// Snapshot of a display entity, if live.
    #[must_use]
    pub fn display(&self, handle: DisplayHandle) -> Option<DisplayEntity> {
        self.inner.lock().displays.get(&handle.0).cloned()
    }

    /// Number of live display entities.
    #[must_use]
    pub fn live_displays(&self) -> usize {
        self.inner.lock().displays.len()
    }

    /// Snapshot of all live display entities.
    #[must_use]
    pub fn displays(&self) -> Vec<(DisplayHandle, DisplayEntity)> {
        self.inner
            .lock()
            .displays
            .iter()
            .map(|(id, entity)| (DisplayHandle(*id), entity.clone()))
            .collect()
    }

    fn with_display(
        &self,
        handle: DisplayHandle,
        mutate: impl FnOnce(&mut DisplayEntity),
    ) -> Result<(), WorldError> {
        let mut inner = self.inner.lock();

        let Some(entity) = inner.displays.get(&handle.0) else {
            return Err(WorldError::Gone(handle));
        };
        check_loaded(&inner, entity.position)?;

        if let Some(entity) = inner.displays.get_mut(&handle.0) {
            mutate(entity);
        }
        Ok(())
    }
}

fn check_loaded(inner: &Inner, at: Position) -> Result<(), WorldError> {
    let chunk = at.chunk();
    if inner.unloaded.contains(&chunk) {
        return Err(WorldError::ChunkUnloaded {
            x: chunk.x,
            z: chunk.z,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_sets_reveal_flags() {
        let world = WorldState::new();
        let handle = world.spawn_display(Position::new(8.5, 65.0, 8.5)).unwrap();

        let entity = world.display(handle).unwrap();
        assert!(!entity.persistent);
        assert!(entity.label_visible);
        assert!(!entity.gravity);
        assert!(!entity.collectible);
        assert!(entity.unlimited_lifetime);
        assert!(entity.invulnerable);
        assert!(entity.item.is_none());
    }

    #[test]
    fn test_spawn_fails_in_unloaded_chunk() {
        let world = WorldState::new();
        world.unload_chunk(ChunkPos::new(0, 0));

        let result = world.spawn_display(Position::new(8.0, 64.0, 8.0));
        assert!(matches!(result, Err(WorldError::ChunkUnloaded { x: 0, z: 0 })));

        // Other chunks are unaffected.
        assert!(world.spawn_display(Position::new(20.0, 64.0, 8.0)).is_ok());
    }

    #[test]
    fn test_update_after_destroy_is_gone() {
        let world = WorldState::new();
        let handle = world.spawn_display(Position::default()).unwrap();

        world.destroy(handle).unwrap();
        let result = world.set_item(handle, ItemKind::Diamond);
        assert!(matches!(result, Err(WorldError::Gone(h)) if h == handle));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let world = WorldState::new();
        let handle = world.spawn_display(Position::default()).unwrap();

        world.destroy(handle).unwrap();
        world.destroy(handle).unwrap();
        assert_eq!(world.live_displays(), 0);
    }

    #[test]
    fn test_set_item_and_label() {
        let world = WorldState::new();
        let handle = world.spawn_display(Position::default()).unwrap();

        world.set_item(handle, ItemKind::Emerald).unwrap();
        world.set_label(handle, "Shiny".to_owned()).unwrap();

        let entity = world.display(handle).unwrap();
        assert_eq!(entity.item, Some(ItemKind::Emerald));
        assert_eq!(entity.label.as_deref(), Some("Shiny"));
    }

    #[test]
    fn test_block_height_default_and_registered() {
        let world = WorldState::new();
        let block = BlockPos::new(4, 64, 4);

        assert_eq!(world.block_height(block).unwrap(), 1.0);

        world.set_block_height(block, 0.875);
        assert_eq!(world.block_height(block).unwrap(), 0.875);
    }
}
