//! World positions, block coordinates, and facing directions.

use crate::region::ChunkPos;

/// A position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Translate by the given offset.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Translate along a direction vector.
    #[must_use]
    pub fn step(self, dir: Self) -> Self {
        self.offset(dir.x, dir.y, dir.z)
    }

    /// Get the block containing this position.
    #[must_use]
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    /// Get the chunk coordinates for this position.
    #[must_use]
    pub fn chunk(self) -> ChunkPos {
        self.block().chunk()
    }
}

/// A block coordinate (integer lattice point).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Create a new block coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Center of this block on all three axes.
    #[must_use]
    pub fn center(self) -> Position {
        Position::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }

    /// Center of this block on the horizontal axes only; `y` stays at the
    /// block base, so callers can stack a height on top.
    #[must_use]
    pub fn center_xz(self) -> Position {
        Position::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y),
            f64::from(self.z) + 0.5,
        )
    }

    /// Get the chunk containing this block.
    #[must_use]
    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x.div_euclid(16), self.z.div_euclid(16))
    }
}

/// A facing direction as yaw/pitch in degrees.
///
/// Yaw 0 faces +z, 90 faces -x; pitch is positive looking down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    /// Create a new rotation.
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Unit direction vector for this rotation.
    #[must_use]
    pub fn direction(self) -> Position {
        let yaw = f64::from(self.yaw).to_radians();
        let pitch = f64::from(self.pitch).to_radians();

        Position::new(
            -yaw.sin() * pitch.cos(),
            -pitch.sin(),
            yaw.cos() * pitch.cos(),
        )
    }
}
