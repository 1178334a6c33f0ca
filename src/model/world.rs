use std::collections::HashSet;

use super::block::BlockPos;

/// Sparse set of placed blocks keyed by grid coordinate.
///
/// `revision` changes exactly when membership changes so the renderer knows
/// when to rebuild geometry.
#[derive(Debug, Default, Clone)]
pub struct World {
    blocks: HashSet<BlockPos>,
    revision: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Square floor of `size` x `size` blocks at y = 0, centred on the origin
    pub fn flat(size: i32) -> Self {
        let mut world = Self::new();
        let half = size / 2;
        for x in -half..size - half {
            for z in -half..size - half {
                world.place(BlockPos(x, 0, z));
            }
        }
        world
    }

    /// Returns true if the block was not there before
    pub fn place(&mut self, pos: BlockPos) -> bool {
        let inserted = self.blocks.insert(pos);
        if inserted {
            self.revision += 1;
        }
        inserted
    }

    /// Returns true if a block was removed
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        let removed = self.blocks.remove(&pos);
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn exists(&self, pos: BlockPos) -> bool {
        self.blocks.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.blocks.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_then_remove_restores_world() {
        let mut world = World::flat(4);
        let before: HashSet<_> = world.iter().collect();

        let pos = BlockPos(0, 1, 0);
        assert!(world.place(pos));
        assert!(world.exists(pos));
        assert!(world.remove(pos));

        let after: HashSet<_> = world.iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut world = World::new();
        let pos = BlockPos(5, 2, -3);
        assert!(world.place(pos));
        let rev = world.revision();
        assert!(!world.place(pos));
        assert_eq!(world.len(), 1);
        assert_eq!(world.revision(), rev, "no-op place must not bump the revision");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut world = World::new();
        assert!(!world.remove(BlockPos(1, 1, 1)));
        assert!(world.is_empty());
        assert_eq!(world.revision(), 0);
    }

    #[test]
    fn test_flat_floor_layout() {
        let world = World::flat(32);
        assert_eq!(world.len(), 32 * 32);
        assert!(world.exists(BlockPos(-16, 0, -16)));
        assert!(world.exists(BlockPos(15, 0, 15)));
        assert!(!world.exists(BlockPos(16, 0, 0)));
        assert!(world.iter().all(|p| p.1 == 0));
    }
}
