use glam::Vec3;

use super::block::{BlockPos, Face};
use super::world::World;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub block: BlockPos,
    /// Face the ray entered through
    pub face: Face,
    /// Distance along the (normalized) ray
    pub distance: f32,
}

impl RayHit {
    /// Empty cell adjacent to the hit face, where a new block goes
    pub fn placement(&self) -> BlockPos {
        self.block.offset(self.face)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockAction {
    Break,
    Place,
}

/// World mutation a resolved action asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEdit {
    Remove(BlockPos),
    Insert(BlockPos),
}

impl WorldEdit {
    pub fn apply(self, world: &mut World) -> bool {
        match self {
            WorldEdit::Remove(pos) => world.remove(pos),
            WorldEdit::Insert(pos) => world.place(pos),
        }
    }
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Slab test against one block. Returns the entry distance and face.
    ///
    /// Only hits with a strictly positive entry distance count, so a block
    /// containing the origin is never reported.
    pub fn intersect_block(&self, block: BlockPos) -> Option<(f32, Face)> {
        let dir = self.dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let (min, max) = block.bounds();

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut entry_axis = 0;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-8 {
                // parallel to this slab
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                entry_axis = axis;
            }
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_near <= 0.0 {
            return None;
        }
        let face = Face::from_axis(entry_axis, dir[entry_axis] < 0.0);
        Some((t_near, face))
    }

    /// Nearest block hit by the ray; ties keep the first one found
    pub fn cast<I>(&self, blocks: I) -> Option<RayHit>
    where
        I: IntoIterator<Item = BlockPos>,
    {
        let mut best: Option<RayHit> = None;
        for block in blocks {
            if let Some((distance, face)) = self.intersect_block(block) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(RayHit { block, face, distance });
                }
            }
        }
        best
    }
}

/// Resolve a click against the world. `None` when the ray hits nothing.
pub fn resolve(action: BlockAction, ray: &Ray, world: &World) -> Option<WorldEdit> {
    let hit = ray.cast(world.iter())?;
    Some(match action {
        BlockAction::Break => WorldEdit::Remove(hit.block),
        BlockAction::Place => WorldEdit::Insert(hit.placement()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_of(blocks: &[BlockPos]) -> World {
        let mut world = World::new();
        for b in blocks {
            world.place(*b);
        }
        world
    }

    #[test]
    fn test_straight_down_hits_top_face() {
        let world = world_of(&[BlockPos(0, 0, 0)]);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);

        let hit = ray.cast(world.iter()).expect("should hit the block");
        assert_eq!(hit.block, BlockPos(0, 0, 0));
        assert_eq!(hit.face, Face::PosY);
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert_eq!(hit.placement(), BlockPos(0, 1, 0));
    }

    #[test]
    fn test_nearest_block_wins() {
        let world = world_of(&[BlockPos(0, 0, -5), BlockPos(0, 0, -2), BlockPos(0, 0, -9)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);

        let hit = ray.cast(world.iter()).unwrap();
        assert_eq!(hit.block, BlockPos(0, 0, -2));
        assert_eq!(hit.face, Face::PosZ);
    }

    #[test]
    fn test_placement_is_one_unit_along_normal() {
        let block = BlockPos(2, 3, 4);
        let world = world_of(&[block]);
        let origins = [
            (Vec3::new(10.0, 3.0, 4.0), Vec3::NEG_X, Face::PosX),
            (Vec3::new(-10.0, 3.0, 4.0), Vec3::X, Face::NegX),
            (Vec3::new(2.0, 10.0, 4.0), Vec3::NEG_Y, Face::PosY),
            (Vec3::new(2.0, -10.0, 4.0), Vec3::Y, Face::NegY),
            (Vec3::new(2.0, 3.0, 10.0), Vec3::NEG_Z, Face::PosZ),
            (Vec3::new(2.0, 3.0, -10.0), Vec3::Z, Face::NegZ),
        ];
        for (origin, dir, face) in origins {
            let hit = Ray::new(origin, dir).cast(world.iter()).unwrap();
            assert_eq!(hit.face, face);
            let p = hit.placement();
            let delta = glam::IVec3::new(p.0 - block.0, p.1 - block.1, p.2 - block.2);
            assert_eq!(delta, face.normal());
        }
    }

    #[test]
    fn test_oblique_ray_enters_through_side() {
        let world = world_of(&[BlockPos(0, 0, 0)]);
        // shallow downward angle, clearly crosses x = 0.5 before y = 0.5
        let ray = Ray::new(Vec3::new(5.0, 0.6, 0.0), Vec3::new(-1.0, -0.05, 0.0));
        let hit = ray.cast(world.iter()).unwrap();
        assert_eq!(hit.face, Face::PosX);
        assert_eq!(hit.placement(), BlockPos(1, 0, 0));
    }

    #[test]
    fn test_miss_and_degenerate_rays() {
        let world = world_of(&[BlockPos(0, 0, 0)]);
        assert!(Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y).cast(world.iter()).is_none());
        assert!(Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y).cast(world.iter()).is_none());
        assert!(Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO).cast(world.iter()).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::NEG_Y).cast(World::new().iter()).is_none());
    }

    #[test]
    fn test_origin_inside_block_is_skipped() {
        let world = world_of(&[BlockPos(0, 0, 0), BlockPos(0, -3, 0)]);
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Y);
        let hit = ray.cast(world.iter()).unwrap();
        assert_eq!(hit.block, BlockPos(0, -3, 0));
    }

    #[test]
    fn test_resolve_break_and_place() {
        let mut world = world_of(&[BlockPos(0, 0, 0)]);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);

        let place = resolve(BlockAction::Place, &ray, &world).unwrap();
        assert_eq!(place, WorldEdit::Insert(BlockPos(0, 1, 0)));
        assert!(place.apply(&mut world));

        let brk = resolve(BlockAction::Break, &ray, &world).unwrap();
        assert_eq!(brk, WorldEdit::Remove(BlockPos(0, 1, 0)));
        assert!(brk.apply(&mut world));
        assert_eq!(world.len(), 1);

        let empty = World::new();
        assert!(resolve(BlockAction::Break, &ray, &empty).is_none());
    }
}
