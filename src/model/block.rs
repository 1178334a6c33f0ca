use glam::{IVec3, Vec3};

/// Integer grid coordinate of a block. The block fills the unit cube centred on it.
#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub struct BlockPos(pub i32, pub i32, pub i32);

impl BlockPos {
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.0 as f32, self.1 as f32, self.2 as f32)
    }

    /// Corners of the block's bounding box (min, max)
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let c = self.center();
        (c - Vec3::splat(0.5), c + Vec3::splat(0.5))
    }

    /// Neighbouring cell across the given face
    pub fn offset(&self, face: Face) -> BlockPos {
        let n = face.normal();
        BlockPos(self.0 + n.x, self.1 + n.y, self.2 + n.z)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        BlockPos(v.x, v.y, v.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::PosX, Face::NegX, Face::PosY, Face::NegY, Face::PosZ, Face::NegZ];

    pub fn normal(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::new(1, 0, 0),
            Face::NegX => IVec3::new(-1, 0, 0),
            Face::PosY => IVec3::new(0, 1, 0),
            Face::NegY => IVec3::new(0, -1, 0),
            Face::PosZ => IVec3::new(0, 0, 1),
            Face::NegZ => IVec3::new(0, 0, -1),
        }
    }

    /// Face on `axis` (0 = X, 1 = Y, 2 = Z) pointing to the positive or negative side
    pub fn from_axis(axis: usize, positive: bool) -> Face {
        match (axis, positive) {
            (0, true) => Face::PosX,
            (0, false) => Face::NegX,
            (1, true) => Face::PosY,
            (1, false) => Face::NegY,
            (2, true) => Face::PosZ,
            _ => Face::NegZ,
        }
    }

    /// Unit-cube corners of this face, counter-clockwise seen from outside
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Face::PosX => [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
            Face::NegX => [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
            Face::PosY => [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
            Face::NegY => [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
            Face::PosZ => [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
            Face::NegZ => [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_follows_normal() {
        let pos = BlockPos(3, -1, 7);
        for face in Face::ALL {
            let n = face.normal();
            assert_eq!(pos.offset(face), BlockPos(3 + n.x, -1 + n.y, 7 + n.z));
        }
    }

    #[test]
    fn test_corners_wind_outward() {
        for face in Face::ALL {
            let c = face.corners().map(Vec3::from);
            let n = (c[1] - c[0]).cross(c[2] - c[0]).normalize();
            assert_eq!(n, face.normal().as_vec3(), "{face:?} winds inward");
        }
    }
}
