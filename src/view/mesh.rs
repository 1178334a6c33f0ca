use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::model::{BlockPos, Face, World};

/// Grass tint shared by every block
const BLOCK_COLOR: [f32; 4] = [0.36, 0.62, 0.24, 1.0];
const OUTLINE_COLOR: [f32; 4] = [1.0, 1.0, 0.3, 1.0];

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Every exposed block face as two triangles. Faces touching a
    /// neighbouring block are skipped.
    pub fn from_world(world: &World) -> Self {
        let mut mesh = Self::empty();
        for pos in world.iter() {
            for face in Face::ALL {
                if !world.exists(pos.offset(face)) {
                    mesh.push_face(pos, face);
                }
            }
        }
        mesh
    }

    fn push_face(&mut self, pos: BlockPos, face: Face) {
        let base = self.vertices.len() as u32;
        let center = pos.center();
        let normal = face.normal().as_vec3().to_array();
        for corner in face.corners() {
            self.vertices.push(Vertex {
                pos: [center.x + corner[0], center.y + corner[1], center.z + corner[2]],
                normal,
                color: BLOCK_COLOR,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Line-list cube around the origin, slightly larger than a block so it
/// does not z-fight with the block's faces
pub fn create_outline_mesh() -> Mesh {
    let s = 0.502;
    let normal = [0.0, 1.0, 0.0];
    let vertices = [
        [-s, -s, -s], [s, -s, -s], [s, s, -s], [-s, s, -s],
        [-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s],
    ]
    .into_iter()
    .map(|pos| Vertex { pos, normal, color: OUTLINE_COLOR })
    .collect();
    let indices = vec![
        0, 1, 1, 2, 2, 3, 3, 0, // back
        4, 5, 5, 6, 6, 7, 7, 4, // front
        0, 4, 1, 5, 2, 6, 3, 7, // sides
    ];

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block_has_six_faces() {
        let mut world = World::new();
        world.place(BlockPos(0, 0, 0));
        let mesh = Mesh::from_world(&world);
        assert_eq!(mesh.vertices.len(), 6 * 4);
        assert_eq!(mesh.indices.len(), 6 * 6);
    }

    #[test]
    fn test_shared_faces_are_culled() {
        let mut world = World::new();
        world.place(BlockPos(0, 0, 0));
        world.place(BlockPos(1, 0, 0));
        let mesh = Mesh::from_world(&world);
        assert_eq!(mesh.indices.len(), 10 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_floor_mesh_size() {
        let world = World::flat(4);
        let mesh = Mesh::from_world(&world);
        // top + bottom of every block, plus the perimeter sides
        let faces = 16 * 2 + 4 * 4;
        assert_eq!(mesh.vertices.len(), faces * 4);
        assert!(Mesh::from_world(&World::new()).is_empty());
    }

    #[test]
    fn test_vertices_sit_on_block_bounds() {
        let mut world = World::new();
        world.place(BlockPos(3, -2, 5));
        let mesh = Mesh::from_world(&world);
        for v in &mesh.vertices {
            assert!((v.pos[0] - 3.0).abs() == 0.5);
            assert!((v.pos[1] + 2.0).abs() == 0.5);
            assert!((v.pos[2] - 5.0).abs() == 0.5);
        }
    }
}
