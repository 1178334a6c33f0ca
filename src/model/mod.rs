// MODEL: World data and geometry queries
pub mod block;
pub mod world;
pub mod raycast;
pub mod camera;

pub use block::{BlockPos, Face};
pub use world::World;
pub use raycast::{resolve, BlockAction, Ray, RayHit, WorldEdit};
pub use camera::Camera;
