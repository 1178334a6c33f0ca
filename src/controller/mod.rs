// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod movement;
pub mod camera_controller;
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use input::{InputEvent, InputIntent, InputState, KeyBindings, MouseButton};
pub use movement::{CameraState, LockState, MovementIntegrator};
pub use camera_controller::CameraController;
pub use session::Session;
#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
