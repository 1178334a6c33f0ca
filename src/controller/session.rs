use tracing::{debug, info};

use crate::config::GameConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::input::{InputEvent, InputState};
use crate::controller::movement::{CameraState, LockState, MovementIntegrator};
use crate::model::{self, BlockAction, BlockPos, Camera, RayHit, World, WorldEdit};

/// Everything one play session owns: world, camera, input and lock state.
///
/// Host event handlers call [`Session::apply_event`]; the frame loop calls
/// [`Session::frame`] once per rendered frame.
pub struct Session {
    pub world: World,
    pub player: CameraState,
    pub camera: Camera,
    pub input: InputState,
    lock: LockState,
    integrator: MovementIntegrator,
    controller: CameraController,
    max_frame_dt: f32,
}

impl Session {
    pub fn new(config: &GameConfig, width: u32, height: u32) -> Self {
        let mut camera = Camera::new(width, height);
        camera.eye = config.spawn_eye;
        camera.set_look_at(config.spawn_look_at);

        let world = World::flat(config.world.floor_size);
        info!(blocks = world.len(), "generated starter floor");

        Self {
            world,
            player: CameraState::at(config.spawn_eye),
            camera,
            input: InputState::new(),
            lock: LockState::Unlocked,
            integrator: MovementIntegrator::new(&config.movement),
            controller: CameraController::new(&config.look),
            max_frame_dt: config.movement.max_frame_dt,
        }
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn is_locked(&self) -> bool {
        self.lock == LockState::Locked
    }

    pub fn apply_event(&mut self, event: &InputEvent) {
        if let InputEvent::PointerLockChanged { locked } = event {
            let next = if *locked { LockState::Locked } else { LockState::Unlocked };
            if next != self.lock {
                info!(?next, "pointer lock changed");
                self.lock = next;
            }
        }
        self.input.process_event(event);
    }

    /// Run one frame of simulation
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, self.max_frame_dt);

        let (dx, dy) = self.input.consume_look();
        if self.is_locked() {
            self.controller.apply_look(&mut self.camera, dx, dy);
        }

        for action in self.input.take_actions() {
            if self.is_locked() {
                self.interact(action);
            }
        }

        self.integrator.step(
            &mut self.player,
            &self.input.intent,
            self.lock,
            self.camera.forward_flat(),
            self.camera.right_flat(),
            dt,
        );
        self.camera.eye = self.player.position;

        self.input.end_frame();
    }

    /// Resolve one break/place click along the current view ray
    pub fn interact(&mut self, action: BlockAction) -> Option<WorldEdit> {
        let edit = model::resolve(action, &self.camera.ray(), &self.world)?;
        let changed = edit.apply(&mut self.world);
        debug!(?edit, changed, "block edit");
        Some(edit)
    }

    /// Block under the crosshair
    pub fn target(&self) -> Option<RayHit> {
        self.camera.ray().cast(self.world.iter())
    }

    pub fn target_block(&self) -> Option<BlockPos> {
        self.target().map(|hit| hit.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::MouseButton;
    use glam::Vec3;

    fn locked_session() -> Session {
        let mut s = Session::new(&GameConfig::default(), 800, 600);
        s.apply_event(&InputEvent::PointerLockChanged { locked: true });
        s
    }

    fn look_straight_down(s: &mut Session) {
        s.camera.pitch = -std::f32::consts::FRAC_PI_2;
        s.player.position = Vec3::new(0.2, 2.5, 0.3);
        s.camera.eye = s.player.position;
    }

    #[test]
    fn test_starts_unlocked_and_frozen() {
        let mut s = Session::new(&GameConfig::default(), 800, 600);
        assert_eq!(s.lock_state(), LockState::Unlocked);
        s.apply_event(&InputEvent::KeyDown("KeyW".into()));
        s.frame(0.016);
        assert_eq!(s.player.position, Vec3::new(0.0, 5.0, 10.0));
    }

    #[test]
    fn test_lock_transitions() {
        let mut s = locked_session();
        assert!(s.is_locked());
        assert!(s.input.pointer_locked);
        s.apply_event(&InputEvent::PointerLockChanged { locked: false });
        assert_eq!(s.lock_state(), LockState::Unlocked);
    }

    #[test]
    fn test_click_breaks_then_places() {
        let mut s = locked_session();
        look_straight_down(&mut s);
        let floor = s.world.len();

        // the targeted block sits right below the player
        assert_eq!(s.target_block(), Some(BlockPos(0, 0, 0)));

        s.apply_event(&InputEvent::MouseDown(MouseButton::Left));
        s.frame(0.0);
        assert!(!s.world.exists(BlockPos(0, 0, 0)));
        assert_eq!(s.world.len(), floor - 1);

        // with the hole, the ray now misses everything below
        s.apply_event(&InputEvent::MouseDown(MouseButton::Right));
        s.frame(0.0);
        assert_eq!(s.world.len(), floor - 1);

        s.world.place(BlockPos(0, 0, 0));
        s.apply_event(&InputEvent::MouseDown(MouseButton::Right));
        s.frame(0.0);
        assert!(s.world.exists(BlockPos(0, 1, 0)));
        assert_eq!(s.world.len(), floor + 1);
    }

    #[test]
    fn test_clicks_ignored_while_unlocked() {
        let mut s = Session::new(&GameConfig::default(), 800, 600);
        look_straight_down(&mut s);
        let rev = s.world.revision();
        s.apply_event(&InputEvent::MouseDown(MouseButton::Left));
        s.frame(0.016);
        assert_eq!(s.world.revision(), rev);
    }

    #[test]
    fn test_frame_settles_on_floor_and_syncs_camera() {
        let mut s = locked_session();
        for _ in 0..120 {
            s.frame(1.0 / 60.0);
        }
        assert!(s.player.grounded);
        assert_eq!(s.player.position.y, 2.5);
        assert_eq!(s.camera.eye, s.player.position);
    }

    #[test]
    fn test_jump_edge_is_consumed() {
        let mut s = locked_session();
        for _ in 0..120 {
            s.frame(1.0 / 60.0);
        }
        s.apply_event(&InputEvent::KeyDown("Space".into()));
        s.frame(1.0 / 60.0);
        assert!(!s.input.intent.jump);
        assert!(!s.player.grounded);
        assert!(s.player.velocity.y > 0.0);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut s = locked_session();
        s.frame(5.0);
        // one clamped 0.1s step of gravity
        assert!((s.player.velocity.y + 1.5).abs() < 1e-5);
    }
}
