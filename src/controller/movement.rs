use glam::Vec3;

use crate::config::MovementConfig;
use crate::controller::input::InputIntent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    /// Mouse-look captured, input drives the camera
    Locked,
    /// Input ignored, camera frozen
    Unlocked,
}

/// Player camera kinematics.
///
/// `velocity.x` and `velocity.z` are in the camera's flat right/forward frame,
/// `velocity.y` is world up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl CameraState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Handles player physics (gravity, floor clamp, jumping, damping)
pub struct MovementIntegrator {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub eye_height: f32,
    pub damping: f32,
}

impl MovementIntegrator {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            gravity: config.gravity,
            move_speed: config.move_speed,
            jump_impulse: config.jump_impulse,
            eye_height: config.eye_height,
            damping: config.damping,
        }
    }

    /// Advance one frame. `forward_flat`/`right_flat` are the camera's
    /// yaw-only unit axes.
    pub fn step(
        &self,
        state: &mut CameraState,
        intent: &InputIntent,
        lock: LockState,
        forward_flat: Vec3,
        right_flat: Vec3,
        dt: f32,
    ) {
        if lock == LockState::Unlocked {
            return;
        }
        let vel = &mut state.velocity;

        // Gravity
        vel.y -= self.gravity * dt;

        // Horizontal acceleration in the camera frame
        let accel = self.move_speed * dt;
        if intent.forward {
            vel.z += accel;
        }
        if intent.backward {
            vel.z -= accel;
        }
        if intent.right {
            vel.x += accel;
        }
        if intent.left {
            vel.x -= accel;
        }

        state.position += right_flat * (vel.x * dt) + forward_flat * (vel.z * dt);
        state.position.y += vel.y * dt;

        // Floor
        if state.position.y < self.eye_height {
            vel.y = 0.0;
            state.position.y = self.eye_height;
            state.grounded = true;
        }

        if intent.jump && state.grounded {
            vel.y = self.jump_impulse;
            state.grounded = false;
        }

        vel.x *= self.damping;
        vel.z *= self.damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn integrator() -> MovementIntegrator {
        MovementIntegrator::new(&MovementConfig::default())
    }

    fn step(m: &MovementIntegrator, s: &mut CameraState, intent: &InputIntent) {
        m.step(s, intent, LockState::Locked, Vec3::NEG_Z, Vec3::X, DT);
    }

    #[test]
    fn test_damping_decays_toward_zero() {
        let m = integrator();
        let mut s = CameraState::at(Vec3::new(0.0, 2.5, 0.0));
        s.velocity = Vec3::new(4.0, 0.0, -6.0);

        let mut prev = s.velocity.x.hypot(s.velocity.z);
        for _ in 0..200 {
            step(&m, &mut s, &InputIntent::default());
            let speed = s.velocity.x.hypot(s.velocity.z);
            assert!(speed <= prev);
            assert!(speed >= 0.0);
            assert_eq!(s.velocity.x.signum(), 1.0, "damping must not flip direction");
            prev = speed;
        }
        assert!(prev < 1e-6);
    }

    #[test]
    fn test_gravity_falls_to_floor_then_rests() {
        let m = integrator();
        let mut s = CameraState::at(Vec3::new(0.0, 5.0, 10.0));

        let mut prev_y = s.position.y;
        let mut landed_at = None;
        for frame in 0..300 {
            step(&m, &mut s, &InputIntent::default());
            assert!(s.position.y <= prev_y);
            if s.grounded && landed_at.is_none() {
                landed_at = Some(frame);
            }
            if landed_at.is_some() {
                assert_eq!(s.position.y, 2.5);
                assert!(s.grounded);
            }
            prev_y = s.position.y;
        }
        assert!(landed_at.is_some(), "never reached the floor");
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let m = integrator();
        let jump = InputIntent { jump: true, ..Default::default() };

        let mut airborne = CameraState::at(Vec3::new(0.0, 10.0, 0.0));
        step(&m, &mut airborne, &jump);
        assert!(airborne.velocity.y < 0.0);

        let mut s = CameraState::at(Vec3::new(0.0, 2.5, 0.0));
        step(&m, &mut s, &InputIntent::default());
        assert!(s.grounded);
        step(&m, &mut s, &jump);
        assert_eq!(s.velocity.y, 5.0);
        assert!(!s.grounded);

        step(&m, &mut s, &InputIntent::default());
        assert!(s.position.y > 2.5);
    }

    #[test]
    fn test_movement_follows_look_direction() {
        let m = integrator();
        let forward = InputIntent { forward: true, ..Default::default() };

        // looking down +X: forward must move along +X, not world -Z
        let mut s = CameraState::at(Vec3::new(0.0, 2.5, 0.0));
        for _ in 0..10 {
            m.step(&mut s, &forward, LockState::Locked, Vec3::X, Vec3::Z, DT);
        }
        assert!(s.position.x > 0.0);
        assert!(s.position.z.abs() < 1e-6);

        let strafe = InputIntent { left: true, ..Default::default() };
        let mut s = CameraState::at(Vec3::new(0.0, 2.5, 0.0));
        for _ in 0..10 {
            step(&m, &mut s, &strafe);
        }
        assert!(s.position.x < 0.0);
    }

    #[test]
    fn test_unlocked_freezes_camera() {
        let m = integrator();
        let intent = InputIntent { forward: true, jump: true, ..Default::default() };
        let mut s = CameraState::at(Vec3::new(1.0, 7.0, 2.0));
        s.velocity = Vec3::new(1.0, -2.0, 3.0);
        let before = s;
        m.step(&mut s, &intent, LockState::Unlocked, Vec3::NEG_Z, Vec3::X, DT);
        assert_eq!(s, before);
    }
}
