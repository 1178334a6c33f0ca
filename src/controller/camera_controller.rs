use crate::config::LookConfig;
use crate::model::Camera;

/// Handles camera orientation from mouse-look
pub struct CameraController {
    pub mouse_sensitivity: f32,
}

impl CameraController {
    pub fn new(config: &LookConfig) -> Self {
        Self {
            mouse_sensitivity: config.mouse_sensitivity,
        }
    }

    /// Apply mouse look delta to camera
    pub fn apply_look(&self, camera: &mut Camera, dx: f32, dy: f32) {
        camera.yaw += dx * self.mouse_sensitivity;
        let pi_half = std::f32::consts::PI / 2.0;
        camera.pitch = (camera.pitch - dy * self.mouse_sensitivity).clamp(-pi_half, pi_half);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_turns_and_clamps() {
        let controller = CameraController::new(&LookConfig::default());
        let mut cam = Camera::new(800, 600);
        let yaw = cam.yaw;

        controller.apply_look(&mut cam, 100.0, 0.0);
        assert!((cam.yaw - (yaw + 0.2)).abs() < 1e-6);

        controller.apply_look(&mut cam, 0.0, -100_000.0);
        assert_eq!(cam.pitch, std::f32::consts::FRAC_PI_2);
        controller.apply_look(&mut cam, 0.0, 100_000.0);
        assert_eq!(cam.pitch, -std::f32::consts::FRAC_PI_2);
    }
}
