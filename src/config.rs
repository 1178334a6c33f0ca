use glam::Vec3;

/// Tunables for a play session. `Default` is the stock game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub movement: MovementConfig,
    pub look: LookConfig,
    pub spawn_eye: Vec3,
    /// Initial look target; the default looks down -Z
    pub spawn_look_at: Vec3,
}

#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Edge length of the starter floor, in blocks
    pub floor_size: i32,
}

#[derive(Debug, Clone)]
pub struct MovementConfig {
    /// Downward acceleration, units/s²
    pub gravity: f32,
    /// Horizontal acceleration per held direction key, units/s²
    pub move_speed: f32,
    /// Vertical velocity set on jump, units/s
    pub jump_impulse: f32,
    /// Lowest allowed eye height (floor top plus eye offset)
    pub eye_height: f32,
    /// Per-frame multiplier on horizontal velocity, < 1
    pub damping: f32,
    /// Upper bound on a single frame step, seconds
    pub max_frame_dt: f32,
}

#[derive(Debug, Clone)]
pub struct LookConfig {
    /// Radians per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            movement: MovementConfig::default(),
            look: LookConfig::default(),
            spawn_eye: Vec3::new(0.0, 5.0, 10.0),
            spawn_look_at: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { floor_size: 32 }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: 15.0,
            move_speed: 150.0,
            jump_impulse: 5.0,
            eye_height: 2.5,
            damping: 0.9,
            max_frame_dt: 0.1,
        }
    }
}

impl Default for LookConfig {
    fn default() -> Self {
        Self { mouse_sensitivity: 0.002 }
    }
}
