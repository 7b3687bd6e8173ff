//! Character Tuning
//!
//! Plain config structs with defaults matching the shipped game feel.

/// Movement integration tuning.
#[derive(Debug, Clone)]
pub struct MovementConfig {
    /// Horizontal ground speed (units/sec).
    pub move_speed: f32,
    /// Target jump apex height (units). The launch velocity is derived
    /// from this and gravity, so retuning gravity keeps jumps the same
    /// height.
    pub jump_height: f32,
    /// Gravity acceleration (units/sec^2, negative).
    pub gravity: f32,
    /// Vertical velocity applied while resting on the ground. Small and
    /// negative so the ground sensor stays pressed between ticks.
    pub grounded_epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_height: 8.0,
            gravity: -20.0,
            grounded_epsilon: -0.5,
        }
    }
}

/// Camera look tuning.
#[derive(Debug, Clone)]
pub struct LookConfig {
    /// Pointer sensitivity (degrees per pointer unit per second).
    pub sensitivity: f32,
    /// Whether vertical look is clamped at all.
    pub clamp_vertical: bool,
    /// Lowest allowed pitch (degrees).
    pub min_pitch: f32,
    /// Highest allowed pitch (degrees).
    pub max_pitch: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 100.0,
            clamp_vertical: true,
            min_pitch: -90.0,
            max_pitch: 90.0,
        }
    }
}

/// Remote proxy smoothing tuning.
#[derive(Debug, Clone)]
pub struct SmoothingConfig {
    /// Exponential smoothing rate (1/sec). Higher chases the target
    /// harder; the per-frame factor is `rate * dt`, capped at 1.
    pub rate: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { rate: 15.0 }
    }
}

/// Full per-character tuning.
#[derive(Debug, Clone, Default)]
pub struct PlayerConfig {
    /// Movement integration tuning.
    pub movement: MovementConfig,
    /// Camera look tuning.
    pub look: LookConfig,
    /// Remote proxy smoothing tuning.
    pub smoothing: SmoothingConfig,
}
