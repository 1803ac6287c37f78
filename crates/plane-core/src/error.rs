use thiserror::Error;

/// Rejected configuration or scene setup. Per-frame work never fails.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),
    #[error("near plane must be positive, got {0}")]
    NearPlane(f32),
    #[error("far plane {far} must be beyond the near plane {near}")]
    FarPlane { near: f32, far: f32 },
    #[error("smoothing factor `{name}` must be within (0, 1], got {value}")]
    SmoothingFactor { name: &'static str, value: f32 },
    #[error("duration `{0}` must be finite and non-negative")]
    Duration(&'static str),
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("slider needs at least one texture")]
    EmptySlider,
    #[error("no plane with id {0}")]
    UnknownPlane(u32),
}
