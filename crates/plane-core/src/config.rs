use crate::constants::*;
use crate::easing::Ease;
use crate::error::ConfigError;
use crate::registry::MeshDesc;
use std::time::Duration;

/// Every key understood by [`SceneConfig::apply_override`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "fov",
    "near",
    "far",
    "max-pixel-ratio",
    "pointer-smoothing",
    "scroll-smoothing",
    "resize-quiet-ms",
    "modal-poll-ms",
    "modal-depth",
    "slide-extent",
    "reveal-on-start",
    "segments",
    "open-duration",
    "open-delay",
    "open-ease",
    "close-duration",
    "close-delay",
    "close-ease",
    "visibility-duration",
    "visibility-delay",
    "visibility-ease",
    "slide-duration",
    "slide-delay",
    "slide-ease",
    "hover-duration",
    "hover-delay",
    "hover-ease",
];

/// Timing of one family of transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub duration_sec: f32,
    pub delay_sec: f32,
    pub ease: Ease,
}

impl Motion {
    pub const fn new(duration_sec: f32, ease: Ease) -> Self {
        Self {
            duration_sec,
            delay_sec: 0.0,
            ease,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub max_pixel_ratio: f32,
    pub pointer_smoothing: f32,
    pub scroll_smoothing: f32,
    pub resize_quiet: Duration,
    pub open: Motion,
    pub close: Motion,
    /// Show/hide of the planes that do not own the modal, and the start-up reveal.
    pub visibility: Motion,
    pub slide: Motion,
    pub hover: Motion,
    pub slide_extent: f32,
    pub modal_depth: f32,
    pub modal_poll: Duration,
    pub mesh: MeshDesc,
    pub reveal_on_start: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            pointer_smoothing: POINTER_SMOOTHING,
            scroll_smoothing: SCROLL_SMOOTHING,
            resize_quiet: Duration::from_millis(RESIZE_QUIET_MS),
            open: Motion::new(OPEN_DURATION_SEC, Ease::POWER2_OUT),
            close: Motion::new(CLOSE_DURATION_SEC, Ease::POWER2_OUT),
            visibility: Motion::new(VISIBILITY_DURATION_SEC, Ease::POWER2_OUT),
            slide: Motion::new(SLIDE_DURATION_SEC, Ease::POWER1_IN_OUT),
            hover: Motion::new(HOVER_DURATION_SEC, Ease::POWER2_OUT),
            slide_extent: SLIDE_EXTENT,
            modal_depth: MODAL_DEPTH,
            modal_poll: Duration::from_millis(MODAL_POLL_MS),
            mesh: MeshDesc::default(),
            reveal_on_start: true,
        }
    }
}

impl SceneConfig {
    pub fn fovy_radians(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_y_degrees));
        }
        if !(self.near > 0.0) {
            return Err(ConfigError::NearPlane(self.near));
        }
        if !(self.far > self.near) {
            return Err(ConfigError::FarPlane {
                near: self.near,
                far: self.far,
            });
        }
        for (name, value) in [
            ("pointer-smoothing", self.pointer_smoothing),
            ("scroll-smoothing", self.scroll_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::SmoothingFactor { name, value });
            }
        }
        for (name, motion) in [
            ("open", &self.open),
            ("close", &self.close),
            ("visibility", &self.visibility),
            ("slide", &self.slide),
            ("hover", &self.hover),
        ] {
            let ok = |v: f32| v.is_finite() && v >= 0.0;
            if !ok(motion.duration_sec) || !ok(motion.delay_sec) {
                return Err(ConfigError::Duration(name));
            }
        }
        Ok(())
    }

    /// Apply one `key = value` override, e.g. from a `data-open-duration`
    /// attribute. The config is left untouched when the result is invalid.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || value.trim().parse::<f32>().map_err(|_| invalid());
        let millis = || value.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| invalid());

        match key {
            "fov" => next.fov_y_degrees = number()?,
            "near" => next.near = number()?,
            "far" => next.far = number()?,
            "max-pixel-ratio" => next.max_pixel_ratio = number()?,
            "pointer-smoothing" => next.pointer_smoothing = number()?,
            "scroll-smoothing" => next.scroll_smoothing = number()?,
            "resize-quiet-ms" => next.resize_quiet = millis()?,
            "modal-poll-ms" => next.modal_poll = millis()?,
            "modal-depth" => next.modal_depth = number()?,
            "slide-extent" => next.slide_extent = number()?,
            "reveal-on-start" => {
                next.reveal_on_start = value.trim().parse::<bool>().map_err(|_| invalid())?
            }
            "segments" => next.mesh = parse_segments(value).ok_or_else(invalid)?,
            _ => {
                let (family, field) = key
                    .rsplit_once('-')
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let motion = match family {
                    "open" => &mut next.open,
                    "close" => &mut next.close,
                    "visibility" => &mut next.visibility,
                    "slide" => &mut next.slide,
                    "hover" => &mut next.hover,
                    _ => return Err(ConfigError::UnknownKey(key.to_string())),
                };
                match field {
                    "duration" => motion.duration_sec = number()?,
                    "delay" => motion.delay_sec = number()?,
                    "ease" => motion.ease = Ease::from_name(value).ok_or_else(invalid)?,
                    _ => return Err(ConfigError::UnknownKey(key.to_string())),
                }
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

// "10" or "10x6"
fn parse_segments(value: &str) -> Option<MeshDesc> {
    let value = value.trim();
    let (x, y) = match value.split_once('x') {
        Some((x, y)) => (x.trim().parse().ok()?, y.trim().parse().ok()?),
        None => {
            let n = value.parse().ok()?;
            (n, n)
        }
    };
    if x == 0 || y == 0 {
        return None;
    }
    Some(MeshDesc {
        segments_x: x,
        segments_y: y,
    })
}
