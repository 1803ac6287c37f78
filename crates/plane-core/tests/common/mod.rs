#![allow(dead_code)]

use plane_core::*;
use std::collections::HashMap;

/// Layout oracle backed by a plain map; absent targets report no rect.
#[derive(Default)]
pub struct MapOracle {
    pub rects: HashMap<TargetId, ScreenRect>,
}

impl MapOracle {
    pub fn with(mut self, target: TargetId, rect: ScreenRect) -> Self {
        self.rects.insert(target, rect);
        self
    }

    pub fn set(&mut self, target: TargetId, rect: ScreenRect) {
        self.rects.insert(target, rect);
    }
}

impl LayoutOracle for MapOracle {
    fn rect(&self, target: TargetId) -> Option<ScreenRect> {
        self.rects.get(&target).copied()
    }
}

/// Backend that remembers every resize and a snapshot of every frame.
#[derive(Default)]
pub struct RecordingBackend {
    pub resizes: Vec<Viewport>,
    pub frames: Vec<Vec<(PlaneId, Transform)>>,
    pub overlays: Vec<Option<PlaneId>>,
    pub fail: bool,
}

impl RenderBackend for RecordingBackend {
    type Error = String;

    fn resize(&mut self, viewport: Viewport) {
        self.resizes.push(viewport);
    }

    fn submit(&mut self, frame: &SceneFrame<'_>) -> Result<(), String> {
        if self.fail {
            return Err("device lost".to_string());
        }
        self.frames
            .push(frame.draw_order().map(|p| (p.id, p.transform)).collect());
        self.overlays.push(frame.overlay);
        Ok(())
    }
}

pub const FRAME: std::time::Duration = std::time::Duration::from_millis(16);

pub fn ms(n: u64) -> std::time::Duration {
    std::time::Duration::from_millis(n)
}

pub fn texture(id: u32) -> TextureSource {
    TextureSource {
        id: TextureId(id),
        aspect: 1.5,
    }
}

/// Linear curves and no start-up reveal, so sampled values are easy to predict.
pub fn linear_config() -> SceneConfig {
    let mut config = SceneConfig {
        reveal_on_start: false,
        ..SceneConfig::default()
    };
    for motion in [
        &mut config.open,
        &mut config.close,
        &mut config.visibility,
        &mut config.slide,
        &mut config.hover,
    ] {
        motion.ease = Ease::Linear;
    }
    config
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

pub fn approx_vec3(a: glam::Vec3, b: glam::Vec3) -> bool {
    (a - b).abs().max_element() < 1e-3
}

pub fn approx_vec2(a: glam::Vec2, b: glam::Vec2) -> bool {
    (a - b).abs().max_element() < 1e-3
}
