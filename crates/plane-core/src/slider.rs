use crate::registry::{PlaneId, TextureSource};
use crate::transition::TransitionHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    Next,
    Prev,
}

/// Slide waiting for its phase-one ramp to finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSlide {
    pub handle: TransitionHandle,
    pub index: usize,
}

/// Texture list bound to one plane. `current` is the committed slide and
/// only changes when a slide completes.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderState {
    pub plane: PlaneId,
    pub current: usize,
    pub pending: Option<PendingSlide>,
    textures: Vec<TextureSource>,
}

impl SliderState {
    /// Returns `None` for an empty texture list.
    pub fn new(plane: PlaneId, textures: Vec<TextureSource>) -> Option<Self> {
        if textures.is_empty() {
            return None;
        }
        Some(Self {
            plane,
            current: 0,
            pending: None,
            textures,
        })
    }

    pub fn count(&self) -> usize {
        self.textures.len()
    }

    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.count()
    }

    pub fn prev_index(&self) -> usize {
        (self.current + self.count() - 1) % self.count()
    }

    pub fn index_toward(&self, direction: SlideDirection) -> usize {
        match direction {
            SlideDirection::Next => self.next_index(),
            SlideDirection::Prev => self.prev_index(),
        }
    }

    pub fn texture(&self, index: usize) -> TextureSource {
        self.textures[index % self.count()]
    }

    pub fn textures(&self) -> &[TextureSource] {
        &self.textures
    }
}
