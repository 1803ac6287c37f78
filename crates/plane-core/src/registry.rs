//! Ordered collection of planes, each bound to one layout target.
//!
//! Insertion order is iteration order and draw order. Planes are never
//! reordered; the modal owner is drawn on top by the backend, not by moving
//! it within the registry.

use crate::constants::{HOVER_IDLE, REVEAL_VISIBLE};
use crate::projection::Placement;
use crate::state::ScreenRect;
use crate::transition::{Sample, TransitionHandle, TransitionSink};
use fnv::FnvHashMap;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u32);

/// Opaque handle of an element known to the layout oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Opaque handle of a texture owned by the rendering backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// A texture handle plus the natural aspect of its source image or video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSource {
    pub id: TextureId,
    pub aspect: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec2,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec2::ONE,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_placement(placement: Placement) -> Self {
        Self {
            position: placement.position,
            scale: placement.scale,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_depth(mut self, z: f32) -> Self {
        self.position.z = z;
        self
    }

    pub fn lerp(&self, to: &Transform, t: f32) -> Transform {
        Transform {
            position: self.position.lerp(to.position, t),
            scale: self.scale.lerp(to.scale, t),
            rotation: self.rotation.lerp(to.rotation, t),
        }
    }
}

/// Scalar shader inputs that transitions may animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamName {
    Offset,
    Reveal,
    Hover,
    SlideBlend,
    SlideProgress,
}

/// Per-plane material inputs, uploaded by the backend every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderParams {
    pub time: f32,
    pub offset: f32,
    pub pointer: Vec2,
    pub resolution: Vec2,
    pub plane_aspect: f32,
    pub image_aspect: f32,
    pub reveal: f32,
    pub hover: f32,
    pub slide_blend: f32,
    pub slide_progress: f32,
    pub primary: TextureId,
    pub incoming: TextureId,
}

impl ShaderParams {
    pub fn new(texture: TextureSource) -> Self {
        Self {
            time: 0.0,
            offset: 0.0,
            pointer: Vec2::splat(0.5),
            resolution: Vec2::ONE,
            plane_aspect: 1.0,
            image_aspect: texture.aspect,
            reveal: REVEAL_VISIBLE,
            hover: HOVER_IDLE,
            slide_blend: 0.0,
            slide_progress: 1.0,
            primary: texture.id,
            incoming: texture.id,
        }
    }

    pub fn get(&self, name: ParamName) -> f32 {
        match name {
            ParamName::Offset => self.offset,
            ParamName::Reveal => self.reveal,
            ParamName::Hover => self.hover,
            ParamName::SlideBlend => self.slide_blend,
            ParamName::SlideProgress => self.slide_progress,
        }
    }

    pub fn set(&mut self, name: ParamName, value: f32) {
        match name {
            ParamName::Offset => self.offset = value,
            ParamName::Reveal => self.reveal = value,
            ParamName::Hover => self.hover = value,
            ParamName::SlideBlend => self.slide_blend = value,
            ParamName::SlideProgress => self.slide_progress = value,
        }
    }
}

/// Geometry description of a plane mesh: a unit quad split into a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshDesc {
    pub segments_x: u32,
    pub segments_y: u32,
}

impl Default for MeshDesc {
    fn default() -> Self {
        Self {
            segments_x: 1,
            segments_y: 1,
        }
    }
}

impl MeshDesc {
    /// Unit quad centred on the origin, split into `segments_x` by
    /// `segments_y` cells. Vertices are `[x, y, u, v]` with `v` growing
    /// downward; indices form counter-clockwise triangles.
    pub fn grid(&self) -> (Vec<[f32; 4]>, Vec<u32>) {
        let (sx, sy) = (self.segments_x.max(1), self.segments_y.max(1));
        let mut vertices = Vec::with_capacity(((sx + 1) * (sy + 1)) as usize);
        for j in 0..=sy {
            let v = j as f32 / sy as f32;
            for i in 0..=sx {
                let u = i as f32 / sx as f32;
                vertices.push([u - 0.5, 0.5 - v, u, v]);
            }
        }
        let row = sx + 1;
        let mut indices = Vec::with_capacity((sx * sy * 6) as usize);
        for j in 0..sy {
            for i in 0..sx {
                let a = j * row + i;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        (vertices, indices)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub id: PlaneId,
    pub target: TargetId,
    pub mesh: MeshDesc,
    pub params: ShaderParams,
    pub transform: Transform,
    /// Rectangle from the last successful layout sync.
    pub rect: Option<ScreenRect>,
    pub active_transition: Option<TransitionHandle>,
}

#[derive(Default)]
pub struct SceneRegistry {
    planes: Vec<Plane>,
    index: FnvHashMap<PlaneId, usize>,
    next_id: u32,
    mesh: MeshDesc,
}

impl SceneRegistry {
    pub fn new(mesh: MeshDesc) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    pub fn add_plane(&mut self, target: TargetId, texture: TextureSource) -> PlaneId {
        let id = PlaneId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.planes.len());
        self.planes.push(Plane {
            id,
            target,
            mesh: self.mesh,
            params: ShaderParams::new(texture),
            transform: Transform::default(),
            rect: None,
            active_transition: None,
        });
        id
    }

    pub fn remove(&mut self, id: PlaneId) -> Option<Plane> {
        let slot = self.index.remove(&id)?;
        let plane = self.planes.remove(slot);
        for (i, p) in self.planes.iter().enumerate().skip(slot) {
            self.index.insert(p.id, i);
        }
        Some(plane)
    }

    pub fn get(&self, id: PlaneId) -> Option<&Plane> {
        self.index.get(&id).map(|&i| &self.planes[i])
    }

    pub fn get_mut(&mut self, id: PlaneId) -> Option<&mut Plane> {
        match self.index.get(&id) {
            Some(&i) => self.planes.get_mut(i),
            None => None,
        }
    }

    pub fn for_each(&self, mut visit: impl FnMut(&Plane)) {
        for p in &self.planes {
            visit(p);
        }
    }

    pub fn for_each_mut(&mut self, mut visit: impl FnMut(&mut Plane)) {
        for p in &mut self.planes {
            visit(p);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plane> {
        self.planes.iter()
    }

    pub fn ids(&self) -> Vec<PlaneId> {
        self.planes.iter().map(|p| p.id).collect()
    }

    pub fn as_slice(&self) -> &[Plane] {
        &self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Topmost plane whose last synced rectangle contains the point.
    pub fn plane_at(&self, x: f32, y: f32) -> Option<PlaneId> {
        self.planes
            .iter()
            .rev()
            .find(|p| p.rect.is_some_and(|r| r.contains(x, y)))
            .map(|p| p.id)
    }
}

impl TransitionSink for SceneRegistry {
    fn apply(&mut self, target: PlaneId, sample: Sample) {
        let Some(plane) = self.get_mut(target) else {
            return;
        };
        match sample {
            Sample::Param(name, value) => plane.params.set(name, value),
            Sample::Transform(t) => plane.transform = t,
        }
    }
}
