//! Collaborators the render loop drives but never implements.

use crate::registry::{Plane, PlaneId, TargetId};
use crate::state::{Camera, ScreenRect, Viewport};
use std::fmt::Display;

/// Source of an element's current rectangle in viewport pixels.
///
/// `None` means the element is absent or not laid out yet; the plane bound
/// to it is skipped for that tick.
pub trait LayoutOracle {
    fn rect(&self, target: TargetId) -> Option<ScreenRect>;
}

impl<F> LayoutOracle for F
where
    F: Fn(TargetId) -> Option<ScreenRect>,
{
    fn rect(&self, target: TargetId) -> Option<ScreenRect> {
        self(target)
    }
}

/// Everything a backend needs to draw one frame.
pub struct SceneFrame<'a> {
    pub camera: &'a Camera,
    pub viewport: Viewport,
    /// Draw order; the overlay plane, if any, goes last.
    pub planes: &'a [Plane],
    pub overlay: Option<PlaneId>,
}

impl SceneFrame<'_> {
    /// Planes in draw order with the overlay moved to the end.
    pub fn draw_order(&self) -> impl Iterator<Item = &Plane> {
        let overlay = self.overlay;
        self.planes
            .iter()
            .filter(move |p| Some(p.id) != overlay)
            .chain(self.planes.iter().filter(move |p| Some(p.id) == overlay))
    }
}

pub trait RenderBackend {
    type Error: Display;

    fn resize(&mut self, viewport: Viewport);

    fn submit(&mut self, frame: &SceneFrame<'_>) -> Result<(), Self::Error>;
}
