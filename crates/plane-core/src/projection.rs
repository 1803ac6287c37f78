use crate::state::{Camera, ScreenRect, Viewport};
use glam::{Vec2, Vec3, Vec4};

/// World-space placement of a unit plane covering a screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub scale: Vec2,
}

/// Distance at which a camera with vertical FOV `fovy_radians` sees exactly
/// `viewport_height` world units across, i.e. one unit per pixel at z = 0.
#[inline]
pub fn camera_distance(viewport_height: f32, fovy_radians: f32) -> f32 {
    (viewport_height / 2.0) / (fovy_radians / 2.0).tan()
}

/// Map a viewport rectangle onto the z = 0 plane of the pixel-perfect camera.
///
/// Screen Y grows downward while world Y grows upward, so the vertical axis
/// is flipped around the viewport centre. The camera only enters through
/// [`camera_distance`], which is what makes this mapping camera-independent.
#[inline]
pub fn project(rect: ScreenRect, viewport: Viewport) -> Placement {
    let x = rect.left - viewport.width / 2.0 + rect.width / 2.0;
    let y = -rect.top + viewport.height / 2.0 - rect.height / 2.0;
    Placement {
        position: Vec3::new(x, y, 0.0),
        scale: Vec2::new(rect.width, rect.height),
    }
}

/// Project a world point through `camera` into viewport pixels.
///
/// Returns `None` for points behind the camera.
pub fn world_to_screen(camera: &Camera, viewport: Viewport, point: Vec3) -> Option<Vec2> {
    let clip = camera.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc.y) * 0.5 * viewport.height,
    ))
}

/// Screen-space bounding box of a placed unit plane, as drawn by `camera`.
pub fn screen_bounds(camera: &Camera, viewport: Viewport, placement: Placement) -> Option<ScreenRect> {
    let half = placement.scale / 2.0;
    let p = placement.position;
    let corners = [
        Vec3::new(p.x - half.x, p.y - half.y, p.z),
        Vec3::new(p.x + half.x, p.y - half.y, p.z),
        Vec3::new(p.x - half.x, p.y + half.y, p.z),
        Vec3::new(p.x + half.x, p.y + half.y, p.z),
    ];
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for c in corners {
        let s = world_to_screen(camera, viewport, c)?;
        min = min.min(s);
        max = max.max(s);
    }
    Some(ScreenRect::new(min.x, min.y, max.x - min.x, max.y - min.y))
}
