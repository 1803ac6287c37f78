mod common;

use common::texture;
use plane_core::*;

#[test]
fn insertion_order_is_iteration_order() {
    let mut registry = SceneRegistry::default();
    let a = registry.add_plane(TargetId(10), texture(0));
    let b = registry.add_plane(TargetId(11), texture(1));
    let c = registry.add_plane(TargetId(12), texture(2));

    let mut seen = Vec::new();
    registry.for_each(|p| seen.push(p.id));
    assert_eq!(seen, vec![a, b, c]);
    assert_eq!(registry.get(b).map(|p| p.target), Some(TargetId(11)));
}

#[test]
fn remove_keeps_order_and_lookups() {
    let mut registry = SceneRegistry::default();
    let a = registry.add_plane(TargetId(0), texture(0));
    let b = registry.add_plane(TargetId(1), texture(1));
    let c = registry.add_plane(TargetId(2), texture(2));

    let removed = registry.remove(b).unwrap();
    assert_eq!(removed.id, b);
    assert_eq!(registry.ids(), vec![a, c]);
    assert_eq!(registry.get(c).map(|p| p.target), Some(TargetId(2)));
    assert!(registry.get(b).is_none());
    assert!(registry.remove(b).is_none());

    // ids are never reused
    let d = registry.add_plane(TargetId(3), texture(3));
    assert_ne!(d, b);
}

#[test]
fn new_planes_bind_their_texture() {
    let mut registry = SceneRegistry::new(MeshDesc {
        segments_x: 4,
        segments_y: 2,
    });
    let id = registry.add_plane(TargetId(0), texture(5));
    let plane = registry.get(id).unwrap();
    assert_eq!(plane.params.primary, TextureId(5));
    assert_eq!(plane.params.incoming, TextureId(5));
    assert_eq!(plane.params.image_aspect, 1.5);
    assert_eq!(plane.mesh.segments_x, 4);
    assert!(plane.rect.is_none());
    assert!(plane.active_transition.is_none());
}

#[test]
fn hit_test_prefers_the_last_inserted() {
    let mut registry = SceneRegistry::default();
    let a = registry.add_plane(TargetId(0), texture(0));
    let b = registry.add_plane(TargetId(1), texture(1));
    registry.get_mut(a).unwrap().rect = Some(ScreenRect::new(0.0, 0.0, 100.0, 100.0));
    registry.get_mut(b).unwrap().rect = Some(ScreenRect::new(50.0, 50.0, 100.0, 100.0));

    assert_eq!(registry.plane_at(75.0, 75.0), Some(b));
    assert_eq!(registry.plane_at(10.0, 10.0), Some(a));
    assert_eq!(registry.plane_at(500.0, 10.0), None);
}

#[test]
fn sink_writes_params_and_transforms() {
    let mut registry = SceneRegistry::default();
    let id = registry.add_plane(TargetId(0), texture(0));
    registry.apply(id, Sample::Param(ParamName::Hover, 0.4));
    registry.apply(id, Sample::Transform(Transform::default().with_depth(2.0)));
    // unknown planes are ignored
    registry.apply(PlaneId(99), Sample::Param(ParamName::Hover, 1.0));

    let plane = registry.get(id).unwrap();
    assert_eq!(plane.params.get(ParamName::Hover), 0.4);
    assert_eq!(plane.transform.position.z, 2.0);
}

#[test]
fn grid_covers_the_unit_quad() {
    let (vertices, indices) = MeshDesc {
        segments_x: 4,
        segments_y: 2,
    }
    .grid();
    assert_eq!(vertices.len(), 5 * 3);
    assert_eq!(indices.len(), 4 * 2 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    // top-left and bottom-right corners
    assert_eq!(vertices[0], [-0.5, 0.5, 0.0, 0.0]);
    assert_eq!(vertices[14], [0.5, -0.5, 1.0, 1.0]);
}
