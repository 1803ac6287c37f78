mod common;

use common::*;
use glam::{Vec2, Vec3};
use plane_core::*;

const GALLERY: TargetId = TargetId(0);
const SECOND: TargetId = TargetId(1);
const MODAL: TargetId = TargetId(100);

fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0, 1.0)
}

fn oracle() -> MapOracle {
    MapOracle::default()
        .with(GALLERY, ScreenRect::new(400.0, 350.0, 200.0, 100.0))
        .with(SECOND, ScreenRect::new(700.0, 100.0, 200.0, 200.0))
        .with(MODAL, ScreenRect::new(0.0, 0.0, 600.0, 400.0))
}

/// Running loop with two planes, synchronized once.
fn running(config: SceneConfig) -> (RenderLoop, MapOracle, RecordingBackend, PlaneId, PlaneId) {
    let mut rl = RenderLoop::new(config).unwrap();
    let a = rl.add_plane(GALLERY, texture(0));
    let b = rl.add_plane(SECOND, texture(1));
    rl.set_modal_target(Some(MODAL));
    let oracle = oracle();
    let mut backend = RecordingBackend::default();
    rl.start(viewport(), &mut backend);
    rl.tick(FRAME, &oracle, &mut backend);
    (rl, oracle, backend, a, b)
}

fn completed(rl: &RenderLoop, handle: TransitionHandle) -> usize {
    rl.events()
        .iter()
        .filter(|e| e.handle == handle && e.checkpoint == Checkpoint::Completed)
        .count()
}

#[test]
fn idle_loop_does_nothing() {
    let mut rl = RenderLoop::new(linear_config()).unwrap();
    rl.add_plane(GALLERY, texture(0));
    let mut backend = RecordingBackend::default();

    let outcome = rl.tick(FRAME, &oracle(), &mut backend);

    assert_eq!(outcome, FrameOutcome::Idle);
    assert!(outcome.keep_running());
    assert!(backend.frames.is_empty());
    assert!(rl.camera().is_none());
}

#[test]
fn planes_follow_their_layout_rect() {
    let (rl, _, backend, a, _) = running(linear_config());

    let plane = rl.plane(a).unwrap();
    assert!(approx_vec3(plane.transform.position, Vec3::ZERO));
    assert_eq!(plane.transform.scale, Vec2::new(200.0, 100.0));
    assert_eq!(plane.rect, Some(ScreenRect::new(400.0, 350.0, 200.0, 100.0)));
    assert!(approx(plane.params.plane_aspect, 2.0));
    assert_eq!(plane.params.resolution, Vec2::new(1000.0, 800.0));

    let camera = rl.camera().unwrap();
    assert!(approx(camera.distance(), 692.82));
    assert_eq!(backend.resizes, vec![viewport()]);
    assert_eq!(backend.frames.len(), 1);
}

#[test]
fn missing_rect_skips_the_plane() {
    let mut rl = RenderLoop::new(linear_config()).unwrap();
    let a = rl.add_plane(TargetId(42), texture(0));
    let mut backend = RecordingBackend::default();
    rl.start(viewport(), &mut backend);

    let outcome = rl.tick(FRAME, &oracle(), &mut backend);

    assert_eq!(outcome, FrameOutcome::Rendered);
    let plane = rl.plane(a).unwrap();
    assert_eq!(plane.transform, Transform::default());
    assert!(plane.rect.is_none());
}

#[test]
fn open_samples_halfway_and_lands_exactly() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    let start = rl.plane(a).unwrap().transform;

    let handle = rl.on_plane_click(a, &oracle).unwrap();
    assert_eq!(rl.modal().owner, Some(a));

    rl.tick(ms(750), &oracle, &mut backend);
    let end_position = Vec3::new(-200.0, 200.0, 1.0);
    let end_scale = Vec2::new(600.0, 400.0);
    let half = rl.plane(a).unwrap().transform;
    assert!(approx_vec3(half.position, (start.position + end_position) / 2.0));
    assert!(approx_vec2(half.scale, (start.scale + end_scale) / 2.0));
    assert_eq!(completed(&rl, handle), 0);

    rl.tick(ms(750), &oracle, &mut backend);
    let done = rl.plane(a).unwrap().transform;
    assert!(approx_vec3(done.position, end_position));
    assert_eq!(done.scale, end_scale);
    assert_eq!(completed(&rl, handle), 1);

    let mut later = 0;
    for _ in 0..5 {
        rl.tick(ms(500), &oracle, &mut backend);
        later += completed(&rl, handle);
    }
    assert_eq!(later, 0);
    assert_eq!(backend.overlays.last(), Some(&Some(a)));
}

#[test]
fn modal_owner_is_exempt_from_resync() {
    let (mut rl, mut oracle, mut backend, a, b) = running(linear_config());
    rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(100), &oracle, &mut backend);
    let owner_before = rl.plane(a).unwrap().transform;

    // both elements reflow; the modal element stays put
    oracle.set(GALLERY, ScreenRect::new(0.0, 600.0, 50.0, 50.0));
    oracle.set(SECOND, ScreenRect::new(100.0, 100.0, 300.0, 100.0));
    rl.tick(FRAME, &oracle, &mut backend);

    let owner = rl.plane(a).unwrap();
    assert_ne!(owner.transform.scale, Vec2::new(50.0, 50.0));
    assert!(owner.transform.position.z > owner_before.position.z);

    let other = rl.plane(b).unwrap();
    let expected = project(ScreenRect::new(100.0, 100.0, 300.0, 100.0), viewport());
    assert!(approx_vec3(other.transform.position, expected.position));
    assert_eq!(other.transform.scale, expected.scale);
}

#[test]
fn clicks_are_ignored_while_modal_is_open() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());
    assert!(rl.on_close(&oracle).is_none());

    rl.on_plane_click(a, &oracle).unwrap();
    assert!(rl.on_plane_click(b, &oracle).is_none());
    assert_eq!(rl.modal().owner, Some(a));

    rl.tick(ms(1500), &oracle, &mut backend);
    rl.on_close(&oracle).unwrap();
    // still closing
    assert!(rl.on_plane_click(b, &oracle).is_none());
    assert!(rl.on_close(&oracle).is_none());
}

#[test]
fn close_returns_owner_to_layout_and_releases() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());
    let home = rl.plane(a).unwrap().transform;
    rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(1500), &oracle, &mut backend);
    assert!(approx(rl.plane(b).unwrap().params.reveal, 0.0));

    let handle = rl.on_close(&oracle).unwrap();
    rl.tick(ms(750), &oracle, &mut backend);
    assert!(rl.modal().is_open());

    rl.tick(ms(750), &oracle, &mut backend);
    assert_eq!(completed(&rl, handle), 1);
    assert!(!rl.modal().is_open());
    assert!(approx_vec3(rl.plane(a).unwrap().transform.position, home.position));
    assert_eq!(rl.plane(a).unwrap().transform.scale, home.scale);
    assert!(approx(rl.plane(b).unwrap().params.reveal, 1.0));

    // layout sync resumes for the former owner
    let mut oracle = oracle;
    oracle.set(GALLERY, ScreenRect::new(0.0, 0.0, 100.0, 100.0));
    rl.tick(FRAME, &oracle, &mut backend);
    assert_eq!(rl.plane(a).unwrap().transform.scale, Vec2::new(100.0, 100.0));
}

#[test]
fn close_without_layout_rect_falls_back_to_home() {
    let (mut rl, mut oracle, mut backend, a, _) = running(linear_config());
    let home = rl.plane(a).unwrap().transform;
    rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(1500), &oracle, &mut backend);

    oracle.rects.remove(&GALLERY);
    rl.on_close(&oracle).unwrap();
    rl.tick(ms(1500), &oracle, &mut backend);

    assert_eq!(rl.plane(a).unwrap().transform, home);
}

#[test]
fn modal_rect_is_requeried_while_open() {
    let (mut rl, mut oracle, mut backend, a, _) = running(linear_config());
    rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(1500), &oracle, &mut backend);

    // settled open snaps to the moved modal element on the next poll
    oracle.set(MODAL, ScreenRect::new(100.0, 100.0, 800.0, 600.0));
    rl.tick(ms(300), &oracle, &mut backend);
    let t = rl.plane(a).unwrap().transform;
    assert_eq!(t.scale, Vec2::new(800.0, 600.0));
    assert!(approx_vec3(t.position, Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn in_flight_open_is_retargeted() {
    let (mut rl, mut oracle, mut backend, a, _) = running(linear_config());
    let handle = rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(300), &oracle, &mut backend);

    oracle.set(MODAL, ScreenRect::new(100.0, 100.0, 800.0, 600.0));
    rl.tick(ms(300), &oracle, &mut backend);
    assert!(rl.engine().is_running(handle));

    rl.tick(ms(1000), &oracle, &mut backend);
    assert_eq!(completed(&rl, handle), 1);
    assert_eq!(rl.plane(a).unwrap().transform.scale, Vec2::new(800.0, 600.0));
}

#[test]
fn open_toward_a_late_modal_rect_moves_smoothly() {
    let (mut rl, mut oracle, mut backend, a, _) = running(linear_config());
    // modal element not laid out yet: the open heads for the full viewport
    oracle.set(MODAL, ScreenRect::new(0.0, 0.0, 0.0, 0.0));
    let handle = rl.on_plane_click(a, &oracle).unwrap();
    oracle.set(MODAL, ScreenRect::new(0.0, 0.0, 600.0, 400.0));

    let mut last = rl.plane(a).unwrap().transform;
    for _ in 0..120 {
        rl.tick(FRAME, &oracle, &mut backend);
        let now = rl.plane(a).unwrap().transform;
        assert!((now.scale - last.scale).abs().max_element() < 10.0);
        assert!((now.position - last.position).abs().max_element() < 10.0);
        last = now;
    }
    assert!(!rl.engine().is_running(handle));
    assert_eq!(last.scale, Vec2::new(600.0, 400.0));
}

#[test]
fn slide_wraps_in_both_directions() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    rl.attach_slider(a, vec![texture(10), texture(11), texture(12)])
        .unwrap();

    rl.on_prev().unwrap();
    assert_eq!(rl.slider().unwrap().pending.map(|p| p.index), Some(2));
    rl.tick(ms(1500), &oracle, &mut backend);
    assert_eq!(rl.slider().unwrap().current, 2);

    rl.on_next().unwrap();
    assert_eq!(rl.slider().unwrap().pending.map(|p| p.index), Some(0));
    rl.tick(ms(1500), &oracle, &mut backend);
    assert_eq!(rl.slider().unwrap().current, 0);
}

#[test]
fn slide_swaps_layers_and_commits() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    rl.attach_slider(a, vec![texture(10), texture(11), texture(12)])
        .unwrap();

    let handle = rl.on_next().unwrap();
    let params = rl.plane(a).unwrap().params;
    assert_eq!(params.incoming, TextureId(10));
    assert_eq!(params.slide_progress, 0.0);

    rl.tick(ms(750), &oracle, &mut backend);
    assert!(approx(rl.plane(a).unwrap().params.slide_blend, 50.0));
    assert_eq!(rl.slider().unwrap().current, 0);

    rl.tick(ms(750), &oracle, &mut backend);
    assert_eq!(completed(&rl, handle), 1);
    let params = rl.plane(a).unwrap().params;
    assert_eq!(params.primary, TextureId(11));
    assert_eq!(params.slide_progress, 1.0);
    assert_eq!(params.slide_blend, 100.0);
}

#[test]
fn repeated_next_advances_once_from_committed_index() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    rl.attach_slider(a, vec![texture(10), texture(11), texture(12)])
        .unwrap();

    let first = rl.on_next().unwrap();
    rl.tick(ms(500), &oracle, &mut backend);
    let second = rl.on_next().unwrap();

    assert!(!rl.engine().is_running(first));
    assert_eq!(rl.engine().running(TransitionKind::SlideNext, a).count(), 1);
    assert_eq!(rl.slider().unwrap().pending.map(|p| p.index), Some(1));

    rl.tick(ms(1500), &oracle, &mut backend);
    assert_eq!(completed(&rl, first), 0);
    assert_eq!(completed(&rl, second), 1);
    assert_eq!(rl.slider().unwrap().current, 1);
}

#[test]
fn empty_slider_is_rejected() {
    let (mut rl, _, _, a, _) = running(linear_config());
    assert_eq!(rl.attach_slider(a, vec![]), Err(ConfigError::EmptySlider));
    assert_eq!(
        rl.attach_slider(PlaneId(77), vec![texture(1)]),
        Err(ConfigError::UnknownPlane(77))
    );
}

#[test]
fn resize_is_debounced() {
    let (mut rl, oracle, mut backend, _, _) = running(linear_config());
    let distance = rl.camera().unwrap().distance();

    for h in [700.0, 650.0, 600.0] {
        rl.on_resize(Viewport::new(900.0, h, 1.0));
        rl.tick(ms(100), &oracle, &mut backend);
    }
    assert_eq!(backend.resizes.len(), 1);
    assert!(approx(rl.camera().unwrap().distance(), distance));

    for _ in 0..5 {
        rl.tick(ms(100), &oracle, &mut backend);
    }
    assert_eq!(backend.resizes.len(), 2);
    assert_eq!(backend.resizes[1], Viewport::new(900.0, 600.0, 1.0));
    assert_eq!(rl.viewport(), Some(Viewport::new(900.0, 600.0, 1.0)));
    assert!(approx(
        rl.camera().unwrap().distance(),
        camera_distance(600.0, 60f32.to_radians())
    ));
}

#[test]
fn resize_before_start_is_buffered() {
    let mut rl = RenderLoop::new(linear_config()).unwrap();
    let mut backend = RecordingBackend::default();
    let oracle = oracle();

    rl.on_resize(Viewport::new(640.0, 480.0, 2.0));
    assert_eq!(rl.tick(ms(1000), &oracle, &mut backend), FrameOutcome::Idle);
    assert!(rl.resize_pending());

    rl.start(viewport(), &mut backend);
    rl.tick(ms(500), &oracle, &mut backend);
    assert_eq!(rl.viewport(), Some(Viewport::new(640.0, 480.0, 2.0)));
}

#[test]
fn stop_turns_ticks_into_noops() {
    let (mut rl, oracle, mut backend, _, _) = running(linear_config());
    let frames = backend.frames.len();

    rl.stop();
    let outcome = rl.tick(FRAME, &oracle, &mut backend);

    assert_eq!(outcome, FrameOutcome::Stopped);
    assert!(!outcome.keep_running());
    assert_eq!(backend.frames.len(), frames);
    assert_eq!(rl.state(), LoopState::Stopped);

    // a stopped loop cannot be restarted
    rl.start(viewport(), &mut backend);
    assert_eq!(rl.state(), LoopState::Stopped);
}

#[test]
fn failed_submit_drops_the_frame_only() {
    let (mut rl, oracle, mut backend, _, _) = running(linear_config());
    backend.fail = true;
    let outcome = rl.tick(FRAME, &oracle, &mut backend);
    assert_eq!(outcome, FrameOutcome::Dropped);
    assert!(outcome.keep_running());

    backend.fail = false;
    assert_eq!(rl.tick(FRAME, &oracle, &mut backend), FrameOutcome::Rendered);
}

#[test]
fn scroll_offset_trails_the_target() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());
    rl.on_scroll(100.0);
    rl.tick(FRAME, &oracle, &mut backend);

    // one step at factor 0.1 leaves 90 px pending
    assert!(approx(rl.plane(a).unwrap().params.offset, 90.0));
    assert!(approx(rl.plane(b).unwrap().params.offset, 90.0));
    assert!(approx(rl.scroll().current, 10.0));
}

#[test]
fn pointer_uv_is_damped() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    assert!(approx_vec2(rl.plane(a).unwrap().params.pointer, Vec2::splat(0.5)));

    rl.on_pointer_move(1000.0, 800.0);
    rl.tick(FRAME, &oracle, &mut backend);
    // centre plus a tenth of the way to the corner
    assert!(approx_vec2(rl.plane(a).unwrap().params.pointer, Vec2::splat(0.55)));
}

#[test]
fn time_parameter_accumulates() {
    let (mut rl, oracle, mut backend, a, _) = running(linear_config());
    rl.tick(ms(500), &oracle, &mut backend);
    assert!(approx(rl.plane(a).unwrap().params.time, 0.516));
}

#[test]
fn hover_ramps_in_and_out() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());

    rl.on_pointer_move(500.0, 400.0);
    assert_eq!(rl.hovered(), Some(a));
    rl.tick(ms(400), &oracle, &mut backend);
    assert!(approx(rl.plane(a).unwrap().params.hover, 1.0));

    rl.on_pointer_move(800.0, 200.0);
    assert_eq!(rl.hovered(), Some(b));
    rl.tick(ms(200), &oracle, &mut backend);
    assert!(approx(rl.plane(a).unwrap().params.hover, 0.5));
    assert!(approx(rl.plane(b).unwrap().params.hover, 0.5));
}

#[test]
fn hover_is_suspended_while_modal_is_open() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());
    rl.on_plane_click(a, &oracle).unwrap();
    rl.on_pointer_move(800.0, 200.0);
    rl.tick(ms(400), &oracle, &mut backend);
    assert_eq!(rl.hovered(), None);
    assert_eq!(rl.plane(b).unwrap().params.hover, 0.0);
}

#[test]
fn planes_reveal_on_start() {
    let config = SceneConfig {
        reveal_on_start: true,
        ..linear_config()
    };
    let mut rl = RenderLoop::new(config).unwrap();
    let a = rl.add_plane(GALLERY, texture(0));
    assert_eq!(rl.plane(a).unwrap().params.reveal, 0.0);

    let oracle = oracle();
    let mut backend = RecordingBackend::default();
    rl.start(viewport(), &mut backend);
    rl.tick(ms(250), &oracle, &mut backend);
    assert!(approx(rl.plane(a).unwrap().params.reveal, 0.5));

    // planes added later reveal on their own
    let b = rl.add_plane(SECOND, texture(1));
    rl.tick(ms(250), &oracle, &mut backend);
    assert_eq!(rl.plane(a).unwrap().params.reveal, 1.0);
    assert!(approx(rl.plane(b).unwrap().params.reveal, 0.5));
}

#[test]
fn planes_added_under_an_open_modal_wait_for_close() {
    let config = SceneConfig {
        reveal_on_start: true,
        ..linear_config()
    };
    let (mut rl, oracle, mut backend, a, _) = running(config);
    rl.on_plane_click(a, &oracle).unwrap();
    rl.tick(ms(1500), &oracle, &mut backend);

    let late = rl.add_plane(TargetId(7), texture(2));
    rl.tick(ms(500), &oracle, &mut backend);
    assert_eq!(rl.plane(late).unwrap().params.reveal, 0.0);

    rl.on_close(&oracle).unwrap();
    rl.tick(ms(500), &oracle, &mut backend);
    assert_eq!(rl.plane(late).unwrap().params.reveal, 1.0);
}

#[test]
fn removing_the_owner_releases_everything() {
    let (mut rl, oracle, mut backend, a, b) = running(linear_config());
    rl.attach_slider(a, vec![texture(1), texture(2)]).unwrap();
    rl.on_pointer_move(500.0, 400.0);
    rl.on_plane_click(a, &oracle).unwrap();

    let removed = rl.remove(a).unwrap();
    assert_eq!(removed.id, a);
    assert!(!rl.modal().is_open());
    assert!(rl.slider().is_none());
    assert_eq!(rl.hovered(), None);
    assert!(rl.engine().iter().all(|r| r.target != a));
    assert!(rl.on_next().is_none());

    rl.tick(FRAME, &oracle, &mut backend);
    assert_eq!(rl.registry().ids(), vec![b]);
}
