//! The per-frame driver tying layout sync, smoothing and transitions
//! together.
//!
//! Input handlers only record state or start transitions; all geometry and
//! parameter writes happen inside [`RenderLoop::tick`], in a fixed order:
//!
//! 1. apply a debounced resize
//! 2. advance the pointer and scroll filters
//! 3. advance transitions and react to their checkpoints
//! 4. re-query the modal rectangle when due
//! 5. resync every plane the modal does not own
//! 6. write per-plane shader inputs
//! 7. submit the frame

use crate::backend::{LayoutOracle, RenderBackend, SceneFrame};
use crate::config::SceneConfig;
use crate::constants::{HOVER_ACTIVE, HOVER_IDLE, REVEAL_HIDDEN, REVEAL_VISIBLE};
use crate::debounce::Debouncer;
use crate::error::ConfigError;
use crate::modal::ModalState;
use crate::projection::project;
use crate::registry::{ParamName, Plane, PlaneId, SceneRegistry, TargetId, TextureSource, Transform};
use crate::slider::{PendingSlide, SlideDirection, SliderState};
use crate::state::{Camera, LoopState, PointerState, ScreenRect, ScrollState, Viewport};
use crate::transition::{
    Checkpoint, Sample, TransitionEngine, TransitionEvent, TransitionEvents, TransitionHandle,
    TransitionKind, TransitionSink, TransitionSpec,
};
use glam::{Vec2, Vec3};
use std::time::Duration;

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not started yet; nothing was touched.
    Idle,
    Rendered,
    /// The backend rejected the frame; the loop keeps going.
    Dropped,
    Stopped,
}

impl FrameOutcome {
    /// Whether the host should schedule another tick.
    pub fn keep_running(self) -> bool {
        !matches!(self, FrameOutcome::Stopped)
    }
}

pub struct RenderLoop {
    config: SceneConfig,
    state: LoopState,
    registry: SceneRegistry,
    engine: TransitionEngine,
    camera: Option<Camera>,
    viewport: Option<Viewport>,
    pointer: PointerState,
    scroll: ScrollState,
    resize: Debouncer<Viewport>,
    modal: ModalState,
    modal_target: Option<TargetId>,
    slider: Option<SliderState>,
    hovered: Option<PlaneId>,
    time: f32,
    events: TransitionEvents,
}

impl RenderLoop {
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: SceneRegistry::new(config.mesh),
            resize: Debouncer::new(config.resize_quiet),
            config,
            state: LoopState::Idle,
            engine: TransitionEngine::new(),
            camera: None,
            viewport: None,
            pointer: PointerState::default(),
            scroll: ScrollState::default(),
            modal: ModalState::default(),
            modal_target: None,
            slider: None,
            hovered: None,
            time: 0.0,
            events: TransitionEvents::new(),
        })
    }

    // ---- setup ------------------------------------------------------------

    pub fn add_plane(&mut self, target: TargetId, texture: TextureSource) -> PlaneId {
        let id = self.registry.add_plane(target, texture);
        if self.config.reveal_on_start {
            self.registry.apply(id, Sample::Param(ParamName::Reveal, REVEAL_HIDDEN));
            // while the modal is open the rest of the gallery stays hidden;
            // closing reveals this plane with the others
            if self.state == LoopState::Running && !self.modal.is_open() {
                self.set_visible(id, true);
            }
        }
        id
    }

    /// Drop a plane together with everything that refers to it.
    pub fn remove(&mut self, id: PlaneId) -> Option<Plane> {
        let plane = self.registry.remove(id)?;
        self.engine.cancel_target(id);
        if self.modal.owns(id) {
            self.modal.release();
            log::info!("[modal] released: owner {} removed", id.0);
        }
        if self.slider.as_ref().is_some_and(|s| s.plane == id) {
            self.slider = None;
            log::info!("[slider] detached from removed plane {}", id.0);
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        Some(plane)
    }

    /// Element whose rectangle an opened plane animates to. Without one the
    /// whole viewport is used.
    pub fn set_modal_target(&mut self, target: Option<TargetId>) {
        self.modal_target = target;
    }

    pub fn attach_slider(&mut self, plane: PlaneId, textures: Vec<TextureSource>) -> Result<(), ConfigError> {
        let slider = SliderState::new(plane, textures).ok_or(ConfigError::EmptySlider)?;
        let first = slider.texture(0);
        let p = self
            .registry
            .get_mut(plane)
            .ok_or(ConfigError::UnknownPlane(plane.0))?;
        p.params.primary = first.id;
        p.params.incoming = first.id;
        p.params.image_aspect = first.aspect;
        p.params.slide_progress = 1.0;
        log::info!("[slider] {} textures on plane {}", slider.count(), plane.0);
        self.slider = Some(slider);
        Ok(())
    }

    /// Idle -> Running. Later calls are ignored.
    pub fn start<B: RenderBackend>(&mut self, viewport: Viewport, backend: &mut B) {
        if self.state != LoopState::Idle {
            log::warn!("[loop] start ignored in state {:?}", self.state);
            return;
        }
        self.camera = Some(Camera::for_viewport(
            viewport,
            self.config.fovy_radians(),
            self.config.near,
            self.config.far,
        ));
        self.viewport = Some(viewport);
        self.pointer.reset(viewport.size() / 2.0);
        self.scroll.reset(self.scroll.target);
        backend.resize(viewport);
        self.state = LoopState::Running;
        if self.config.reveal_on_start {
            for id in self.registry.ids() {
                self.set_visible(id, true);
            }
        }
        log::info!(
            "[loop] started {}x{} with {} planes",
            viewport.width,
            viewport.height,
            self.registry.len()
        );
    }

    /// Following ticks become no-ops and report [`FrameOutcome::Stopped`].
    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            log::info!("[loop] stopped after {:.2}s", self.time);
        }
    }

    // ---- input ------------------------------------------------------------

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer.set_target(Vec2::new(x, y));
        if self.state != LoopState::Running || self.modal.is_open() {
            return;
        }
        let hit = self.registry.plane_at(x, y);
        if hit == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            self.start_hover(prev, HOVER_IDLE);
        }
        if let Some(id) = hit {
            self.start_hover(id, HOVER_ACTIVE);
        }
        self.hovered = hit;
    }

    pub fn on_scroll(&mut self, offset: f32) {
        self.scroll.set_target(offset);
    }

    /// Buffer a new viewport; it is applied once resizes stop arriving.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.resize.push(viewport);
    }

    /// Open the modal on `id`. Returns `None` when the click is ignored.
    pub fn on_plane_click(&mut self, id: PlaneId, oracle: &impl LayoutOracle) -> Option<TransitionHandle> {
        if self.state != LoopState::Running {
            return None;
        }
        if self.modal.is_open() {
            log::debug!("[modal] click on plane {} ignored while open", id.0);
            return None;
        }
        let viewport = self.viewport?;
        let home = match self.registry.get(id) {
            Some(p) => p.transform,
            None => {
                log::warn!("[modal] click on unknown plane {}", id.0);
                return None;
            }
        };
        let to = self.modal_transform(oracle, viewport);
        let handle = self.engine.start(
            TransitionSpec::transform(TransitionKind::Open, id, home, to).timing(&self.config.open),
        );
        self.modal.open(id, home, handle);
        if let Some(p) = self.registry.get_mut(id) {
            p.active_transition = Some(handle);
        }
        if let Some(prev) = self.hovered.take() {
            self.start_hover(prev, HOVER_IDLE);
        }
        for other in self.registry.ids() {
            if other != id {
                self.set_visible(other, false);
            }
        }
        log::info!("[modal] open plane {}", id.0);
        Some(handle)
    }

    /// Send the modal owner back to its layout rectangle.
    pub fn on_close(&mut self, oracle: &impl LayoutOracle) -> Option<TransitionHandle> {
        let owner = self.modal.owner?;
        if self.modal.is_closing() {
            return None;
        }
        let viewport = self.viewport?;
        let from = self.registry.get(owner)?.transform;
        let to = self
            .registry
            .get(owner)
            .and_then(|p| usable_rect(oracle, p.target))
            .map(|rect| Transform::from_placement(project(rect, viewport)))
            .unwrap_or(self.modal.home);
        let handle = self.engine.start(
            TransitionSpec::transform(TransitionKind::Close, owner, from, to).timing(&self.config.close),
        );
        self.modal.opening = None;
        self.modal.closing = Some(handle);
        if let Some(p) = self.registry.get_mut(owner) {
            p.active_transition = Some(handle);
        }
        for other in self.registry.ids() {
            if other != owner {
                self.set_visible(other, true);
            }
        }
        log::info!("[modal] close plane {}", owner.0);
        Some(handle)
    }

    pub fn on_next(&mut self) -> Option<TransitionHandle> {
        self.slide(SlideDirection::Next)
    }

    pub fn on_prev(&mut self) -> Option<TransitionHandle> {
        self.slide(SlideDirection::Prev)
    }

    // ---- frame ------------------------------------------------------------

    pub fn tick<B: RenderBackend>(
        &mut self,
        dt: Duration,
        oracle: &impl LayoutOracle,
        backend: &mut B,
    ) -> FrameOutcome {
        self.events.clear();
        match self.state {
            LoopState::Idle => return FrameOutcome::Idle,
            LoopState::Stopped => return FrameOutcome::Stopped,
            LoopState::Running => {}
        }
        let dt_sec = dt.as_secs_f32();
        self.time += dt_sec;

        let resized = match self.resize.advance(dt) {
            Some(viewport) => {
                self.apply_viewport(viewport, backend);
                true
            }
            None => false,
        };

        self.pointer.step(self.config.pointer_smoothing);
        self.scroll.step(self.config.scroll_smoothing);

        let events = self.engine.advance(dt_sec, &mut self.registry);
        for event in &events {
            self.on_checkpoint(event);
        }
        self.events = events;

        self.modal.since_poll += dt;
        if resized || self.modal.since_poll >= self.config.modal_poll {
            self.modal.since_poll = Duration::ZERO;
            self.poll_modal(oracle);
        }

        let (Some(camera), Some(viewport)) = (self.camera.as_ref(), self.viewport) else {
            return FrameOutcome::Idle;
        };

        let owner = self.modal.owner;
        self.registry.for_each_mut(|plane| {
            if Some(plane.id) == owner {
                return;
            }
            let Some(rect) = usable_rect(oracle, plane.target) else {
                return;
            };
            let placement = project(rect, viewport);
            plane.rect = Some(rect);
            plane.transform.position = placement.position;
            plane.transform.scale = placement.scale;
        });

        let offset = self.scroll.offset();
        let pointer_uv = self.pointer.current / viewport.size().max(Vec2::ONE);
        let time = self.time;
        self.registry.for_each_mut(|plane| {
            let params = &mut plane.params;
            params.time = time;
            params.offset = offset;
            params.pointer = pointer_uv;
            params.resolution = viewport.size();
            let s = plane.transform.scale;
            params.plane_aspect = if s.y > 0.0 { s.x / s.y } else { 1.0 };
        });

        let frame = SceneFrame {
            camera,
            viewport,
            planes: self.registry.as_slice(),
            overlay: owner,
        };
        match backend.submit(&frame) {
            Ok(()) => FrameOutcome::Rendered,
            Err(e) => {
                log::error!("[loop] frame dropped: {}", e);
                FrameOutcome::Dropped
            }
        }
    }

    // ---- accessors ----------------------------------------------------------

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn plane(&self, id: PlaneId) -> Option<&Plane> {
        self.registry.get(id)
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn slider(&self) -> Option<&SliderState> {
        self.slider.as_ref()
    }

    pub fn hovered(&self) -> Option<PlaneId> {
        self.hovered
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Checkpoints crossed during the most recent tick.
    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    // ---- internals --------------------------------------------------------

    fn apply_viewport<B: RenderBackend>(&mut self, viewport: Viewport, backend: &mut B) {
        self.viewport = Some(viewport);
        if let Some(camera) = self.camera.as_mut() {
            camera.fit(viewport);
        }
        backend.resize(viewport);
        log::info!(
            "[resize] {}x{} @{}",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
    }

    fn modal_transform(&self, oracle: &impl LayoutOracle, viewport: Viewport) -> Transform {
        let rect = self
            .modal_target
            .and_then(|t| usable_rect(oracle, t))
            .unwrap_or_else(|| ScreenRect::new(0.0, 0.0, viewport.width, viewport.height));
        let mut to = Transform::from_placement(project(rect, viewport)).with_depth(self.config.modal_depth);
        to.rotation = Vec3::ZERO;
        to
    }

    // In-flight opens follow the modal element; settled ones snap to it.
    fn poll_modal(&mut self, oracle: &impl LayoutOracle) {
        let Some(owner) = self.modal.owner else {
            return;
        };
        if self.modal.is_closing() {
            return;
        }
        let Some(viewport) = self.viewport else {
            return;
        };
        let to = self.modal_transform(oracle, viewport);
        let retargeted = self
            .modal
            .opening
            .is_some_and(|h| self.engine.retarget(h, Sample::Transform(to)));
        if !retargeted {
            if let Some(p) = self.registry.get_mut(owner) {
                p.transform = to;
            }
        }
    }

    fn on_checkpoint(&mut self, event: &TransitionEvent) {
        if event.checkpoint != Checkpoint::Completed {
            return;
        }
        if let Some(p) = self.registry.get_mut(event.target) {
            if p.active_transition == Some(event.handle) {
                p.active_transition = None;
            }
        }
        match event.kind {
            TransitionKind::Open if self.modal.opening == Some(event.handle) => {
                self.modal.opening = None;
                log::debug!("[modal] plane {} settled open", event.target.0);
            }
            TransitionKind::Close if self.modal.closing == Some(event.handle) => {
                self.modal.release();
                log::info!("[modal] released plane {}", event.target.0);
            }
            TransitionKind::SlideNext | TransitionKind::SlidePrev => self.commit_slide(event.handle),
            _ => {}
        }
    }

    fn slide(&mut self, direction: SlideDirection) -> Option<TransitionHandle> {
        if self.state != LoopState::Running {
            return None;
        }
        let slider = self.slider.as_mut()?;
        if let Some(pending) = slider.pending.take() {
            self.engine.cancel(pending.handle);
        }
        let index = slider.index_toward(direction);
        let outgoing = slider.texture(slider.current);
        let plane = slider.plane;
        let (kind, extent) = match direction {
            SlideDirection::Next => (TransitionKind::SlideNext, self.config.slide_extent),
            SlideDirection::Prev => (TransitionKind::SlidePrev, -self.config.slide_extent),
        };
        let p = self.registry.get_mut(plane)?;
        p.params.incoming = outgoing.id;
        p.params.slide_progress = 0.0;
        p.params.slide_blend = 0.0;
        let handle = self.engine.start(
            TransitionSpec::param(kind, plane, ParamName::SlideBlend, 0.0, extent).timing(&self.config.slide),
        );
        slider.pending = Some(PendingSlide { handle, index });
        log::debug!("[slider] {:?} from {} to {}", direction, slider.current, index);
        Some(handle)
    }

    fn commit_slide(&mut self, handle: TransitionHandle) {
        let Some(slider) = self.slider.as_mut() else {
            return;
        };
        let Some(pending) = slider.pending.filter(|p| p.handle == handle) else {
            return;
        };
        slider.pending = None;
        slider.current = pending.index;
        let texture = slider.texture(pending.index);
        if let Some(p) = self.registry.get_mut(slider.plane) {
            p.params.primary = texture.id;
            p.params.image_aspect = texture.aspect;
            p.params.slide_progress = 1.0;
        }
        log::info!("[slider] committed slide {}", pending.index);
    }

    fn set_visible(&mut self, id: PlaneId, visible: bool) {
        let Some(p) = self.registry.get(id) else {
            return;
        };
        let (kind, to) = if visible {
            (TransitionKind::Show, REVEAL_VISIBLE)
        } else {
            (TransitionKind::Hide, REVEAL_HIDDEN)
        };
        let from = p.params.reveal;
        self.engine.start(
            TransitionSpec::param(kind, id, ParamName::Reveal, from, to).timing(&self.config.visibility),
        );
    }

    fn start_hover(&mut self, id: PlaneId, to: f32) {
        let Some(p) = self.registry.get(id) else {
            return;
        };
        let from = p.params.hover;
        self.engine.start(
            TransitionSpec::param(TransitionKind::Hover, id, ParamName::Hover, from, to)
                .timing(&self.config.hover),
        );
    }
}

fn usable_rect(oracle: &impl LayoutOracle, target: TargetId) -> Option<ScreenRect> {
    oracle.rect(target).filter(|r| !r.is_empty())
}
