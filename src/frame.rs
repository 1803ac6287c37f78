use crate::constants::MAX_FRAME_DELTA_MS;
use crate::dom::DomLayout;
use crate::input;
use crate::render::GpuState;
use instant::Instant;
use plane_core::{FrameOutcome, RenderLoop};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub render_loop: Rc<RefCell<RenderLoop>>,
    pub gpu: GpuState,
    pub layout: Rc<DomLayout>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) -> FrameOutcome {
        let now = Instant::now();
        let dt = input::frame_delta(
            now - self.last_instant,
            Duration::from_millis(MAX_FRAME_DELTA_MS),
        );
        self.last_instant = now;

        self.gpu.refresh_textures();
        let outcome = self
            .render_loop
            .borrow_mut()
            .tick(dt, &*self.layout, &mut self.gpu);
        if outcome == FrameOutcome::Stopped {
            log::info!("[frame] loop stopped");
        }
        outcome
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        // not re-arming ends the chain
        if frame_ctx_tick.borrow_mut().frame().keep_running() {
            request_frame(&tick_clone);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
