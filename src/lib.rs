#![cfg(target_arch = "wasm32")]
use instant::Instant;
use plane_core::{RenderLoop, TextureSource};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod modal;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("plane-web starting");

    let Some(document) = dom::window_document() else {
        return Err(JsValue::from_str("no document"));
    };
    // layout rectangles are only final once images have their size
    if document.ready_state() == "complete" {
        spawn_init();
    } else if let Some(window) = web::window() {
        let closure = Closure::once(spawn_init);
        _ = window.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    Ok(())
}

fn spawn_init() {
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let found = dom::discover(&document)?;
    let config = dom::read_config(&found.container);
    let viewport = dom::viewport(&window);
    let mut render_loop = RenderLoop::new(config)?;

    let canvas = dom::create_canvas(&document, &found.container)?;
    let mut gpu = render::GpuState::new(canvas, viewport, render_loop.config()).await?;

    let mut layout = dom::DomLayout::default();
    let mut planes = Vec::with_capacity(found.planes.len());
    for (element, media) in found.planes {
        let aspect = media.aspect();
        let texture = TextureSource {
            id: gpu.register_texture(media),
            aspect,
        };
        let target = layout.register(element.clone());
        planes.push((element, render_loop.add_plane(target, texture)));
    }
    if let Some(element) = found.modal_target {
        render_loop.set_modal_target(Some(layout.register(element)));
    }
    if let Some(&(_, first)) = planes.first() {
        if !found.slides.is_empty() {
            let textures = found
                .slides
                .into_iter()
                .map(|media| {
                    let aspect = media.aspect();
                    TextureSource {
                        id: gpu.register_texture(media),
                        aspect,
                    }
                })
                .collect();
            render_loop.attach_slider(first, textures)?;
        }
    }
    log::info!(
        "[init] planes={} slides={} viewport={}x{}@{}",
        planes.len(),
        render_loop.slider().map_or(0, |s| s.count()),
        viewport.width,
        viewport.height,
        viewport.pixel_ratio
    );

    render_loop.on_scroll(window.scroll_y().unwrap_or(0.0) as f32);
    render_loop.start(viewport, &mut gpu);

    let render_loop = Rc::new(RefCell::new(render_loop));
    let layout = Rc::new(layout);
    events::wire_input_handlers(events::InputWiring {
        render_loop: render_loop.clone(),
        layout: layout.clone(),
        planes: Rc::new(planes),
    });

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        render_loop,
        gpu,
        layout,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
