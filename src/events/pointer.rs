use super::InputWiring;
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub(super) fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        w.render_loop
            .borrow_mut()
            .on_pointer_move(ev.client_x() as f32, ev.client_y() as f32);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub(super) fn wire_scroll(w: &InputWiring) {
    let Some(wnd) = web::window() else {
        return;
    };
    let w = w.clone();
    let wnd_for_closure = wnd.clone();
    let closure = Closure::wrap(Box::new(move || {
        let y = wnd_for_closure.scroll_y().unwrap_or(0.0);
        w.render_loop.borrow_mut().on_scroll(y as f32);
    }) as Box<dyn FnMut()>);
    _ = wnd.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub(super) fn wire_resize(w: &InputWiring) {
    let Some(wnd) = web::window() else {
        return;
    };
    let w = w.clone();
    let wnd_for_closure = wnd.clone();
    let closure = Closure::wrap(Box::new(move || {
        let viewport = dom::viewport(&wnd_for_closure);
        w.render_loop.borrow_mut().on_resize(viewport);
    }) as Box<dyn FnMut()>);
    _ = wnd.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}
