use super::InputWiring;
use crate::constants::{CLOSE_SELECTOR, NEXT_SELECTOR, PREV_SELECTOR};
use crate::dom;
use crate::input::{self, Control};
use crate::modal;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn apply(w: &InputWiring, control: Control) {
    let mut render_loop = w.render_loop.borrow_mut();
    match control {
        Control::Close => {
            if render_loop.on_close(&*w.layout).is_some() {
                if let Some(document) = dom::window_document() {
                    modal::hide(&document);
                }
            }
        }
        Control::Prev => {
            render_loop.on_prev();
        }
        Control::Next => {
            render_loop.on_next();
        }
    }
}

pub(super) fn wire_plane_clicks(w: &InputWiring) {
    for (element, id) in w.planes.iter() {
        let w = w.clone();
        let id = *id;
        let clicked = element.clone();
        dom::on_click(element, move || {
            if w.render_loop.borrow().modal().is_open() {
                return;
            }
            // the modal element only has a layout rectangle once it is shown
            let document = dom::window_document();
            if let Some(document) = &document {
                modal::show(document, &clicked);
            }
            let opened = w.render_loop.borrow_mut().on_plane_click(id, &*w.layout);
            if opened.is_none() {
                if let Some(document) = &document {
                    modal::hide(document);
                }
            }
        });
    }
}

pub(super) fn wire_buttons(w: &InputWiring) {
    let Some(document) = dom::window_document() else {
        return;
    };
    for (selector, control) in [
        (CLOSE_SELECTOR, Control::Close),
        (PREV_SELECTOR, Control::Prev),
        (NEXT_SELECTOR, Control::Next),
    ] {
        let w = w.clone();
        dom::add_click_listener(&document, selector, move || apply(&w, control));
    }
}

pub(super) fn wire_keydown(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if let Some(control) = input::control_for_key(&ev.key()) {
            apply(&w, control);
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
