//! DOM listeners feeding the render loop.
//!
//! Handlers only forward input; every geometry change happens on the next
//! frame inside `RenderLoop::tick`.

use crate::dom::DomLayout;
use plane_core::{PlaneId, RenderLoop};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

mod controls;
mod pointer;

#[derive(Clone)]
pub struct InputWiring {
    pub render_loop: Rc<RefCell<RenderLoop>>,
    pub layout: Rc<DomLayout>,
    /// Clickable element of each plane.
    pub planes: Rc<Vec<(web::Element, PlaneId)>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    pointer::wire_pointermove(&w);
    pointer::wire_scroll(&w);
    pointer::wire_resize(&w);
    controls::wire_plane_clicks(&w);
    controls::wire_buttons(&w);
    controls::wire_keydown(&w);
}
