//! Page-side half of the modal: class toggles only. Geometry is handled by
//! the render loop.

use crate::constants::*;
use crate::dom;
use web_sys as web;

fn scroll_roots(document: &web::Document) -> impl Iterator<Item = web::Element> {
    [
        document.document_element(),
        document.body().map(web::Element::from),
    ]
    .into_iter()
    .flatten()
}

#[inline]
pub fn show(document: &web::Document, active: &web::Element) {
    _ = active.class_list().add_1(ACTIVE_CLASS);
    if let Some(modal) = dom::query(document, MODAL_SELECTOR) {
        _ = modal.class_list().add_1(SHOW_CLASS);
    }
    for el in scroll_roots(document) {
        _ = el.class_list().add_1(SCROLL_LOCK_CLASS);
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    for el in dom::query_all(document, &format!(".{ACTIVE_CLASS}")) {
        _ = el.class_list().remove_1(ACTIVE_CLASS);
    }
    if let Some(modal) = dom::query(document, MODAL_SELECTOR) {
        _ = modal.class_list().remove_1(SHOW_CLASS);
    }
    for el in scroll_roots(document) {
        _ = el.class_list().remove_1(SCROLL_LOCK_CLASS);
    }
}
