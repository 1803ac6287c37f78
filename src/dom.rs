use crate::constants::*;
use crate::input;
use plane_core::{LayoutOracle, SceneConfig, ScreenRect, TargetId, Viewport, OVERRIDE_KEYS};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn query_all(document: &web::Document, selector: &str) -> Vec<web::Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web::Element>().ok())
        .collect()
}

#[inline]
pub fn query(document: &web::Document, selector: &str) -> Option<web::Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn on_click(element: &web::Element, mut handler: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
pub fn add_click_listener(document: &web::Document, selector: &str, handler: impl FnMut() + 'static) {
    if let Some(el) = query(document, selector) {
        on_click(&el, handler);
    }
}

pub fn viewport(window: &web::Window) -> Viewport {
    let px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    input::viewport_from_window(
        px(window.inner_width()),
        px(window.inner_height()),
        window.device_pixel_ratio(),
    )
}

/// Layout oracle over the elements discovered at startup.
#[derive(Default)]
pub struct DomLayout {
    targets: Vec<web::Element>,
}

impl DomLayout {
    pub fn register(&mut self, element: web::Element) -> TargetId {
        self.targets.push(element);
        TargetId(self.targets.len() as u32 - 1)
    }

    pub fn element(&self, target: TargetId) -> Option<&web::Element> {
        self.targets.get(target.0 as usize)
    }
}

impl LayoutOracle for DomLayout {
    fn rect(&self, target: TargetId) -> Option<ScreenRect> {
        let el = self.element(target)?;
        if !el.is_connected() {
            return None;
        }
        let r = el.get_bounding_client_rect();
        Some(ScreenRect::new(
            r.left() as f32,
            r.top() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }
}

/// A texture source found in the document.
#[derive(Clone)]
pub enum Media {
    Image(web::HtmlImageElement),
    Video(web::HtmlVideoElement),
}

impl Media {
    pub fn from_element(element: &web::Element) -> Option<Media> {
        if let Some(img) = element.dyn_ref::<web::HtmlImageElement>() {
            return Some(Media::Image(img.clone()));
        }
        element
            .dyn_ref::<web::HtmlVideoElement>()
            .map(|v| Media::Video(v.clone()))
    }

    pub fn aspect(&self) -> f32 {
        let (natural, el): ((u32, u32), &web::Element) = match self {
            Media::Image(img) => ((img.natural_width(), img.natural_height()), img.unchecked_ref()),
            Media::Video(v) => ((v.video_width(), v.video_height()), v.unchecked_ref()),
        };
        let r = el.get_bounding_client_rect();
        input::media_aspect(natural, (r.width(), r.height()))
    }
}

pub struct Discovered {
    pub container: web::Element,
    pub planes: Vec<(web::Element, Media)>,
    pub modal_target: Option<web::Element>,
    pub slides: Vec<Media>,
}

/// One pass over the document collecting everything the scene binds to.
pub fn discover(document: &web::Document) -> anyhow::Result<Discovered> {
    let container = query(document, CONTAINER_SELECTOR)
        .ok_or_else(|| anyhow::anyhow!("missing {}", CONTAINER_SELECTOR))?;
    let planes = query_all(document, PLANE_SELECTOR)
        .into_iter()
        .filter_map(|el| match Media::from_element(&el) {
            Some(media) => Some((el, media)),
            None => {
                log::warn!("[dom] {} is not an image or video", el.tag_name());
                None
            }
        })
        .collect();
    let slides = query_all(document, SLIDE_SELECTOR)
        .iter()
        .filter_map(Media::from_element)
        .collect();
    Ok(Discovered {
        container,
        planes,
        modal_target: query(document, MODAL_TARGET_SELECTOR),
        slides,
    })
}

/// Defaults plus `data-*` overrides from the container. Bad values are
/// reported and skipped.
pub fn read_config(container: &web::Element) -> SceneConfig {
    let mut config = SceneConfig::default();
    for key in OVERRIDE_KEYS {
        let Some(value) = container.get_attribute(&format!("{CONFIG_ATTR_PREFIX}{key}")) else {
            continue;
        };
        match config.apply_override(key, &value) {
            Ok(()) => log::info!("[config] {} = {}", key, value),
            Err(e) => log::warn!("[config] ignoring override: {}", e),
        }
    }
    config
}

pub fn create_canvas(document: &web::Document, container: &web::Element) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    _ = canvas.set_attribute("style", CANVAS_STYLE);
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}
