// Document hooks and browser-side limits. Tuning constants for the scene
// itself live in `plane_core::constants`.

// Container the canvas is appended to; also carries `data-*` config overrides
pub const CONTAINER_SELECTOR: &str = ".webgl";
pub const CONFIG_ATTR_PREFIX: &str = "data-";

// Elements that become planes (images or videos)
pub const PLANE_SELECTOR: &str = ".item-image img, .item-image video";

// Modal markup
pub const MODAL_SELECTOR: &str = ".modal";
pub const MODAL_TARGET_SELECTOR: &str = ".modal-image";
pub const CLOSE_SELECTOR: &str = ".close";

// Gallery slider: textures bound to the first plane, plus its controls
pub const SLIDE_SELECTOR: &str = ".slides img";
pub const PREV_SELECTOR: &str = ".prev";
pub const NEXT_SELECTOR: &str = ".next";

// Classes toggled while the modal is open
pub const ACTIVE_CLASS: &str = "is-active"; // clicked element
pub const SHOW_CLASS: &str = "is-show"; // modal element
pub const SCROLL_LOCK_CLASS: &str = "is-hidden"; // <html> and <body>

// Canvas
pub const CANVAS_STYLE: &str =
    "position:fixed;top:0;left:0;width:100vw;height:100vh;pointer-events:none;";
pub const CLEAR_RGBA: [f64; 4] = [0.0, 0.0, 0.0, 0.0];

// Frame deltas above this are clamped, e.g. after the tab was hidden
pub const MAX_FRAME_DELTA_MS: u64 = 100;

// Video readiness (HTMLMediaElement.HAVE_CURRENT_DATA)
pub const VIDEO_HAVE_CURRENT_DATA: u16 = 2;
