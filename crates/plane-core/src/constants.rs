// Default tuning shared by the core and the web front end.

// Camera
pub const DEFAULT_FOV_Y_DEGREES: f32 = 60.0;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 1000.0;
pub const FAR_DISTANCE_FACTOR: f32 = 2.0; // far plane never closer than this multiple of the camera distance
pub const MAX_PIXEL_RATIO: f32 = 2.0;

// Smoothing (fraction of the remaining gap closed per frame)
pub const POINTER_SMOOTHING: f32 = 0.1;
pub const SCROLL_SMOOTHING: f32 = 0.1;

// Resize debounce
pub const RESIZE_QUIET_MS: u64 = 500;

// Transition timings (seconds)
pub const OPEN_DURATION_SEC: f32 = 1.5;
pub const CLOSE_DURATION_SEC: f32 = 1.5;
pub const VISIBILITY_DURATION_SEC: f32 = 0.5;
pub const SLIDE_DURATION_SEC: f32 = 1.5;
pub const HOVER_DURATION_SEC: f32 = 0.4;

// Slider blend extreme reached at the end of phase one
pub const SLIDE_EXTENT: f32 = 100.0;

// Modal
pub const MODAL_DEPTH: f32 = 1.0; // world z of the modal owner, in front of the gallery
pub const MODAL_POLL_MS: u64 = 250;

// Reveal parameter endpoints
pub const REVEAL_HIDDEN: f32 = 0.0;
pub const REVEAL_VISIBLE: f32 = 1.0;

// Hover parameter endpoints
pub const HOVER_IDLE: f32 = 0.0;
pub const HOVER_ACTIVE: f32 = 1.0;
