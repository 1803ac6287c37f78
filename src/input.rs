use plane_core::Viewport;
use std::time::Duration;

/// Discrete commands shared by buttons and the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Close,
    Prev,
    Next,
}

#[inline]
pub fn control_for_key(key: &str) -> Option<Control> {
    match key {
        "Escape" | "Esc" => Some(Control::Close),
        "ArrowLeft" => Some(Control::Prev),
        "ArrowRight" => Some(Control::Next),
        _ => None,
    }
}

/// Frame delta with a ceiling so a backgrounded tab does not skip
/// transitions to their end in one frame.
#[inline]
pub fn frame_delta(elapsed: Duration, max: Duration) -> Duration {
    elapsed.min(max)
}

/// Viewport from window metrics; unusable values collapse to 1.
pub fn viewport_from_window(width: f64, height: f64, device_pixel_ratio: f64) -> Viewport {
    let sane = |v: f64| if v.is_finite() && v >= 1.0 { v as f32 } else { 1.0 };
    Viewport::new(sane(width), sane(height), sane(device_pixel_ratio))
}

/// Aspect of a media source, preferring its intrinsic size over the laid
/// out box (images that are still loading report 0x0).
pub fn media_aspect(natural: (u32, u32), laid_out: (f64, f64)) -> f32 {
    match natural {
        (w, h) if w > 0 && h > 0 => w as f32 / h as f32,
        _ if laid_out.0 > 0.0 && laid_out.1 > 0.0 => (laid_out.0 / laid_out.1) as f32,
        _ => 1.0,
    }
}
