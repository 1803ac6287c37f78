pub mod backend;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod easing;
pub mod error;
pub mod modal;
pub mod projection;
pub mod registry;
pub mod render_loop;
pub mod slider;
pub mod smoothing;
pub mod state;
pub mod transition;
pub static PLANE_WGSL: &str = include_str!("../shaders/plane.wgsl");

pub use backend::*;
pub use config::*;
pub use debounce::*;
pub use easing::*;
pub use error::*;
pub use modal::*;
pub use projection::*;
pub use registry::*;
pub use render_loop::*;
pub use slider::*;
pub use smoothing::*;
pub use state::*;
pub use transition::*;
