pub mod capabilities;
pub mod color;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod flock;
pub mod hero;
pub mod math;
pub mod renderer;
pub mod renderers;
pub mod surface;
pub static RAYMARCH_WGSL: &str = include_str!("../shaders/raymarch.wgsl");

pub use capabilities::*;
pub use color::*;
pub use dispatch::*;
pub use error::*;
pub use renderer::*;
pub use surface::*;
