pub mod assets;
pub mod presets;
pub mod variants;
pub mod warp;

pub use assets::*;
pub use presets::*;
pub use variants::*;
pub use warp::*;
