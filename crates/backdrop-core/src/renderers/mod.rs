pub mod ascii_tunnel;
pub mod gates;
pub mod nebula;
pub mod raymarch;
pub mod starfield;
pub mod vector_lanes;
pub mod warp;
pub mod wireframe;

pub use ascii_tunnel::AsciiTunnel;
pub use gates::GatesOverlay;
pub use nebula::Nebula;
pub use raymarch::{RaymarchParams, RaymarchUniforms};
pub use starfield::Starfield;
pub use vector_lanes::VectorLanes;
pub use warp::WarpField;
pub use wireframe::WireframeCorridor;
