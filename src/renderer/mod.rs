//! WebGPU rendering module
//!
//! Scene draw lists are tessellated on the CPU into one flat-colored
//! triangle list per frame.

pub mod pipeline;
pub mod shapes;

pub use pipeline::RenderState;
pub use shapes::Vertex;
