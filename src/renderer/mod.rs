//! Rendering module
//!
//! Produces backend-agnostic draw lists; the host blits images and rasterizes
//! the triangle meshes.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::{Draw, DrawCmd, DrawContext, Frame, TextAlign, build_frame, build_selector_frame};
pub use vertex::Vertex;
