//! Rendering: CPU-side scene geometry plus a WebGPU triangle pipeline
//!
//! `layout` turns a `FrameResult` into vertices for the top-down and projected
//! views; `pipeline` uploads and draws them.

pub mod layout;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use layout::{SceneStyle, build_scene, hud_summary};
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
