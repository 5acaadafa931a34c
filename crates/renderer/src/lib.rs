//! High-level renderer built on the prism RHI.
//!
//! Draws a spinning textured quad with a single frame in flight. The
//! [`Renderer`] owns every Vulkan resource and tears them down in the
//! correct order on drop.

pub mod renderer;
pub mod ubo;

pub use renderer::Renderer;
pub use ubo::UniformBufferObject;
