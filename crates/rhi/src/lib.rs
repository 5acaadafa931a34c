//! Vulkan rendering hardware interface.
//!
//! This crate wraps the ash Vulkan bindings in RAII types: instance and
//! device setup, swapchain management, pipelines, buffers, textures,
//! descriptors, and synchronization. Resources hold an `Arc<Device>` and
//! destroy their Vulkan handles on drop.

mod error;

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod render_pass;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod texture;
pub mod vertex;

pub use error::{RhiError, RhiResult};

// Re-export ash's vk module so downstream crates don't need a direct ash dependency
pub use ash::vk;
