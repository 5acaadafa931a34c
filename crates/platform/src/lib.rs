//! Platform layer: window management and surface creation.
//!
//! This crate wraps winit and owns the boundary between the OS window and
//! the Vulkan surface. It also defines the [`ResizeObserver`] interface the
//! renderer implements to be notified of surface size changes.

mod window;

pub use window::{Surface, Window, get_required_extensions};

/// Observer interface for presentable-surface size changes.
///
/// The window event loop delivers every size change synchronously to the
/// registered observer. Observers are expected to defer the expensive
/// reaction (swapchain recreation) to their next frame rather than rebuild
/// inside the notification.
pub trait ResizeObserver {
    /// Called when the surface size changes, with the new size in pixels.
    fn surface_resized(&mut self, width: u32, height: u32);
}
