//! Synchronization primitives for Vulkan.
//!
//! This module provides wrappers for Vulkan synchronization objects:
//! - [`Semaphore`] - GPU-to-GPU synchronization (between queue operations)
//! - [`FrameSync`] - Per-frame semaphore pair for rendering
//!
//! # Overview
//!
//! Semaphores order operations within or across queues: waiting for image
//! acquisition before rendering, and waiting for rendering to complete before
//! presentation. Host-side pacing is done by waiting on the present queue
//! after each frame (see `Device::wait_present_idle`), so no fences are
//! needed with a single frame in flight.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use prism_rhi::device::Device;
//! use prism_rhi::sync::FrameSync;
//!
//! # fn example(device: Arc<Device>) -> Result<(), prism_rhi::RhiError> {
//! let sync = FrameSync::new(device)?;
//!
//! // Use sync.image_available_handle() for swapchain acquire
//! // Use sync.render_finished_handle() for present
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use ash::vk;
use tracing::{debug, info};

use crate::device::Device;
use crate::error::RhiResult;

/// Vulkan semaphore wrapper.
///
/// Semaphores are used for GPU-to-GPU synchronization between queue operations.
/// Common use cases include:
/// - Image available semaphore: signaled when a swapchain image is ready
/// - Render finished semaphore: signaled when rendering is complete
///
/// # Thread Safety
///
/// The semaphore is immutable after creation and can be safely shared between
/// threads. The Vulkan specification allows semaphore operations to be submitted
/// from multiple threads.
pub struct Semaphore {
    /// Reference to the logical device.
    device: Arc<Device>,
    /// Vulkan semaphore handle.
    semaphore: vk::Semaphore,
}

impl Semaphore {
    /// Creates a new semaphore.
    ///
    /// The semaphore is created in the unsignaled state.
    ///
    /// # Arguments
    ///
    /// * `device` - The logical device
    ///
    /// # Errors
    ///
    /// Returns an error if semaphore creation fails.
    pub fn new(device: Arc<Device>) -> RhiResult<Self> {
        let create_info = vk::SemaphoreCreateInfo::default();

        let semaphore = unsafe { device.handle().create_semaphore(&create_info, None)? };

        debug!("Created semaphore");

        Ok(Self { device, semaphore })
    }

    /// Returns the Vulkan semaphore handle.
    ///
    /// This handle can be used directly with Vulkan API calls.
    #[inline]
    pub fn handle(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_semaphore(self.semaphore, None);
        }
        debug!("Destroyed semaphore");
    }
}

/// Per-frame synchronization primitives.
///
/// This struct groups the semaphores needed for frame rendering:
/// - Image available semaphore: signaled when a swapchain image is acquired
/// - Render finished semaphore: signaled when rendering is complete
///
/// # Usage Pattern
///
/// ```text
/// 1. Acquire swapchain image (signals image_available)
/// 2. Submit command buffer:
///    - Wait on image_available at COLOR_ATTACHMENT_OUTPUT
///    - Signal render_finished
/// 3. Present (waits on render_finished)
/// 4. Wait for the present queue to go idle before the next frame
/// ```
pub struct FrameSync {
    /// Semaphore signaled when a swapchain image is available.
    image_available: Semaphore,
    /// Semaphore signaled when rendering is complete.
    render_finished: Semaphore,
}

impl FrameSync {
    /// Creates a new set of frame synchronization primitives.
    ///
    /// # Arguments
    ///
    /// * `device` - The logical device
    ///
    /// # Errors
    ///
    /// Returns an error if semaphore creation fails.
    pub fn new(device: Arc<Device>) -> RhiResult<Self> {
        let image_available = Semaphore::new(device.clone())?;
        let render_finished = Semaphore::new(device)?;

        info!("Created frame synchronization primitives");

        Ok(Self {
            image_available,
            render_finished,
        })
    }

    /// Returns a reference to the image available semaphore.
    ///
    /// This semaphore should be signaled by swapchain image acquisition
    /// and waited on before rendering to that image.
    #[inline]
    pub fn image_available(&self) -> &Semaphore {
        &self.image_available
    }

    /// Returns a reference to the render finished semaphore.
    ///
    /// This semaphore should be signaled when rendering is complete
    /// and waited on before presenting the image.
    #[inline]
    pub fn render_finished(&self) -> &Semaphore {
        &self.render_finished
    }

    /// Returns the raw Vulkan handle for the image available semaphore.
    #[inline]
    pub fn image_available_handle(&self) -> vk::Semaphore {
        self.image_available.handle()
    }

    /// Returns the raw Vulkan handle for the render finished semaphore.
    #[inline]
    pub fn render_finished_handle(&self) -> vk::Semaphore {
        self.render_finished.handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semaphore_is_send_sync() {
        // Compile-time check that Semaphore is Send + Sync
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Semaphore>();
    }

    #[test]
    fn test_frame_sync_is_send_sync() {
        // Compile-time check that FrameSync is Send + Sync
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameSync>();
    }
}
