//! Texture image management.
//!
//! This module handles sampled 2D textures: image creation, staging uploads,
//! layout transitions, image views, and samplers.
//!
//! # Overview
//!
//! A [`Texture`] is created from a decoded RGBA8 image (or loaded from a file
//! via the `image` crate). Pixel data is written to a host-visible staging
//! buffer, the image is transitioned to `TRANSFER_DST_OPTIMAL`, the copy is
//! recorded, and the image is transitioned to `SHADER_READ_ONLY_OPTIMAL` for
//! sampling. Only these two transitions are supported; anything else is
//! rejected with [`RhiError::UnsupportedLayoutTransition`].

use std::path::Path;
use std::sync::Arc;

use ash::vk;
use gpu_allocator::MemoryLocation;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme};
use tracing::{debug, info};

use crate::buffer::{Buffer, BufferUsage};
use crate::command::{CommandPool, one_time_submit};
use crate::device::Device;
use crate::error::{RhiError, RhiResult};

/// Returns the pipeline stages and access masks for a supported layout transition.
///
/// Supported transitions:
/// - `UNDEFINED` to `TRANSFER_DST_OPTIMAL` (before the staging copy)
/// - `TRANSFER_DST_OPTIMAL` to `SHADER_READ_ONLY_OPTIMAL` (after the copy)
///
/// # Errors
///
/// Returns [`RhiError::UnsupportedLayoutTransition`] for any other pair.
pub fn transition_barrier_masks(
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
) -> RhiResult<(
    vk::PipelineStageFlags,
    vk::PipelineStageFlags,
    vk::AccessFlags,
    vk::AccessFlags,
)> {
    match (old_layout, new_layout) {
        (vk::ImageLayout::UNDEFINED, vk::ImageLayout::TRANSFER_DST_OPTIMAL) => Ok((
            vk::PipelineStageFlags::TOP_OF_PIPE,
            vk::PipelineStageFlags::TRANSFER,
            vk::AccessFlags::empty(),
            vk::AccessFlags::TRANSFER_WRITE,
        )),
        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL) => {
            Ok((
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                vk::AccessFlags::TRANSFER_WRITE,
                vk::AccessFlags::SHADER_READ,
            ))
        }
        (from, to) => Err(RhiError::UnsupportedLayoutTransition { from, to }),
    }
}

/// Sampled 2D texture with image view and sampler.
///
/// The texture owns its image, allocation, view, and sampler, and destroys
/// them all on drop.
///
/// # Thread Safety
///
/// The texture is immutable after creation and can be safely shared between
/// threads.
pub struct Texture {
    /// Reference to the logical device.
    device: Arc<Device>,
    /// Vulkan image handle.
    image: vk::Image,
    /// Image view for shader access.
    image_view: vk::ImageView,
    /// Sampler describing filtering and addressing.
    sampler: vk::Sampler,
    /// GPU memory allocation.
    allocation: Option<Allocation>,
    /// Image format.
    format: vk::Format,
    /// Image extent.
    extent: vk::Extent2D,
    /// Current image layout.
    layout: vk::ImageLayout,
}

impl Texture {
    /// Loads a texture from an image file.
    ///
    /// The file is decoded with the `image` crate and converted to RGBA8.
    ///
    /// # Arguments
    ///
    /// * `device` - The logical device
    /// * `path` - Path to the image file (PNG, JPEG, etc.)
    /// * `pool` - Command pool for the upload submission
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or the upload fails.
    pub fn from_file(device: Arc<Device>, path: &Path, pool: &CommandPool) -> RhiResult<Self> {
        debug!("Loading texture from {:?}", path);

        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        Self::from_rgba8(device, &img, width, height, pool)
    }

    /// Creates a texture from raw RGBA8 pixel data.
    ///
    /// # Arguments
    ///
    /// * `device` - The logical device
    /// * `pixels` - Tightly packed RGBA8 data, `width * height * 4` bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pool` - Command pool for the upload submission
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pixel data length does not match the dimensions
    /// - Image, view, or sampler creation fails
    /// - The staging upload fails
    pub fn from_rgba8(
        device: Arc<Device>,
        pixels: &[u8],
        width: u32,
        height: u32,
        pool: &CommandPool,
    ) -> RhiResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RhiError::InvalidHandle(format!(
                "Texture data size mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        let format = vk::Format::R8G8B8A8_UNORM;
        let extent = vk::Extent2D { width, height };

        // Create the device-local image
        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(format)
            .extent(vk::Extent3D {
                width,
                height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = unsafe { device.handle().create_image(&image_info, None)? };

        let requirements = unsafe { device.handle().get_image_memory_requirements(image) };

        let allocation = {
            let mut allocator = device.allocator().lock().unwrap();
            allocator.allocate(&AllocationCreateDesc {
                name: "texture",
                requirements,
                location: MemoryLocation::GpuOnly,
                linear: false,
                allocation_scheme: AllocationScheme::GpuAllocatorManaged,
            })?
        };

        unsafe {
            device
                .handle()
                .bind_image_memory(image, allocation.memory(), allocation.offset())?;
        }

        let mut texture = Self {
            device: device.clone(),
            image,
            image_view: vk::ImageView::null(),
            sampler: vk::Sampler::null(),
            allocation: Some(allocation),
            format,
            extent,
            layout: vk::ImageLayout::UNDEFINED,
        };

        // Upload pixels through a staging buffer
        let staging = Buffer::new_with_data(device.clone(), BufferUsage::Staging, pixels)?;

        let barrier_to_dst = texture.layout_barrier(vk::ImageLayout::TRANSFER_DST_OPTIMAL)?;
        let barrier_to_shader = {
            // Compute the second barrier against the post-copy layout
            let (_, _, src_access, dst_access) = transition_barrier_masks(
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            )?;
            vk::ImageMemoryBarrier::default()
                .src_access_mask(src_access)
                .dst_access_mask(dst_access)
                .old_layout(vk::ImageLayout::TRANSFER_DST_OPTIMAL)
                .new_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
                .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                .image(image)
                .subresource_range(color_subresource_range())
        };

        let region = vk::BufferImageCopy::default()
            .buffer_offset(0)
            .buffer_row_length(0)
            .buffer_image_height(0)
            .image_subresource(
                vk::ImageSubresourceLayers::default()
                    .aspect_mask(vk::ImageAspectFlags::COLOR)
                    .mip_level(0)
                    .base_array_layer(0)
                    .layer_count(1),
            )
            .image_offset(vk::Offset3D::default())
            .image_extent(vk::Extent3D {
                width,
                height,
                depth: 1,
            });

        one_time_submit(pool, device.graphics_queue(), |cmd| {
            cmd.pipeline_barrier(
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::PipelineStageFlags::TRANSFER,
                &[barrier_to_dst],
            );
            cmd.copy_buffer_to_image(
                staging.handle(),
                image,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                &[region],
            );
            cmd.pipeline_barrier(
                vk::PipelineStageFlags::TRANSFER,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                &[barrier_to_shader],
            );
        })?;

        texture.layout = vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL;

        // Create image view and sampler
        texture.image_view = create_image_view(&device, image, format)?;
        texture.sampler = create_sampler(&device)?;

        info!("Texture created: {}x{}, {:?}", width, height, format);

        Ok(texture)
    }

    /// Builds an image memory barrier transitioning from the current layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not supported.
    fn layout_barrier(&self, new_layout: vk::ImageLayout) -> RhiResult<vk::ImageMemoryBarrier<'static>> {
        let (_, _, src_access, dst_access) = transition_barrier_masks(self.layout, new_layout)?;

        Ok(vk::ImageMemoryBarrier::default()
            .src_access_mask(src_access)
            .dst_access_mask(dst_access)
            .old_layout(self.layout)
            .new_layout(new_layout)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(self.image)
            .subresource_range(color_subresource_range()))
    }

    /// Returns a descriptor image info for binding this texture.
    ///
    /// Valid only after the texture has been uploaded (layout is
    /// `SHADER_READ_ONLY_OPTIMAL`).
    pub fn descriptor_info(&self) -> vk::DescriptorImageInfo {
        vk::DescriptorImageInfo::default()
            .sampler(self.sampler)
            .image_view(self.image_view)
            .image_layout(self.layout)
    }

    /// Returns the Vulkan image handle.
    #[inline]
    pub fn image(&self) -> vk::Image {
        self.image
    }

    /// Returns the image view handle.
    #[inline]
    pub fn image_view(&self) -> vk::ImageView {
        self.image_view
    }

    /// Returns the sampler handle.
    #[inline]
    pub fn sampler(&self) -> vk::Sampler {
        self.sampler
    }

    /// Returns the image format.
    #[inline]
    pub fn format(&self) -> vk::Format {
        self.format
    }

    /// Returns the image extent.
    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Returns the current image layout.
    #[inline]
    pub fn layout(&self) -> vk::ImageLayout {
        self.layout
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            if self.sampler != vk::Sampler::null() {
                self.device.handle().destroy_sampler(self.sampler, None);
            }
            if self.image_view != vk::ImageView::null() {
                self.device
                    .handle()
                    .destroy_image_view(self.image_view, None);
            }
        }

        if let Some(allocation) = self.allocation.take() {
            let mut allocator = self.device.allocator().lock().unwrap();
            if let Err(e) = allocator.free(allocation) {
                tracing::error!("Failed to free texture allocation: {:?}", e);
            }
        }

        unsafe {
            self.device.handle().destroy_image(self.image, None);
        }

        debug!(
            "Texture destroyed ({}x{})",
            self.extent.width, self.extent.height
        );
    }
}

/// Full-image color subresource range (single mip, single layer).
fn color_subresource_range() -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange::default()
        .aspect_mask(vk::ImageAspectFlags::COLOR)
        .base_mip_level(0)
        .level_count(1)
        .base_array_layer(0)
        .layer_count(1)
}

/// Creates a 2D image view for a texture image.
fn create_image_view(
    device: &Device,
    image: vk::Image,
    format: vk::Format,
) -> RhiResult<vk::ImageView> {
    let create_info = vk::ImageViewCreateInfo::default()
        .image(image)
        .view_type(vk::ImageViewType::TYPE_2D)
        .format(format)
        .subresource_range(color_subresource_range());

    let view = unsafe { device.handle().create_image_view(&create_info, None)? };
    Ok(view)
}

/// Creates a linear-filtering repeat sampler without anisotropy.
fn create_sampler(device: &Device) -> RhiResult<vk::Sampler> {
    let create_info = vk::SamplerCreateInfo::default()
        .mag_filter(vk::Filter::LINEAR)
        .min_filter(vk::Filter::LINEAR)
        .mipmap_mode(vk::SamplerMipmapMode::LINEAR)
        .address_mode_u(vk::SamplerAddressMode::REPEAT)
        .address_mode_v(vk::SamplerAddressMode::REPEAT)
        .address_mode_w(vk::SamplerAddressMode::REPEAT)
        .anisotropy_enable(false)
        .max_anisotropy(1.0)
        .border_color(vk::BorderColor::INT_OPAQUE_BLACK)
        .unnormalized_coordinates(false)
        .compare_enable(false)
        .compare_op(vk::CompareOp::ALWAYS)
        .mip_lod_bias(0.0)
        .min_lod(0.0)
        .max_lod(0.0);

    let sampler = unsafe { device.handle().create_sampler(&create_info, None)? };
    Ok(sampler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_undefined_to_transfer_dst() {
        let (src_stage, dst_stage, src_access, dst_access) = transition_barrier_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        )
        .unwrap();

        assert_eq!(src_stage, vk::PipelineStageFlags::TOP_OF_PIPE);
        assert_eq!(dst_stage, vk::PipelineStageFlags::TRANSFER);
        assert_eq!(src_access, vk::AccessFlags::empty());
        assert_eq!(dst_access, vk::AccessFlags::TRANSFER_WRITE);
    }

    #[test]
    fn test_transition_transfer_dst_to_shader_read() {
        let (src_stage, dst_stage, src_access, dst_access) = transition_barrier_masks(
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        )
        .unwrap();

        assert_eq!(src_stage, vk::PipelineStageFlags::TRANSFER);
        assert_eq!(dst_stage, vk::PipelineStageFlags::FRAGMENT_SHADER);
        assert_eq!(src_access, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(dst_access, vk::AccessFlags::SHADER_READ);
    }

    #[test]
    fn test_unsupported_transitions_rejected() {
        // Reverse direction
        let result = transition_barrier_masks(
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        );
        assert!(matches!(
            result,
            Err(RhiError::UnsupportedLayoutTransition { .. })
        ));

        // Skipping the transfer step
        let result = transition_barrier_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        );
        assert!(matches!(
            result,
            Err(RhiError::UnsupportedLayoutTransition { .. })
        ));

        // Unrelated layouts
        let result = transition_barrier_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        );
        assert!(matches!(
            result,
            Err(RhiError::UnsupportedLayoutTransition { .. })
        ));
    }

    #[test]
    fn test_unsupported_transition_reports_layouts() {
        let err = transition_barrier_masks(
            vk::ImageLayout::GENERAL,
            vk::ImageLayout::PRESENT_SRC_KHR,
        )
        .unwrap_err();

        match err {
            RhiError::UnsupportedLayoutTransition { from, to } => {
                assert_eq!(from, vk::ImageLayout::GENERAL);
                assert_eq!(to, vk::ImageLayout::PRESENT_SRC_KHR);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_color_subresource_range() {
        let range = color_subresource_range();
        assert_eq!(range.aspect_mask, vk::ImageAspectFlags::COLOR);
        assert_eq!(range.base_mip_level, 0);
        assert_eq!(range.level_count, 1);
        assert_eq!(range.base_array_layer, 0);
        assert_eq!(range.layer_count, 1);
    }
}
