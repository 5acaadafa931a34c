//! Main renderer orchestration.
//!
//! This module provides the main [`Renderer`] struct that coordinates
//! all Vulkan resources and rendering operations for the spinning
//! textured quad.

use std::mem::ManuallyDrop;
use std::path::Path;
use std::sync::Arc;

use ash::vk;
use glam::{Vec2, Vec3};
use tracing::{debug, error, info};

use prism_core::Timer;
use prism_platform::{ResizeObserver, Surface, Window};
use prism_rhi::buffer::{Buffer, BufferUsage};
use prism_rhi::command::{CommandBuffer, CommandPool};
use prism_rhi::descriptor::{
    DescriptorBindingBuilder, DescriptorPool, DescriptorSetLayout, update_descriptor_sets,
};
use prism_rhi::device::Device;
use prism_rhi::instance::Instance;
use prism_rhi::physical_device::select_physical_device;
use prism_rhi::pipeline::{
    ColorBlendAttachment, GraphicsPipelineBuilder, Pipeline, PipelineLayout,
};
use prism_rhi::shader::{Shader, ShaderStage};
use prism_rhi::swapchain::Swapchain;
use prism_rhi::sync::FrameSync;
use prism_rhi::texture::Texture;
use prism_rhi::vertex::Vertex;
use prism_rhi::{RhiError, RhiResult};

use crate::ubo::UniformBufferObject;

/// Quad vertices: position, color, and texture coordinates.
const VERTICES: [Vertex; 4] = [
    Vertex::new(
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec2::new(0.0, 0.0),
    ),
    Vertex::new(
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec2::new(1.0, 0.0),
    ),
    Vertex::new(
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ),
    Vertex::new(
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ),
];

/// Quad indices (two counter-clockwise triangles).
const INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Default texture file loaded at startup.
const TEXTURE_PATH: &str = "assets/textures/checker.png";

/// Main renderer that manages all Vulkan resources.
///
/// Renders a spinning textured quad with a single frame in flight:
/// after each present, the renderer waits for the present queue to go
/// idle before recording the next frame.
///
/// # Resource Destruction Order
///
/// Vulkan resources must be destroyed in the correct order:
/// 1. Wait for all GPU work to complete
/// 2. Destroy pipeline, shaders, and descriptor resources
/// 3. Destroy texture, buffers, and synchronization objects
/// 4. Destroy command pool and swapchain
/// 5. Drop the device (destroys VkDevice)
/// 6. Destroy surface
/// 7. Destroy instance
///
/// ManuallyDrop is used to enforce this order in `Drop`.
pub struct Renderer {
    /// Vulkan instance (destroyed last).
    instance: ManuallyDrop<Instance>,
    /// Window surface (destroyed after device, before instance).
    surface: ManuallyDrop<Surface>,
    /// Logical device (dropped after all RHI wrappers).
    device: ManuallyDrop<Arc<Device>>,
    /// Swapchain with render pass and framebuffers.
    swapchain: ManuallyDrop<Swapchain>,

    /// Command pool for per-frame and upload command buffers.
    command_pool: ManuallyDrop<CommandPool>,
    /// One command buffer per swapchain image, re-recorded each frame.
    command_buffers: Vec<vk::CommandBuffer>,

    /// Descriptor set layout (UBO + texture sampler).
    descriptor_set_layout: ManuallyDrop<DescriptorSetLayout>,
    /// Descriptor pool.
    descriptor_pool: ManuallyDrop<DescriptorPool>,
    /// Descriptor set bound during rendering.
    descriptor_set: vk::DescriptorSet,

    /// Vertex shader (kept alive for pipeline rebuilds).
    vertex_shader: ManuallyDrop<Shader>,
    /// Fragment shader (kept alive for pipeline rebuilds).
    fragment_shader: ManuallyDrop<Shader>,
    /// Pipeline layout.
    pipeline_layout: ManuallyDrop<PipelineLayout>,
    /// Graphics pipeline (rebuilt when the swapchain is recreated).
    pipeline: ManuallyDrop<Pipeline>,

    /// Quad vertex buffer (device local).
    vertex_buffer: ManuallyDrop<Buffer>,
    /// Quad index buffer (device local).
    index_buffer: ManuallyDrop<Buffer>,
    /// Per-frame uniform buffer (host visible).
    uniform_buffer: ManuallyDrop<Buffer>,
    /// Sampled texture.
    texture: ManuallyDrop<Texture>,

    /// Frame semaphores (acquire and render-finished).
    sync: ManuallyDrop<FrameSync>,

    /// Timer driving the rotation animation.
    timer: Timer,
    /// Size change reported by the window, applied on the next frame.
    pending_resize: Option<(u32, u32)>,
    /// Current surface width.
    width: u32,
    /// Current surface height.
    height: u32,
}

impl Renderer {
    /// Creates a new renderer for the given window.
    ///
    /// This initializes all Vulkan resources: instance, surface, device,
    /// swapchain, pipeline, quad geometry, texture, and synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if any Vulkan resource creation fails.
    pub fn new(window: &Window) -> RhiResult<Self> {
        let width = window.width();
        let height = window.height();

        info!("Initializing Vulkan renderer ({}x{})", width, height);

        // Create Vulkan instance with validation in debug builds; the
        // windowing layer reports which surface extensions it needs
        let surface_extensions = window
            .required_extensions()
            .map_err(|e| RhiError::SurfaceError(e.to_string()))?;
        let enable_validation = cfg!(debug_assertions);
        let instance = Instance::new(&surface_extensions, enable_validation)?;

        // Create surface
        let surface = window
            .create_surface(instance.entry(), instance.handle())
            .map_err(|e| RhiError::SurfaceError(e.to_string()))?;

        // Select physical device
        let physical_device_info =
            select_physical_device(instance.handle(), surface.handle(), surface.loader())?;

        // Create logical device
        let device = Device::new(&instance, &physical_device_info)?;

        // Create swapchain (owns render pass and framebuffers)
        let swapchain =
            Swapchain::new(&instance, device.clone(), surface.handle(), width, height)?;

        // Create command pool and per-image command buffers
        let graphics_family = device
            .queue_families()
            .graphics_family
            .ok_or(RhiError::NoSuitableGpu)?;
        let command_pool = CommandPool::new(device.clone(), graphics_family)?;
        let command_buffers = command_pool.allocate_command_buffers(swapchain.image_count())?;

        // Descriptor layout: UBO at binding 0, texture sampler at binding 1
        let bindings = [
            DescriptorBindingBuilder::uniform_buffer(0, vk::ShaderStageFlags::VERTEX),
            DescriptorBindingBuilder::combined_image_sampler(1, vk::ShaderStageFlags::FRAGMENT),
        ];
        let descriptor_set_layout = DescriptorSetLayout::new(device.clone(), &bindings)?;
        let descriptor_pool = DescriptorPool::with_default_sizes(device.clone())?;
        let descriptor_set = descriptor_pool.allocate(&[descriptor_set_layout.handle()])?[0];

        // Load shaders and build the pipeline
        let vertex_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new("shaders/spirv/simple.vert.spv"),
            ShaderStage::Vertex,
            "main",
        )?;
        let fragment_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new("shaders/spirv/simple.frag.spv"),
            ShaderStage::Fragment,
            "main",
        )?;

        let pipeline_layout =
            PipelineLayout::new(device.clone(), &[descriptor_set_layout.handle()], &[])?;

        let pipeline = Self::create_pipeline(
            device.clone(),
            &vertex_shader,
            &fragment_shader,
            &pipeline_layout,
            swapchain.render_pass(),
        )?;

        // Upload quad geometry to device-local buffers
        let vertex_buffer = Buffer::new_device_local_with_data(
            device.clone(),
            BufferUsage::Vertex,
            bytemuck::cast_slice(&VERTICES),
            &command_pool,
        )?;
        let index_buffer = Buffer::new_device_local_with_data(
            device.clone(),
            BufferUsage::Index,
            bytemuck::cast_slice(&INDICES),
            &command_pool,
        )?;

        // Host-visible uniform buffer, rewritten every frame
        let uniform_buffer = Buffer::new(
            device.clone(),
            BufferUsage::Uniform,
            UniformBufferObject::SIZE as vk::DeviceSize,
        )?;

        // Load the texture, falling back to a generated checkerboard
        let texture = Self::load_texture(device.clone(), &command_pool)?;

        // Point the descriptor set at the UBO and texture
        let buffer_infos = [prism_rhi::descriptor::buffer_info(
            uniform_buffer.handle(),
            0,
            UniformBufferObject::SIZE as vk::DeviceSize,
        )];
        let image_infos = [texture.descriptor_info()];

        let writes = [
            vk::WriteDescriptorSet::default()
                .dst_set(descriptor_set)
                .dst_binding(0)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&buffer_infos),
            vk::WriteDescriptorSet::default()
                .dst_set(descriptor_set)
                .dst_binding(1)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .image_info(&image_infos),
        ];
        update_descriptor_sets(&device, &writes);

        let sync = FrameSync::new(device.clone())?;

        info!(
            "Renderer initialized: {} swapchain images, single frame in flight",
            swapchain.image_count()
        );

        Ok(Self {
            instance: ManuallyDrop::new(instance),
            surface: ManuallyDrop::new(surface),
            device: ManuallyDrop::new(device),
            swapchain: ManuallyDrop::new(swapchain),
            command_pool: ManuallyDrop::new(command_pool),
            command_buffers,
            descriptor_set_layout: ManuallyDrop::new(descriptor_set_layout),
            descriptor_pool: ManuallyDrop::new(descriptor_pool),
            descriptor_set,
            vertex_shader: ManuallyDrop::new(vertex_shader),
            fragment_shader: ManuallyDrop::new(fragment_shader),
            pipeline_layout: ManuallyDrop::new(pipeline_layout),
            pipeline: ManuallyDrop::new(pipeline),
            vertex_buffer: ManuallyDrop::new(vertex_buffer),
            index_buffer: ManuallyDrop::new(index_buffer),
            uniform_buffer: ManuallyDrop::new(uniform_buffer),
            texture: ManuallyDrop::new(texture),
            sync: ManuallyDrop::new(sync),
            timer: Timer::new(),
            pending_resize: None,
            width,
            height,
        })
    }

    /// Builds the quad graphics pipeline for the given render pass.
    fn create_pipeline(
        device: Arc<Device>,
        vertex_shader: &Shader,
        fragment_shader: &Shader,
        pipeline_layout: &PipelineLayout,
        render_pass: vk::RenderPass,
    ) -> RhiResult<Pipeline> {
        GraphicsPipelineBuilder::new()
            .vertex_shader(vertex_shader)
            .fragment_shader(fragment_shader)
            .vertex_binding(Vertex::binding_description())
            .vertex_attributes(&Vertex::attribute_descriptions())
            .color_blend_attachment(ColorBlendAttachment::alpha_blend())
            .render_pass(render_pass)
            .build(device, pipeline_layout)
    }

    /// Loads the quad texture from disk, generating a checkerboard if the
    /// file is missing.
    fn load_texture(device: Arc<Device>, pool: &CommandPool) -> RhiResult<Texture> {
        let path = Path::new(TEXTURE_PATH);
        if path.exists() {
            return Texture::from_file(device, path, pool);
        }

        info!("Texture {:?} not found, generating checkerboard", path);
        let size = 256;
        let pixels = checkerboard_rgba8(size, 32);
        Texture::from_rgba8(device, &pixels, size, size, pool)
    }

    /// Notifies the renderer that the surface has been resized.
    ///
    /// The swapchain is recreated at the start of the next frame.
    fn queue_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to zero dimensions");
            return;
        }

        if width != self.width || height != self.height {
            debug!(
                "Resize queued: {}x{} -> {}x{}",
                self.width, self.height, width, height
            );
            self.pending_resize = Some((width, height));
        }
    }

    /// Recreates the swapchain and dependent resources for the current size.
    fn recreate_swapchain(&mut self) -> RhiResult<()> {
        let old_image_count = self.swapchain.image_count();

        self.swapchain.recreate(
            &self.instance,
            self.surface.handle(),
            self.width,
            self.height,
        )?;

        // The render pass handle changed, so the pipeline must be rebuilt
        let new_pipeline = Self::create_pipeline(
            (*self.device).clone(),
            &self.vertex_shader,
            &self.fragment_shader,
            &self.pipeline_layout,
            self.swapchain.render_pass(),
        )?;
        unsafe {
            ManuallyDrop::drop(&mut self.pipeline);
        }
        self.pipeline = ManuallyDrop::new(new_pipeline);

        // Reallocate command buffers if the image count changed
        let new_image_count = self.swapchain.image_count();
        if new_image_count != old_image_count {
            self.command_pool.free_command_buffers(&self.command_buffers);
            self.command_buffers = self.command_pool.allocate_command_buffers(new_image_count)?;
            debug!(
                "Reallocated command buffers: {} -> {}",
                old_image_count, new_image_count
            );
        }

        Ok(())
    }

    /// Renders a frame.
    ///
    /// Applies any pending resize, acquires a swapchain image, records and
    /// submits the draw, presents, and waits for the present queue to go
    /// idle. Out-of-date or suboptimal swapchains are recreated.
    ///
    /// # Errors
    ///
    /// Returns an error if any Vulkan operation fails.
    pub fn render_frame(&mut self) -> RhiResult<()> {
        if let Some((width, height)) = self.pending_resize.take() {
            self.width = width;
            self.height = height;
            self.recreate_swapchain()?;
        }

        // Acquire next swapchain image
        let (image_index, acquire_suboptimal) = match self
            .swapchain
            .acquire_next_image(self.sync.image_available_handle())
        {
            Ok(result) => result,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                debug!("Swapchain out of date at acquire, recreating");
                self.recreate_swapchain()?;
                return Ok(());
            }
            Err(e) => return Err(RhiError::VulkanError(e)),
        };

        self.update_uniform_buffer()?;
        self.record_commands(image_index)?;

        // Submit: wait for the acquired image, signal render finished
        let wait_semaphores = [self.sync.image_available_handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [self.sync.render_finished_handle()];
        let command_buffers = [self.command_buffers[image_index as usize]];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .submit_graphics(&[submit_info], vk::Fence::null())?;
        }

        // Present, waiting on render finished
        let present_result = self.swapchain.present(
            self.device.present_queue(),
            image_index,
            self.sync.render_finished_handle(),
        );

        // Single frame in flight: block until this frame has retired so the
        // semaphores and command buffer can be reused
        self.device.wait_present_idle()?;

        if present_needs_recreate(present_result, acquire_suboptimal)? {
            debug!("Swapchain stale after present, recreating");
            self.recreate_swapchain()?;
        }

        Ok(())
    }

    /// Writes the current frame's uniform data.
    fn update_uniform_buffer(&self) -> RhiResult<()> {
        let ubo = UniformBufferObject::new(self.swapchain.aspect_ratio(), self.timer.elapsed_secs());
        self.uniform_buffer.write_data(0, bytemuck::bytes_of(&ubo))
    }

    /// Records the draw commands for the given swapchain image.
    fn record_commands(&self, image_index: u32) -> RhiResult<()> {
        let cmd = CommandBuffer::from_handle(
            (*self.device).clone(),
            self.command_buffers[image_index as usize],
        );

        cmd.reset()?;
        cmd.begin()?;

        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: [0.0, 0.0, 0.0, 1.0],
            },
        }];

        let extent = self.swapchain.extent();
        let render_pass_info = vk::RenderPassBeginInfo::default()
            .render_pass(self.swapchain.render_pass())
            .framebuffer(self.swapchain.framebuffer(image_index as usize))
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .clear_values(&clear_values);

        cmd.begin_render_pass(&render_pass_info);

        cmd.bind_pipeline(self.pipeline.bind_point(), self.pipeline.handle());

        // Dynamic viewport and scissor cover the whole swapchain image
        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        cmd.set_viewport(&viewport);

        let scissor = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };
        cmd.set_scissor(&scissor);

        cmd.bind_vertex_buffers(0, &[self.vertex_buffer.handle()], &[0]);
        cmd.bind_index_buffer(self.index_buffer.handle(), 0, vk::IndexType::UINT16);
        cmd.bind_descriptor_sets(
            vk::PipelineBindPoint::GRAPHICS,
            self.pipeline_layout.handle(),
            0,
            &[self.descriptor_set],
            &[],
        );

        cmd.draw_indexed(INDICES.len() as u32, 1, 0, 0, 0);

        cmd.end_render_pass();
        cmd.end()?;

        Ok(())
    }

    /// Returns the current swapchain extent.
    pub fn extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    /// Returns the swapchain format.
    pub fn format(&self) -> vk::Format {
        self.swapchain.format()
    }
}

impl ResizeObserver for Renderer {
    fn surface_resized(&mut self, width: u32, height: u32) {
        self.queue_resize(width, height);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Wait for all GPU work to complete before destroying resources
        if let Err(e) = self.device.wait_idle() {
            error!(
                "Failed to wait for device idle during renderer drop: {:?}",
                e
            );
        }

        // Drop every RHI wrapper before the device, then the device before
        // the surface and instance
        unsafe {
            ManuallyDrop::drop(&mut self.pipeline);
            ManuallyDrop::drop(&mut self.pipeline_layout);
            ManuallyDrop::drop(&mut self.vertex_shader);
            ManuallyDrop::drop(&mut self.fragment_shader);
            ManuallyDrop::drop(&mut self.descriptor_pool);
            ManuallyDrop::drop(&mut self.descriptor_set_layout);
            ManuallyDrop::drop(&mut self.texture);
            ManuallyDrop::drop(&mut self.uniform_buffer);
            ManuallyDrop::drop(&mut self.index_buffer);
            ManuallyDrop::drop(&mut self.vertex_buffer);
            ManuallyDrop::drop(&mut self.sync);
            ManuallyDrop::drop(&mut self.command_pool);
            ManuallyDrop::drop(&mut self.swapchain);
            ManuallyDrop::drop(&mut self.device);
            ManuallyDrop::drop(&mut self.surface);
            ManuallyDrop::drop(&mut self.instance);
        }

        info!("Renderer destroyed");
    }
}

/// Decides whether the swapchain must be recreated after a present.
///
/// `queue_present` reports a suboptimal swapchain as `Ok(true)` and an
/// unusable one as `Err(ERROR_OUT_OF_DATE_KHR)`; both trigger recreation,
/// as does a suboptimal flag carried over from the acquire. Any other
/// present error is fatal to the frame.
fn present_needs_recreate(
    present_result: Result<bool, vk::Result>,
    acquire_suboptimal: bool,
) -> RhiResult<bool> {
    match present_result {
        Ok(suboptimal) => Ok(suboptimal || acquire_suboptimal),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
        Err(e) => Err(RhiError::VulkanError(e)),
    }
}

/// Generates an RGBA8 checkerboard of `size` x `size` pixels with square
/// cells of `cell` pixels, alternating white and mid-gray.
fn checkerboard_rgba8(size: u32, cell: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if even { 255 } else { 96 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_geometry() {
        assert_eq!(VERTICES.len(), 4);
        assert_eq!(INDICES.len(), 6);

        // All indices reference valid vertices
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTICES.len()));

        // Two triangles share the diagonal (vertices 0 and 2)
        assert_eq!(INDICES[2], INDICES[3]);
        assert_eq!(INDICES[0], INDICES[5]);
    }

    #[test]
    fn test_quad_tex_coords_cover_unit_square() {
        let us: Vec<f32> = VERTICES.iter().map(|v| v.tex_coord.x).collect();
        let vs: Vec<f32> = VERTICES.iter().map(|v| v.tex_coord.y).collect();
        assert!(us.contains(&0.0) && us.contains(&1.0));
        assert!(vs.contains(&0.0) && vs.contains(&1.0));
    }

    #[test]
    fn test_checkerboard_dimensions() {
        let pixels = checkerboard_rgba8(8, 4);
        assert_eq!(pixels.len(), 8 * 8 * 4);

        // First cell is white, alpha is opaque everywhere
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
        assert!(pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_present_recreates_on_suboptimal_result() {
        // queue_present reports suboptimal as Ok(true), never as an error
        assert!(present_needs_recreate(Ok(true), false).unwrap());
        assert!(!present_needs_recreate(Ok(false), false).unwrap());
    }

    #[test]
    fn test_present_recreates_when_acquire_was_suboptimal() {
        assert!(present_needs_recreate(Ok(false), true).unwrap());
    }

    #[test]
    fn test_present_recreates_on_out_of_date() {
        assert!(present_needs_recreate(Err(vk::Result::ERROR_OUT_OF_DATE_KHR), false).unwrap());
    }

    #[test]
    fn test_present_propagates_other_errors() {
        let result = present_needs_recreate(Err(vk::Result::ERROR_DEVICE_LOST), false);
        assert!(matches!(
            result,
            Err(RhiError::VulkanError(vk::Result::ERROR_DEVICE_LOST))
        ));
    }

    #[test]
    fn test_checkerboard_alternates() {
        let pixels = checkerboard_rgba8(4, 2);
        // Pixel (0,0) and pixel (2,0) are in adjacent cells
        let first = pixels[0];
        let adjacent = pixels[2 * 4];
        assert_ne!(first, adjacent);
    }
}
