//! Uniform buffer object definitions for shaders.
//!
//! These structures must match the GLSL uniform block layouts exactly.
//! All structures use `#[repr(C)]` for predictable memory layout and implement
//! `Pod` and `Zeroable` for safe byte casting.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Rotation speed of the spinning quad in degrees per second.
const ROTATION_DEGREES_PER_SEC: f32 = 90.0;

/// Per-frame uniform buffer data.
///
/// This structure matches the GLSL `UniformBufferObject` block (binding 0).
///
/// # Memory Layout
///
/// - Offset 0: model matrix (64 bytes)
/// - Offset 64: view matrix (64 bytes)
/// - Offset 128: projection matrix (64 bytes)
/// - Offset 192: time (4 bytes)
/// - Offset 196: padding (12 bytes)
/// - Total size: 208 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct UniformBufferObject {
    /// Model matrix (object to world space).
    pub model: Mat4,
    /// View matrix (world to view space).
    pub view: Mat4,
    /// Projection matrix (view to clip space).
    pub proj: Mat4,
    /// Elapsed time in seconds.
    pub time: f32,
    /// Padding for 16-byte alignment.
    pub _padding: [f32; 3],
}

impl UniformBufferObject {
    /// Size of the struct in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Builds the per-frame uniform data for the spinning quad.
    ///
    /// The model rotates around Z at 90 degrees per second. The camera looks
    /// at the origin from (2, 2, 2) with +Z up. The projection's Y axis is
    /// flipped to map GL-style clip space to Vulkan's.
    ///
    /// # Arguments
    ///
    /// * `aspect` - Swapchain aspect ratio (width / height)
    /// * `elapsed_secs` - Time since startup in seconds
    pub fn new(aspect: f32, elapsed_secs: f32) -> Self {
        let angle = elapsed_secs * ROTATION_DEGREES_PER_SEC.to_radians();
        let model = Mat4::from_rotation_z(angle);

        let view = Mat4::look_at_rh(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, Vec3::Z);

        let mut proj = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.1, 10.0);
        // Vulkan clip space has Y pointing down
        proj.y_axis.y *= -1.0;

        Self {
            model,
            view,
            proj,
            time: elapsed_secs,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn test_ubo_size() {
        // 3 Mat4 (3 * 64) + f32 (4) + padding (12) = 208 bytes
        assert_eq!(UniformBufferObject::SIZE, 208);
    }

    #[test]
    fn test_ubo_alignment() {
        // Mat4 requires 16-byte alignment for GPU upload
        assert_eq!(std::mem::align_of::<UniformBufferObject>(), 16);
    }

    #[test]
    fn test_ubo_field_offsets() {
        assert_eq!(offset_of!(UniformBufferObject, model), 0);
        assert_eq!(offset_of!(UniformBufferObject, view), 64);
        assert_eq!(offset_of!(UniformBufferObject, proj), 128);
        assert_eq!(offset_of!(UniformBufferObject, time), 192);
    }

    #[test]
    fn test_ubo_identity_model_at_time_zero() {
        let ubo = UniformBufferObject::new(16.0 / 9.0, 0.0);
        assert_eq!(ubo.model, Mat4::IDENTITY);
        assert_eq!(ubo.time, 0.0);
    }

    #[test]
    fn test_ubo_rotates_quarter_turn_per_second() {
        // 90 degrees per second, so at t=1 the rotation is a quarter turn
        let ubo = UniformBufferObject::new(1.0, 1.0);
        let expected = Mat4::from_rotation_z(90.0_f32.to_radians());
        assert!(
            ubo.model
                .to_cols_array()
                .iter()
                .zip(expected.to_cols_array().iter())
                .all(|(a, b)| (a - b).abs() < 1e-6)
        );
    }

    #[test]
    fn test_ubo_projection_y_flip() {
        let ubo = UniformBufferObject::new(1.0, 0.0);
        let unflipped = Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 10.0);
        assert_eq!(ubo.proj.y_axis.y, -unflipped.y_axis.y);
    }

    #[test]
    fn test_ubo_pod_zeroable() {
        let ubo = UniformBufferObject::new(16.0 / 9.0, 2.5);
        let bytes: &[u8] = bytemuck::bytes_of(&ubo);
        assert_eq!(bytes.len(), UniformBufferObject::SIZE);

        let back: &UniformBufferObject = bytemuck::from_bytes(bytes);
        assert_eq!(back.time, 2.5);
    }
}
