//! Pixel-space camera for 2D widget canvases

use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera measured in logical pixels, origin at the top-left
/// corner and y growing downwards, like a browser canvas
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Camera2D {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f32) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self {
            position: Vec3::ZERO,
            width: physical_width as f32 / scale_factor,
            height: physical_height as f32 / scale_factor,
            scale_factor,
        }
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let projection = Mat4::orthographic_rh(
            0.0,
            self.width.max(1.0),
            self.height.max(1.0),
            0.0,
            -1.0,
            1.0,
        );

        let view = Mat4::from_translation(-self.position);

        projection * view
    }

    /// Convert a physical cursor position into logical world coordinates
    pub fn screen_to_world(&self, physical_x: f64, physical_y: f64) -> Vec2 {
        Vec2::new(
            physical_x as f32 / self.scale_factor + self.position.x,
            physical_y as f32 / self.scale_factor + self.position.y,
        )
    }

    pub fn resize(&mut self, physical_width: u32, physical_height: u32, scale_factor: f32) {
        *self = Self {
            position: self.position,
            ..Self::new(physical_width, physical_height, scale_factor)
        };
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn corners_map_to_clip_space() {
        let camera = Camera2D::new(1200, 800, 2.0);
        let vp = camera.view_projection();

        let top_left = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);

        let bottom_right = vp * Vec4::new(600.0, 400.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn cursor_is_scaled_to_logical_pixels() {
        let camera = Camera2D::new(1200, 800, 2.0);
        assert_eq!(camera.screen_to_world(100.0, 50.0), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn zero_scale_factor_falls_back_to_one() {
        let camera = Camera2D::new(640, 480, 0.0);
        assert_eq!(camera.width, 640.0);
        assert_eq!(camera.height, 480.0);
    }
}
