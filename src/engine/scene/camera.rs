use glam::Mat4;

/// Viewing point payload of a camera node.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    perspective: bool,
    enabled: bool,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            perspective: true,
            enabled: true,
            projection: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_perspective(&self) -> bool {
        self.perspective
    }

    pub fn set_perspective(&mut self, value: bool) {
        self.perspective = value;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, value: bool) {
        self.enabled = value;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Set a perspective projection in OpenGL clip space (`fov_y` in radians).
    pub fn set_perspective_projection(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh_gl(fov_y, aspect, near, far);
        self.perspective = true;
    }

    pub fn set_orthographic_projection(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection = Mat4::orthographic_rh_gl(left, right, bottom, top, near, far);
        self.perspective = false;
    }

    /// View matrix for a camera placed at `world`: vertices move into camera
    /// space, so the camera transform is inverted.
    pub fn view_matrix(world: Mat4) -> Mat4 {
        world.inverse()
    }
}
