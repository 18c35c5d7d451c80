use std::f32::consts::PI;

use glam::{vec3, Mat4, Vec3};

use crate::particles::ParticleSystem;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn forward(&self) -> Vec3 {
        vec3(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 5.0, 15.0),
            yaw: PI * -0.5,
            pitch: 0.0,
            fov: 45.0,
            aspect_ratio: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub particles: ParticleSystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let forward = Camera::default().forward();

        assert!(forward.z < -0.99);
        assert!(forward.x.abs() < 1e-6);
        assert!(forward.y.abs() < 1e-6);
    }

    #[test]
    fn view_matrix_moves_the_eye_to_the_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix().transform_point3(camera.position);

        assert!(eye.length() < 1e-5);
    }
}
