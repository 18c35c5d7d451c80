use std::f32::consts::PI;

use anyhow::Result;
use log::{debug, info};
use winit::{
    event::{ElementState, VirtualKeyCode},
    window::Window,
};

use crate::{
    entity::{Camera, Scene},
    particles::{Emitter, ParticleSystem},
    renderer::Renderer,
};

const MOUSE_SENSITIVITY: f32 = 0.001;
const CAMERA_SPEED: f32 = 2.5;

/// Held-key state for camera movement, updated from keyboard events and
/// consumed once per frame.
#[derive(Debug, Copy, Clone, Default)]
pub struct CameraInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

pub struct App {
    window: Window,
    scene: Scene,
    renderer: Renderer,
    input: CameraInput,
    cursor_locked: bool,
}

impl App {
    pub async fn new(window: Window) -> Result<Self> {
        let scene = Scene {
            camera: {
                let inner_size = window.inner_size();
                Camera {
                    aspect_ratio: inner_size.width as f32 / inner_size.height as f32,
                    ..Default::default()
                }
            },
            particles: ParticleSystem::new(Emitter::default()),
        };
        info!("{:#?}", &scene.camera);

        let renderer = Renderer::new(&window).await?;

        Ok(Self {
            window,
            scene,
            renderer,
            input: CameraInput::default(),
            cursor_locked: false,
        })
    }

    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.scene.camera.aspect_ratio = size.width as f32 / size.height as f32;
        self.renderer.resize(size);
    }

    pub fn on_mouse_up(&mut self) {
        if self.window.set_cursor_grab(true).is_ok() {
            self.window.set_cursor_visible(false);
            self.cursor_locked = true;
        }
    }

    pub fn on_key(&mut self, keycode: VirtualKeyCode, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match keycode {
            VirtualKeyCode::W => self.input.forward = pressed,
            VirtualKeyCode::S => self.input.backward = pressed,
            VirtualKeyCode::A => self.input.left = pressed,
            VirtualKeyCode::D => self.input.right = pressed,
            VirtualKeyCode::Escape if !pressed => {
                if self.window.set_cursor_grab(false).is_ok() {
                    self.window.set_cursor_visible(true);
                    self.cursor_locked = false;
                }
            }
            _ => (),
        }
    }

    pub fn on_mouse_move(&mut self, (x, y): (f64, f64)) {
        if !self.cursor_locked {
            return;
        };

        let camera = &mut self.scene.camera;
        camera.yaw += x as f32 * MOUSE_SENSITIVITY;
        camera.pitch =
            (camera.pitch - y as f32 * MOUSE_SENSITIVITY).clamp(PI * -0.49, PI * 0.49);
        debug!("yaw: {}, pitch: {}", camera.yaw, camera.pitch);
    }

    pub fn update(&mut self, dt: f32) {
        let camera = &mut self.scene.camera;
        let forward = camera.forward();
        let right = camera.right();

        let mut movement = glam::Vec3::ZERO;
        if self.input.forward {
            movement += forward;
        }
        if self.input.backward {
            movement -= forward;
        }
        if self.input.right {
            movement += right;
        }
        if self.input.left {
            movement -= right;
        }
        camera.position += movement * CAMERA_SPEED * dt;

        self.scene.particles.step(dt);
        debug!("{} live particles", self.scene.particles.len());
    }

    pub fn render(&mut self) {
        self.renderer.render(&self.scene);
    }
}
