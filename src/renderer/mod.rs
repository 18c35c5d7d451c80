use anyhow::{Context, Result};

use crate::entity::Scene;

mod floor;
mod particle;
mod render_target;

use floor::FloorRenderer;
use particle::ParticleRenderer;
use render_target::{RenderTarget, DEPTH_TEXTURE_FORMAT};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.4,
    a: 1.0,
};

pub struct Renderer {
    surface: wgpu::Surface,
    surface_configuration: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth_target: RenderTarget,
    floor_renderer: FloorRenderer,
    particle_renderer: ParticleRenderer,
}

impl Renderer {
    pub async fn new(window: &winit::window::Window) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let size = window.inner_size();

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
        };
        surface.configure(&device, &surface_configuration);

        let depth_target = RenderTarget::new(&device, "Depth Texture", DEPTH_TEXTURE_FORMAT, size);

        let floor_renderer = FloorRenderer::new(&device, surface_format);
        let particle_renderer = ParticleRenderer::new(&device, surface_format);

        Ok(Self {
            surface,
            surface_configuration,
            device,
            queue,
            depth_target,
            floor_renderer,
            particle_renderer,
        })
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface
            .configure(&self.device, &self.surface_configuration);
        self.depth_target =
            RenderTarget::new(&self.device, "Depth Texture", DEPTH_TEXTURE_FORMAT, size);
    }

    pub fn render(&mut self, scene: &Scene) {
        self.floor_renderer.update(&self.queue, scene);
        self.particle_renderer.update(&self.queue, scene);

        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get next surface texture");
        let surface_texture_view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_target.texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: false,
                    }),
                    stencil_ops: None,
                }),
            });
            self.floor_renderer.draw(&mut rpass);
            self.particle_renderer.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));

        surface_texture.present();
    }
}
