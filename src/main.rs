use std::time::Instant;

use anyhow::{Context, Result};
use pollster::FutureExt as _;
use winit::{
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, Event, KeyboardInput, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod app;
mod entity;
mod particles;
mod renderer;

use app::App;

fn main() -> Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title("drizzle")
        .with_inner_size(LogicalSize::<u32> {
            width: 800,
            height: 600,
        })
        .build(&event_loop)
        .context("Failed to build window")?;

    let mut app = App::new(window).block_on()?;

    let mut last_frame = Instant::now();

    event_loop.run(move |e, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match e {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => app.on_resize(size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    app.on_resize(*new_inner_size)
                }
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button: MouseButton::Left,
                    ..
                } => app.on_mouse_up(),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(keycode),
                            ..
                        },
                    ..
                } => app.on_key(keycode, state),
                _ => (),
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => app.on_mouse_move(delta),
            Event::MainEventsCleared => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                app.update(dt);
                app.render();
            }
            _ => (),
        }
    });
}
