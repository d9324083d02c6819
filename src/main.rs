mod config;
mod renderer;

use anyhow::{anyhow, Context};
use config::RenderMode;
use glutin::{Api, ContextBuilder, GlRequest};
use log::{error, info, trace};
use renderer::gl::Viewport;
use renderer::{Renderer, SurfaceRenderer};
use winit::event::{Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::desktop::EventLoopExtDesktop;

fn main() -> anyhow::Result<()> {
    config::init_logging();
    let mode = RenderMode::from_env().context("invalid redraw policy")?;
    info!("render mode: {:?}", mode);

    let mut event_loop = EventLoop::new();
    let wb = winit::window::WindowBuilder::new()
        .with_title(config::TITLE)
        .with_inner_size(winit::dpi::Size::Physical(config::DIMS))
        .with_min_inner_size(winit::dpi::Size::Logical(winit::dpi::LogicalSize::new(
            config::MIN_DIMS,
            config::MIN_DIMS,
        )));
    let windowed_context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGlEs, config::GLES_VERSION))
        .with_depth_buffer(config::DEPTH_BITS)
        .with_vsync(true)
        .build_windowed(wb, &event_loop)
        .map_err(|err| anyhow!("failed to create a GLES context: {}", err))?;
    let windowed_context = unsafe { windowed_context.make_current() }
        .map_err(|(_, err)| anyhow!("failed to make the GLES context current: {:?}", err))?;

    let gl = unsafe {
        glow::Context::from_loader_function(|s| windowed_context.get_proc_address(s) as *const _)
    };

    {
        let mut renderer = Renderer::new(&gl);
        renderer.on_surface_created()?;
        let size = windowed_context.window().inner_size();
        renderer.on_surface_changed(size.width, size.height);
        info!(
            "renderer {:?} at {}x{}",
            renderer.state(),
            size.width,
            size.height
        );

        let mut fps_counter = fps_counter::FPSCounter::new();

        event_loop.run_return(|event, _, control_flow| {
            if *control_flow != ControlFlow::Exit {
                *control_flow = match mode {
                    RenderMode::Continuously => ControlFlow::Poll,
                    RenderMode::WhenDirty => ControlFlow::Wait,
                };
            }

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => {
                        info!("closed after {} frames", renderer.frames());
                        *control_flow = ControlFlow::Exit;
                    }
                    WindowEvent::Resized(size) => {
                        windowed_context.resize(size);
                        if renderer.viewport() != Some(Viewport::full(size.width, size.height)) {
                            renderer.on_surface_changed(size.width, size.height);
                            windowed_context.window().request_redraw();
                        }
                    }
                    _ => {}
                },
                Event::MainEventsCleared => {
                    if mode == RenderMode::Continuously {
                        windowed_context.window().request_redraw();
                    }
                }
                Event::RedrawRequested(_) => {
                    renderer.on_draw_frame();
                    if let Err(err) = windowed_context.swap_buffers() {
                        error!("failed to present frame {}: {:?}", renderer.frames(), err);
                    }
                    trace!("fps: {}", fps_counter.tick());
                }
                _ => {}
            }
        });
    }

    Ok(())
}
