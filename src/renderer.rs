use log::{debug, info, trace, warn};
use thiserror::Error;

pub mod gl;
#[cfg(test)]
mod recording;
mod shader;
mod vertex;

use gl::{ClearMask, Device, Primitive, Viewport};
use shader::{ShaderError, FRAGMENT_SHADER, VERTEX_SHADER};

const POSITION_ATTRIBUTE: &str = "vPosition";
const COLOR_UNIFORM: &str = "uColor";

const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const FILL_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

#[derive(Debug, Error, PartialEq)]
pub enum RendererError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("program has no active attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("could not allocate the vertex buffer: {0}")]
    CreateBuffer(String),
}

/// The callbacks a surface owner drives, always from the thread that holds
/// the GL context.
///
/// `on_surface_created` comes first, `on_surface_changed` follows on every
/// resize, and `on_draw_frame` is called at whatever rate the owner redraws.
pub trait SurfaceRenderer {
    fn on_surface_created(&mut self) -> Result<(), RendererError>;
    fn on_surface_changed(&mut self, width: u32, height: u32);
    fn on_draw_frame(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Ready,
    Drawing,
}

/// GPU objects created on surface creation and read on every frame.
struct RenderContext<D: Device> {
    program: D::Program,
    position: u32,
    color: Option<D::UniformLocation>,
    vertex_buffer: D::Buffer,
}

impl<D: Device> RenderContext<D> {
    fn new(device: &D) -> Result<Self, RendererError> {
        let program = shader::link_program(device, VERTEX_SHADER, FRAGMENT_SHADER)?;

        let position = match unsafe { device.attrib_location(program, POSITION_ATTRIBUTE) } {
            Some(position) => position,
            None => {
                unsafe { device.delete_program(program) };
                return Err(RendererError::MissingAttribute(POSITION_ATTRIBUTE));
            }
        };

        let color = unsafe { device.uniform_location(program, COLOR_UNIFORM) };
        if color.is_none() {
            warn!("program has no active uniform `{}`, fill color is left unset", COLOR_UNIFORM);
        }

        let vertex_buffer = match Self::upload_vertices(device) {
            Ok(buffer) => buffer,
            Err(err) => {
                unsafe { device.delete_program(program) };
                return Err(err);
            }
        };

        Ok(RenderContext {
            program,
            position,
            color,
            vertex_buffer,
        })
    }

    fn upload_vertices(device: &D) -> Result<D::Buffer, RendererError> {
        let vertices = vertex::triangle();
        unsafe {
            let buffer = device
                .create_buffer()
                .map_err(RendererError::CreateBuffer)?;
            device.bind_array_buffer(Some(buffer));
            device.array_buffer_data(vertices.get_ref());
            device.bind_array_buffer(None);
            Ok(buffer)
        }
    }

    fn destroy(self, device: &D) {
        unsafe {
            device.delete_buffer(self.vertex_buffer);
            device.delete_program(self.program);
        }
    }
}

pub struct Renderer<'a, D: Device> {
    device: &'a D,
    context: Option<RenderContext<D>>,
    viewport: Option<Viewport>,
    frame: usize,
    warned_uninitialized: bool,
}

impl<'a, D> Renderer<'a, D>
where
    D: Device,
{
    pub fn new(device: &'a D) -> Self {
        Renderer {
            device,
            context: None,
            viewport: None,
            frame: 0,
            warned_uninitialized: false,
        }
    }

    pub fn state(&self) -> State {
        match (&self.context, self.frame) {
            (None, _) => State::Uninitialized,
            (Some(_), 0) => State::Ready,
            (Some(_), _) => State::Drawing,
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn frames(&self) -> usize {
        self.frame
    }

    fn release(&mut self) {
        if let Some(context) = self.context.take() {
            debug!("releasing program {:?}", context.program);
            context.destroy(self.device);
        }
    }
}

impl<'a, D: Device> SurfaceRenderer for Renderer<'a, D> {
    fn on_surface_created(&mut self) -> Result<(), RendererError> {
        self.release();
        self.frame = 0;

        let context = RenderContext::new(self.device)?;
        unsafe { self.device.clear_color(CLEAR_COLOR) };

        info!(
            "surface created: program {:?}, `{}` at {}",
            context.program, POSITION_ATTRIBUTE, context.position
        );
        self.context = Some(context);
        self.warned_uninitialized = false;
        Ok(())
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        let viewport = Viewport::full(width, height);
        unsafe { self.device.viewport(viewport) };
        debug!("viewport set to {}x{}", width, height);
        self.viewport = Some(viewport);
    }

    fn on_draw_frame(&mut self) {
        let context = match &self.context {
            Some(context) => context,
            None => {
                if !self.warned_uninitialized {
                    warn!("draw requested before the surface was created, skipping");
                    self.warned_uninitialized = true;
                }
                return;
            }
        };

        let device = self.device;
        unsafe {
            device.clear(ClearMask::ALL);
            device.use_program(Some(context.program));
            device.bind_array_buffer(Some(context.vertex_buffer));
            device.vertex_attrib_pointer_f32(context.position, vertex::COMPONENTS, false, 0, 0);
            device.enable_vertex_attrib_array(context.position);
            if let Some(color) = &context.color {
                device.uniform_4_f32(Some(color), FILL_COLOR);
            }
            device.draw_arrays(Primitive::TriangleStrip, 0, vertex::TRIANGLE.len() as i32);
        }

        self.frame += 1;
        trace!("frame {}", self.frame);
    }
}

impl<'a, D: Device> Drop for Renderer<'a, D> {
    fn drop(&mut self) {
        self.release();
    }
}
