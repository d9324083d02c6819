use glow::HasContext;
use std::convert::TryFrom;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const ALL: ClearMask = ClearMask {
        color: true,
        depth: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn full(width: u32, height: u32) -> Self {
        Viewport {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Width and height as GL sizes, clamped to `i32::MAX`.
    pub fn extent(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

/// The slice of OpenGL ES 2 the renderer consumes.
///
/// # Safety
///
/// Every method issues GL commands: a context must be current on the calling
/// thread, and handles must come from that same context.
pub trait Device {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn program_info_log(&self, program: Self::Program) -> String;
    unsafe fn use_program(&self, program: Option<Self::Program>);
    unsafe fn delete_program(&self, program: Self::Program);

    unsafe fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    unsafe fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String>;
    unsafe fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    unsafe fn array_buffer_data(&self, data: &[u8]);
    unsafe fn delete_buffer(&self, buffer: Self::Buffer);

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    unsafe fn enable_vertex_attrib_array(&self, index: u32);
    unsafe fn uniform_4_f32(&self, location: Option<&Self::UniformLocation>, value: [f32; 4]);

    unsafe fn clear_color(&self, color: [f32; 4]);
    unsafe fn clear(&self, mask: ClearMask);
    unsafe fn viewport(&self, viewport: Viewport);
    unsafe fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32);
}

impl Device for glow::Context {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type UniformLocation = glow::NativeUniformLocation;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        HasContext::create_shader(self, ty)
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        HasContext::shader_source(self, shader, source)
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        HasContext::compile_shader(self, shader)
    }

    unsafe fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.get_shader_compile_status(shader)
    }

    unsafe fn shader_info_log(&self, shader: Self::Shader) -> String {
        self.get_shader_info_log(shader)
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        HasContext::delete_shader(self, shader)
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        HasContext::create_program(self)
    }

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::attach_shader(self, program, shader)
    }

    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::detach_shader(self, program, shader)
    }

    unsafe fn link_program(&self, program: Self::Program) {
        HasContext::link_program(self, program)
    }

    unsafe fn program_link_status(&self, program: Self::Program) -> bool {
        self.get_program_link_status(program)
    }

    unsafe fn program_info_log(&self, program: Self::Program) -> String {
        self.get_program_info_log(program)
    }

    unsafe fn use_program(&self, program: Option<Self::Program>) {
        HasContext::use_program(self, program)
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        HasContext::delete_program(self, program)
    }

    unsafe fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        self.get_attrib_location(program, name)
    }

    unsafe fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        self.get_uniform_location(program, name)
    }

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String> {
        HasContext::create_buffer(self)
    }

    unsafe fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        self.bind_buffer(glow::ARRAY_BUFFER, buffer)
    }

    unsafe fn array_buffer_data(&self, data: &[u8]) {
        self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
    }

    unsafe fn delete_buffer(&self, buffer: Self::Buffer) {
        HasContext::delete_buffer(self, buffer)
    }

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        HasContext::vertex_attrib_pointer_f32(
            self,
            index,
            size,
            glow::FLOAT,
            normalized,
            stride,
            offset,
        )
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        HasContext::enable_vertex_attrib_array(self, index)
    }

    unsafe fn uniform_4_f32(&self, location: Option<&Self::UniformLocation>, value: [f32; 4]) {
        let [r, g, b, a] = value;
        HasContext::uniform_4_f32(self, location, r, g, b, a)
    }

    unsafe fn clear_color(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        HasContext::clear_color(self, r, g, b, a)
    }

    unsafe fn clear(&self, mask: ClearMask) {
        let mut bits = 0;
        if mask.color {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if mask.depth {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        HasContext::clear(self, bits)
    }

    unsafe fn viewport(&self, viewport: Viewport) {
        let (width, height) = viewport.extent();
        HasContext::viewport(self, viewport.x, viewport.y, width, height)
    }

    unsafe fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        let mode = match primitive {
            Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        };
        HasContext::draw_arrays(self, mode, first, count)
    }
}
