//! A `Device` that records every call instead of talking to a GPU.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::gl::{ClearMask, Device, Primitive, ShaderStage, Viewport};

pub const POSITION_LOCATION: u32 = 3;
pub const COLOR_LOCATION: i32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    ShaderSource(u32, String),
    CompileShader(u32),
    ShaderCompileStatus(u32),
    ShaderInfoLog(u32),
    DeleteShader(u32),
    CreateProgram,
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    ProgramLinkStatus(u32),
    ProgramInfoLog(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    AttribLocation(u32, String),
    UniformLocation(u32, String),
    CreateBuffer,
    BindArrayBuffer(Option<u32>),
    ArrayBufferData(Vec<u8>),
    DeleteBuffer(u32),
    VertexAttribPointer {
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    Uniform4f(Option<i32>, [f32; 4]),
    ClearColor([f32; 4]),
    Clear(ClearMask),
    Viewport(Viewport),
    DrawArrays(Primitive, i32, i32),
}

#[derive(Default)]
pub struct RecordingDevice {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<u32>,
    stages: RefCell<HashMap<u32, ShaderStage>>,
    linked: RefCell<Vec<u32>>,
    failing_stages: Vec<ShaderStage>,
    fail_create_shader: bool,
    fail_create_program: bool,
    fail_link: bool,
    fail_create_buffer: bool,
    without_color: bool,
    without_position: bool,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_compile(mut self, stage: ShaderStage) -> Self {
        self.failing_stages.push(stage);
        self
    }

    pub fn fail_create_shader(mut self) -> Self {
        self.fail_create_shader = true;
        self
    }

    pub fn fail_create_program(mut self) -> Self {
        self.fail_create_program = true;
        self
    }

    pub fn fail_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub fn fail_create_buffer(mut self) -> Self {
        self.fail_create_buffer = true;
        self
    }

    pub fn without_color(mut self) -> Self {
        self.without_color = true;
        self
    }

    pub fn without_position(mut self) -> Self {
        self.without_position = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, f: F) -> usize {
        self.calls.borrow().iter().filter(|c| f(*c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn handle(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }

    fn is_linked(&self, program: u32) -> bool {
        self.linked.borrow().contains(&program)
    }
}

impl Device for RecordingDevice {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = i32;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        self.record(Call::CreateShader(stage));
        if self.fail_create_shader {
            return Err("out of shader objects".to_owned());
        }
        let shader = self.handle();
        self.stages.borrow_mut().insert(shader, stage);
        Ok(shader)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        self.record(Call::ShaderSource(shader, source.to_owned()));
    }

    unsafe fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    unsafe fn shader_compile_status(&self, shader: u32) -> bool {
        self.record(Call::ShaderCompileStatus(shader));
        match self.stages.borrow().get(&shader) {
            Some(stage) => !self.failing_stages.contains(stage),
            None => false,
        }
    }

    unsafe fn shader_info_log(&self, shader: u32) -> String {
        self.record(Call::ShaderInfoLog(shader));
        "ERROR: 0:1: '' : syntax error".to_owned()
    }

    unsafe fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        self.record(Call::CreateProgram);
        if self.fail_create_program {
            return Err("out of program objects".to_owned());
        }
        Ok(self.handle())
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    unsafe fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        if !self.fail_link {
            self.linked.borrow_mut().push(program);
        }
    }

    unsafe fn program_link_status(&self, program: u32) -> bool {
        self.record(Call::ProgramLinkStatus(program));
        self.is_linked(program)
    }

    unsafe fn program_info_log(&self, program: u32) -> String {
        self.record(Call::ProgramInfoLog(program));
        "error: vertex and fragment shaders disagree".to_owned()
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    unsafe fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
        self.linked.borrow_mut().retain(|p| *p != program);
    }

    unsafe fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        self.record(Call::AttribLocation(program, name.to_owned()));
        match name {
            "vPosition" if self.is_linked(program) && !self.without_position => {
                Some(POSITION_LOCATION)
            }
            _ => None,
        }
    }

    unsafe fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        self.record(Call::UniformLocation(program, name.to_owned()));
        match name {
            "uColor" if self.is_linked(program) && !self.without_color => Some(COLOR_LOCATION),
            _ => None,
        }
    }

    unsafe fn create_buffer(&self) -> Result<u32, String> {
        self.record(Call::CreateBuffer);
        if self.fail_create_buffer {
            return Err("out of buffer objects".to_owned());
        }
        Ok(self.handle())
    }

    unsafe fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    unsafe fn array_buffer_data(&self, data: &[u8]) {
        self.record(Call::ArrayBufferData(data.to_vec()));
    }

    unsafe fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    unsafe fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            size,
            normalized,
            stride,
            offset,
        });
    }

    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    unsafe fn uniform_4_f32(&self, location: Option<&i32>, value: [f32; 4]) {
        self.record(Call::Uniform4f(location.copied(), value));
    }

    unsafe fn clear_color(&self, color: [f32; 4]) {
        self.record(Call::ClearColor(color));
    }

    unsafe fn clear(&self, mask: ClearMask) {
        self.record(Call::Clear(mask));
    }

    unsafe fn viewport(&self, viewport: Viewport) {
        self.record(Call::Viewport(viewport));
    }

    unsafe fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.record(Call::DrawArrays(primitive, first, count));
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

/// Keeps log records on the thread that emitted them, so parallel tests
/// only see their own.
struct ThreadLogger;

impl Log for ThreadLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS.with(|r| {
            r.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: ThreadLogger = ThreadLogger;
static INIT: Once = Once::new();

/// Installs the capturing logger and forgets this thread's earlier records.
pub fn capture_logs() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn logged(level: Level) -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}
