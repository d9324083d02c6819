use log::{debug, error};
use thiserror::Error;

use super::gl::{Device, ShaderStage};

pub const VERTEX_SHADER: &str = "attribute vec2 vPosition;
void main(){
   gl_Position = vec4(vPosition,0,1);
}";

pub const FRAGMENT_SHADER: &str = "precision mediump float;
uniform vec4 uColor;
void main(){
   gl_FragColor = uColor;
}";

#[derive(Debug, Error, PartialEq)]
pub enum ShaderError {
    #[error("could not allocate a {stage} shader: {reason}")]
    CreateShader { stage: ShaderStage, reason: String },
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("could not allocate a program: {0}")]
    CreateProgram(String),
    #[error("program failed to link: {log}")]
    Link { log: String },
}

/// Compiles one stage. A shader that fails to compile is deleted before
/// returning.
pub fn compile<D: Device>(
    device: &D,
    stage: ShaderStage,
    source: &str,
) -> Result<D::Shader, ShaderError> {
    unsafe {
        let shader = device
            .create_shader(stage)
            .map_err(|reason| ShaderError::CreateShader { stage, reason })?;
        debug!("created {} shader {:?}", stage, shader);

        device.shader_source(shader, source);
        device.compile_shader(shader);
        if !device.shader_compile_status(shader) {
            let log = device.shader_info_log(shader);
            error!("{} shader {:?} failed to compile: {}", stage, shader, log);
            device.delete_shader(shader);
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(shader)
    }
}

/// Compiles both stages and links them. The shader objects never outlive
/// this call: they are deleted on every error path and detached and deleted
/// once the program is linked.
pub fn link_program<D: Device>(
    device: &D,
    vs_source: &str,
    fs_source: &str,
) -> Result<D::Program, ShaderError> {
    let vs = compile(device, ShaderStage::Vertex, vs_source)?;
    let fs = match compile(device, ShaderStage::Fragment, fs_source) {
        Ok(fs) => fs,
        Err(err) => {
            unsafe { device.delete_shader(vs) };
            return Err(err);
        }
    };

    unsafe {
        let program = match device.create_program() {
            Ok(program) => program,
            Err(reason) => {
                device.delete_shader(vs);
                device.delete_shader(fs);
                return Err(ShaderError::CreateProgram(reason));
            }
        };

        device.attach_shader(program, vs);
        device.attach_shader(program, fs);
        device.link_program(program);

        if !device.program_link_status(program) {
            let log = device.program_info_log(program);
            error!("program {:?} failed to link: {}", program, log);
            device.delete_program(program);
            device.delete_shader(vs);
            device.delete_shader(fs);
            return Err(ShaderError::Link { log });
        }

        for shader in [vs, fs].iter() {
            device.detach_shader(program, *shader);
            device.delete_shader(*shader);
        }

        debug!("linked program {:?}", program);
        Ok(program)
    }
}
