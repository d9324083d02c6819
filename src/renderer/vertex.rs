use bytemuck::{Pod, Zeroable};
use std::io::Cursor;

/// Floats per vertex fed to `vPosition`.
pub const COMPONENTS: i32 = 2;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

pub const TRIANGLE: [Vertex; 3] = [
    Vertex {
        position: [0.0, 0.5],
    },
    Vertex {
        position: [-0.5, -0.5],
    },
    Vertex {
        position: [0.5, -0.5],
    },
];

/// Packs `TRIANGLE` into native-endian bytes, cursor at the start.
pub fn triangle() -> Cursor<Vec<u8>> {
    Cursor::new(bytemuck::cast_slice(&TRIANGLE).to_vec())
}
