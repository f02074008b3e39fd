//! Skinned mesh primitives
//!
//! Vertex data is kept CPU-side in a GPU-uploadable layout. Joint indices
//! reference the owning skin's joint list, not scene node indices.

use glam::Mat4;

/// Skinned vertex layout
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Joint indices into the skin's joint list (zero for rigid meshes)
    pub joints: [u16; 4],
    /// Joint weights (zero for rigid meshes)
    pub weights: [f32; 4],
}

/// A renderable primitive with a single material
#[derive(Clone, Debug, Default)]
pub struct Primitive {
    pub vertices: Vec<Vertex>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Index into Scene.materials, or None
    pub material: Option<usize>,
}

/// A mesh containing one or more primitives
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// A skin binding mesh vertices to scene nodes
#[derive(Clone, Debug, Default)]
pub struct Skin {
    pub name: Option<String>,
    /// Joint node indices into Scene.nodes
    pub joints: Vec<usize>,
    /// One matrix per joint; identity when the asset omits them
    pub inverse_bind_matrices: Vec<Mat4>,
}

impl Skin {
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}
