//! Scene nodes, local transforms and render flags

use glam::{Mat4, Quat, Vec3};

/// Local TRS transform of a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Compose into a column-major local matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Node capability for toggling shadow and culling behaviour
///
/// Post-processing passes are written against this trait so they stay
/// independent of the concrete scene representation.
pub trait RenderFlags {
    fn set_cast_shadow(&mut self, cast: bool);
    fn set_receive_shadow(&mut self, receive: bool);
    fn set_frustum_culled(&mut self, culled: bool);
}

/// A node in the scene hierarchy
///
/// Nodes reference meshes, skins and children by index into the owning
/// Scene arena.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: Option<String>,
    /// Local transform relative to the parent
    pub transform: Transform,
    /// Index into Scene.meshes, or None
    pub mesh: Option<usize>,
    /// Index into Scene.skins, or None
    pub skin: Option<usize>,
    /// Child node indices
    pub children: Vec<usize>,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub frustum_culled: bool,
}

impl SceneNode {
    pub fn new() -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            mesh: None,
            skin: None,
            children: Vec::new(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            frustum_culled: true,
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderFlags for SceneNode {
    fn set_cast_shadow(&mut self, cast: bool) {
        self.cast_shadow = cast;
    }

    fn set_receive_shadow(&mut self, receive: bool) {
        self.receive_shadow = receive;
    }

    fn set_frustum_culled(&mut self, culled: bool) {
        self.frustum_culled = culled;
    }
}
