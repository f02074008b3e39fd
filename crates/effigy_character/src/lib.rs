//! # Effigy Character
//!
//! Cached asynchronous loading of skeletal avatar models:
//! - Two model formats: glTF (.glb / embedded .gltf) and VRM 0.x / 1.0
//! - Boolean-or-record options with a built-in default mannequin
//! - Loads memoized by the resolved parameter tuple, single-flight per
//!   distinct tuple
//! - Post-load pass disabling frustum culling and additively enabling
//!   shadow flags on every scene node
//!
//! ```ignore
//! use effigy_character::{load_character_model, CharacterModelConfig, ModelFormat};
//!
//! // Built-in default mannequin
//! let model = load_character_model(true).await?.unwrap();
//!
//! // Explicit VRM avatar
//! let avatar = load_character_model(CharacterModelConfig {
//!     format: Some(ModelFormat::Vrm),
//!     url: Some("file:///avatars/alice.vrm".to_string()),
//!     ..Default::default()
//! })
//! .await?;
//! ```

pub mod error;
pub mod humanoid;
pub mod loader;
pub mod loaders;
pub mod mannequin;
pub mod options;

use std::fmt;

use effigy_scene::Scene;
use glam::Quat;

pub use error::CharacterModelError;
pub use humanoid::{HumanBoneName, HumanoidMap};
pub use loader::{
    clear_character_model_cache, load_character_model, CharacterModelLoader, CharacterModelResult,
};
pub use loaders::{load_gltf_character_model, load_vrm_character_model};
pub use mannequin::default_model_url;
pub use options::{
    default_bone_rotation_offset, resolve_options, CharacterModelConfig, CharacterModelOptions,
    ModelCacheKey, ModelFormat, ResolvedModelParams,
};

/// A loaded character model
#[derive(Clone, Debug)]
pub struct CharacterModel {
    /// Scene hierarchy with owned meshes, materials and skins
    pub scene: Scene,
    /// Format-specific metadata
    pub metadata: CharacterMetadata,
    /// Rotation applied when attaching objects to skeleton joints
    pub bone_rotation_offset: Option<Quat>,
}

impl CharacterModel {
    /// Format the model was loaded from
    pub fn format(&self) -> ModelFormat {
        match self.metadata {
            CharacterMetadata::Gltf(_) => ModelFormat::Gltf,
            CharacterMetadata::Vrm(_) => ModelFormat::Vrm,
        }
    }

    /// Humanoid bone table, present for VRM models
    pub fn humanoid(&self) -> Option<&HumanoidMap> {
        match &self.metadata {
            CharacterMetadata::Vrm(vrm) => Some(&vrm.humanoid),
            CharacterMetadata::Gltf(_) => None,
        }
    }
}

/// Format-specific model metadata
#[derive(Clone, Debug)]
pub enum CharacterMetadata {
    Gltf(GltfMetadata),
    Vrm(VrmMetadata),
}

/// Asset-level info from a glTF document
#[derive(Clone, Debug, Default)]
pub struct GltfMetadata {
    pub generator: Option<String>,
    pub copyright: Option<String>,
    pub extensions_used: Vec<String>,
}

/// VRM specification generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VrmSpecVersion {
    /// The `VRM` extension (0.x)
    V0,
    /// The `VRMC_vrm` extension (1.0)
    V1,
}

impl fmt::Display for VrmSpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V0 => write!(f, "0.x"),
            Self::V1 => write!(f, "1.0"),
        }
    }
}

/// Authorship record shared by both VRM generations
#[derive(Clone, Debug, Default)]
pub struct VrmMeta {
    pub name: Option<String>,
    pub version: Option<String>,
    pub authors: Vec<String>,
    pub license_url: Option<String>,
}

/// Avatar metadata carried by a VRM model
#[derive(Clone, Debug)]
pub struct VrmMetadata {
    pub spec_version: VrmSpecVersion,
    pub meta: VrmMeta,
    pub humanoid: HumanoidMap,
}
