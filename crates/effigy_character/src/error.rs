//! Character model loading errors

use thiserror::Error;

/// Errors from the character model loaders
#[derive(Debug, Error)]
pub enum CharacterModelError {
    #[error("Failed to fetch model data: {0}")]
    Fetch(#[from] effigy_asset::AssetError),

    #[error("Failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Invalid model data: {0}")]
    InvalidData(String),

    #[error("Not a VRM asset: no VRM or VRMC_vrm extension present")]
    MissingVrmExtension,

    #[error("Invalid VRM metadata: {0}")]
    Vrm(String),
}
