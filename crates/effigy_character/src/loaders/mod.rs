//! Format-specific character model loaders
//!
//! Each loader takes a URL, fetches the bytes through effigy_asset and
//! produces an undecorated CharacterModel. The caching and the post-load
//! render-flag pass live in the crate's loader module, not here.

pub mod gltf;
pub mod vrm;

pub use self::gltf::load_gltf_character_model;
pub use self::vrm::load_vrm_character_model;
