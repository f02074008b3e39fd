//! Bundled default model
//!
//! An armature-only glTF mannequin embedded in the crate and served as a
//! base64 data URL, so the default model flows through the ordinary
//! fetch-and-parse path like any other asset.

use std::sync::OnceLock;

use base64::Engine as _;

/// Raw glTF JSON of the bundled mannequin rig
pub const MANNEQUIN_GLTF: &str = include_str!("../assets/mannequin.gltf");

static MANNEQUIN_URL: OnceLock<String> = OnceLock::new();

/// URL of the bundled default model
///
/// The URL is stable across calls, so default loads always resolve to the
/// same cache entry. Async to leave room for hosted defaults; the bundled
/// asset resolves immediately.
pub async fn default_model_url() -> &'static str {
    MANNEQUIN_URL
        .get_or_init(|| {
            format!(
                "data:model/gltf+json;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(MANNEQUIN_GLTF)
            )
        })
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_url_is_stable() {
        let first = default_model_url().await;
        let second = default_model_url().await;
        assert!(std::ptr::eq(first, second));
        assert!(first.starts_with("data:model/gltf+json;base64,"));
    }

    #[tokio::test]
    async fn test_url_decodes_to_the_bundled_bytes() {
        let url = default_model_url().await;
        let bytes = effigy_asset::fetch_asset_bytes(url).await.unwrap();
        assert_eq!(bytes, MANNEQUIN_GLTF.as_bytes());
    }
}
