//! Cached character model loading
//!
//! The loader resolves options into an exact parameter tuple, memoizes
//! loads keyed by that tuple and decorates every loaded scene:
//! - frustum culling disabled on every node
//! - shadow flags enabled on every node when the resolved flag is true
//!
//! Shadow flags only add. A false flag leaves nodes as the format loader
//! produced them; loading with shadows off never strips shadows from an
//! asset that enables them itself.

use std::sync::{Arc, LazyLock};

use effigy_asset::{display_url, RequestCache};
use effigy_scene::RenderFlags;

use crate::error::CharacterModelError;
use crate::loaders::{load_gltf_character_model, load_vrm_character_model};
use crate::options::{
    resolve_options, CharacterModelOptions, ModelCacheKey, ModelFormat, ResolvedModelParams,
};
use crate::CharacterModel;

/// Outcome of a cached character model load
///
/// `Ok(None)` means the options disable the model. Successes and failures
/// are shared handles: every caller memoized onto the same entry receives
/// clones of the same `Arc`.
pub type CharacterModelResult =
    Result<Option<Arc<CharacterModel>>, Arc<CharacterModelError>>;

/// Cached character model loader
///
/// Owns the request cache keyed by resolved parameter tuples. Most callers
/// use the process-wide instance behind [`load_character_model`]; separate
/// instances give tests and tools isolated caches.
pub struct CharacterModelLoader {
    cache: RequestCache<ModelCacheKey, CharacterModel, CharacterModelError>,
}

impl CharacterModelLoader {
    pub fn new() -> Self {
        Self {
            cache: RequestCache::new(),
        }
    }

    /// Load a character model, reusing the entry for its resolved tuple
    ///
    /// Returns `Ok(None)` when the options disable the model; no cache
    /// entry is touched. Concurrent calls resolving to an equivalent tuple
    /// share one underlying load. A failed load stays memoized until its
    /// entry is cleared.
    pub async fn load(&self, options: impl Into<CharacterModelOptions>) -> CharacterModelResult {
        let params = match resolve_options(&options.into()).await {
            Some(params) => params,
            None => return Ok(None),
        };

        log::debug!(
            "Character model request: {:?} {}",
            params.format,
            display_url(&params.url)
        );

        self.cache
            .get_or_load(params.cache_key(), || load_resolved(params))
            .await
            .map(Some)
    }

    /// Evict the cache entry the given options resolve to
    ///
    /// Returns whether an entry existed. Disabled options resolve to no
    /// entry and are a no-op; the default options evict the built-in
    /// default model. An in-flight load is not cancelled, only forgotten,
    /// so the next load of the tuple starts fresh.
    pub async fn clear(&self, options: impl Into<CharacterModelOptions>) -> bool {
        match resolve_options(&options.into()).await {
            Some(params) => {
                let evicted = self.cache.evict(&params.cache_key());
                if evicted {
                    log::debug!("Evicted character model {}", display_url(&params.url));
                }
                evicted
            }
            None => false,
        }
    }

    /// Number of cached entries, pending loads included
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

impl Default for CharacterModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// The uncached load: dispatch on format, then decorate
async fn load_resolved(
    params: ResolvedModelParams,
) -> Result<CharacterModel, CharacterModelError> {
    let mut model = match params.format {
        ModelFormat::Vrm => load_vrm_character_model(&params.url).await?,
        ModelFormat::Gltf => load_gltf_character_model(&params.url).await?,
    };

    model.bone_rotation_offset = params.bone_rotation_offset;
    model.scene.traverse_mut(|_, node| {
        apply_render_flags(node, params.cast_shadow, params.receive_shadow)
    });

    Ok(model)
}

/// Decorate a loaded node for scene use
///
/// Frustum culling is disabled unconditionally. Shadow flags only add: a
/// false flag never touches the node, so whatever the format loader
/// produced stays in place.
pub fn apply_render_flags(node: &mut impl RenderFlags, cast_shadow: bool, receive_shadow: bool) {
    node.set_frustum_culled(false);
    if cast_shadow {
        node.set_cast_shadow(true);
    }
    if receive_shadow {
        node.set_receive_shadow(true);
    }
}

static SHARED_LOADER: LazyLock<CharacterModelLoader> = LazyLock::new(CharacterModelLoader::new);

/// Load a character model through the process-wide cache
pub async fn load_character_model(
    options: impl Into<CharacterModelOptions>,
) -> CharacterModelResult {
    SHARED_LOADER.load(options).await
}

/// Evict the process-wide cache entry the given options resolve to
pub async fn clear_character_model_cache(options: impl Into<CharacterModelOptions>) -> bool {
    SHARED_LOADER.clear(options).await
}
