//! VRM character model loader
//!
//! A VRM file is a glTF container with avatar metadata in a root
//! extension: `VRM` for 0.x, `VRMC_vrm` for 1.0. The scene loads through
//! the ordinary glTF path; on top of it this module parses the extension
//! into the spec version, the authorship meta record and the humanoid
//! bone map. 0.x thumb bone names are normalized onto the 1.0 set.

use effigy_asset::{display_url, fetch_asset_bytes};
use serde_json::Value;

use crate::error::CharacterModelError;
use crate::humanoid::{HumanBoneName, HumanoidMap};
use crate::loaders::gltf::build_scene;
use crate::{CharacterMetadata, CharacterModel, VrmMeta, VrmMetadata, VrmSpecVersion};

/// Load a VRM character model from a URL
pub async fn load_vrm_character_model(url: &str) -> Result<CharacterModel, CharacterModelError> {
    let bytes = fetch_asset_bytes(url).await?;
    let model = parse_vrm_model(&bytes)?;

    if let CharacterMetadata::Vrm(vrm) = &model.metadata {
        log::info!(
            "Loaded VRM {} character from {} ({} nodes, {} humanoid bones)",
            vrm.spec_version,
            display_url(url),
            model.scene.node_count(),
            vrm.humanoid.len()
        );
    }

    Ok(model)
}

/// Parse an in-memory VRM payload into a character model
pub(crate) fn parse_vrm_model(bytes: &[u8]) -> Result<CharacterModel, CharacterModelError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    let scene = build_scene(&document, &buffers)?;
    let node_count = scene.nodes.len();

    let metadata = if let Some(ext) = document.extension_value("VRMC_vrm") {
        parse_vrm1(ext, node_count)?
    } else if let Some(ext) = document.extension_value("VRM") {
        parse_vrm0(ext, node_count)?
    } else {
        return Err(CharacterModelError::MissingVrmExtension);
    };

    Ok(CharacterModel {
        scene,
        metadata: CharacterMetadata::Vrm(metadata),
        bone_rotation_offset: None,
    })
}

/// Parse the `VRMC_vrm` (1.0) extension
fn parse_vrm1(ext: &Value, node_count: usize) -> Result<VrmMetadata, CharacterModelError> {
    if let Some(declared) = ext.get("specVersion").and_then(Value::as_str) {
        log::debug!("VRMC_vrm declares specVersion {}", declared);
    }

    let meta = match ext.get("meta") {
        Some(meta) => VrmMeta {
            name: string_field(meta, "name"),
            version: string_field(meta, "version"),
            authors: meta
                .get("authors")
                .and_then(Value::as_array)
                .map(|authors| {
                    authors
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            license_url: string_field(meta, "licenseUrl"),
        },
        None => {
            log::warn!("VRMC_vrm extension has no meta record");
            VrmMeta::default()
        }
    };

    // 1.0 keys the bone table by name: { "hips": { "node": 1 }, ... }
    let bones = ext
        .get("humanoid")
        .and_then(|h| h.get("humanBones"))
        .and_then(Value::as_object)
        .ok_or_else(|| CharacterModelError::Vrm("VRMC_vrm humanoid.humanBones missing".into()))?;

    let mut humanoid = HumanoidMap::new();
    for (name, entry) in bones {
        match entry.get("node").and_then(Value::as_u64) {
            Some(node) => insert_bone(&mut humanoid, name, node as usize, node_count),
            None => log::warn!("VRM humanoid bone '{}' has no node index", name),
        }
    }

    Ok(VrmMetadata {
        spec_version: VrmSpecVersion::V1,
        meta,
        humanoid,
    })
}

/// Parse the `VRM` (0.x) extension
fn parse_vrm0(ext: &Value, node_count: usize) -> Result<VrmMetadata, CharacterModelError> {
    if let Some(declared) = ext.get("specVersion").and_then(Value::as_str) {
        log::debug!("VRM declares specVersion {}", declared);
    }

    let meta = match ext.get("meta") {
        Some(meta) => VrmMeta {
            name: string_field(meta, "title"),
            version: string_field(meta, "version"),
            authors: string_field(meta, "author").into_iter().collect(),
            license_url: string_field(meta, "otherLicenseUrl"),
        },
        None => {
            log::warn!("VRM extension has no meta record");
            VrmMeta::default()
        }
    };

    // 0.x lists the bone table: [{ "bone": "hips", "node": 1 }, ...]
    let bones = ext
        .get("humanoid")
        .and_then(|h| h.get("humanBones"))
        .and_then(Value::as_array)
        .ok_or_else(|| CharacterModelError::Vrm("VRM humanoid.humanBones missing".into()))?;

    let mut humanoid = HumanoidMap::new();
    for entry in bones {
        let name = entry.get("bone").and_then(Value::as_str);
        let node = entry.get("node").and_then(Value::as_u64);
        match (name, node) {
            (Some(name), Some(node)) => insert_bone(
                &mut humanoid,
                normalize_vrm0_bone_name(name),
                node as usize,
                node_count,
            ),
            _ => log::warn!("Skipping malformed VRM humanBones entry: {}", entry),
        }
    }

    Ok(VrmMetadata {
        spec_version: VrmSpecVersion::V0,
        meta,
        humanoid,
    })
}

fn insert_bone(humanoid: &mut HumanoidMap, name: &str, node: usize, node_count: usize) {
    let Some(bone) = HumanBoneName::from_name(name) else {
        log::warn!("Skipping unknown VRM humanoid bone '{}'", name);
        return;
    };
    if node >= node_count {
        log::warn!(
            "Skipping VRM humanoid bone '{}': node {} out of range ({} nodes)",
            name,
            node,
            node_count
        );
        return;
    }
    humanoid.insert(bone, node);
}

/// Map 0.x thumb naming onto the 1.0 bone set
///
/// 0.x calls the metacarpal "proximal" and the proximal "intermediate";
/// the distal name is shared.
fn normalize_vrm0_bone_name(name: &str) -> &str {
    match name {
        "leftThumbProximal" => "leftThumbMetacarpal",
        "leftThumbIntermediate" => "leftThumbProximal",
        "rightThumbProximal" => "rightThumbMetacarpal",
        "rightThumbIntermediate" => "rightThumbProximal",
        other => other,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
