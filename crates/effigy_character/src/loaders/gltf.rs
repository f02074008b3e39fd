//! glTF character model loader
//!
//! Supports:
//! - GLB (.glb) and glTF JSON with embedded buffers
//! - Scene hierarchy with decomposed TRS transforms
//! - Skinned mesh primitives (positions, normals, UVs, joints, weights)
//! - PBR material factors
//! - Skins with inverse bind matrices
//!
//! Note: animations, morph targets and texture decoding are not covered.

use effigy_asset::{display_url, fetch_asset_bytes};
use effigy_scene::{
    AlphaMode, Material, Mesh, Primitive, Scene, SceneNode, Skin, Transform, Vertex,
};
use glam::{Mat4, Quat, Vec3};

use crate::error::CharacterModelError;
use crate::{CharacterMetadata, CharacterModel, GltfMetadata};

/// Load a glTF character model from a URL
pub async fn load_gltf_character_model(url: &str) -> Result<CharacterModel, CharacterModelError> {
    let bytes = fetch_asset_bytes(url).await?;
    let model = parse_gltf_model(&bytes)?;
    log::info!(
        "Loaded glTF character from {} ({} nodes, {} meshes)",
        display_url(url),
        model.scene.node_count(),
        model.scene.meshes.len()
    );
    Ok(model)
}

/// Parse an in-memory glTF/GLB payload into a character model
pub(crate) fn parse_gltf_model(bytes: &[u8]) -> Result<CharacterModel, CharacterModelError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    let scene = build_scene(&document, &buffers)?;

    let root = document.into_json();
    let metadata = GltfMetadata {
        generator: root.asset.generator,
        copyright: root.asset.copyright,
        extensions_used: root.extensions_used,
    };

    Ok(CharacterModel {
        scene,
        metadata: CharacterMetadata::Gltf(metadata),
        bone_rotation_offset: None,
    })
}

/// Build the scene arena from a parsed glTF document
pub(crate) fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Scene, CharacterModelError> {
    let mut scene = Scene::new();
    scene.materials = load_materials(document);
    scene.meshes = load_meshes(document, buffers)?;
    scene.skins = load_skins(document, buffers);
    scene.nodes = load_nodes(document);

    // The default scene's roots; files without one use the first scene
    scene.roots = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|s| s.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    Ok(scene)
}

fn load_nodes(document: &gltf::Document) -> Vec<SceneNode> {
    let mut nodes = Vec::new();

    for node in document.nodes() {
        let (translation, rotation, scale) = node.transform().decomposed();

        nodes.push(SceneNode {
            name: node.name().map(str::to_string),
            transform: Transform {
                translation: Vec3::from(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from(scale),
            },
            mesh: node.mesh().map(|m| m.index()),
            skin: node.skin().map(|s| s.index()),
            children: node.children().map(|c| c.index()).collect(),
            ..SceneNode::new()
        });
    }

    nodes
}

fn load_meshes(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Vec<Mesh>, CharacterModelError> {
    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mut primitives = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            // Positions are required
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| CharacterModelError::InvalidData("mesh missing positions".into()))?
                .collect();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|n| n.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|t| t.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

            // Skinning attributes are zeroed for rigid meshes
            let joints: Vec<[u16; 4]> = reader
                .read_joints(0)
                .map(|j| j.into_u16().collect())
                .unwrap_or_else(|| vec![[0; 4]; positions.len()]);

            let weights: Vec<[f32; 4]> = reader
                .read_weights(0)
                .map(|w| w.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0; 4]; positions.len()]);

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let vertices: Vec<Vertex> = (0..positions.len())
                .map(|i| Vertex {
                    position: positions[i],
                    normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                    joints: joints.get(i).copied().unwrap_or([0; 4]),
                    weights: weights.get(i).copied().unwrap_or([0.0; 4]),
                })
                .collect();

            primitives.push(Primitive {
                vertices,
                indices,
                material: primitive.material().index(),
            });
        }

        meshes.push(Mesh {
            name: mesh.name().map(str::to_string),
            primitives,
        });
    }

    Ok(meshes)
}

fn load_materials(document: &gltf::Document) -> Vec<Material> {
    let mut materials = Vec::new();

    for mat in document.materials() {
        let pbr = mat.pbr_metallic_roughness();

        let alpha_mode = match mat.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        };

        materials.push(Material {
            name: mat.name().unwrap_or("").to_string(),
            base_color_factor: pbr.base_color_factor(),
            metallic_factor: pbr.metallic_factor(),
            roughness_factor: pbr.roughness_factor(),
            emissive_factor: mat.emissive_factor(),
            alpha_mode,
            alpha_cutoff: mat.alpha_cutoff().unwrap_or(0.5),
            double_sided: mat.double_sided(),
        });
    }

    materials
}

fn load_skins(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Vec<Skin> {
    let mut skins = Vec::new();

    for skin in document.skins() {
        let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();

        let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
        let inverse_bind_matrices: Vec<Mat4> = reader
            .read_inverse_bind_matrices()
            .map(|ms| ms.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_else(|| vec![Mat4::IDENTITY; joints.len()]);

        skins.push(Skin {
            name: skin.name().map(str::to_string),
            joints,
            inverse_bind_matrices,
        });
    }

    skins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mannequin::MANNEQUIN_GLTF;

    #[test]
    fn test_parse_mannequin() {
        let model = parse_gltf_model(MANNEQUIN_GLTF.as_bytes()).unwrap();
        assert_eq!(model.scene.node_count(), 20);
        assert_eq!(model.scene.roots.len(), 1);
        assert!(model.scene.meshes.is_empty());
        assert!(model.bone_rotation_offset.is_none());

        // Hierarchy reaches every node
        let mut visited = 0;
        model.scene.traverse(|_, _| visited += 1);
        assert_eq!(visited, 20);

        let hips = model.scene.find_node("Hips").unwrap();
        let node = model.scene.node(hips).unwrap();
        assert_eq!(node.transform.translation, Vec3::new(0.0, 0.95, 0.0));
        assert_eq!(node.children.len(), 3);
    }

    #[test]
    fn test_parse_metadata() {
        let model = parse_gltf_model(MANNEQUIN_GLTF.as_bytes()).unwrap();
        match model.metadata {
            CharacterMetadata::Gltf(meta) => {
                assert_eq!(meta.generator.as_deref(), Some("effigy mannequin rig"));
                assert!(meta.extensions_used.is_empty());
            }
            other => panic!("expected glTF metadata, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_gltf_model(b"not a model").is_err());
    }

    #[test]
    fn test_loaded_nodes_keep_default_render_flags() {
        let model = parse_gltf_model(MANNEQUIN_GLTF.as_bytes()).unwrap();
        model.scene.traverse(|_, node| {
            assert!(!node.cast_shadow);
            assert!(!node.receive_shadow);
            assert!(node.frustum_culled);
        });
    }

    fn put_f32s(buf: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn put_u16s(buf: &mut Vec<u8>, values: &[u16]) {
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// A triangle skinned to a two-joint armature, buffers embedded
    fn skinned_rig_gltf() -> Vec<u8> {
        use base64::Engine as _;

        #[rustfmt::skip]
        let weights = [
            1.0, 0.0, 0.0, 0.0,
            1.0, 0.0, 0.0, 0.0,
            0.5, 0.5, 0.0, 0.0,
        ];
        let identity = Mat4::IDENTITY.to_cols_array();
        let offset_down = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)).to_cols_array();

        let mut bin = Vec::new();
        // positions @ 0
        put_f32s(&mut bin, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        // joints @ 36
        put_u16s(&mut bin, &[0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0]);
        // weights @ 60
        put_f32s(&mut bin, &weights);
        // indices @ 108, then 2 bytes of padding to align the matrices
        put_u16s(&mut bin, &[0, 1, 2]);
        bin.extend_from_slice(&[0, 0]);
        // inverse bind matrices @ 116
        put_f32s(&mut bin, &identity);
        put_f32s(&mut bin, &offset_down);
        assert_eq!(bin.len(), 244);

        let document = serde_json::json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [
                { "name": "Root", "children": [1, 3] },
                { "name": "Hips", "translation": [0.0, 1.0, 0.0], "children": [2] },
                { "name": "Spine", "scale": [2.0, 2.0, 2.0] },
                { "name": "Body", "mesh": 0, "skin": 0 }
            ],
            "meshes": [{
                "name": "BodyMesh",
                "primitives": [{
                    "attributes": { "POSITION": 0, "JOINTS_0": 1, "WEIGHTS_0": 2 },
                    "indices": 3,
                    "material": 0
                }]
            }],
            "materials": [{
                "name": "Skin",
                "pbrMetallicRoughness": {
                    "baseColorFactor": [1.0, 0.8, 0.7, 1.0],
                    "metallicFactor": 0.0,
                    "roughnessFactor": 0.9
                },
                "alphaMode": "MASK",
                "alphaCutoff": 0.25,
                "doubleSided": true
            }],
            "skins": [{ "joints": [1, 2], "inverseBindMatrices": 4 }],
            "accessors": [
                {
                    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
                },
                { "bufferView": 1, "componentType": 5123, "count": 3, "type": "VEC4" },
                { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4" },
                { "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" },
                { "bufferView": 4, "componentType": 5126, "count": 2, "type": "MAT4" }
            ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
                { "buffer": 0, "byteOffset": 36, "byteLength": 24 },
                { "buffer": 0, "byteOffset": 60, "byteLength": 48 },
                { "buffer": 0, "byteOffset": 108, "byteLength": 6 },
                { "buffer": 0, "byteOffset": 116, "byteLength": 128 }
            ],
            "buffers": [{
                "byteLength": 244,
                "uri": format!(
                    "data:application/octet-stream;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(&bin)
                )
            }]
        });

        document.to_string().into_bytes()
    }

    #[test]
    fn test_parse_skinned_mesh() {
        let model = parse_gltf_model(&skinned_rig_gltf()).unwrap();
        let scene = &model.scene;
        assert_eq!(scene.roots, vec![0]);

        let hips = scene.node(scene.find_node("Hips").unwrap()).unwrap();
        assert_eq!(hips.transform.translation, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(hips.transform.rotation, Quat::IDENTITY);
        let spine = scene.node(scene.find_node("Spine").unwrap()).unwrap();
        assert_eq!(spine.transform.scale, Vec3::splat(2.0));

        let body = scene.node(scene.find_node("Body").unwrap()).unwrap();
        assert_eq!(body.mesh, Some(0));
        assert_eq!(body.skin, Some(0));

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name.as_deref(), Some("BodyMesh"));
        let primitive = &mesh.primitives[0];
        assert_eq!(primitive.vertices.len(), 3);
        assert_eq!(primitive.indices, vec![0, 1, 2]);
        assert_eq!(primitive.material, Some(0));
        assert_eq!(primitive.vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(primitive.vertices[1].joints, [1, 0, 0, 0]);
        assert_eq!(primitive.vertices[2].joints, [0, 1, 0, 0]);
        assert_eq!(primitive.vertices[2].weights, [0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_skinned_mesh_material_and_skin() {
        let model = parse_gltf_model(&skinned_rig_gltf()).unwrap();
        let scene = &model.scene;

        let material = &scene.materials[0];
        assert_eq!(material.name, "Skin");
        assert_eq!(material.base_color_factor, [1.0, 0.8, 0.7, 1.0]);
        assert_eq!(material.alpha_mode, AlphaMode::Mask);
        assert_eq!(material.alpha_cutoff, 0.25);
        assert!(material.double_sided);

        let skin = &scene.skins[0];
        assert_eq!(skin.joints, vec![1, 2]);
        assert_eq!(skin.inverse_bind_matrices.len(), 2);
        assert_eq!(skin.inverse_bind_matrices[0], Mat4::IDENTITY);
        assert_eq!(
            skin.inverse_bind_matrices[1],
            Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))
        );
    }
}
