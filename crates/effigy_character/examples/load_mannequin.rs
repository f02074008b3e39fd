//! Character model loading walkthrough
//!
//! This example shows:
//! - Loading the built-in default mannequin
//! - The scene hierarchy and render flags after decoration
//! - Cache hits returning the same shared instance
//! - Disabling the model and clearing the cache

use std::sync::Arc;

use effigy_character::{
    clear_character_model_cache, load_character_model, CharacterModel,
};
use effigy_scene::Scene;

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("Character Model Demo");
    println!("====================\n");

    println!("📂 Loading the default mannequin...");
    let model = match load_character_model(true).await {
        Ok(Some(model)) => {
            println!("✓ Loaded {} model\n", model.format());
            model
        }
        Ok(None) => {
            println!("Model disabled, nothing to show");
            return;
        }
        Err(e) => {
            eprintln!("❌ Failed to load model: {}", e);
            return;
        }
    };

    describe_model(&model);

    println!("\n📂 Loading the same options again...");
    match load_character_model(true).await {
        Ok(Some(again)) => {
            if Arc::ptr_eq(&model, &again) {
                println!("✓ Cache hit: same shared instance");
            } else {
                println!("❌ Expected the cached instance");
            }
        }
        other => println!("❌ Unexpected result: {:?}", other.map(|m| m.is_some())),
    }

    println!("\n📂 Loading with the model disabled...");
    match load_character_model(false).await {
        Ok(None) => println!("✓ Disabled options resolve to no model"),
        other => println!("❌ Unexpected result: {:?}", other.map(|m| m.is_some())),
    }

    println!("\n🗑  Clearing the cached default...");
    if clear_character_model_cache(true).await {
        println!("✓ Entry evicted");
    }
    match load_character_model(true).await {
        Ok(Some(fresh)) => {
            if Arc::ptr_eq(&model, &fresh) {
                println!("❌ Expected a freshly loaded instance");
            } else {
                println!("✓ Reload after clearing produced a new instance");
            }
        }
        other => println!("❌ Unexpected result: {:?}", other.map(|m| m.is_some())),
    }
}

fn describe_model(model: &CharacterModel) {
    println!("Format:            {}", model.format());
    println!("Nodes:             {}", model.scene.node_count());
    match model.bone_rotation_offset {
        Some(offset) => println!("Bone offset:       {:?}", offset.to_euler(glam::EulerRot::ZYX)),
        None => println!("Bone offset:       none"),
    }
    if let Some(humanoid) = model.humanoid() {
        println!("Humanoid bones:    {}", humanoid.len());
    }

    println!("\nHierarchy:");
    for &root in &model.scene.roots {
        print_subtree(&model.scene, root, 1);
    }
}

fn print_subtree(scene: &Scene, index: usize, depth: usize) {
    let Some(node) = scene.node(index) else {
        return;
    };
    println!(
        "{}{} (shadows: cast={} receive={}, culled={})",
        "  ".repeat(depth),
        node.name.as_deref().unwrap_or("<unnamed>"),
        node.cast_shadow,
        node.receive_shadow,
        node.frustum_culled,
    );
    for &child in &node.children {
        print_subtree(scene, child, depth + 1);
    }
}
