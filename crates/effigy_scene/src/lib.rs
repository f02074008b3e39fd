//! # Effigy Scene
//!
//! Retained scene-graph primitives for character models:
//! - Node hierarchy with TRS transforms (arena-indexed)
//! - Pre-order traversal over the nodes reachable from the scene roots
//! - Render flags (shadow casting/receiving, frustum culling, visibility)
//! - Skinned mesh primitives with bone indices and weights
//! - Minimal PBR material factors
//!
//! The crate carries no renderer; it is the CPU-side shape that format
//! loaders produce and engines consume.

pub mod material;
pub mod mesh;
pub mod node;
pub mod scene;

pub use material::{AlphaMode, Material};
pub use mesh::{Mesh, Primitive, Skin, Vertex};
pub use node::{RenderFlags, SceneNode, Transform};
pub use scene::Scene;
