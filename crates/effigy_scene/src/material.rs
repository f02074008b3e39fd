//! Minimal PBR material factors
//!
//! Texture decoding is out of scope here; materials carry factor values
//! only, enough for an engine to shade untextured characters and to match
//! materials back to the source asset by name.

/// Alpha blending mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

/// PBR metallic-roughness material factors
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    /// Base color factor (RGBA)
    pub base_color_factor: [f32; 4],
    /// Metallic factor (0.0 = dielectric, 1.0 = metal)
    pub metallic_factor: f32,
    /// Roughness factor (0.0 = smooth, 1.0 = rough)
    pub roughness_factor: f32,
    /// Emissive color factor (RGB)
    pub emissive_factor: [f32; 3],
    pub alpha_mode: AlphaMode,
    /// Alpha cutoff for masked mode
    pub alpha_cutoff: f32,
    /// Double-sided rendering
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let mat = Material::default();
        assert_eq!(mat.base_color_factor, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(mat.alpha_mode, AlphaMode::Opaque);
        assert!(!mat.double_sided);
    }
}
