//! Character model options, parameter resolution and the cache key

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::{EulerRot, Quat};
use serde::{Deserialize, Serialize};

use crate::mannequin;

/// Supported character model formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Vrm,
    Gltf,
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vrm => write!(f, "VRM"),
            Self::Gltf => write!(f, "glTF"),
        }
    }
}

/// Explicit character model configuration
///
/// All fields are optional. Without both `format` and `url` the model
/// identity falls back to the built-in default; shadow flags default to
/// true when absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterModelConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub format: Option<ModelFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Rotation applied when attaching objects to skeleton joints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bone_rotation_offset: Option<Quat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive_shadow: Option<bool>,
}

/// How a character model should be sourced
///
/// Mirrors the boolean-or-record shape configs use: `false` disables the
/// model, `true` (or leaving the value out) selects the built-in default,
/// a record selects an explicit model.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CharacterModelOptions {
    /// No model
    Disabled,
    /// The built-in default model
    #[default]
    Default,
    /// An explicitly configured model
    Custom(CharacterModelConfig),
}

impl From<bool> for CharacterModelOptions {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Default
        } else {
            Self::Disabled
        }
    }
}

impl From<CharacterModelConfig> for CharacterModelOptions {
    fn from(config: CharacterModelConfig) -> Self {
        Self::Custom(config)
    }
}

impl Serialize for CharacterModelOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Default => serializer.serialize_bool(true),
            Self::Custom(config) => config.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CharacterModelOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Config(CharacterModelConfig),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => Self::Disabled,
            Repr::Flag(true) => Self::Default,
            Repr::Config(config) => Self::Custom(config),
        })
    }
}

/// The exact parameter tuple a load request resolves to
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedModelParams {
    pub format: ModelFormat,
    pub url: String,
    pub bone_rotation_offset: Option<Quat>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl ResolvedModelParams {
    pub fn cache_key(&self) -> ModelCacheKey {
        ModelCacheKey::from(self)
    }
}

/// Value-equality cache key over the resolved parameter tuple
///
/// Quaternion components are compared by bit pattern, so two tuples share
/// an entry exactly when every field is bitwise identical.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelCacheKey {
    format: ModelFormat,
    url: String,
    rotation_bits: Option<[u32; 4]>,
    cast_shadow: bool,
    receive_shadow: bool,
}

impl From<&ResolvedModelParams> for ModelCacheKey {
    fn from(params: &ResolvedModelParams) -> Self {
        Self {
            format: params.format,
            url: params.url.clone(),
            rotation_bits: params
                .bone_rotation_offset
                .map(|q| q.to_array().map(f32::to_bits)),
            cast_shadow: params.cast_shadow,
            receive_shadow: params.receive_shadow,
        }
    }
}

/// Rotation offset of the built-in default model
///
/// 180 degrees about X then 90 degrees about Z (ZYX order), matching the
/// mannequin rig's authoring orientation.
pub fn default_bone_rotation_offset() -> Quat {
    Quat::from_euler(EulerRot::ZYX, FRAC_PI_2, 0.0, PI)
}

/// Resolve options into the exact parameter tuple, or None when disabled
pub async fn resolve_options(options: &CharacterModelOptions) -> Option<ResolvedModelParams> {
    match options {
        CharacterModelOptions::Disabled => None,
        CharacterModelOptions::Default => Some(default_model_params(true, true).await),
        CharacterModelOptions::Custom(config) => {
            let cast_shadow = config.cast_shadow.unwrap_or(true);
            let receive_shadow = config.receive_shadow.unwrap_or(true);
            match (config.format, config.url.as_ref()) {
                (Some(format), Some(url)) => Some(ResolvedModelParams {
                    format,
                    url: url.clone(),
                    bone_rotation_offset: config.bone_rotation_offset,
                    cast_shadow,
                    receive_shadow,
                }),
                // Without both a format and a URL the model identity falls
                // back to the default; resolved shadow flags are kept.
                _ => Some(default_model_params(cast_shadow, receive_shadow).await),
            }
        }
    }
}

async fn default_model_params(cast_shadow: bool, receive_shadow: bool) -> ResolvedModelParams {
    ResolvedModelParams {
        format: ModelFormat::Gltf,
        url: mannequin::default_model_url().await.to_string(),
        bone_rotation_offset: Some(default_bone_rotation_offset()),
        cast_shadow,
        receive_shadow,
    }
}
