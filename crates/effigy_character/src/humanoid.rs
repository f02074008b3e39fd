//! VRM humanoid bone mapping
//!
//! Bone names follow the VRM 1.0 specification; the 0.x importer
//! normalizes its thumb naming onto this set before lookup.

use std::collections::HashMap;

/// VRM humanoid bone names (VRM 1.0 set)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HumanBoneName {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftEye,
    RightEye,
    Jaw,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
    LeftThumbMetacarpal,
    LeftThumbProximal,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbMetacarpal,
    RightThumbProximal,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
}

impl HumanBoneName {
    /// The camelCase name used in VRM humanoid tables
    pub fn name(self) -> &'static str {
        match self {
            Self::Hips => "hips",
            Self::Spine => "spine",
            Self::Chest => "chest",
            Self::UpperChest => "upperChest",
            Self::Neck => "neck",
            Self::Head => "head",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::Jaw => "jaw",
            Self::LeftShoulder => "leftShoulder",
            Self::LeftUpperArm => "leftUpperArm",
            Self::LeftLowerArm => "leftLowerArm",
            Self::LeftHand => "leftHand",
            Self::RightShoulder => "rightShoulder",
            Self::RightUpperArm => "rightUpperArm",
            Self::RightLowerArm => "rightLowerArm",
            Self::RightHand => "rightHand",
            Self::LeftUpperLeg => "leftUpperLeg",
            Self::LeftLowerLeg => "leftLowerLeg",
            Self::LeftFoot => "leftFoot",
            Self::LeftToes => "leftToes",
            Self::RightUpperLeg => "rightUpperLeg",
            Self::RightLowerLeg => "rightLowerLeg",
            Self::RightFoot => "rightFoot",
            Self::RightToes => "rightToes",
            Self::LeftThumbMetacarpal => "leftThumbMetacarpal",
            Self::LeftThumbProximal => "leftThumbProximal",
            Self::LeftThumbDistal => "leftThumbDistal",
            Self::LeftIndexProximal => "leftIndexProximal",
            Self::LeftIndexIntermediate => "leftIndexIntermediate",
            Self::LeftIndexDistal => "leftIndexDistal",
            Self::LeftMiddleProximal => "leftMiddleProximal",
            Self::LeftMiddleIntermediate => "leftMiddleIntermediate",
            Self::LeftMiddleDistal => "leftMiddleDistal",
            Self::LeftRingProximal => "leftRingProximal",
            Self::LeftRingIntermediate => "leftRingIntermediate",
            Self::LeftRingDistal => "leftRingDistal",
            Self::LeftLittleProximal => "leftLittleProximal",
            Self::LeftLittleIntermediate => "leftLittleIntermediate",
            Self::LeftLittleDistal => "leftLittleDistal",
            Self::RightThumbMetacarpal => "rightThumbMetacarpal",
            Self::RightThumbProximal => "rightThumbProximal",
            Self::RightThumbDistal => "rightThumbDistal",
            Self::RightIndexProximal => "rightIndexProximal",
            Self::RightIndexIntermediate => "rightIndexIntermediate",
            Self::RightIndexDistal => "rightIndexDistal",
            Self::RightMiddleProximal => "rightMiddleProximal",
            Self::RightMiddleIntermediate => "rightMiddleIntermediate",
            Self::RightMiddleDistal => "rightMiddleDistal",
            Self::RightRingProximal => "rightRingProximal",
            Self::RightRingIntermediate => "rightRingIntermediate",
            Self::RightRingDistal => "rightRingDistal",
            Self::RightLittleProximal => "rightLittleProximal",
            Self::RightLittleIntermediate => "rightLittleIntermediate",
            Self::RightLittleDistal => "rightLittleDistal",
        }
    }

    /// Parse a VRM 1.0 bone name
    pub fn from_name(name: &str) -> Option<Self> {
        let bone = match name {
            "hips" => Self::Hips,
            "spine" => Self::Spine,
            "chest" => Self::Chest,
            "upperChest" => Self::UpperChest,
            "neck" => Self::Neck,
            "head" => Self::Head,
            "leftEye" => Self::LeftEye,
            "rightEye" => Self::RightEye,
            "jaw" => Self::Jaw,
            "leftShoulder" => Self::LeftShoulder,
            "leftUpperArm" => Self::LeftUpperArm,
            "leftLowerArm" => Self::LeftLowerArm,
            "leftHand" => Self::LeftHand,
            "rightShoulder" => Self::RightShoulder,
            "rightUpperArm" => Self::RightUpperArm,
            "rightLowerArm" => Self::RightLowerArm,
            "rightHand" => Self::RightHand,
            "leftUpperLeg" => Self::LeftUpperLeg,
            "leftLowerLeg" => Self::LeftLowerLeg,
            "leftFoot" => Self::LeftFoot,
            "leftToes" => Self::LeftToes,
            "rightUpperLeg" => Self::RightUpperLeg,
            "rightLowerLeg" => Self::RightLowerLeg,
            "rightFoot" => Self::RightFoot,
            "rightToes" => Self::RightToes,
            "leftThumbMetacarpal" => Self::LeftThumbMetacarpal,
            "leftThumbProximal" => Self::LeftThumbProximal,
            "leftThumbDistal" => Self::LeftThumbDistal,
            "leftIndexProximal" => Self::LeftIndexProximal,
            "leftIndexIntermediate" => Self::LeftIndexIntermediate,
            "leftIndexDistal" => Self::LeftIndexDistal,
            "leftMiddleProximal" => Self::LeftMiddleProximal,
            "leftMiddleIntermediate" => Self::LeftMiddleIntermediate,
            "leftMiddleDistal" => Self::LeftMiddleDistal,
            "leftRingProximal" => Self::LeftRingProximal,
            "leftRingIntermediate" => Self::LeftRingIntermediate,
            "leftRingDistal" => Self::LeftRingDistal,
            "leftLittleProximal" => Self::LeftLittleProximal,
            "leftLittleIntermediate" => Self::LeftLittleIntermediate,
            "leftLittleDistal" => Self::LeftLittleDistal,
            "rightThumbMetacarpal" => Self::RightThumbMetacarpal,
            "rightThumbProximal" => Self::RightThumbProximal,
            "rightThumbDistal" => Self::RightThumbDistal,
            "rightIndexProximal" => Self::RightIndexProximal,
            "rightIndexIntermediate" => Self::RightIndexIntermediate,
            "rightIndexDistal" => Self::RightIndexDistal,
            "rightMiddleProximal" => Self::RightMiddleProximal,
            "rightMiddleIntermediate" => Self::RightMiddleIntermediate,
            "rightMiddleDistal" => Self::RightMiddleDistal,
            "rightRingProximal" => Self::RightRingProximal,
            "rightRingIntermediate" => Self::RightRingIntermediate,
            "rightRingDistal" => Self::RightRingDistal,
            "rightLittleProximal" => Self::RightLittleProximal,
            "rightLittleIntermediate" => Self::RightLittleIntermediate,
            "rightLittleDistal" => Self::RightLittleDistal,
            _ => return None,
        };
        Some(bone)
    }
}

/// Humanoid bone table mapping VRM bones to scene node indices
#[derive(Clone, Debug, Default)]
pub struct HumanoidMap {
    bones: HashMap<HumanBoneName, usize>,
}

impl HumanoidMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bone: HumanBoneName, node: usize) {
        self.bones.insert(bone, node);
    }

    /// Scene node index of a humanoid bone
    pub fn node(&self, bone: HumanBoneName) -> Option<usize> {
        self.bones.get(&bone).copied()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HumanBoneName, usize)> + '_ {
        self.bones.iter().map(|(bone, node)| (*bone, *node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for bone in [
            HumanBoneName::Hips,
            HumanBoneName::UpperChest,
            HumanBoneName::LeftThumbMetacarpal,
            HumanBoneName::RightLittleDistal,
        ] {
            assert_eq!(HumanBoneName::from_name(bone.name()), Some(bone));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(HumanBoneName::from_name("tail"), None);
        // VRM 0.x thumb naming is not part of the 1.0 set
        assert_eq!(HumanBoneName::from_name("leftThumbIntermediate"), None);
    }

    #[test]
    fn test_map_lookup() {
        let mut map = HumanoidMap::new();
        map.insert(HumanBoneName::Hips, 3);
        assert_eq!(map.node(HumanBoneName::Hips), Some(3));
        assert_eq!(map.node(HumanBoneName::Head), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iter_yields_every_bone() {
        let mut map = HumanoidMap::new();
        map.insert(HumanBoneName::Hips, 3);
        map.insert(HumanBoneName::Head, 7);

        let entries: HashMap<HumanBoneName, usize> = map.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[&HumanBoneName::Hips], 3);
        assert_eq!(entries[&HumanBoneName::Head], 7);
    }
}
