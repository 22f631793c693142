//! Surface material as described by a `.mtl` library.

use serde::{Deserialize, Serialize};
use physkit_math::DVec3;
use physkit_types::constants::{DEFAULT_ALPHA, DEFAULT_KA, DEFAULT_KD, DEFAULT_KS, DEFAULT_SHININESS};
use physkit_types::Scalar;

/// Phong material parameters.
///
/// `shininess` is stored in the internal `[0, 128]` range; the MTL
/// codec rescales it to the `Ns` wire range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub ka: DVec3,
    pub kd: DVec3,
    pub ks: DVec3,
    pub shininess: Scalar,
    pub alpha: Scalar,
    /// Texture file reference, already resolved against the MTL directory.
    pub texture: Option<String>,
}

impl Material {
    /// Creates a material with the `newmtl` defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ka: DVec3::from_array(DEFAULT_KA),
            kd: DVec3::from_array(DEFAULT_KD),
            ks: DVec3::from_array(DEFAULT_KS),
            shininess: DEFAULT_SHININESS,
            alpha: DEFAULT_ALPHA,
            texture: None,
        }
    }

    pub fn has_texture(&self) -> bool {
        self.texture.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(String::new())
    }
}
