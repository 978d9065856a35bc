//! Surface materials.

use rayscene_math::Vec3;
use serde::{Deserialize, Serialize};

/// Diffuse-only material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lambert {
    /// Diffuse color.
    pub diffuse: Vec3,
}

impl Default for Lambert {
    fn default() -> Self {
        Self {
            diffuse: Vec3::repeat(0.75),
        }
    }
}

/// Diffuse plus glossy material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phong {
    /// Diffuse color.
    pub diffuse: Vec3,
    /// Specular color.
    pub specular: Vec3,
    /// Specular exponent.
    pub exponent: f64,
    /// Mirror reflection color.
    pub reflection: Vec3,
    /// Use the reflected direction instead of the half vector.
    pub use_reflected: bool,
}

impl Default for Phong {
    fn default() -> Self {
        Self {
            diffuse: Vec3::repeat(0.75),
            specular: Vec3::repeat(0.25),
            exponent: 10.0,
            reflection: Vec3::zeros(),
            use_reflected: false,
        }
    }
}

/// Material referenced by primitives through a [`MaterialId`](crate::MaterialId).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    /// Lambertian.
    Lambert(Lambert),
    /// Phong.
    Phong(Phong),
}

impl Material {
    /// Diffuse albedo.
    pub fn diffuse(&self) -> Vec3 {
        match self {
            Material::Lambert(m) => m.diffuse,
            Material::Phong(m) => m.diffuse,
        }
    }
}

impl From<Lambert> for Material {
    fn from(m: Lambert) -> Self {
        Material::Lambert(m)
    }
}

impl From<Phong> for Material {
    fn from(m: Phong) -> Self {
        Material::Phong(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Material::from(Lambert::default()).diffuse(), Vec3::repeat(0.75));
        let phong = Phong::default();
        assert_eq!(phong.exponent, 10.0);
        assert_eq!(Material::from(phong).diffuse(), Vec3::repeat(0.75));
    }
}
