use glam::Vec3;

use super::error::{SceneError, SceneResult};

/// Omnidirectional light payload.
///
/// There is no safe default for colour or intensity: both stay unset until the
/// driver configures them, and reading them through [`PointLight::configured`]
/// earlier is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLight {
    color: Option<Vec3>,
    intensity: Option<f32>,
}

impl PointLight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> Option<Vec3> {
        self.color
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = Some(color);
    }

    pub fn intensity(&self) -> Option<f32> {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = Some(intensity);
    }

    pub fn is_configured(&self) -> bool {
        self.color.is_some() && self.intensity.is_some()
    }

    /// Colour and intensity of the light held by `node`, or the first
    /// attribute still unset.
    pub fn configured(&self, node: &str) -> SceneResult<(Vec3, f32)> {
        let missing = |attribute| SceneError::UninitializedAttribute {
            node: node.to_string(),
            attribute,
        };
        let color = self.color.ok_or_else(|| missing("colour"))?;
        let intensity = self.intensity.ok_or_else(|| missing("intensity"))?;
        Ok((color, intensity))
    }
}
