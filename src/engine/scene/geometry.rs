use glam::Vec3;

use crate::engine::resources::{Model, Texture};

/// Renderable payload: a mesh owned by value plus its material inputs.
#[derive(Debug, Clone)]
pub struct Geometry {
    model: Model,
    color: Vec3,
    texture: Option<Texture>,
}

impl Geometry {
    pub fn new(model: Model, color: Vec3) -> Self {
        Self {
            model,
            color,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn texture_mut(&mut self) -> Option<&mut Texture> {
        self.texture.as_mut()
    }

    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }
}
