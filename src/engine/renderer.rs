use anyhow::{anyhow, Result};
use glam::{Mat4, Vec3};

use crate::engine::resources::{DrawMode, Model, TextureHandle};
use crate::engine::scene::{Camera, NodeId, SceneError, SceneGraph};

/// Everything the GPU side needs to draw one geometry node.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub node: NodeId,
    pub name: String,
    pub model_matrix: Mat4,
    /// Keeps normals orthogonal to the surface in view space.
    pub normal_matrix: Mat4,
    pub color: Vec3,
    pub texture: Option<TextureHandle>,
    pub draw_mode: DrawMode,
    pub element_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniform {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Unlit line/point geometry drawn behind the scene graph (stars, orbits).
#[derive(Debug, Clone)]
pub struct BackdropLayer {
    pub label: String,
    pub model: Model,
    pub instances: Vec<Mat4>,
}

#[derive(Debug, Clone)]
pub struct BackdropDraw {
    pub label: String,
    pub model_matrix: Mat4,
    pub draw_mode: DrawMode,
    pub element_count: usize,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub view: Mat4,
    pub projection: Mat4,
    pub light: LightUniform,
    pub draw_calls: Vec<DrawCall>,
    pub backdrop: Vec<BackdropDraw>,
}

impl Frame {
    pub fn draw_call(&self, name: &str) -> Option<&DrawCall> {
        self.draw_calls.iter().find(|call| call.name == name)
    }
}

/// Headless render driver: resolves camera, light and per-node matrices from a
/// scene graph whose world transforms are already up to date.
#[derive(Debug)]
pub struct Renderer {
    frame_count: u64,
    camera: String,
    light_holder: String,
    light: String,
    backdrop: Vec<BackdropLayer>,
}

impl Renderer {
    /// `camera` is looked up among the root's children, the light as
    /// `root / light_holder / light`.
    pub fn new(
        camera: impl Into<String>,
        light_holder: impl Into<String>,
        light: impl Into<String>,
    ) -> Self {
        Self {
            frame_count: 0,
            camera: camera.into(),
            light_holder: light_holder.into(),
            light: light.into(),
            backdrop: Vec::new(),
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn add_backdrop(&mut self, layer: BackdropLayer) {
        tracing::debug!(label = %layer.label, vertices = layer.model.vertex_count(), "adding backdrop layer");
        self.backdrop.push(layer);
    }

    pub fn render(&mut self, scene: &SceneGraph) -> Result<Frame> {
        self.begin_frame();
        let root = scene.root().ok_or(SceneError::NoRoot)?;

        let (view, projection) = self.resolve_camera(scene, root)?;
        let light = self.resolve_light(scene, root)?;

        let mut draw_calls = Vec::new();
        for id in scene.descendants(root) {
            let Some(node) = scene.node(id) else {
                continue;
            };
            let Some(geometry) = node.as_geometry() else {
                continue;
            };
            let model_matrix = node.world_transform();
            let call = DrawCall {
                node: id,
                name: node.name().to_string(),
                model_matrix,
                normal_matrix: (view * model_matrix).inverse().transpose(),
                color: geometry.color(),
                texture: geometry.texture().and_then(|texture| texture.handle()),
                draw_mode: geometry.model().draw_mode,
                element_count: geometry.model().element_count(),
            };
            tracing::trace!(frame = self.frame_count, name = %call.name, "draw call");
            draw_calls.push(call);
        }

        let backdrop = self
            .backdrop
            .iter()
            .flat_map(|layer| {
                layer.instances.iter().map(|&model_matrix| BackdropDraw {
                    label: layer.label.clone(),
                    model_matrix,
                    draw_mode: layer.model.draw_mode,
                    element_count: layer.model.element_count(),
                })
            })
            .collect();

        let frame = Frame {
            index: self.frame_count,
            view,
            projection,
            light,
            draw_calls,
            backdrop,
        };
        self.end_frame();
        Ok(frame)
    }

    fn resolve_camera(&self, scene: &SceneGraph, root: NodeId) -> Result<(Mat4, Mat4)> {
        let node = scene
            .get_child(root, &self.camera)
            .and_then(|id| scene.node(id))
            .ok_or_else(|| anyhow!("camera `{}` not found under the root", self.camera))?;
        let camera = node
            .as_camera()
            .ok_or_else(|| anyhow!("`{}` is a {}, not a camera", node.name(), node.kind().label()))?;
        if !camera.is_enabled() {
            tracing::warn!(camera = %self.camera, "camera disabled, rendering with identity view");
            return Ok((Mat4::IDENTITY, camera.projection()));
        }
        Ok((Camera::view_matrix(node.world_transform()), camera.projection()))
    }

    fn resolve_light(&self, scene: &SceneGraph, root: NodeId) -> Result<LightUniform> {
        let node = scene
            .get_child(root, &self.light_holder)
            .and_then(|holder| scene.get_child(holder, &self.light))
            .and_then(|id| scene.node(id))
            .ok_or_else(|| anyhow!("light `{}/{}` not found under the root", self.light_holder, self.light))?;
        let light = node
            .as_point_light()
            .ok_or_else(|| anyhow!("`{}` is a {}, not a point light", node.name(), node.kind().label()))?;

        let (color, intensity) = light.configured(node.path())?;

        Ok(LightUniform {
            position: node.world_transform().transform_point3(Vec3::ZERO),
            color,
            intensity,
        })
    }

    fn begin_frame(&mut self) {
        tracing::trace!(frame = self.frame_count, "begin frame");
    }

    fn end_frame(&mut self) {
        self.frame_count += 1;
        tracing::trace!(frame = self.frame_count, "end frame");
    }
}
