use std::collections::HashMap;
use std::f32::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::engine::scene::{NodeId, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    Triangles,
}

/// CPU-side mesh description: interleaved vertex floats plus optional indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    /// Floats per vertex.
    pub stride: usize,
    pub draw_mode: DrawMode,
}

impl Model {
    /// Unit sphere with interleaved position and normal (stride 6), drawn as
    /// indexed triangles.
    pub fn uv_sphere(stacks: u32, sectors: u32) -> Self {
        let stacks = stacks.max(2);
        let sectors = sectors.max(3);

        let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1) * 6) as usize);
        for i in 0..=stacks {
            let phi = PI * i as f32 / stacks as f32;
            for j in 0..=sectors {
                let theta = 2.0 * PI * j as f32 / sectors as f32;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                // unit sphere: position == normal
                vertices.extend_from_slice(&[normal.x, normal.y, normal.z]);
                vertices.extend_from_slice(&[normal.x, normal.y, normal.z]);
            }
        }

        let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
        for i in 0..stacks {
            for j in 0..sectors {
                let a = i * (sectors + 1) + j;
                let b = a + sectors + 1;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Self {
            vertices,
            indices,
            stride: 6,
            draw_mode: DrawMode::Triangles,
        }
    }

    /// Non-indexed vertex list.
    pub fn from_vertices(vertices: Vec<f32>, stride: usize, draw_mode: DrawMode) -> Self {
        Self {
            vertices,
            indices: Vec::new(),
            stride: stride.max(1),
            draw_mode,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride
    }

    /// Elements a draw call submits: indices when present, vertices otherwise.
    pub fn element_count(&self) -> usize {
        if self.indices.is_empty() {
            self.vertex_count()
        } else {
            self.indices.len()
        }
    }
}

/// Handle of a texture once it has been handed to the GPU side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// RGBA pixel buffer plus the handle derived from it on upload.
#[derive(Debug, Clone)]
pub struct Texture {
    key: String,
    pixels: RgbaImage,
    handle: Option<TextureHandle>,
}

impl Texture {
    pub fn new(key: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            key: key.into(),
            pixels,
            handle: None,
        }
    }

    /// 1x1 texture of a single colour (components in `0.0..=1.0`). The key is
    /// derived from the quantised colour, so equal colours share a handle.
    pub fn solid(color: Vec3) -> Self {
        let [r, g, b] = color.clamp(Vec3::ZERO, Vec3::ONE).to_array().map(|c| (c * 255.0).round() as u8);
        Self::new(format!("solid:{r},{g},{b}"), RgbaImage::from_pixel(1, 1, Rgba([r, g, b, 255])))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: TextureHandle) {
        self.handle = Some(handle);
    }
}

/// Hands out texture handles, shared between textures with the same key.
#[derive(Default, Debug)]
pub struct ResourceManager {
    textures: HashMap<String, TextureHandle>,
    next_handle: u32,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_texture(&self, path: impl AsRef<Path>) -> Result<Texture> {
        let path = path.as_ref();
        let pixels = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8();
        tracing::debug!(path = %path.display(), width = pixels.width(), height = pixels.height(), "loaded texture");
        Ok(Texture::new(path.display().to_string(), pixels))
    }

    /// Return the handle registered for `key`, allocating one on first use.
    pub fn register_texture(&mut self, key: impl Into<String>) -> TextureHandle {
        let key = key.into();
        if let Some(&handle) = self.textures.get(&key) {
            return handle;
        }
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        tracing::debug!(%key, handle = handle.0, "registering texture");
        self.textures.insert(key, handle);
        handle
    }

    /// Give every geometry texture in `scene` that has no handle yet its
    /// derived handle. Returns the number of textures updated.
    pub fn upload_textures(&mut self, scene: &mut SceneGraph) -> usize {
        let ids: Vec<NodeId> = scene.iter().map(|(id, _)| id).collect();
        let mut uploaded = 0;
        for id in ids {
            let Some(texture) = scene
                .node_mut(id)
                .and_then(|node| node.as_geometry_mut())
                .and_then(|geometry| geometry.texture_mut())
            else {
                continue;
            };
            if texture.handle().is_some() {
                continue;
            }
            let handle = self.register_texture(texture.key());
            texture.set_handle(handle);
            uploaded += 1;
        }
        uploaded
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
