use glam::Mat4;

use super::arena::NodeId;
use super::camera::Camera;
use super::geometry::Geometry;
use super::light::PointLight;

/// Payload carried by a node. Generic nodes are plain holders used as named
/// attachment points.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Generic,
    Camera(Camera),
    Geometry(Geometry),
    PointLight(PointLight),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Generic => "node",
            NodeKind::Camera(_) => "camera",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::PointLight(_) => "point_light",
        }
    }
}

/// One element of the scene hierarchy.
///
/// Structural fields (`path`, `depth`, `parent`, `children`) are maintained by
/// [`SceneGraph`](super::SceneGraph); a freshly constructed node is detached
/// with identity transforms.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    pub(super) path: String,
    pub(super) depth: u32,
    local_transform: Mat4,
    pub(super) world_transform: Mat4,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Generic)
    }

    pub fn camera(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Camera(Camera::default()))
    }

    pub fn geometry(name: impl Into<String>, geometry: Geometry) -> Self {
        Self::with_kind(name, NodeKind::Geometry(geometry))
    }

    pub fn point_light(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::PointLight(PointLight::default()))
    }

    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        let name = name.into();
        Self {
            path: root_path(&name),
            name,
            depth: 0,
            local_transform: Mat4::IDENTITY,
            world_transform: Mat4::IDENTITY,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    pub fn with_local_transform(mut self, transform: Mat4) -> Self {
        self.local_transform = transform;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-delimited chain of ancestor names ending in this node's name.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    pub fn set_local_transform(&mut self, transform: Mat4) {
        self.local_transform = transform;
    }

    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    /// Overwrite the cached world transform. Descendants are untouched until
    /// the next [`SceneGraph::update_world_transforms`](super::SceneGraph::update_world_transforms).
    pub fn set_world_transform(&mut self, transform: Mat4) {
        self.world_transform = transform;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn as_geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            NodeKind::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn as_point_light(&self) -> Option<&PointLight> {
        match &self.kind {
            NodeKind::PointLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_point_light_mut(&mut self) -> Option<&mut PointLight> {
        match &mut self.kind {
            NodeKind::PointLight(light) => Some(light),
            _ => None,
        }
    }
}

pub(super) fn root_path(name: &str) -> String {
    format!("{}{}", super::PATH_SEPARATOR, name)
}
