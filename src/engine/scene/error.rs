//! Error types for scene graph mutation and lookup.

use thiserror::Error;

use super::arena::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No direct child with the requested name.
    #[error("no child named `{name}`")]
    NotFound { name: String },

    /// The handle refers to a node that was destroyed or never existed.
    #[error("node {0} is not alive in this scene graph")]
    StaleNode(NodeId),

    #[error("cannot attach `{node}`: {reason}")]
    InvalidReparent { node: String, reason: &'static str },

    #[error("`{parent}` already has a child named `{name}`")]
    DuplicateName { parent: String, name: String },

    /// A point light attribute was read before the driver configured it.
    #[error("point light `{node}` {attribute} read before it was set")]
    UninitializedAttribute { node: String, attribute: &'static str },

    #[error("scene graph has no root")]
    NoRoot,
}

pub type SceneResult<T> = std::result::Result<T, SceneError>;
