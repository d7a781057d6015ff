pub mod config;
pub mod engine;
pub mod solar;

pub use engine::scene::{Node, NodeId, NodeKind, SceneError, SceneGraph, SceneResult};
