//! Rasterization of scene draw lists.

/// Output frame type.
pub mod backend;
/// `vello_cpu` backend.
pub mod cpu;
/// Backend-agnostic draw list.
pub mod plan;
