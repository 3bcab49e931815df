//! Interactive session on top of a [`Scene`](crate::Scene).

/// Style setters gated on the selection being text.
pub mod binding;
/// Modes, selection, text editing, notices, and the live viewport.
pub mod session;
