//! The ordered object store and everything that builds or reorders it.

pub mod factory;
pub mod guides;
pub mod layers;
pub mod model;
pub mod object;
