/// Geometry re-exports, canvas size, and colors.
pub mod core;
/// `InkplateError` and the validation/upload taxonomy.
pub mod error;
/// Editor configuration.
pub mod config;
