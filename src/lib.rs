//! Inkplate is a print-template design canvas.
//!
//! A session composes uploaded images, editable text, and primitive shapes inside a fixed print
//! area, then flattens the result to a PNG for manufacturing:
//!
//! - Build an [`Editor`] from an [`EditorConfig`]
//! - Add and arrange objects, edit text in place, apply layer ops
//! - Upload images through an [`UploadGateway`] and [`save_design`] to hand the export to a cart
#![forbid(unsafe_code)]

pub mod assets;
pub mod editor;
pub mod foundation;
pub mod io;
pub mod render;
pub mod scene;
pub mod script;

pub use crate::assets::bitmap::{Bitmap, BitmapId, decode_bitmap};
pub use crate::assets::fonts::{FontFace, FontLibrary};
pub use crate::editor::session::{BusyFlag, BusyGuard, Editor, EditorMode, Notice};
pub use crate::foundation::config::{DEFAULT_MAX_UPLOAD_BYTES, EditorConfig};
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{InkplateError, InkplateResult, UploadError, ValidationError};
pub use crate::io::collab::{
    AssetFetcher, AuthProvider, CartSink, Clock, CustomLineItem, Session, StorageBackend,
    StorageError, SystemClock,
};
pub use crate::io::export::{ExportArtifact, FlattenedDesign, export, flatten, save_design};
pub use crate::io::fs::FsStorage;
pub use crate::io::gateway::{
    UploadFile, UploadGateway, UploadPolicy, UploadedAsset, validate_upload,
};
pub use crate::io::ingest::{IngestedImage, ingest_image, upload_image_into};
pub use crate::io::memory::{FixedClock, MemoryCart, MemoryStorage, StaticAuth, StoredObject};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuBackend;
pub use crate::render::plan::{DrawOp, RenderPlan};
pub use crate::scene::factory::{ObjectFactory, ToolDefaults};
pub use crate::scene::guides::Guides;
pub use crate::scene::layers::LayerOp;
pub use crate::scene::model::Scene;
pub use crate::scene::object::{
    FontWeight, ImageObject, NodeId, ObjectKind, ObjectPayload, SceneObject, ShapeKind,
    ShapeObject, TextObject, TextStyle,
};
pub use crate::script::{DesignScript, ImageSource, ScriptReport, ScriptStep, run_script};
