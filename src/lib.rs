//! TagCanvas - annotation canvas engine
//!
//! Keeps tagged regions on media assets in sync between a drawing surface and
//! persistent storage, and drives the review lifecycle of each asset.
//!
//! Hosts provide a [`surface::DrawingSurface`], an
//! [`persistence::AssetPersistence`] backend and a [`clipboard::Clipboard`],
//! then drive an [`session::EditorSession`].

pub mod autosave;
pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod keybindings;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod prediction;
pub mod session;
pub mod store;
pub mod surface;
pub mod tags;
pub mod toolbar;
pub mod transform;

pub use canvas::{AnnotationCanvas, Canvas, CanvasEvent, CanvasKind, CanvasOptions, PixelCanvas};
pub use config::EngineConfig;
pub use context::EditingContext;
pub use error::{EngineError, EngineResult, ErrorCode};
pub use session::{EditorSession, ServiceTicket, ToolbarOutcome};

/// Version written into stored metadata and projects.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
