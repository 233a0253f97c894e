#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod error;
pub mod file_handler;
pub mod input;
pub mod panels;
pub mod session;
pub mod settings;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::PaintApp;
pub use error::{PaintError, PaintResult};
pub use input::{PointerEvent, PointerKind, Position};
pub use session::{PointerState, ToolSession};
pub use settings::CanvasSettings;
pub use surface::{
    CompositeMode, ImageSurface, LineCap, PaintState, Primitive, RasterSurface, RecordingSurface,
};
pub use tools::{Tool, ToolEvent, ToolKind, ToolName};
