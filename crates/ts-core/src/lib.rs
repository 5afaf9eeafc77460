//! Grid model, color keys, symbol mapping and text serialization for tileSketch.
//!
//! This crate contains every type shared across the tileSketch workspace.
//! It has no terminal or platform dependency.

pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod paint;
pub mod serializer;
pub mod symbol_map;

pub use color::{Color, normalize};
pub use config::SketchConfig;
pub use error::CoreError;
pub use export::{ExportOutcome, ExportSink};
pub use grid::GridBuffer;
pub use paint::{DragState, PaintController, PaintMode};
pub use serializer::serialize;
pub use symbol_map::{SymbolEntry, SymbolLookup, SymbolMap};
