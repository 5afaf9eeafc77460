//! TUI rendering module for tileSketch.
//!
//! Provides grid canvas rendering, screen layout and hit testing, and the
//! sidebar / overlay widgets.
pub mod canvas;
pub mod layout;
pub mod ui;
pub mod widgets;
