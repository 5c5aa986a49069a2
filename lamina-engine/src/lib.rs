//! Lamina engine boundary: the raw contract a layout session drives.
//!
//! This crate defines the data that crosses the engine boundary and the
//! [`RawEngine`] trait that mirrors the engine's call surface 1:1:
//! per-pass begin/end, the open/post/close element stack, the two
//! configuration sinks, the identity hashing facility, and the fault
//! handler registered at initialization.
//!
//! It also ships [`SoftwareEngine`], a small in-process implementation of
//! the contract so sessions can run headless and tests can observe real
//! command output. Production layout semantics live behind the trait, not
//! here.
//!
//! # Usage
//!
//! Engines are driven through a session layer that owns call sequencing:
//!
//! ```ignore
//! use lamina::Session;
//! use lamina_engine::{Dimensions, SoftwareEngine};
//!
//! let mut session = Session::new(SoftwareEngine::new(), Dimensions::new(800.0, 600.0));
//! ```

// Core primitives
pub mod primitives;

// Element identity and hashing
pub mod id;

// Configuration families
pub mod config;

// Draw command output
pub mod render;

// Engine faults
pub mod fault;

// The raw engine contract and arena resource
pub mod engine;

// Headless reference implementation
pub mod software;

// Re-export core types
pub use primitives::{BoundingBox, Color, Dimensions, Vector2};
pub use id::{ElementId, hash_element_key, hash_ordinal};
pub use config::{
    AlignX, AlignY, BorderConfig, BorderWidth, ChildAlignment, ClipConfig, CornerRadius,
    CustomConfig, ElementConfig, ElementConfigKind, FloatingAttachTo, FloatingConfig, ImageConfig,
    LayoutConfig, LayoutDirection, Padding, RectangleConfig, Sizing, SizingAxis, TextConfig,
};
pub use render::{RenderCommand, RenderCommandKind, RenderData};
pub use fault::{EngineFault, FaultHandler, FaultKind};
pub use engine::{Arena, MeasureTextFn, RawEngine};
pub use software::SoftwareEngine;
