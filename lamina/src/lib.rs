//! Lamina: a safe session layer over an immediate-mode layout engine.
//!
//! The engine (see `lamina-engine`) exposes a raw, trusting call surface:
//! begin a pass, open/configure/post/close elements in nested order, end the
//! pass and collect draw commands. This crate wraps that surface in a
//! [`Session`] that enforces the ordering at runtime, turns caller mistakes
//! into [`ProtocolError`]s before they can desynchronize the engine, and
//! routes engine faults through a configurable [`FaultPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use lamina::{Config, Session};
//! use lamina_engine::{Color, Dimensions, LayoutConfig, RectangleConfig, SoftwareEngine};
//!
//! # fn main() -> Result<(), lamina::LayoutError> {
//! let mut session = Session::new(SoftwareEngine::new(), Dimensions::new(800.0, 600.0));
//! session.begin_layout()?;
//! session.element(
//!     Some("root".into()),
//!     [
//!         Config::from(LayoutConfig::default()),
//!         Config::from(lamina_engine::ElementConfig::Rectangle(RectangleConfig {
//!             color: Color::rgb(0.1, 0.1, 0.1),
//!             ..Default::default()
//!         })),
//!     ],
//!     |_| Ok(()),
//! )?;
//! let commands = session.end_layout()?;
//! # let _ = commands;
//! # Ok(())
//! # }
//! ```

// Error taxonomy
pub mod error;

// Element keys and scope tokens
pub mod scope;

// The session controller
pub mod session;

pub use error::{LayoutError, ProtocolError};
pub use scope::{ElementKey, ElementScope};
pub use session::{Config, FaultPolicy, Session};

// Engine-boundary types callers need to build a tree
pub use lamina_engine::{
    BorderConfig, Color, Dimensions, ElementConfig, ElementId, EngineFault, FaultKind,
    LayoutConfig, LayoutDirection, Padding, RawEngine, RectangleConfig, RenderCommand,
    RenderCommandKind, Sizing, SizingAxis, SoftwareEngine, TextConfig, Vector2,
};
