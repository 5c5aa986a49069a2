//! Engine-reported faults.
//!
//! The engine has no way to return errors from individual protocol calls;
//! instead it invokes the fault handler registered at initialization. Faults
//! arrive during a layout pass and describe internal conditions (capacity
//! exhaustion, duplicate identities, missing text measurement) that the
//! caller decides how to surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an engine fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    ArenaCapacityExceeded,
    ElementsCapacityExceeded,
    TextMeasurementCapacityExceeded,
    DuplicateId,
    TextMeasurementFunctionNotProvided,
    FloatingContainerParentNotFound,
    InternalError,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ArenaCapacityExceeded => "arena capacity exceeded",
            Self::ElementsCapacityExceeded => "elements capacity exceeded",
            Self::TextMeasurementCapacityExceeded => "text measurement capacity exceeded",
            Self::DuplicateId => "duplicate id",
            Self::TextMeasurementFunctionNotProvided => "text measurement function not provided",
            Self::FloatingContainerParentNotFound => "floating container parent not found",
            Self::InternalError => "internal error",
        };
        f.write_str(name)
    }
}

/// One fault delivered through the registered handler.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct EngineFault {
    pub kind: FaultKind,
    pub message: String,
}

impl EngineFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Callback invoked by the engine when a fault occurs mid-pass.
pub type FaultHandler = Box<dyn FnMut(EngineFault)>;
