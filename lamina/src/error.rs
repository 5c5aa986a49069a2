//! Session error types.
//!
//! Protocol errors are caller mistakes (misordered calls) and are returned
//! eagerly from the call that violated the invariant; continuing after one
//! would desynchronize the session from the engine's internal stack.
//! Engine faults arrive through the fault handler during a pass and are
//! surfaced according to the session's fault policy.

use lamina_engine::{ElementConfigKind, EngineFault};
use thiserror::Error;

/// A usage error: the caller violated the element-tree protocol.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("unbalanced scope: {0}")]
    UnbalancedScope(&'static str),

    #[error("unsupported config kind: {0}")]
    UnsupportedConfig(ElementConfigKind),
}

/// Any failure a layout pass can end with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("engine fault: {0}")]
    Engine(EngineFault),
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_engine::FaultKind;

    #[test]
    fn protocol_error_messages_are_lowercase() {
        let err = ProtocolError::InvalidState("a layout pass is already open");
        assert_eq!(err.to_string(), "invalid state: a layout pass is already open");
    }

    #[test]
    fn layout_error_wraps_both_taxonomies() {
        let protocol: LayoutError = ProtocolError::UnbalancedScope("x").into();
        assert!(matches!(protocol, LayoutError::Protocol(_)));

        let engine = LayoutError::Engine(EngineFault::new(FaultKind::DuplicateId, "dup"));
        assert_eq!(engine.to_string(), "engine fault: duplicate id: dup");
    }
}
