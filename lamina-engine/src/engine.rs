//! The raw engine contract.
//!
//! [`RawEngine`] is the surface a layout session drives 1:1: per-pass
//! boundaries, the open/post/close element stack, configuration sinks, and
//! the identity hashing facility. Implementations own all layout semantics;
//! callers own sequencing.
//!
//! The arena is the engine's only memory: a single pre-allocated zeroed
//! block whose lifetime the caller controls. Engines size it via
//! [`RawEngine::min_memory_size`] and receive it through
//! [`RawEngine::create_arena`] before initialization.

use crate::config::{ElementConfig, LayoutConfig, TextConfig};
use crate::fault::FaultHandler;
use crate::id::ElementId;
use crate::primitives::{Dimensions, Vector2};
use crate::render::RenderCommand;

/// A pre-allocated zeroed memory block owned by the engine for the lifetime
/// of a session. Dropping the session frees it; no raw pointers escape.
pub struct Arena {
    block: Box<[u8]>,
}

impl Arena {
    /// Allocate a zeroed block of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            block: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.block.len()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.block.len())
            .finish()
    }
}

/// Callback the engine invokes synchronously during layout to measure text.
///
/// Mandatory before any pass that contains text nodes.
pub type MeasureTextFn = Box<dyn FnMut(&str, &TextConfig) -> Dimensions>;

/// The protocol surface of a layout engine.
///
/// Call ordering is the caller's responsibility: `create_arena` then
/// `initialize` once, then per pass `begin_layout`, a balanced sequence of
/// element operations, and `end_layout`. Engines do not defend against
/// misordered calls; the session layer above enforces the state machine.
pub trait RawEngine {
    /// Bytes required for the internal arena before creation.
    fn min_memory_size(&self) -> usize;

    /// Hand the engine its arena. Must precede `initialize`.
    fn create_arena(&mut self, arena: Arena);

    /// One-time setup: viewport dimensions and the fault handler invoked on
    /// internal faults during layout passes.
    fn initialize(&mut self, viewport: Dimensions, fault_handler: FaultHandler);

    /// Register the text measurement callback.
    fn set_measure_text(&mut self, measure: MeasureTextFn);

    /// Update viewport dimensions between passes.
    fn set_viewport(&mut self, viewport: Dimensions);

    /// Forward the pointer position and press state for the coming pass.
    /// The engine only records it; hit-testing stays internal.
    fn pointer_state(&mut self, position: Vector2, down: bool);

    /// Clear per-frame state and start a new pass.
    fn begin_layout(&mut self);

    /// Finalize the pass and produce the draw command sequence.
    fn end_layout(&mut self) -> Vec<RenderCommand>;

    /// Push a new element onto the open-element stack.
    fn open_element(&mut self);

    /// Signal that configuration for the just-opened element is complete.
    fn post_configuration(&mut self);

    /// Pop the innermost element off the open-element stack.
    fn close_element(&mut self);

    /// Compute a stable identity from a key, offset, and parent seed.
    /// The hashing scheme is owned by the engine.
    fn hash_string(&self, key: &str, offset: u32, seed: u32) -> ElementId;

    /// Attach an identity to the currently open element.
    fn attach_id(&mut self, id: ElementId);

    /// Attach the sizing/arrangement configuration to the open element.
    fn attach_layout_config(&mut self, config: LayoutConfig);

    /// Attach one visual/behavioral payload to the open element.
    fn attach_element_config(&mut self, config: ElementConfig);

    /// Identity of the innermost open element, 0 at the root.
    fn parent_element_id(&self) -> u32;

    /// Open, configure, and close a text leaf in a single operation.
    fn open_text_element(&mut self, text: &str, config: TextConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_is_zeroed() {
        let arena = Arena::with_capacity(64);
        assert_eq!(arena.capacity(), 64);
        assert!(arena.block.iter().all(|&b| b == 0));
    }

    #[test]
    fn arena_debug_hides_contents() {
        let arena = Arena::with_capacity(16);
        let repr = format!("{arena:?}");
        assert!(repr.contains("capacity"));
        assert!(repr.contains("16"));
    }
}
