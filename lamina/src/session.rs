//! The layout session controller.
//!
//! A [`Session`] owns one engine and sequences the begin/build/end protocol
//! against it: at most one layout pass open at a time, elements opened and
//! closed in strictly nested order, configuration attached only between
//! open and post. The engine trusts this ordering; the session is the layer
//! that enforces it and fails loudly when the caller gets it wrong.
//!
//! Engine faults reported during a pass are collected through the handler
//! registered at initialization and surfaced at `end_layout` according to
//! the session's [`FaultPolicy`].

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use lamina_engine::{
    Arena, Dimensions, ElementConfig, ElementConfigKind, EngineFault, LayoutConfig, RawEngine,
    RenderCommand, TextConfig, Vector2,
};

use crate::error::{LayoutError, ProtocolError};
use crate::scope::{ElementKey, ElementScope, ElementState};

/// One configuration payload of either family.
///
/// Layout and element configs travel through different engine entry points;
/// this sum exists so callers can pass a mixed batch to [`Session::element`]
/// or [`Session::configure`] and have the session dispatch each one.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Config {
    Layout(LayoutConfig),
    Element(ElementConfig),
}

impl From<LayoutConfig> for Config {
    fn from(config: LayoutConfig) -> Self {
        Self::Layout(config)
    }
}

impl From<ElementConfig> for Config {
    fn from(config: ElementConfig) -> Self {
        Self::Element(config)
    }
}

/// How engine faults surface at `end_layout`.
pub enum FaultPolicy {
    /// First fault turns the pass result into an error. Default.
    Fail,
    /// Log each fault at warn level and let the pass succeed.
    Log,
    /// Accumulate faults for [`Session::take_faults`] and let the pass succeed.
    Collect,
    /// Invoke a caller-supplied observer for each fault and let the pass succeed.
    Custom(Box<dyn FnMut(&EngineFault)>),
}

impl std::fmt::Debug for FaultPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fail => "Fail",
            Self::Log => "Log",
            Self::Collect => "Collect",
            Self::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

struct ElementRecord {
    state: ElementState,
}

struct LayoutState {
    epoch: u64,
    ended: bool,
    /// Set when the pass ends; replayed by later `end_layout` calls.
    outcome: Option<Result<Vec<RenderCommand>, EngineFault>>,
    records: Vec<ElementRecord>,
    open: SmallVec<[u32; 16]>,
}

/// Owns an engine and drives the element-tree construction protocol.
pub struct Session<E: RawEngine> {
    engine: E,
    faults: Rc<RefCell<Vec<EngineFault>>>,
    policy: FaultPolicy,
    collected: Vec<EngineFault>,
    layout: Option<LayoutState>,
    epoch: u64,
    allow_custom: bool,
}

impl<E: RawEngine> Session<E> {
    /// Create a session: allocates the engine's arena at its requested size,
    /// hands it over, and registers the fault handler.
    pub fn new(mut engine: E, viewport: Dimensions) -> Self {
        let arena = Arena::with_capacity(engine.min_memory_size());
        engine.create_arena(arena);
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&faults);
        engine.initialize(viewport, Box::new(move |fault| sink.borrow_mut().push(fault)));
        Self {
            engine,
            faults,
            policy: FaultPolicy::Fail,
            collected: Vec::new(),
            layout: None,
            epoch: 0,
            allow_custom: false,
        }
    }

    /// Replace the default fail-fast fault policy.
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Allow `ElementConfig::Custom` payloads. Off by default: custom
    /// commands are only meaningful when the renderer handles them.
    pub fn with_custom_elements(mut self) -> Self {
        self.allow_custom = true;
        self
    }

    /// Register the text measurement callback. Required before any pass
    /// containing text nodes.
    pub fn set_measure_text(
        &mut self,
        measure: impl FnMut(&str, &TextConfig) -> Dimensions + 'static,
    ) {
        self.engine.set_measure_text(Box::new(measure));
    }

    /// Update viewport dimensions. Only legal between passes.
    pub fn set_viewport(&mut self, viewport: Dimensions) -> Result<(), ProtocolError> {
        if let Some(layout) = &self.layout {
            if !layout.ended {
                return Err(ProtocolError::InvalidState(
                    "viewport cannot change while a layout pass is open",
                ));
            }
        }
        self.engine.set_viewport(viewport);
        Ok(())
    }

    /// Forward pointer position and press state to the engine.
    pub fn pointer_state(&mut self, position: Vector2, down: bool) {
        self.engine.pointer_state(position, down);
    }

    /// Faults accumulated under [`FaultPolicy::Collect`].
    pub fn take_faults(&mut self) -> Vec<EngineFault> {
        std::mem::take(&mut self.collected)
    }

    /// Borrow the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start a new layout pass.
    ///
    /// Fails with `InvalidState` while a prior pass is open; once a pass has
    /// ended, beginning again creates a fresh pass (there is no way back to
    /// an ended one).
    pub fn begin_layout(&mut self) -> Result<(), ProtocolError> {
        if let Some(layout) = &self.layout {
            if !layout.ended {
                return Err(ProtocolError::InvalidState("a layout pass is already open"));
            }
        }
        self.epoch += 1;
        self.faults.borrow_mut().clear();
        self.engine.begin_layout();
        self.layout = Some(LayoutState {
            epoch: self.epoch,
            ended: false,
            outcome: None,
            records: Vec::new(),
            open: SmallVec::new(),
        });
        tracing::debug!(epoch = self.epoch, "layout pass opened");
        Ok(())
    }

    /// End the current pass and return its draw commands.
    ///
    /// Idempotent: calling again replays the captured outcome without
    /// touching the engine. The returned sequence is a snapshot; mutating it
    /// does not affect later calls or later passes.
    pub fn end_layout(&mut self) -> Result<Vec<RenderCommand>, LayoutError> {
        {
            let Some(layout) = self.layout.as_ref() else {
                return Err(ProtocolError::InvalidState("no layout pass is open").into());
            };
            if layout.ended {
                return self.replay_outcome();
            }
            if !layout.open.is_empty() {
                return Err(
                    ProtocolError::UnbalancedScope("elements still open at end of pass").into(),
                );
            }
        }

        let commands = self.engine.end_layout();
        let faults: Vec<EngineFault> = self.faults.borrow_mut().drain(..).collect();
        let outcome = if faults.is_empty() {
            Ok(commands)
        } else {
            match &mut self.policy {
                FaultPolicy::Fail => {
                    for fault in &faults {
                        tracing::warn!(fault = %fault, "engine fault during pass");
                    }
                    Err(faults[0].clone())
                }
                FaultPolicy::Log => {
                    for fault in &faults {
                        tracing::warn!(fault = %fault, "engine fault during pass");
                    }
                    Ok(commands)
                }
                FaultPolicy::Collect => {
                    self.collected.extend(faults);
                    Ok(commands)
                }
                FaultPolicy::Custom(observer) => {
                    for fault in &faults {
                        observer(fault);
                    }
                    Ok(commands)
                }
            }
        };

        if let Some(layout) = self.layout.as_mut() {
            layout.ended = true;
            tracing::debug!(
                epoch = layout.epoch,
                commands = outcome.as_ref().map(Vec::len).unwrap_or(0),
                "layout pass ended"
            );
            layout.outcome = Some(outcome);
        }
        self.replay_outcome()
    }

    fn replay_outcome(&self) -> Result<Vec<RenderCommand>, LayoutError> {
        match self.layout.as_ref().and_then(|layout| layout.outcome.as_ref()) {
            Some(Ok(commands)) => Ok(commands.clone()),
            Some(Err(fault)) => Err(LayoutError::Engine(fault.clone())),
            None => Err(ProtocolError::InvalidState("layout pass has no outcome").into()),
        }
    }

    /// Open an element. With a key, the identity is hashed by the engine
    /// from the key text, the offset, and a seed from the open parent; anon
    /// elements get an engine-assigned identity.
    pub fn open_element(
        &mut self,
        key: Option<ElementKey<'_>>,
    ) -> Result<ElementScope, ProtocolError> {
        self.ensure_pass_open()?;
        self.ensure_parent_posted()?;

        let seed = self.engine.parent_element_id();
        self.engine.open_element();
        if let Some(key) = key {
            let id = self.engine.hash_string(key.text, key.offset, seed);
            self.engine.attach_id(id);
        }

        let Some(layout) = self.layout.as_mut() else {
            return Err(ProtocolError::InvalidState("no layout pass is open"));
        };
        let index = layout.records.len() as u32;
        layout.records.push(ElementRecord {
            state: ElementState::Configuring,
        });
        layout.open.push(index);
        Ok(ElementScope {
            index,
            epoch: layout.epoch,
        })
    }

    /// Attach one configuration payload to a still-open, not-yet-posted
    /// element. One of each kind is the supported usage; repeating a kind is
    /// unchecked here and resolved by the engine.
    pub fn configure(
        &mut self,
        scope: &ElementScope,
        config: impl Into<Config>,
    ) -> Result<(), ProtocolError> {
        self.ensure_pass_open()?;
        match self.element_state(scope)? {
            ElementState::Configuring => {}
            ElementState::Posted | ElementState::Closed => {
                return Err(ProtocolError::InvalidState(
                    "element configuration is already posted",
                ));
            }
        }
        match config.into() {
            Config::Layout(config) => self.engine.attach_layout_config(config),
            Config::Element(config) => {
                if config.kind() == ElementConfigKind::Custom && !self.allow_custom {
                    return Err(ProtocolError::UnsupportedConfig(ElementConfigKind::Custom));
                }
                self.engine.attach_element_config(config);
            }
        }
        Ok(())
    }

    /// Declare configuration complete; the element may now accept children.
    /// Must be called exactly once per opened element.
    pub fn post_configure(&mut self, scope: &ElementScope) -> Result<(), ProtocolError> {
        self.ensure_pass_open()?;
        match self.element_state(scope)? {
            ElementState::Configuring => {}
            ElementState::Posted | ElementState::Closed => {
                return Err(ProtocolError::InvalidState("element was already posted"));
            }
        }
        self.engine.post_configuration();
        self.set_element_state(scope, ElementState::Posted);
        Ok(())
    }

    /// Close an element. Idempotent once closed; a no-op after the pass has
    /// ended (so unwinding disposers stay safe). Closing while the element
    /// still has open children is an error, not a silent cascade.
    pub fn close_element(&mut self, scope: &ElementScope) -> Result<(), ProtocolError> {
        let Some(layout) = self.layout.as_ref() else {
            return Err(ProtocolError::InvalidState("no layout pass is open"));
        };
        if scope.epoch != layout.epoch {
            return Err(ProtocolError::InvalidState(
                "scope belongs to an earlier layout pass",
            ));
        }
        if layout.ended {
            return Ok(());
        }
        match layout.records[scope.index as usize].state {
            ElementState::Closed => Ok(()),
            ElementState::Configuring => Err(ProtocolError::InvalidState(
                "element closed before post_configure",
            )),
            ElementState::Posted => {
                if layout.open.last() != Some(&scope.index) {
                    return Err(ProtocolError::UnbalancedScope(
                        "element still has open children",
                    ));
                }
                self.engine.close_element();
                if let Some(layout) = self.layout.as_mut() {
                    layout.open.pop();
                }
                self.set_element_state(scope, ElementState::Closed);
                Ok(())
            }
        }
    }

    /// Open, configure, and close a text leaf atomically. No scope is
    /// returned and no close call follows.
    pub fn text(&mut self, text: &str, config: TextConfig) -> Result<(), ProtocolError> {
        self.ensure_pass_open()?;
        self.ensure_parent_posted()?;
        self.engine.open_text_element(text, config);
        Ok(())
    }

    /// Scoped element helper: open, attach each config, post, run `body`,
    /// and close on every exit path, including error propagation out of the
    /// configuration loop or the body.
    pub fn element<T>(
        &mut self,
        key: Option<ElementKey<'_>>,
        configs: impl IntoIterator<Item = Config>,
        body: impl FnOnce(&mut Self) -> Result<T, LayoutError>,
    ) -> Result<T, LayoutError> {
        let scope = self.open_element(key)?;
        for config in configs {
            if let Err(err) = self.configure(&scope, config) {
                // Post and close so the engine stack stays balanced
                let _ = self.post_configure(&scope);
                let _ = self.close_element(&scope);
                return Err(err.into());
            }
        }
        self.post_configure(&scope)?;
        let result = body(self);
        match self.close_element(&scope) {
            Ok(()) => result,
            // The body's own error is the root cause when both fail
            Err(close_err) => result.and(Err(close_err.into())),
        }
    }

    fn ensure_pass_open(&self) -> Result<(), ProtocolError> {
        match &self.layout {
            None => Err(ProtocolError::InvalidState("no layout pass is open")),
            Some(layout) if layout.ended => {
                Err(ProtocolError::InvalidState("layout pass already ended"))
            }
            Some(_) => Ok(()),
        }
    }

    /// A new element (or text node) may only open under a posted parent:
    /// configuration is not retroactive.
    fn ensure_parent_posted(&self) -> Result<(), ProtocolError> {
        let Some(layout) = self.layout.as_ref() else {
            return Err(ProtocolError::InvalidState("no layout pass is open"));
        };
        if let Some(&top) = layout.open.last() {
            if layout.records[top as usize].state != ElementState::Posted {
                return Err(ProtocolError::InvalidState(
                    "parent element has not been posted",
                ));
            }
        }
        Ok(())
    }

    fn element_state(&self, scope: &ElementScope) -> Result<ElementState, ProtocolError> {
        let Some(layout) = self.layout.as_ref() else {
            return Err(ProtocolError::InvalidState("no layout pass is open"));
        };
        if scope.epoch != layout.epoch {
            return Err(ProtocolError::InvalidState(
                "scope belongs to an earlier layout pass",
            ));
        }
        Ok(layout.records[scope.index as usize].state)
    }

    fn set_element_state(&mut self, scope: &ElementScope, state: ElementState) {
        if let Some(layout) = self.layout.as_mut() {
            layout.records[scope.index as usize].state = state;
        }
    }
}

impl<E: RawEngine> Drop for Session<E> {
    /// Disposing the session force-closes any open pass so the engine's
    /// per-frame cursor state is never left dangling.
    fn drop(&mut self) {
        let open = match &self.layout {
            Some(layout) if !layout.ended => layout.open.len(),
            _ => return,
        };
        tracing::warn!(open, "session dropped with an open layout pass; force-closing");
        for _ in 0..open {
            self.engine.close_element();
        }
        let _ = self.engine.end_layout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_engine::{hash_element_key, CustomConfig, ElementId, MeasureTextFn};

    /// Engine double that records the call sequence for mirroring checks.
    struct RecordingEngine {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl RecordingEngine {
        fn new() -> (Self, Rc<RefCell<Vec<&'static str>>>) {
            let calls = Rc::new(RefCell::new(Vec::new()));
            (Self { calls: Rc::clone(&calls) }, calls)
        }

        fn record(&self, call: &'static str) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl RawEngine for RecordingEngine {
        fn min_memory_size(&self) -> usize {
            0
        }
        fn create_arena(&mut self, _arena: Arena) {
            self.record("create_arena");
        }
        fn initialize(&mut self, _viewport: Dimensions, _handler: lamina_engine::FaultHandler) {
            self.record("initialize");
        }
        fn set_measure_text(&mut self, _measure: MeasureTextFn) {
            self.record("set_measure_text");
        }
        fn set_viewport(&mut self, _viewport: Dimensions) {
            self.record("set_viewport");
        }
        fn pointer_state(&mut self, _position: Vector2, _down: bool) {
            self.record("pointer_state");
        }
        fn begin_layout(&mut self) {
            self.record("begin_layout");
        }
        fn end_layout(&mut self) -> Vec<RenderCommand> {
            self.record("end_layout");
            Vec::new()
        }
        fn open_element(&mut self) {
            self.record("open_element");
        }
        fn post_configuration(&mut self) {
            self.record("post_configuration");
        }
        fn close_element(&mut self) {
            self.record("close_element");
        }
        fn hash_string(&self, key: &str, offset: u32, seed: u32) -> ElementId {
            hash_element_key(key, offset, seed)
        }
        fn attach_id(&mut self, _id: ElementId) {
            self.record("attach_id");
        }
        fn attach_layout_config(&mut self, _config: LayoutConfig) {
            self.record("attach_layout_config");
        }
        fn attach_element_config(&mut self, _config: ElementConfig) {
            self.record("attach_element_config");
        }
        fn parent_element_id(&self) -> u32 {
            0
        }
        fn open_text_element(&mut self, _text: &str, _config: TextConfig) {
            self.record("open_text_element");
        }
    }

    fn session() -> (Session<RecordingEngine>, Rc<RefCell<Vec<&'static str>>>) {
        let (engine, calls) = RecordingEngine::new();
        let session = Session::new(engine, Dimensions::new(800.0, 600.0));
        (session, calls)
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = Config::from(LayoutConfig::default());
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn begin_while_open_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let err = session.begin_layout().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidState(_)));
    }

    #[test]
    fn begin_after_end_starts_fresh_pass() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        session.end_layout().unwrap();
        session.begin_layout().unwrap();
        session.end_layout().unwrap();
    }

    #[test]
    fn element_ops_without_pass_fail() {
        let (mut session, _) = session();
        assert!(session.open_element(None).is_err());
        assert!(session.text("x", TextConfig::default()).is_err());
        assert!(session.end_layout().is_err());
    }

    #[test]
    fn configure_after_post_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        let err = session
            .configure(&scope, LayoutConfig::default())
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidState(_)));
    }

    #[test]
    fn close_before_post_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        let err = session.close_element(&scope).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidState(_)));
    }

    #[test]
    fn double_post_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        assert!(session.post_configure(&scope).is_err());
    }

    #[test]
    fn close_is_idempotent() {
        let (mut session, calls) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        session.close_element(&scope).unwrap();
        session.close_element(&scope).unwrap();

        let closes = calls.borrow().iter().filter(|&&c| c == "close_element").count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn close_after_pass_ended_is_noop() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        session.close_element(&scope).unwrap();
        session.end_layout().unwrap();
        // Disposers running after end_layout must stay safe
        session.close_element(&scope).unwrap();
    }

    #[test]
    fn child_before_parent_posted_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let _parent = session.open_element(None).unwrap();
        let err = session.open_element(None).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidState(_)));
    }

    #[test]
    fn closing_with_open_child_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let parent = session.open_element(None).unwrap();
        session.post_configure(&parent).unwrap();
        let child = session.open_element(None).unwrap();
        session.post_configure(&child).unwrap();

        let err = session.close_element(&parent).unwrap_err();
        assert!(matches!(err, ProtocolError::UnbalancedScope(_)));
    }

    #[test]
    fn end_with_open_elements_fails() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        let err = session.end_layout().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Protocol(ProtocolError::UnbalancedScope(_))
        ));
    }

    #[test]
    fn stale_scope_is_rejected() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session.post_configure(&scope).unwrap();
        session.close_element(&scope).unwrap();
        session.end_layout().unwrap();

        session.begin_layout().unwrap();
        let err = session.close_element(&scope).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidState(_)));
    }

    #[test]
    fn end_layout_invokes_engine_once() {
        let (mut session, calls) = session();
        session.begin_layout().unwrap();
        let first = session.end_layout().unwrap();
        let second = session.end_layout().unwrap();
        assert_eq!(first, second);

        let ends = calls.borrow().iter().filter(|&&c| c == "end_layout").count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn session_mirrors_calls_in_protocol_order() {
        let (mut session, calls) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(Some("root".into())).unwrap();
        session.configure(&scope, LayoutConfig::default()).unwrap();
        session.post_configure(&scope).unwrap();
        session.text("hi", TextConfig::default()).unwrap();
        session.close_element(&scope).unwrap();
        session.end_layout().unwrap();

        assert_eq!(
            calls.borrow().as_slice(),
            &[
                "create_arena",
                "initialize",
                "begin_layout",
                "open_element",
                "attach_id",
                "attach_layout_config",
                "post_configuration",
                "open_text_element",
                "close_element",
                "end_layout",
            ]
        );
    }

    #[test]
    fn custom_config_requires_opt_in() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        let err = session
            .configure(
                &scope,
                ElementConfig::Custom(CustomConfig { data: 1 }),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnsupportedConfig(ElementConfigKind::Custom)
        );
    }

    #[test]
    fn custom_config_allowed_when_enabled() {
        let (engine, _) = RecordingEngine::new();
        let mut session =
            Session::new(engine, Dimensions::new(800.0, 600.0)).with_custom_elements();
        session.begin_layout().unwrap();
        let scope = session.open_element(None).unwrap();
        session
            .configure(&scope, ElementConfig::Custom(CustomConfig { data: 1 }))
            .unwrap();
    }

    #[test]
    fn element_helper_closes_on_body_error() {
        let (mut session, _) = session();
        session.begin_layout().unwrap();
        let result: Result<(), LayoutError> = session.element(None, [], |_| {
            Err(ProtocolError::InvalidState("simulated").into())
        });
        assert!(result.is_err());
        // The scope was still closed, so the pass ends cleanly
        session.end_layout().unwrap();
    }

    #[test]
    fn element_helper_attaches_configs_in_a_loop() {
        let (mut session, calls) = session();
        session.begin_layout().unwrap();
        session
            .element(
                Some("panel".into()),
                [
                    Config::from(LayoutConfig::default()),
                    Config::from(ElementConfig::Rectangle(Default::default())),
                ],
                |_| Ok(()),
            )
            .unwrap();
        session.end_layout().unwrap();

        let attached = calls
            .borrow()
            .iter()
            .filter(|&&c| c == "attach_layout_config" || c == "attach_element_config")
            .count();
        assert_eq!(attached, 2);
    }

    #[test]
    fn drop_force_closes_open_pass() {
        let (engine, calls) = RecordingEngine::new();
        {
            let mut session = Session::new(engine, Dimensions::new(800.0, 600.0));
            session.begin_layout().unwrap();
            let scope = session.open_element(None).unwrap();
            session.post_configure(&scope).unwrap();
            // Dropped with one element still open
        }
        let calls = calls.borrow();
        assert!(calls.contains(&"close_element"));
        assert_eq!(calls.last(), Some(&"end_layout"));
    }

    #[test]
    fn viewport_change_requires_pass_boundary() {
        let (mut session, _) = session();
        session.set_viewport(Dimensions::new(100.0, 100.0)).unwrap();
        session.begin_layout().unwrap();
        assert!(session.set_viewport(Dimensions::new(50.0, 50.0)).is_err());
        session.end_layout().unwrap();
        session.set_viewport(Dimensions::new(50.0, 50.0)).unwrap();
    }
}
