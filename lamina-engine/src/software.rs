//! In-process reference engine.
//!
//! `SoftwareEngine` implements the [`RawEngine`] contract without any native
//! code, so sessions can run headless and tests can observe real command
//! output. It is intentionally small: fixed/fit/grow/percent sizing, single
//! direction stacking with padding and child gap, pre-order command
//! emission, scissor pairs for clip configs, floating anchoring, duplicate
//! identity detection, and a measure-text cache. It is not a production
//! layout algorithm and does not try to be one.

use std::collections::{HashMap, HashSet};

use crate::config::{
    AlignX, AlignY, BorderConfig, ClipConfig, CustomConfig, ElementConfig, FloatingAttachTo,
    FloatingConfig, ImageConfig, LayoutConfig, LayoutDirection, RectangleConfig, SizingAxis,
    TextConfig,
};
use crate::engine::{Arena, MeasureTextFn, RawEngine};
use crate::fault::{EngineFault, FaultHandler, FaultKind};
use crate::id::{self, ElementId};
use crate::primitives::{BoundingBox, Color, Dimensions, Vector2};
use crate::render::{RenderCommand, RenderData};

/// Default element budget when the caller sizes the arena by `min_memory_size`.
pub const DEFAULT_MAX_ELEMENT_COUNT: usize = 8192;

/// Bookkeeping bytes charged against the arena per element.
const ELEMENT_FOOTPRINT: usize = 256;

const DEFAULT_MAX_MEASURE_CACHE_ENTRIES: usize = 16384;

#[derive(Default)]
struct Node {
    id: ElementId,
    parent: Option<usize>,
    layout: LayoutConfig,
    rectangle: Option<RectangleConfig>,
    border: Option<BorderConfig>,
    clip: Option<ClipConfig>,
    floating: Option<FloatingConfig>,
    image: Option<ImageConfig>,
    custom: Option<CustomConfig>,
    text: Option<(String, TextConfig)>,
    children: Vec<usize>,
    size: Dimensions,
    origin: Vector2,
}

/// Headless implementation of the engine contract.
pub struct SoftwareEngine {
    arena: Option<Arena>,
    viewport: Dimensions,
    fault_handler: Option<FaultHandler>,
    measure_text: Option<MeasureTextFn>,
    measure_cache: HashMap<u64, Dimensions>,
    max_element_count: usize,
    max_measure_cache_entries: usize,
    element_capacity: usize,
    pointer: Vector2,
    pointer_down: bool,

    // Per-pass state, cleared by begin_layout
    nodes: Vec<Node>,
    open_stack: Vec<usize>,
    roots: Vec<usize>,
    seen_ids: HashSet<u32>,
    ordinal: u32,
    text_bytes: usize,
    reported: HashSet<FaultKind>,
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self::with_max_elements(DEFAULT_MAX_ELEMENT_COUNT)
    }

    /// Shrink the element budget; `min_memory_size` scales with it.
    pub fn with_max_elements(max_element_count: usize) -> Self {
        Self {
            arena: None,
            viewport: Dimensions::ZERO,
            fault_handler: None,
            measure_text: None,
            measure_cache: HashMap::new(),
            max_element_count,
            max_measure_cache_entries: DEFAULT_MAX_MEASURE_CACHE_ENTRIES,
            element_capacity: 0,
            pointer: Vector2::ZERO,
            pointer_down: false,
            nodes: Vec::new(),
            open_stack: Vec::new(),
            roots: Vec::new(),
            seen_ids: HashSet::new(),
            ordinal: 0,
            text_bytes: 0,
            reported: HashSet::new(),
        }
    }

    /// Pointer state recorded for the current pass.
    pub fn pointer(&self) -> (Vector2, bool) {
        (self.pointer, self.pointer_down)
    }

    /// Report a fault through the registered handler, once per kind per pass.
    fn fault_once(&mut self, kind: FaultKind, message: impl Into<String>) {
        if !self.reported.insert(kind) {
            return;
        }
        if let Some(handler) = self.fault_handler.as_mut() {
            handler(EngineFault::new(kind, message));
        }
    }

    fn fault(&mut self, kind: FaultKind, message: impl Into<String>) {
        if let Some(handler) = self.fault_handler.as_mut() {
            handler(EngineFault::new(kind, message));
        }
    }

    fn push_node(&mut self, node: Node) -> usize {
        if self.nodes.len() >= self.element_capacity {
            self.fault_once(
                FaultKind::ElementsCapacityExceeded,
                format!("element budget of {} exhausted", self.element_capacity),
            );
        }
        let idx = self.nodes.len();
        if let Some(&parent) = self.open_stack.last() {
            self.nodes[parent].children.push(idx);
        } else {
            self.roots.push(idx);
        }
        self.nodes.push(node);
        idx
    }

    fn open_node(&mut self) -> usize {
        let parent = self.open_stack.last().copied();
        let seed = parent.map(|p| self.nodes[p].id.id).unwrap_or(0);
        let auto_id = id::hash_ordinal(self.ordinal, seed);
        self.ordinal += 1;
        let node = Node {
            id: auto_id,
            parent,
            ..Node::default()
        };
        let idx = self.push_node(node);
        self.open_stack.push(idx);
        idx
    }

    fn measure(&mut self, text: &str, config: &TextConfig) -> Dimensions {
        if self.measure_text.is_none() {
            self.fault_once(
                FaultKind::TextMeasurementFunctionNotProvided,
                "layout contains text but no measure function was registered",
            );
            return Dimensions::ZERO;
        }
        let key = measure_key(text, config);
        if let Some(cached) = self.measure_cache.get(&key) {
            return *cached;
        }
        let dims = match self.measure_text.as_mut() {
            Some(measure) => measure(text, config),
            None => return Dimensions::ZERO,
        };
        if self.measure_cache.len() >= self.max_measure_cache_entries {
            self.fault_once(
                FaultKind::TextMeasurementCapacityExceeded,
                format!(
                    "measure cache budget of {} exhausted",
                    self.max_measure_cache_entries
                ),
            );
        } else {
            self.measure_cache.insert(key, dims);
        }
        dims
    }

    /// Bottom-up pass: resolve fit sizes from content extents.
    fn resolve_fit(&mut self, idx: usize) {
        let children = self.nodes[idx].children.clone();
        for &child in &children {
            self.resolve_fit(child);
        }
        if self.nodes[idx].text.is_some() {
            // Text sizes were measured at creation
            return;
        }

        let layout = self.nodes[idx].layout;
        let mut main_sum = 0.0_f32;
        let mut cross_max = 0.0_f32;
        let mut flow_count = 0usize;
        for &child in &children {
            if self.nodes[child].floating.is_some() {
                continue;
            }
            let size = self.nodes[child].size;
            let (main, cross) = match layout.direction {
                LayoutDirection::LeftToRight => (size.width, size.height),
                LayoutDirection::TopToBottom => (size.height, size.width),
            };
            main_sum += main;
            cross_max = cross_max.max(cross);
            flow_count += 1;
        }
        let gaps = layout.child_gap as f32 * flow_count.saturating_sub(1) as f32;
        let (mut content_w, mut content_h) = match layout.direction {
            LayoutDirection::LeftToRight => (main_sum + gaps, cross_max),
            LayoutDirection::TopToBottom => (cross_max, main_sum + gaps),
        };

        // Childless image elements fit to the source dimensions
        if children.is_empty() {
            if let Some(image) = self.nodes[idx].image {
                content_w = image.source_dimensions.width;
                content_h = image.source_dimensions.height;
            }
        }

        let fit_w = layout.sizing.width.clamp(content_w + layout.padding.width());
        let fit_h = layout.sizing.height.clamp(content_h + layout.padding.height());
        self.nodes[idx].size = Dimensions::new(
            fit_axis_size(layout.sizing.width, fit_w),
            fit_axis_size(layout.sizing.height, fit_h),
        );
    }

    /// Top-down pass: finalize sizes against granted space and assign origins.
    fn place(&mut self, idx: usize, origin: Vector2, granted: Dimensions) {
        self.nodes[idx].size = granted;
        self.nodes[idx].origin = origin;
        if self.nodes[idx].text.is_some() {
            return;
        }

        let layout = self.nodes[idx].layout;
        let children = self.nodes[idx].children.clone();
        let clip_offset = self.nodes[idx]
            .clip
            .map(|c| c.child_offset)
            .unwrap_or(Vector2::ZERO);

        let content = Dimensions::new(
            (granted.width - layout.padding.width()).max(0.0),
            (granted.height - layout.padding.height()).max(0.0),
        );
        let (content_main, content_cross) = match layout.direction {
            LayoutDirection::LeftToRight => (content.width, content.height),
            LayoutDirection::TopToBottom => (content.height, content.width),
        };

        // First sweep: main-axis demand of non-grow children, count of growers.
        let mut fixed_main = 0.0_f32;
        let mut grow_count = 0usize;
        let mut flow_count = 0usize;
        for &child in &children {
            if self.nodes[child].floating.is_some() {
                continue;
            }
            flow_count += 1;
            let sizing = self.nodes[child].layout.sizing;
            let main_axis = match layout.direction {
                LayoutDirection::LeftToRight => sizing.width,
                LayoutDirection::TopToBottom => sizing.height,
            };
            let fit_main = match layout.direction {
                LayoutDirection::LeftToRight => self.nodes[child].size.width,
                LayoutDirection::TopToBottom => self.nodes[child].size.height,
            };
            match main_axis {
                SizingAxis::Grow { .. } => grow_count += 1,
                other => fixed_main += grant_axis(other, fit_main, content_main),
            }
        }
        let gaps = layout.child_gap as f32 * flow_count.saturating_sub(1) as f32;
        let share = if grow_count > 0 {
            ((content_main - fixed_main - gaps) / grow_count as f32).max(0.0)
        } else {
            0.0
        };

        // Second sweep: final child sizes.
        let mut finals: Vec<(usize, f32, f32)> = Vec::with_capacity(flow_count);
        let mut total_main = 0.0_f32;
        for &child in &children {
            if self.nodes[child].floating.is_some() {
                continue;
            }
            let sizing = self.nodes[child].layout.sizing;
            let fit = self.nodes[child].size;
            let (main_axis, cross_axis, fit_main, fit_cross) = match layout.direction {
                LayoutDirection::LeftToRight => {
                    (sizing.width, sizing.height, fit.width, fit.height)
                }
                LayoutDirection::TopToBottom => {
                    (sizing.height, sizing.width, fit.height, fit.width)
                }
            };
            let main = match main_axis {
                SizingAxis::Grow { min, max } => share.clamp(min, max),
                other => grant_axis(other, fit_main, content_main),
            };
            let cross = grant_axis(cross_axis, fit_cross, content_cross);
            total_main += main;
            finals.push((child, main, cross));
        }
        total_main += gaps;

        let free_main = (content_main - total_main).max(0.0);
        let main_start = match layout.direction {
            LayoutDirection::LeftToRight => match layout.child_alignment.x {
                AlignX::Left => 0.0,
                AlignX::Center => free_main / 2.0,
                AlignX::Right => free_main,
            },
            LayoutDirection::TopToBottom => match layout.child_alignment.y {
                AlignY::Top => 0.0,
                AlignY::Center => free_main / 2.0,
                AlignY::Bottom => free_main,
            },
        };

        let content_origin = Vector2::new(
            origin.x + layout.padding.left as f32 - clip_offset.x,
            origin.y + layout.padding.top as f32 - clip_offset.y,
        );
        let mut cursor = main_start;
        for (child, main, cross) in finals {
            let free_cross = (content_cross - cross).max(0.0);
            let cross_start = match layout.direction {
                LayoutDirection::LeftToRight => match layout.child_alignment.y {
                    AlignY::Top => 0.0,
                    AlignY::Center => free_cross / 2.0,
                    AlignY::Bottom => free_cross,
                },
                LayoutDirection::TopToBottom => match layout.child_alignment.x {
                    AlignX::Left => 0.0,
                    AlignX::Center => free_cross / 2.0,
                    AlignX::Right => free_cross,
                },
            };
            let (child_origin, child_size) = match layout.direction {
                LayoutDirection::LeftToRight => (
                    Vector2::new(content_origin.x + cursor, content_origin.y + cross_start),
                    Dimensions::new(main, cross),
                ),
                LayoutDirection::TopToBottom => (
                    Vector2::new(content_origin.x + cross_start, content_origin.y + cursor),
                    Dimensions::new(cross, main),
                ),
            };
            self.place(child, child_origin, child_size);
            cursor += main + layout.child_gap as f32;
        }
    }

    /// Anchor and place floating subtrees after normal flow is resolved.
    fn place_floating(&mut self) {
        for idx in 0..self.nodes.len() {
            let Some(floating) = self.nodes[idx].floating else {
                continue;
            };
            let (anchor_origin, anchor_size) = match floating.attach_to {
                FloatingAttachTo::Root => (Vector2::ZERO, self.viewport),
                FloatingAttachTo::Parent => match self.nodes[idx].parent {
                    Some(parent) => (self.nodes[parent].origin, self.nodes[parent].size),
                    None => (Vector2::ZERO, self.viewport),
                },
                FloatingAttachTo::ElementWithId => {
                    match self.nodes.iter().position(|n| n.id.id == floating.parent_id) {
                        Some(target) => (self.nodes[target].origin, self.nodes[target].size),
                        None => {
                            self.fault(
                                FaultKind::FloatingContainerParentNotFound,
                                format!("no element with id {} in this pass", floating.parent_id),
                            );
                            (Vector2::ZERO, self.viewport)
                        }
                    }
                }
            };
            let sizing = self.nodes[idx].layout.sizing;
            let fit = self.nodes[idx].size;
            let granted = Dimensions::new(
                grant_axis(sizing.width, fit.width, anchor_size.width),
                grant_axis(sizing.height, fit.height, anchor_size.height),
            );
            self.place(idx, anchor_origin + floating.offset, granted);
        }
    }

    fn emit(&self, idx: usize, z_index: i16, out: &mut Vec<RenderCommand>) {
        let node = &self.nodes[idx];
        let bounding_box = BoundingBox::from_origin_size(node.origin, node.size);
        let id = node.id.id;

        if let Some((text, config)) = &node.text {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::Text {
                    text: text.clone(),
                    config: *config,
                },
            });
            return;
        }

        // Every structural element yields a rectangle, transparent or not,
        // so consumers always see one command per element.
        let rectangle = node.rectangle.unwrap_or(RectangleConfig {
            color: Color::TRANSPARENT,
            corner_radius: Default::default(),
        });
        out.push(RenderCommand {
            bounding_box,
            id,
            z_index,
            data: RenderData::Rectangle {
                color: rectangle.color,
                corner_radius: rectangle.corner_radius,
            },
        });
        if let Some(border) = node.border {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::Border {
                    color: border.color,
                    width: border.width,
                },
            });
        }
        if let Some(image) = node.image {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::Image {
                    source_id: image.source_id,
                },
            });
        }
        if let Some(custom) = node.custom {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::Custom { data: custom.data },
            });
        }

        if let Some(clip) = node.clip {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::ScissorStart {
                    horizontal: clip.horizontal,
                    vertical: clip.vertical,
                },
            });
        }
        for &child in &node.children {
            if self.nodes[child].floating.is_some() {
                continue;
            }
            self.emit(child, z_index, out);
        }
        if node.clip.is_some() {
            out.push(RenderCommand {
                bounding_box,
                id,
                z_index,
                data: RenderData::ScissorEnd,
            });
        }
    }
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RawEngine for SoftwareEngine {
    fn min_memory_size(&self) -> usize {
        self.max_element_count * ELEMENT_FOOTPRINT
    }

    fn create_arena(&mut self, arena: Arena) {
        self.element_capacity = arena.capacity() / ELEMENT_FOOTPRINT;
        self.arena = Some(arena);
    }

    fn initialize(&mut self, viewport: Dimensions, fault_handler: FaultHandler) {
        self.viewport = viewport;
        self.fault_handler = Some(fault_handler);
    }

    fn set_measure_text(&mut self, measure: MeasureTextFn) {
        self.measure_text = Some(measure);
    }

    fn set_viewport(&mut self, viewport: Dimensions) {
        self.viewport = viewport;
    }

    fn pointer_state(&mut self, position: Vector2, down: bool) {
        self.pointer = position;
        self.pointer_down = down;
    }

    fn begin_layout(&mut self) {
        self.nodes.clear();
        self.open_stack.clear();
        self.roots.clear();
        self.seen_ids.clear();
        self.ordinal = 0;
        self.text_bytes = 0;
        self.reported.clear();
    }

    fn end_layout(&mut self) -> Vec<RenderCommand> {
        if !self.open_stack.is_empty() {
            // The session layer prevents this; reaching it means the caller
            // bypassed the protocol.
            self.fault(
                FaultKind::InternalError,
                format!("{} elements left open at end of pass", self.open_stack.len()),
            );
            self.open_stack.clear();
        }

        let roots = self.roots.clone();
        for &root in &roots {
            self.resolve_fit(root);
        }
        for &root in &roots {
            if self.nodes[root].floating.is_some() {
                continue;
            }
            let sizing = self.nodes[root].layout.sizing;
            let fit = self.nodes[root].size;
            let granted = Dimensions::new(
                grant_axis(sizing.width, fit.width, self.viewport.width),
                grant_axis(sizing.height, fit.height, self.viewport.height),
            );
            self.place(root, Vector2::ZERO, granted);
        }
        self.place_floating();

        let mut out = Vec::new();
        for &root in &roots {
            if self.nodes[root].floating.is_some() {
                continue;
            }
            self.emit(root, 0, &mut out);
        }
        for idx in 0..self.nodes.len() {
            if let Some(floating) = self.nodes[idx].floating {
                self.emit(idx, floating.z_index, &mut out);
            }
        }
        tracing::debug!(elements = self.nodes.len(), commands = out.len(), "pass finalized");
        out
    }

    fn open_element(&mut self) {
        self.open_node();
    }

    fn post_configuration(&mut self) {
        // Configuration order is enforced by the session; nothing to resolve here.
    }

    fn close_element(&mut self) {
        self.open_stack.pop();
    }

    fn hash_string(&self, key: &str, offset: u32, seed: u32) -> ElementId {
        id::hash_element_key(key, offset, seed)
    }

    fn attach_id(&mut self, id: ElementId) {
        let Some(&idx) = self.open_stack.last() else {
            return;
        };
        if !self.seen_ids.insert(id.id) {
            self.fault(
                FaultKind::DuplicateId,
                format!("id '{}' (offset {}) attached twice in one pass", id.source, id.offset),
            );
        }
        self.nodes[idx].id = id;
    }

    fn attach_layout_config(&mut self, config: LayoutConfig) {
        if let Some(&idx) = self.open_stack.last() {
            self.nodes[idx].layout = config;
        }
    }

    fn attach_element_config(&mut self, config: ElementConfig) {
        let Some(&idx) = self.open_stack.last() else {
            return;
        };
        // Last writer wins for repeated kinds
        let node = &mut self.nodes[idx];
        match config {
            ElementConfig::Rectangle(c) => node.rectangle = Some(c),
            ElementConfig::Border(c) => node.border = Some(c),
            ElementConfig::Clip(c) => node.clip = Some(c),
            ElementConfig::Floating(c) => node.floating = Some(c),
            ElementConfig::Image(c) => node.image = Some(c),
            ElementConfig::Custom(c) => node.custom = Some(c),
        }
    }

    fn parent_element_id(&self) -> u32 {
        self.open_stack
            .last()
            .map(|&idx| self.nodes[idx].id.id)
            .unwrap_or(0)
    }

    fn open_text_element(&mut self, text: &str, config: TextConfig) {
        self.text_bytes += text.len();
        if let Some(arena) = &self.arena {
            if self.text_bytes > arena.capacity() {
                self.fault_once(
                    FaultKind::ArenaCapacityExceeded,
                    "text content exceeds the arena budget",
                );
            }
        }
        let size = self.measure(text, &config);
        let parent = self.open_stack.last().copied();
        let seed = parent.map(|p| self.nodes[p].id.id).unwrap_or(0);
        let auto_id = id::hash_ordinal(self.ordinal, seed);
        self.ordinal += 1;
        let node = Node {
            id: auto_id,
            parent,
            text: Some((text.to_string(), config)),
            size,
            ..Node::default()
        };
        self.push_node(node);
    }
}

/// Resolve one axis against the space the parent granted.
fn grant_axis(axis: SizingAxis, fit: f32, available: f32) -> f32 {
    match axis {
        SizingAxis::Fixed(px) => px,
        SizingAxis::Fit { .. } => fit,
        SizingAxis::Percent(fraction) => fraction * available,
        SizingAxis::Grow { min, max } => available.clamp(min, max),
    }
}

/// Fit-pass size for an axis, before the parent grants space.
fn fit_axis_size(axis: SizingAxis, fit: f32) -> f32 {
    match axis {
        SizingAxis::Fixed(px) => px,
        SizingAxis::Fit { .. } => fit,
        // Growers and percents resolve in the placement pass
        SizingAxis::Grow { min, .. } => min,
        SizingAxis::Percent(_) => 0.0,
    }
}

/// Cache key folding the text content with the measurement-relevant config.
fn measure_key(text: &str, config: &TextConfig) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    for field in [config.font_id, config.font_size, config.letter_spacing, config.line_height] {
        hash ^= field as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
