//! Draw commands produced by ending a layout pass.
//!
//! A pass yields a flat sequence of commands in document pre-order. Each
//! command carries the target area, the identity of the element that
//! produced it, and a tagged payload. Scissor start/end pairs bracket the
//! commands of clipped subtrees.

use serde::{Deserialize, Serialize};

use crate::config::{BorderWidth, CornerRadius, TextConfig};
use crate::primitives::{BoundingBox, Color};

/// Discriminant of a render command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderCommandKind {
    Rectangle,
    Border,
    Text,
    Image,
    ScissorStart,
    ScissorEnd,
    Custom,
}

/// Payload of one render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderData {
    Rectangle {
        color: Color,
        corner_radius: CornerRadius,
    },
    Border {
        color: Color,
        width: BorderWidth,
    },
    Text {
        text: String,
        config: TextConfig,
    },
    Image {
        source_id: u32,
    },
    ScissorStart {
        horizontal: bool,
        vertical: bool,
    },
    ScissorEnd,
    Custom {
        data: u64,
    },
}

impl RenderData {
    pub fn kind(&self) -> RenderCommandKind {
        match self {
            Self::Rectangle { .. } => RenderCommandKind::Rectangle,
            Self::Border { .. } => RenderCommandKind::Border,
            Self::Text { .. } => RenderCommandKind::Text,
            Self::Image { .. } => RenderCommandKind::Image,
            Self::ScissorStart { .. } => RenderCommandKind::ScissorStart,
            Self::ScissorEnd => RenderCommandKind::ScissorEnd,
            Self::Custom { .. } => RenderCommandKind::Custom,
        }
    }
}

/// One unit of draw output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCommand {
    /// Target area in layout coordinates.
    pub bounding_box: BoundingBox,
    /// Identity of the element this command belongs to.
    pub id: u32,
    /// Stacking order hint; 0 for normal flow.
    pub z_index: i16,
    pub data: RenderData,
}

impl RenderCommand {
    #[inline]
    pub fn kind(&self) -> RenderCommandKind {
        self.data.kind()
    }
}
