//! Element configuration payloads.
//!
//! Two separate families, attached through two separate engine entry points:
//! [`LayoutConfig`] describes sizing and child arrangement, while
//! [`ElementConfig`] is the tagged union of visual/behavioral payloads
//! (rectangle paint, border, clip, floating, image, custom). Keeping the
//! families apart matches the engine protocol, which stores them in
//! different slots.

use serde::{Deserialize, Serialize};

use crate::primitives::{Color, Dimensions, Vector2};

/// Sizing behavior along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizingAxis {
    /// Shrink to content, clamped to `[min, max]`.
    Fit { min: f32, max: f32 },
    /// Take remaining space in the parent, at least `min`, at most `max`.
    Grow { min: f32, max: f32 },
    /// Exactly this many pixels.
    Fixed(f32),
    /// Fraction (0.0-1.0) of the parent's content box.
    Percent(f32),
}

impl SizingAxis {
    pub const FIT: Self = Self::Fit { min: 0.0, max: f32::MAX };
    pub const GROW: Self = Self::Grow { min: 0.0, max: f32::MAX };

    /// Clamp a resolved size to this axis' min/max band.
    pub fn clamp(&self, value: f32) -> f32 {
        match *self {
            Self::Fit { min, max } | Self::Grow { min, max } => value.clamp(min, max),
            Self::Fixed(px) => px,
            Self::Percent(_) => value,
        }
    }
}

impl Default for SizingAxis {
    fn default() -> Self {
        Self::FIT
    }
}

/// Sizing for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sizing {
    pub width: SizingAxis,
    pub height: SizingAxis,
}

impl Sizing {
    /// Fixed size on both axes.
    pub const fn fixed(width: f32, height: f32) -> Self {
        Self {
            width: SizingAxis::Fixed(width),
            height: SizingAxis::Fixed(height),
        }
    }

    /// Grow on both axes.
    pub const fn grow() -> Self {
        Self {
            width: SizingAxis::GROW,
            height: SizingAxis::GROW,
        }
    }
}

/// Inner padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Padding {
    pub const fn all(value: u16) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    pub const fn horizontal(value: u16) -> Self {
        Self {
            left: value,
            right: value,
            top: 0,
            bottom: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        (self.left + self.right) as f32
    }

    #[inline]
    pub fn height(&self) -> f32 {
        (self.top + self.bottom) as f32
    }
}

/// Main-axis direction for child stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    TopToBottom,
}

/// Horizontal alignment of children inside the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlignX {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of children inside the content box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlignY {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildAlignment {
    pub x: AlignX,
    pub y: AlignY,
}

/// Sizing and child-arrangement configuration for one element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub sizing: Sizing,
    pub padding: Padding,
    pub child_gap: u16,
    pub child_alignment: ChildAlignment,
    pub direction: LayoutDirection,
}

/// Per-corner radii for rectangle and border paint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl From<f32> for CornerRadius {
    /// Same radius on all corners.
    fn from(value: f32) -> Self {
        Self {
            top_left: value,
            top_right: value,
            bottom_left: value,
            bottom_right: value,
        }
    }
}

/// Background paint for an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectangleConfig {
    pub color: Color,
    pub corner_radius: CornerRadius,
}

/// Per-edge border widths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorderWidth {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl BorderWidth {
    pub const fn all(value: u16) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderConfig {
    pub color: Color,
    pub width: BorderWidth,
}

/// Clipping of overflowing children, with a scroll offset applied to them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipConfig {
    pub horizontal: bool,
    pub vertical: bool,
    pub child_offset: Vector2,
}

/// What a floating element anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloatingAttachTo {
    #[default]
    Parent,
    ElementWithId,
    Root,
}

/// Takes an element out of normal flow and positions it relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatingConfig {
    pub offset: Vector2,
    pub z_index: i16,
    /// Identity of the anchor element when `attach_to` is `ElementWithId`.
    pub parent_id: u32,
    pub attach_to: FloatingAttachTo,
}

/// Image content for an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Renderer-side handle for the image data.
    pub source_id: u32,
    /// Intrinsic dimensions, used for fit sizing.
    pub source_dimensions: Dimensions,
}

/// Opaque payload handed through to the renderer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomConfig {
    pub data: u64,
}

/// Text styling for a text node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    pub font_id: u16,
    pub font_size: u16,
    pub letter_spacing: u16,
    pub line_height: u16,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_id: 0,
            font_size: 16,
            letter_spacing: 0,
            line_height: 0,
            color: Color::BLACK,
        }
    }
}

/// Discriminant of an [`ElementConfig`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementConfigKind {
    Rectangle,
    Border,
    Clip,
    Floating,
    Image,
    Custom,
}

impl std::fmt::Display for ElementConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rectangle => "rectangle",
            Self::Border => "border",
            Self::Clip => "clip",
            Self::Floating => "floating",
            Self::Image => "image",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Tagged union of non-layout configuration payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElementConfig {
    Rectangle(RectangleConfig),
    Border(BorderConfig),
    Clip(ClipConfig),
    Floating(FloatingConfig),
    Image(ImageConfig),
    Custom(CustomConfig),
}

impl ElementConfig {
    pub fn kind(&self) -> ElementConfigKind {
        match self {
            Self::Rectangle(_) => ElementConfigKind::Rectangle,
            Self::Border(_) => ElementConfigKind::Border,
            Self::Clip(_) => ElementConfigKind::Clip,
            Self::Floating(_) => ElementConfigKind::Floating,
            Self::Image(_) => ElementConfigKind::Image,
            Self::Custom(_) => ElementConfigKind::Custom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_defaults_to_fit() {
        let sizing = Sizing::default();
        assert_eq!(sizing.width, SizingAxis::FIT);
        assert_eq!(sizing.height, SizingAxis::FIT);
    }

    #[test]
    fn sizing_axis_clamp() {
        let axis = SizingAxis::Fit { min: 10.0, max: 100.0 };
        assert_eq!(axis.clamp(5.0), 10.0);
        assert_eq!(axis.clamp(50.0), 50.0);
        assert_eq!(axis.clamp(500.0), 100.0);
        assert_eq!(SizingAxis::Fixed(42.0).clamp(7.0), 42.0);
    }

    #[test]
    fn padding_helpers() {
        let p = Padding::all(8);
        assert_eq!(p.width(), 16.0);
        assert_eq!(p.height(), 16.0);
        let h = Padding::horizontal(4);
        assert_eq!(h.width(), 8.0);
        assert_eq!(h.height(), 0.0);
    }

    #[test]
    fn corner_radius_from_scalar() {
        let r: CornerRadius = 4.0.into();
        assert_eq!(r.top_left, 4.0);
        assert_eq!(r.bottom_right, 4.0);
    }

    #[test]
    fn border_width_is_zero() {
        assert!(BorderWidth::default().is_zero());
        assert!(!BorderWidth::all(1).is_zero());
    }

    #[test]
    fn element_config_kinds() {
        assert_eq!(
            ElementConfig::Rectangle(RectangleConfig::default()).kind(),
            ElementConfigKind::Rectangle
        );
        assert_eq!(
            ElementConfig::Clip(ClipConfig::default()).kind(),
            ElementConfigKind::Clip
        );
        assert_eq!(
            ElementConfig::Custom(CustomConfig { data: 7 }).kind(),
            ElementConfigKind::Custom
        );
    }

    #[test]
    fn configs_round_trip_through_serde() {
        let cfg = LayoutConfig {
            sizing: Sizing::fixed(100.0, 50.0),
            padding: Padding::all(8),
            child_gap: 4,
            child_alignment: ChildAlignment { x: AlignX::Center, y: AlignY::Top },
            direction: LayoutDirection::TopToBottom,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: LayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
