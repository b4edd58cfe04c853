//! Core types for the layout engine

use std::fmt;
use std::str::FromStr;

use super::error::LayoutError;

/// A 2D point in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A rectangle; also used as the container rect handed to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Start coordinate and extent along an axis
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Horizontal => (self.x, self.width),
            Axis::Vertical => (self.y, self.height),
        }
    }

    /// Replace start coordinate and extent along an axis
    pub fn with_span(self, axis: Axis, start: f64, extent: f64) -> Self {
        match axis {
            Axis::Horizontal => Self {
                x: start,
                width: extent,
                ..self
            },
            Axis::Vertical => Self {
                y: start,
                height: extent,
                ..self
            },
        }
    }

    /// Absolute position of an anchor point on this box
    pub fn anchor(&self, point: AnchorPoint) -> Point {
        let offset = point.offset(self.width, self.height);
        Point::new(self.x + offset.x, self.y + offset.y)
    }

    /// A box can only host a layout when both dimensions are positive
    pub fn is_valid_container(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// Where an anchor point sits along one axis of its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// left or top
    Leading,
    Center,
    /// right or bottom
    Trailing,
}

/// One of the nine alignment handles of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorPoint {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorPoint {
    pub const ALL: [AnchorPoint; 9] = [
        AnchorPoint::TopLeft,
        AnchorPoint::TopCenter,
        AnchorPoint::TopRight,
        AnchorPoint::CenterLeft,
        AnchorPoint::Center,
        AnchorPoint::CenterRight,
        AnchorPoint::BottomLeft,
        AnchorPoint::BottomCenter,
        AnchorPoint::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "topLeft",
            AnchorPoint::TopCenter => "topCenter",
            AnchorPoint::TopRight => "topRight",
            AnchorPoint::CenterLeft => "centerLeft",
            AnchorPoint::Center => "center",
            AnchorPoint::CenterRight => "centerRight",
            AnchorPoint::BottomLeft => "bottomLeft",
            AnchorPoint::BottomCenter => "bottomCenter",
            AnchorPoint::BottomRight => "bottomRight",
        }
    }

    /// Position along the given axis
    pub fn side(&self, axis: Axis) -> Side {
        use AnchorPoint::*;
        match axis {
            Axis::Horizontal => match self {
                TopLeft | CenterLeft | BottomLeft => Side::Leading,
                TopCenter | Center | BottomCenter => Side::Center,
                TopRight | CenterRight | BottomRight => Side::Trailing,
            },
            Axis::Vertical => match self {
                TopLeft | TopCenter | TopRight => Side::Leading,
                CenterLeft | Center | CenterRight => Side::Center,
                BottomLeft | BottomCenter | BottomRight => Side::Trailing,
            },
        }
    }

    /// Offset of this point inside a `width` x `height` box
    pub fn offset(&self, width: f64, height: f64) -> Point {
        Point::new(
            side_fraction(self.side(Axis::Horizontal)) * width,
            side_fraction(self.side(Axis::Vertical)) * height,
        )
    }

    /// Offset along a single axis, given the extent on that axis
    pub fn offset_along(&self, axis: Axis, extent: f64) -> f64 {
        side_fraction(self.side(axis)) * extent
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn side_fraction(side: Side) -> f64 {
    match side {
        Side::Leading => 0.0,
        Side::Center => 0.5,
        Side::Trailing => 1.0,
    }
}

impl fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorPoint {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| LayoutError::invalid_anchor_point(s, Self::valid_names()))
    }
}

/// The edge or point a stretch directive pulls towards, resolved to an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StretchEdge {
    pub axis: Axis,
    pub point: AnchorPoint,
}

impl StretchEdge {
    pub fn new(axis: Axis, point: AnchorPoint) -> Self {
        Self { axis, point }
    }

    pub fn left() -> Self {
        Self::new(Axis::Horizontal, AnchorPoint::CenterLeft)
    }

    pub fn right() -> Self {
        Self::new(Axis::Horizontal, AnchorPoint::CenterRight)
    }

    pub fn top() -> Self {
        Self::new(Axis::Vertical, AnchorPoint::TopCenter)
    }

    pub fn bottom() -> Self {
        Self::new(Axis::Vertical, AnchorPoint::BottomCenter)
    }
}

impl FromStr for StretchEdge {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => return Ok(Self::left()),
            "right" => return Ok(Self::right()),
            "top" => return Ok(Self::top()),
            "bottom" => return Ok(Self::bottom()),
            "centerX" => return Ok(Self::new(Axis::Horizontal, AnchorPoint::Center)),
            "centerY" => return Ok(Self::new(Axis::Vertical, AnchorPoint::Center)),
            _ => {}
        }

        let point: AnchorPoint = s
            .parse()
            .map_err(|_| LayoutError::invalid_stretch_edge(s))?;
        // Corners carry a horizontal component; only the pure top/bottom midpoints are vertical
        let axis = match point {
            AnchorPoint::TopCenter | AnchorPoint::BottomCenter => Axis::Vertical,
            _ => Axis::Horizontal,
        };
        Ok(Self::new(axis, point))
    }
}

/// A length that is either absolute or a percentage of a container dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f64),
    Percent(f64),
}

impl Dimension {
    /// Resolve against the container extent on the matching axis
    pub fn resolve(&self, reference: f64) -> f64 {
        match self {
            Dimension::Px(value) => *value,
            Dimension::Percent(pct) => pct / 100.0 * reference,
        }
    }

    pub fn as_px(&self) -> Option<f64> {
        match self {
            Dimension::Px(value) => Some(*value),
            Dimension::Percent(_) => None,
        }
    }
}

impl FromStr for Dimension {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(pct) = trimmed.strip_suffix('%') {
            return pct
                .trim()
                .parse::<f64>()
                .map(Dimension::Percent)
                .map_err(|_| LayoutError::invalid_dimension(s));
        }
        trimmed
            .trim_end_matches("px")
            .parse::<f64>()
            .map(Dimension::Px)
            .map_err(|_| LayoutError::invalid_dimension(s))
    }
}

/// Natural, content-driven size of an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
    pub calculated: bool,
}

impl IntrinsicSize {
    pub fn resolved(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calculated: true,
        }
    }
}

/// Final resolved box of an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub calculated: bool,
}

impl ElementLayout {
    /// A calculated layout from a box, clamped to the 1-unit minimum
    pub fn from_bounds(bounds: BoundingBox) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width.max(1.0),
            height: bounds.height.max(1.0),
            calculated: true,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}
