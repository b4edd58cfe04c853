//! Path data for the LCARS primitives
//!
//! Each shape is built once in local coordinates for its canonical orientation
//! (endcaps facing left, elbows bending around the top-left corner) and then
//! mirrored and translated into the element's bounds.

use crate::layout::{BoundingBox, Direction, ElbowOrientation, Point};

/// A segment in a resolved path
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc to `end`
    ArcTo {
        end: Point,
        radius: f64,
        large_arc: bool,
        sweep: bool, // true = clockwise in SVG coordinates (y-down)
    },
    Close,
}

/// A resolved path ready for SVG rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPath {
    pub segments: Vec<PathSegment>,
}

impl ResolvedPath {
    fn move_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    fn line_to(mut self, x: f64, y: f64) -> Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    fn arc_to(mut self, x: f64, y: f64, radius: f64, sweep: bool) -> Self {
        self.segments.push(PathSegment::ArcTo {
            end: Point::new(x, y),
            radius,
            large_arc: false,
            sweep,
        });
        self
    }

    fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Mirror a path built in a `bounds`-sized local frame and move it onto `bounds`.
    ///
    /// Each mirror reverses the winding, so arcs flip their sweep once per axis.
    pub fn placed(self, bounds: &BoundingBox, flip_x: bool, flip_y: bool) -> Self {
        let map = |p: Point| {
            Point::new(
                bounds.x + if flip_x { bounds.width - p.x } else { p.x },
                bounds.y + if flip_y { bounds.height - p.y } else { p.y },
            )
        };
        let flip_sweep = flip_x != flip_y;

        let segments = self
            .segments
            .into_iter()
            .map(|seg| match seg {
                PathSegment::MoveTo(p) => PathSegment::MoveTo(map(p)),
                PathSegment::LineTo(p) => PathSegment::LineTo(map(p)),
                PathSegment::ArcTo {
                    end,
                    radius,
                    large_arc,
                    sweep,
                } => PathSegment::ArcTo {
                    end: map(end),
                    radius,
                    large_arc,
                    sweep: sweep != flip_sweep,
                },
                PathSegment::Close => PathSegment::Close,
            })
            .collect();
        ResolvedPath { segments }
    }

    /// Convert to SVG path `d` attribute string
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();

        for seg in &self.segments {
            if !d.is_empty() {
                d.push(' ');
            }
            match seg {
                PathSegment::MoveTo(p) => {
                    d.push_str(&format!("M{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::LineTo(p) => {
                    d.push_str(&format!("L{:.2} {:.2}", p.x, p.y));
                }
                PathSegment::ArcTo {
                    end,
                    radius,
                    large_arc,
                    sweep,
                } => {
                    let large = if *large_arc { 1 } else { 0 };
                    let sw = if *sweep { 1 } else { 0 };
                    // A rx ry x-axis-rotation large-arc-flag sweep-flag x y
                    d.push_str(&format!(
                        "A{:.2} {:.2} 0 {} {} {:.2} {:.2}",
                        radius, radius, large, sw, end.x, end.y
                    ));
                }
                PathSegment::Close => {
                    d.push('Z');
                }
            }
        }

        d
    }
}

/// Bar with a semicircular end on the `direction` side
pub fn endcap_path(bounds: &BoundingBox, direction: Direction) -> ResolvedPath {
    let (w, h) = (bounds.width, bounds.height);
    let r = (h / 2.0).min(w);

    ResolvedPath::default()
        .move_to(r, 0.0)
        .line_to(w, 0.0)
        .line_to(w, h)
        .line_to(r, h)
        .arc_to(r, 0.0, r, true)
        .close()
        .placed(bounds, direction == Direction::Right, false)
}

/// Bar with its top corner on the `direction` side cut off diagonally
pub fn chisel_endcap_path(bounds: &BoundingBox, direction: Direction) -> ResolvedPath {
    let (w, h) = (bounds.width, bounds.height);
    let cut = (h / 2.0).min(w);

    ResolvedPath::default()
        .move_to(cut, 0.0)
        .line_to(w, 0.0)
        .line_to(w, h)
        .line_to(0.0, h)
        .close()
        .placed(bounds, direction == Direction::Right, false)
}

/// L-shaped elbow: a horizontal arm `arm_height` tall joined to a vertical bar
/// `bar_width` wide, with a rounded outer corner and a concave inner corner.
pub fn elbow_path(
    bounds: &BoundingBox,
    orientation: ElbowOrientation,
    arm_height: f64,
    bar_width: f64,
) -> ResolvedPath {
    let (w, h) = (bounds.width, bounds.height);
    let arm = arm_height.clamp(0.0, h);
    let bar = bar_width.clamp(0.0, w);
    let outer = arm.min(bar).min(h);
    let inner = (arm / 2.0).min(w - bar).min(h - arm).max(0.0);

    let mut path = ResolvedPath::default()
        .move_to(outer, 0.0)
        .line_to(w, 0.0)
        .line_to(w, arm)
        .line_to(bar + inner, arm);
    if inner > 0.0 {
        path = path.arc_to(bar, arm + inner, inner, false);
    }
    path = path.line_to(bar, h).line_to(0.0, h).line_to(0.0, outer);
    if outer > 0.0 {
        path = path.arc_to(outer, 0.0, outer, true);
    }

    let (flip_x, flip_y) = match orientation {
        ElbowOrientation::TopLeft => (false, false),
        ElbowOrientation::TopRight => (true, false),
        ElbowOrientation::BottomLeft => (false, true),
        ElbowOrientation::BottomRight => (true, true),
    };
    path.close().placed(bounds, flip_x, flip_y)
}
