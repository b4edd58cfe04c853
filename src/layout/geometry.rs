//! Anchor and stretch geometry
//!
//! Positions are resolved in container coordinates: the container's top-left corner
//! is the origin, whatever `x`/`y` the caller's container rect carries.

use tracing::{debug, warn};

use super::element::{AnchorConfig, AnchorTarget, Element, ElementArena, StretchDirective, StretchTarget};
use super::types::{Axis, BoundingBox, ElementLayout, Point, Side, Size, StretchEdge};

/// Which edge of the box a stretch directive moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingEdge {
    /// left or top
    Leading,
    /// right or bottom
    Trailing,
}

/// Compute an element's final box; dependencies must already be calculated.
pub fn resolve_layout(
    element: &Element,
    arena: &ElementArena,
    container: &BoundingBox,
) -> ElementLayout {
    let area = BoundingBox::new(0.0, 0.0, container.width, container.height);

    let size = resolve_size(element, arena, &area);
    let origin = resolve_anchor_position(element, size, arena, &area);
    let offset = resolve_offset(element, &area);
    let mut bounds = BoundingBox::new(
        origin.x + offset.x,
        origin.y + offset.y,
        size.width,
        size.height,
    );

    let mut stretched: Vec<Axis> = vec![];
    for directive in element.options.stretch.directives() {
        let axis = directive.target_edge.axis;
        if stretched.contains(&axis) {
            debug!(id = %element.id, %axis, "stretching an axis twice, applying to the already stretched box");
        }
        if let Some(updated) = apply_stretch(element, directive, bounds, arena, &area) {
            bounds = updated;
            stretched.push(axis);
        }
    }

    ElementLayout::from_bounds(bounds)
}

/// Box size before stretching: percentage or absolute layout sizes, else intrinsic size.
pub fn resolve_size(element: &Element, arena: &ElementArena, area: &BoundingBox) -> Size {
    let width = element
        .options
        .width
        .map(|w| w.resolve(area.width))
        .unwrap_or(element.intrinsic_size.width);
    let mut height = element
        .options
        .height
        .map(|h| h.resolve(area.height))
        .unwrap_or(element.intrinsic_size.height);

    if element.borrows_height() {
        if let Some(target) = element
            .options
            .anchor_element()
            .and_then(|id| calculated(arena, id))
        {
            height = target.height;
        }
    }

    Size::new(width, height)
}

/// Top-left position that puts the element's anchor point on the target's anchor point
pub fn resolve_anchor_position(
    element: &Element,
    size: Size,
    arena: &ElementArena,
    area: &BoundingBox,
) -> Point {
    let Some(anchor) = &element.options.anchor else {
        return Point::new(area.x, area.y);
    };

    let Some(target) = anchor_target_point(element, anchor, arena, area) else {
        return Point::new(area.x, area.y);
    };

    let own = anchor.anchor_point.offset(size.width, size.height);
    Point::new(target.x - own.x, target.y - own.y)
}

fn anchor_target_point(
    element: &Element,
    anchor: &AnchorConfig,
    arena: &ElementArena,
    area: &BoundingBox,
) -> Option<Point> {
    match &anchor.anchor_to {
        AnchorTarget::Container => Some(area.anchor(anchor.target_anchor_point)),
        AnchorTarget::Element(id) => match calculated(arena, id) {
            Some(target) => Some(target.anchor(anchor.target_anchor_point)),
            None => {
                warn!(
                    id = %element.id,
                    target = %id,
                    "anchor target missing or not calculated, anchoring to container origin"
                );
                None
            }
        },
    }
}

fn resolve_offset(element: &Element, area: &BoundingBox) -> Point {
    let options = &element.options;
    Point::new(
        options.offset_x.map(|d| d.resolve(area.width)).unwrap_or(0.0),
        options.offset_y.map(|d| d.resolve(area.height)).unwrap_or(0.0),
    )
}

/// Move one edge of `bounds` to the directive's target coordinate.
///
/// Returns `None` when the target element cannot be resolved.
pub fn apply_stretch(
    element: &Element,
    directive: &StretchDirective,
    bounds: BoundingBox,
    arena: &ElementArena,
    area: &BoundingBox,
) -> Option<BoundingBox> {
    let axis = directive.target_edge.axis;
    let target = match &directive.target {
        StretchTarget::Container | StretchTarget::Canvas => {
            edge_coordinate(area, directive.target_edge)
        }
        StretchTarget::Element(id) => match calculated(arena, id) {
            Some(target) => edge_coordinate(&target, directive.target_edge),
            None => {
                warn!(id = %element.id, target = %id, "stretch target missing or not calculated");
                return None;
            }
        },
    };

    let (start, extent) = bounds.span(axis);
    let end = start + extent;
    let edge = select_moving_edge(element.options.anchor.as_ref(), axis, start, end, target);

    let (new_start, new_extent) = match edge {
        MovingEdge::Leading => {
            let moved = target + directive.padding;
            if end - moved < 1.0 {
                (end - 1.0, 1.0)
            } else {
                (moved, end - moved)
            }
        }
        MovingEdge::Trailing => {
            let moved = target - directive.padding;
            (start, (moved - start).max(1.0))
        }
    };

    Some(bounds.with_span(axis, new_start, new_extent))
}

/// Pick the edge to move so that an edge anchored to another element stays put.
///
/// Elements anchored to the container (or not anchored) grow towards the target.
pub fn select_moving_edge(
    anchor: Option<&AnchorConfig>,
    axis: Axis,
    start: f64,
    end: f64,
    target: f64,
) -> MovingEdge {
    let element_anchor = anchor.filter(|a| a.anchor_to.element_id().is_some());
    if let Some(anchor) = element_anchor {
        return match anchor.anchor_point.side(axis) {
            Side::Trailing => MovingEdge::Leading,
            Side::Leading => MovingEdge::Trailing,
            Side::Center => {
                if (target - start).abs() <= (target - end).abs() {
                    MovingEdge::Leading
                } else {
                    MovingEdge::Trailing
                }
            }
        };
    }

    if target > start {
        MovingEdge::Trailing
    } else {
        MovingEdge::Leading
    }
}

/// Coordinate of a named edge/point of `bounds` along the edge's axis
pub fn edge_coordinate(bounds: &BoundingBox, edge: StretchEdge) -> f64 {
    let (start, extent) = bounds.span(edge.axis);
    start + edge.point.offset_along(edge.axis, extent)
}

fn calculated(arena: &ElementArena, id: &str) -> Option<BoundingBox> {
    arena
        .get(id)
        .filter(|e| e.layout.calculated)
        .map(|e| e.layout.bounds())
}
