//! Multi-pass layout driver
//!
//! [`LayoutEngine`] owns the groups handed to it, flattens their elements into an
//! [`ElementArena`] and resolves every element's box against a container rect.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::config::LayoutConfig;
use super::element::{Element, ElementArena, Group};
use super::error::LayoutError;
use super::graph::{DependencyGraph, MissingReference};
use super::measurement::{MeasurementPool, MeasurementSurface};
use super::types::{BoundingBox, IntrinsicSize, Size};

/// Options for a single [`LayoutEngine::calculate_bounding_boxes`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalculateOptions {
    /// Grow the container to the content height and lay out once more
    pub dynamic_height: bool,
}

impl CalculateOptions {
    pub fn dynamic_height() -> Self {
        Self {
            dynamic_height: true,
        }
    }
}

/// Group id and its element ids, in caller order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIndex {
    pub id: String,
    pub element_ids: Vec<String>,
}

pub struct LayoutEngine {
    arena: ElementArena,
    groups: Vec<GroupIndex>,
    container: Option<BoundingBox>,
    bounds: Size,
    unresolved: Vec<String>,
    missing: Vec<MissingReference>,
    config: LayoutConfig,
    surface: Option<Arc<MeasurementSurface>>,
}

impl LayoutEngine {
    /// Create an engine sharing the process-wide measurement surface
    pub fn new() -> Self {
        Self::with_pool(MeasurementPool::global())
    }

    /// Create an engine holding a handle from `pool`
    pub fn with_pool(pool: &MeasurementPool) -> Self {
        Self {
            arena: ElementArena::new(),
            groups: vec![],
            container: None,
            bounds: Size::zero(),
            unresolved: vec![],
            missing: vec![],
            config: LayoutConfig::default(),
            surface: Some(pool.acquire()),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Append a group; its elements join the global id namespace
    pub fn add_group(&mut self, group: Group) {
        let mut element_ids = Vec::with_capacity(group.elements.len());
        for element in group.elements {
            let id = element.id.clone();
            if self.arena.insert(element) {
                element_ids.push(id);
            } else {
                warn!(group = %group.id, id = %id, "duplicate element id, keeping the first definition");
            }
        }
        self.groups.push(GroupIndex {
            id: group.id,
            element_ids,
        });
    }

    /// Replace every group
    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.clear_layout();
        for group in groups {
            self.add_group(group);
        }
    }

    /// Drop all groups and elements
    pub fn clear_layout(&mut self) {
        self.arena.clear();
        self.groups.clear();
        self.unresolved.clear();
        self.missing.clear();
        self.bounds = Size::zero();
    }

    pub fn groups(&self) -> &[GroupIndex] {
        &self.groups
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.arena.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.arena.get_mut(id)
    }

    pub fn arena(&self) -> &ElementArena {
        &self.arena
    }

    /// Elements in group order, which is also the z-order for rendering
    pub fn elements_in_render_order(&self) -> impl Iterator<Item = &Element> {
        self.groups
            .iter()
            .flat_map(|g| g.element_ids.iter())
            .filter_map(|id| self.arena.get(id))
    }

    /// Container rect used by the last calculation, after any dynamic growth
    pub fn container_rect(&self) -> Option<BoundingBox> {
        self.container
    }

    /// Ids left uncalculated by the last calculation
    pub fn unresolved_elements(&self) -> &[String] {
        &self.unresolved
    }

    /// References to unknown ids found by the last calculation
    pub fn missing_references(&self) -> &[MissingReference] {
        &self.missing
    }

    /// Bounds computed by the last calculation, without recalculating
    pub fn layout_bounds(&self) -> Size {
        self.bounds
    }

    /// Shared measurement surface, `None` after [`destroy`](Self::destroy)
    pub fn measurement_surface(&self) -> Option<&MeasurementSurface> {
        self.surface.as_deref()
    }

    /// Release this engine's handle on the shared measurement surface
    pub fn destroy(&mut self) {
        if self.surface.take().is_some() {
            debug!("released measurement surface handle");
        }
    }

    /// Mark every intrinsic size stale, e.g. after fonts finished loading
    pub fn invalidate_intrinsic_sizes(&mut self) {
        for element in self.arena.iter_mut() {
            element.invalidate_intrinsic_size();
        }
    }

    /// Lay out every element against `container`.
    ///
    /// Never fails: an invalid container yields `{0, 0}` without touching element state
    /// and a dependency cycle is logged and answered with the container's own size.
    pub fn calculate_bounding_boxes(
        &mut self,
        container: BoundingBox,
        options: CalculateOptions,
    ) -> Size {
        match self.try_calculate_bounding_boxes(container, options) {
            Ok(bounds) => bounds,
            Err(LayoutError::InvalidContainer { width, height }) => {
                debug!(width, height, "skipping layout for empty container");
                Size::zero()
            }
            Err(err) => {
                error!(error = %err, "layout aborted");
                let fallback = container.size();
                self.bounds = fallback;
                fallback
            }
        }
    }

    /// Like [`calculate_bounding_boxes`](Self::calculate_bounding_boxes) but surfaces errors
    pub fn try_calculate_bounding_boxes(
        &mut self,
        container: BoundingBox,
        options: CalculateOptions,
    ) -> Result<Size, LayoutError> {
        if !container.is_valid_container() {
            return Err(LayoutError::invalid_container(
                container.width,
                container.height,
            ));
        }

        self.container = Some(container);
        self.run_passes(&container)?;

        let mut height = container.height;
        if options.dynamic_height {
            let content = self.content_height();
            if content > container.height {
                debug!(from = container.height, to = content, "growing container to content height");
                let grown = BoundingBox::new(container.x, container.y, container.width, content);
                self.container = Some(grown);
                self.run_passes(&grown)?;
                height = grown.height.max(self.content_height());
            }
        }

        self.bounds = Size::new(container.width, height);
        Ok(self.bounds)
    }

    /// Patch intrinsic sizes measured out of band and recalculate with dynamic height
    pub fn update_intrinsic_sizes_and_recalculate(
        &mut self,
        sizes: &HashMap<String, Size>,
        container: BoundingBox,
    ) -> Size {
        for (id, size) in sizes {
            match self.arena.get_mut(id) {
                Some(element) => {
                    element.intrinsic_size = IntrinsicSize::resolved(size.width, size.height);
                }
                None => warn!(id = %id, "intrinsic size update for unknown element"),
            }
        }
        self.calculate_bounding_boxes(container, CalculateOptions::dynamic_height())
    }

    fn run_passes(&mut self, container: &BoundingBox) -> Result<(), LayoutError> {
        for element in self.arena.iter_mut() {
            element.reset_layout();
        }

        let fallback_surface;
        let surface = match &self.surface {
            Some(surface) => surface.as_ref(),
            None => {
                debug!("engine destroyed, measuring with fallback metrics");
                fallback_surface = MeasurementSurface::new();
                &fallback_surface
            }
        };
        for element in self.arena.iter_mut() {
            if !element.intrinsic_size.calculated {
                element.calculate_intrinsic_size(surface, &self.config);
            }
        }

        let graph = DependencyGraph::build(&self.arena);
        self.missing = graph.missing_references().to_vec();
        let order = match graph.topological_order() {
            Ok(order) => order,
            Err(err) => {
                // reset above, so nothing is laid out
                self.unresolved = self.arena.iter().map(|e| e.id.clone()).collect();
                return Err(err);
            }
        };

        let max_passes = self.arena.len().max(1);
        for pass in 0..max_passes {
            let mut progressed = false;

            for id in &order {
                let computed = self
                    .arena
                    .get(id)
                    .filter(|e| !e.layout.calculated)
                    .and_then(|e| e.calculate_layout(&self.arena, container));
                if let (Some(layout), Some(element)) = (computed, self.arena.get_mut(id)) {
                    element.layout = layout;
                    progressed = true;
                }
            }

            if self.arena.iter().all(|e| e.layout.calculated) {
                debug!(passes = pass + 1, "layout converged");
                break;
            }
            if !progressed {
                warn!(pass = pass + 1, "layout stalled with unsatisfiable dependencies");
                break;
            }
        }

        self.unresolved = self
            .arena
            .iter()
            .filter(|e| !e.layout.calculated)
            .map(|e| e.id.clone())
            .collect();
        if !self.unresolved.is_empty() {
            let missing: Vec<&str> = self.missing.iter().map(|m| m.target.as_str()).collect();
            warn!(
                unresolved = ?self.unresolved,
                missing = ?missing,
                "some elements could not be laid out"
            );
        }

        Ok(())
    }

    /// Lowest bottom edge over calculated elements
    fn content_height(&self) -> f64 {
        self.arena
            .iter()
            .filter(|e| e.layout.calculated)
            .map(|e| e.layout.bottom())
            .fold(0.0, f64::max)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::{AnchorConfig, LayoutOptions, StretchDirective, StretchTarget};
    use crate::layout::types::{AnchorPoint, Dimension, StretchEdge};

    fn engine() -> (MeasurementPool, LayoutEngine) {
        let pool = MeasurementPool::new();
        let engine = LayoutEngine::with_pool(&pool);
        (pool, engine)
    }

    fn container() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 600.0, 200.0)
    }

    #[test]
    fn test_chain_resolves_in_one_call() {
        let (_pool, mut engine) = engine();
        engine.set_groups(vec![Group::new("g")
            .with_element(
                Element::rectangle("b")
                    .with_size(50.0, 20.0)
                    .with_options(LayoutOptions::new().with_anchor(AnchorConfig::to_element(
                        "a",
                        AnchorPoint::TopLeft,
                        AnchorPoint::TopRight,
                    ))),
            )
            .with_element(Element::rectangle("a").with_size(100.0, 20.0))]);

        let bounds = engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert_eq!(bounds, Size::new(600.0, 200.0));
        assert_eq!(engine.element("b").unwrap().layout.x, 100.0);
        assert!(engine.unresolved_elements().is_empty());
    }

    #[test]
    fn test_invalid_container_leaves_state_alone() {
        let (_pool, mut engine) = engine();
        engine.add_group(Group::new("g").with_element(Element::rectangle("a")));
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        let before = engine.element("a").unwrap().clone();

        let bounds = engine.calculate_bounding_boxes(
            BoundingBox::new(0.0, 0.0, 0.0, 100.0),
            CalculateOptions::default(),
        );
        assert_eq!(bounds, Size::zero());
        assert_eq!(engine.element("a").unwrap(), &before);
        assert_eq!(engine.layout_bounds(), Size::new(600.0, 200.0));

        let err = engine
            .try_calculate_bounding_boxes(
                BoundingBox::new(0.0, 0.0, 100.0, -1.0),
                CalculateOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidContainer { .. }));
    }

    #[test]
    fn test_cycle_returns_container_size() {
        let (_pool, mut engine) = engine();
        let anchored = |id: &str, target: &str| {
            Element::rectangle(id).with_options(LayoutOptions::new().with_anchor(
                AnchorConfig::to_element(target, AnchorPoint::TopLeft, AnchorPoint::BottomLeft),
            ))
        };
        engine.set_groups(vec![Group::new("g")
            .with_element(anchored("a", "b"))
            .with_element(anchored("b", "a"))]);

        let bounds = engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert_eq!(bounds, Size::new(600.0, 200.0));
        assert!(!engine.element("a").unwrap().layout.calculated);

        let err = engine
            .try_calculate_bounding_boxes(container(), CalculateOptions::default())
            .unwrap_err();
        assert!(err.cycle().is_some());
    }

    #[test]
    fn test_cycle_marks_every_element_unresolved() {
        let (_pool, mut engine) = engine();
        engine.add_group(Group::new("free").with_element(Element::rectangle("free")));
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert!(engine.unresolved_elements().is_empty());

        let anchored = |id: &str, target: &str| {
            Element::rectangle(id).with_options(LayoutOptions::new().with_anchor(
                AnchorConfig::to_element(target, AnchorPoint::TopLeft, AnchorPoint::TopRight),
            ))
        };
        engine.add_group(
            Group::new("loop")
                .with_element(anchored("a", "b"))
                .with_element(anchored("b", "a")),
        );
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());

        assert_eq!(engine.unresolved_elements(), &["free", "a", "b"]);
        assert!(engine.arena().iter().all(|e| !e.layout.calculated));
    }

    #[test]
    fn test_missing_references_reported_by_engine() {
        let (_pool, mut engine) = engine();
        engine.set_groups(vec![Group::new("g").with_element(
            Element::rectangle("bar").with_options(LayoutOptions::new().with_stretch(
                StretchDirective::new(StretchTarget::parse("ghost"), StretchEdge::right()),
            )),
        )]);
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());

        let missing = engine.missing_references();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].element, "bar");
        assert_eq!(missing[0].target, "ghost");
        assert_eq!(engine.unresolved_elements(), &["bar"]);

        engine.clear_layout();
        assert!(engine.missing_references().is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let (_pool, mut engine) = engine();
        engine.add_group(Group::new("one").with_element(Element::rectangle("a").with_size(10.0, 10.0)));
        engine.add_group(Group::new("two").with_element(Element::rectangle("a").with_size(20.0, 20.0)));

        assert_eq!(engine.arena().len(), 1);
        assert_eq!(engine.groups()[1].element_ids.len(), 0);
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert_eq!(engine.element("a").unwrap().layout.width, 10.0);
    }

    #[test]
    fn test_render_order_follows_groups() {
        let (_pool, mut engine) = engine();
        engine.set_groups(vec![
            Group::new("back")
                .with_element(Element::rectangle("z"))
                .with_element(Element::rectangle("y")),
            Group::new("front").with_element(Element::rectangle("x")),
        ]);
        let ids: Vec<&str> = engine
            .elements_in_render_order()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["z", "y", "x"]);

        engine.clear_layout();
        assert_eq!(engine.elements_in_render_order().count(), 0);
    }

    #[test]
    fn test_update_intrinsic_sizes_recalculates_dynamically() {
        let (_pool, mut engine) = engine();
        engine.add_group(Group::new("g").with_element(
            Element::rectangle("label").with_size(80.0, 20.0).with_options(
                LayoutOptions::new().with_anchor(AnchorConfig::to_container(
                    AnchorPoint::TopLeft,
                    AnchorPoint::TopLeft,
                )),
            ),
        ));
        engine.calculate_bounding_boxes(container(), CalculateOptions::default());

        let sizes = HashMap::from([("label".to_string(), Size::new(120.0, 260.0))]);
        let bounds = engine.update_intrinsic_sizes_and_recalculate(&sizes, container());

        let label = engine.element("label").unwrap();
        assert_eq!((label.layout.width, label.layout.height), (120.0, 260.0));
        assert_eq!(bounds, Size::new(600.0, 260.0));
        assert_eq!(engine.container_rect().unwrap().height, 260.0);
    }

    #[test]
    fn test_dynamic_height_reruns_against_grown_container() {
        let (_pool, mut engine) = engine();
        engine.set_groups(vec![Group::new("g")
            .with_element(Element::rectangle("tall").with_size(50.0, 300.0))
            .with_element(
                Element::rectangle("footer").with_size(600.0, 10.0).with_options(
                    LayoutOptions::new().with_anchor(AnchorConfig::to_container(
                        AnchorPoint::BottomLeft,
                        AnchorPoint::BottomLeft,
                    )),
                ),
            )]);

        let fixed = engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert_eq!(fixed.height, 200.0);
        assert_eq!(engine.element("footer").unwrap().layout.y, 190.0);

        let dynamic = engine.calculate_bounding_boxes(container(), CalculateOptions::dynamic_height());
        assert_eq!(dynamic.height, 300.0);
        assert_eq!(engine.element("footer").unwrap().layout.y, 290.0);
    }

    #[test]
    fn test_destroyed_engine_still_measures() {
        let pool = MeasurementPool::new();
        let mut engine = LayoutEngine::with_pool(&pool);
        assert_eq!(pool.active_handles(), 1);
        engine.destroy();
        assert_eq!(pool.active_handles(), 0);
        assert!(engine.measurement_surface().is_none());

        engine.add_group(Group::new("g").with_element(Element::rectangle("a")));
        let bounds = engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        assert_eq!(bounds, Size::new(600.0, 200.0));
        assert!(engine.element("a").unwrap().layout.calculated);
    }

    #[test]
    fn test_stretch_between_elements() {
        let (_pool, mut engine) = engine();
        engine.set_groups(vec![Group::new("g")
            .with_element(
                Element::rectangle("bar").with_size(10.0, 20.0).with_options(
                    LayoutOptions::new()
                        .with_anchor(AnchorConfig::to_element(
                            "left",
                            AnchorPoint::TopLeft,
                            AnchorPoint::TopRight,
                        ))
                        .with_stretch(
                            StretchDirective::new(
                                StretchTarget::Element("right".to_string()),
                                StretchEdge::left(),
                            )
                            .with_padding(4.0),
                        ),
                ),
            )
            .with_element(Element::rectangle("left").with_size(100.0, 20.0))
            .with_element(
                Element::rectangle("right").with_size(100.0, 20.0).with_options(
                    LayoutOptions::new()
                        .with_width(Dimension::Px(100.0))
                        .with_anchor(AnchorConfig::to_container(
                            AnchorPoint::TopRight,
                            AnchorPoint::TopRight,
                        )),
                ),
            )]);

        engine.calculate_bounding_boxes(container(), CalculateOptions::default());
        let bar = engine.element("bar").unwrap().layout;
        assert_eq!(bar.x, 100.0);
        assert_eq!(bar.right(), 496.0);
    }
}
