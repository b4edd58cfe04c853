//! Elements, groups and the element arena
//!
//! An [`Element`] is a positionable box: an id, a kind, an opaque bag of rendering
//! props, its [`LayoutOptions`] and the intrinsic/computed sizes the engine fills in.
//! Per-kind behaviour is dispatched over the closed [`ElementKind`] enum.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::config::LayoutConfig;
use super::geometry;
use super::measurement::MeasurementSurface;
use super::types::{AnchorPoint, BoundingBox, Dimension, ElementLayout, IntrinsicSize, StretchEdge};

/// What an anchor is aligned against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnchorTarget {
    #[default]
    Container,
    Element(String),
}

impl AnchorTarget {
    /// `"container"` (or an empty string) is the container, anything else an element id
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "container" => Self::Container,
            id => Self::Element(id.to_string()),
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        match self {
            Self::Container => None,
            Self::Element(id) => Some(id),
        }
    }
}

/// Align this element's `anchor_point` to the target's `target_anchor_point`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnchorConfig {
    pub anchor_to: AnchorTarget,
    pub anchor_point: AnchorPoint,
    pub target_anchor_point: AnchorPoint,
}

impl AnchorConfig {
    pub fn to_container(anchor_point: AnchorPoint, target_anchor_point: AnchorPoint) -> Self {
        Self {
            anchor_to: AnchorTarget::Container,
            anchor_point,
            target_anchor_point,
        }
    }

    pub fn to_element(
        id: impl Into<String>,
        anchor_point: AnchorPoint,
        target_anchor_point: AnchorPoint,
    ) -> Self {
        Self {
            anchor_to: AnchorTarget::Element(id.into()),
            anchor_point,
            target_anchor_point,
        }
    }
}

/// What a stretch directive pulls towards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StretchTarget {
    Container,
    /// The whole drawing surface; resolved like the container
    Canvas,
    Element(String),
}

impl StretchTarget {
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "container" => Self::Container,
            "canvas" => Self::Canvas,
            id => Self::Element(id.to_string()),
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        match self {
            Self::Element(id) => Some(id),
            Self::Container | Self::Canvas => None,
        }
    }
}

/// Pull one edge of the element to a coordinate on the target
#[derive(Debug, Clone, PartialEq)]
pub struct StretchDirective {
    pub target: StretchTarget,
    pub target_edge: StretchEdge,
    /// Inward margin kept between the moved edge and the target coordinate
    pub padding: f64,
}

impl StretchDirective {
    pub fn new(target: StretchTarget, target_edge: StretchEdge) -> Self {
        Self {
            target,
            target_edge,
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StretchConfig {
    pub stretch_to1: Option<StretchDirective>,
    pub stretch_to2: Option<StretchDirective>,
}

impl StretchConfig {
    /// Directives in application order
    pub fn directives(&self) -> impl Iterator<Item = &StretchDirective> {
        self.stretch_to1.iter().chain(self.stretch_to2.iter())
    }
}

/// Per-element layout options: anchor, stretch, offsets and explicit size
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutOptions {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub offset_x: Option<Dimension>,
    pub offset_y: Option<Dimension>,
    pub anchor: Option<AnchorConfig>,
    pub stretch: StretchConfig,
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: Dimension) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_offset(mut self, x: Dimension, y: Dimension) -> Self {
        self.offset_x = Some(x);
        self.offset_y = Some(y);
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorConfig) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Set the first free stretch slot; a third directive replaces the second
    pub fn with_stretch(mut self, directive: StretchDirective) -> Self {
        if self.stretch.stretch_to1.is_none() {
            self.stretch.stretch_to1 = Some(directive);
        } else {
            self.stretch.stretch_to2 = Some(directive);
        }
        self
    }

    /// Id of the anchor target when it is another element
    pub fn anchor_element(&self) -> Option<&str> {
        self.anchor.as_ref().and_then(|a| a.anchor_to.element_id())
    }
}

/// A rendering prop value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

/// Rendering-facing key/value bag; the engine reads only `width` and `height`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(PropValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(PropValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(PropValue::Bool(true)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Side an endcap's rounded or chiselled end faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

/// Corner of the box an elbow bends around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElbowOrientation {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// The closed set of primitive element kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Rectangle,
    Text {
        text: String,
        font_size: Option<f64>,
        font_family: Option<String>,
    },
    Endcap {
        direction: Direction,
    },
    ChiselEndcap {
        direction: Direction,
    },
    Elbow {
        orientation: ElbowOrientation,
    },
}

impl ElementKind {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            font_size: None,
            font_family: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Text { .. } => "text",
            Self::Endcap { .. } => "endcap",
            Self::ChiselEndcap { .. } => "chisel-endcap",
            Self::Elbow { .. } => "elbow",
        }
    }

    /// Endcaps take their height from the element they are anchored to
    pub fn borrows_height_from_anchor(&self) -> bool {
        matches!(self, Self::Endcap { .. } | Self::ChiselEndcap { .. })
    }
}

/// A positionable box in the layout
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub props: Props,
    pub options: LayoutOptions,
    pub intrinsic_size: IntrinsicSize,
    pub layout: ElementLayout,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            props: Props::new(),
            options: LayoutOptions::new(),
            intrinsic_size: IntrinsicSize::default(),
            layout: ElementLayout::default(),
        }
    }

    pub fn rectangle(id: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Rectangle)
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for a `width`/`height` props hint
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.props.insert("width", PropValue::Number(width));
        self.props.insert("height", PropValue::Number(height));
        self
    }

    pub fn reset_layout(&mut self) {
        self.layout = ElementLayout::default();
    }

    /// Force the next calculation to measure this element again
    pub fn invalidate_intrinsic_size(&mut self) {
        self.intrinsic_size = IntrinsicSize::default();
    }

    /// Whether width/height were declared rather than measured
    pub fn has_explicit_height(&self) -> bool {
        self.props.number("height").is_some() || self.options.height.is_some()
    }

    /// Whether this element takes its height from its anchor target during layout
    pub fn borrows_height(&self) -> bool {
        self.kind.borrows_height_from_anchor()
            && self.intrinsic_size.height <= 0.0
            && !self.has_explicit_height()
            && self.options.anchor_element().is_some()
    }

    /// Compute the natural size: props hints, then absolute layout sizes, then
    /// text measurement or the kind's defaults.
    pub fn calculate_intrinsic_size(&mut self, surface: &MeasurementSurface, config: &LayoutConfig) {
        let hint_width = self
            .props
            .number("width")
            .or_else(|| self.options.width.and_then(|w| w.as_px()));
        let hint_height = self
            .props
            .number("height")
            .or_else(|| self.options.height.and_then(|h| h.as_px()));

        let (default_width, default_height) = match &self.kind {
            ElementKind::Rectangle => config.default_rect_size,
            ElementKind::Text {
                text,
                font_size,
                font_family,
            } => {
                let size = font_size
                    .or_else(|| self.props.number("fontSize"))
                    .unwrap_or(config.default_font_size);
                let measured =
                    surface.measure_text(text, size, font_family.as_deref(), config);
                (measured.width, measured.height)
            }
            ElementKind::Endcap { .. } | ElementKind::ChiselEndcap { .. } => {
                (config.default_endcap_width, 0.0)
            }
            ElementKind::Elbow { .. } => config.default_elbow_size,
        };

        self.intrinsic_size = IntrinsicSize::resolved(
            hint_width.unwrap_or(default_width),
            hint_height.unwrap_or(default_height),
        );
        debug!(
            id = %self.id,
            kind = self.kind.name(),
            width = self.intrinsic_size.width,
            height = self.intrinsic_size.height,
            "intrinsic size"
        );
    }

    /// Ids this element needs calculated before it can be positioned, in declaration order
    pub fn referenced_ids(&self) -> Vec<&str> {
        self.options
            .anchor_element()
            .into_iter()
            .chain(self.options.stretch.directives().filter_map(|d| d.target.element_id()))
            .collect()
    }

    /// Check that every referenced element exists and is calculated.
    ///
    /// Unmet dependency ids are pushed onto `missing`.
    pub fn can_calculate_layout(&self, arena: &ElementArena, missing: &mut Vec<String>) -> bool {
        let before = missing.len();
        for id in self.referenced_ids() {
            let ready = arena.get(id).is_some_and(|e| e.layout.calculated);
            if !ready && !missing.iter().any(|m| m == id) {
                missing.push(id.to_string());
            }
        }
        missing.len() == before
    }

    /// Resolve this element's box against the arena and container.
    ///
    /// Returns `None` while dependencies are unmet; the caller stores the result.
    pub fn calculate_layout(
        &self,
        arena: &ElementArena,
        container: &BoundingBox,
    ) -> Option<ElementLayout> {
        let mut missing = vec![];
        if !self.can_calculate_layout(arena, &mut missing) {
            debug!(id = %self.id, waiting_on = ?missing, "dependencies not ready");
            return None;
        }
        Some(geometry::resolve_layout(self, arena, container))
    }
}

/// A named ordered collection of elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub id: String,
    pub elements: Vec<Element>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: vec![],
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

/// Elements of all groups, flattened and keyed by id
#[derive(Debug, Clone, Default)]
pub struct ElementArena {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
}

impl ElementArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element; returns false (and leaves the arena unchanged) on a duplicate id
    pub fn insert(&mut self, element: Element) -> bool {
        if self.index.contains_key(&element.id) {
            return false;
        }
        self.index.insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.index.get(id).map(|&i| &mut self.elements[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Elements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculated(mut element: Element, x: f64, y: f64, w: f64, h: f64) -> Element {
        element.layout = ElementLayout::from_bounds(BoundingBox::new(x, y, w, h));
        element
    }

    #[test]
    fn test_anchor_target_parse() {
        assert_eq!(AnchorTarget::parse("container"), AnchorTarget::Container);
        assert_eq!(
            AnchorTarget::parse("header"),
            AnchorTarget::Element("header".to_string())
        );
        assert_eq!(StretchTarget::parse("canvas"), StretchTarget::Canvas);
        assert_eq!(StretchTarget::parse("canvas").element_id(), None);
    }

    #[test]
    fn test_intrinsic_size_prefers_props() {
        let surface = MeasurementSurface::new();
        let config = LayoutConfig::default();

        let mut rect = Element::rectangle("a").with_size(40.0, 20.0);
        rect.calculate_intrinsic_size(&surface, &config);
        assert_eq!(rect.intrinsic_size, IntrinsicSize::resolved(40.0, 20.0));

        let mut bare = Element::rectangle("b");
        bare.calculate_intrinsic_size(&surface, &config);
        assert_eq!(bare.intrinsic_size, IntrinsicSize::resolved(100.0, 30.0));
    }

    #[test]
    fn test_intrinsic_size_text_and_endcap() {
        let surface = MeasurementSurface::new();
        let config = LayoutConfig::default();

        let mut text = Element::new("t", ElementKind::text("ABCDE"))
            .with_props(Props::new().with("fontSize", PropValue::Number(20.0)));
        text.calculate_intrinsic_size(&surface, &config);
        assert_eq!(text.intrinsic_size, IntrinsicSize::resolved(60.0, 24.0));

        let mut cap = Element::new(
            "cap",
            ElementKind::Endcap {
                direction: Direction::Left,
            },
        );
        cap.calculate_intrinsic_size(&surface, &config);
        assert_eq!(cap.intrinsic_size, IntrinsicSize::resolved(40.0, 0.0));
    }

    #[test]
    fn test_borrows_height_only_when_anchored_and_unsized() {
        let surface = MeasurementSurface::new();
        let config = LayoutConfig::default();
        let endcap = ElementKind::Endcap {
            direction: Direction::Left,
        };

        let mut anchored = Element::new("cap", endcap.clone()).with_options(
            LayoutOptions::new().with_anchor(AnchorConfig::to_element(
                "bar",
                AnchorPoint::TopRight,
                AnchorPoint::TopLeft,
            )),
        );
        anchored.calculate_intrinsic_size(&surface, &config);
        assert!(anchored.borrows_height());

        let mut sized = anchored.clone().with_size(40.0, 30.0);
        sized.calculate_intrinsic_size(&surface, &config);
        assert!(!sized.borrows_height());

        let mut free = Element::new("free", endcap);
        free.calculate_intrinsic_size(&surface, &config);
        assert!(!free.borrows_height());
    }

    #[test]
    fn test_can_calculate_layout_reports_missing() {
        let mut arena = ElementArena::new();
        arena.insert(calculated(Element::rectangle("ready"), 0.0, 0.0, 10.0, 10.0));
        arena.insert(Element::rectangle("pending"));

        let element = Element::rectangle("e").with_options(
            LayoutOptions::new()
                .with_anchor(AnchorConfig::to_element(
                    "ready",
                    AnchorPoint::TopLeft,
                    AnchorPoint::TopRight,
                ))
                .with_stretch(StretchDirective::new(
                    StretchTarget::Element("pending".to_string()),
                    StretchEdge::right(),
                ))
                .with_stretch(StretchDirective::new(
                    StretchTarget::Element("ghost".to_string()),
                    StretchEdge::bottom(),
                )),
        );

        let mut missing = vec![];
        assert!(!element.can_calculate_layout(&arena, &mut missing));
        assert_eq!(missing, vec!["pending".to_string(), "ghost".to_string()]);
        assert!(element.calculate_layout(&arena, &BoundingBox::new(0.0, 0.0, 100.0, 100.0)).is_none());
    }

    #[test]
    fn test_arena_rejects_duplicates() {
        let mut arena = ElementArena::new();
        assert!(arena.insert(Element::rectangle("a")));
        assert!(!arena.insert(Element::rectangle("a").with_size(5.0, 5.0)));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get("a").unwrap().props.number("width"), None);
    }
}
