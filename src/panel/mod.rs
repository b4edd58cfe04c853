//! Panel description files
//!
//! A panel is a TOML document declaring the card size, optional font metrics and
//! the groups of elements to lay out. [`Panel::from_str`] decodes it into engine
//! [`Group`]s; anchor points, stretch edges and dimensions are validated here so
//! that errors point at the offending element.

mod schema;

use std::path::Path;

use tracing::debug;

use crate::error::PanelError;
use crate::layout::{
    AnchorConfig, AnchorPoint, AnchorTarget, BoundingBox, Dimension, Direction, ElbowOrientation,
    Element, ElementKind, FontMetrics, Group, LayoutOptions, MeasurementSurface, PropValue, Props,
    Size, StretchDirective, StretchEdge, StretchTarget,
};

use schema::{
    AnchorSection, DimensionSection, ElementSection, GroupSection, LayoutSection, PanelFile,
    PropSection, StretchDirectiveSection,
};

/// A decoded panel
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Card width from `[card]`, if declared
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub dynamic_height: bool,
    pub fonts: Vec<(String, FontMetrics)>,
    pub groups: Vec<Group>,
}

impl Panel {
    /// Load a panel from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PanelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a panel from a TOML string
    pub fn from_str(content: &str) -> Result<Self, PanelError> {
        let file: PanelFile = toml::from_str(content)?;

        let groups = file
            .groups
            .into_iter()
            .map(convert_group)
            .collect::<Result<Vec<_>, _>>()?;
        let fonts = file
            .fonts
            .into_iter()
            .map(|(family, f)| (family, FontMetrics::new(f.char_width, f.line_height)))
            .collect();

        debug!(groups = groups.len(), "decoded panel");
        Ok(Panel {
            width: file.card.width,
            height: file.card.height,
            dynamic_height: file.card.dynamic_height.unwrap_or(false),
            fonts,
            groups,
        })
    }

    /// Make the panel's font metrics available for text measurement
    pub fn register_fonts(&self, surface: &MeasurementSurface) {
        for (family, metrics) in &self.fonts {
            surface.register_font(family.clone(), *metrics);
        }
    }

    /// Container rect, with `fallback` filling dimensions the card leaves out
    pub fn container(&self, fallback: Size) -> BoundingBox {
        BoundingBox::new(
            0.0,
            0.0,
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }
}

fn convert_group(section: GroupSection) -> Result<Group, PanelError> {
    let elements = section
        .elements
        .into_iter()
        .map(convert_element)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Group {
        id: section.id,
        elements,
    })
}

fn convert_element(section: ElementSection) -> Result<Element, PanelError> {
    let id = section.id;
    let props = convert_props(section.props);
    let kind = element_kind(&id, &section.kind, &props)?;
    let options = convert_layout(&id, section.layout)?;
    Ok(Element::new(id, kind).with_props(props).with_options(options))
}

fn convert_props(section: impl IntoIterator<Item = (String, PropSection)>) -> Props {
    let mut props = Props::new();
    for (key, value) in section {
        let value = match value {
            PropSection::Bool(b) => PropValue::Bool(b),
            PropSection::Number(n) => PropValue::Number(n),
            PropSection::Text(s) => PropValue::Text(s),
        };
        props.insert(key, value);
    }
    props
}

fn element_kind(id: &str, name: &str, props: &Props) -> Result<ElementKind, PanelError> {
    match name {
        "rectangle" | "rect" => Ok(ElementKind::Rectangle),
        "text" => Ok(ElementKind::Text {
            text: props.text("text").unwrap_or_default().to_string(),
            font_size: props.number("fontSize"),
            font_family: props.text("fontFamily").map(str::to_string),
        }),
        "endcap" => Ok(ElementKind::Endcap {
            direction: direction(id, props)?,
        }),
        "chisel-endcap" => Ok(ElementKind::ChiselEndcap {
            direction: direction(id, props)?,
        }),
        "elbow" => Ok(ElementKind::Elbow {
            orientation: orientation(id, props)?,
        }),
        other => Err(PanelError::invalid(
            id,
            format!(
                "unknown element type '{}', expected one of rectangle, text, endcap, chisel-endcap, elbow",
                other
            ),
        )),
    }
}

fn direction(id: &str, props: &Props) -> Result<Direction, PanelError> {
    match props.text("direction") {
        None | Some("left") => Ok(Direction::Left),
        Some("right") => Ok(Direction::Right),
        Some(other) => Err(PanelError::invalid(
            id,
            format!("direction must be 'left' or 'right', got '{}'", other),
        )),
    }
}

fn orientation(id: &str, props: &Props) -> Result<ElbowOrientation, PanelError> {
    match props.text("orientation") {
        None | Some("topLeft") => Ok(ElbowOrientation::TopLeft),
        Some("topRight") => Ok(ElbowOrientation::TopRight),
        Some("bottomLeft") => Ok(ElbowOrientation::BottomLeft),
        Some("bottomRight") => Ok(ElbowOrientation::BottomRight),
        Some(other) => Err(PanelError::invalid(
            id,
            format!(
                "orientation must be one of topLeft, topRight, bottomLeft, bottomRight, got '{}'",
                other
            ),
        )),
    }
}

fn convert_layout(id: &str, section: LayoutSection) -> Result<LayoutOptions, PanelError> {
    let mut options = LayoutOptions {
        width: dimension(id, "width", section.width)?,
        height: dimension(id, "height", section.height)?,
        offset_x: dimension(id, "offsetX", section.offset_x)?,
        offset_y: dimension(id, "offsetY", section.offset_y)?,
        anchor: section.anchor.map(|a| anchor(id, a)).transpose()?,
        ..LayoutOptions::default()
    };
    if let Some(stretch) = section.stretch {
        options.stretch.stretch_to1 = stretch.stretch_to1.map(|s| directive(id, s)).transpose()?;
        options.stretch.stretch_to2 = stretch.stretch_to2.map(|s| directive(id, s)).transpose()?;
    }
    Ok(options)
}

fn dimension(
    id: &str,
    field: &str,
    value: Option<DimensionSection>,
) -> Result<Option<Dimension>, PanelError> {
    value
        .map(|v| match v {
            DimensionSection::Number(n) => Ok(Dimension::Px(n)),
            DimensionSection::Text(s) => s
                .parse::<Dimension>()
                .map_err(|e| PanelError::invalid(id, format!("{}: {}", field, e))),
        })
        .transpose()
}

/// A missing `targetAnchorPoint` mirrors `anchorPoint`
fn anchor(id: &str, section: AnchorSection) -> Result<AnchorConfig, PanelError> {
    let own_point = anchor_point(id, section.anchor_point.as_deref())?.unwrap_or_default();
    let target_point =
        anchor_point(id, section.target_anchor_point.as_deref())?.unwrap_or(own_point);
    Ok(AnchorConfig {
        anchor_to: AnchorTarget::parse(section.anchor_to.as_deref().unwrap_or("container")),
        anchor_point: own_point,
        target_anchor_point: target_point,
    })
}

fn anchor_point(id: &str, value: Option<&str>) -> Result<Option<AnchorPoint>, PanelError> {
    value
        .map(|v| v.parse::<AnchorPoint>().map_err(|e| PanelError::invalid(id, e.to_string())))
        .transpose()
}

fn directive(id: &str, section: StretchDirectiveSection) -> Result<StretchDirective, PanelError> {
    let edge = section
        .target_edge
        .parse::<StretchEdge>()
        .map_err(|e| PanelError::invalid(id, e.to_string()))?;
    Ok(StretchDirective::new(StretchTarget::parse(&section.target), edge)
        .with_padding(section.padding))
}
