//! SVG generation from a laid-out engine

use tracing::debug;

use crate::layout::{BoundingBox, Element, ElementKind, LayoutEngine, Props, Size};
use crate::stylesheet::Stylesheet;

use super::path::{chisel_endcap_path, elbow_path, endcap_path};
use super::SvgConfig;

/// Horizontal alignment of a text element inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn from_prop(value: Option<&str>) -> Self {
        match value {
            Some("middle") => TextAnchor::Middle,
            Some("end") => TextAnchor::End,
            _ => TextAnchor::Start,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    overlays: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            overlays: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet) {
        let mut css = String::from(":root {\n");
        for (token, value) in &stylesheet.colors {
            css.push_str(&format!("      --{}: {};\n", token, value));
        }
        css.push_str("    }");
        self.styles.push(css);
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, kind: &str) -> String {
        let prefix = self.prefix();
        format!("{prefix}element {prefix}{kind}")
    }

    /// Add a rectangle, optionally with rounded corners
    pub fn add_rect(&mut self, id: &str, bounds: &BoundingBox, rx: Option<f64>, styles: &str) {
        let rx_attr = rx.map(|r| format!(r#" rx="{}""#, r)).unwrap_or_default();
        self.elements.push(format!(
            r#"{}<rect id="{}" class="{}" x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            self.indent_str(),
            escape_xml(id),
            self.class_list("rect"),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            rx_attr,
            styles
        ));
    }

    /// Add a path shape
    pub fn add_path(&mut self, id: &str, kind: &str, d: &str, styles: &str) {
        self.elements.push(format!(
            r#"{}<path id="{}" class="{}" d="{}"{}/>"#,
            self.indent_str(),
            escape_xml(id),
            self.class_list(kind),
            d,
            styles
        ));
    }

    /// Add a text element, vertically centred on `y`
    pub fn add_text(
        &mut self,
        id: &str,
        text: &str,
        x: f64,
        y: f64,
        anchor: TextAnchor,
        styles: &str,
    ) {
        self.elements.push(format!(
            r#"{}<text id="{}" class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            escape_xml(id),
            self.class_list("text"),
            x,
            y,
            anchor.as_str(),
            styles,
            escape_xml(text)
        ));
    }

    /// Dashed outline and id label drawn above every element
    pub fn add_debug_outline(&mut self, id: &str, bounds: &BoundingBox) {
        let prefix = self.prefix();
        let indent = self.indent_str();
        self.overlays.push(format!(
            r#"{}<rect class="{}debug" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="magenta" stroke-dasharray="4 2"/>"#,
            indent, prefix, bounds.x, bounds.y, bounds.width, bounds.height
        ));
        self.overlays.push(format!(
            r#"{}<text class="{}debug-label" x="{}" y="{}" font-size="8" fill="magenta">{}</text>"#,
            indent,
            prefix,
            bounds.x + 2.0,
            bounds.y + 8.0,
            escape_xml(id)
        ));
    }

    pub fn start_group(&mut self, id: &str) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<g id="{}" class="{}group">"#,
            self.indent_str(),
            escape_xml(id),
            prefix
        ));
        self.indent += 1;
    }

    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string for a card of `size`
    pub fn build(self, size: Size) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = 0.0 - padding;
        let vb_w = size.width + 2.0 * padding;
        let vb_h = size.height + 2.0 * padding;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}">"#,
            vb_x, vb_x, vb_w, vb_h, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in self.elements.iter().chain(&self.overlays) {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render every calculated element of `engine`, in group order, to an SVG string
pub fn render_svg(
    engine: &LayoutEngine,
    bounds: Size,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
    debug_outlines: bool,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_stylesheet(stylesheet);

    for group in engine.groups() {
        builder.start_group(&group.id);
        for id in &group.element_ids {
            let Some(element) = engine.element(id) else {
                continue;
            };
            if !element.layout.calculated {
                debug!(id = %element.id, "skipping uncalculated element");
                continue;
            }
            render_element(element, &mut builder, config, stylesheet);
            if debug_outlines {
                builder.add_debug_outline(&element.id, &element.layout.bounds());
            }
        }
        builder.end_group();
    }

    builder.build(bounds)
}

fn render_element(
    element: &Element,
    builder: &mut SvgBuilder,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) {
    let bounds = element.layout.bounds();
    let props = &element.props;
    let styles = format_styles(props, config, stylesheet);

    match &element.kind {
        ElementKind::Rectangle => {
            let rx = props.number("rx").or_else(|| props.number("cornerRadius"));
            builder.add_rect(&element.id, &bounds, rx, &styles);
        }
        ElementKind::Text {
            text,
            font_size,
            font_family,
        } => {
            let anchor = TextAnchor::from_prop(props.text("textAnchor"));
            let x = match anchor {
                TextAnchor::Start => bounds.x,
                TextAnchor::Middle => bounds.x + bounds.width / 2.0,
                TextAnchor::End => bounds.right(),
            };
            let mut text_styles = styles;
            if let Some(size) = font_size.or_else(|| props.number("fontSize")) {
                text_styles.push_str(&format!(r#" font-size="{}""#, size));
            }
            if let Some(family) = font_family {
                text_styles.push_str(&format!(r#" font-family="{}""#, escape_xml(family)));
            }
            builder.add_text(
                &element.id,
                text,
                x,
                bounds.y + bounds.height / 2.0,
                anchor,
                &text_styles,
            );
        }
        ElementKind::Endcap { direction } => {
            let d = endcap_path(&bounds, *direction).to_svg_d();
            builder.add_path(&element.id, "endcap", &d, &styles);
        }
        ElementKind::ChiselEndcap { direction } => {
            let d = chisel_endcap_path(&bounds, *direction).to_svg_d();
            builder.add_path(&element.id, "chisel-endcap", &d, &styles);
        }
        ElementKind::Elbow { orientation } => {
            let arm = props
                .number("armHeight")
                .unwrap_or_else(|| bounds.height.min(30.0));
            let bar = props
                .number("barWidth")
                .unwrap_or_else(|| bounds.width.min(120.0));
            let d = elbow_path(&bounds, *orientation, arm, bar).to_svg_d();
            builder.add_path(&element.id, "elbow", &d, &styles);
        }
    }
}

/// Format fill/stroke props as SVG attributes
fn format_styles(props: &Props, config: &SvgConfig, stylesheet: &Stylesheet) -> String {
    let fill = props.text("fill").unwrap_or(&config.default_fill);
    let mut parts = vec![format!(r#" fill="{}""#, stylesheet.css_value(fill))];
    if let Some(stroke) = props.text("stroke") {
        parts.push(format!(r#" stroke="{}""#, stylesheet.css_value(stroke)));
    }
    if let Some(sw) = props.number("strokeWidth") {
        parts.push(format!(r#" stroke-width="{}""#, sw));
    }
    if let Some(op) = props.number("opacity") {
        if op < 1.0 {
            parts.push(format!(r#" opacity="{}""#, op));
        }
    }
    parts.join("")
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        AnchorConfig, AnchorPoint, CalculateOptions, Direction, Group, LayoutOptions,
        MeasurementPool, PropValue,
    };

    fn card() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 300.0, 60.0)
    }

    fn laid_out(groups: Vec<Group>) -> (MeasurementPool, LayoutEngine, Size) {
        let pool = MeasurementPool::new();
        let mut engine = LayoutEngine::with_pool(&pool);
        engine.set_groups(groups);
        let bounds = engine.calculate_bounding_boxes(card(), CalculateOptions::default());
        (pool, engine, bounds)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_format_styles_uses_tokens() {
        let props = Props::new()
            .with("stroke", PropValue::Text("#000".to_string()))
            .with("strokeWidth", PropValue::Number(2.0))
            .with("opacity", PropValue::Number(0.5));
        let styles = format_styles(&props, &SvgConfig::default(), &Stylesheet::default());
        assert_eq!(
            styles,
            r##" fill="var(--lcars-orange)" stroke="#000" stroke-width="2" opacity="0.5""##
        );
    }

    #[test]
    fn test_unknown_fill_token_uses_fallback_colour() {
        let props = Props::new().with("fill", PropValue::Text("lcars-missing".to_string()));
        let styles = format_styles(&props, &SvgConfig::default(), &Stylesheet::default());
        assert_eq!(styles, r##" fill="#ff9900""##);
    }

    #[test]
    fn test_render_rect_in_group() {
        let (_pool, engine, bounds) = laid_out(vec![Group::new("nav").with_element(
            crate::layout::Element::rectangle("bar").with_props(
                    Props::new()
                        .with("width", PropValue::Number(100.0))
                        .with("height", PropValue::Number(20.0))
                        .with("rx", PropValue::Number(4.0)),
                ),
        )]);
        let svg = render_svg(&engine, bounds, &SvgConfig::default(), &Stylesheet::default(), false);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 300 60""#));
        assert!(svg.contains("--lcars-orange: #ff9900;"));
        assert!(svg.contains(r#"<g id="nav" class="lcars-group">"#));
        assert!(svg.contains(
            r#"<rect id="bar" class="lcars-element lcars-rect" x="0" y="0" width="100" height="20" rx="4" fill="var(--lcars-orange)"/>"#
        ));
        assert!(!svg.contains("lcars-debug"));
    }

    #[test]
    fn test_render_text_and_endcap() {
        let (_pool, engine, bounds) = laid_out(vec![Group::new("g")
            .with_element(
                crate::layout::Element::new("cap", ElementKind::Endcap { direction: Direction::Left })
                    .with_options(LayoutOptions::new().with_anchor(AnchorConfig::to_element(
                        "bar",
                        AnchorPoint::TopRight,
                        AnchorPoint::TopLeft,
                    ))),
            )
            .with_element(
                crate::layout::Element::rectangle("bar")
                    .with_size(100.0, 30.0)
                    .with_options(LayoutOptions::new().with_anchor(AnchorConfig::to_container(
                        AnchorPoint::TopRight,
                        AnchorPoint::TopRight,
                    ))),
            )
            .with_element(
                crate::layout::Element::new("label", ElementKind::text("A & B"))
                    .with_props(Props::new().with("textAnchor", PropValue::Text("end".to_string()))),
            )]);
        let svg = render_svg(&engine, bounds, &SvgConfig::default(), &Stylesheet::default(), true);

        // bar spans 200..300, the cap sits left of it at the bar's height
        assert!(svg.contains(
            r#"<path id="cap" class="lcars-element lcars-endcap" d="M175.00 0.00 L200.00 0.00 L200.00 30.00 L175.00 30.00 A15.00 15.00 0 0 1 175.00 0.00 Z""#
        ));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains(">A &amp; B</text>"));
        assert!(svg.contains("lcars-debug"));
    }

    #[test]
    fn test_uncalculated_elements_are_skipped() {
        let (_pool, engine, bounds) = laid_out(vec![Group::new("g").with_element(
            crate::layout::Element::rectangle("orphan").with_options(LayoutOptions::new().with_anchor(
                AnchorConfig::to_element("ghost", AnchorPoint::TopLeft, AnchorPoint::TopLeft),
            )),
        )]);
        let svg = render_svg(&engine, bounds, &SvgConfig::default(), &Stylesheet::default(), false);
        assert!(!svg.contains("orphan"));
    }
}
