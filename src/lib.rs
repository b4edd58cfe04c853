//! lcars-layout - anchor/stretch layout for LCARS style SVG panels
//!
//! This library provides the layout engine, a TOML panel format and an SVG renderer.
//!
//! # Example
//!
//! ```rust
//! use lcars_layout::render;
//!
//! let svg = render(r#"
//! [[groups]]
//! id = "nav"
//! [[groups.elements]]
//! id = "bar"
//! type = "rectangle"
//! "#).unwrap();
//! assert!(svg.contains(r#"id="bar""#));
//! ```

pub mod error;
pub mod layout;
pub mod panel;
pub mod renderer;
pub mod stylesheet;

pub use error::PanelError;
pub use layout::{
    BoundingBox, CalculateOptions, Group, LayoutConfig, LayoutEngine, LayoutError, Size,
};
pub use panel::Panel;
pub use renderer::{render_svg, SvgConfig};
pub use stylesheet::Stylesheet;

use thiserror::Error;
use tracing::debug;

use layout::MeasurementPool;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("panel error: {0}")]
    Panel(#[from] PanelError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub layout: LayoutConfig,
    pub svg: SvgConfig,
    /// Stylesheet for colour tokens
    pub stylesheet: Stylesheet,
    /// Draw outlines and ids over every element
    pub debug: bool,
    /// Fail on dependency cycles and unresolved elements instead of rendering what resolved
    pub strict: bool,
    /// Grow the card to fit its content; also enabled by the panel's `dynamicHeight`
    pub dynamic_height: bool,
    /// Card size used where the panel's `[card]` leaves it out
    pub card: Size,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            debug: false,
            strict: false,
            dynamic_height: false,
            card: Size::new(600.0, 200.0),
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_dynamic_height(mut self, dynamic_height: bool) -> Self {
        self.dynamic_height = dynamic_height;
        self
    }

    pub fn with_card(mut self, width: f64, height: f64) -> Self {
        self.card = Size::new(width, height);
        self
    }
}

/// Render a TOML panel to SVG with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML panel to SVG
///
/// # Example
///
/// ```rust
/// use lcars_layout::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_card(400.0, 80.0)
///     .with_svg(SvgConfig::default().with_standalone(false));
///
/// let svg = render_with_config("", config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let panel = Panel::from_str(source)?;
    render_panel(&panel, &config)
}

/// Lay out and render an already decoded panel
pub fn render_panel(panel: &Panel, config: &RenderConfig) -> Result<String, RenderError> {
    let pool = MeasurementPool::global();
    let mut engine = LayoutEngine::with_pool(pool).with_config(config.layout.clone());
    if let Some(surface) = engine.measurement_surface() {
        panel.register_fonts(surface);
    }
    engine.set_groups(panel.groups.clone());

    let container = panel.container(config.card);
    let options = CalculateOptions {
        dynamic_height: config.dynamic_height || panel.dynamic_height,
    };

    let bounds = if config.strict {
        let bounds = engine.try_calculate_bounding_boxes(container, options)?;
        if let Some(id) = engine.unresolved_elements().first() {
            return Err(RenderError::Layout(LayoutError::unresolved(
                id.clone(),
                engine.unresolved_elements().len(),
            )));
        }
        bounds
    } else {
        engine.calculate_bounding_boxes(container, options)
    };

    if config.debug {
        for element in engine.elements_in_render_order() {
            let l = &element.layout;
            debug!(
                id = %element.id,
                calculated = l.calculated,
                "x={:.1} y={:.1} w={:.1} h={:.1}",
                l.x, l.y, l.width, l.height
            );
        }
    }

    let svg = render_svg(&engine, bounds, &config.svg, &config.stylesheet, config.debug);
    engine.destroy();
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r#"
[card]
width = 400
height = 60

[[groups]]
id = "header"

[[groups.elements]]
id = "bar"
type = "rectangle"
props = { height = 30, fill = "lcars-blue" }
layout = { width = "50%" }

[[groups.elements]]
id = "title"
type = "text"
props = { text = "OPS", fontSize = 20 }
layout = { anchor = { anchorTo = "bar", anchorPoint = "topLeft", targetAnchorPoint = "topRight" } }
"#;

    #[test]
    fn test_render_panel() {
        let svg = render(PANEL).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 400 60""#));
        assert!(svg.contains(r#"id="bar""#));
        assert!(svg.contains(r#"width="200""#));
        assert!(svg.contains(r#"fill="var(--lcars-blue)""#));
        assert!(svg.contains(">OPS</text>"));
    }

    #[test]
    fn test_render_invalid_panel() {
        let err = render("[[groups]]\nid = 3\n").unwrap_err();
        assert!(matches!(err, RenderError::Panel(PanelError::Toml(_))));
    }

    #[test]
    fn test_strict_mode_rejects_cycles() {
        let source = r#"
[[groups]]
id = "g"
[[groups.elements]]
id = "a"
type = "rectangle"
layout = { anchor = { anchorTo = "b" } }
[[groups.elements]]
id = "b"
type = "rectangle"
layout = { anchor = { anchorTo = "a" } }
"#;
        let svg = render(source).unwrap();
        assert!(!svg.contains(r#"id="a""#));

        let err = render_with_config(source, RenderConfig::new().with_strict(true)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_strict_mode_rejects_unresolved() {
        let source = r#"
[[groups]]
id = "g"
[[groups.elements]]
id = "a"
type = "rectangle"
layout = { anchor = { anchorTo = "ghost" } }
"#;
        assert!(render(source).is_ok());
        let err = render_with_config(source, RenderConfig::new().with_strict(true)).unwrap_err();
        assert!(err.to_string().contains("first unresolved: 'a'"));
    }

    #[test]
    fn test_dynamic_height_grows_card() {
        let source = r#"
[card]
width = 100
height = 50
[[groups]]
id = "g"
[[groups.elements]]
id = "tall"
type = "rectangle"
props = { height = 80 }
"#;
        let fixed = render(source).unwrap();
        assert!(fixed.contains(r#"viewBox="0 0 100 50""#));

        let grown = render_with_config(source, RenderConfig::new().with_dynamic_height(true)).unwrap();
        assert!(grown.contains(r#"viewBox="0 0 100 80""#));
    }
}
