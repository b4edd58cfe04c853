//! Configuration for SVG rendering

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Padding around the card in the viewBox
    pub viewbox_padding: f64,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "lcars-" for "lcars-rect")
    pub class_prefix: Option<String>,

    /// Fill used when an element has no `fill` prop
    pub default_fill: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 0.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("lcars-".to_string()),
            default_fill: "lcars-orange".to_string(),
        }
    }
}

impl SvgConfig {
    /// Configuration with the LCARS defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding added around the card in the viewBox
    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    /// Set whether the XML declaration is emitted
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether elements go on indented lines
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Set the fill token or colour for elements without a `fill` prop
    pub fn with_default_fill(mut self, fill: impl Into<String>) -> Self {
        self.default_fill = fill.into();
        self
    }
}
