//! Configuration for the layout engine

/// Tunables for intrinsic sizing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Size of a rectangle without width/height hints (width, height)
    pub default_rect_size: (f64, f64),

    /// Width of an endcap without a width hint; its height is borrowed from the anchor target
    pub default_endcap_width: f64,

    /// Size of an elbow without width/height hints (width, height)
    pub default_elbow_size: (f64, f64),

    /// Font size used for text elements that do not declare one
    pub default_font_size: f64,

    /// Fallback glyph advance as a fraction of the font size, used when no font metrics are loaded
    pub char_width_ratio: f64,

    /// Fallback line height as a fraction of the font size
    pub line_height_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_rect_size: (100.0, 30.0),
            default_endcap_width: 40.0,
            default_elbow_size: (150.0, 100.0),
            default_font_size: 16.0,
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default rectangle size
    pub fn with_rect_size(mut self, width: f64, height: f64) -> Self {
        self.default_rect_size = (width, height);
        self
    }

    /// Set the default endcap width
    pub fn with_endcap_width(mut self, width: f64) -> Self {
        self.default_endcap_width = width;
        self
    }

    /// Set the default elbow size
    pub fn with_elbow_size(mut self, width: f64, height: f64) -> Self {
        self.default_elbow_size = (width, height);
        self
    }

    /// Set the default font size
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.default_font_size = size;
        self
    }

    /// Set the fallback text metrics ratios
    pub fn with_text_fallback(mut self, char_width_ratio: f64, line_height_ratio: f64) -> Self {
        self.char_width_ratio = char_width_ratio;
        self.line_height_ratio = line_height_ratio;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.default_rect_size, (100.0, 30.0));
        assert_eq!(config.default_endcap_width, 40.0);
        assert_eq!(config.default_elbow_size, (150.0, 100.0));
        assert_eq!(config.default_font_size, 16.0);
        assert_eq!(config.char_width_ratio, 0.6);
        assert_eq!(config.line_height_ratio, 1.2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_rect_size(150.0, 75.0)
            .with_font_size(20.0)
            .with_text_fallback(0.5, 1.0);

        assert_eq!(config.default_rect_size, (150.0, 75.0));
        assert_eq!(config.default_font_size, 20.0);
        assert_eq!(config.char_width_ratio, 0.5);
        assert_eq!(config.line_height_ratio, 1.0);
    }
}
