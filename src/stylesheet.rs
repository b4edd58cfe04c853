//! LCARS colour palette
//!
//! Panels refer to colours by token (`lcars-orange`, `lcars-card-bg`, ...). The
//! stylesheet maps tokens to concrete colours and is emitted as CSS custom
//! properties, so a panel can be re-themed without touching its description.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping colour tokens to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Token name -> colour, ordered for stable output
    pub colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Classic LCARS panel colours
const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("lcars-orange", "#ff9900"),
    ("lcars-golden-orange", "#ff9966"),
    ("lcars-peach", "#ffcc99"),
    ("lcars-african-violet", "#cc99cc"),
    ("lcars-lilac", "#cc99ff"),
    ("lcars-blue", "#9999ff"),
    ("lcars-ice", "#99ccff"),
    ("lcars-red", "#cc6666"),
    ("lcars-tan", "#ffcc66"),
    ("lcars-card-bg", "#000000"),
    ("lcars-text", "#ffffff"),
    ("lcars-text-dark", "#000000"),
];

/// Colour used for tokens the palette does not define
const FALLBACK_COLOR: &str = "#ff9900";

/// Values with this prefix are palette tokens rather than literal colours
const TOKEN_PREFIX: &str = "lcars-";

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string; tokens it leaves out keep their default colour
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        let mut stylesheet = Self::default();
        stylesheet.name = parsed.metadata.as_ref().and_then(|m| m.name.clone());
        stylesheet.description = parsed.metadata.as_ref().and_then(|m| m.description.clone());
        stylesheet.colors.extend(parsed.colors);
        Ok(stylesheet)
    }

    /// Resolve a colour token to a concrete value
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token, falling back to the default LCARS orange
    pub fn resolve_or_default(&self, token: &str) -> &str {
        self.resolve(token).unwrap_or(FALLBACK_COLOR)
    }

    /// Attribute value for a fill/stroke prop: known tokens become `var(--token)`,
    /// unknown `lcars-` tokens fall back to the default colour, anything else
    /// (hex, named colours) passes through
    pub fn css_value(&self, value: &str) -> String {
        if self.colors.contains_key(value) {
            format!("var(--{})", value)
        } else if value.starts_with(TOKEN_PREFIX) {
            warn!(token = value, "unknown colour token, using fallback colour");
            self.resolve_or_default(value).to_string()
        } else {
            value.to_string()
        }
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            name: Some("lcars".to_string()),
            description: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(token, color)| (token.to_string(), color.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("lcars-orange"), Some("#ff9900"));
        assert_eq!(stylesheet.resolve("lcars-card-bg"), Some("#000000"));
        assert_eq!(stylesheet.resolve("nonexistent"), None);
    }

    #[test]
    fn test_resolve_or_default_fallback() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve_or_default("lcars-blue"), "#9999ff");
        assert_eq!(stylesheet.resolve_or_default("unknown"), FALLBACK_COLOR);
    }

    #[test]
    fn test_css_value() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.css_value("lcars-lilac"), "var(--lcars-lilac)");
        assert_eq!(stylesheet.css_value("#123456"), "#123456");
        assert_eq!(stylesheet.css_value("lcars-not-a-colour"), FALLBACK_COLOR);
    }

    #[test]
    fn test_parse_toml_overrides_defaults() {
        let toml_str = r##"
[metadata]
name = "Red Alert"
description = "Everything red"

[colors]
lcars-orange = "#ff0000"
klaxon = "#aa0000"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Red Alert".to_string()));
        assert_eq!(stylesheet.description, Some("Everything red".to_string()));
        assert_eq!(stylesheet.resolve("lcars-orange"), Some("#ff0000"));
        assert_eq!(stylesheet.resolve("klaxon"), Some("#aa0000"));
        assert_eq!(stylesheet.resolve("lcars-blue"), Some("#9999ff"));
    }

    #[test]
    fn test_parse_toml_without_metadata() {
        let stylesheet = Stylesheet::from_str("[colors]\nlcars-tan = \"#111111\"\n").expect("Should parse");
        assert_eq!(stylesheet.name, None);
        assert_eq!(stylesheet.resolve("lcars-tan"), Some("#111111"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Stylesheet::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(StylesheetError::ParseError(_))));
    }
}
