//! Serde schema for panel TOML files

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PanelFile {
    #[serde(default)]
    pub card: CardSection,
    #[serde(default)]
    pub fonts: BTreeMap<String, FontSection>,
    #[serde(default)]
    pub groups: Vec<GroupSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardSection {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub dynamic_height: Option<bool>,
}

/// Font metrics as multiples of the font size
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FontSection {
    pub char_width: f64,
    pub line_height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GroupSection {
    pub id: String,
    #[serde(default)]
    pub elements: Vec<ElementSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementSection {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub props: BTreeMap<String, PropSection>,
    #[serde(default)]
    pub layout: LayoutSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropSection {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// `120` or `"120px"` or `"50%"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DimensionSection {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutSection {
    pub width: Option<DimensionSection>,
    pub height: Option<DimensionSection>,
    pub offset_x: Option<DimensionSection>,
    pub offset_y: Option<DimensionSection>,
    pub anchor: Option<AnchorSection>,
    pub stretch: Option<StretchSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnchorSection {
    pub anchor_to: Option<String>,
    pub anchor_point: Option<String>,
    pub target_anchor_point: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StretchSection {
    pub stretch_to1: Option<StretchDirectiveSection>,
    pub stretch_to2: Option<StretchDirectiveSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StretchDirectiveSection {
    pub target: String,
    pub target_edge: String,
    #[serde(default)]
    pub padding: f64,
}
