//! SVG renderer for laid-out panels
//!
//! This module walks a calculated [`LayoutEngine`](crate::layout::LayoutEngine) and
//! produces an SVG string with CSS classes and stylesheet colour variables.

pub mod config;
pub mod path;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, SvgBuilder};
