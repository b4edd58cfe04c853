//! Layout engine for computing element positions and sizes
//!
//! Elements are placed by anchoring one of their nine anchor points to a point on
//! the container or on another element, then optionally stretched so an edge meets
//! a target edge. Dependencies are ordered topologically and resolved over as many
//! passes as there are elements.

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod measurement;
pub mod types;

pub use config::LayoutConfig;
pub use element::{
    AnchorConfig, AnchorTarget, Direction, ElbowOrientation, Element, ElementArena, ElementKind,
    Group, LayoutOptions, PropValue, Props, StretchConfig, StretchDirective, StretchTarget,
};
pub use engine::{CalculateOptions, GroupIndex, LayoutEngine};
pub use error::LayoutError;
pub use graph::{Dependency, DependencyGraph, DependencyKind, MissingReference};
pub use measurement::{FontMetrics, MeasurementPool, MeasurementSurface};
pub use types::*;
