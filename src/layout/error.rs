//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation or while reading layout options
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Anchor/stretch references form a loop
    #[error("circular layout dependency: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Container rect without a positive area
    #[error("invalid container size {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },

    /// Elements whose references never became available
    #[error("{count} element(s) could not be laid out, first unresolved: '{first}'")]
    Unresolved { first: String, count: usize },

    #[error("invalid anchor point '{value}' (valid anchor points: {valid})")]
    InvalidAnchorPoint { value: String, valid: String },

    #[error("invalid stretch edge '{value}'")]
    InvalidStretchEdge { value: String },

    #[error("invalid dimension '{value}' (expected a number or a percentage like '50%')")]
    InvalidDimension { value: String },
}

impl LayoutError {
    /// Create a circular dependency error
    pub fn circular(cycle: Vec<String>) -> Self {
        Self::CircularDependency { cycle }
    }

    pub fn invalid_container(width: f64, height: f64) -> Self {
        Self::InvalidContainer { width, height }
    }

    pub fn unresolved(first: impl Into<String>, count: usize) -> Self {
        Self::Unresolved {
            first: first.into(),
            count,
        }
    }

    pub fn invalid_anchor_point(value: impl Into<String>, valid: impl Into<String>) -> Self {
        Self::InvalidAnchorPoint {
            value: value.into(),
            valid: valid.into(),
        }
    }

    pub fn invalid_stretch_edge(value: impl Into<String>) -> Self {
        Self::InvalidStretchEdge {
            value: value.into(),
        }
    }

    pub fn invalid_dimension(value: impl Into<String>) -> Self {
        Self::InvalidDimension {
            value: value.into(),
        }
    }

    /// Element ids involved in a cycle, if this is a cycle error
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            Self::CircularDependency { cycle } => Some(cycle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_dependency_display() {
        let err = LayoutError::circular(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        assert!(err.to_string().contains("a -> b -> a"));
        assert_eq!(err.cycle().map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_invalid_container_display() {
        let err = LayoutError::invalid_container(0.0, 150.0);
        assert_eq!(err.to_string(), "invalid container size 0x150");
        assert!(err.cycle().is_none());
    }

    #[test]
    fn test_unresolved_display() {
        let err = LayoutError::unresolved("bar", 2);
        assert_eq!(
            err.to_string(),
            "2 element(s) could not be laid out, first unresolved: 'bar'"
        );
    }
}
