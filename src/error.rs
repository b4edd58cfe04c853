//! Error types for loading panel files

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Failed to read panel file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse panel TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid element '{element}': {reason}")]
    Invalid { element: String, reason: String },
}

impl PanelError {
    pub fn invalid(element: impl Into<String>, reason: impl Into<String>) -> Self {
        PanelError::Invalid {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Location of the error in `source`, when one can be determined
    pub fn span(&self, source: &str) -> Option<Span> {
        match self {
            PanelError::Io(_) => None,
            PanelError::Toml(err) => err.span(),
            PanelError::Invalid { element, .. } => {
                let quoted = format!("\"{}\"", element);
                source
                    .find(&quoted)
                    .map(|start| start..start + quoted.len())
            }
        }
    }

    fn message(&self) -> String {
        match self {
            PanelError::Toml(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span(source) else {
            return self.to_string();
        };

        let message = self.message();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_span_points_at_element_id() {
        let source = "id = \"bar\"\ntype = \"rectangle\"\n";
        let err = PanelError::invalid("bar", "bad anchor");
        assert_eq!(err.span(source), Some(5..10));
        assert_eq!(err.to_string(), "Invalid element 'bar': bad anchor");
    }

    #[test]
    fn test_format_without_span_falls_back_to_display() {
        let err = PanelError::invalid("ghost", "bad anchor");
        assert_eq!(err.format("", "panel.toml"), err.to_string());
    }

    #[test]
    fn test_format_includes_filename() {
        let source = "id = \"bar\"\n";
        let report = PanelError::invalid("bar", "bad anchor").format(source, "panel.toml");
        assert!(report.contains("panel.toml"));
        assert!(report.contains("bad anchor"));
    }
}
