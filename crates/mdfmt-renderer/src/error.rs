//! Error types for rendering and tree building.

use std::io;

/// Error produced while rendering a document tree.
///
/// Every error is terminal: the walk stops and the partial output is dropped.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Front matter could not be encoded as YAML.
    #[error("encoding {kind}: {source}")]
    Encoding {
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
    /// The underlying sink rejected a write.
    #[error("{0}")]
    Write(#[from] io::Error),
    /// Emphasis level without a text-mode delimiter.
    #[error("unsupported emphasis level {0}")]
    UnsupportedEmphasisLevel(u8),
    /// Error raised while rendering a whole document.
    #[error("rendering document: {0}")]
    Document(#[source] Box<RenderError>),
}

impl RenderError {
    pub(crate) fn in_document(self) -> Self {
        match self {
            err @ RenderError::Document(_) => err,
            err => RenderError::Document(Box::new(err)),
        }
    }
}

/// Error produced while building a tree from markdown source.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The YAML front matter block is not valid YAML.
    #[error("invalid front matter: {0}")]
    Metadata(#[from] serde_yaml::Error),
}

/// Error returned by the parse-and-render convenience entry points.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_context_label() {
        let err = RenderError::UnsupportedEmphasisLevel(3).in_document();
        assert_eq!(
            err.to_string(),
            "rendering document: unsupported emphasis level 3"
        );
    }

    #[test]
    fn test_document_context_is_not_nested() {
        let err = RenderError::UnsupportedEmphasisLevel(4)
            .in_document()
            .in_document();
        assert!(matches!(&err, RenderError::Document(inner) if !matches!(**inner, RenderError::Document(_))));
    }

    #[test]
    fn test_write_error_from_io() {
        let err: RenderError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert_eq!(err.to_string(), "pipe closed");
    }

    #[test]
    fn test_encoding_error_names_kind() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("[unclosed").unwrap_err();
        let err = RenderError::Encoding {
            kind: "mapping",
            source,
        };
        assert!(err.to_string().starts_with("encoding mapping: "));
    }
}
