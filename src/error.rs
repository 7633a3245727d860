use std::{fmt, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DocumentError {
    #[error("malformed document {file:?}: {reason}")]
    Malformed { file: PathBuf, reason: String },

    #[error("failed to read {file:?}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two documents resolve to the same route. Always fatal.
    #[error("duplicate path {path:?} in {first:?} and {second:?}")]
    DuplicatePath {
        path: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Distinct tag labels share one slug, so they share one output page.
    #[error("tags {labels:?} all map to slug {slug:?}")]
    TagSlugCollision { slug: String, labels: Vec<String> },
}

impl DocumentError {
    pub(crate) fn malformed(file: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Malformed {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

/// Every failure found while loading, reported together.
#[derive(Debug, Error)]
pub(crate) struct LoadErrors(pub Vec<DocumentError>);

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document error(s)", self.0.len())?;
        for e in self.0.iter() {
            write!(f, "\n  - {e}")?;
        }
        Ok(())
    }
}
