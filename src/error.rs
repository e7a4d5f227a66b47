//! Error type shared by the gallery and flowables renderers.

use std::io;
use std::path::PathBuf;

use crate::barcode::BarcodeError;
use crate::bookmarks::OutlineError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ShowcaseError> = std::result::Result<T, E>;

/// Errors raised while preparing assets or rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    /// An input or output file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An image file could not be decoded.
    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A font name was used before it was registered.
    #[error("font '{0}' is not registered")]
    UnknownFont(String),

    /// A TrueType file could not be parsed.
    #[error("font '{name}' at {} is not a valid TrueType font: {reason}", path.display())]
    InvalidFont {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// The low-level PDF writer rejected an operation.
    #[error("pdf writer error: {0}")]
    Pdf(String),

    /// Layout or rendering failure reported by `genpdf`.
    #[error(transparent)]
    Layout(#[from] genpdf::error::Error),

    #[error(transparent)]
    Barcode(#[from] BarcodeError),

    /// A table was built with inconsistent dimensions.
    #[error("invalid table: {0}")]
    Table(String),

    /// Post-processing of the rendered PDF failed.
    #[error(transparent)]
    Outline(#[from] OutlineError),
}

impl ShowcaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        Self::Pdf(err.to_string())
    }
}
