//! Demonstration PDF documents built on `printpdf` and `genpdf`.
//!
//! The [`gallery`] draws one drawing primitive per page onto a [`Surface`],
//! shifting the origin with [`translated`] routines.  The [`flowables`] report
//! hands an ordered story of blocks to `genpdf` for pagination.

pub mod barcode;
pub mod bookmarks;
pub mod builder;
pub mod canvas;
pub mod color;
pub mod config;
pub mod elements;
pub mod error;
pub mod flowables;
pub mod fonts;
pub mod gallery;
pub mod geometry;
pub mod paragraph;
pub mod recording;
pub mod surface;
pub mod table;
pub mod translate;

pub use canvas::PdfCanvas;
pub use config::{AssetPaths, FailurePolicy, FlowableOptions, GalleryOptions};
pub use error::{Result, ShowcaseError};
pub use flowables::{render_flowables, render_flowables_to_bytes, Block};
pub use gallery::{dry_run_gallery, render_gallery, render_gallery_to_bytes, Gallery, GalleryPage};
pub use recording::RecordingSurface;
pub use surface::Surface;
pub use translate::{translated, Translated};
