//! Font handling for both renderers.
//!
//! The gallery canvas works with the standard PDF fonts plus TrueType fonts
//! registered under a logical name.  The flowables report is laid out by
//! `genpdf`, which needs TrueType metrics even for the built-in Times fonts;
//! those are taken from the metric-compatible Liberation Serif family.

mod metrics;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error as LayoutError;
use genpdf::fonts::{self as layout_fonts, Builtin, FontData, FontFamily};
use log::{debug, warn};

use crate::error::{Result, ShowcaseError};

pub use metrics::WidthTable;

/// Font selected at the start of every page.
pub const DEFAULT_FONT: &str = "Helvetica";

/// Family providing the metrics for the flowables report.
pub const SERIF_FAMILY_NAME: &str = "LiberationSerif";

const SERIF_FONT_FILES: &[&str] = &[
    "LiberationSerif-Regular.ttf",
    "LiberationSerif-Bold.ttf",
    "LiberationSerif-Italic.ttf",
    "LiberationSerif-BoldItalic.ttf",
];

/// Fonts every PDF viewer provides without embedding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardFont {
    TimesRoman,
    Helvetica,
    Courier,
}

impl StandardFont {
    pub const ALL: [StandardFont; 3] = [Self::TimesRoman, Self::Helvetica, Self::Courier];

    /// Looks up a standard font by its PostScript name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TimesRoman => "Times-Roman",
            Self::Helvetica => "Helvetica",
            Self::Courier => "Courier",
        }
    }

    pub fn builtin(self) -> printpdf::BuiltinFont {
        match self {
            Self::TimesRoman => printpdf::BuiltinFont::TimesRoman,
            Self::Helvetica => printpdf::BuiltinFont::Helvetica,
            Self::Courier => printpdf::BuiltinFont::Courier,
        }
    }

    pub fn widths(self) -> WidthTable {
        match self {
            Self::TimesRoman => WidthTable::TimesRoman,
            Self::Helvetica => WidthTable::Helvetica,
            Self::Courier => WidthTable::Monospace,
        }
    }
}

/// A TrueType font loaded from disk and validated with `ttf-parser`.
#[derive(Clone, Debug)]
pub struct TrueTypeFont {
    data: Vec<u8>,
    units_per_em: u16,
}

impl TrueTypeFont {
    /// Reads and validates the font at `path`.
    pub fn load(name: &str, path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|err| ShowcaseError::io(path, err))?;
        let units_per_em = ttf_parser::Face::parse(&data, 0)
            .map_err(|err| ShowcaseError::InvalidFont {
                name: name.to_owned(),
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?
            .units_per_em();

        Ok(Self { data, units_per_em })
    }

    /// Raw font file contents, as embedded into the PDF.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Width of `text` in points at `size`; unmapped glyphs count as zero width.
    pub fn string_width(&self, text: &str, size: f64) -> f64 {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return 0.0;
        };
        let units: u32 = text
            .chars()
            .filter_map(|ch| face.glyph_index(ch))
            .filter_map(|glyph| face.glyph_hor_advance(glyph))
            .map(u32::from)
            .sum();
        f64::from(units) * size / f64::from(self.units_per_em.max(1))
    }
}

/// A font resolved from its logical name.
#[derive(Clone, Copy, Debug)]
pub enum FontFace<'a> {
    Standard(StandardFont),
    TrueType(&'a TrueTypeFont),
}

impl FontFace<'_> {
    pub fn string_width(&self, text: &str, size: f64) -> f64 {
        match self {
            Self::Standard(font) => font.widths().string_width(text, size),
            Self::TrueType(font) => font.string_width(text, size),
        }
    }
}

/// Logical font names known to a surface.
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    truetype: BTreeMap<String, TrueTypeFont>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the TrueType file at `path` and makes it available as `name`.
    ///
    /// Registering a name twice replaces the earlier font.
    pub fn register(&mut self, name: &str, path: &Path) -> Result<&TrueTypeFont> {
        let font = TrueTypeFont::load(name, path)?;
        debug!("Registered font '{}' from {}", name, path.display());
        self.truetype.insert(name.to_owned(), font);
        self.truetype
            .get(name)
            .ok_or_else(|| ShowcaseError::UnknownFont(name.to_owned()))
    }

    /// Resolves `name` to a standard or registered font.
    pub fn resolve(&self, name: &str) -> Result<FontFace<'_>> {
        if let Some(font) = StandardFont::from_name(name) {
            return Ok(FontFace::Standard(font));
        }
        self.truetype
            .get(name)
            .map(FontFace::TrueType)
            .ok_or_else(|| ShowcaseError::UnknownFont(name.to_owned()))
    }

    pub fn string_width(&self, text: &str, font: &str, size: f64) -> Result<f64> {
        Ok(self.resolve(font)?.string_width(text, size))
    }
}

fn missing_serif_files(directory: &Path) -> Vec<PathBuf> {
    SERIF_FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Loads the Liberation Serif family from `directory`, rendered as the built-in Times fonts.
pub fn serif_font_family(directory: &Path) -> Result<FontFamily<FontData>, LayoutError> {
    let missing = missing_serif_files(directory);
    if !missing.is_empty() {
        let display_list = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        warn!(
            "Flowables font family incomplete in {}",
            directory.display()
        );
        return Err(LayoutError::new(
            format!(
                "Missing font files for the '{}' family: {}",
                SERIF_FAMILY_NAME, display_list
            ),
            io::Error::new(io::ErrorKind::NotFound, "serif font family missing"),
        ));
    }

    layout_fonts::from_files(directory, SERIF_FAMILY_NAME, Some(Builtin::Times)).map_err(|err| {
        LayoutError::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                SERIF_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}
