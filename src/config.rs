//! Asset locations and rendering options.

use std::path::PathBuf;

use crate::geometry::PageGeometry;

/// Default image shown by both documents.
pub const DEFAULT_IMAGE: &str = "eggs.jpg";
/// Default text file laid out on the paragraph page.
pub const DEFAULT_TEXT: &str = "example_text.txt";
/// Directory under the assets root holding TrueType files.
pub const FONTS_DIR: &str = "fonts";

/// Resolves input files relative to an assets root directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn image(&self) -> PathBuf {
        self.root.join(DEFAULT_IMAGE)
    }

    pub fn text(&self) -> PathBuf {
        self.root.join(DEFAULT_TEXT)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.root.join(FONTS_DIR)
    }

    /// Path of the TrueType file registered under the logical `name`.
    pub fn font(&self, name: &str) -> PathBuf {
        self.fonts_dir().join(format!("{}.ttf", name))
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new(".")
    }
}

/// What to do when one gallery page fails to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing page; nothing is written.
    #[default]
    Abort,
    /// Log the failure, close the page and continue with the next one.
    Continue,
}

/// Options for the gallery document.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryOptions {
    pub assets: AssetPaths,
    pub output: PathBuf,
    pub title: String,
    pub author: String,
    pub geometry: PageGeometry,
    pub failure_policy: FailurePolicy,
    pub truetype_fonts: Vec<String>,
    /// Registered TrueType font reused on the all-in-one page.
    pub all_in_one_font: String,
}

impl GalleryOptions {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            output: PathBuf::from("example.pdf"),
            title: "My first reportlab example".to_owned(),
            author: "Fabrizio Romano <fabrizio.romano@glassesdirect.co.uk>".to_owned(),
            geometry: PageGeometry::a4(),
            failure_policy: FailurePolicy::Abort,
            truetype_fonts: vec![
                "Argos-Regular".to_owned(),
                "kberry".to_owned(),
                "BluePlateSpecialNF".to_owned(),
            ],
            all_in_one_font: "kberry".to_owned(),
        }
    }
}

/// Options for the flowables report.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowableOptions {
    pub assets: AssetPaths,
    pub output: PathBuf,
    pub title: String,
    pub page_info: String,
    pub author: Option<String>,
    pub repeat: usize,
}

impl FlowableOptions {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Number of (paragraph, spacer, image) groups in the story.
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }
}

impl Default for FlowableOptions {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            output: PathBuf::from("flowables.pdf"),
            title: "Flowables example title".to_owned(),
            page_info: "platypus example".to_owned(),
            author: None,
            repeat: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_resolve_under_root() {
        let assets = AssetPaths::new("/data/assets");
        assert_eq!(assets.image(), PathBuf::from("/data/assets/eggs.jpg"));
        assert_eq!(
            assets.text(),
            PathBuf::from("/data/assets/example_text.txt")
        );
        assert_eq!(
            assets.font("kberry"),
            PathBuf::from("/data/assets/fonts/kberry.ttf")
        );
    }

    #[test]
    fn defaults_match_the_demo_documents() {
        let gallery = GalleryOptions::default();
        assert_eq!(gallery.output, PathBuf::from("example.pdf"));
        assert_eq!(gallery.title, "My first reportlab example");
        assert!(gallery.author.starts_with("Fabrizio Romano"));
        assert_eq!(gallery.truetype_fonts.len(), 3);

        let flowables = FlowableOptions::default();
        assert_eq!(flowables.output, PathBuf::from("flowables.pdf"));
        assert_eq!(flowables.repeat, 20);
    }
}
