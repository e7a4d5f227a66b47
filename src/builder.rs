//! `genpdf` document construction with first-page and later-page decorations.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{self, Margins, PageDecorator, Position, Size};

use crate::elements::mm_from_pt;

/// A line of text drawn by a page decoration.
///
/// Coordinates are PDF points measured from the bottom-left corner of the
/// page, with `baseline` giving the vertical position of the text baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct PageText {
    pub text: String,
    pub x: f64,
    pub baseline: f64,
    pub font_size: u8,
    pub bold: bool,
    /// Centers the text horizontally on `x` instead of starting at it.
    pub centered: bool,
}

impl PageText {
    pub fn new(text: impl Into<String>, x: f64, baseline: f64, font_size: u8) -> Self {
        Self {
            text: text.into(),
            x,
            baseline,
            font_size,
            bold: false,
            centered: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

type PageCallback = dyn Fn(usize) -> Vec<PageText>;

/// Builder for `genpdf::Document` instances with page decoration callbacks.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    font_size: Option<u8>,
    line_spacing: Option<f64>,
    first_page: Option<Box<PageCallback>>,
    later_pages: Option<Box<PageCallback>>,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<hyphenation::Standard>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title stored in the document metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied after the page decorations are drawn.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = Some(line_spacing);
        self
    }

    /// Decoration drawn on page 1 only.
    pub fn on_first_page<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize) -> Vec<PageText> + 'static,
    {
        self.first_page = Some(Box::new(callback));
        self
    }

    /// Decoration drawn on every page after the first; receives the page number.
    pub fn on_later_pages<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize) -> Vec<PageText> + 'static,
    {
        self.later_pages = Some(Box::new(callback));
        self
    }

    /// Enables hyphenation using the provided hyphenation dictionary.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Builds a `genpdf::Document` that lays text out with `font_family`.
    pub fn build(self, font_family: FontFamily<FontData>) -> genpdf::Document {
        let mut document = genpdf::Document::new(font_family);

        if let Some(title) = &self.title {
            document.set_title(title.as_str());
        }
        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(line_spacing) = self.line_spacing {
            document.set_line_spacing(line_spacing);
        }

        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = self.hyphenator {
            document.set_hyphenator(hyphenator);
        }

        document.set_page_decorator(FirstLaterPageDecorator {
            page: 0,
            margins: self.margins,
            first_page: self.first_page,
            later_pages: self.later_pages,
        });
        document
    }
}

struct FirstLaterPageDecorator {
    page: usize,
    margins: Option<Margins>,
    first_page: Option<Box<PageCallback>>,
    later_pages: Option<Box<PageCallback>>,
}

impl FirstLaterPageDecorator {
    fn draw(
        context: &genpdf::Context,
        area: &genpdf::render::Area<'_>,
        item: &PageText,
    ) -> Result<(), Error> {
        let mut style = Style::new().with_font_size(item.font_size);
        if item.bold {
            style = style.bold();
        }

        let page_height = area.size().height;
        // genpdf places the baseline one glyph height below the print position.
        let glyph_height = style
            .font(&context.font_cache)
            .glyph_height(style.font_size());
        let mut x = mm_from_pt(item.x);
        if item.centered {
            x = x - style.str_width(&context.font_cache, &item.text) / 2.0;
        }
        let top = page_height - mm_from_pt(item.baseline) - glyph_height;

        let position = Position::new(x, top);
        let fits = area.print_str(&context.font_cache, position, style, &item.text)?;
        if !fits {
            return Err(Error::new(
                format!("Page decoration '{}' does not fit on the page", item.text),
                ErrorKind::PageSizeExceeded,
            ));
        }
        Ok(())
    }
}

impl PageDecorator for FirstLaterPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;

        let callback = if self.page == 1 {
            &self.first_page
        } else {
            &self.later_pages
        };
        if let Some(callback) = callback {
            for item in callback(self.page) {
                Self::draw(context, &area, &item)?;
            }
        }

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }
        Ok(area)
    }
}
