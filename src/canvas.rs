//! [`Surface`] implementation writing PDF pages through `printpdf`.
//!
//! The canvas keeps the graphics state on the Rust side and maps every
//! surface-local coordinate to page coordinates before handing it to
//! `printpdf`.  Pages are created lazily: [`Surface::show_page`] closes the
//! current page and the next drawing call opens a new one.

use std::collections::HashMap;
use std::io::BufWriter;
use std::path::Path;

use log::{debug, info};
use printpdf::{
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
};

use crate::bookmarks::{self, DocumentInfo, PageBookmark};
use crate::color;
use crate::error::{Result, ShowcaseError};
use crate::fonts::{FontFace, FontRegistry};
use crate::geometry::{pt_to_mm, PageGeometry};
use crate::surface::{GraphicsState, Paint, RasterImage, Surface};

const LAYER_NAME: &str = "Content";

/// Control-point distance for approximating a quarter circle with a cubic Bézier.
const KAPPA: f64 = 0.552_284_749_8;

fn mm(value: f64) -> Mm {
    Mm(pt_to_mm(value))
}

fn point(x: f64, y: f64) -> Point {
    Point::new(mm(x), mm(y))
}

/// A PDF document under construction.
pub struct PdfCanvas {
    document: PdfDocumentReference,
    geometry: PageGeometry,
    layer: PdfLayerReference,
    page_open: bool,
    page_count: usize,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    fonts: FontRegistry,
    font_refs: HashMap<String, IndirectFontRef>,
    bookmarks: Vec<PageBookmark>,
    info: DocumentInfo,
}

impl PdfCanvas {
    /// Creates a document whose pages use `geometry`'s page size.
    pub fn new(geometry: PageGeometry, info: DocumentInfo) -> Self {
        let (document, page, layer) = PdfDocument::new(
            info.title.as_str(),
            mm(geometry.page_width()),
            mm(geometry.page_height()),
            LAYER_NAME,
        );
        let layer = document.get_page(page).get_layer(layer);

        Self {
            document,
            geometry,
            layer,
            page_open: true,
            page_count: 1,
            state: GraphicsState::default(),
            saved: Vec::new(),
            fonts: FontRegistry::new(),
            font_refs: HashMap::new(),
            bookmarks: Vec::new(),
            info,
        }
    }

    /// Number of pages created so far, including the open one.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Serializes the document, applying the metadata and page outline.
    ///
    /// Pages are only created once drawn on, so a final `show_page` leaves no blank page behind.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        {
            let mut writer = BufWriter::new(&mut raw);
            self.document.save(&mut writer).map_err(ShowcaseError::pdf)?;
        }

        let with_outline = bookmarks::apply_page_bookmarks(&raw, &self.bookmarks)?;
        let bytes = bookmarks::apply_document_info(&with_outline, &self.info)?;
        info!(
            "Rendered '{}' with {} page(s), {} bytes",
            self.info.title,
            self.page_count,
            bytes.len()
        );
        Ok(bytes)
    }

    fn ensure_page(&mut self) {
        if self.page_open {
            return;
        }
        let (page, layer) = self.document.add_page(
            mm(self.geometry.page_width()),
            mm(self.geometry.page_height()),
            LAYER_NAME,
        );
        self.layer = self.document.get_page(page).get_layer(layer);
        self.page_open = true;
        self.page_count += 1;
        debug!("Opened page {}", self.page_count);
    }

    fn font_ref(&mut self, name: &str) -> Result<IndirectFontRef> {
        if let Some(font) = self.font_refs.get(name) {
            return Ok(font.clone());
        }
        let font = match self.fonts.resolve(name)? {
            FontFace::Standard(font) => self
                .document
                .add_builtin_font(font.builtin())
                .map_err(ShowcaseError::pdf)?,
            FontFace::TrueType(font) => self
                .document
                .add_external_font(font.data())
                .map_err(ShowcaseError::pdf)?,
        };
        self.font_refs.insert(name.to_owned(), font.clone());
        Ok(font)
    }

    fn apply_paint_state(&self) {
        self.layer
            .set_outline_color(color::to_printpdf(self.state.stroke_color));
        self.layer
            .set_fill_color(color::to_printpdf(self.state.fill_color));
        self.layer.set_outline_thickness(self.state.line_width);
    }

    fn add_path(&mut self, points: Vec<(Point, bool)>, paint: Paint) {
        self.ensure_page();
        self.apply_paint_state();
        self.layer.add_shape(Line {
            points,
            is_closed: true,
            has_fill: paint.fill,
            has_stroke: paint.stroke,
            is_clipping_path: false,
        });
    }
}

/// Bézier approximation of a circle; flags follow `printpdf`'s curve convention.
fn circle_points(cx: f64, cy: f64, r: f64) -> Vec<(Point, bool)> {
    let k = r * KAPPA;
    vec![
        (point(cx + r, cy), true),
        (point(cx + r, cy + k), true),
        (point(cx + k, cy + r), false),
        (point(cx, cy + r), true),
        (point(cx - k, cy + r), true),
        (point(cx - r, cy + k), false),
        (point(cx - r, cy), true),
        (point(cx - r, cy - k), true),
        (point(cx - k, cy - r), false),
        (point(cx, cy - r), true),
        (point(cx + k, cy - r), true),
        (point(cx + r, cy - k), false),
        (point(cx + r, cy), false),
    ]
}

impl Surface for PdfCanvas {
    fn state(&self) -> &GraphicsState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GraphicsState {
        &mut self.state
    }

    fn save_state(&mut self) {
        self.ensure_page();
        self.layer.save_graphics_state();
        self.saved.push(self.state.clone());
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.layer.restore_graphics_state();
            self.state = state;
        }
    }

    fn register_font(&mut self, name: &str, path: &Path) -> Result<()> {
        self.fonts.register(name, path)?;
        self.font_refs.remove(name);
        Ok(())
    }

    fn string_width(&self, text: &str, font: &str, size: f64) -> Result<f64> {
        self.fonts.string_width(text, font, size)
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        let points = vec![
            (point(x, y), false),
            (point(x + width, y), false),
            (point(x + width, y + height), false),
            (point(x, y + height), false),
        ];
        self.add_path(points, paint);
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let (x1, y1) = self.state.to_page(x1, y1);
        let (x2, y2) = self.state.to_page(x2, y2);
        self.ensure_page();
        self.apply_paint_state();
        self.layer.add_shape(Line {
            points: vec![(point(x1, y1), false), (point(x2, y2), false)],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
        Ok(())
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint) -> Result<()> {
        let (cx, cy) = self.state.to_page(cx, cy);
        self.add_path(circle_points(cx, cy, radius), paint);
        Ok(())
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        let font_name = self.state.font.clone();
        let font = self.font_ref(&font_name)?;
        self.ensure_page();
        self.layer
            .set_fill_color(color::to_printpdf(self.state.fill_color));
        self.layer
            .use_text(text, self.state.font_size, mm(x), mm(y), &font);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &RasterImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        let (natural_width, natural_height) = image.size();
        self.ensure_page();
        // At 72 dpi one pixel maps to one point.
        let embedded = printpdf::Image::from_dynamic_image(&image.image);
        embedded.add_to_layer(
            self.layer.clone(),
            Some(mm(x)),
            Some(mm(y)),
            None,
            Some(width / natural_width.max(1.0)),
            Some(height / natural_height.max(1.0)),
            Some(72.0),
        );
        Ok(())
    }

    fn bookmark_page(&mut self, title: &str) {
        self.ensure_page();
        let bookmark = PageBookmark::new(self.page_count, title);
        self.bookmarks.push(bookmark);
    }

    fn show_page(&mut self) -> Result<()> {
        self.ensure_page();
        debug!("Closing page {}", self.page_count);
        self.page_open = false;
        self.state = GraphicsState::default();
        self.saved.clear();
        Ok(())
    }
}

