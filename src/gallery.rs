//! The nine-page drawing primitives gallery.
//!
//! Every page is drawn by one routine wrapped with [`translated`] so that it
//! works in coordinates relative to the page margin.  The translation is not
//! undone, so the caption drawn after a routine lands in the same frame.
//! [`Surface::show_page`] resets the origin before the next page.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use genpdf::style::Color;
use log::{debug, info, warn};

use crate::barcode::Code39;
use crate::bookmarks::DocumentInfo;
use crate::canvas::PdfCanvas;
use crate::color;
use crate::config::{FailurePolicy, GalleryOptions};
use crate::elements::load_raster;
use crate::error::{Result, ShowcaseError};
use crate::geometry::{centered_offset, half, PageGeometry, CM, MM};
use crate::paragraph::{join_lines, Paragraph, ParagraphStyle};
use crate::recording::{RecordedPage, RecordingSurface};
use crate::surface::{Paint, RasterImage, Surface};
use crate::table::{CellRange, HorizontalAlign, Table, TableStyle, VerticalAlign};
use crate::translate::translated;

/// Inset between the nested margin boxes.
pub const MARGIN_BOX_OFFSET: f64 = 5.0;
/// Scale of the image on the image page.
pub const IMAGE_RATIO: f64 = 0.6;
/// Scale of the image on the all-in-one page.
pub const ALL_IN_ONE_IMAGE_RATIO: f64 = 0.3;

const BOX_COLORS: [Color; 4] = [color::BLACK, color::GREENYELLOW, color::RED, color::AQUA];
const STANDARD_FONTS: [&str; 3] = ["Times-Roman", "Helvetica", "Courier"];
const STANDARD_SIZES: [f64; 3] = [10.0, 16.0, 22.0];
const TRUETYPE_SIZES: [f64; 3] = [12.0, 18.0, 24.0];
const BARCODES: [&str; 3] = ["21557308", "PINGU", "123456789"];
const ALL_IN_ONE_TEXT: &str =
    "Hi, I am a very simple paragraph<br />This is the 'all together' demo!";
const ALL_IN_ONE_BARCODE: &str = "1234567890";

/// The gallery pages in output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GalleryPage {
    MarginBox,
    Image,
    Paragraph,
    Circles,
    Table,
    StandardFonts,
    EmbeddedFonts,
    Barcodes,
    AllInOne,
}

impl GalleryPage {
    pub const ALL: [GalleryPage; 9] = [
        GalleryPage::MarginBox,
        GalleryPage::Image,
        GalleryPage::Paragraph,
        GalleryPage::Circles,
        GalleryPage::Table,
        GalleryPage::StandardFonts,
        GalleryPage::EmbeddedFonts,
        GalleryPage::Barcodes,
        GalleryPage::AllInOne,
    ];

    /// Outline title of the page.
    pub fn title(self) -> &'static str {
        match self {
            GalleryPage::MarginBox => "Margin box",
            GalleryPage::Image => "Image",
            GalleryPage::Paragraph => "Paragraph",
            GalleryPage::Circles => "Circles",
            GalleryPage::Table => "Table",
            GalleryPage::StandardFonts => "Standard fonts",
            GalleryPage::EmbeddedFonts => "Embedded fonts",
            GalleryPage::Barcodes => "Barcodes",
            GalleryPage::AllInOne => "All in one",
        }
    }
}

impl fmt::Display for GalleryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Outcome of a gallery run.
#[derive(Debug, Default)]
pub struct GalleryReport {
    pub rendered: Vec<GalleryPage>,
    /// Pages whose routine failed while running with [`FailurePolicy::Continue`].
    pub failed: Vec<(GalleryPage, ShowcaseError)>,
}

impl GalleryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Nested rectangles, each inset by `offset * i`.
pub fn draw_margin_box<S>(surface: &mut S, (geometry, offset): (&PageGeometry, f64)) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (width, height) = (geometry.usable_width(), geometry.usable_height());
    for (i, color) in BOX_COLORS.iter().enumerate() {
        let inset = offset * i as f64;
        surface.set_stroke_color(*color);
        surface.rect(
            inset,
            inset,
            width - 2.0 * inset,
            height - 2.0 * inset,
            Paint::STROKE,
        )?;
    }
    Ok(())
}

/// Draws `image` scaled by `ratio` in the middle of the usable area.
pub fn draw_centered_image<S>(
    surface: &mut S,
    (geometry, image, ratio): (&PageGeometry, &RasterImage, f64),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (mut w, mut h) = image.size();
    if ratio != 1.0 {
        w *= ratio;
        h *= ratio;
    }
    let (x, y) = geometry.centered(w, h);
    surface.draw_image(image, x, y, w, h)
}

/// Boxed paragraph, 80% of the usable width, 60pt below the top.
pub fn draw_paragraph_text<S>(
    surface: &mut S,
    (geometry, text): (&PageGeometry, &str),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (width, height) = (geometry.usable_width(), geometry.usable_height());
    let layout = Paragraph::new(text, ParagraphStyle::boxed()).wrap(&*surface, width * 0.8)?;
    let (w, h) = layout.size();
    layout.draw_on(surface, centered_offset(width, w), height - h - 60.0)
}

/// Concentric circles with growing radius and line width.
pub fn draw_centered_circles<S>(
    surface: &mut S,
    (geometry, colors): (&PageGeometry, &[Color]),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let cx = half(geometry.usable_width());
    let cy = half(geometry.usable_height());
    for (i, color) in colors.iter().enumerate() {
        let i = i as f64;
        surface.set_stroke_color(*color);
        surface.set_line_width(i * 2.0 + 1.0);
        surface.circle(cx, cy, 100.0 + 16.0 * i, Paint::STROKE)?;
    }
    Ok(())
}

fn demo_table() -> Table {
    let data = [
        ["00", "01", "02", "03", "04"],
        ["10", "11", "12", "13", "14"],
        ["20", "21", "", "23", "24"],
        ["30", "31", "32", "33", "34"],
        ["40", "41", "42", "43", "44"],
    ];
    let range = CellRange::new;
    Table::new(data)
        .with_col_widths(vec![40.0; 5])
        .with_row_heights(vec![32.0; 5])
        .with_style(vec![
            TableStyle::Grid {
                range: CellRange::all(),
                width: 0.5,
                color: color::GREY,
            },
            TableStyle::Grid {
                range: range((1, 1), (-2, -2)),
                width: 1.0,
                color: color::GREEN,
            },
            TableStyle::Box {
                range: range((0, 0), (1, -1)),
                width: 2.0,
                color: color::RED,
            },
            TableStyle::Box {
                range: CellRange::all(),
                width: 2.0,
                color: color::BLACK,
            },
            TableStyle::LineAbove {
                range: range((1, 2), (-2, 2)),
                width: 1.0,
                color: color::BLUE,
            },
            TableStyle::LineBefore {
                range: range((2, 1), (2, -2)),
                width: 1.0,
                color: color::PINK,
            },
            TableStyle::Background {
                range: range((0, 0), (0, 1)),
                color: color::PINK,
            },
            TableStyle::Background {
                range: range((1, 1), (1, 2)),
                color: color::LAVENDER,
            },
            TableStyle::Background {
                range: range((2, 2), (2, 3)),
                color: color::ORANGE,
            },
            TableStyle::Align {
                range: range((0, 0), (4, 4)),
                align: HorizontalAlign::Center,
            },
            TableStyle::VAlign {
                range: range((0, 0), (4, 4)),
                align: VerticalAlign::Middle,
            },
        ])
}

/// A styled 5x5 table centered on the usable area.
pub fn draw_table<S>(surface: &mut S, geometry: &PageGeometry) -> Result<()>
where
    S: Surface + ?Sized,
{
    let table = demo_table();
    let (w, h) = table.wrap()?;
    let (x, y) = geometry.centered(w, h);
    table.draw_on(surface, x, y)
}

/// One centered sample line per font and size, stepping down the page.
fn draw_font_samples<S>(
    surface: &mut S,
    geometry: &PageGeometry,
    fonts: &[&str],
    sizes: &[f64],
    label: &str,
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let x = half(geometry.usable_width());
    let mut h = 40.0;
    for font in fonts {
        for size in sizes {
            surface.set_font(font, *size)?;
            surface.draw_centred_string(
                x,
                geometry.usable_height() - h,
                &format!("{} ({} {}).", label, font, size),
            )?;
            h += 20.0 * (size * 0.1);
        }
    }
    Ok(())
}

/// Samples of the standard PDF fonts.
pub fn draw_fonts<S>(
    surface: &mut S,
    (geometry, fonts, sizes): (&PageGeometry, &[&str], &[f64]),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    draw_font_samples(surface, geometry, fonts, sizes, "Sixth Requirement: Fonts")
}

/// Registers each `(name, path)` TrueType font and draws samples of it.
pub fn draw_ttfonts<S>(
    surface: &mut S,
    (geometry, fonts, sizes): (&PageGeometry, &[(String, PathBuf)], &[f64]),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    for (name, path) in fonts {
        surface.register_font(name, path)?;
        debug!(
            "Registered TrueType font '{}' from {}",
            name,
            path.display()
        );
    }
    let names: Vec<&str> = fonts.iter().map(|(name, _)| name.as_str()).collect();
    draw_font_samples(
        surface,
        geometry,
        &names,
        sizes,
        "Sixth Requirement (b): T.T. Fonts",
    )
}

/// Code 39 symbols stacked from 4cm below the top, each with a caption.
pub fn draw_barcodes<S>(
    surface: &mut S,
    (geometry, codes): (&PageGeometry, &[&str]),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (width, height) = (geometry.usable_width(), geometry.usable_height());
    surface.set_stroke_color(color::BLACK);
    let mut offset = 4.0 * CM;
    for code in codes {
        let barcode = Code39::new(code, 0.5 * MM, 15.0 * MM)?.with_checksum(false);
        let x = centered_offset(width, barcode.width());
        barcode.draw_on(surface, x, height - offset)?;
        surface.draw_centred_string(
            half(width),
            height - offset - 16.0,
            &format!("standard code39: {}", code),
        )?;
        offset += barcode.height() + 2.0 * CM;
    }
    Ok(())
}

/// Every primitive on a single page.
///
/// `truetype_font` must already be registered on the surface.
pub fn all_in_one<S>(
    surface: &mut S,
    (geometry, image, truetype_font): (&PageGeometry, &RasterImage, &str),
) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (width, height) = (geometry.usable_width(), geometry.usable_height());

    surface.set_stroke_color(color::BLACK);
    surface.rect(0.0, 0.0, width, height, Paint::STROKE)?;

    let (w, h) = image.size();
    let (w, h) = (w * ALL_IN_ONE_IMAGE_RATIO, h * ALL_IN_ONE_IMAGE_RATIO);
    surface.draw_image(image, 12.0, height - 12.0 - h, w, h)?;

    let layout =
        Paragraph::new(ALL_IN_ONE_TEXT, ParagraphStyle::boxed()).wrap(&*surface, width * 0.4)?;
    let (w, h) = layout.size();
    layout.draw_on(surface, width - w - 24.0, height - h - 60.0)?;

    surface.set_line_width(1.0);
    surface.circle(half(width), half(height), 30.0, Paint::STROKE)?;

    let table = Table::new([[0, 1, 2], [3, 4, 5], [6, 7, 8]])
        .with_col_widths(vec![20.0; 3])
        .with_row_heights(vec![16.0; 3])
        .with_style(vec![
            TableStyle::Grid {
                range: CellRange::new((0, 0), (2, 2)),
                width: 0.5,
                color: color::GREY,
            },
            TableStyle::Align {
                range: CellRange::new((0, 0), (2, 2)),
                align: HorizontalAlign::Center,
            },
            TableStyle::VAlign {
                range: CellRange::new((0, 0), (2, 2)),
                align: VerticalAlign::Middle,
            },
        ]);
    table.wrap()?;
    table.draw_on(surface, 60.0, 120.0)?;

    surface.set_font("Helvetica", 16.0)?;
    surface.draw_centred_string(
        half(width),
        height - 200.0,
        "Standard Font: (Helvetica 16).",
    )?;
    surface.set_font(truetype_font, 24.0)?;
    surface.draw_centred_string(
        half(width),
        height - 260.0,
        &format!("True Type Font: ({}.ttf 24).", truetype_font),
    )?;

    let barcode = Code39::new(ALL_IN_ONE_BARCODE, 0.5 * MM, 12.0 * MM)?.with_checksum(false);
    barcode.draw_on(
        surface,
        centered_offset(width, barcode.width()),
        half(height) - 100.0,
    )?;
    surface.set_font("Helvetica", 14.0)?;
    surface.draw_centred_string(
        half(width),
        half(height) - 130.0,
        &format!("standard39: {}", ALL_IN_ONE_BARCODE),
    )
}

/// Draws the gallery pages on any [`Surface`].
pub struct Gallery<'a> {
    options: &'a GalleryOptions,
}

impl<'a> Gallery<'a> {
    pub fn new(options: &'a GalleryOptions) -> Self {
        Self { options }
    }

    /// Draws all nine pages, closing each one with `show_page`.
    ///
    /// With [`FailurePolicy::Abort`] the first failing page aborts the run.
    /// With [`FailurePolicy::Continue`] the failure is logged and recorded in
    /// the report, and the partially drawn page is closed as is.
    pub fn render<S>(&self, surface: &mut S) -> Result<GalleryReport>
    where
        S: Surface + ?Sized,
    {
        let mut report = GalleryReport::default();
        for page in GalleryPage::ALL {
            surface.bookmark_page(page.title());
            match self.render_page(surface, page) {
                Ok(()) => report.rendered.push(page),
                Err(err) => match self.options.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Continue => {
                        warn!("Skipping the rest of page '{}': {}", page, err);
                        report.failed.push((page, err));
                    }
                },
            }
            surface.show_page()?;
        }
        Ok(report)
    }

    fn render_page<S>(&self, surface: &mut S, page: GalleryPage) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let geometry = &self.options.geometry;
        let assets = &self.options.assets;
        let m = geometry.margin();
        let cx = half(geometry.usable_width());
        let cy = half(geometry.usable_height());
        let height = geometry.usable_height();

        match page {
            GalleryPage::MarginBox => {
                translated("draw_margin_box", m, m, draw_margin_box::<S>)
                    .call(surface, (geometry, MARGIN_BOX_OFFSET))?;
                surface.draw_centred_string(
                    cx,
                    cy,
                    "First Requirement: margin box around the whole page",
                )
            }
            GalleryPage::Image => {
                let image = load_raster(assets.image())?;
                translated("draw_centered_image", m, m, draw_centered_image::<S>)
                    .call(surface, (geometry, &image, IMAGE_RATIO))?;
                surface.draw_centred_string(
                    cx,
                    cy + 160.0,
                    "Second Requirement: image drawn in the page",
                )?;
                surface.draw_centred_string(cx, cy + 140.0, "with a little bit of drama.")
            }
            GalleryPage::Paragraph => {
                let path = assets.text();
                let text = fs::read_to_string(&path).map_err(|err| ShowcaseError::io(&path, err))?;
                let text = join_lines(&text);
                translated("draw_paragraph_text", m, m, draw_paragraph_text::<S>)
                    .call(surface, (geometry, text.as_str()))?;
                surface.draw_centred_string(
                    cx,
                    height - 10.0,
                    "Third Requirement: paragraph in the page.",
                )
            }
            GalleryPage::Circles => {
                translated("draw_centered_circles", m, m, draw_centered_circles::<S>)
                    .call(surface, (geometry, &BOX_COLORS[..]))?;
                surface.draw_centred_string(cx, height - 160.0, "Fourth Requirement: circles.")
            }
            GalleryPage::Table => {
                translated("draw_table", m, m, draw_table::<S>).call(surface, geometry)?;
                surface.draw_centred_string(cx, height - 160.0, "Fifth Requirement: a table.")
            }
            GalleryPage::StandardFonts => {
                let samples = (geometry, &STANDARD_FONTS[..], &STANDARD_SIZES[..]);
                translated("draw_fonts", m, m, draw_fonts::<S>).call(surface, samples)
            }
            GalleryPage::EmbeddedFonts => {
                let fonts: Vec<(String, PathBuf)> = self
                    .options
                    .truetype_fonts
                    .iter()
                    .map(|name| (name.clone(), assets.font(name)))
                    .collect();
                translated("draw_ttfonts", m, m, draw_ttfonts::<S>)
                    .call(surface, (geometry, fonts.as_slice(), &TRUETYPE_SIZES[..]))
            }
            GalleryPage::Barcodes => {
                translated("draw_barcodes", m, m, draw_barcodes::<S>)
                    .call(surface, (geometry, &BARCODES[..]))?;
                surface.draw_centred_string(
                    cx,
                    height - 30.0,
                    "Seventh Requirement: the ideal world",
                )
            }
            GalleryPage::AllInOne => {
                let image = load_raster(assets.image())?;
                translated("all_in_one", m, m, all_in_one::<S>).call(
                    surface,
                    (geometry, &image, self.options.all_in_one_font.as_str()),
                )
            }
        }
    }
}

/// Renders the gallery into PDF bytes.
pub fn render_gallery_to_bytes(options: &GalleryOptions) -> Result<(Vec<u8>, GalleryReport)> {
    let info = DocumentInfo::new(options.title.as_str()).with_author(options.author.as_str());
    let mut canvas = PdfCanvas::new(options.geometry, info);
    let report = Gallery::new(options).render(&mut canvas)?;
    Ok((canvas.finish()?, report))
}

/// Renders the gallery and writes it to `options.output`.
///
/// Nothing is written when rendering fails.
pub fn render_gallery(options: &GalleryOptions) -> Result<GalleryReport> {
    let (bytes, report) = render_gallery_to_bytes(options)?;
    fs::write(&options.output, bytes).map_err(|err| ShowcaseError::io(&options.output, err))?;
    info!(
        "Wrote gallery to {} ({} of {} pages complete)",
        options.output.display(),
        report.rendered.len(),
        GalleryPage::ALL.len()
    );
    Ok(report)
}

/// Runs the gallery against a [`RecordingSurface`] without producing a PDF.
pub fn dry_run_gallery(options: &GalleryOptions) -> Result<(Vec<RecordedPage>, GalleryReport)> {
    let mut surface = RecordingSurface::new();
    let report = Gallery::new(options).render(&mut surface)?;
    Ok((surface.into_pages(), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Operation;

    #[test]
    fn margin_boxes_are_inset_from_translated_origin() {
        let geometry = PageGeometry::new(200.0, 300.0, 10.0);
        let mut surface = RecordingSurface::new();
        let routine = draw_margin_box::<RecordingSurface>;
        translated("draw_margin_box", 10.0, 10.0, routine)
            .call(&mut surface, (&geometry, 5.0))
            .expect("draw");

        let rects: Vec<_> = surface
            .current_operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Rect {
                    x,
                    y,
                    width,
                    height,
                    stroke_color,
                    ..
                } => Some((*x, *y, *width, *height, *stroke_color)),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0], (10.0, 10.0, 180.0, 280.0, color::BLACK));
        assert_eq!(rects[3], (25.0, 25.0, 150.0, 250.0, color::AQUA));
    }

    #[test]
    fn circles_grow_in_radius_and_line_width() {
        let geometry = PageGeometry::new(221.0, 301.0, 0.0);
        let mut surface = RecordingSurface::new();
        draw_centered_circles(&mut surface, (&geometry, &BOX_COLORS[..])).expect("draw");

        let circles: Vec<_> = surface
            .current_operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Circle {
                    cx,
                    cy,
                    radius,
                    line_width,
                    ..
                } => Some((*cx, *cy, *radius, *line_width)),
                _ => None,
            })
            .collect();
        assert_eq!(
            circles,
            vec![
                (110.0, 150.0, 100.0, 1.0),
                (110.0, 150.0, 116.0, 3.0),
                (110.0, 150.0, 132.0, 5.0),
                (110.0, 150.0, 148.0, 7.0),
            ]
        );
    }

    #[test]
    fn font_cursor_advances_with_size() {
        let geometry = PageGeometry::new(400.0, 500.0, 0.0);
        let mut surface = RecordingSurface::new();
        let fonts = ["Courier"];
        let sizes = [10.0, 16.0];
        draw_fonts(&mut surface, (&geometry, &fonts[..], &sizes[..])).expect("draw");

        let ys: Vec<_> = surface
            .current_operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![460.0, 440.0]);
        assert_eq!(surface.state().font, "Courier");
        assert_eq!(surface.state().font_size, 16.0);
    }

    #[test]
    fn invalid_barcode_value_fails() {
        let geometry = PageGeometry::a4();
        let mut surface = RecordingSurface::new();
        let err = draw_barcodes(&mut surface, (&geometry, &["bad#code"][..])).unwrap_err();
        assert!(matches!(err, ShowcaseError::Barcode(_)));
    }

    #[test]
    fn demo_table_is_consistent() {
        assert_eq!(demo_table().wrap().expect("wrap"), (200.0, 160.0));
    }

    #[test]
    fn missing_assets_abort_by_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = GalleryOptions::new(crate::config::AssetPaths::new(dir.path()));
        let err = dry_run_gallery(&options).unwrap_err();
        assert!(matches!(err, ShowcaseError::Io { .. }));
    }

    #[test]
    fn missing_assets_are_skipped_when_continuing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = GalleryOptions::new(crate::config::AssetPaths::new(dir.path()))
            .with_failure_policy(FailurePolicy::Continue);
        let (pages, report) = dry_run_gallery(&options).expect("dry run");

        assert_eq!(pages.len(), 9);
        let failed: Vec<_> = report.failed.iter().map(|(page, _)| *page).collect();
        assert_eq!(
            failed,
            vec![
                GalleryPage::Image,
                GalleryPage::Paragraph,
                GalleryPage::EmbeddedFonts,
                GalleryPage::AllInOne,
            ]
        );
        assert!(report.rendered.contains(&GalleryPage::Barcodes));
    }
}
