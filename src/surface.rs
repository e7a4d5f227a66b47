//! The drawing surface abstraction shared by the PDF canvas and the recorder.
//!
//! Coordinates are PDF points with the origin in the lower-left corner.  Every
//! coordinate passed to a drawing call is interpreted relative to the surface's
//! current origin, which [`Surface::translate`] shifts cumulatively until the
//! page is closed with [`Surface::show_page`].

use std::path::Path;

use genpdf::style::Color;

use crate::color;
use crate::error::Result;
use crate::fonts::DEFAULT_FONT;

/// Font size used at the start of every page.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Drawing attributes in effect for the next primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    pub origin: (f64, f64),
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub font: String,
    pub font_size: f64,
}

impl GraphicsState {
    /// Maps surface-local coordinates to page coordinates.
    pub fn to_page(&self, x: f64, y: f64) -> (f64, f64) {
        (self.origin.0 + x, self.origin.1 + y)
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            origin: (0.0, 0.0),
            stroke_color: color::BLACK,
            fill_color: color::BLACK,
            line_width: 1.0,
            font: DEFAULT_FONT.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// How a closed path is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paint {
    pub stroke: bool,
    pub fill: bool,
}

impl Paint {
    pub const STROKE: Paint = Paint {
        stroke: true,
        fill: false,
    };
    pub const FILL: Paint = Paint {
        stroke: false,
        fill: true,
    };
    pub const FILL_STROKE: Paint = Paint {
        stroke: true,
        fill: true,
    };
}

/// A decoded raster image ready to be placed on a surface.
pub struct RasterImage {
    pub(crate) image: image::DynamicImage,
    pub(crate) width_px: u32,
    pub(crate) height_px: u32,
}

impl RasterImage {
    pub(crate) fn new(image: image::DynamicImage) -> Self {
        use image::GenericImageView;

        let (width_px, height_px) = image.dimensions();
        Self {
            image,
            width_px,
            height_px,
        }
    }

    /// Pixel dimensions, interpreted as points at a scale of 1.0.
    pub fn size(&self) -> (f64, f64) {
        (f64::from(self.width_px), f64::from(self.height_px))
    }
}

/// A mutable page-oriented drawing target.
pub trait Surface {
    /// Current graphics state.
    fn state(&self) -> &GraphicsState;

    /// Mutable access to the current graphics state.
    fn state_mut(&mut self) -> &mut GraphicsState;

    /// Pushes a copy of the graphics state.
    fn save_state(&mut self);

    /// Pops the graphics state pushed by the matching [`Surface::save_state`].
    fn restore_state(&mut self);

    /// Registers a TrueType font file under a logical name.
    fn register_font(&mut self, name: &str, path: &Path) -> Result<()>;

    /// Width of `text` in points when set in `font` at `size`.
    fn string_width(&self, text: &str, font: &str, size: f64) -> Result<f64>;

    /// Strokes and/or fills an axis-aligned rectangle.
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint) -> Result<()>;

    /// Strokes a straight line.
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()>;

    /// Strokes and/or fills a circle.
    fn circle(&mut self, cx: f64, cy: f64, radius: f64, paint: Paint) -> Result<()>;

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()>;

    /// Places `image` with its lower-left corner at `(x, y)`, scaled to `width` x `height`.
    fn draw_image(
        &mut self,
        image: &RasterImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;

    /// Attaches an outline title to the current page.
    fn bookmark_page(&mut self, title: &str);

    /// Closes the current page; the next drawing call starts a fresh one.
    fn show_page(&mut self) -> Result<()>;

    /// Shifts the origin by `(dx, dy)` relative to its current position.
    fn translate(&mut self, dx: f64, dy: f64) {
        let origin = &mut self.state_mut().origin;
        origin.0 += dx;
        origin.1 += dy;
    }

    /// Current origin in page coordinates.
    fn origin(&self) -> (f64, f64) {
        self.state().origin
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state_mut().stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state_mut().fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state_mut().line_width = width;
    }

    /// Selects the font used by subsequent text calls.
    ///
    /// Fails when `name` is neither a standard font nor a registered TrueType font.
    fn set_font(&mut self, name: &str, size: f64) -> Result<()> {
        self.string_width("", name, size)?;
        let state = self.state_mut();
        state.font = name.to_owned();
        state.font_size = size;
        Ok(())
    }

    /// Width of `text` in the current font.
    fn current_string_width(&self, text: &str) -> Result<f64> {
        let state = self.state();
        self.string_width(text, &state.font, state.font_size)
    }

    /// Draws `text` horizontally centered on `x`.
    fn draw_centred_string(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        let width = self.current_string_width(text)?;
        self.draw_string(x - width / 2.0, y, text)
    }
}
