//! Image decoding and the custom `genpdf` elements used by the flowables report.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::Image;
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Mm, RenderResult, Scale, Size};

use crate::error::{Result, ShowcaseError};
use crate::geometry::pt_to_mm;
use crate::surface::RasterImage;

/// Resolution `genpdf` assumes for images without an explicit DPI.
const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

pub(crate) fn mm_from_pt(value: f64) -> Mm {
    Mm::from(printpdf::Mm(pt_to_mm(value)))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| ShowcaseError::io(path, err))?;
    reader.decode().map_err(|source| ShowcaseError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the image at `path` for placement on a drawing surface.
pub fn load_raster(path: impl AsRef<Path>) -> Result<RasterImage> {
    decode_image_from_path(path).map(RasterImage::new)
}

/// Wraps an already decoded image, scaled to `width` x `height` points and centered.
pub fn scaled_image(dynamic: image::DynamicImage, width: f64, height: f64) -> Result<Image> {
    let (px_width, px_height) = dynamic.dimensions();
    let natural_width = MM_PER_INCH * f64::from(px_width.max(1)) / DEFAULT_IMAGE_DPI;
    let natural_height = MM_PER_INCH * f64::from(px_height.max(1)) / DEFAULT_IMAGE_DPI;

    let mut image = Image::from_dynamic_image(dynamic)?;
    image.set_alignment(Alignment::Center);
    image.set_scale(Scale::new(
        pt_to_mm(width) / natural_width,
        pt_to_mm(height) / natural_height,
    ));
    Ok(image)
}

/// Fixed vertical space in a flow.
///
/// A spacer that does not fit is truncated to the remaining height instead of
/// being carried over to the next page.
#[derive(Clone, Copy, Debug)]
pub struct Spacer {
    width: Mm,
    height: Mm,
}

impl Spacer {
    /// Creates a spacer from dimensions in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: mm_from_pt(width),
            height: mm_from_pt(height),
        }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> std::result::Result<RenderResult, Error> {
        let available = area.size();
        let width = if self.width > available.width {
            available.width
        } else {
            self.width
        };
        let height = if self.height > available.height {
            available.height
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(width, height);
        Ok(result)
    }
}
