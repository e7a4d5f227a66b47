//! A [`Surface`] that records drawing operations instead of writing a PDF.
//!
//! Coordinates in the recorded operations are page coordinates, i.e. the
//! origin translation in effect at the time of the call has been applied.
//! TrueType fonts are only checked for existence; their widths are estimated
//! at half an em per character.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use genpdf::style::Color;

use crate::error::{Result, ShowcaseError};
use crate::fonts::StandardFont;
use crate::surface::{GraphicsState, Paint, RasterImage, Surface};

const ESTIMATED_ADVANCE_EM: f64 = 0.5;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
        stroke_color: Color,
        fill_color: Color,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke_color: Color,
        line_width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        stroke_color: Color,
        line_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: String,
        size: f64,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A closed page and everything drawn on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordedPage {
    pub title: Option<String>,
    pub operations: Vec<Operation>,
}

impl RecordedPage {
    /// Text of every string drawn on the page, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    registered: BTreeSet<String>,
    current: RecordedPage,
    pages: Vec<RecordedPage>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages closed with [`Surface::show_page`].
    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    /// Operations issued on the page that is still open.
    pub fn current_operations(&self) -> &[Operation] {
        &self.current.operations
    }

    /// Consumes the recorder, returning closed pages plus the open one if anything was drawn.
    pub fn into_pages(mut self) -> Vec<RecordedPage> {
        if !self.current.operations.is_empty() || self.current.title.is_some() {
            self.pages.push(self.current);
        }
        self.pages
    }

    fn record(&mut self, operation: Operation) {
        self.current.operations.push(operation);
    }
}

impl Surface for RecordingSurface {
    fn state(&self) -> &GraphicsState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GraphicsState {
        &mut self.state
    }

    fn save_state(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn register_font(&mut self, name: &str, path: &Path) -> Result<()> {
        fs::metadata(path).map_err(|err| ShowcaseError::io(path, err))?;
        self.registered.insert(name.to_owned());
        Ok(())
    }

    fn string_width(&self, text: &str, font: &str, size: f64) -> Result<f64> {
        if let Some(standard) = StandardFont::from_name(font) {
            return Ok(standard.widths().string_width(text, size));
        }
        if self.registered.contains(font) {
            return Ok(text.chars().count() as f64 * size * ESTIMATED_ADVANCE_EM);
        }
        Err(ShowcaseError::UnknownFont(font.to_owned()))
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        self.record(Operation::Rect {
            x,
            y,
            width,
            height,
            paint,
            stroke_color: self.state.stroke_color,
            fill_color: self.state.fill_color,
            line_width: self.state.line_width,
        });
        Ok(())
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let (x1, y1) = self.state.to_page(x1, y1);
        let (x2, y2) = self.state.to_page(x2, y2);
        self.record(Operation::Line {
            x1,
            y1,
            x2,
            y2,
            stroke_color: self.state.stroke_color,
            line_width: self.state.line_width,
        });
        Ok(())
    }

    fn circle(&mut self, cx: f64, cy: f64, radius: f64, _paint: Paint) -> Result<()> {
        let (cx, cy) = self.state.to_page(cx, cy);
        self.record(Operation::Circle {
            cx,
            cy,
            radius,
            stroke_color: self.state.stroke_color,
            line_width: self.state.line_width,
        });
        Ok(())
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        self.record(Operation::Text {
            x,
            y,
            text: text.to_owned(),
            font: self.state.font.clone(),
            size: self.state.font_size,
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        _image: &RasterImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let (x, y) = self.state.to_page(x, y);
        self.record(Operation::Image {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn bookmark_page(&mut self, title: &str) {
        self.current.title = Some(title.to_owned());
    }

    fn show_page(&mut self) -> Result<()> {
        self.pages.push(std::mem::take(&mut self.current));
        self.state = GraphicsState::default();
        self.saved.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    #[test]
    fn operations_are_recorded_in_page_coordinates() {
        let mut surface = RecordingSurface::new();
        surface.translate(10.0, 20.0);
        surface
            .rect(1.0, 2.0, 30.0, 40.0, Paint::STROKE)
            .expect("rect");

        assert!(matches!(
            surface.current_operations()[0],
            Operation::Rect { x, y, width, height, .. }
                if x == 11.0 && y == 22.0 && width == 30.0 && height == 40.0
        ));
    }

    #[test]
    fn show_page_resets_graphics_state() {
        let mut surface = RecordingSurface::new();
        surface.translate(5.0, 5.0);
        surface.set_stroke_color(color::RED);
        surface.set_font("Courier", 22.0).expect("set font");
        surface.show_page().expect("show page");

        assert_eq!(surface.state(), &GraphicsState::default());
        assert_eq!(surface.pages().len(), 1);
    }

    #[test]
    fn restore_state_returns_to_saved_attributes() {
        let mut surface = RecordingSurface::new();
        surface.set_line_width(3.0);
        surface.save_state();
        surface.set_line_width(0.5);
        surface.translate(4.0, 4.0);
        surface.restore_state();

        assert_eq!(surface.state().line_width, 3.0);
        assert_eq!(surface.origin(), (0.0, 0.0));
    }

    #[test]
    fn centred_string_is_shifted_by_half_its_width() {
        let mut surface = RecordingSurface::new();
        surface.set_font("Courier", 10.0).expect("set font");
        surface
            .draw_centred_string(100.0, 50.0, "abcd")
            .expect("draw");

        assert!(matches!(
            &surface.current_operations()[0],
            Operation::Text { x, y, .. } if *x == 88.0 && *y == 50.0
        ));
    }

    #[test]
    fn registered_font_requires_existing_file() {
        let mut surface = RecordingSurface::new();
        let err = surface
            .register_font("kberry", Path::new("/nonexistent/kberry.ttf"))
            .unwrap_err();
        assert!(matches!(err, ShowcaseError::Io { .. }));
        assert!(surface.set_font("kberry", 12.0).is_err());
    }
}
