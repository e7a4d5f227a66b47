//! Units and page geometry.
//!
//! All lengths handled by the drawing surface are PDF points (1/72 inch).  The
//! constants below convert the usual typographic units into points.

/// One inch in points.
pub const INCH: f64 = 72.0;
/// One centimetre in points.
pub const CM: f64 = INCH / 2.54;
/// One millimetre in points.
pub const MM: f64 = CM * 0.1;

/// Width and height of an A4 page in points.
pub const A4: (f64, f64) = (210.0 * MM, 297.0 * MM);

/// Converts points to millimetres.
pub fn pt_to_mm(value: f64) -> f64 {
    value / MM
}

/// Offset that centers `content` inside `available`, rounded down to a whole point.
pub fn centered_offset(available: f64, content: f64) -> f64 {
    ((available - content) / 2.0).floor()
}

/// Half of `value`, rounded down to a whole point.
pub fn half(value: f64) -> f64 {
    (value / 2.0).floor()
}

/// Page size together with a uniform margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    page_width: f64,
    page_height: f64,
    margin: f64,
}

impl PageGeometry {
    /// Creates a geometry from an explicit page size and margin, all in points.
    pub fn new(page_width: f64, page_height: f64, margin: f64) -> Self {
        Self {
            page_width,
            page_height,
            margin,
        }
    }

    /// A4 page with a one centimetre margin.
    pub fn a4() -> Self {
        Self::new(A4.0, A4.1, CM)
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Width available between the left and right margins.
    pub fn usable_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Height available between the top and bottom margins.
    pub fn usable_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Lower-left corner of a `width` x `height` box centered in the usable area.
    pub fn centered(&self, width: f64, height: f64) -> (f64, f64) {
        (
            centered_offset(self.usable_width(), width),
            centered_offset(self.usable_height(), height),
        )
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_offset_splits_remaining_space() {
        assert_eq!(centered_offset(100.0, 40.0), 30.0);
        assert_eq!(centered_offset(100.0, 41.0), 29.0);
    }

    #[test]
    fn a4_usable_area_excludes_margins() {
        let geometry = PageGeometry::a4();
        assert!((geometry.usable_width() - (A4.0 - 2.0 * CM)).abs() < 1e-9);
        assert!((geometry.usable_height() - (A4.1 - 2.0 * CM)).abs() < 1e-9);
        assert!((A4.0 - 595.2756).abs() < 1e-3);
    }

    #[test]
    fn centered_box_uses_both_axes() {
        let geometry = PageGeometry::new(120.0, 220.0, 10.0);
        assert_eq!(geometry.centered(40.0, 100.0), (30.0, 50.0));
    }
}
