//! Advance widths for the standard PDF fonts used by the gallery.
//!
//! Widths are in 1/1000 em for the printable ASCII range (0x20..=0x7E) using
//! WinAnsi encoding.  Characters outside that range fall back to the font's
//! average advance.

const FIRST_CHAR: u32 = 0x20;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const COURIER_ADVANCE: u16 = 600;

/// Width table of one of the standard fonts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthTable {
    Helvetica,
    TimesRoman,
    Monospace,
}

impl WidthTable {
    /// Advance of `ch` in 1/1000 em.
    pub fn advance(self, ch: char) -> u16 {
        let table = match self {
            Self::Monospace => return COURIER_ADVANCE,
            Self::Helvetica => &HELVETICA,
            Self::TimesRoman => &TIMES_ROMAN,
        };
        (ch as u32)
            .checked_sub(FIRST_CHAR)
            .and_then(|index| table.get(index as usize))
            .copied()
            .unwrap_or_else(|| self.average())
    }

    fn average(self) -> u16 {
        match self {
            Self::Helvetica => 556,
            Self::TimesRoman => 500,
            Self::Monospace => COURIER_ADVANCE,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn string_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| u32::from(self.advance(ch))).sum();
        f64::from(units) * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths_follow_afm() {
        assert_eq!(WidthTable::Helvetica.advance(' '), 278);
        assert_eq!(WidthTable::Helvetica.advance('W'), 944);
        assert_eq!(WidthTable::Helvetica.advance('~'), 584);
        let width = WidthTable::Helvetica.string_width("Hello", 10.0);
        assert!((width - 22.78).abs() < 1e-9);
    }

    #[test]
    fn times_and_courier_widths() {
        assert_eq!(WidthTable::TimesRoman.advance('m'), 778);
        assert_eq!(WidthTable::TimesRoman.advance('z'), 444);
        assert_eq!(WidthTable::Monospace.string_width("abcd", 10.0), 24.0);
    }

    #[test]
    fn non_ascii_falls_back_to_average() {
        assert_eq!(WidthTable::Helvetica.advance('é'), 556);
        assert_eq!(WidthTable::TimesRoman.advance('\u{7f}'), 500);
    }
}
