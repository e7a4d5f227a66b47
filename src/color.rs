//! Named colors and conversions between the `genpdf` and `printpdf` color models.

use genpdf::style::Color;

pub const BLACK: Color = Color::Rgb(0, 0, 0);
pub const GREY: Color = Color::Rgb(128, 128, 128);
pub const RED: Color = Color::Rgb(255, 0, 0);
pub const GREEN: Color = Color::Rgb(0, 128, 0);
pub const BLUE: Color = Color::Rgb(0, 0, 255);
pub const GREENYELLOW: Color = Color::Rgb(173, 255, 47);
pub const AQUA: Color = Color::Rgb(0, 255, 255);
pub const PINK: Color = Color::Rgb(255, 192, 203);
pub const LAVENDER: Color = Color::Rgb(230, 230, 250);
pub const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Parses a `#RRGGBB` string.
pub fn from_hex(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Converts a `genpdf` color into the equivalent `printpdf` color.
pub fn to_printpdf(color: Color) -> printpdf::Color {
    match color {
        Color::Rgb(r, g, b) => printpdf::Color::Rgb(printpdf::Rgb::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            None,
        )),
        Color::Cmyk(c, m, y, k) => printpdf::Color::Cmyk(printpdf::Cmyk::new(
            f64::from(c) / 255.0,
            f64::from(m) / 255.0,
            f64::from(y) / 255.0,
            f64::from(k) / 255.0,
            None,
        )),
        Color::Greyscale(level) => {
            printpdf::Color::Greyscale(printpdf::Greyscale::new(f64::from(level) / 255.0, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(from_hex("#eeffee"), Some(Color::Rgb(0xee, 0xff, 0xee)));
        assert_eq!(from_hex("#000000"), Some(BLACK));
        assert_eq!(from_hex("eeffee"), None);
        assert_eq!(from_hex("#12FG34"), None);
    }
}
