//! Code 39 barcodes.
//!
//! Each symbol character is nine elements (five bars, four spaces), three of
//! which are wide.  Symbols are framed by the `*` start/stop character,
//! separated by a narrow gap and surrounded by quiet zones.

use log::debug;

use crate::error::Result;
use crate::geometry::INCH;
use crate::surface::{Paint, Surface};

/// Characters encodable in standard Code 39, in checksum-value order.
const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Wide/narrow element patterns, bar first, for each character in [`CHARSET`].
const PATTERNS: [&str; 43] = [
    "nnnwwnwnn",
    "wnnwnnnnw",
    "nnwwnnnnw",
    "wnwwnnnnn",
    "nnnwwnnnw",
    "wnnwwnnnn",
    "nnwwwnnnn",
    "nnnwnnwnw",
    "wnnwnnwnn",
    "nnwwnnwnn",
    "wnnnnwnnw",
    "nnwnnwnnw",
    "wnwnnwnnn",
    "nnnnwwnnw",
    "wnnnwwnnn",
    "nnwnwwnnn",
    "nnnnnwwnw",
    "wnnnnwwnn",
    "nnwnnwwnn",
    "nnnnwwwnn",
    "wnnnnnnww",
    "nnwnnnnww",
    "wnwnnnnwn",
    "nnnnwnnww",
    "wnnnwnnwn",
    "nnwnwnnwn",
    "nnnnnnwww",
    "wnnnnnwwn",
    "nnwnnnwwn",
    "nnnnwnwwn",
    "wwnnnnnnw",
    "nwwnnnnnw",
    "wwwnnnnnn",
    "nwnnwnnnw",
    "wwnnwnnnn",
    "nwwnwnnnn",
    "nwnnnnwnw",
    "wwnnnnwnn",
    "nwwnnnwnn",
    "nwnwnwnnn",
    "nwnwnnnwn",
    "nwnnnwnwn",
    "nnnwnwnwn",
];

const START_STOP: &str = "nwnnwnwnn";

/// Wide element width as a multiple of the narrow bar width.
const WIDE_RATIO: f64 = 2.2;

/// Input rejected by the Code 39 encoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BarcodeError {
    #[error("character {character:?} at position {position} cannot be encoded in Code 39")]
    InvalidCharacter { character: char, position: usize },
    #[error("barcode value is empty")]
    Empty,
}

fn value_of(ch: char) -> Option<usize> {
    CHARSET.find(ch)
}

/// A validated Code 39 symbol with its physical dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Code39 {
    value: String,
    checksum: bool,
    bar_width: f64,
    bar_height: f64,
    quiet_zone: f64,
}

impl Code39 {
    /// Validates `value`; lowercase letters are folded to uppercase.
    pub fn new(value: &str, bar_width: f64, bar_height: f64) -> Result<Self, BarcodeError> {
        if value.is_empty() {
            return Err(BarcodeError::Empty);
        }
        let value = value.to_ascii_uppercase();
        if let Some((position, character)) = value
            .chars()
            .enumerate()
            .find(|(_, ch)| value_of(*ch).is_none())
        {
            return Err(BarcodeError::InvalidCharacter {
                character,
                position,
            });
        }

        Ok(Self {
            value,
            checksum: false,
            bar_width,
            bar_height,
            quiet_zone: (0.25 * INCH).max(10.0 * bar_width),
        })
    }

    /// Appends the modulo-43 check character when enabled.
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Modulo-43 check character for the value.
    pub fn check_character(&self) -> char {
        let sum: usize = self.value.chars().filter_map(value_of).sum();
        CHARSET.as_bytes()[sum % 43] as char
    }

    /// Characters actually encoded between the start and stop symbols.
    pub fn encoded(&self) -> String {
        let mut encoded = self.value.clone();
        if self.checksum {
            encoded.push(self.check_character());
        }
        encoded
    }

    fn patterns(&self) -> Vec<&'static str> {
        let mut patterns = vec![START_STOP];
        patterns.extend(
            self.encoded()
                .chars()
                .filter_map(value_of)
                .map(|index| PATTERNS[index]),
        );
        patterns.push(START_STOP);
        patterns
    }

    fn element_width(&self, element: char) -> f64 {
        if element == 'w' {
            self.bar_width * WIDE_RATIO
        } else {
            self.bar_width
        }
    }

    /// Total width including both quiet zones.
    pub fn width(&self) -> f64 {
        let patterns = self.patterns();
        let symbols: f64 = patterns
            .iter()
            .flat_map(|pattern| pattern.chars())
            .map(|element| self.element_width(element))
            .sum();
        let gaps = (patterns.len() - 1) as f64 * self.bar_width;
        2.0 * self.quiet_zone + symbols + gaps
    }

    pub fn height(&self) -> f64 {
        self.bar_height
    }

    /// Draws the bars with the lower-left corner of the left quiet zone at `(x, y)`.
    pub fn draw_on<S>(&self, surface: &mut S, x: f64, y: f64) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        debug!("Drawing Code 39 symbol '{}'", self.encoded());
        surface.save_state();
        surface.set_fill_color(crate::color::BLACK);

        let mut cursor = x + self.quiet_zone;
        for pattern in self.patterns() {
            for (index, element) in pattern.chars().enumerate() {
                let width = self.element_width(element);
                if index % 2 == 0 {
                    surface.rect(cursor, y, width, self.bar_height, Paint::FILL)?;
                }
                cursor += width;
            }
            cursor += self.bar_width;
        }

        surface.restore_state();
        Ok(())
    }
}
