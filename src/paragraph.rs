//! Word-wrapped paragraphs with an optional padded border box.
//!
//! Paragraph text is plain text whose only markup is an explicit line-break
//! marker ([`LINE_BREAK_MARKER`]).  Wrapping measures words with the surface's
//! font metrics, so a paragraph is laid out for a specific surface.

use genpdf::style::Color;

use crate::color;
use crate::error::Result;
use crate::fonts::DEFAULT_FONT;
use crate::surface::{Paint, Surface};

/// Marker separating hard lines in paragraph text.
pub const LINE_BREAK_MARKER: &str = "<br />";

const BREAK_VARIANTS: &[&str] = &["<br />", "<br/>", "<br>"];

/// Strips every line of `text` and joins the lines with [`LINE_BREAK_MARKER`].
pub fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(LINE_BREAK_MARKER)
}

/// Splits paragraph text at every line-break marker.
pub fn split_hard_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    loop {
        let next = BREAK_VARIANTS
            .iter()
            .filter_map(|marker| {
                let index = rest.find(marker)?;
                Some((index, marker.len()))
            })
            .min_by_key(|(index, _)| *index);
        match next {
            Some((index, len)) => {
                lines.push(&rest[..index]);
                rest = &rest[index + len..];
            }
            None => {
                lines.push(rest);
                return lines;
            }
        }
    }
}

/// Visual attributes of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font: String,
    pub font_size: f64,
    pub leading: f64,
    pub text_color: Color,
    pub border_width: f64,
    pub border_color: Option<Color>,
    pub back_color: Option<Color>,
    pub border_padding: f64,
}

impl ParagraphStyle {
    /// Helvetica 10 on 12 without a border.
    pub fn normal() -> Self {
        Self {
            font: DEFAULT_FONT.to_owned(),
            font_size: 10.0,
            leading: 12.0,
            text_color: color::BLACK,
            border_width: 0.0,
            border_color: None,
            back_color: None,
            border_padding: 0.0,
        }
    }

    /// The bordered style used by the gallery: 1pt black border, pale green fill, 12pt padding.
    pub fn boxed() -> Self {
        Self {
            border_width: 1.0,
            border_color: Some(color::BLACK),
            back_color: color::from_hex("#eeffee"),
            border_padding: 12.0,
            ..Self::normal()
        }
    }
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self::normal()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    text: String,
    style: ParagraphStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &ParagraphStyle {
        &self.style
    }

    /// Breaks the text into lines no wider than `available_width`.
    ///
    /// The resulting layout is as wide as `available_width` and as tall as its
    /// line count times the leading.  Words wider than the available width get
    /// a line of their own.
    pub fn wrap<S>(&self, surface: &S, available_width: f64) -> Result<ParagraphLayout>
    where
        S: Surface + ?Sized,
    {
        let style = &self.style;
        let space = surface.string_width(" ", &style.font, style.font_size)?;
        let mut lines = Vec::new();

        for hard_line in split_hard_lines(&self.text) {
            let mut current = String::new();
            let mut current_width = 0.0;
            for word in hard_line.split_whitespace() {
                let word_width = surface.string_width(word, &style.font, style.font_size)?;
                if current.is_empty() {
                    current.push_str(word);
                    current_width = word_width;
                } else if current_width + space + word_width <= available_width {
                    current.push(' ');
                    current.push_str(word);
                    current_width += space + word_width;
                } else {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_width = word_width;
                }
            }
            lines.push(current);
        }

        let height = lines.len() as f64 * style.leading;
        Ok(ParagraphLayout {
            lines,
            width: available_width,
            height,
            style: style.clone(),
        })
    }
}

/// A paragraph broken into lines for a given width.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphLayout {
    lines: Vec<String>,
    width: f64,
    height: f64,
    style: ParagraphStyle,
}

impl ParagraphLayout {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Draws the paragraph with its lower-left corner at `(x, y)`.
    ///
    /// The border box extends `border_padding` beyond the text block on every side.
    pub fn draw_on<S>(&self, surface: &mut S, x: f64, y: f64) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let style = &self.style;
        surface.save_state();

        let has_border = style.border_width > 0.0 && style.border_color.is_some();
        if style.back_color.is_some() || has_border {
            if let Some(back) = style.back_color {
                surface.set_fill_color(back);
            }
            if let Some(border) = style.border_color {
                surface.set_stroke_color(border);
            }
            surface.set_line_width(style.border_width);
            let pad = style.border_padding;
            let paint = Paint {
                stroke: has_border,
                fill: style.back_color.is_some(),
            };
            surface.rect(
                x - pad,
                y - pad,
                self.width + 2.0 * pad,
                self.height + 2.0 * pad,
                paint,
            )?;
        }

        surface.set_fill_color(style.text_color);
        surface.set_font(&style.font, style.font_size)?;
        let mut baseline = y + self.height - style.font_size;
        for line in &self.lines {
            if !line.is_empty() {
                surface.draw_string(x, baseline, line)?;
            }
            baseline -= style.leading;
        }

        surface.restore_state();
        Ok(())
    }
}
