//! The flowables report: a story of paragraphs, spacers and images paginated by `genpdf`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use genpdf::{elements, Margins, PaperSize};
use image::GenericImageView;
use log::{debug, info};

use crate::bookmarks::{self, DocumentInfo};
use crate::builder::{DocumentBuilder, PageText};
use crate::config::FlowableOptions;
use crate::elements::{decode_image_from_path, mm_from_pt, scaled_image, Spacer};
use crate::error::{Result, ShowcaseError};
use crate::fonts::serif_font_family;
use crate::geometry::{half, A4, CM, INCH};

/// Space reserved above the story for the first-page title.
pub const TITLE_SPACE: f64 = 2.0 * CM;
/// Gap between a paragraph and the image that follows it.
pub const BLOCK_GAP: f64 = 0.2 * CM;
/// Number of sentence repetitions in every paragraph.
pub const SENTENCE_REPEAT: usize = 20;
/// Distance of the title baseline from the top edge.
pub const TITLE_FROM_TOP: f64 = 108.0;
pub const TITLE_FONT_SIZE: u8 = 16;
pub const FOOTER_FONT_SIZE: u8 = 9;
/// Footer baseline origin, measured from the bottom-left corner.
pub const FOOTER_POSITION: (f64, f64) = (CM, 0.75 * CM);
pub const PAGE_MARGIN: f64 = INCH;
const BODY_FONT_SIZE: u8 = 10;
/// Leading of 12pt for the 10pt body text.
const BODY_LINE_SPACING: f64 = 1.2;

/// One unit of content placed by the pagination engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Spacer { width: f64, height: f64 },
    Paragraph { text: String },
    Image {
        path: PathBuf,
        width: f64,
        height: f64,
    },
}

/// Body of paragraph `index`.
pub fn paragraph_text(index: usize) -> String {
    format!("This is paragraph number {}.", index).repeat(SENTENCE_REPEAT)
}

/// Display size of an image: a third of its pixel size, rounded down, in points.
pub fn image_display_size((width_px, height_px): (u32, u32)) -> (f64, f64) {
    (f64::from(width_px / 3), f64::from(height_px / 3))
}

/// `count` groups of (paragraph, spacer, image).
pub fn repeated_blocks(count: usize, image: &Path, (width, height): (f64, f64)) -> Vec<Block> {
    (0..count)
        .flat_map(|index| {
            [
                Block::Paragraph {
                    text: paragraph_text(index),
                },
                Block::Spacer {
                    width: 1.0,
                    height: BLOCK_GAP,
                },
                Block::Image {
                    path: image.to_path_buf(),
                    width,
                    height,
                },
            ]
        })
        .collect()
}

/// The full story: a spacer leaving room for the title, then the repeated groups.
pub fn story(count: usize, image: &Path, size: (f64, f64)) -> Vec<Block> {
    let mut blocks = vec![Block::Spacer {
        width: 1.0,
        height: TITLE_SPACE,
    }];
    blocks.extend(repeated_blocks(count, image, size));
    blocks
}

pub fn first_page_footer(page_info: &str) -> String {
    format!("First Page / {}", page_info)
}

pub fn later_page_footer(page: usize, page_info: &str) -> String {
    format!("Page {} {}", page, page_info)
}

fn first_page_decoration(title: &str, page_info: &str) -> Vec<PageText> {
    let (page_width, page_height) = A4;
    vec![
        PageText::new(
            title,
            half(page_width),
            page_height - TITLE_FROM_TOP,
            TITLE_FONT_SIZE,
        )
        .bold()
        .centered(),
        PageText::new(
            first_page_footer(page_info),
            FOOTER_POSITION.0,
            FOOTER_POSITION.1,
            FOOTER_FONT_SIZE,
        ),
    ]
}

fn later_page_decoration(page: usize, page_info: &str) -> Vec<PageText> {
    vec![PageText::new(
        later_page_footer(page, page_info),
        FOOTER_POSITION.0,
        FOOTER_POSITION.1,
        FOOTER_FONT_SIZE,
    )]
}

/// Builds the document for `blocks` and renders it to PDF bytes.
pub fn render_story(options: &FlowableOptions, blocks: &[Block]) -> Result<Vec<u8>> {
    let font_family = serif_font_family(&options.assets.fonts_dir())?;

    let title = options.title.clone();
    let first_info = options.page_info.clone();
    let later_info = options.page_info.clone();
    let mut document = DocumentBuilder::new()
        .with_title(options.title.as_str())
        .with_paper_size(PaperSize::A4)
        .with_margins(Margins::trbl(
            mm_from_pt(PAGE_MARGIN),
            mm_from_pt(PAGE_MARGIN),
            mm_from_pt(PAGE_MARGIN),
            mm_from_pt(PAGE_MARGIN),
        ))
        .with_font_size(BODY_FONT_SIZE)
        .with_line_spacing(BODY_LINE_SPACING)
        .on_first_page(move |_| first_page_decoration(&title, &first_info))
        .on_later_pages(move |page| later_page_decoration(page, &later_info))
        .build(font_family);

    let mut images: HashMap<&Path, image::DynamicImage> = HashMap::new();
    for block in blocks {
        match block {
            Block::Spacer { width, height } => document.push(Spacer::new(*width, *height)),
            Block::Paragraph { text } => document.push(elements::Paragraph::new(text.as_str())),
            Block::Image {
                path,
                width,
                height,
            } => {
                let decoded = match images.get(path.as_path()) {
                    Some(decoded) => decoded.clone(),
                    None => {
                        let decoded = decode_image_from_path(path)?;
                        images.insert(path.as_path(), decoded.clone());
                        decoded
                    }
                };
                document.push(scaled_image(decoded, *width, *height)?);
            }
        }
    }
    debug!("Laid out {} blocks", blocks.len());

    let mut raw = Vec::new();
    document.render(&mut raw)?;

    let mut info = DocumentInfo::new(options.title.as_str());
    if let Some(author) = &options.author {
        info = info.with_author(author.as_str());
    }
    Ok(bookmarks::apply_document_info(&raw, &info)?)
}

/// Renders the default story described by `options` to PDF bytes.
pub fn render_flowables_to_bytes(options: &FlowableOptions) -> Result<Vec<u8>> {
    let image_path = options.assets.image();
    let size = image_display_size(decode_image_from_path(&image_path)?.dimensions());
    let blocks = story(options.repeat, &image_path, size);
    render_story(options, &blocks)
}

/// Renders the report and writes it to `options.output`, returning the page count.
pub fn render_flowables(options: &FlowableOptions) -> Result<usize> {
    let bytes = render_flowables_to_bytes(options)?;
    let pages = bookmarks::page_count(&bytes)?;
    fs::write(&options.output, &bytes).map_err(|err| ShowcaseError::io(&options.output, err))?;
    info!(
        "Wrote flowables report to {} ({} pages)",
        options.output.display(),
        pages
    );
    Ok(pages)
}
