use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use lopdf::content::Content;
use lopdf::{Document, Object};
use pdf_showcase::bookmarks;
use pdf_showcase::flowables::{self, later_page_footer, repeated_blocks, Block};
use pdf_showcase::geometry::A4;
use pdf_showcase::{AssetPaths, FlowableOptions};

/// Any TrueType file works: genpdf only takes metrics from it and emits the
/// built-in Times fonts.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

const SERIF_NAMES: &[&str] = &[
    "LiberationSerif-Regular.ttf",
    "LiberationSerif-Bold.ttf",
    "LiberationSerif-Italic.ttf",
    "LiberationSerif-BoldItalic.ttf",
];

fn stand_in_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PDF_SHOWCASE_TEST_FONT").map(PathBuf::from) {
        return path.is_file().then_some(path);
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Writes the report image and installs `font` under every serif file name.
fn write_assets(dir: &Path, font: &Path) -> AssetPaths {
    ImageBuffer::from_pixel(300, 150, Rgb([250u8, 240, 200]))
        .save(dir.join("eggs.jpg"))
        .expect("write jpeg");
    let fonts = dir.join("fonts");
    fs::create_dir_all(&fonts).expect("fonts dir");
    for name in SERIF_NAMES {
        fs::copy(font, fonts.join(name)).expect("copy font");
    }
    AssetPaths::new(dir)
}

/// A `BT`..`ET` block: its `Td` offset, selected font and shown text.
#[derive(Debug, Default)]
struct TextRun {
    position: Option<(f32, f32)>,
    font: Option<(String, f32)>,
    text: String,
}

fn push_string_bytes(text: &mut String, object: &Object) {
    if let Object::String(bytes, _) = object {
        let visible = bytes.iter().filter(|byte| **byte != 0);
        text.extend(visible.map(|byte| *byte as char));
    }
}

fn text_runs(content: &[u8]) -> Vec<TextRun> {
    let content = Content::decode(content).expect("decode content");
    let mut runs = Vec::new();
    let mut current = TextRun::default();
    for operation in content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => current = TextRun::default(),
            "Td" => {
                let x = operands[0].as_float().expect("x");
                let y = operands[1].as_float().expect("y");
                current.position = Some((x, y));
            }
            "Tf" => {
                let name = operands[0].as_name_str().expect("font name").to_owned();
                let size = operands[1].as_float().expect("font size");
                current.font = Some((name, size));
            }
            "Tj" => push_string_bytes(&mut current.text, &operands[0]),
            "TJ" => {
                for object in operands[0].as_array().expect("TJ array") {
                    push_string_bytes(&mut current.text, object);
                }
            }
            "ET" => runs.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    runs
}

fn page_runs(bytes: &[u8]) -> Vec<Vec<TextRun>> {
    let mut document = Document::load_mem(bytes).expect("load pdf");
    document.decompress();
    document
        .get_pages()
        .into_values()
        .map(|page_id| {
            let content = document.get_page_content(page_id).expect("page content");
            text_runs(&content)
        })
        .collect()
}

fn close_to(actual: f32, expected: f64) -> bool {
    (f64::from(actual) - expected).abs() < 0.05
}

#[test]
fn story_has_three_blocks_per_group() {
    for count in [1, 5, 20] {
        let blocks = repeated_blocks(count, Path::new("eggs.jpg"), (100.0, 50.0));
        assert_eq!(blocks.len(), 3 * count);
        assert!(blocks
            .iter()
            .step_by(3)
            .all(|block| matches!(block, Block::Paragraph { .. })));
    }
    assert_eq!(
        later_page_footer(2, "platypus example"),
        "Page 2 platypus example"
    );
}

#[test]
fn report_spans_several_pages() {
    let Some(font) = stand_in_font() else {
        eprintln!("Skipping flowables rendering: no TrueType font found");
        return;
    };

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("flowables.pdf");
    let options = FlowableOptions::new(write_assets(dir.path(), &font))
        .with_output(&output)
        .with_author("flowables tests");

    let pages = flowables::render_flowables(&options).expect("render flowables");
    assert!(pages > 1, "expected several pages, got {pages}");

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(bookmarks::page_count(&bytes).expect("page count"), pages);
    let info = bookmarks::read_document_info(&bytes).expect("info");
    assert_eq!(info.title, "Flowables example title");
    assert_eq!(info.author.as_deref(), Some("flowables tests"));
}

#[test]
fn title_and_footers_are_drawn_per_page() {
    let Some(font) = stand_in_font() else {
        eprintln!("Skipping flowables decorations: no TrueType font found");
        return;
    };

    let dir = tempfile::tempdir().expect("tempdir");
    let options = FlowableOptions::new(write_assets(dir.path(), &font));
    let bytes = flowables::render_flowables_to_bytes(&options).expect("render flowables");
    let pages = page_runs(&bytes);
    assert!(
        pages.len() > 1,
        "expected several pages, got {}",
        pages.len()
    );

    let title = pages[0]
        .iter()
        .find(|run| run.text == "Flowables example title")
        .expect("title on the first page");
    let (_, title_y) = title.position.expect("title position");
    assert!(
        close_to(title_y, A4.1 - 108.0),
        "title baseline at {title_y}"
    );
    let (title_font, title_size) = title.font.as_ref().expect("title font");
    assert!(title_font.contains("Bold"), "title set in {title_font}");
    assert_eq!(*title_size, 16.0);

    let footer = pages[0]
        .iter()
        .find(|run| run.text == "First Page / platypus example")
        .expect("first page footer");
    let (footer_x, footer_y) = footer.position.expect("footer position");
    assert!(close_to(footer_x, 28.3465) && close_to(footer_y, 21.2598));
    assert_eq!(footer.font.as_ref().map(|(_, size)| *size), Some(9.0));
    assert!(pages[0].iter().all(|run| !run.text.starts_with("Page ")));

    for (index, runs) in pages.iter().enumerate().skip(1) {
        let expected = format!("Page {} platypus example", index + 1);
        assert!(
            runs.iter().any(|run| run.text == expected),
            "missing '{expected}'"
        );
        assert!(runs.iter().all(|run| !run.text.starts_with("First Page")));
        assert!(!runs.iter().any(|run| run.text.contains("example title")));
    }
}

#[test]
fn missing_image_fails_before_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = FlowableOptions::new(AssetPaths::new(dir.path()));
    let err = flowables::render_flowables_to_bytes(&options).unwrap_err();
    assert!(matches!(err, pdf_showcase::ShowcaseError::Io { .. }));
}
