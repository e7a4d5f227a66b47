use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use pdf_showcase::bookmarks::{self, DocumentInfo};
use pdf_showcase::geometry::{half, PageGeometry};
use pdf_showcase::recording::Operation;
use pdf_showcase::{
    dry_run_gallery, render_gallery, render_gallery_to_bytes, translated, AssetPaths,
    GalleryOptions, GalleryPage, PdfCanvas, RecordingSurface, Surface,
};

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

const TEXT: &str = "The quick brown fox\n   jumps over the lazy dog.\n\nEnd of text.\n";

fn write_fixture(dir: &Path, font: Option<&Path>) {
    ImageBuffer::from_pixel(64, 48, Rgb([240u8, 220, 180]))
        .save(dir.join("eggs.jpg"))
        .expect("write jpeg");
    fs::write(dir.join("example_text.txt"), TEXT).expect("write text");

    let fonts = dir.join("fonts");
    fs::create_dir_all(&fonts).expect("fonts dir");
    for name in ["Argos-Regular", "kberry", "BluePlateSpecialNF"] {
        let target = fonts.join(format!("{}.ttf", name));
        match font {
            Some(source) => {
                fs::copy(source, &target).expect("copy font");
            }
            None => fs::write(&target, b"").expect("write placeholder font"),
        }
    }
}

fn system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

#[test]
fn dry_run_produces_nine_pages_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path(), None);
    let options = GalleryOptions::new(AssetPaths::new(dir.path()));

    let (pages, report) = dry_run_gallery(&options).expect("dry run");

    assert!(report.is_complete());
    assert_eq!(report.rendered, GalleryPage::ALL.to_vec());
    let titles: Vec<_> = pages.iter().map(|page| page.title.as_deref()).collect();
    let expected: Vec<_> = GalleryPage::ALL
        .iter()
        .map(|page| Some(page.title()))
        .collect();
    assert_eq!(titles, expected);
    assert!(pages.iter().all(|page| !page.operations.is_empty()));
}

#[test]
fn captions_are_drawn_in_the_translated_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path(), None);
    let options = GalleryOptions::new(AssetPaths::new(dir.path()));
    let geometry = options.geometry;
    let margin = geometry.margin();

    let (pages, _) = dry_run_gallery(&options).expect("dry run");

    let margin_page = &pages[0];
    assert!(matches!(
        margin_page.operations[0],
        Operation::Rect { x, y, .. } if x == margin && y == margin
    ));
    let caption_y = margin_page
        .operations
        .iter()
        .find_map(|op| match op {
            Operation::Text { y, text, .. } if text.starts_with("First Requirement") => Some(*y),
            _ => None,
        })
        .expect("caption");
    assert_eq!(caption_y, margin + half(geometry.usable_height()));

    assert_eq!(
        pages[7].texts().last().copied(),
        Some("Seventh Requirement: the ideal world")
    );
    assert!(pages[5]
        .texts()
        .contains(&"Sixth Requirement: Fonts (Courier 22)."));
    assert!(pages[6]
        .texts()
        .contains(&"Sixth Requirement (b): T.T. Fonts (kberry 18)."));
    assert!(pages[8].texts().contains(&"standard39: 1234567890"));
}

#[test]
fn offsets_accumulate_until_the_page_is_closed() {
    let mut surface = RecordingSurface::new();
    let shift = translated("shift", 10.0, 5.0, |surface: &mut RecordingSurface, _: ()| {
        surface.rect(0.0, 0.0, 1.0, 1.0, pdf_showcase::surface::Paint::STROKE)
    });

    shift.call(&mut surface, ()).expect("first");
    shift.call(&mut surface, ()).expect("second");
    assert_eq!(surface.origin(), (20.0, 10.0));
    surface.show_page().expect("show page");
    assert_eq!(surface.origin(), (0.0, 0.0));

    let pages = surface.into_pages();
    assert!(matches!(
        pages[0].operations[1],
        Operation::Rect { x, y, .. } if x == 20.0 && y == 10.0
    ));
}

#[test]
fn pdf_canvas_writes_metadata_and_outline() {
    let geometry = PageGeometry::a4();
    let mut canvas = PdfCanvas::new(
        geometry,
        DocumentInfo::new("Canvas check").with_author("tests"),
    );

    canvas.bookmark_page("Boxes");
    translated(
        "draw_margin_box",
        geometry.margin(),
        geometry.margin(),
        pdf_showcase::gallery::draw_margin_box::<PdfCanvas>,
    )
    .call(&mut canvas, (&geometry, 5.0))
    .expect("margin box");
    canvas.show_page().expect("show page");

    canvas.bookmark_page("Fonts");
    pdf_showcase::gallery::draw_fonts(
        &mut canvas,
        (&geometry, &["Times-Roman", "Courier"][..], &[10.0, 16.0][..]),
    )
    .expect("fonts");
    canvas.show_page().expect("show page");

    let bytes = canvas.finish().expect("finish");
    assert_eq!(bookmarks::page_count(&bytes).expect("page count"), 2);
    assert_eq!(
        bookmarks::outline_titles(&bytes).expect("outline"),
        vec!["Boxes".to_owned(), "Fonts".to_owned()]
    );
    assert_eq!(
        bookmarks::read_document_info(&bytes).expect("info"),
        DocumentInfo::new("Canvas check").with_author("tests")
    );
}

#[test]
fn full_gallery_pdf_with_embedded_fonts() {
    let Some(font) = system_font() else {
        eprintln!("Skipping full gallery rendering: no TrueType font found");
        return;
    };

    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path(), Some(&font));
    let output = dir.path().join("example.pdf");
    let options = GalleryOptions::new(AssetPaths::new(dir.path()))
        .with_output(&output)
        .with_author("gallery tests");

    let report = render_gallery(&options).expect("render gallery");
    assert!(report.is_complete());

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(bookmarks::page_count(&bytes).expect("page count"), 9);
    let titles = bookmarks::outline_titles(&bytes).expect("outline");
    let expected: Vec<String> = GalleryPage::ALL
        .iter()
        .map(|page| page.title().to_owned())
        .collect();
    assert_eq!(titles, expected);
    let info = bookmarks::read_document_info(&bytes).expect("info");
    assert_eq!(info.author.as_deref(), Some("gallery tests"));
    assert_eq!(info.title, options.title);
}

#[test]
fn failed_render_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("example.pdf");
    let options = GalleryOptions::new(AssetPaths::new(dir.path().join("missing")))
        .with_output(&output);

    assert!(render_gallery_to_bytes(&options).is_err());
    assert!(render_gallery(&options).is_err());
    assert!(!output.exists());
}
