use std::error::Error;

use pdf_showcase::{AssetPaths, GalleryOptions};

/// Renders `example.pdf` from the assets in `PDF_SHOWCASE_ASSETS` (default: working directory).
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let root = std::env::var_os("PDF_SHOWCASE_ASSETS").unwrap_or_else(|| ".".into());
    let options = GalleryOptions::new(AssetPaths::new(root));
    let report = pdf_showcase::render_gallery(&options)?;
    println!(
        "{}: {} pages",
        options.output.display(),
        report.rendered.len()
    );
    Ok(())
}
