use std::error::Error;

use pdf_showcase::{AssetPaths, FlowableOptions};

/// Renders `flowables.pdf`; the `LiberationSerif` files must be present in `<assets>/fonts`.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let root = std::env::var_os("PDF_SHOWCASE_ASSETS").unwrap_or_else(|| ".".into());
    let options = FlowableOptions::new(AssetPaths::new(root));
    let pages = pdf_showcase::render_flowables(&options)?;
    println!("{}: {} pages", options.output.display(), pages);
    Ok(())
}
