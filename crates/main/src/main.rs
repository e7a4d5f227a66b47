use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;

use pdf_showcase::{AssetPaths, FailurePolicy, FlowableOptions, GalleryOptions};

/// Renders the pdf_showcase demonstration documents.
///
/// Input files (`eggs.jpg`, `example_text.txt` and the `fonts/` directory) are
/// looked up under the assets directory, which defaults to the working
/// directory and can be set with `--assets` or `PDF_SHOWCASE_ASSETS`.
#[derive(Parser)]
#[command(author, version, about = "Render the pdf_showcase demo documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Directory holding the image, text and font inputs.
    #[arg(long, env = "PDF_SHOWCASE_ASSETS", default_value = ".")]
    assets: PathBuf,

    /// Output file; defaults to the document's usual name.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Author stored in the document metadata.
    #[arg(long)]
    author: Option<String>,

    /// Title stored in the document metadata.
    #[arg(long)]
    title: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the nine-page drawing gallery (`example.pdf`).
    Gallery {
        #[command(flatten)]
        common: Common,

        /// Log failing pages and keep going instead of aborting.
        #[arg(long)]
        keep_going: bool,

        /// Run every page against an in-memory recorder and print a summary.
        #[arg(long)]
        dry_run: bool,
    },

    /// Render the paginated flowables report (`flowables.pdf`).
    Flowables {
        #[command(flatten)]
        common: Common,

        /// Number of paragraph, spacer and image groups.
        #[arg(long, default_value_t = 20)]
        repeat: usize,
    },
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Gallery {
            common,
            keep_going,
            dry_run,
        } => {
            let mut options = GalleryOptions::new(AssetPaths::new(common.assets));
            if let Some(output) = common.output {
                options = options.with_output(output);
            }
            if let Some(author) = common.author {
                options = options.with_author(author);
            }
            if let Some(title) = common.title {
                options = options.with_title(title);
            }
            if keep_going {
                options = options.with_failure_policy(FailurePolicy::Continue);
            }

            let report = if dry_run {
                let (pages, report) = pdf_showcase::dry_run_gallery(&options)?;
                for (index, page) in pages.iter().enumerate() {
                    println!(
                        "page {}: {} ({} operations)",
                        index + 1,
                        page.title.as_deref().unwrap_or("untitled"),
                        page.operations.len()
                    );
                }
                report
            } else {
                pdf_showcase::render_gallery(&options)?
            };

            for (page, err) in &report.failed {
                eprintln!("page '{}' incomplete: {}", page, err);
            }
            info!("{} gallery pages rendered", report.rendered.len());
        }
        Commands::Flowables { common, repeat } => {
            let mut options =
                FlowableOptions::new(AssetPaths::new(common.assets)).with_repeat(repeat);
            if let Some(output) = common.output {
                options = options.with_output(output);
            }
            if let Some(author) = common.author {
                options = options.with_author(author);
            }
            if let Some(title) = common.title {
                options = options.with_title(title);
            }
            let pages = pdf_showcase::render_flowables(&options)?;
            println!("{}: {} pages", options.output.display(), pages);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
