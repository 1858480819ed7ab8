use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yomitori::config::Config;
use yomitori::geometry::{DragTracker, Point};
use yomitori::ocr::{preprocess_page, OcrSession};
use yomitori::raster::{crop_region, load_image, to_data_url};
use yomitori::store::WordStore;
use yomitori::upload::accept_upload;

#[derive(Parser)]
#[command(name = "yomitori")]
#[command(about = "Crop a region of a manga page and read it through an OCR backend")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// OCR a dragged-out region of a page image
    Region {
        /// Page image file
        #[arg(long)]
        image: PathBuf,
        /// Drag anchor, as X,Y pixel coordinates
        #[arg(long)]
        from: Point,
        /// Drag endpoint, as X,Y pixel coordinates
        #[arg(long)]
        to: Point,
    },
    /// Binarize a whole page and OCR it
    Page {
        /// Page image file
        #[arg(long, conflicts_with = "url")]
        image: Option<PathBuf>,
        /// Remote image URL, passed to the backend as-is
        #[arg(long)]
        url: Option<String>,
    },
    /// List saved words
    Words,
    /// Save a word for later review
    Save { word: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yomitori=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match args.command {
        Command::Region { image, from, to } => {
            let bytes = accept_upload(&[image])?;
            let source = load_image(&bytes)?;

            let mut tracker = DragTracker::new(config.selection.orientation_ratio);
            tracker.on_drag_start(from);
            tracker.on_drag_move(to);
            let selection = tracker
                .on_drag_end()
                .ok_or_else(|| anyhow::anyhow!("no selection was made"))?;
            tracing::info!(
                orientation = selection.orientation.as_str(),
                "Selection finalized"
            );

            let region = crop_region(&source, &selection.rect)?;
            let session = OcrSession::new(&config.backend)?;
            session.invalidate();
            if let Some(lines) = session
                .submit_region(region, selection.orientation)
                .await?
            {
                println!("{}", lines.join(", "));
            }
        }
        Command::Page { image, url } => {
            let locator = match (image, url) {
                (Some(path), None) => {
                    let bytes = accept_upload(&[path])?;
                    let page = preprocess_page(&bytes, &config.filter)?;
                    to_data_url(&page)?
                }
                (None, Some(url)) => url,
                _ => return Err(anyhow::anyhow!("pass exactly one of --image or --url")),
            };

            let session = OcrSession::new(&config.backend)?;
            session.invalidate();
            if let Some(lines) = session.submit_page(&locator).await? {
                println!("{}", lines.join("\n"));
            }
        }
        Command::Words => {
            let store = WordStore::load(&config.store.words_path)?;
            for word in store.words() {
                println!("{word}");
            }
        }
        Command::Save { word } => {
            let mut store = WordStore::load(&config.store.words_path)?;
            store.save_word(&word)?;
            tracing::info!(word = %word, "Saved");
        }
    }

    Ok(())
}
