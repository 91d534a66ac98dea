//! Headless shell for the browser core
//!
//! Loads one directory, waits for the scan to finish and prints the
//! resulting thumbnail listing. Useful for smoke-testing the pipeline
//! without a GUI front end.

use anyhow::{Context, Result};
use app_core::{Browser, ImageDecoder, LogInfoSink};
use app_fs::TransferBuffer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    app_log::init()?;

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut browser = Browser::new(
        Arc::new(ImageDecoder::new()),
        transfer_buffer(),
        Arc::new(LogInfoSink),
    )
    .context("failed to initialize browser")?;

    tracing::info!("Scanning {}", dir.display());
    browser.open_directory(&dir);

    loop {
        let outcome = browser.pump();
        if outcome.load_completed {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    for item in browser.catalog().items() {
        println!(
            "{}\t{}x{}\t{} bytes",
            item.entry.name, item.raster.width, item.raster.height, item.entry.size
        );
    }
    println!("{} images", browser.catalog().len());

    Ok(())
}

#[cfg(feature = "clipboard")]
fn transfer_buffer() -> Arc<dyn TransferBuffer> {
    Arc::new(app_fs::SystemClipboard::new())
}

#[cfg(not(feature = "clipboard"))]
fn transfer_buffer() -> Arc<dyn TransferBuffer> {
    Arc::new(app_fs::InProcessBuffer::new())
}
