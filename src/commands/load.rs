//! Load command implementation

use cxfw_core::config::LoaderConfig;
use cxfw_core::loader::{self, LoadProgress, LoadReport};
use cxfw_core::regmap::RegisterPort;
use cxfw_core::srec::Record;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Progress bar over the image bytes consumed so far
struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")?
                .progress_chars("#>-"),
        );
        Ok(Self { pb })
    }
}

impl LoadProgress for BarProgress {
    fn started(&mut self, image_len: usize) {
        self.pb.set_length(image_len as u64);
        self.pb.set_message("ram loader");
    }

    fn record_applied(&mut self, position: usize, _record: &Record) {
        self.pb.set_position(position as u64);
    }

    fn loader_ready(&mut self) {
        self.pb.set_message("firmware");
    }

    fn verifying(&mut self) {
        self.pb.set_message("verifying");
    }

    fn complete(&mut self, _report: &LoadReport) {
        self.pb.finish_with_message("Load complete");
    }
}

/// Download a firmware image into the codec
pub fn run_load(
    port: &mut dyn RegisterPort,
    input: &Path,
    config: &LoaderConfig,
    wait: bool,
) -> Result<LoadReport, Box<dyn std::error::Error>> {
    let image = std::fs::read(input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    log::info!("Loading {} ({} bytes)", input.display(), image.len());

    if wait {
        log::info!("Waiting for the device to come out of reset...");
        loader::wait_for_device(port, config)?;
    }

    let mut progress = BarProgress::new()?;
    let report = match loader::download(port, &image, config, &mut progress) {
        Ok(report) => report,
        Err(failure) => {
            progress.pb.abandon_with_message("Load failed");
            return Err(failure.into());
        }
    };

    println!(
        "Loaded {} records: {} direct ({} bytes), {} patch ({} bytes)",
        report.records,
        report.direct_records,
        report.direct_bytes,
        report.patch_records,
        report.patch_bytes
    );
    if report.end_records > 1 {
        log::debug!("{} extra end record(s) ignored", report.end_records - 1);
    }

    Ok(report)
}
