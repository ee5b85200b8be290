//! Decode command implementation

use cxfw_core::config::LoaderConfig;
use cxfw_core::srec::{Record, Records};
use std::path::Path;

/// Totals for an image listing
#[derive(Default)]
struct Summary {
    records: usize,
    loader_records: usize,
    direct_records: usize,
    patch_records: usize,
    end_records: usize,
    payload_bytes: usize,
    checksum_mismatches: usize,
}

/// Decode an image without touching any hardware
///
/// Lists every record with the path the loader would send it down, then a
/// summary. Stops at the first record that fails to decode.
pub fn run_decode(
    input: &Path,
    config: &LoaderConfig,
    summary_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = std::fs::read(input)
        .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

    log::info!("Decoding {} ({} bytes)", input.display(), image.len());

    if !summary_only {
        println!(
            "{:>8}  {:4}  {:>10}  {:>4}  {:8}  Checksum",
            "Offset", "Type", "Address", "Len", "Path"
        );
        println!("{}", "-".repeat(56));
    }

    let mut summary = Summary::default();
    let mut loader_seen = false;

    for item in Records::new(&image) {
        let (offset, record) = item?;
        summary.records += 1;

        let path = if record.is_end() {
            summary.end_records += 1;
            let path = if loader_seen { "ignored" } else { "loader" };
            loader_seen = true;
            path
        } else if config.is_patch_address(record.address()) {
            summary.patch_records += 1;
            if !loader_seen {
                log::warn!(
                    "Patch record at offset {} appears before the ram loader end record",
                    offset
                );
            }
            "patch"
        } else {
            summary.direct_records += 1;
            if !loader_seen {
                summary.loader_records += 1;
            }
            "direct"
        };
        summary.payload_bytes += record.data_len();

        let checksum_ok = record.checksum == Some(record.computed_checksum());
        if !checksum_ok {
            summary.checksum_mismatches += 1;
        }

        if !summary_only {
            println!(
                "{:>8}  S{:<3}  0x{:08X}  {:>4}  {:8}  {}",
                offset,
                record.record_type.code(),
                record.address(),
                record.data_len(),
                path,
                checksum_text(&record, checksum_ok)
            );
        }
    }

    println!();
    println!("Records:         {}", summary.records);
    println!("  ram loader:    {}", summary.loader_records);
    println!("  direct:        {}", summary.direct_records);
    println!("  patch:         {}", summary.patch_records);
    println!("  end:           {}", summary.end_records);
    println!("Payload bytes:   {}", summary.payload_bytes);

    if summary.checksum_mismatches > 0 {
        println!(
            "Note: {} record(s) carry a checksum that does not match their contents \
             (checksums are not enforced during download)",
            summary.checksum_mismatches
        );
    }
    if summary.end_records == 0 {
        log::warn!("Image has no end record; the ram loader would never be acknowledged");
    }

    Ok(())
}

fn checksum_text(record: &Record, ok: bool) -> String {
    match record.checksum {
        Some(c) if ok => format!("{:02X}", c),
        Some(c) => format!("{:02X} (expected {:02X})", c, record.computed_checksum()),
        None => "malformed".to_string(),
    }
}
