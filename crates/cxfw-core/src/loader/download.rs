//! Firmware download protocol
//!
//! Images are laid out in two parts. Every data record up to the first end
//! record belongs to the ram loader; once that end record is seen the device
//! has to report ready before anything else is sent. After that, data
//! records below the patch threshold are written straight to their address
//! and records above it go through the patch staging buffer. Later end
//! records are consumed and ignored. When the image is exhausted the status
//! register is cleared and must read back ready.
//!
//! Any error ends the download; there is no retry or resume.

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::poll::poll_ready;
use crate::regmap::RegisterPort;
use crate::srec::{Record, RecordType};
use maybe_async::maybe_async;

use super::patch::PatchDescriptor;
use super::progress::{LoadFailure, LoadProgress, LoadReport};
use super::session::LoadSession;
use super::state::{LoadEvent, LoadState};

/// Download a complete firmware image
///
/// The port must not be used for anything else until this returns; the
/// device is not operational while its loader is running.
#[maybe_async]
pub async fn download<P, R>(
    port: &mut P,
    image: &[u8],
    config: &LoaderConfig,
    progress: &mut R,
) -> core::result::Result<LoadReport, LoadFailure>
where
    P: RegisterPort + ?Sized,
    R: LoadProgress + ?Sized,
{
    let mut session = LoadSession::new(image);
    run_session(&mut session, port, config, progress).await
}

/// Drive an idle session to `Loaded` or `Failed`
///
/// The session is left in its terminal state so callers can inspect where
/// the download stopped.
#[maybe_async]
pub async fn run_session<P, R>(
    session: &mut LoadSession<'_>,
    port: &mut P,
    config: &LoaderConfig,
    progress: &mut R,
) -> core::result::Result<LoadReport, LoadFailure>
where
    P: RegisterPort + ?Sized,
    R: LoadProgress + ?Sized,
{
    let mut report = LoadReport::default();

    match drive(session, port, config, progress, &mut report).await {
        Ok(()) => {
            log::info!(
                "Firmware loaded: {} records ({} direct, {} patch)",
                report.records,
                report.direct_records,
                report.patch_records
            );
            progress.complete(&report);
            Ok(report)
        }
        Err(error) => {
            let state = session.state();
            let offset = match error {
                Error::Decode { offset, .. } => offset,
                _ if state == LoadState::Verifying => session.position(),
                _ => session.record_start(),
            };
            session.fail();

            let failure = LoadFailure {
                state,
                offset,
                records: session.records(),
                error,
            };
            log::error!("{}", failure);
            Err(failure)
        }
    }
}

/// Wait for the device to report ready after a reset
///
/// Uses the same status register and poll budget as the ram loader check,
/// then waits for the configured settle time.
#[maybe_async]
pub async fn wait_for_device<P: RegisterPort + ?Sized>(
    port: &mut P,
    config: &LoaderConfig,
) -> Result<()> {
    let attempts = poll_ready(port, config.status_reg, config.ready_code, &config.ready_poll).await?;
    log::debug!("Device ready after {} status read(s)", attempts);

    if config.settle_ms > 0 {
        port.delay_us(config.settle_ms.saturating_mul(1000)).await;
    }
    Ok(())
}

#[maybe_async]
async fn drive<P, R>(
    session: &mut LoadSession<'_>,
    port: &mut P,
    config: &LoaderConfig,
    progress: &mut R,
    report: &mut LoadReport,
) -> Result<()>
where
    P: RegisterPort + ?Sized,
    R: LoadProgress + ?Sized,
{
    session.transition(LoadEvent::Start)?;
    progress.started(session.image().len());
    log::debug!("Downloading {} byte firmware image", session.image().len());

    while let Some(record) = session.next_record()? {
        trace_record(session, &record);
        apply_record(session, port, config, progress, report, &record).await?;
        progress.record_applied(session.position(), &record);
    }
    report.records = session.records();

    session.transition(LoadEvent::ImageDone)?;
    progress.verifying();
    finalize(port, config).await?;
    session.transition(LoadEvent::Verified)?;
    Ok(())
}

#[maybe_async]
async fn apply_record<P, R>(
    session: &mut LoadSession<'_>,
    port: &mut P,
    config: &LoaderConfig,
    progress: &mut R,
    report: &mut LoadReport,
    record: &Record,
) -> Result<()>
where
    P: RegisterPort + ?Sized,
    R: LoadProgress + ?Sized,
{
    match record.record_type {
        RecordType::End if !session.is_loader_acknowledged() => {
            report.end_records += 1;
            session.transition(LoadEvent::FirstEnd)?;
            log::debug!(
                "Ram loader sent (offset {}), waiting for device",
                session.record_start()
            );

            let attempts =
                poll_ready(port, config.status_reg, config.ready_code, &config.ready_poll).await?;
            session.acknowledge_loader();
            session.transition(LoadEvent::LoaderReady)?;
            log::info!("Ram loader ready after {} status read(s)", attempts);
            progress.loader_ready();
        }
        RecordType::End => {
            report.end_records += 1;
            log::trace!("Ignoring end record at offset {}", session.record_start());
        }
        RecordType::Data if config.is_patch_address(record.address()) => {
            apply_patch(port, config, session.is_loader_acknowledged(), record).await?;
            report.patch_records += 1;
            report.patch_bytes += record.data_len();
        }
        RecordType::Data => {
            port.bulk_write(record.address(), &record.payload).await?;
            report.direct_records += 1;
            report.direct_bytes += record.data_len();
        }
    }
    Ok(())
}

#[maybe_async]
async fn apply_patch<P: RegisterPort + ?Sized>(
    port: &mut P,
    config: &LoaderConfig,
    loader_acknowledged: bool,
    record: &Record,
) -> Result<()> {
    let addr = record.address();
    if !loader_acknowledged {
        return Err(Error::PatchBeforeLoader { addr });
    }

    let descriptor = PatchDescriptor::from_record(record)?;
    port.bulk_write(config.staging_reg, descriptor.as_bytes()).await?;
    port.write(config.control_reg, config.trigger_code).await?;

    let status = port.read(config.control_reg).await?;
    if status != config.accepted_code {
        return Err(Error::PatchRejected { addr, status });
    }

    log::trace!(
        "Patch 0x{:06X} accepted ({} bytes staged at 0x{:04X})",
        descriptor.target(),
        descriptor.as_bytes().len(),
        config.staging_reg
    );
    Ok(())
}

#[maybe_async]
async fn finalize<P: RegisterPort + ?Sized>(port: &mut P, config: &LoaderConfig) -> Result<()> {
    port.write(config.status_reg, config.finalize_code).await?;

    let status = port.read(config.status_reg).await?;
    if status != config.ready_code {
        return Err(Error::NotReady { status });
    }
    Ok(())
}

fn trace_record(session: &LoadSession<'_>, record: &Record) {
    if log::log_enabled!(log::Level::Trace) {
        log::trace!(
            "Record {}: S{} addr 0x{:08X} data_len {} record_len {} offset {} data {:02X?}",
            session.records(),
            record.record_type.code(),
            record.address(),
            record.data_len(),
            record.record_len,
            session.record_start(),
            &record.payload[..]
        );
    }
}
