//! Walks the ACPI tables the way a Win32 caller of the firmware table APIs would.

use acpi_tables::{
    AcpiError, ConfigTableDirectory, FetchOptions, FirmwareTableProvider, FirmwareTables,
    PhysMapRo, Signature, checksum_valid, is_known_acpi_signature,
};
use alloc::vec;
use alloc::vec::Vec;
use core::str;
use log::{debug, info, warn};
use uefi::Status;

const PROVIDER: FirmwareTableProvider = FirmwareTableProvider::Acpi;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("The configuration table holds no ACPI 2.0 root pointer")]
    NoAcpiRoot,
    #[error("Malformed ACPI data: {0}")]
    Acpi(#[from] AcpiError),
    #[error("Table {signature} changed between size probe and copy")]
    Unstable { signature: Signature },
}

impl From<DumpError> for Status {
    fn from(value: DumpError) -> Self {
        match value {
            DumpError::NoAcpiRoot => Self::NOT_FOUND,
            DumpError::Acpi(_) => Self::VOLUME_CORRUPTED,
            DumpError::Unstable { .. } => Self::ABORTED,
        }
    }
}

/// One fetched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    pub signature: Signature,
    /// SSDT instance the table was fetched with; `0` for everything else.
    pub instance: i32,
    pub length: u32,
    pub address: u64,
    pub checksum_ok: bool,
    pub known: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub tables: usize,
    pub bad_checksums: usize,
}

/// Fetch and log every table, then report how many there were.
///
/// # Errors
/// See [`collect`].
pub fn dump_tables<D, M>(tables: &FirmwareTables<'_, D, M>) -> Result<DumpSummary, DumpError>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let summaries = collect(tables)?;

    let mut bad_checksums = 0;
    for table in &summaries {
        if !table.checksum_ok {
            bad_checksums += 1;
        }
        info!(
            "{} #{}: {} bytes at {:#x}, checksum {}{}",
            table.signature,
            table.instance,
            table.length,
            table.address,
            if table.checksum_ok { "ok" } else { "BAD" },
            if table.known { "" } else { ", unknown signature" }
        );
    }

    Ok(DumpSummary {
        tables: summaries.len(),
        bad_checksums,
    })
}

/// Fetch every XSDT-listed table in order, followed by the DSDT and the XSDT.
///
/// SSDTs are fetched by instance in the order they are listed.
///
/// # Errors
/// Fails if there is no root pointer, if the firmware data is malformed, or if
/// a table changes between probing its size and copying it.
pub fn collect<D, M>(tables: &FirmwareTables<'_, D, M>) -> Result<Vec<TableSummary>, DumpError>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let root = tables.locate_root()?.ok_or(DumpError::NoAcpiRoot)?;
    info!(
        "RSDP at {:#x}: revision {}, OEM \"{}\", XSDT at {:#x}",
        root.rsdp_addr,
        root.revision,
        str::from_utf8(&root.oem_id).unwrap_or("?"),
        root.xsdt_addr
    );

    let required = tables.enumerate(PROVIDER, None)?;
    let mut signatures = vec![0u8; required as usize];
    if tables.enumerate(PROVIDER, Some(&mut signatures))? != required {
        return Err(DumpError::Unstable {
            signature: Signature::XSDT,
        });
    }
    debug!("XSDT lists {} tables", signatures.len() / Signature::SIZE);

    let mut summaries = Vec::with_capacity(signatures.len() / Signature::SIZE + 2);
    let mut next_ssdt = 0;
    for signature in signatures
        .chunks_exact(Signature::SIZE)
        .filter_map(Signature::from_slice)
    {
        let instance = if signature == Signature::SSDT {
            next_ssdt += 1;
            next_ssdt - 1
        } else {
            0
        };

        match fetch(tables, signature, instance)? {
            Some(summary) => summaries.push(summary),
            None => warn!("Listed table {signature} #{instance} could not be fetched"),
        }
    }

    for signature in [Signature::DSDT, Signature::XSDT] {
        match fetch(tables, signature, 0)? {
            Some(summary) => summaries.push(summary),
            None => warn!("No {signature} found"),
        }
    }

    Ok(summaries)
}

fn fetch<D, M>(
    tables: &FirmwareTables<'_, D, M>,
    signature: Signature,
    instance: i32,
) -> Result<Option<TableSummary>, DumpError>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let options = FetchOptions::new().with_instance(instance);

    let probe = tables.fetch(PROVIDER, signature, None, options)?;
    if !probe.is_found() {
        return Ok(None);
    }

    let mut buffer = vec![0u8; probe.length as usize];
    let fetched = tables.fetch(PROVIDER, signature, Some(&mut buffer), options)?;
    let Some(address) = fetched.address.filter(|_| fetched.length == probe.length) else {
        return Err(DumpError::Unstable { signature });
    };

    Ok(Some(TableSummary {
        signature,
        instance,
        length: fetched.length,
        address,
        checksum_ok: checksum_valid(&buffer),
        known: is_known_acpi_signature(signature),
    }))
}
