//! # ACPI Table Dump
//!
//! A UEFI application that lists the firmware's ACPI tables through the
//! `EnumSystemFirmwareTables` / `GetSystemFirmwareTable` emulation and logs,
//! for every table, its length, physical address and checksum state.
//!
//! ```text
//! UEFI Firmware Boot
//!         ↓
//! efi_main
//!   • uefi::helpers::init, UefiLogger
//!         ↓
//! uefi_sysinfo::with_firmware_tables
//!         ↓
//! dump::dump_tables
//!   • locate root, enumerate signatures (probe, then fill)
//!   • fetch every listed table, counting SSDT instances
//!   • fetch the DSDT through the FADT, and the XSDT itself
//! ```
//!
//! Run it from the UEFI shell or as `\EFI\Boot\BOOTX64.EFI`; with the `qemu`
//! feature the log is also written to QEMU's `-debugcon`.

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]
extern crate alloc;

#[cfg_attr(not(target_os = "uefi"), allow(dead_code))]
mod dump;

#[cfg(target_os = "uefi")]
mod app {
    use crate::dump::dump_tables;
    use log::{LevelFilter, error, info};
    use uefi::prelude::*;
    use uefi_sysinfo::logger::UefiLogger;
    use uefi_sysinfo::with_firmware_tables;

    static LOGGER: UefiLogger = UefiLogger::new(LevelFilter::Debug);

    #[entry]
    fn efi_main() -> Status {
        if uefi::helpers::init().is_err() {
            return Status::UNSUPPORTED;
        }

        if LOGGER.init().is_err() {
            return Status::ALREADY_STARTED;
        }

        info!("ACPI table dump reporting");

        match with_firmware_tables(dump_tables) {
            Ok(summary) => {
                info!(
                    "Dumped {} tables, {} with a bad checksum",
                    summary.tables, summary.bad_checksums
                );
                Status::SUCCESS
            }
            Err(e) => {
                error!("ACPI table dump failed: {e}");
                e.into()
            }
        }
    }
}

#[cfg(not(target_os = "uefi"))]
fn main() {
    eprintln!("acpi-dump is a UEFI application; build it for x86_64-unknown-uefi");
}
