//! # Windows System-Information APIs on UEFI
//!
//! Binds the [`acpi_tables`] core to a running UEFI firmware, so that code
//! written against `EnumSystemFirmwareTables` and `GetSystemFirmwareTable`
//! runs unmodified in the pre-boot environment.
//!
//! ## Overview
//!
//! ```text
//! C caller / Rust caller
//!         ↓
//! EnumSystemFirmwareTables / GetSystemFirmwareTable   (ffi)
//!         ↓
//! with_firmware_tables()                              (this crate)
//!   • uefi::system::with_config_table
//!   • IdentityMap (physical == virtual during boot services)
//!         ↓
//! acpi_tables::FirmwareTables::{enumerate, fetch}
//! ```
//!
//! ## Key Components
//!
//! * [`IdentityMap`]: [`PhysMapRo`] for the identity-mapped UEFI address space.
//! * [`with_firmware_tables`]: runs a closure against the live configuration table.
//! * [`ffi`]: `efiapi` exports with the Win32 signatures, plus safe wrappers.
//! * [`logger::UefiLogger`]: `log` backend for the UEFI console and QEMU's debug port.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acpi_tables::{FirmwareTableProvider, Signature};
//! use uefi_sysinfo::ffi::get_system_firmware_table;
//!
//! let probe = get_system_firmware_table(FirmwareTableProvider::Acpi, Signature::DSDT, None, 0);
//! let mut dsdt = vec![0u8; probe.length as usize];
//! let fetched = get_system_firmware_table(FirmwareTableProvider::Acpi, Signature::DSDT, Some(&mut dsdt), 0);
//! log::info!("DSDT at {:?}", fetched.address);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod ffi;
pub mod logger;

use acpi_tables::{FirmwareTables, PhysMapRo};
use uefi::table::cfg::ConfigTableEntry;

/// Reads physical memory through the identity map UEFI sets up for boot services.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMap;

impl PhysMapRo for IdentityMap {
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn map_ro<'a>(&self, paddr: u64, len: usize) -> &'a [u8] {
        // UEFI only runs on targets where physical addresses fit a pointer.
        let ptr = core::ptr::with_exposed_provenance::<u8>(paddr as usize);
        // SAFETY: the caller guarantees `paddr..paddr + len` is mapped and readable.
        unsafe { core::slice::from_raw_parts(ptr, len) }
    }
}

/// The firmware table handle for the running UEFI system.
pub type UefiFirmwareTables<'a> = FirmwareTables<'a, [ConfigTableEntry], IdentityMap>;

/// Run `f` against the firmware's ACPI tables.
///
/// The configuration table is looked up afresh on every call.
///
/// # Panics
/// Panics if the UEFI system table has not been registered with the `uefi` crate,
/// which the `#[entry]` macro does before the application's main function runs.
pub fn with_firmware_tables<F, R>(f: F) -> R
where
    F: FnOnce(&UefiFirmwareTables<'_>) -> R,
{
    // `with_config_table` only accepts `Fn`, so the slice is carried out of it.
    let entries = uefi::system::with_config_table(core::ptr::from_ref::<[ConfigTableEntry]>);

    // SAFETY: the configuration table array is owned by firmware and is only
    // replaced through boot services, which nothing calls while `f` runs.
    let entries = unsafe { &*entries };

    // SAFETY: boot services keep physical memory identity-mapped, and the
    // ACPI tables firmware publishes stay in place for the whole session.
    let tables = unsafe { FirmwareTables::new(entries, &IdentityMap) };
    f(&tables)
}
