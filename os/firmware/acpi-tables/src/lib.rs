//! # ACPI Firmware Table Access
//!
//! This crate locates and reads the ACPI tables a UEFI firmware publishes, and
//! exposes them through the two operations the Windows firmware-table API is
//! built from: enumerate every table signature, and fetch one table's raw bytes.
//!
//! ## Architecture
//!
//! ```text
//! UEFI Configuration Table (GUID, address) list
//!     ↓  ACPI 2.0 GUID, first match
//! XSDP (Extended System Description Pointer)
//!     ↓  xsdt_address
//! XSDT (Extended System Description Table)
//!     ↓  packed u64 table addresses
//! FACP, APIC, SSDT, HPET, MCFG, ...
//!     ↓  FACP.X_DSDT
//! DSDT
//! ```
//!
//! ## Key Components
//!
//! ### Context handle ([`FirmwareTables`])
//! All operations go through an explicit handle holding the configuration
//! table directory ([`ConfigTableDirectory`]) and a physical memory mapper
//! ([`PhysMapRo`]). Each call re-resolves the root pointer and re-walks the XSDT.
//!
//! ### Probe, then fill
//! [`FirmwareTables::enumerate`] and [`FirmwareTables::fetch`] always report the
//! number of bytes the caller needs. The output buffer is written only when it is
//! present and large enough, and then completely:
//!
//! ```rust,ignore
//! let needed = tables.enumerate(FirmwareTableProvider::Acpi, None)?;
//! let mut buf = vec![0u8; needed as usize];
//! tables.enumerate(FirmwareTableProvider::Acpi, Some(&mut buf))?;
//! ```
//!
//! ### Special tables
//! * **DSDT**: not listed in the XSDT; reached through the FADT (`FACP`).
//! * **SSDT**: may occur several times; selected by a zero-based instance ordinal.
//! * **XSDT**: the root table itself, returned without walking its entries.
//!
//! ## Safety Considerations
//!
//! Every address this crate dereferences comes from firmware. Lengths are
//! validated before they are used to size a mapping, and no walk reads beyond
//! `address + length` of the table it walks. Malformed data is reported as an
//! [`AcpiError`] instead of being followed.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod directory;
mod enumerate;
mod error;
mod fadt;
mod fetch;
mod firmware;
mod provider;
pub mod rsdp;
mod sdt;
mod signature;
mod xsdt;

pub use directory::{ACPI2_TABLE_GUID, ConfigTable, ConfigTableDirectory};
pub use error::AcpiError;
pub use fetch::{FetchOptions, TableFetch};
pub use firmware::{FirmwareTables, TableIter};
pub use provider::FirmwareTableProvider;
pub use rsdp::{AcpiRoot, locate_acpi_root};
pub use sdt::{SdtHeader, TableView};
pub use signature::{KNOWN_SIGNATURES, Signature, is_known_acpi_signature};
pub use xsdt::Xsdt;

/// Map a physical region and return a *read-only* byte slice for its contents.
/// You provide the implementation (identity map, kmap, etc.).
pub trait PhysMapRo {
    /// # Safety
    /// The implementor must ensure the returned slice is valid for `len` bytes.
    unsafe fn map_ro<'a>(&self, paddr: u64, len: usize) -> &'a [u8];
}

/// Returns `true` if all bytes of an ACPI structure sum to zero (mod 256).
#[must_use]
pub fn checksum_valid(bytes: &[u8]) -> bool {
    sum(bytes) == 0
}

fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |a, &b| a.wrapping_add(b))
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes.get(offset..offset.checked_add(4)?)?);
    Some(u32::from_le_bytes(raw))
}

fn read_u64_le(bytes: &[u8], offset: usize) -> Option<u64> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes.get(offset..offset.checked_add(8)?)?);
    Some(u64::from_le_bytes(raw))
}
