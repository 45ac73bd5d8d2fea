//! # FADT (Fixed ACPI Description Table)
//!
//! Only the DSDT pointer is interpreted. The DSDT is not listed in the XSDT;
//! the FADT is the one place that knows where it lives.

use crate::{PhysMapRo, TableView, read_u32_le, read_u64_le};

/// Offset of the legacy 32-bit `DSDT` field.
const DSDT_OFFSET: usize = 40;

/// Offset of the 64-bit `X_DSDT` field (ACPI 2.0+).
const X_DSDT_OFFSET: usize = 140;

/// Physical address of the DSDT named by `fadt`, or 0 if it names none.
///
/// `X_DSDT` takes precedence. The 32-bit field is only used when the FADT is
/// too short to carry `X_DSDT`, or `X_DSDT` is zero.
///
/// # Safety
/// `map` must be able to map the whole FADT.
pub(crate) unsafe fn dsdt_address(map: &impl PhysMapRo, fadt: &TableView) -> u64 {
    let bytes = unsafe { fadt.bytes(map) };
    dsdt_address_from_bytes(bytes)
}

fn dsdt_address_from_bytes(bytes: &[u8]) -> u64 {
    match read_u64_le(bytes, X_DSDT_OFFSET) {
        Some(x_dsdt) if x_dsdt != 0 => x_dsdt,
        _ => read_u32_le(bytes, DSDT_OFFSET).map_or(0, u64::from),
    }
}
