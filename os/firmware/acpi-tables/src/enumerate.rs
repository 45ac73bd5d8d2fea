//! # Table Enumeration
//!
//! The firmware-table equivalent of `EnumSystemFirmwareTables`: one 4-byte
//! signature per XSDT entry, in XSDT order. The DSDT is not in the XSDT and
//! therefore never listed.

use crate::{
    AcpiError, ConfigTableDirectory, FirmwareTableProvider, FirmwareTables, PhysMapRo, Signature,
};
use log::debug;

/// Bytes written per enumerated table.
#[allow(clippy::cast_possible_truncation)]
const SIGNATURE_LEN: u32 = Signature::SIZE as u32;

impl<D, M> FirmwareTables<'_, D, M>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    /// Write the signature of every XSDT-listed table into `out`.
    ///
    /// Returns the number of bytes required, `entry_count * 4`, whether or not
    /// anything was written. The buffer is written only when it is present and
    /// at least that large; `None` probes the size. An unsupported provider or
    /// a missing root pointer yields `0`.
    ///
    /// # Errors
    /// Returns an [`AcpiError`] if the root pointer, the XSDT or one of the listed
    /// table headers is malformed. Nothing is written in that case.
    pub fn enumerate(
        &self,
        provider: FirmwareTableProvider,
        out: Option<&mut [u8]>,
    ) -> Result<u32, AcpiError> {
        if !provider.is_supported() {
            debug!("Unsupported firmware table provider {:#010x}", provider.tag());
            return Ok(0);
        }

        let Some(xsdt) = self.xsdt()? else {
            return Ok(0);
        };

        // The entry count is bounded by `length / 8`, so this cannot overflow.
        let required = xsdt.entry_count() * SIGNATURE_LEN;

        let Some(out) = out.filter(|out| out.len() >= required as usize) else {
            debug!("Enumeration probe: {required} bytes required");
            return Ok(required);
        };

        // Validate every entry before the first byte goes out.
        for table in self.tables(&xsdt) {
            table?;
        }

        for (slot, table) in out.chunks_exact_mut(Signature::SIZE).zip(self.tables(&xsdt)) {
            slot.copy_from_slice(table?.signature().as_bytes());
        }

        Ok(required)
    }
}
