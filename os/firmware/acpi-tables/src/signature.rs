//! # ACPI Table Signatures

use core::fmt;

/// A 4-byte ACPI table signature, compared as raw bytes.
///
/// The `u32` form used by the Windows firmware-table API stores the first
/// character in the least-significant byte, so `'TDSD'` is [`Signature::DSDT`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Signature([u8; 4]);

impl Signature {
    pub const APIC: Self = Self(*b"APIC");
    pub const DSDT: Self = Self(*b"DSDT");
    pub const FACP: Self = Self(*b"FACP");
    pub const FACS: Self = Self(*b"FACS");
    pub const HPET: Self = Self(*b"HPET");
    pub const MCFG: Self = Self(*b"MCFG");
    pub const RSDT: Self = Self(*b"RSDT");
    pub const SSDT: Self = Self(*b"SSDT");
    pub const XSDT: Self = Self(*b"XSDT");

    /// The FADT is published under the legacy signature `FACP`.
    pub const FADT: Self = Self::FACP;

    /// Size of a signature in bytes.
    pub const SIZE: usize = 4;

    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Decode a Win32 `FirmwareTableID` (first character in the low byte).
    #[must_use]
    pub const fn from_u32(id: u32) -> Self {
        Self(id.to_le_bytes())
    }

    /// Encode as a Win32 `FirmwareTableID` (first character in the low byte).
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Read a signature from the first four bytes of `bytes`.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes.get(..Self::SIZE)?);
        Some(Self(raw))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Signature {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<Signature> for [u8; 4] {
    fn from(signature: Signature) -> Self {
        signature.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '.'
            };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(\"{self}\")")
    }
}

/// Table signatures defined by ACPI 6.2, including the reserved ones.
pub static KNOWN_SIGNATURES: &[Signature] = &[
    Signature(*b"APIC"),
    Signature(*b"BERT"),
    Signature(*b"BGRT"),
    Signature(*b"CPEP"),
    Signature(*b"DSDT"),
    Signature(*b"ECDT"),
    Signature(*b"EINJ"),
    Signature(*b"ERST"),
    Signature(*b"FACP"),
    Signature(*b"FACS"),
    Signature(*b"FPDT"),
    Signature(*b"GTDT"),
    Signature(*b"HEST"),
    Signature(*b"HMAT"),
    Signature(*b"MPST"),
    Signature(*b"MSCT"),
    Signature(*b"NFIT"),
    Signature(*b"PDTT"),
    Signature(*b"PMTT"),
    Signature(*b"PPTT"),
    Signature(*b"PSDT"),
    Signature(*b"RASF"),
    Signature(*b"RSDT"),
    Signature(*b"SBST"),
    Signature(*b"SDEV"),
    Signature(*b"SLIT"),
    Signature(*b"SRAT"),
    Signature(*b"SSDT"),
    Signature(*b"XSDT"),
    Signature(*b"BOOT"),
    Signature(*b"CSRT"),
    Signature(*b"DBG2"),
    Signature(*b"DBGP"),
    Signature(*b"DMAR"),
    Signature(*b"DPPT"),
    Signature(*b"DRTM"),
    Signature(*b"ETDT"),
    Signature(*b"HPET"),
    Signature(*b"iBFT"),
    Signature(*b"IORT"),
    Signature(*b"IVRS"),
    Signature(*b"LPIT"),
    Signature(*b"MCFG"),
    Signature(*b"MCHI"),
    Signature(*b"MSDM"),
    Signature(*b"SDEI"),
    Signature(*b"SLIC"),
    Signature(*b"SPCR"),
    Signature(*b"SPMI"),
    Signature(*b"STAO"),
    Signature(*b"TCPA"),
    Signature(*b"TPM2"),
    Signature(*b"UEFI"),
    Signature(*b"WAET"),
    Signature(*b"WDAT"),
    Signature(*b"WDRT"),
    Signature(*b"WPBT"),
    Signature(*b"WSMT"),
    Signature(*b"XENV"),
];

/// Returns `true` if `signature` names a table defined by ACPI 6.2.
#[must_use]
pub fn is_known_acpi_signature(signature: Signature) -> bool {
    KNOWN_SIGNATURES.contains(&signature)
}
