//! # Firmware Table Providers

/// A firmware table provider, as named by the Win32 `FirmwareTableProviderSignature`.
///
/// Only ACPI is served; any other tag yields empty results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareTableProvider {
    Acpi,
    Unsupported(u32),
}

impl FirmwareTableProvider {
    /// `'ACPI'` as a multi-character constant: the first character in the high byte.
    pub const ACPI_TAG: u32 = u32::from_be_bytes(*b"ACPI");

    #[must_use]
    pub const fn from_tag(tag: u32) -> Self {
        if tag == Self::ACPI_TAG {
            Self::Acpi
        } else {
            Self::Unsupported(tag)
        }
    }

    #[must_use]
    pub const fn tag(self) -> u32 {
        match self {
            Self::Acpi => Self::ACPI_TAG,
            Self::Unsupported(tag) => tag,
        }
    }

    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Acpi)
    }
}

impl From<u32> for FirmwareTableProvider {
    fn from(tag: u32) -> Self {
        Self::from_tag(tag)
    }
}
