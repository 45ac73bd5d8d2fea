//! # ACPI Errors

use crate::Signature;

/// Malformed firmware data encountered while locating or walking ACPI tables.
///
/// "Not found" and "buffer too small" are regular outcomes and never show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcpiError {
    #[error("A firmware structure address is null")]
    NullAddress,
    #[error("The root pointer does not carry the \"RSD PTR \" signature")]
    InvalidRsdpSignature,
    #[error("The root pointer checksum does not sum to zero")]
    RsdpChecksum,
    #[error("The root pointer revision {0} predates ACPI 2.0")]
    UnsupportedRevision(u8),
    #[error("The root pointer declares an invalid length of {0} bytes")]
    RsdpLength(u32),
    #[error("The root table carries signature {0} instead of XSDT")]
    XsdtSignature(Signature),
    #[error("The XSDT length of {0} bytes does not cover its header")]
    XsdtTooShort(u32),
    #[error("The XSDT does not list any table")]
    EmptyXsdt,
    #[error("Table {signature} declares {length} bytes, less than its header")]
    TableTooShort { signature: Signature, length: u32 },
    #[error("A table address plus its length overflows the address space")]
    AddressOverflow,
}
