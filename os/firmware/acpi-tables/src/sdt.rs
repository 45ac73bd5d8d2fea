//! # System Description Table Header

use crate::{AcpiError, PhysMapRo, Signature};

/// The 36-byte header every ACPI table starts with, the XSDT, DSDT and SSDTs included.
#[derive(Debug, Clone, Copy)]
#[repr(C, packed)]
pub struct SdtHeader {
    pub signature: Signature,
    /// Total length of the table in bytes, header included.
    pub length: u32,
    pub revision: u8,
    pub checksum: u8,
    pub oem_id: [u8; 6],
    pub oem_table_id: [u8; 8],
    pub oem_revision: u32,
    pub creator_id: u32,
    pub creator_revision: u32,
}

impl SdtHeader {
    pub const SIZE: usize = 36;

    /// Read a header from the start of `bytes`, or `None` if they are too short.
    #[must_use]
    pub fn read_from(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        // SAFETY: bounds checked above; the read tolerates any alignment.
        Some(unsafe { core::ptr::read_unaligned(bytes.as_ptr().cast::<Self>()) })
    }

    #[must_use]
    pub const fn signature(&self) -> Signature {
        self.signature
    }

    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }
}

/// A bounds-checked view of one table: its physical address and its header.
///
/// Constructing a view guarantees that the declared length covers the header
/// and that `address + length` does not overflow.
#[derive(Debug, Clone, Copy)]
pub struct TableView {
    address: u64,
    header: SdtHeader,
}

impl TableView {
    /// Read and validate the header at `address`.
    ///
    /// # Safety
    /// `map` must be able to map [`SdtHeader::SIZE`] bytes at `address`.
    pub(crate) unsafe fn read(map: &impl PhysMapRo, address: u64) -> Result<Self, AcpiError> {
        if address == 0 {
            return Err(AcpiError::NullAddress);
        }

        let bytes = unsafe { map.map_ro(address, SdtHeader::SIZE) };
        let Some(header) = SdtHeader::read_from(bytes) else {
            return Err(AcpiError::TableTooShort {
                signature: Signature::from_slice(bytes).unwrap_or_default(),
                length: u32::try_from(bytes.len()).unwrap_or(u32::MAX),
            });
        };
        let length = header.length();
        if (length as usize) < SdtHeader::SIZE {
            return Err(AcpiError::TableTooShort {
                signature: header.signature(),
                length,
            });
        }
        address
            .checked_add(u64::from(length))
            .ok_or(AcpiError::AddressOverflow)?;

        Ok(Self { address, header })
    }

    /// Physical address of the first header byte.
    #[must_use]
    pub const fn address(&self) -> u64 {
        self.address
    }

    #[must_use]
    pub const fn header(&self) -> &SdtHeader {
        &self.header
    }

    #[must_use]
    pub const fn signature(&self) -> Signature {
        self.header.signature()
    }

    #[must_use]
    pub const fn length(&self) -> u32 {
        self.header.length()
    }

    /// The whole table, header included.
    ///
    /// # Safety
    /// `map` must be able to map `length` bytes at the table's address.
    pub(crate) unsafe fn bytes<'a>(&self, map: &impl PhysMapRo) -> &'a [u8] {
        unsafe { map.map_ro(self.address, self.length() as usize) }
    }
}
