//! # XSDT (Extended System Description Table)
//!
//! A common header followed by a packed array of 64-bit table addresses:
//!
//! ```text
//! +0   SdtHeader ("XSDT", length, ...)
//! +36  u64 entry[0]
//! +44  u64 entry[1]
//! ...  up to address + length
//! ```

use crate::{AcpiError, PhysMapRo, SdtHeader, Signature, TableView};
use log::warn;

/// Size in bytes of one XSDT entry.
pub const ENTRY_SIZE: usize = size_of::<u64>();

/// A validated XSDT: the header is sound and lists at least one table.
#[derive(Debug, Clone, Copy)]
pub struct Xsdt {
    view: TableView,
    entry_count: u32,
}

impl Xsdt {
    /// # Safety
    /// `map` must be able to map the XSDT header at `address` and the length it declares.
    pub(crate) unsafe fn parse(map: &impl PhysMapRo, address: u64) -> Result<Self, AcpiError> {
        let view = match unsafe { TableView::read(map, address) } {
            Ok(view) => view,
            Err(AcpiError::TableTooShort { length, .. }) => {
                return Err(AcpiError::XsdtTooShort(length));
            }
            Err(e) => return Err(e),
        };

        if view.signature() != Signature::XSDT {
            return Err(AcpiError::XsdtSignature(view.signature()));
        }

        let payload = view.length() as usize - SdtHeader::SIZE;
        if payload % ENTRY_SIZE != 0 {
            warn!(
                "XSDT payload of {payload} bytes has {} trailing bytes",
                payload % ENTRY_SIZE
            );
        }

        let entry_count =
            u32::try_from(payload / ENTRY_SIZE).map_err(|_| AcpiError::AddressOverflow)?;
        if entry_count == 0 {
            return Err(AcpiError::EmptyXsdt);
        }

        Ok(Self { view, entry_count })
    }

    /// The XSDT itself as a table.
    #[must_use]
    pub const fn view(&self) -> &TableView {
        &self.view
    }

    #[must_use]
    pub const fn address(&self) -> u64 {
        self.view.address()
    }

    /// Number of table addresses, `(length - 36) / 8`.
    #[must_use]
    pub const fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// The entry array, without trailing bytes that do not form a whole entry.
    ///
    /// # Safety
    /// `map` must be able to map the whole XSDT.
    pub(crate) unsafe fn entries<'a>(&self, map: &impl PhysMapRo) -> &'a [u8] {
        let len = SdtHeader::SIZE + self.entry_count as usize * ENTRY_SIZE;
        let bytes = unsafe { map.map_ro(self.view.address(), len) };
        &bytes[SdtHeader::SIZE..]
    }
}
