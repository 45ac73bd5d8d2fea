//! # Firmware Table Context

use crate::xsdt::ENTRY_SIZE;
use crate::{AcpiError, AcpiRoot, ConfigTableDirectory, PhysMapRo, TableView, Xsdt};
use core::slice::ChunksExact;
use log::trace;

/// Handle onto the firmware's ACPI tables.
///
/// Holds the configuration table directory and the mapper used to read the
/// structures it points at. Nothing is cached: every operation resolves the
/// root pointer and walks the XSDT again.
pub struct FirmwareTables<'a, D: ?Sized, M> {
    pub(crate) directory: &'a D,
    pub(crate) map: &'a M,
}

impl<'a, D, M> FirmwareTables<'a, D, M>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    /// # Safety
    /// For as long as the handle lives, `map` must be able to map every ACPI
    /// structure reachable from `directory` for the length that structure
    /// declares. On UEFI with the identity map this holds while the tables
    /// stay in place, which firmware guarantees after boot.
    #[must_use]
    pub const unsafe fn new(directory: &'a D, map: &'a M) -> Self {
        Self { directory, map }
    }

    /// Locate the ACPI 2.0 root pointer.
    ///
    /// # Errors
    /// Returns an [`AcpiError`] if the root pointer entry exists but is malformed.
    pub fn locate_root(&self) -> Result<Option<AcpiRoot>, AcpiError> {
        // SAFETY: guaranteed by the contract of `new`.
        unsafe { crate::locate_acpi_root(self.directory, self.map) }
    }

    /// Locate and validate the XSDT.
    ///
    /// # Errors
    /// Returns an [`AcpiError`] if the root pointer or the XSDT header is malformed.
    pub fn xsdt(&self) -> Result<Option<Xsdt>, AcpiError> {
        let Some(root) = self.locate_root()? else {
            return Ok(None);
        };

        // SAFETY: guaranteed by the contract of `new`.
        let xsdt = unsafe { Xsdt::parse(self.map, root.xsdt_addr)? };
        trace!(
            "XSDT at {:#018x}: {} bytes, {} entries",
            xsdt.address(),
            xsdt.view().length(),
            xsdt.entry_count()
        );
        Ok(Some(xsdt))
    }

    /// Iterate the tables listed in `xsdt`, in XSDT order.
    #[must_use]
    pub fn tables(&self, xsdt: &Xsdt) -> TableIter<'a, M> {
        // SAFETY: guaranteed by the contract of `new`.
        let entries = unsafe { xsdt.entries(self.map) };
        TableIter {
            map: self.map,
            entries: entries.chunks_exact(ENTRY_SIZE),
        }
    }

    /// The raw bytes of `table`, header included.
    #[must_use]
    pub fn table_bytes(&self, table: &TableView) -> &'a [u8] {
        // SAFETY: views are only handed out for tables reachable from the
        // directory, which `new` requires to be mappable.
        unsafe { table.bytes(self.map) }
    }
}

/// Iterator over the tables an XSDT points at.
///
/// Yields an error for an entry whose header is malformed and carries on with
/// the next one.
pub struct TableIter<'a, M> {
    map: &'a M,
    entries: ChunksExact<'a, u8>,
}

impl<M: PhysMapRo> Iterator for TableIter<'_, M> {
    type Item = Result<TableView, AcpiError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        let mut raw = [0u8; ENTRY_SIZE];
        raw.copy_from_slice(entry);
        let address = u64::from_le_bytes(raw);

        // SAFETY: the iterator is created by `FirmwareTables::tables`, whose
        // handle guarantees every listed table is mappable.
        Some(unsafe { TableView::read(self.map, address) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<M: PhysMapRo> ExactSizeIterator for TableIter<'_, M> {}
