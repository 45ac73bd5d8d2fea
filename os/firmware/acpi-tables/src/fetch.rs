//! # Table Retrieval
//!
//! The firmware-table equivalent of `GetSystemFirmwareTable`, extended with
//! the SSDT instance selector and the physical address of the returned table.

use crate::{
    AcpiError, ConfigTableDirectory, FirmwareTableProvider, FirmwareTables, PhysMapRo, Signature,
    TableView, Xsdt, fadt,
};
use log::{debug, trace};

/// Options for [`FirmwareTables::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Zero-based SSDT instance. Zero and negative values select the first SSDT;
    /// ignored for every other signature.
    pub instance: i32,
    /// Report the physical address of a copied table in [`TableFetch::address`].
    pub report_address: bool,
}

impl FetchOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instance: 0,
            report_address: true,
        }
    }

    #[must_use]
    pub const fn with_instance(mut self, instance: i32) -> Self {
        self.instance = instance;
        self
    }

    #[must_use]
    pub const fn with_report_address(mut self, report_address: bool) -> Self {
        self.report_address = report_address;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`FirmwareTables::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableFetch {
    /// Declared length of the matched table; `0` if nothing matched.
    pub length: u32,
    /// Physical address of the table, set only when its bytes were copied and
    /// the address was asked for.
    pub address: Option<u64>,
}

impl TableFetch {
    pub const NOT_FOUND: Self = Self {
        length: 0,
        address: None,
    };

    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.length != 0
    }
}

impl<D, M> FirmwareTables<'_, D, M>
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    /// Copy the table named `table_id` into `out`.
    ///
    /// The returned [`TableFetch::length`] is the table's declared length whenever
    /// a table matched. Its bytes are copied to `out[..length]` only if `out` is
    /// present and large enough; `None` probes the size.
    ///
    /// * `DSDT` resolves to the table the FADT (`FACP`) points at.
    /// * `XSDT` resolves to the root table itself.
    /// * `SSDT` honours [`FetchOptions::instance`].
    ///
    /// The first qualifying table wins. An unsupported provider, a missing root
    /// pointer or an unknown signature yield [`TableFetch::NOT_FOUND`].
    ///
    /// # Errors
    /// Returns an [`AcpiError`] if the root pointer, the XSDT, a table header on
    /// the way, or the FADT's DSDT pointer is malformed. Nothing is copied then.
    pub fn fetch(
        &self,
        provider: FirmwareTableProvider,
        table_id: Signature,
        out: Option<&mut [u8]>,
        options: FetchOptions,
    ) -> Result<TableFetch, AcpiError> {
        if !provider.is_supported() {
            debug!("Unsupported firmware table provider {:#010x}", provider.tag());
            return Ok(TableFetch::NOT_FOUND);
        }

        let Some(xsdt) = self.xsdt()? else {
            return Ok(TableFetch::NOT_FOUND);
        };

        let Some(table) = self.resolve(&xsdt, table_id, options.instance)? else {
            debug!("Table {table_id} (instance {}) not found", options.instance);
            return Ok(TableFetch::NOT_FOUND);
        };

        Ok(self.deliver(&table, out, options.report_address))
    }

    fn resolve(
        &self,
        xsdt: &Xsdt,
        table_id: Signature,
        instance: i32,
    ) -> Result<Option<TableView>, AcpiError> {
        match table_id {
            Signature::XSDT => Ok(Some(*xsdt.view())),
            Signature::DSDT => {
                let Some(fadt) = self.find(xsdt, Signature::FADT, 0)? else {
                    return Ok(None);
                };

                // SAFETY: the FADT came out of the XSDT walk; see `FirmwareTables::new`.
                let dsdt_addr = unsafe { fadt::dsdt_address(self.map, &fadt) };
                trace!("FADT at {:#018x} names DSDT at {dsdt_addr:#018x}", fadt.address());

                // SAFETY: the DSDT is reachable from the directory; see `FirmwareTables::new`.
                unsafe { TableView::read(self.map, dsdt_addr) }.map(Some)
            }
            Signature::SSDT => {
                let skip = usize::try_from(instance).unwrap_or(0);
                self.find(xsdt, Signature::SSDT, skip)
            }
            _ => self.find(xsdt, table_id, 0),
        }
    }

    /// The `skip`-th table (zero-based) with `signature`, in XSDT order.
    fn find(
        &self,
        xsdt: &Xsdt,
        signature: Signature,
        skip: usize,
    ) -> Result<Option<TableView>, AcpiError> {
        let mut remaining = skip;
        for table in self.tables(xsdt) {
            let table = table?;
            if table.signature() != signature {
                continue;
            }
            if remaining > 0 {
                remaining -= 1;
                continue;
            }
            return Ok(Some(table));
        }
        Ok(None)
    }

    fn deliver(
        &self,
        table: &TableView,
        out: Option<&mut [u8]>,
        report_address: bool,
    ) -> TableFetch {
        let length = table.length();
        let copied = match out {
            Some(out) if out.len() >= length as usize => {
                out[..length as usize].copy_from_slice(self.table_bytes(table));
                true
            }
            _ => false,
        };

        trace!(
            "Table {} at {:#018x}: {length} bytes, copied: {copied}",
            table.signature(),
            table.address()
        );

        TableFetch {
            length,
            address: (copied && report_address).then_some(table.address()),
        }
    }
}
