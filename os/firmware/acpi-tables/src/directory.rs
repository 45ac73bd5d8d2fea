//! # UEFI Configuration Table Directory

use uefi::table::cfg::ConfigTableEntry;
use uefi::{Guid, guid};

/// Vendor GUID of the ACPI 2.0+ root pointer in the UEFI configuration table.
pub const ACPI2_TABLE_GUID: Guid = guid!("8868e871-e4f1-11d3-bc22-0080c73c8881");

/// One `(GUID, address)` entry of the firmware's configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigTable {
    pub guid: Guid,
    pub address: u64,
}

/// A read-only sequence of configuration table entries.
///
/// Implemented for the `uefi` crate's [`ConfigTableEntry`] slice, so the slice
/// handed out by `uefi::system::with_config_table` can be used as is.
pub trait ConfigTableDirectory {
    fn entries(&self) -> impl Iterator<Item = ConfigTable> + '_;

    /// Returns the first entry tagged with `guid`.
    fn find(&self, guid: &Guid) -> Option<ConfigTable> {
        self.entries().find(|entry| entry.guid == *guid)
    }
}

impl ConfigTableDirectory for [ConfigTable] {
    fn entries(&self) -> impl Iterator<Item = ConfigTable> + '_ {
        self.iter().copied()
    }
}

impl ConfigTableDirectory for [ConfigTableEntry] {
    fn entries(&self) -> impl Iterator<Item = ConfigTable> + '_ {
        self.iter().map(|entry| ConfigTable {
            guid: entry.guid,
            address: entry.address as usize as u64,
        })
    }
}
