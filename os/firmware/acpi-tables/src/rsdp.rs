//! # XSDP (Extended System Description Pointer)
//!
//! The ACPI 2.0+ root pointer is published through the UEFI configuration
//! table under [`ACPI2_TABLE_GUID`]. Only the 2.0 layout is accepted; the
//! 32-bit RSDT address is carried along for diagnostics but never walked.

use crate::{ACPI2_TABLE_GUID, AcpiError, ConfigTableDirectory, PhysMapRo, sum};
use log::{debug, trace};

/// A validated ACPI 2.0+ root pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiRoot {
    pub rsdp_addr: u64,
    pub revision: u8,
    pub oem_id: [u8; 6],
    pub rsdt_addr: u64,
    pub xsdt_addr: u64,
}

/// ACPI 2.0 Extended System Description Pointer (XSDP)
#[derive(Clone, Copy)]
#[repr(C, packed)]
struct Xsdp {
    signature: [u8; 8], // "RSD PTR "
    checksum: u8,       // sum of first 20 bytes == 0
    oem_id: [u8; 6],
    revision: u8, // 2 for ACPI 2.0
    rsdt_addr: u32,
    length: u32,
    xsdt_addr: u64,
    ext_checksum: u8, // checksum of entire table
    reserved: [u8; 3],
}

const RSDP_SIGNATURE: &[u8; 8] = b"RSD PTR ";

/// Bytes covered by the ACPI 1.0 checksum.
const V1_LENGTH: usize = 20;

const REVISION_OFFSET: usize = 15;

impl AcpiRoot {
    /// Validate the XSDP at the physical address.
    ///
    /// # Errors
    /// Returns an [`AcpiError`] if the address is null, or if the structure fails
    /// the signature, revision, length or checksum validation.
    ///
    /// # Safety
    /// `map` must be able to map `rsdp_addr` for the length the structure declares.
    pub unsafe fn parse(map: &impl PhysMapRo, rsdp_addr: u64) -> Result<Self, AcpiError> {
        if rsdp_addr == 0 {
            return Err(AcpiError::NullAddress);
        }

        // Only the ACPI 1.0 part is known to exist until the revision says otherwise.
        let v1 = unsafe { map.map_ro(rsdp_addr, V1_LENGTH) };
        if &v1[0..8] != RSDP_SIGNATURE {
            return Err(AcpiError::InvalidRsdpSignature);
        }
        if sum(v1) != 0 {
            return Err(AcpiError::RsdpChecksum);
        }
        let revision = v1[REVISION_OFFSET];
        if revision < 2 {
            return Err(AcpiError::UnsupportedRevision(revision));
        }

        let v2 = unsafe { map.map_ro(rsdp_addr, size_of::<Xsdp>()) };
        // SAFETY: the slice covers a whole `Xsdp`; the read tolerates any alignment.
        let xsdp = unsafe { core::ptr::read_unaligned(v2.as_ptr().cast::<Xsdp>()) };

        let length = xsdp.length;
        if (length as usize) < size_of::<Xsdp>() {
            return Err(AcpiError::RsdpLength(length));
        }
        let full = unsafe { map.map_ro(rsdp_addr, length as usize) };
        if sum(full) != 0 {
            return Err(AcpiError::RsdpChecksum);
        }

        if xsdp.xsdt_addr == 0 {
            return Err(AcpiError::NullAddress);
        }

        Ok(Self {
            rsdp_addr,
            revision: xsdp.revision,
            oem_id: xsdp.oem_id,
            rsdt_addr: u64::from(xsdp.rsdt_addr),
            xsdt_addr: xsdp.xsdt_addr,
        })
    }
}

/// Find the ACPI 2.0 root pointer in the configuration table.
///
/// The first entry tagged with [`ACPI2_TABLE_GUID`] wins. A directory without
/// such an entry yields `Ok(None)`.
///
/// # Errors
/// Returns an [`AcpiError`] if the entry exists but does not point at a valid XSDP.
///
/// # Safety
/// `map` must be able to map every structure the directory entry points at.
pub unsafe fn locate_acpi_root<D>(
    directory: &D,
    map: &impl PhysMapRo,
) -> Result<Option<AcpiRoot>, AcpiError>
where
    D: ConfigTableDirectory + ?Sized,
{
    let Some(entry) = directory.find(&ACPI2_TABLE_GUID) else {
        debug!("No ACPI 2.0 entry in the configuration table");
        return Ok(None);
    };

    trace!("ACPI 2.0 root pointer at {:#018x}", entry.address);
    let root = unsafe { AcpiRoot::parse(map, entry.address)? };
    Ok(Some(root))
}
