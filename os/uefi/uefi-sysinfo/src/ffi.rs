//! # Win32 Firmware Table Entry Points
//!
//! `efiapi` exports with the shape of the Windows APIs, for C code linked into
//! the same UEFI image, and the safe functions they forward to.
//!
//! Both report malformed firmware data as `0` after logging it; the ACPI
//! provider is the only one served.

use crate::with_firmware_tables;
use acpi_tables::{
    AcpiError, ConfigTableDirectory, FetchOptions, FirmwareTableProvider, FirmwareTables,
    PhysMapRo, Signature, TableFetch,
};
use log::error;

/// Enumerate the signatures of all XSDT-listed ACPI tables into `out`.
///
/// Returns the number of bytes required. `out` is written only if it is large
/// enough; pass `None` to learn the size.
#[must_use]
pub fn enumerate_system_firmware_tables(
    provider: FirmwareTableProvider,
    out: Option<&mut [u8]>,
) -> u32 {
    with_firmware_tables(|tables| enumerate_in(tables, provider, out))
}

/// Copy the ACPI table `table_id` into `out`.
///
/// The result carries the table's length, `0` if it does not exist. The table
/// is copied only if `out` is large enough, in which case the result also
/// carries its physical address. `instance` selects among several SSDTs.
#[must_use]
pub fn get_system_firmware_table(
    provider: FirmwareTableProvider,
    table_id: Signature,
    out: Option<&mut [u8]>,
    instance: i32,
) -> TableFetch {
    with_firmware_tables(|tables| fetch_in(tables, provider, table_id, out, instance))
}

fn enumerate_in<D, M>(
    tables: &FirmwareTables<'_, D, M>,
    provider: FirmwareTableProvider,
    out: Option<&mut [u8]>,
) -> u32
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    match tables.enumerate(provider, out) {
        Ok(required) => required,
        Err(e) => {
            report("EnumSystemFirmwareTables", e);
            0
        }
    }
}

fn fetch_in<D, M>(
    tables: &FirmwareTables<'_, D, M>,
    provider: FirmwareTableProvider,
    table_id: Signature,
    out: Option<&mut [u8]>,
    instance: i32,
) -> TableFetch
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let options = FetchOptions::new().with_instance(instance);
    match tables.fetch(provider, table_id, out, options) {
        Ok(fetched) => fetched,
        Err(e) => {
            report("GetSystemFirmwareTable", e);
            TableFetch::NOT_FOUND
        }
    }
}

fn report(api: &str, e: AcpiError) {
    error!("{api}: malformed ACPI firmware data: {e}");
}

/// Turn a C buffer into an optional slice; a null pointer is the size probe.
///
/// # Safety
/// A non-null `buffer` must be valid for writes of `size` bytes.
unsafe fn out_buffer<'a>(buffer: *mut u8, size: u32) -> Option<&'a mut [u8]> {
    if buffer.is_null() {
        return None;
    }
    Some(unsafe { core::slice::from_raw_parts_mut(buffer, size as usize) })
}

/// # Safety
/// See [`enum_system_firmware_tables`].
unsafe fn enum_raw<D, M>(
    tables: &FirmwareTables<'_, D, M>,
    provider: u32,
    buffer: *mut u8,
    buffer_size: u32,
) -> u32
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let out = unsafe { out_buffer(buffer, buffer_size) };
    enumerate_in(tables, FirmwareTableProvider::from_tag(provider), out)
}

/// # Safety
/// See [`get_system_firmware_table_raw`].
unsafe fn get_raw<D, M>(
    tables: &FirmwareTables<'_, D, M>,
    provider: u32,
    table_id: u32,
    buffer: *mut u8,
    buffer_size: u32,
    address: *mut u64,
    instance: i32,
) -> u32
where
    D: ConfigTableDirectory + ?Sized,
    M: PhysMapRo,
{
    let out = unsafe { out_buffer(buffer, buffer_size) };
    let fetched = fetch_in(
        tables,
        FirmwareTableProvider::from_tag(provider),
        Signature::from_u32(table_id),
        out,
        instance,
    );

    if let Some(found_at) = fetched.address
        && !address.is_null()
    {
        // SAFETY: checked for null; validity is the caller's contract.
        unsafe { address.write_unaligned(found_at) };
    }
    fetched.length
}

/// `EnumSystemFirmwareTables` for UEFI.
///
/// Writes one 4-byte signature per ACPI table into `buffer` and returns the
/// number of bytes required. If `buffer` is null or `buffer_size` too small,
/// nothing is written. The DSDT is not listed.
///
/// # Safety
/// A non-null `buffer` must be valid for writes of `buffer_size` bytes.
#[unsafe(export_name = "EnumSystemFirmwareTables")]
pub unsafe extern "efiapi" fn enum_system_firmware_tables(
    provider: u32,
    buffer: *mut u8,
    buffer_size: u32,
) -> u32 {
    with_firmware_tables(|tables| unsafe { enum_raw(tables, provider, buffer, buffer_size) })
}

/// `GetSystemFirmwareTable` for UEFI, extended with the table's physical
/// address and the SSDT instance.
///
/// `table_id` is the signature with its first character in the low byte, as
/// in `'TDSD'` for the DSDT. Returns the table's length, or `0` if it does not
/// exist. The table and its address are written only if `buffer` is non-null
/// and `buffer_size` is large enough; a null `address` is ignored.
///
/// # Safety
/// A non-null `buffer` must be valid for writes of `buffer_size` bytes, and a
/// non-null `address` must be valid for a `u64` write.
#[unsafe(export_name = "GetSystemFirmwareTable")]
pub unsafe extern "efiapi" fn get_system_firmware_table_raw(
    provider: u32,
    table_id: u32,
    buffer: *mut u8,
    buffer_size: u32,
    address: *mut u64,
    instance: i32,
) -> u32 {
    with_firmware_tables(|tables| unsafe {
        get_raw(
            tables,
            provider,
            table_id,
            buffer,
            buffer_size,
            address,
            instance,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acpi_tables::{ACPI2_TABLE_GUID, ConfigTable};
    use log::{LevelFilter, Log, Metadata, Record};
    use std::sync::{Mutex, Once};

    const BASE: u64 = 0x6000_0000;
    const ACPI: u32 = FirmwareTableProvider::ACPI_TAG;
    /// `'CIPA'`, the APIC signature as a Win32 table ID.
    const APIC_ID: u32 = u32::from_le_bytes(*b"APIC");

    /// Collects error records so tests can see what was reported.
    struct Capture(Mutex<Vec<String>>);

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.0.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    fn capture_errors() -> &'static Capture {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_logger(&CAPTURE).unwrap();
            log::set_max_level(LevelFilter::Error);
        });
        &CAPTURE
    }

    struct Arena(Vec<u8>);

    impl PhysMapRo for Arena {
        unsafe fn map_ro<'a>(&self, paddr: u64, len: usize) -> &'a [u8] {
            let start = usize::try_from(paddr - BASE).unwrap();
            assert!(start + len <= self.0.len(), "read past arena");
            unsafe { core::slice::from_raw_parts(self.0.as_ptr().add(start), len) }
        }
    }

    impl Arena {
        fn push(&mut self, bytes: &[u8]) -> u64 {
            while self.0.len() % 8 != 0 {
                self.0.push(0);
            }
            let address = BASE + self.0.len() as u64;
            self.0.extend_from_slice(bytes);
            address
        }
    }

    fn checksum(bytes: &[u8]) -> u8 {
        0u8.wrapping_sub(bytes.iter().fold(0u8, |a, &b| a.wrapping_add(b)))
    }

    fn sdt(signature: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 36];
        bytes[..4].copy_from_slice(signature);
        let length = u32::try_from(36 + payload.len()).unwrap();
        bytes[4..8].copy_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes[9] = checksum(&bytes);
        bytes
    }

    fn xsdp(xsdt: u64) -> Vec<u8> {
        let mut bytes = vec![0u8; 36];
        bytes[..8].copy_from_slice(b"RSD PTR ");
        bytes[15] = 2;
        bytes[20..24].copy_from_slice(&36_u32.to_le_bytes());
        bytes[24..32].copy_from_slice(&xsdt.to_le_bytes());
        bytes[8] = checksum(&bytes[..20]);
        bytes[32] = checksum(&bytes);
        bytes
    }

    struct Fixture {
        arena: Arena,
        config: Vec<ConfigTable>,
        apic: u64,
    }

    impl Fixture {
        /// An XSDT listing an APIC and an HPET, plus `extra` raw entries.
        fn new(extra: &[u64]) -> Self {
            let mut arena = Arena(Vec::new());
            let apic = arena.push(&sdt(b"APIC", &[0xAA; 8]));
            let hpet = arena.push(&sdt(b"HPET", &[0x11; 20]));
            let entries: Vec<u8> = [apic, hpet]
                .iter()
                .chain(extra)
                .flat_map(|e| e.to_le_bytes())
                .collect();
            let xsdt = arena.push(&sdt(b"XSDT", &entries));
            let rsdp = arena.push(&xsdp(xsdt));
            Self {
                arena,
                config: vec![ConfigTable {
                    guid: ACPI2_TABLE_GUID,
                    address: rsdp,
                }],
                apic,
            }
        }

        fn tables(&self) -> FirmwareTables<'_, [ConfigTable], Arena> {
            unsafe { FirmwareTables::new(self.config.as_slice(), &self.arena) }
        }
    }

    #[test]
    fn null_buffer_probes_the_size() {
        let fx = Fixture::new(&[]);
        let tables = fx.tables();

        let required = unsafe { enum_raw(&tables, ACPI, core::ptr::null_mut(), 64) };
        assert_eq!(required, 8);

        let mut address = 0x5A5A_u64;
        let length = unsafe {
            get_raw(&tables, ACPI, APIC_ID, core::ptr::null_mut(), 64, &raw mut address, 0)
        };
        assert_eq!(length, 36 + 8);
        assert_eq!(address, 0x5A5A, "address written without a copy");
    }

    #[test]
    fn enumeration_fills_a_large_enough_buffer() {
        let fx = Fixture::new(&[]);
        let mut out = [0u8; 8];
        let required = unsafe { enum_raw(&fx.tables(), ACPI, out.as_mut_ptr(), 8) };
        assert_eq!(required, 8);
        assert_eq!(&out, b"APICHPET");
    }

    #[test]
    fn address_is_written_only_with_a_copy() {
        let fx = Fixture::new(&[]);
        let tables = fx.tables();

        let mut short = [0u8; 16];
        let mut address = 0_u64;
        let length =
            unsafe { get_raw(&tables, ACPI, APIC_ID, short.as_mut_ptr(), 16, &raw mut address, 0) };
        assert_eq!(length, 44);
        assert_eq!(address, 0);
        assert_eq!(short, [0; 16]);

        let mut out = [0u8; 64];
        let length =
            unsafe { get_raw(&tables, ACPI, APIC_ID, out.as_mut_ptr(), 64, &raw mut address, 0) };
        assert_eq!(length, 44);
        assert_eq!(address, fx.apic);
        assert_eq!(&out[..4], b"APIC");
    }

    #[test]
    fn null_address_pointer_is_ignored() {
        let fx = Fixture::new(&[]);
        let mut out = [0u8; 64];
        let length = unsafe {
            get_raw(
                &fx.tables(),
                ACPI,
                APIC_ID,
                out.as_mut_ptr(),
                64,
                core::ptr::null_mut(),
                0,
            )
        };
        assert_eq!(length, 44);
        assert_eq!(&out[..4], b"APIC");
    }

    #[test]
    fn unsupported_provider_reports_nothing() {
        let fx = Fixture::new(&[]);
        let rsmb = u32::from_be_bytes(*b"RSMB");
        let mut out = [0x5A_u8; 8];
        assert_eq!(unsafe { enum_raw(&fx.tables(), rsmb, out.as_mut_ptr(), 8) }, 0);
        assert_eq!(out, [0x5A; 8]);
    }

    #[test]
    fn malformed_data_is_logged_and_reported_as_zero() {
        let capture = capture_errors();
        let fx = Fixture::new(&[0]);
        let tables = fx.tables();

        let mut out = [0x5A_u8; 16];
        assert_eq!(unsafe { enum_raw(&tables, ACPI, out.as_mut_ptr(), 16) }, 0);
        assert_eq!(out, [0x5A; 16]);

        // The null entry sits behind the tables the search passes over.
        let mut address = 0_u64;
        let unknown = u32::from_le_bytes(*b"OEMX");
        let length = unsafe {
            get_raw(&tables, ACPI, unknown, out.as_mut_ptr(), 16, &raw mut address, 0)
        };
        assert_eq!(length, 0);
        assert_eq!(address, 0);

        let logged = capture.0.lock().unwrap();
        assert!(logged.iter().any(|m| m.starts_with("EnumSystemFirmwareTables: malformed")));
        assert!(logged.iter().any(|m| m.starts_with("GetSystemFirmwareTable: malformed")));
    }
}
