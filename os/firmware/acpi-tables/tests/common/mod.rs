#![allow(dead_code)]

use acpi_tables::{ACPI2_TABLE_GUID, ConfigTable, ConfigTableDirectory, FirmwareTables, PhysMapRo};
use uefi::{Guid, guid};

/// Fake physical address of the first arena byte.
pub const BASE: u64 = 0x7F00_0000;

pub const SMBIOS3_GUID: Guid = guid!("f2fd1544-9794-4a2c-992e-e5bbcf20e394");

/// Synthetic firmware: a byte arena at [`BASE`] and a configuration table.
///
/// Any read outside the arena panics, so a test passing through a walk also
/// proves the walk stayed inside the structures it was given.
pub struct FakeFirmware {
    memory: Vec<u8>,
    config: Vec<ConfigTable>,
}

impl FakeFirmware {
    pub fn tables(&self) -> FirmwareTables<'_, Self, Self> {
        // SAFETY: every address the fixture hands out lies inside the arena,
        // and out-of-arena reads panic instead of touching memory.
        unsafe { FirmwareTables::new(self, self) }
    }

    /// The arena bytes at `address`.
    pub fn bytes_at(&self, address: u64, len: usize) -> &[u8] {
        let start = usize::try_from(address - BASE).unwrap();
        &self.memory[start..start + len]
    }
}

impl PhysMapRo for FakeFirmware {
    unsafe fn map_ro<'a>(&self, paddr: u64, len: usize) -> &'a [u8] {
        let start = paddr
            .checked_sub(BASE)
            .unwrap_or_else(|| panic!("read below arena at {paddr:#x}"));
        let start = usize::try_from(start).unwrap();
        let end = start.checked_add(len).expect("read length overflows");
        assert!(
            end <= self.memory.len(),
            "read past arena: {paddr:#x} + {len} bytes"
        );
        unsafe { core::slice::from_raw_parts(self.memory.as_ptr().add(start), len) }
    }
}

impl ConfigTableDirectory for FakeFirmware {
    fn entries(&self) -> impl Iterator<Item = ConfigTable> + '_ {
        self.config.iter().copied()
    }
}

/// Lays out ACPI structures in the arena.
#[derive(Default)]
pub struct FirmwareBuilder {
    memory: Vec<u8>,
    config: Vec<ConfigTable>,
}

fn checksum(bytes: &[u8]) -> u8 {
    0u8.wrapping_sub(bytes.iter().fold(0u8, |a, &b| a.wrapping_add(b)))
}

impl FirmwareBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into the arena, 16-byte aligned, and return their address.
    pub fn raw(&mut self, bytes: &[u8]) -> u64 {
        while self.memory.len() % 16 != 0 {
            self.memory.push(0);
        }
        let address = BASE + self.memory.len() as u64;
        self.memory.extend_from_slice(bytes);
        address
    }

    /// An SDT with a valid header and checksum.
    pub fn table(&mut self, signature: &[u8; 4], payload: &[u8]) -> u64 {
        let bytes = sdt(signature, payload);
        self.raw(&bytes)
    }

    /// An ACPI 6 sized FADT pointing at `dsdt` and `x_dsdt`.
    pub fn fadt(&mut self, dsdt: u32, x_dsdt: u64) -> u64 {
        let mut payload = vec![0u8; 276 - 36];
        payload[40 - 36..44 - 36].copy_from_slice(&dsdt.to_le_bytes());
        payload[140 - 36..148 - 36].copy_from_slice(&x_dsdt.to_le_bytes());
        self.table(b"FACP", &payload)
    }

    pub fn xsdt(&mut self, entries: &[u64]) -> u64 {
        let payload: Vec<u8> = entries.iter().flat_map(|e| e.to_le_bytes()).collect();
        self.table(b"XSDT", &payload)
    }

    /// An ACPI 2.0 root pointer with valid checksums.
    pub fn rsdp(&mut self, xsdt: u64) -> u64 {
        let bytes = xsdp(xsdt);
        self.raw(&bytes)
    }

    pub fn config_entry(&mut self, guid: Guid, address: u64) -> &mut Self {
        self.config.push(ConfigTable { guid, address });
        self
    }

    /// Publish `rsdp` under the ACPI 2.0 GUID, behind an unrelated entry.
    pub fn publish(&mut self, rsdp: u64) -> &mut Self {
        self.config_entry(SMBIOS3_GUID, BASE)
            .config_entry(ACPI2_TABLE_GUID, rsdp)
    }

    pub fn build(self) -> FakeFirmware {
        FakeFirmware {
            memory: self.memory,
            config: self.config,
        }
    }
}

/// SDT bytes with a valid header and checksum.
pub fn sdt(signature: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let length = u32::try_from(36 + payload.len()).unwrap();
    let mut bytes = Vec::with_capacity(36 + payload.len());
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.push(1); // revision
    bytes.push(0); // checksum
    bytes.extend_from_slice(b"SUNSID");
    bytes.extend_from_slice(b"FIXTURE0");
    bytes.extend_from_slice(&1_u32.to_le_bytes());
    bytes.extend_from_slice(b"TEST");
    bytes.extend_from_slice(&1_u32.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes[9] = checksum(&bytes);
    bytes
}

/// ACPI 2.0 XSDP bytes with valid checksums.
pub fn xsdp(xsdt: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(36);
    bytes.extend_from_slice(b"RSD PTR ");
    bytes.push(0);
    bytes.extend_from_slice(b"SUNSID");
    bytes.push(2);
    bytes.extend_from_slice(&0_u32.to_le_bytes());
    bytes.extend_from_slice(&36_u32.to_le_bytes());
    bytes.extend_from_slice(&xsdt.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&[0; 3]);
    bytes[8] = checksum(&bytes[..20]);
    bytes[32] = checksum(&bytes);
    bytes
}

/// Addresses of the tables in [`standard_firmware`].
pub struct Layout {
    pub rsdp: u64,
    pub xsdt: u64,
    pub fadt: u64,
    pub dsdt: u64,
    pub apic: u64,
    pub hpet: u64,
    pub mcfg: u64,
    pub ssdt: [u64; 3],
}

/// Listed in the XSDT, in order.
pub const STANDARD_SIGNATURES: [&[u8; 4]; 7] =
    [b"FACP", b"APIC", b"SSDT", b"HPET", b"SSDT", b"MCFG", b"SSDT"];

/// A firmware with a FADT, a DSDT behind it, three SSDTs and a few common tables.
///
/// Each SSDT's payload is eight copies of its instance number.
pub fn standard_firmware() -> (FakeFirmware, Layout) {
    let mut fw = FirmwareBuilder::new();

    let dsdt = fw.table(b"DSDT", b"DefinitionBlock");
    let fadt = fw.fadt(0, dsdt);
    let apic = fw.table(b"APIC", &[0xAA; 44]);
    let ssdt0 = fw.table(b"SSDT", &[0; 8]);
    let hpet = fw.table(b"HPET", &[0x11; 20]);
    let ssdt1 = fw.table(b"SSDT", &[1; 8]);
    let mcfg = fw.table(b"MCFG", &[0x22; 24]);
    let ssdt2 = fw.table(b"SSDT", &[2; 8]);

    let xsdt = fw.xsdt(&[fadt, apic, ssdt0, hpet, ssdt1, mcfg, ssdt2]);
    let rsdp = fw.rsdp(xsdt);
    fw.publish(rsdp);

    let layout = Layout {
        rsdp,
        xsdt,
        fadt,
        dsdt,
        apic,
        hpet,
        mcfg,
        ssdt: [ssdt0, ssdt1, ssdt2],
    };
    (fw.build(), layout)
}
