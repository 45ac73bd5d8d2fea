//! # UEFI Console Logger
//!
//! A `log` backend that formats records as `[LEVEL] target: message`, mirrors
//! them to the UEFI console while boot services are available and, with the
//! `qemu` feature, to QEMU's debug console port (`-debugcon stdio`).

use core::sync::atomic::{AtomicBool, Ordering};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct UefiLogger {
    max_level: LevelFilter,
    boot_services_available: AtomicBool,
}

impl UefiLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self {
            max_level,
            boot_services_available: AtomicBool::new(true),
        }
    }

    /// Install as the global logger. Call this once during early init.
    ///
    /// ```rust,ignore
    /// static LOGGER: UefiLogger = UefiLogger::new(LevelFilter::Debug);
    /// LOGGER.init()?;
    /// ```
    ///
    /// # Errors
    /// Fails if another logger has already been installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    /// Stop mirroring to the UEFI console; it is gone after `ExitBootServices`.
    pub fn exit_boot_services(&self) {
        self.boot_services_available.store(false, Ordering::Release);
    }
}

impl Log for UefiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        #[cfg(all(feature = "qemu", target_arch = "x86_64"))]
        debugcon::write(format_args!(
            "[{}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        ));

        if self.boot_services_available.load(Ordering::Acquire) {
            uefi::println!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

#[cfg(all(feature = "qemu", target_arch = "x86_64"))]
mod debugcon {
    use core::fmt::{self, Write};

    /// QEMU's debug console I/O port.
    const PORT: u16 = 0x402;

    struct DebugCon;

    impl Write for DebugCon {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for b in s.bytes() {
                // SAFETY: writing to the debugcon port has no side effects
                // beyond QEMU's output; on real hardware the port is unused.
                unsafe {
                    core::arch::asm!(
                        "out dx, al",
                        in("dx") PORT,
                        in("al") b,
                        options(nomem, nostack, preserves_flags)
                    );
                }
            }
            Ok(())
        }
    }

    pub fn write(args: fmt::Arguments) {
        // Best effort; there is nowhere to report a failure to.
        let _ = fmt::write(&mut DebugCon, args);
    }
}
