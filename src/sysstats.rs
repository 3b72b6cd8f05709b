//! CPU/RAM sampling for the header gauges.
//!
//! The collector is owned by the UI loop and sampled on a 2-second tick.
//! sysinfo derives CPU usage from the delta between consecutive refreshes,
//! so the very first sample reads 0% and settles one tick later.

use sysinfo::System;

/// One gauge sample, both values clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysSample {
    pub cpu_pct: u8,
    pub ram_pct: u8,
}

/// Stateful collector wrapping a `sysinfo::System`.
pub struct SysStats {
    system: System,
}

impl SysStats {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// Refresh and read global CPU% and used-RAM%.
    pub fn sample(&mut self) -> SysSample {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let cpu = self.system.global_cpu_usage();
        let total = self.system.total_memory();
        let ram = if total == 0 {
            0.0
        } else {
            self.system.used_memory() as f64 / total as f64 * 100.0
        };

        SysSample {
            cpu_pct: cpu.clamp(0.0, 100.0).round() as u8,
            ram_pct: ram.clamp(0.0, 100.0).round() as u8,
        }
    }
}

impl Default for SysStats {
    fn default() -> Self {
        Self::new()
    }
}
