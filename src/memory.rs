use sysinfo::System;

use crate::types::*;

/// Reports how much of the machine's memory is in use, in percent.
pub trait MemoryProbe {
    fn used_percent(&mut self) -> Float;
}

pub struct SystemMemory {
    sys: System,
}

impl SystemMemory {
    pub fn new() -> Self {
        SystemMemory { sys: System::new() }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        SystemMemory::new()
    }
}

impl MemoryProbe for SystemMemory {
    fn used_percent(&mut self) -> Float {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        iff!(total == 0, 0.0, self.sys.used_memory() as Float * 100.0 / total as Float)
    }
}

/// A probe that always reports the same reading.
#[derive(Copy, Clone, Debug)]
pub struct FixedMemory(pub Float);

impl MemoryProbe for FixedMemory {
    fn used_percent(&mut self) -> Float {
        self.0
    }
}
