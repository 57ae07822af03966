use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of the current process memory usage, in megabytes.
///
/// `None` means the reading is unavailable on this platform.
pub trait MemoryProbe {
    fn current_mb(&self) -> Option<f64>;
}

impl<F> MemoryProbe for F
where
    F: Fn() -> Option<f64>,
{
    fn current_mb(&self) -> Option<f64> {
        self()
    }
}

/// Reads the resident set size of this process through `sysinfo`.
pub struct SystemMemoryProbe {
    pid: Option<Pid>,
}

impl SystemMemoryProbe {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::debug!("Cannot determine current pid: {}", e);
                None
            }
        };
        Self { pid }
    }
}

impl Default for SystemMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemoryProbe {
    fn current_mb(&self) -> Option<f64> {
        let pid = self.pid?;
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );
        system
            .process(pid)
            .map(|process| process.memory() as f64 / BYTES_PER_MB)
    }
}
