//! Host and process resource probing.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const MB: u64 = 1024 * 1024;

/// Resource usage of this process and the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSnapshot {
    /// Resident memory of this process in MB.
    pub process_memory_mb: u64,
    pub total_memory_mb: u64,
    pub used_memory_mb: u64,
    pub available_memory_mb: u64,
    /// OS threads of this process. `None` where the platform does not expose them.
    pub process_threads: Option<usize>,
    pub os_name: String,
    pub os_version: String,
    pub arch: &'static str,
    pub cpu_count: usize,
    pub uptime_ms: u64,
}

/// Wraps a `sysinfo::System` refreshed on demand.
#[derive(Debug)]
pub struct SystemProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid().ok(),
            started: Instant::now(),
        }
    }

    /// Refresh memory and this process, then read everything out.
    ///
    /// Reads `/proc` synchronously; call from a blocking context on hot paths.
    pub fn snapshot(&self) -> SystemSnapshot {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();

        if let Some(pid) = self.pid {
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_memory().with_tasks(),
            );
        }
        let process = self.pid.and_then(|pid| system.process(pid));

        let process_memory_mb = process.map_or(0, |p| p.memory() / MB);
        let process_threads = process.and_then(|p| p.tasks()).map(|t| t.len());

        #[allow(clippy::cast_possible_truncation)]
        let uptime_ms = self.started.elapsed().as_millis() as u64;

        SystemSnapshot {
            process_memory_mb,
            total_memory_mb: system.total_memory() / MB,
            used_memory_mb: system.used_memory() / MB,
            available_memory_mb: system.available_memory() / MB,
            process_threads,
            os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::os_version().unwrap_or_default(),
            arch: std::env::consts::ARCH,
            cpu_count: num_cpus::get(),
            uptime_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reports_host() {
        let probe = SystemProbe::new();
        let snap = probe.snapshot();

        assert!(snap.cpu_count >= 1);
        assert!(!snap.os_name.is_empty());
        assert_eq!(snap.arch, std::env::consts::ARCH);
        assert!(snap.used_memory_mb <= snap.total_memory_mb);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_snapshot_reads_own_memory_and_threads() {
        let snap = SystemProbe::new().snapshot();
        assert!(snap.process_memory_mb <= snap.total_memory_mb);
        assert!(snap.process_threads.is_some_and(|n| n >= 1));
    }

    #[test]
    fn test_snapshot_is_repeatable() {
        let probe = SystemProbe::default();
        let first = probe.snapshot();
        let second = probe.snapshot();
        assert_eq!(first.cpu_count, second.cpu_count);
        assert!(second.uptime_ms >= first.uptime_ms);
    }
}
