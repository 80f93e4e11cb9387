#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct BatchStats {
    pub records_processed: usize,
    pub records_per_second: f64,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

fn throughput(records: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        records as f64 / secs
    } else {
        0.0
    }
}

#[cfg(feature = "cli")]
struct ProcessProbe {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl ProcessProbe {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some(Self {
            system,
            pid,
            peak_memory_mb: 0,
        })
    }

    /// Returns (current, peak) resident memory in MB.
    fn sample(&mut self) -> Option<(u64, u64)> {
        self.system.refresh_all();
        let memory_mb = self.system.process(self.pid)?.memory() / 1024 / 1024;
        self.peak_memory_mb = self.peak_memory_mb.max(memory_mb);
        Some((memory_mb, self.peak_memory_mb))
    }
}

/// Tracks progress of one batch run: records handled, throughput and, when
/// built with the `cli` feature, process memory.
pub struct BatchMonitor {
    enabled: bool,
    start_time: Instant,
    #[cfg(feature = "cli")]
    probe: Option<Mutex<ProcessProbe>>,
}

impl BatchMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            #[cfg(feature = "cli")]
            probe: if enabled {
                ProcessProbe::new().map(Mutex::new)
            } else {
                None
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_stats(&self, records_processed: usize) -> Option<BatchStats> {
        if !self.enabled {
            return None;
        }

        let elapsed_time = self.start_time.elapsed();
        let (memory_usage_mb, peak_memory_mb) = self.sample_memory();

        Some(BatchStats {
            records_processed,
            records_per_second: throughput(records_processed, elapsed_time),
            memory_usage_mb,
            peak_memory_mb,
            elapsed_time,
        })
    }

    #[cfg(feature = "cli")]
    fn sample_memory(&self) -> (u64, u64) {
        self.probe
            .as_ref()
            .and_then(|probe| probe.lock().ok()?.sample())
            .unwrap_or((0, 0))
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory(&self) -> (u64, u64) {
        (0, 0)
    }

    pub fn log_stats(&self, phase: &str, records_processed: usize) {
        if let Some(stats) = self.get_stats(records_processed) {
            tracing::info!(
                "📊 {} - Records: {}, Rate: {:.0}/s, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.records_processed,
                stats.records_per_second,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self, records_processed: usize) {
        if let Some(stats) = self.get_stats(records_processed) {
            tracing::info!(
                "📊 Final Stats - {} records in {:?} ({:.0}/s), Peak Memory: {}MB",
                stats.records_processed,
                stats.elapsed_time,
                stats.records_per_second,
                stats.peak_memory_mb
            );
        }
    }
}

impl Default for BatchMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
