use std::cell::Cell;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub rows: usize,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

/// 記錄每個階段的耗時與資料列數
pub struct RunMonitor {
    start_time: Instant,
    last_mark: Cell<Instant>,
    enabled: bool,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_mark: Cell::new(now),
            enabled,
        }
    }

    pub fn mark(&self, rows: usize) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let phase_time = now.duration_since(self.last_mark.replace(now));

        Some(PhaseStats {
            rows,
            phase_time,
            elapsed_time: now.duration_since(self.start_time),
        })
    }

    pub fn log_stats(&self, phase: &str, rows: usize) {
        if let Some(stats) = self.mark(rows) {
            tracing::info!(
                "📊 {} - Rows: {}, Phase: {:?}, Total: {:?}",
                phase,
                stats.rows,
                stats.phase_time,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if self.enabled {
            tracing::info!("📊 Final Stats - Total Time: {:?}", self.start_time.elapsed());
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = RunMonitor::default();
        assert!(!monitor.is_enabled());
        assert!(monitor.mark(10).is_none());
    }

    #[test]
    fn test_enabled_monitor_tracks_phases() {
        let monitor = RunMonitor::new(true);
        let first = monitor.mark(3).unwrap();
        let second = monitor.mark(2).unwrap();

        assert_eq!(first.rows, 3);
        assert_eq!(second.rows, 2);
        assert!(second.elapsed_time >= first.elapsed_time);
    }
}
