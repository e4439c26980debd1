pub mod logger;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// One row of the per-tick match log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub elapsed_s: f64,
    pub alive: usize,
    pub longest_snake: usize,
    pub items_spawned: u64,
    pub deaths: u64,
}

/// End-of-match summary, persisted as JSON next to the CSV tick log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub name: String,
    pub ticks: u64,
    pub items_spawned: u64,
    pub deaths: u64,
    /// Winning agent index; `None` when the match was quit or everyone
    /// died on the same tick.
    pub winner: Option<usize>,
    pub duration_s: f64,
}

#[derive(Debug)]
struct MatchInner {
    ticks: u64,
    items_spawned: u64,
    deaths: u64,
    snapshots: Vec<TickSnapshot>,
}

/// Cheap-to-clone handle shared between the tick loop and whoever saves
/// results at the end.
#[derive(Debug, Clone)]
pub struct MatchMetrics {
    inner: Arc<RwLock<MatchInner>>,
    start_time: Instant,
}

impl MatchMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MatchInner {
                ticks: 0,
                items_spawned: 0,
                deaths: 0,
                snapshots: Vec::new(),
            })),
            start_time: Instant::now(),
        }
    }

    pub fn tick(&self) {
        self.inner.write().ticks += 1;
    }

    pub fn item_spawned(&self) {
        self.inner.write().items_spawned += 1;
    }

    pub fn death(&self) {
        self.inner.write().deaths += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.inner.read().ticks
    }

    /// Records one row of the tick log.
    pub fn save_snapshot(&self, alive: usize, longest_snake: usize) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut inner = self.inner.write();
        let row = TickSnapshot {
            tick: inner.ticks,
            elapsed_s: elapsed,
            alive,
            longest_snake,
            items_spawned: inner.items_spawned,
            deaths: inner.deaths,
        };
        inner.snapshots.push(row);
    }

    pub fn get_snapshots(&self) -> Vec<TickSnapshot> {
        self.inner.read().snapshots.clone()
    }

    pub fn report(&self, name: &str, winner: Option<usize>) -> MatchReport {
        let inner = self.inner.read();
        MatchReport {
            name: name.to_string(),
            ticks: inner.ticks,
            items_spawned: inner.items_spawned,
            deaths: inner.deaths,
            winner,
            duration_s: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

impl Default for MatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the CSV tick log and the JSON report under `results/`,
/// timestamped so repeated matches never clobber each other.
pub fn save_results(metrics: &MatchMetrics, name: &str, winner: Option<usize>) -> anyhow::Result<()> {
    use tracing::info;

    std::fs::create_dir_all("results")?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");

    let csv_path = format!("results/{}_{}.csv", name, timestamp);
    let mut log = logger::MatchLogger::new(&csv_path)?;
    log.log_batch(&metrics.get_snapshots())?;
    info!("Tick log saved to: {}", csv_path);

    let report = metrics.report(name, winner);
    let json_path = format!("results/{}_{}_report.json", name, timestamp);
    std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
    info!("Match report saved to: {}", json_path);

    Ok(())
}
