//! Run tracking - append-only JSONL record of every training invocation.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File the run records accumulate in.
pub const RUNS_FILE: &str = "runs.jsonl";

/// Experiment name stamped on every record.
pub const EXPERIMENT: &str = "forest-fire-risk";

/// One training run: chosen parameters, test metrics, artifact locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub experiment: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub params: serde_json::Value,
    pub metrics: std::collections::BTreeMap<String, f64>,
    pub artifacts: Vec<String>,
}

/// Appends run records to `<dir>/runs.jsonl`, one JSON document per line.
pub struct RunRecorder {
    path: PathBuf,
}

impl RunRecorder {
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(RUNS_FILE),
        })
    }

    pub fn record(&self, record: &RunRecord) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        log::info!("recorded run {} to {}", record.run_id, self.path.display());
        Ok(())
    }

    /// Read back every recorded run, oldest first.
    pub fn read_all(&self) -> std::io::Result<Vec<RunRecord>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                records.push(serde_json::from_str(&line)?);
            }
        }
        Ok(records)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
