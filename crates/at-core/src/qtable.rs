//! Dense Q-value store and its persisted artifact.
//!
//! The table is (stateCount x 3), zero-initialized, keyed by the canonical
//! state ordering. Persistence goes through a versioned JSON artifact
//! written to a temp file and renamed into place, so a concurrent reader
//! observes either the old table or the new one, never a partial write.

use at_common::{schema, Action, Error, Result, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Dense per-state action-value table.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Vec<[f64; Action::COUNT]>,
}

impl QTable {
    /// Zero-initialized table for a state space of the given cardinality.
    pub fn zeroed(states: usize) -> QTable {
        QTable {
            values: vec![[0.0; Action::COUNT]; states],
        }
    }

    /// Number of state rows.
    pub fn states(&self) -> usize {
        self.values.len()
    }

    /// Per-action values for one state.
    ///
    /// `state_index` must come from the paired `StateSpace`; the bijection
    /// guarantees it is in range.
    pub fn row(&self, state_index: usize) -> &[f64; Action::COUNT] {
        &self.values[state_index]
    }

    /// Apply one temporal-difference step toward `target`:
    /// `Q[s,a] += alpha * (target - Q[s,a])`.
    pub fn update(&mut self, state_index: usize, action: Action, target: f64, alpha: f64) {
        let cell = &mut self.values[state_index][action.index()];
        *cell += alpha * (target - *cell);
    }

    /// Greedy action for a state. Ties break toward the lowest action
    /// index so evaluation is deterministic across runs and tools.
    pub fn best_action(&self, state_index: usize) -> Action {
        let row = self.row(state_index);
        let mut best = Action::Accept;
        for action in Action::ALL {
            if row[action.index()] > row[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Largest action value for a state; the `max_a' Q[s',a']` of the
    /// Bellman targets.
    pub fn max_value(&self, state_index: usize) -> f64 {
        let row = self.row(state_index);
        row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Persist to a versioned JSON artifact via temp file + atomic rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let artifact = QTableArtifact {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            states: self.states(),
            actions: Action::COUNT,
            values: self
                .values
                .iter()
                .map(|row| row.to_vec())
                .collect(),
        };
        write_json_atomic(path, &artifact)
    }

    /// Load an artifact, requiring exactly `expected_states` rows.
    ///
    /// A row-count mismatch means the artifact was produced against a
    /// different state space; silently truncating or padding would corrupt
    /// the feature-state-to-value mapping, so this fails instead.
    pub fn load(path: &Path, expected_states: usize) -> Result<QTable> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let artifact: QTableArtifact =
            serde_json::from_str(&content).map_err(|e| Error::json(path, e))?;

        if !schema::is_compatible(&artifact.schema_version) {
            return Err(Error::TableCorrupted(format!(
                "incompatible schema version {} (expected {})",
                artifact.schema_version, SCHEMA_VERSION
            )));
        }
        if artifact.states != expected_states || artifact.values.len() != artifact.states {
            return Err(Error::DimensionMismatch {
                expected: expected_states,
                actual: artifact.values.len(),
            });
        }

        let mut values = Vec::with_capacity(artifact.states);
        for (i, row) in artifact.values.iter().enumerate() {
            let row: [f64; Action::COUNT] = row.as_slice().try_into().map_err(|_| {
                Error::TableCorrupted(format!(
                    "row {i} has {} action values, expected {}",
                    row.len(),
                    Action::COUNT
                ))
            })?;
            values.push(row);
        }
        Ok(QTable { values })
    }
}

/// On-disk artifact layout.
#[derive(Debug, Serialize, Deserialize)]
struct QTableArtifact {
    schema_version: String,
    generated_at: String,
    states: usize,
    actions: usize,
    values: Vec<Vec<f64>>,
}

/// Serialize to a temp file next to `path`, then rename into place.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let content = serde_json::to_vec_pretty(value).map_err(|e| Error::json(path, e))?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact.json");
    let tmp_path = path.with_file_name(format!("{}.tmp.{}", file_name, std::process::id()));
    {
        let mut file = std::fs::File::create(&tmp_path).map_err(|e| Error::io(&tmp_path, e))?;
        file.write_all(&content).map_err(|e| Error::io(&tmp_path, e))?;
        file.sync_all().map_err(|e| Error::io(&tmp_path, e))?;
    }
    std::fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))
}
