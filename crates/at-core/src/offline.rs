//! Offline expectation-based Bellman updates from logged real decisions.
//!
//! Unlike the online trainer, the true next-state distribution after a
//! production decision is unknown, so instead of sampling one successor
//! this pass computes the exact expectation of `max_a' Q[s',a']` over the
//! three possible next `accRisk` values, weighted by the acted action's
//! transition row, with every other dimension held fixed. The one-step
//! reward is additionally charged `lambda * misjudge` for decisions later
//! found to be wrong.

use crate::model::RewardModel;
use crate::qtable::QTable;
use crate::state::StateSpace;
use at_common::{Action, Error, Feature, Result};
use at_config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One production decision record.
///
/// Field names follow the log-store column contract. `rpIdMatch` and
/// `authenticatorRisk` are optional: the standard log carries the
/// 5-feature form, and a 7-feature replay needs records that supply them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: u64,
    pub acc_risk: u8,
    pub up_flag: u8,
    pub uv_flag: u8,
    pub has_unknown_ext: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id_match: Option<u8>,
    pub sign_count_risk: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_risk: Option<u8>,
    /// Action token, matched case-insensitively against ACCEPT/MFA/REJECT.
    pub action: String,
    /// Misjudge severity for decisions later found wrong; records without
    /// one are not eligible for replay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misjudge: Option<f64>,
    /// Processed flag; flipped after incorporation.
    #[serde(default)]
    pub done: bool,
}

impl LogRecord {
    /// Assemble the state tuple for a feature ordering.
    fn state_for(&self, features: &[Feature]) -> Result<Vec<u8>> {
        features
            .iter()
            .map(|feature| match feature {
                Feature::AccRisk => Ok(self.acc_risk),
                Feature::UpFlag => Ok(self.up_flag),
                Feature::UvFlag => Ok(self.uv_flag),
                Feature::HasUnknownExt => Ok(self.has_unknown_ext),
                Feature::SignCountRisk => Ok(self.sign_count_risk),
                Feature::RpIdMatch => self.rp_id_match.ok_or_else(|| {
                    Error::LogStore(format!("record {} lacks rpIdMatch", self.id))
                }),
                Feature::AuthenticatorRisk => self.authenticator_risk.ok_or_else(|| {
                    Error::LogStore(format!("record {} lacks authenticatorRisk", self.id))
                }),
            })
            .collect()
    }
}

/// JSONL-backed decision log store.
///
/// One JSON object per line. The whole file is rewritten atomically after
/// a batch, mirroring the single load/mutate/save cycle of the Q-table.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> LogStore {
        LogStore { path: path.into() }
    }

    /// Read every record, keeping line order.
    pub fn load(&self) -> Result<Vec<LogRecord>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord = serde_json::from_str(line).map_err(|e| {
                Error::LogStore(format!(
                    "{}:{}: {}",
                    self.path.display(),
                    line_no + 1,
                    e
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Rewrite the store with updated records via temp file + rename.
    pub fn save(&self, records: &[LogRecord]) -> Result<()> {
        let mut content = Vec::new();
        for record in records {
            serde_json::to_writer(&mut content, record)
                .map_err(|e| Error::json(&self.path, e))?;
            content.push(b'\n');
        }
        let file_name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("decisions.jsonl");
        let tmp_path = self
            .path
            .with_file_name(format!("{}.tmp.{}", file_name, std::process::id()));
        {
            let mut file =
                std::fs::File::create(&tmp_path).map_err(|e| Error::io(&tmp_path, e))?;
            file.write_all(&content).map_err(|e| Error::io(&tmp_path, e))?;
            file.sync_all().map_err(|e| Error::io(&tmp_path, e))?;
        }
        std::fs::rename(&tmp_path, &self.path).map_err(|e| Error::io(&self.path, e))
    }
}

/// Summary of one replay batch.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Records in the store.
    pub total: usize,
    /// Updates applied this batch.
    pub applied: usize,
    /// Records skipped for an unrecognized action token.
    pub skipped_unknown_action: usize,
    /// Records already processed or without a misjudge score.
    pub ineligible: usize,
}

/// Applies the expectation-based update batch.
pub struct OfflineUpdater {
    space: StateSpace,
    reward: RewardModel,
    config: EngineConfig,
}

impl OfflineUpdater {
    /// Build from a validated configuration.
    pub fn new(config: &EngineConfig) -> OfflineUpdater {
        OfflineUpdater {
            space: StateSpace::new(&config.features),
            reward: RewardModel::new(config),
            config: config.clone(),
        }
    }

    /// The updater's state space (shared indexing for callers).
    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// Incorporate every eligible record, mutating `table` and flipping
    /// each incorporated record's `done` flag. A record with an unknown
    /// action token is skipped with a warning; it never aborts the batch.
    pub fn apply_batch(
        &self,
        table: &mut QTable,
        records: &mut [LogRecord],
    ) -> Result<ReplayReport> {
        if table.states() != self.space.len() {
            return Err(Error::DimensionMismatch {
                expected: self.space.len(),
                actual: table.states(),
            });
        }

        let mut report = ReplayReport {
            total: records.len(),
            applied: 0,
            skipped_unknown_action: 0,
            ineligible: 0,
        };

        for record in records.iter_mut() {
            let misjudge = match (record.done, record.misjudge) {
                (false, Some(m)) => m,
                _ => {
                    report.ineligible += 1;
                    continue;
                }
            };
            let action = match Action::from_token(&record.action) {
                Some(action) => action,
                None => {
                    tracing::warn!(
                        id = record.id,
                        token = %record.action,
                        "skipping record with unknown action token"
                    );
                    report.skipped_unknown_action += 1;
                    continue;
                }
            };

            let state = record.state_for(self.space.features())?;
            let index = self.space.index(&state)?;

            let immediate =
                self.reward.reward(&state, action) - self.config.penalty_lambda * misjudge;
            let expected_max = self.expected_max(table, &state, action)?;
            let target = immediate + self.config.gamma * expected_max;

            table.update(index, action, target, self.config.alpha);
            record.done = true;
            report.applied += 1;
        }

        Ok(report)
    }

    /// Exact `E[max_a' Q[s',a']]` over the action's transition row.
    fn expected_max(&self, table: &QTable, state: &[u8], action: Action) -> Result<f64> {
        let row = self.config.transitions.row(state[0], action);
        let mut next = state.to_vec();
        let mut expectation = 0.0;
        for (acc_risk, &p) in row.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            next[0] = acc_risk as u8;
            expectation += p * table.max_value(self.space.index(&next)?);
        }
        Ok(expectation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_config::PresetName;

    fn record(id: u64, acc: u8, action: &str, misjudge: Option<f64>, done: bool) -> LogRecord {
        LogRecord {
            id,
            acc_risk: acc,
            up_flag: 1,
            uv_flag: 1,
            has_unknown_ext: 0,
            rp_id_match: None,
            sign_count_risk: 0,
            authenticator_risk: None,
            action: action.to_string(),
            misjudge,
            done,
        }
    }

    fn updater() -> OfflineUpdater {
        OfflineUpdater::new(&PresetName::Offline5d.config())
    }

    #[test]
    fn eligible_record_is_applied_and_marked_done() {
        let updater = updater();
        let mut table = QTable::zeroed(72);
        let mut records = vec![record(1, 0, "ACCEPT", Some(0.0), false)];

        let report = updater.apply_batch(&mut table, &mut records).unwrap();
        assert_eq!(report.applied, 1);
        assert!(records[0].done);

        // Zero table: target is the immediate reward alone; state
        // (0,1,1,0,0) has r = 0, low tier, Accept reward 80, alpha 0.2.
        let index = updater.space.index(&[0, 1, 1, 0, 0]).unwrap();
        assert!((table.row(index)[0] - 16.0).abs() < 1e-12);
    }

    #[test]
    fn misjudge_severity_is_charged() {
        let updater = updater();
        let mut table = QTable::zeroed(72);
        let mut records = vec![record(1, 0, "ACCEPT", Some(2.0), false)];
        updater.apply_batch(&mut table, &mut records).unwrap();

        // Immediate reward 80 - 24 * 2 = 32; alpha 0.2.
        let index = updater.space.index(&[0, 1, 1, 0, 0]).unwrap();
        assert!((table.row(index)[0] - 6.4).abs() < 1e-12);
    }

    #[test]
    fn unknown_token_is_skipped_not_fatal() {
        let updater = updater();
        let mut table = QTable::zeroed(72);
        let mut records = vec![
            record(1, 0, "ALLOW", Some(1.0), false),
            record(2, 0, "reject", Some(1.0), false),
        ];
        let report = updater.apply_batch(&mut table, &mut records).unwrap();
        assert_eq!(report.skipped_unknown_action, 1);
        assert_eq!(report.applied, 1);
        assert!(!records[0].done);
        assert!(records[1].done);
    }

    #[test]
    fn done_or_unscored_records_are_ineligible() {
        let updater = updater();
        let mut table = QTable::zeroed(72);
        let mut records = vec![
            record(1, 0, "MFA", Some(1.0), true),
            record(2, 0, "MFA", None, false),
        ];
        let report = updater.apply_batch(&mut table, &mut records).unwrap();
        assert_eq!(report.ineligible, 2);
        assert_eq!(report.applied, 0);
    }

    #[test]
    fn degenerate_row_reduces_to_one_step_td() {
        // Deterministic transition: the expectation collapses to a single
        // successor, i.e. the plain TD(0) target.
        let mut config = PresetName::Offline5d.config();
        config.transitions.accept = [
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let updater = OfflineUpdater::new(&config);

        let mut table = QTable::zeroed(72);
        let successor = updater.space.index(&[1, 1, 1, 0, 0]).unwrap();
        table.update(successor, Action::Mfa, 10.0, 1.0);

        let mut records = vec![record(1, 0, "ACCEPT", Some(0.0), false)];
        updater.apply_batch(&mut table, &mut records).unwrap();

        // target = 80 + 0.9 * 10 = 89; alpha 0.2 -> 17.8.
        let index = updater.space.index(&[0, 1, 1, 0, 0]).unwrap();
        assert!((table.row(index)[0] - 17.8).abs() < 1e-12);
    }

    #[test]
    fn expectation_weights_all_successors() {
        let updater = updater();
        let mut table = QTable::zeroed(72);
        for (acc, value) in [(0u8, 10.0), (1, 20.0), (2, 30.0)] {
            let index = updater.space.index(&[acc, 1, 1, 0, 0]).unwrap();
            table.update(index, Action::Reject, value, 1.0);
        }

        let state = [1u8, 1, 1, 0, 0];
        let expected = updater
            .expected_max(&table, &state, Action::Accept)
            .unwrap();
        // Accept row from acc=1: [0.3, 0.5, 0.2].
        assert!((expected - (0.3 * 10.0 + 0.5 * 20.0 + 0.2 * 30.0)).abs() < 1e-12);
    }

    #[test]
    fn seven_feature_replay_needs_the_extra_fields() {
        let config = PresetName::BalancedMfa.config();
        let updater = OfflineUpdater::new(&config);
        let mut table = QTable::zeroed(432);
        let mut records = vec![record(9, 0, "ACCEPT", Some(1.0), false)];
        assert!(matches!(
            updater.apply_batch(&mut table, &mut records).unwrap_err(),
            Error::LogStore(_)
        ));
    }

    #[test]
    fn store_round_trips_and_rewrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::new(dir.path().join("decisions.jsonl"));
        let mut records = vec![
            record(1, 0, "ACCEPT", Some(1.0), false),
            record(2, 2, "REJECT", None, false),
        ];
        store.save(&records).unwrap();

        records[0].done = true;
        store.save(&records).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].done);
        assert!(!loaded[1].done);
        assert_eq!(loaded[1].action, "REJECT");
    }

    #[test]
    fn store_reports_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        std::fs::write(&path, "{\"id\": 1\nnot json\n").unwrap();
        let err = LogStore::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::LogStore(_)));
    }
}
