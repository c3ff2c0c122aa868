//! Labeled dataset loading.
//!
//! Validation and warm-start datasets are CSV files with one row per
//! labeled decision. The header must carry every feature column of the
//! paired state space (matched case-insensitively, so the historical
//! `AuthenticatorRisk` capitalization is accepted) plus an integer
//! `action` column. Each row's state is checked against the state-space
//! domain at load time, so downstream lookups cannot fail.

use crate::state::StateSpace;
use at_common::{Action, Error, Result};
use std::path::Path;

/// One labeled decision.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub state: Vec<u8>,
    pub action: Action,
}

/// A labeled dataset bound to the state space it was validated against.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub rows: Vec<LabeledRow>,
}

impl LabeledDataset {
    /// Number of rows.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Load a CSV dataset, validating every state against `space`.
    pub fn load_csv(path: &Path, space: &StateSpace) -> Result<LabeledDataset> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut lines = content.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => line,
            None => {
                return Err(Error::Dataset {
                    path: path.display().to_string(),
                    line: 1,
                    message: "file is empty".to_string(),
                })
            }
        };
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let find = |name: &str| -> Result<usize> {
            columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::MissingColumn {
                    column: name.to_string(),
                    path: path.display().to_string(),
                })
        };
        let feature_cols: Vec<usize> = space
            .features()
            .iter()
            .map(|f| find(f.column()))
            .collect::<Result<_>>()?;
        let action_col = find("action")?;

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            let cell = |col: usize| -> Result<u8> {
                cells
                    .get(col)
                    .and_then(|c| c.parse::<u8>().ok())
                    .ok_or_else(|| Error::Dataset {
                        path: path.display().to_string(),
                        line: line_no + 1,
                        message: format!("column {} is not a small integer", col + 1),
                    })
            };

            let state: Vec<u8> = feature_cols
                .iter()
                .map(|&col| cell(col))
                .collect::<Result<_>>()?;
            // Surface out-of-domain rows with their line number.
            space.index(&state).map_err(|e| Error::Dataset {
                path: path.display().to_string(),
                line: line_no + 1,
                message: e.to_string(),
            })?;

            let action = Action::from_index(cell(action_col)? as usize).ok_or_else(|| {
                Error::Dataset {
                    path: path.display().to_string(),
                    line: line_no + 1,
                    message: "action must be 0, 1, or 2".to_string(),
                }
            })?;

            rows.push(LabeledRow { state, action });
        }

        Ok(LabeledDataset { rows })
    }
}
