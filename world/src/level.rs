//! Level file loading.
//!
//! Levels are JSON documents with a `grid` section listing colour codes row by
//! row (front row first) and a `shooter` section listing one queue of agents
//! per lane (front agent first).

use std::{fs, path::Path};

use lane_blast_core::{AgentSpec, Color, LevelLayout};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading level data.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level file {path}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid level JSON.
    #[error("malformed level document")]
    Malformed(#[from] serde_json::Error),
    /// The `grid` section or its `rows` are missing.
    #[error("level is missing the grid rows")]
    MissingGrid,
    /// A grid row has no `cells` entry.
    #[error("grid row {row} is missing its cells")]
    MissingCells {
        /// Index of the offending row.
        row: usize,
    },
    /// The grid has no rows or no columns.
    #[error("level grid is empty")]
    EmptyGrid,
    /// A grid row differs in width from the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The `shooter` section or its `rows` are missing.
    #[error("level is missing the shooter board")]
    MissingShooters,
    /// A shooter lane has no `columns` entry.
    #[error("shooter lane {lane} is missing its columns")]
    MissingLane {
        /// Index of the offending lane.
        lane: usize,
    },
}

#[derive(Debug, Deserialize)]
struct LevelDocument {
    grid: Option<GridSection>,
    shooter: Option<ShooterSection>,
}

#[derive(Debug, Deserialize)]
struct GridSection {
    rows: Option<Vec<GridRow>>,
}

#[derive(Debug, Deserialize)]
struct GridRow {
    cells: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ShooterSection {
    rows: Option<Vec<ShooterLane>>,
}

#[derive(Debug, Deserialize)]
struct ShooterLane {
    columns: Option<Vec<ShooterEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShooterEntry {
    #[serde(default)]
    color: String,
    #[serde(default)]
    bullet_count: u32,
    #[serde(default)]
    hidden: bool,
}

/// Parses and validates a level document.
///
/// Unknown colour codes fall back to red; structural problems are errors.
pub fn parse_level(json: &str) -> Result<LevelLayout, LevelError> {
    let document: LevelDocument = serde_json::from_str(json)?;

    let grid_rows = document
        .grid
        .and_then(|grid| grid.rows)
        .ok_or(LevelError::MissingGrid)?;

    let mut rows = Vec::with_capacity(grid_rows.len());
    for (index, row) in grid_rows.into_iter().enumerate() {
        let cells = row.cells.ok_or(LevelError::MissingCells { row: index })?;
        rows.push(
            cells
                .iter()
                .map(|code| Color::from_code(code))
                .collect::<Vec<_>>(),
        );
    }

    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(LevelError::EmptyGrid);
    }
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != width)
    {
        return Err(LevelError::RaggedRow {
            row,
            expected: width,
            found,
        });
    }

    let shooter_lanes = document
        .shooter
        .and_then(|shooter| shooter.rows)
        .ok_or(LevelError::MissingShooters)?;

    let mut lanes = Vec::with_capacity(shooter_lanes.len());
    for (index, lane) in shooter_lanes.into_iter().enumerate() {
        let entries = lane.columns.ok_or(LevelError::MissingLane { lane: index })?;
        lanes.push(
            entries
                .into_iter()
                .map(|entry| AgentSpec {
                    color: Color::from_code(&entry.color),
                    ammo: entry.bullet_count,
                    hidden: entry.hidden,
                })
                .collect(),
        );
    }

    Ok(LevelLayout::new(rows, lanes))
}

/// Reads and parses the level file at the provided path.
pub fn read_level(path: impl AsRef<Path>) -> Result<LevelLayout, LevelError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_level(&contents)
}

#[cfg(test)]
mod tests {
    use lane_blast_core::{AgentSpec, Color};

    use super::{parse_level, read_level, LevelError};

    #[test]
    fn parses_grid_and_shooter_board() {
        let layout = parse_level(
            r#"{
                "grid": { "rows": [ { "cells": ["R", "B"] }, { "cells": ["G", "Y"] } ] },
                "shooter": { "rows": [
                    { "columns": [ { "color": "O", "bulletCount": 3, "hidden": true } ] },
                    { "columns": [] }
                ] }
            }"#,
        )
        .expect("level parses");

        assert_eq!(layout.width(), 2);
        assert_eq!(layout.height(), 2);
        assert_eq!(layout.rows()[0], vec![Color::Red, Color::Blue]);
        assert_eq!(
            layout.lanes()[0],
            vec![AgentSpec {
                color: Color::Orange,
                ammo: 3,
                hidden: true
            }]
        );
        assert!(layout.lanes()[1].is_empty());
    }

    #[test]
    fn unknown_and_missing_codes_default_to_red() {
        let layout = parse_level(
            r#"{
                "grid": { "rows": [ { "cells": ["X", ""] } ] },
                "shooter": { "rows": [ { "columns": [ { "bulletCount": 1 } ] } ] }
            }"#,
        )
        .expect("level parses");

        assert_eq!(layout.rows()[0], vec![Color::Red, Color::Red]);
        assert_eq!(layout.lanes()[0][0].color, Color::Red);
        assert!(!layout.lanes()[0][0].hidden);
    }

    #[test]
    fn missing_sections_are_rejected() {
        assert!(matches!(
            parse_level(r#"{ "shooter": { "rows": [] } }"#),
            Err(LevelError::MissingGrid)
        ));
        assert!(matches!(
            parse_level(r#"{ "grid": { "rows": [ { "cells": ["R"] } ] } }"#),
            Err(LevelError::MissingShooters)
        ));
        assert!(matches!(
            parse_level(r#"{ "grid": { "rows": [ {} ] }, "shooter": { "rows": [] } }"#),
            Err(LevelError::MissingCells { row: 0 })
        ));
        assert!(matches!(
            parse_level(
                r#"{ "grid": { "rows": [ { "cells": ["R"] } ] }, "shooter": { "rows": [ {} ] } }"#
            ),
            Err(LevelError::MissingLane { lane: 0 })
        ));
    }

    #[test]
    fn empty_and_ragged_grids_are_rejected() {
        assert!(matches!(
            parse_level(r#"{ "grid": { "rows": [] }, "shooter": { "rows": [] } }"#),
            Err(LevelError::EmptyGrid)
        ));
        assert!(matches!(
            parse_level(
                r#"{ "grid": { "rows": [ { "cells": ["R", "B"] }, { "cells": ["G"] } ] },
                     "shooter": { "rows": [] } }"#
            ),
            Err(LevelError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_level("{ grid"), Err(LevelError::Malformed(_))));
    }

    #[test]
    fn demo_level_loads_from_disk() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../levels/demo.json");
        let layout = read_level(path).expect("demo level loads");

        assert!(layout.width() > 0);
        assert!(!layout.lanes().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_level("/nonexistent/level.json"),
            Err(LevelError::Io { .. })
        ));
    }
}
