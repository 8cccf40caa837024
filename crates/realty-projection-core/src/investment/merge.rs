use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::series::EntitySeries;
use crate::error::RealtyError;
use crate::types::Money;
use crate::RealtyResult;

/// One chart row: a year plus every entity's value keyed by series key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub year: u32,
    #[serde(flatten)]
    pub values: BTreeMap<String, Money>,
}

/// Join per-entity series into year-indexed rows.
///
/// Every series must have the same length and the same year labels as the
/// first one; nothing is truncated or padded.
pub fn merge_series(series_list: &[EntitySeries]) -> RealtyResult<Vec<ChartRow>> {
    let Some(first) = series_list.first() else {
        return Ok(Vec::new());
    };
    let expected = first.points.len();

    let mut seen_keys: Vec<&str> = Vec::with_capacity(series_list.len());
    for series in series_list {
        if series.points.len() != expected {
            return Err(RealtyError::MismatchedSeriesLength {
                key: series.key.clone(),
                expected,
                found: series.points.len(),
            });
        }
        if series.key == "year" {
            return Err(RealtyError::invalid(
                "key",
                "'year' is reserved for the row label",
            ));
        }
        if seen_keys.contains(&series.key.as_str()) {
            return Err(RealtyError::invalid(
                "key",
                format!("Duplicate series key '{}'", series.key),
            ));
        }
        seen_keys.push(&series.key);
    }

    let mut rows: Vec<ChartRow> = first
        .points
        .iter()
        .map(|p| ChartRow {
            year: p.year,
            values: BTreeMap::new(),
        })
        .collect();

    for series in series_list {
        for (idx, (row, point)) in rows.iter_mut().zip(&series.points).enumerate() {
            if point.year != row.year {
                return Err(RealtyError::invalid(
                    "year",
                    format!(
                        "Series '{}' has year {} at position {}, expected {}",
                        series.key, point.year, idx, row.year
                    ),
                ));
            }
            row.values.insert(series.key.clone(), point.value);
        }
    }

    Ok(rows)
}
