//! Input resolution: turn a `ColumnMap` plus a table into one value per row
//! for each role, before any formula runs.
//!
//! Required roles fail fast when their column is absent. Optional roles fall
//! back to a default: global-mean air for source gas, water temperature for
//! headspace temperature. The fill functions are pure and total.

use crate::chemistry::Gas;
use crate::error::AppError;
use crate::models::{ColumnMap, Role, Source};
use crate::table::SampleTable;

fn is_present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

/// Cells for `role` from the table or from an override. `Ok(None)` means the
/// named column does not exist.
fn lookup(
    table: &SampleTable,
    role: Role,
    source: &Source,
) -> Result<Option<Vec<Option<f64>>>, AppError> {
    let n = table.n_rows();
    match source {
        Source::Column(name) => {
            if !table.has_column(name) {
                return Ok(None);
            }
            match table.numeric(name) {
                Some(cells) => Ok(Some(cells.to_vec())),
                None => Err(AppError::NotNumeric { name: name.clone() }),
            }
        }
        Source::Scalar(v) => Ok(Some(vec![Some(*v); n])),
        Source::Values(values) => {
            if values.len() != n {
                return Err(AppError::LengthMismatch {
                    name: role.to_string(),
                    expected: n,
                    actual: values.len(),
                });
            }
            Ok(Some(values.clone()))
        }
    }
}

/// Resolve a required role. Missing cells become NaN so the row's result is
/// undefined without aborting other rows.
pub fn resolve_required(
    table: &SampleTable,
    map: &ColumnMap,
    role: Role,
) -> Result<Vec<f64>, AppError> {
    let source = map.source(role);
    let cells = lookup(table, role, source)?.ok_or_else(|| AppError::MissingRequiredColumn {
        role: role.to_string(),
        column: source.describe(),
    })?;

    let missing = cells.iter().filter(|c| is_present(**c).is_none()).count();
    if missing > 0 {
        log::warn!("{missing} rows have no {role}; their results will be NA");
    }
    Ok(cells.into_iter().map(|c| c.unwrap_or(f64::NAN)).collect())
}

/// Resolve an optional role. An absent column yields all-missing cells.
pub fn resolve_optional(
    table: &SampleTable,
    map: &ColumnMap,
    role: Role,
) -> Result<Vec<Option<f64>>, AppError> {
    match lookup(table, role, map.source(role))? {
        Some(cells) => Ok(cells),
        None => {
            log::debug!("no column for {role}; every row uses the default");
            Ok(vec![None; table.n_rows()])
        }
    }
}

/// Replace missing cells with a constant.
pub fn fill_default(values: &[Option<f64>], default: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| is_present(*v).unwrap_or(default))
        .collect()
}

/// Replace missing cells with the same row of `fallback`.
pub fn fill_from(values: &[Option<f64>], fallback: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(fallback)
        .map(|(v, fb)| is_present(*v).unwrap_or(*fb))
        .collect()
}

fn count_missing(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| is_present(**v).is_none()).count()
}

/// Source-gas mixing ratio per row, defaulting to the global-mean atmosphere.
pub fn resolve_source_gas(
    table: &SampleTable,
    map: &ColumnMap,
    gas: Gas,
) -> Result<Vec<f64>, AppError> {
    let cells = resolve_optional(table, map, Role::SourceGas(gas))?;
    let n_default = count_missing(&cells);
    if n_default > 0 {
        log::debug!(
            "{n_default} rows use the global-mean {gas} of {} ppmv",
            gas.atmospheric_ppmv()
        );
    }
    Ok(fill_default(&cells, gas.atmospheric_ppmv()))
}

/// Headspace temperature per row, defaulting to that row's water temperature.
pub fn resolve_headspace_temp(
    table: &SampleTable,
    map: &ColumnMap,
    water_temp: &[f64],
) -> Result<Vec<f64>, AppError> {
    let cells = resolve_optional(table, map, Role::HeadspaceTemp)?;
    let n_default = count_missing(&cells);
    if n_default > 0 {
        log::debug!("{n_default} rows use water temperature as headspace temperature");
    }
    Ok(fill_from(&cells, water_temp))
}
