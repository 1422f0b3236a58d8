use crate::chemistry::*;
use crate::error::AppError;
use crate::gas::resolve::{resolve_required, resolve_source_gas};
use crate::gas::{perc_sat_column, sat_conc_column};
use crate::models::{ColumnMap, Role};
use crate::table::{Input, SampleTable};

/// Dissolved concentration (mol/L) in equilibrium with the atmosphere, unrounded.
///
/// Henry's Law at the water temperature applied to the reference-air partial
/// pressure `air_ppmv * baro_kpa * 1e-6`.
pub fn saturation_concentration(gas: Gas, water_temp_c: f64, air_ppmv: f64, baro_kpa: f64) -> f64 {
    henry_constant(gas, water_temp_c) * air_ppmv * baro_kpa * PPMV_TO_MOL_FRAC
}

/// `dissolved / sat_conc * 100`. NaN when the denominator is zero or undefined.
pub fn percent_saturation(dissolved: f64, sat_conc: f64) -> f64 {
    let pct = dissolved / sat_conc * PERCENT;
    if pct.is_finite() { pct } else { f64::NAN }
}

fn finite(v: f64) -> Option<f64> {
    Some(v).filter(|x| x.is_finite())
}

/// Append `satConcXXX` and `XXXPercSat` for CO2, CH4 and N2O.
///
/// Reads the dissolved concentration columns (normally produced by
/// `calc_dissolved_conc`), water temperature, pressure and reference air.
/// Percent saturation uses the unrounded saturation concentration; both
/// outputs are rounded to three significant figures.
pub fn calc_sat(input: impl Into<Input>, map: &ColumnMap) -> Result<SampleTable, AppError> {
    let mut table = input.into().load()?;

    let baro = resolve_required(&table, map, Role::BarometricPressure)?;
    let water_temp = resolve_required(&table, map, Role::WaterTemp)?;

    let mut per_gas = Vec::with_capacity(Gas::ALL.len());
    for gas in Gas::ALL {
        let dissolved = resolve_required(&table, map, Role::Dissolved(gas))?;
        let air = resolve_source_gas(&table, map, gas)?;
        per_gas.push((gas, dissolved, air));
    }

    let mut sat_columns = Vec::with_capacity(Gas::ALL.len());
    let mut pct_columns = Vec::with_capacity(Gas::ALL.len());
    for (gas, dissolved, air) in per_gas {
        let sat: Vec<f64> = (0..table.n_rows())
            .map(|i| saturation_concentration(gas, water_temp[i], air[i], baro[i]))
            .collect();
        let pct: Vec<Option<f64>> = dissolved
            .iter()
            .zip(&sat)
            .map(|(d, s)| finite(round_sig(percent_saturation(*d, *s), OUTPUT_SIG_FIGS)))
            .collect();
        let sat: Vec<Option<f64>> = sat
            .into_iter()
            .map(|s| finite(round_sig(s, OUTPUT_SIG_FIGS)))
            .collect();
        sat_columns.push((sat_conc_column(gas), sat));
        pct_columns.push((perc_sat_column(gas), pct));
    }

    for (name, values) in sat_columns.into_iter().chain(pct_columns) {
        table.push_numeric(&name, values)?;
    }

    log::info!("computed percent saturation for {} rows", table.n_rows());
    Ok(table)
}
