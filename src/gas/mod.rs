//! Dissolved gas calculators.
//!
//! `concentration` turns headspace measurements into dissolved molar
//! concentrations; `saturation` compares those with atmospheric equilibrium.
//! Both append columns to the input table and never remove existing ones.

pub mod concentration;
pub mod resolve;
pub mod saturation;

use crate::chemistry::Gas;
use crate::error::AppError;
use crate::models::{ColumnMap, Source};
use crate::table::{Input, SampleTable};

/// Output column for the dissolved concentration of `gas`, e.g. `dissolvedCO2`.
pub fn dissolved_column(gas: Gas) -> String {
    format!("dissolved{}", gas.formula())
}

/// Output column for the 100 % saturation concentration, e.g. `satConcCO2`.
pub fn sat_conc_column(gas: Gas) -> String {
    format!("satConc{}", gas.formula())
}

/// Output column for percent saturation, e.g. `CO2PercSat`.
pub fn perc_sat_column(gas: Gas) -> String {
    format!("{}PercSat", gas.formula())
}

/// Run the concentration and saturation calculators back to back.
///
/// The saturation stage always reads the dissolved columns the first stage
/// just wrote, whatever `concCO2`/`concCH4`/`concN2O` say in `map`.
pub fn calc_all(input: impl Into<Input>, map: &ColumnMap) -> Result<SampleTable, AppError> {
    let with_conc = concentration::calc_dissolved_conc(input, map)?;
    let sat_map = ColumnMap {
        conc_co2: Source::Column(dissolved_column(Gas::Co2)),
        conc_ch4: Source::Column(dissolved_column(Gas::Ch4)),
        conc_n2o: Source::Column(dissolved_column(Gas::N2o)),
        ..map.clone()
    };
    saturation::calc_sat(with_conc, &sat_map)
}
