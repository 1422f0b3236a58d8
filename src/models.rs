use serde::{Deserialize, Serialize};

use crate::chemistry::Gas;
use crate::error::AppError;

/// Where the values for one input role come from.
///
/// In JSON/TOML a string names a column, a number is broadcast to every row,
/// and an array gives one value per row (`null` entries count as missing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Column(String),
    Scalar(f64),
    Values(Vec<Option<f64>>),
}

impl Source {
    pub fn column(name: &str) -> Self {
        Source::Column(name.to_string())
    }

    /// Column name for error messages; overrides report their kind instead.
    pub fn describe(&self) -> String {
        match self {
            Source::Column(name) => name.clone(),
            Source::Scalar(v) => format!("<scalar {v}>"),
            Source::Values(v) => format!("<{} values>", v.len()),
        }
    }
}

/// Logical input roles of a sample row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    GasVolume,
    WaterVolume,
    BarometricPressure,
    WaterTemp,
    HeadspaceTemp,
    EquilibratedGas(Gas),
    SourceGas(Gas),
    Dissolved(Gas),
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::GasVolume => f.write_str("gas volume"),
            Role::WaterVolume => f.write_str("water volume"),
            Role::BarometricPressure => f.write_str("barometric pressure"),
            Role::WaterTemp => f.write_str("water temperature"),
            Role::HeadspaceTemp => f.write_str("headspace temperature"),
            Role::EquilibratedGas(g) => write!(f, "equilibrated {g} concentration"),
            Role::SourceGas(g) => write!(f, "source {g} concentration"),
            Role::Dissolved(g) => write!(f, "dissolved {g} concentration"),
        }
    }
}

/// Mapping from input role to the column (or literal override) holding it.
///
/// Keys follow the parameter names of the NEON dissolved-gas scripts, so a
/// column map such as `{"volGas": "gasVol_mL", "baro": 101.3}` reads the gas
/// volume from `gasVol_mL` and uses 101.3 kPa for every row. Roles that are
/// not given keep their canonical column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    #[serde(rename = "volGas")]
    pub vol_gas: Source,
    #[serde(rename = "volH2O")]
    pub vol_h2o: Source,
    pub baro: Source,
    #[serde(rename = "waterTemp")]
    pub water_temp: Source,
    #[serde(rename = "headspaceTemp")]
    pub headspace_temp: Source,
    #[serde(rename = "eqCO2")]
    pub eq_co2: Source,
    #[serde(rename = "sourceCO2")]
    pub source_co2: Source,
    #[serde(rename = "eqCH4")]
    pub eq_ch4: Source,
    #[serde(rename = "sourceCH4")]
    pub source_ch4: Source,
    #[serde(rename = "eqN2O")]
    pub eq_n2o: Source,
    #[serde(rename = "sourceN2O")]
    pub source_n2o: Source,
    #[serde(rename = "concCO2")]
    pub conc_co2: Source,
    #[serde(rename = "concCH4")]
    pub conc_ch4: Source,
    #[serde(rename = "concN2O")]
    pub conc_n2o: Source,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            vol_gas: Source::column("gasVolume"),
            vol_h2o: Source::column("waterVolume"),
            baro: Source::column("barometricPressure"),
            water_temp: Source::column("waterTemp"),
            headspace_temp: Source::column("headspaceTemp"),
            eq_co2: Source::column("concentrationCO2Gas"),
            source_co2: Source::column("concentrationCO2Air"),
            eq_ch4: Source::column("concentrationCH4Gas"),
            source_ch4: Source::column("concentrationCH4Air"),
            eq_n2o: Source::column("concentrationN2OGas"),
            source_n2o: Source::column("concentrationN2OAir"),
            conc_co2: Source::column("dissolvedCO2"),
            conc_ch4: Source::column("dissolvedCH4"),
            conc_n2o: Source::column("dissolvedN2O"),
        }
    }
}

impl ColumnMap {
    pub fn from_json_str(s: &str) -> Result<Self, AppError> {
        serde_json::from_str(s).map_err(|source| AppError::ParseColumnsJson { source })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        toml::from_str(s).map_err(|source| AppError::ParseColumnsToml { source })
    }

    /// Source for a given role.
    pub fn source(&self, role: Role) -> &Source {
        match role {
            Role::GasVolume => &self.vol_gas,
            Role::WaterVolume => &self.vol_h2o,
            Role::BarometricPressure => &self.baro,
            Role::WaterTemp => &self.water_temp,
            Role::HeadspaceTemp => &self.headspace_temp,
            Role::EquilibratedGas(Gas::Co2) => &self.eq_co2,
            Role::EquilibratedGas(Gas::Ch4) => &self.eq_ch4,
            Role::EquilibratedGas(Gas::N2o) => &self.eq_n2o,
            Role::SourceGas(Gas::Co2) => &self.source_co2,
            Role::SourceGas(Gas::Ch4) => &self.source_ch4,
            Role::SourceGas(Gas::N2o) => &self.source_n2o,
            Role::Dissolved(Gas::Co2) => &self.conc_co2,
            Role::Dissolved(Gas::Ch4) => &self.conc_ch4,
            Role::Dissolved(Gas::N2o) => &self.conc_n2o,
        }
    }
}
