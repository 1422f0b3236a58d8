//! Chemistry module: physical constants and Henry's Law helpers for dissolved gases.
//!
//! This module provides:
//! - Universal gas constant, Kelvin offset and mixing-ratio conversion
//! - Henry's Law solubility constants at 298.15 K for CO2, CH4 and N2O
//! - Van't Hoff temperature dependence for each gas
//! - Global-mean atmospheric mixing ratios used when reference air is not reported
//! - Significant-figure rounding
//!
//! Units conventions:
//! - Temperatures are °C at the API boundary and K internally
//! - Pressures are kPa
//! - Mixing ratios are ppmv (µmol/mol)
//! - Henry's constants are mol m^-3 Pa^-1; combined with kPa and ppmv the
//!   m^3 -> L and kPa -> Pa factors cancel, so products come out in mol/L
//!
//! Henry's Law constants and temperature dependence follow Sander (2015),
//! doi:10.5194/acp-15-4399-2015.
//!
//! # Examples
//! ```rust
//! use dissolved_gas::chemistry::{Gas, henry_constant, round_sig};
//!
//! // At the reference temperature the correction factor is exactly one.
//! let h = henry_constant(Gas::Co2, 25.0);
//! assert!((h - 3.3e-4).abs() < 1e-12);
//! assert_eq!(round_sig(0.000_082_671_26, 3), 0.000_082_7);
//! ```
//!
//! # Panics
//! None of the functions panic; NaN inputs yield NaN outputs.

/// Universal gas constant (L kPa K^-1 mol^-1).
pub const R_GAS: f64 = 8.314_459_8;
/// Offset between °C and K.
pub const KELVIN: f64 = 273.15;
/// ppmv -> mol/mol.
pub const PPMV_TO_MOL_FRAC: f64 = 1e-6;
/// Reference temperature for the Henry's Law constants (K).
pub const T0_K: f64 = 298.15;
/// Ratio -> percent.
pub const PERCENT: f64 = 100.0;
/// Significant figures kept in every computed output column.
pub const OUTPUT_SIG_FIGS: i32 = 3;

// Henry's Law constants at T0 (mol m^-3 Pa^-1)
/// CO2, literature range 3.1e-4 .. 4.5e-4.
pub const KH_CO2: f64 = 3.3e-4;
/// CH4, literature range 9.6e-6 .. 9.2e-5.
pub const KH_CH4: f64 = 1.4e-5;
/// N2O, literature range 1.8e-4 .. 2.5e-4.
pub const KH_N2O: f64 = 2.4e-4;

// Van't Hoff temperature dependence d(ln H)/d(1/T) (K)
pub const DHDT_CO2: f64 = 2400.0;
pub const DHDT_CH4: f64 = 1900.0;
pub const DHDT_N2O: f64 = 2700.0;

// Global-mean atmospheric mixing ratios (ppmv), NOAA GML trends
/// Substituted for missing CO2 reference air.
pub const ATM_CO2_PPMV: f64 = 405.0;
/// Substituted for missing CH4 reference air.
pub const ATM_CH4_PPMV: f64 = 1.85;
/// Substituted for missing N2O reference air.
pub const ATM_N2O_PPMV: f64 = 0.330;

/// One of the three dissolved gases handled by the calculators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gas {
    Co2,
    Ch4,
    N2o,
}

impl Gas {
    /// All gases in output column order.
    pub const ALL: [Gas; 3] = [Gas::Co2, Gas::Ch4, Gas::N2o];

    /// Chemical formula as it appears in column names.
    pub fn formula(self) -> &'static str {
        match self {
            Gas::Co2 => "CO2",
            Gas::Ch4 => "CH4",
            Gas::N2o => "N2O",
        }
    }

    /// Henry's Law constant at `T0_K` (mol m^-3 Pa^-1).
    pub fn kh_ref(self) -> f64 {
        match self {
            Gas::Co2 => KH_CO2,
            Gas::Ch4 => KH_CH4,
            Gas::N2o => KH_N2O,
        }
    }

    /// Van't Hoff temperature-dependence constant (K).
    pub fn dh_dt(self) -> f64 {
        match self {
            Gas::Co2 => DHDT_CO2,
            Gas::Ch4 => DHDT_CH4,
            Gas::N2o => DHDT_N2O,
        }
    }

    /// Global-mean atmospheric mixing ratio (ppmv).
    pub fn atmospheric_ppmv(self) -> f64 {
        match self {
            Gas::Co2 => ATM_CO2_PPMV,
            Gas::Ch4 => ATM_CH4_PPMV,
            Gas::N2o => ATM_N2O_PPMV,
        }
    }
}

impl std::fmt::Display for Gas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.formula())
    }
}

/// Convert °C to K.
pub fn to_kelvin(t_c: f64) -> f64 {
    t_c + KELVIN
}

/// Temperature-corrected Henry's Law constant (mol m^-3 Pa^-1).
///
/// Inputs:
/// - `gas`: which gas's reference constant and van't Hoff slope to use.
/// - `t_c`: temperature in °C.
///
/// Returns `kH * exp(dHdT * (1/T - 1/T0))`.
pub fn henry_constant(gas: Gas, t_c: f64) -> f64 {
    let t_k = to_kelvin(t_c);
    gas.kh_ref() * (gas.dh_dt() * (1.0 / t_k - 1.0 / T0_K)).exp()
}

/// Round to `sig` significant figures (at least one).
///
/// Rounds through the decimal scientific representation, so the result is the
/// `f64` nearest to the rounded decimal at any magnitude, subnormals included.
/// Zero, NaN and infinities are returned unchanged, as is a value whose
/// rounded form would overflow `f64`.
pub fn round_sig(x: f64, sig: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let decimals = (sig.max(1) - 1) as usize;
    format!("{x:.decimals$e}")
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(x)
}
