use crate::chemistry::*;
use crate::error::AppError;
use crate::gas::dissolved_column;
use crate::gas::resolve::{resolve_headspace_temp, resolve_required, resolve_source_gas};
use crate::models::{ColumnMap, Role};
use crate::table::{Input, SampleTable};

/// Resolved measurements for one gas in one headspace equilibration.
///
/// - `gas_volume_ml`, `water_volume_ml`: syringe volumes (mL)
/// - `baro_kpa`: barometric pressure at equilibration (kPa)
/// - `headspace_temp_c`: sample temperature during equilibration (°C)
/// - `eq_ppmv`: mixing ratio in the equilibrated headspace (ppmv)
/// - `source_ppmv`: mixing ratio of the gas used to create the headspace (ppmv)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadspaceSample {
    pub gas_volume_ml: f64,
    pub water_volume_ml: f64,
    pub baro_kpa: f64,
    pub headspace_temp_c: f64,
    pub eq_ppmv: f64,
    pub source_ppmv: f64,
}

/// Dissolved gas concentration (mol/L) in the original water sample, rounded
/// to three significant figures.
///
/// Mass balance over the syringe: gas gained by the headspace (ideal gas law
/// on `eq - source`) plus gas left in the equilibrated water (Henry's Law at
/// the headspace temperature), both per litre of water.
///
/// Non-physical inputs such as a zero water volume give NaN.
pub fn dissolved_concentration(gas: Gas, s: &HeadspaceSample) -> f64 {
    let t_k = to_kelvin(s.headspace_temp_c);
    let h = henry_constant(gas, s.headspace_temp_c);

    let headspace_term =
        s.gas_volume_ml * (s.eq_ppmv - s.source_ppmv) / (R_GAS * t_k * s.water_volume_ml);
    let water_term = h * s.eq_ppmv;
    let conc = s.baro_kpa * PPMV_TO_MOL_FRAC * (headspace_term + water_term);

    if conc.is_finite() {
        round_sig(conc, OUTPUT_SIG_FIGS)
    } else {
        f64::NAN
    }
}

/// Append `dissolvedCO2`, `dissolvedCH4` and `dissolvedN2O` to the table.
///
/// All roles for all three gases are resolved before anything is computed,
/// so a missing required column fails the whole call with no partial output.
/// Missing source gas defaults to the global-mean atmosphere, missing
/// headspace temperature to the water temperature.
pub fn calc_dissolved_conc(
    input: impl Into<Input>,
    map: &ColumnMap,
) -> Result<SampleTable, AppError> {
    let mut table = input.into().load()?;

    let gas_volume = resolve_required(&table, map, Role::GasVolume)?;
    let water_volume = resolve_required(&table, map, Role::WaterVolume)?;
    let baro = resolve_required(&table, map, Role::BarometricPressure)?;
    let water_temp = resolve_required(&table, map, Role::WaterTemp)?;
    let headspace_temp = resolve_headspace_temp(&table, map, &water_temp)?;

    let mut per_gas = Vec::with_capacity(Gas::ALL.len());
    for gas in Gas::ALL {
        let eq = resolve_required(&table, map, Role::EquilibratedGas(gas))?;
        let source = resolve_source_gas(&table, map, gas)?;
        per_gas.push((gas, eq, source));
    }

    for (gas, eq, source) in per_gas {
        let values: Vec<Option<f64>> = (0..table.n_rows())
            .map(|i| {
                let sample = HeadspaceSample {
                    gas_volume_ml: gas_volume[i],
                    water_volume_ml: water_volume[i],
                    baro_kpa: baro[i],
                    headspace_temp_c: headspace_temp[i],
                    eq_ppmv: eq[i],
                    source_ppmv: source[i],
                };
                Some(dissolved_concentration(gas, &sample)).filter(|c| !c.is_nan())
            })
            .collect();
        table.push_numeric(&dissolved_column(gas), values)?;
    }

    log::info!("computed dissolved gas concentrations for {} rows", table.n_rows());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_sample() -> HeadspaceSample {
        HeadspaceSample {
            gas_volume_ml: 20.0,
            water_volume_ml: 40.0,
            baro_kpa: 93.62,
            headspace_temp_c: 15.0,
            eq_ppmv: 1500.0,
            source_ppmv: 405.0,
        }
    }

    #[test]
    fn reference_co2_sample() {
        let c = dissolved_concentration(Gas::Co2, &reference_sample());
        assert_relative_eq!(c, 8.27e-5, max_relative = 1e-12);
    }

    #[test]
    fn equal_eq_and_source_leaves_only_henry_term() {
        let s = HeadspaceSample {
            eq_ppmv: 405.0,
            ..reference_sample()
        };
        let expected = round_sig(93.62 * 1e-6 * henry_constant(Gas::Co2, 15.0) * 405.0, 3);
        assert_relative_eq!(dissolved_concentration(Gas::Co2, &s), expected, max_relative = 1e-12);
    }

    #[test]
    fn zero_water_volume_is_nan() {
        let s = HeadspaceSample {
            water_volume_ml: 0.0,
            ..reference_sample()
        };
        assert!(dissolved_concentration(Gas::Co2, &s).is_nan());
    }

    #[test]
    fn nan_input_propagates() {
        let s = HeadspaceSample {
            baro_kpa: f64::NAN,
            ..reference_sample()
        };
        assert!(dissolved_concentration(Gas::Ch4, &s).is_nan());
    }

    #[test]
    fn deterministic() {
        let s = reference_sample();
        for gas in Gas::ALL {
            assert_eq!(
                dissolved_concentration(gas, &s).to_bits(),
                dissolved_concentration(gas, &s).to_bits()
            );
        }
    }
}
