//! Marine carbonate system solver.
//!
//! Given two measured parameters (any pair of alkalinity, DIC, pH, pCO2 or
//! fCO2, except pCO2 with fCO2), salinity and temperature, computes the full
//! carbonate system at the measurement ("input") temperature and at a second
//! ("output") temperature, following the CO2SYS conventions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ SolverConfig │──▶│ Equilibrium   │──▶│ Speciation   │──▶│ SolverResult │
//! │ (selectors)  │   │ constants     │   │ (pair solve) │   │ (by name)    │
//! └──────────────┘   └───────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use co2calc::co2sys::{Co2Sys, Parameter, SolverConfig};
//!
//! let solver = Co2Sys::new(SolverConfig::default())?;
//! let result = solver.solve_table(&[400.0], &[8.0], &[32.0], &[15.0], &[15.0])?;
//! println!("TA = {:?}", result.series(Parameter::Alkalinity));
//! ```

pub mod config;
pub mod constants;
pub mod result;
pub mod speciation;

pub use config::{
    BisulfateConstant, BorateRatio, K1K2Constants, Kso4Constants, ParameterType, PhScale,
    SolverConfig,
};
pub use constants::{EquilibriumConstants, PhScales, Totals};
pub use result::{CarbonateSystem, ConditionState, Parameter, SolverResult};
pub use speciation::Speciation;

use crate::error::{SolverError, SolverResultT};

/// The four core quantities once a pair has been completed.
#[derive(Debug, Clone, Copy)]
struct CoreState {
    alkalinity: f64,
    dic: f64,
    ph: f64,
    fco2: f64,
}

/// Known values of the four core quantities before completion.
#[derive(Debug, Default)]
struct KnownValues {
    alkalinity: Option<f64>,
    dic: Option<f64>,
    ph: Option<f64>,
    fco2: Option<f64>,
}

/// Carbonate-system solver bound to one configuration.
#[derive(Debug, Clone)]
pub struct Co2Sys {
    config: SolverConfig,
}

impl Co2Sys {
    pub fn new(config: SolverConfig) -> SolverResultT<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve one observation.
    ///
    /// `par1` and `par2` are interpreted per `par1_type` / `par2_type`;
    /// temperatures are °C. A NaN anywhere in the inputs yields a system
    /// whose derived values are all NaN.
    pub fn solve(
        &self,
        par1: f64,
        par2: f64,
        salinity: f64,
        temp_in: f64,
        temp_out: f64,
    ) -> SolverResultT<CarbonateSystem> {
        let config = &self.config;
        let inputs = [
            (config.par1_type.name(), par1),
            (config.par2_type.name(), par2),
            ("salinity", salinity),
            ("input temperature", temp_in),
            ("output temperature", temp_out),
        ];
        for (parameter, value) in inputs {
            if value.is_infinite() {
                return Err(SolverError::InvalidInput { parameter, value });
            }
        }
        if salinity < 0.0 {
            return Err(SolverError::InvalidInput {
                parameter: "salinity",
                value: salinity,
            });
        }

        let totals = Totals::new(salinity, config);
        let constants_in = EquilibriumConstants::new(temp_in, salinity, config, &totals);

        if inputs.iter().any(|(_, value)| value.is_nan()) {
            return Ok(CarbonateSystem {
                alkalinity: f64::NAN,
                dic: f64::NAN,
                salinity,
                input: ConditionState::missing(temp_in),
                output: ConditionState::missing(temp_out),
                input_constants: constants_in,
                totals,
            });
        }

        let speciation_in = Speciation::new(&constants_in, &totals);
        let core_in = self.complete_pair(&speciation_in, par1, par2)?;
        let input = describe(&speciation_in, core_in)?;

        let constants_out = EquilibriumConstants::new(temp_out, salinity, config, &totals);
        let speciation_out = Speciation::new(&constants_out, &totals);
        let ph_out = speciation_out.ph_from_alkalinity_dic(core_in.alkalinity, core_in.dic)?;
        let core_out = CoreState {
            ph: ph_out,
            fco2: speciation_out.fco2_from_dic_ph(core_in.dic, ph_out),
            ..core_in
        };
        let output = describe(&speciation_out, core_out)?;

        Ok(CarbonateSystem {
            alkalinity: core_in.alkalinity * 1e6,
            dic: core_in.dic * 1e6,
            salinity,
            input,
            output,
            input_constants: constants_in,
            totals,
        })
    }

    /// Solve every row of a table. All series must have the same length;
    /// the result is aligned with them row by row.
    pub fn solve_table(
        &self,
        par1: &[f64],
        par2: &[f64],
        salinity: &[f64],
        temp_in: &[f64],
        temp_out: &[f64],
    ) -> SolverResultT<SolverResult> {
        let expected = par1.len();
        for (series, values) in [
            ("par2", par2),
            ("salinity", salinity),
            ("temp_in", temp_in),
            ("temp_out", temp_out),
        ] {
            if values.len() != expected {
                return Err(SolverError::LengthMismatch {
                    series,
                    expected,
                    found: values.len(),
                });
            }
        }

        let rows = (0..expected)
            .map(|i| {
                self.solve(par1[i], par2[i], salinity[i], temp_in[i], temp_out[i])
                    .map_err(|e| SolverError::Row {
                        row: i,
                        source: Box::new(e),
                    })
            })
            .collect::<SolverResultT<Vec<_>>>()?;

        Ok(SolverResult::new(rows))
    }

    /// Fill in the two core quantities the input pair does not give.
    fn complete_pair(
        &self,
        speciation: &Speciation<'_>,
        par1: f64,
        par2: f64,
    ) -> SolverResultT<CoreState> {
        let fugacity = speciation.constants().fugacity_factor;
        let mut known = KnownValues::default();
        for (kind, value) in [(self.config.par1_type, par1), (self.config.par2_type, par2)] {
            match kind {
                ParameterType::Alkalinity => known.alkalinity = Some(value * 1e-6),
                ParameterType::Dic => known.dic = Some(value * 1e-6),
                ParameterType::Ph => known.ph = Some(value),
                ParameterType::PCo2 => known.fco2 = Some(value * 1e-6 * fugacity),
                ParameterType::FCo2 => known.fco2 = Some(value * 1e-6),
            }
        }

        let state = match (known.alkalinity, known.dic, known.ph, known.fco2) {
            (Some(alkalinity), Some(dic), None, None) => {
                let ph = speciation.ph_from_alkalinity_dic(alkalinity, dic)?;
                let fco2 = speciation.fco2_from_dic_ph(dic, ph);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            (Some(alkalinity), None, Some(ph), None) => {
                let dic = speciation.dic_from_alkalinity_ph(alkalinity, ph);
                let fco2 = speciation.fco2_from_dic_ph(dic, ph);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            (Some(alkalinity), None, None, Some(fco2)) => {
                let ph = speciation.ph_from_alkalinity_fco2(alkalinity, fco2)?;
                let dic = speciation.dic_from_ph_fco2(ph, fco2);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            (None, Some(dic), Some(ph), None) => {
                let alkalinity = speciation.alkalinity_from_dic_ph(dic, ph);
                let fco2 = speciation.fco2_from_dic_ph(dic, ph);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            (None, Some(dic), None, Some(fco2)) => {
                let ph = speciation.ph_from_dic_fco2(dic, fco2)?;
                let alkalinity = speciation.alkalinity_from_dic_ph(dic, ph);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            (None, None, Some(ph), Some(fco2)) => {
                let dic = speciation.dic_from_ph_fco2(ph, fco2);
                let alkalinity = speciation.alkalinity_from_dic_ph(dic, ph);
                CoreState { alkalinity, dic, ph, fco2 }
            }
            _ => {
                return Err(SolverError::InvalidPair {
                    first: self.config.par1_type,
                    second: self.config.par2_type,
                })
            }
        };
        Ok(state)
    }
}

/// Speciate a completed core state at the conditions of `speciation`.
fn describe(speciation: &Speciation<'_>, core: CoreState) -> SolverResultT<ConditionState> {
    let k = speciation.constants();
    let totals = speciation.totals();
    let h = 10f64.powf(-core.ph);
    let denominator = h * h + k.k1 * h + k.k1 * k.k2;
    let hco3 = core.dic * k.k1 * h / denominator;
    let co3 = core.dic * k.k1 * k.k2 / denominator;
    let co2 = core.dic * h * h / denominator;
    let components = speciation.components(h);
    let pco2 = core.fco2 / k.fugacity_factor;
    let revelle = speciation.revelle_factor(core.alkalinity, core.dic)?;

    Ok(ConditionState {
        temperature: k.temperature,
        ph: core.ph,
        ph_scales: k.ph_scales(core.ph),
        pco2: pco2 * 1e6,
        fco2: core.fco2 * 1e6,
        xco2: pco2 / (1.0 - k.vapour_pressure) * 1e6,
        hco3: hco3 * 1e6,
        co3: co3 * 1e6,
        co2: co2 * 1e6,
        alk_borate: components.borate * 1e6,
        hydroxide: components.hydroxide * 1e6,
        alk_phosphate: components.phosphate * 1e6,
        alk_silicate: components.silicate * 1e6,
        h_free: components.h_free * 1e6,
        revelle,
        omega_calcite: co3 * totals.calcium / k.k_calcite,
        omega_aragonite: co3 * totals.calcium / k.k_aragonite,
    })
}
