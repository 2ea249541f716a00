//! Alkalinity balance and two-parameter solving.
//!
//! Concentrations are mol/kg-SW and fugacities atm. [H+] is always on the
//! scale the constants were evaluated on.

use std::f64::consts::LN_10;

use super::constants::{EquilibriumConstants, Totals};
use crate::error::{SolverError, SolverResultT};

/// Convergence threshold on pH for the Newton iterations.
pub const PH_TOLERANCE: f64 = 1e-10;

/// Upper bound on Newton iterations before giving up.
pub const MAX_ITERATIONS: usize = 100;

/// Starting point of every pH iteration.
const PH_GUESS: f64 = 8.0;

/// Non-carbonate contributions to total alkalinity at one [H+].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlkalinityComponents {
    pub borate: f64,
    pub hydroxide: f64,
    pub phosphate: f64,
    pub silicate: f64,
    pub h_free: f64,
    pub bisulfate: f64,
    pub fluoride: f64,
}

impl AlkalinityComponents {
    /// Everything except carbonate alkalinity.
    pub fn net(&self) -> f64 {
        self.borate + self.hydroxide + self.phosphate + self.silicate
            - self.h_free
            - self.bisulfate
            - self.fluoride
    }
}

/// Speciation of one sample at one set of conditions.
#[derive(Debug, Clone, Copy)]
pub struct Speciation<'a> {
    constants: &'a EquilibriumConstants,
    totals: &'a Totals,
}

impl<'a> Speciation<'a> {
    pub fn new(constants: &'a EquilibriumConstants, totals: &'a Totals) -> Self {
        Self { constants, totals }
    }

    pub fn constants(&self) -> &EquilibriumConstants {
        self.constants
    }

    pub fn totals(&self) -> &Totals {
        self.totals
    }

    pub fn components(&self, h: f64) -> AlkalinityComponents {
        let k = self.constants;
        let t = self.totals;

        let phos_top = k.kp1 * k.kp2 * h + 2.0 * k.kp1 * k.kp2 * k.kp3 - h.powi(3);
        let phos_bot =
            h.powi(3) + k.kp1 * h * h + k.kp1 * k.kp2 * h + k.kp1 * k.kp2 * k.kp3;
        let h_free = h * k.free_fraction();

        AlkalinityComponents {
            borate: t.borate * k.kb / (k.kb + h),
            hydroxide: k.kw / h,
            phosphate: t.phosphate * phos_top / phos_bot,
            silicate: t.silicate * k.ksi / (k.ksi + h),
            h_free,
            bisulfate: t.sulfate / (1.0 + k.ks / h_free),
            fluoride: t.fluoride / (1.0 + k.kf / h_free),
        }
    }

    fn carbonate_denominator(&self, h: f64) -> f64 {
        let k = self.constants;
        h * h + k.k1 * h + k.k1 * k.k2
    }

    /// HCO3- + 2 CO3-- per unit DIC.
    fn carbonate_alkalinity_fraction(&self, h: f64) -> f64 {
        let k = self.constants;
        k.k1 * (h + 2.0 * k.k2) / self.carbonate_denominator(h)
    }

    /// Total alkalinity from DIC and pH.
    pub fn alkalinity_from_dic_ph(&self, dic: f64, ph: f64) -> f64 {
        let h = 10f64.powf(-ph);
        dic * self.carbonate_alkalinity_fraction(h) + self.components(h).net()
    }

    /// DIC from total alkalinity and pH.
    pub fn dic_from_alkalinity_ph(&self, alkalinity: f64, ph: f64) -> f64 {
        let h = 10f64.powf(-ph);
        (alkalinity - self.components(h).net()) / self.carbonate_alkalinity_fraction(h)
    }

    /// DIC from pH and fCO2.
    pub fn dic_from_ph_fco2(&self, ph: f64, fco2: f64) -> f64 {
        let k = self.constants;
        let h = 10f64.powf(-ph);
        k.k0 * fco2 * self.carbonate_denominator(h) / (h * h)
    }

    /// fCO2 from DIC and pH.
    pub fn fco2_from_dic_ph(&self, dic: f64, ph: f64) -> f64 {
        let k = self.constants;
        let h = 10f64.powf(-ph);
        dic * h * h / self.carbonate_denominator(h) / k.k0
    }

    /// pH from DIC and fCO2; closed form.
    pub fn ph_from_dic_fco2(&self, dic: f64, fco2: f64) -> SolverResultT<f64> {
        let k = self.constants;
        let ratio = k.k0 * fco2 / dic;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(SolverError::Unphysical(format!(
                "dissolved CO2 ({:.3} µmol/kg) must be positive and below DIC ({:.3} µmol/kg)",
                k.k0 * fco2 * 1e6,
                dic * 1e6
            )));
        }
        let discriminant =
            (k.k1 * ratio).powi(2) + 4.0 * (1.0 - ratio) * (k.k1 * k.k2 * ratio);
        let h = 0.5 * (k.k1 * ratio + discriminant.sqrt()) / (1.0 - ratio);
        Ok(-h.log10())
    }

    /// pH from total alkalinity and DIC.
    pub fn ph_from_alkalinity_dic(&self, alkalinity: f64, dic: f64) -> SolverResultT<f64> {
        let k = self.constants;
        self.iterate_ph(|h| {
            let denominator = self.carbonate_denominator(h);
            let components = self.components(h);
            let carbonate = dic * self.carbonate_alkalinity_fraction(h);
            let residual = alkalinity - carbonate - components.net();
            let slope = LN_10
                * (dic * k.k1 * h * (h * h + k.k1 * k.k2 + 4.0 * h * k.k2)
                    / (denominator * denominator)
                    + components.borate * h / (k.kb + h)
                    + components.hydroxide
                    + h);
            (residual, slope)
        })
    }

    /// pH from total alkalinity and fCO2.
    pub fn ph_from_alkalinity_fco2(&self, alkalinity: f64, fco2: f64) -> SolverResultT<f64> {
        let k = self.constants;
        self.iterate_ph(|h| {
            let bicarbonate = k.k0 * k.k1 * fco2 / h;
            let carbonate = k.k0 * k.k1 * k.k2 * fco2 / (h * h);
            let components = self.components(h);
            let residual = alkalinity - bicarbonate - 2.0 * carbonate - components.net();
            let slope = LN_10
                * (bicarbonate
                    + 4.0 * carbonate
                    + components.borate * h / (k.kb + h)
                    + components.hydroxide
                    + h);
            (residual, slope)
        })
    }

    /// Newton iteration on pH. `step` returns the alkalinity residual and
    /// its derivative with respect to pH at a given [H+].
    fn iterate_ph<F>(&self, step: F) -> SolverResultT<f64>
    where
        F: Fn(f64) -> (f64, f64),
    {
        let mut ph = PH_GUESS;
        for _ in 0..MAX_ITERATIONS {
            let (residual, slope) = step(10f64.powf(-ph));
            let mut delta = residual / slope;
            if !delta.is_finite() {
                break;
            }
            while delta.abs() > 1.0 {
                delta /= 2.0;
            }
            ph += delta;
            if delta.abs() < PH_TOLERANCE {
                return Ok(ph);
            }
        }
        Err(SolverError::NoConvergence {
            iterations: MAX_ITERATIONS,
            ph,
        })
    }

    /// Revelle factor by central difference of ±1 µmol/kg on DIC at
    /// constant alkalinity.
    pub fn revelle_factor(&self, alkalinity: f64, dic: f64) -> SolverResultT<f64> {
        let delta_dic = 1e-6;
        let ph = self.ph_from_alkalinity_dic(alkalinity, dic)?;
        let fco2 = self.fco2_from_dic_ph(dic, ph);

        let dic_plus = dic + delta_dic;
        let ph_plus = self.ph_from_alkalinity_dic(alkalinity, dic_plus)?;
        let fco2_plus = self.fco2_from_dic_ph(dic_plus, ph_plus);

        let dic_minus = dic - delta_dic;
        let ph_minus = self.ph_from_alkalinity_dic(alkalinity, dic_minus)?;
        let fco2_minus = self.fco2_from_dic_ph(dic_minus, ph_minus);

        Ok((fco2_plus - fco2_minus) / fco2 / (2.0 * delta_dic / dic))
    }
}
