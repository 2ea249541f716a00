//! Seawater totals and equilibrium constants.
//!
//! All acid-base constants are first evaluated on the seawater (SWS) scale and
//! then expressed on the configured pH scale. KS and KF stay on the free
//! scale. Concentrations are mol/kg-SW throughout this module.
//!
//! Surface conditions only: no pressure corrections are applied.

use serde::Serialize;

use super::config::{BisulfateConstant, BorateRatio, K1K2Constants, PhScale, SolverConfig};

/// Gas constant, ml bar⁻¹ K⁻¹ mol⁻¹.
pub const GAS_CONSTANT: f64 = 83.1451;

/// 0 °C in kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// One standard atmosphere in bar.
const ATMOSPHERE_BAR: f64 = 1.01325;

/// Conversion from mol/kg-H2O to mol/kg-SW.
fn h2o_to_sw(salinity: f64) -> f64 {
    1.0 - 0.001005 * salinity
}

/// Ionic strength (DOE handbook approximation).
pub fn ionic_strength(salinity: f64) -> f64 {
    19.924 * salinity / (1000.0 - 1.005 * salinity)
}

/// Conservative totals derived from salinity, plus nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub borate: f64,
    pub fluoride: f64,
    pub sulfate: f64,
    pub calcium: f64,
    pub silicate: f64,
    pub phosphate: f64,
}

impl Totals {
    pub fn new(salinity: f64, config: &SolverConfig) -> Self {
        let chlorinity = salinity / 1.80655;
        let borate = match config.kso4.borate() {
            BorateRatio::Uppstrom1974 => 0.0004157 * salinity / 35.0,
            BorateRatio::Lee2010 => 0.0004326 * salinity / 35.0,
        };
        Self {
            borate,
            // Riley 1965
            fluoride: (0.000067 / 18.998) * chlorinity,
            // Morris & Riley 1966
            sulfate: (0.14 / 96.062) * chlorinity,
            // Riley & Tongudai 1967
            calcium: (0.02128 / 40.087) * chlorinity,
            silicate: config.silicate * 1e-6,
            phosphate: config.phosphate * 1e-6,
        }
    }
}

/// Solubility of CO2, mol/kg-SW/atm (Weiss 1974).
pub fn k0_weiss1974(temp_k: f64, salinity: f64) -> f64 {
    let t100 = temp_k / 100.0;
    (-60.2409
        + 93.4517 / t100
        + 23.3585 * t100.ln()
        + salinity * (0.023517 - 0.023656 * t100 + 0.0047036 * t100 * t100))
        .exp()
}

/// Bisulfate dissociation, free scale, mol/kg-SW.
pub fn ks(formulation: BisulfateConstant, temp_k: f64, salinity: f64) -> f64 {
    let ionic = ionic_strength(salinity);
    let sqrt_i = ionic.sqrt();
    match formulation {
        BisulfateConstant::Dickson1990 => {
            let ln_t = temp_k.ln();
            let ln_ks = -4276.1 / temp_k + 141.328 - 23.093 * ln_t
                + (-13856.0 / temp_k + 324.57 - 47.986 * ln_t) * sqrt_i
                + (35474.0 / temp_k - 771.54 + 114.723 * ln_t) * ionic
                - 2698.0 / temp_k * sqrt_i * ionic
                + 1776.0 / temp_k * ionic * ionic;
            ln_ks.exp() * h2o_to_sw(salinity)
        }
        BisulfateConstant::Khoo1977 => {
            let pks = 647.59 / temp_k - 6.3451 + 0.019085 * temp_k - 0.5208 * sqrt_i;
            10f64.powf(-pks) * h2o_to_sw(salinity)
        }
    }
}

/// Hydrogen fluoride dissociation, free scale, mol/kg-SW (Dickson & Riley 1979).
pub fn kf_dickson_riley1979(temp_k: f64, salinity: f64) -> f64 {
    let ionic = ionic_strength(salinity);
    (1590.2 / temp_k - 12.641 + 1.525 * ionic.sqrt()).exp() * h2o_to_sw(salinity)
}

/// Boric acid dissociation, Total scale (Dickson 1990b).
pub fn kb_dickson1990(temp_k: f64, salinity: f64) -> f64 {
    let sqrt_s = salinity.sqrt();
    let top = -8966.9 - 2890.53 * sqrt_s - 77.942 * salinity + 1.728 * sqrt_s * salinity
        - 0.0996 * salinity * salinity;
    (top / temp_k
        + 148.0248
        + 137.1942 * sqrt_s
        + 1.62142 * salinity
        + (-24.4344 - 25.085 * sqrt_s - 0.2474 * salinity) * temp_k.ln()
        + 0.053105 * sqrt_s * temp_k)
        .exp()
}

/// Water dissociation, SWS (Millero 1995).
pub fn kw_millero1995(temp_k: f64, salinity: f64) -> f64 {
    let ln_t = temp_k.ln();
    (148.9802 - 13847.26 / temp_k - 23.6521 * ln_t
        + (-5.977 + 118.67 / temp_k + 1.0495 * ln_t) * salinity.sqrt()
        - 0.01615 * salinity)
        .exp()
}

/// Phosphoric acid dissociations, SWS (Yao & Millero 1995).
pub fn kp_yao_millero1995(temp_k: f64, salinity: f64) -> (f64, f64, f64) {
    let ln_t = temp_k.ln();
    let sqrt_s = salinity.sqrt();
    let kp1 = (-4576.752 / temp_k + 115.54 - 18.453 * ln_t
        + (-106.736 / temp_k + 0.69171) * sqrt_s
        + (-0.65643 / temp_k - 0.01844) * salinity)
        .exp();
    let kp2 = (-8814.715 / temp_k + 172.1033 - 27.927 * ln_t
        + (-160.34 / temp_k + 1.3566) * sqrt_s
        + (0.37335 / temp_k - 0.05778) * salinity)
        .exp();
    let kp3 = (-3070.75 / temp_k - 18.126
        + (17.27039 / temp_k + 2.81197) * sqrt_s
        + (-44.99486 / temp_k - 0.09984) * salinity)
        .exp();
    (kp1, kp2, kp3)
}

/// Silicic acid dissociation, SWS (Yao & Millero 1995).
pub fn ksi_yao_millero1995(temp_k: f64, salinity: f64) -> f64 {
    let ionic = ionic_strength(salinity);
    (-8904.2 / temp_k + 117.4 - 19.334 * temp_k.ln()
        + (-458.79 / temp_k + 3.5913) * ionic.sqrt()
        + (188.74 / temp_k - 1.5998) * ionic
        + (-12.1652 / temp_k + 0.07871) * ionic * ionic)
        .exp()
        * h2o_to_sw(salinity)
}

/// Carbonic acid K1 and K2 on the SWS scale.
pub fn carbonic_sws(
    set: K1K2Constants,
    temp_k: f64,
    salinity: f64,
    sws_to_total: f64,
    fh: f64,
) -> (f64, f64) {
    let sqrt_s = salinity.sqrt();
    let ln_t = temp_k.ln();
    match set {
        K1K2Constants::Roy1993 => {
            let s15 = salinity * sqrt_s;
            let ln_k1 = 2.83655 - 2307.1266 / temp_k - 1.5529413 * ln_t
                + (-0.20760841 - 4.0484 / temp_k) * sqrt_s
                + 0.08468345 * salinity
                - 0.00654208 * s15;
            let ln_k2 = -9.226508 - 3351.6106 / temp_k - 0.2005743 * ln_t
                + (-0.106901773 - 23.9722 / temp_k) * sqrt_s
                + 0.1130822 * salinity
                - 0.00846934 * s15;
            let conv = h2o_to_sw(salinity) / sws_to_total;
            (ln_k1.exp() * conv, ln_k2.exp() * conv)
        }
        K1K2Constants::DicksonMillero1987 => {
            let pk1 = 3670.7 / temp_k - 62.008 + 9.7944 * ln_t - 0.0118 * salinity
                + 0.000116 * salinity * salinity;
            let pk2 = 1394.7 / temp_k + 4.777 - 0.0184 * salinity + 0.000118 * salinity * salinity;
            (10f64.powf(-pk1), 10f64.powf(-pk2))
        }
        K1K2Constants::CaiWang1998 => {
            // NBS scale; dividing by fH moves to SWS
            let f1 = 200.1 / temp_k + 0.3220;
            let pk1 = 3404.71 / temp_k + 0.032786 * temp_k - 14.8435 - 0.071692 * f1 * sqrt_s
                + 0.0021487 * salinity;
            let f2 = -129.24 / temp_k + 1.4381;
            let pk2 = 2902.39 / temp_k + 0.02379 * temp_k - 6.4980 - 0.3191 * f2 * sqrt_s
                + 0.0198 * salinity;
            (10f64.powf(-pk1) / fh, 10f64.powf(-pk2) / fh)
        }
        K1K2Constants::Lueker2000 => {
            let pk1 = 3633.86 / temp_k - 61.2172 + 9.6777 * ln_t - 0.011555 * salinity
                + 0.0001152 * salinity * salinity;
            let pk2 = 471.78 / temp_k + 25.929 - 3.16967 * ln_t - 0.01781 * salinity
                + 0.0001122 * salinity * salinity;
            (
                10f64.powf(-pk1) / sws_to_total,
                10f64.powf(-pk2) / sws_to_total,
            )
        }
    }
}

/// Activity coefficient of H+ for NBS conversions (Takahashi et al. 1982).
pub fn fh_takahashi1982(temp_k: f64, salinity: f64) -> f64 {
    1.2948 - 0.002036 * temp_k + (0.0004607 - 0.000001475 * temp_k) * salinity * salinity
}

/// Fugacity/partial pressure ratio at one atmosphere (Weiss 1974).
pub fn fugacity_factor(temp_k: f64) -> f64 {
    let delta = 57.7 - 0.118 * temp_k;
    let b = -1636.75 + 12.0408 * temp_k - 0.0327957 * temp_k.powi(2)
        + 3.16528e-5 * temp_k.powi(3);
    ((b + 2.0 * delta) * ATMOSPHERE_BAR / (GAS_CONSTANT * temp_k)).exp()
}

/// Water vapour pressure over seawater, atm (Weiss & Price 1980).
pub fn vapour_pressure(temp_k: f64, salinity: f64) -> f64 {
    let pure_water =
        (24.4543 - 67.4509 * (100.0 / temp_k) - 4.8489 * (temp_k / 100.0).ln()).exp();
    pure_water * (-0.000544 * salinity).exp()
}

/// Calcite and aragonite stoichiometric solubility products (Mucci 1983).
pub fn solubility_mucci1983(temp_k: f64, salinity: f64) -> (f64, f64) {
    let sqrt_s = salinity.sqrt();
    let log_t = temp_k.log10();
    let log_calcite = -171.9065 - 0.077993 * temp_k + 2839.319 / temp_k + 71.595 * log_t
        + (-0.77712 + 0.0028426 * temp_k + 178.34 / temp_k) * sqrt_s
        - 0.07711 * salinity
        + 0.0041249 * sqrt_s * salinity;
    let log_aragonite = -171.945 - 0.077993 * temp_k + 2903.293 / temp_k + 71.595 * log_t
        + (-0.068393 + 0.0017276 * temp_k + 88.135 / temp_k) * sqrt_s
        - 0.10018 * salinity
        + 0.0059415 * sqrt_s * salinity;
    (10f64.powf(log_calcite), 10f64.powf(log_aragonite))
}

/// Every constant needed to speciate one sample at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquilibriumConstants {
    pub ph_scale: PhScale,
    pub temperature: f64,
    pub salinity: f64,
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
    pub kb: f64,
    pub kw: f64,
    pub ks: f64,
    pub kf: f64,
    pub kp1: f64,
    pub kp2: f64,
    pub kp3: f64,
    pub ksi: f64,
    pub k_calcite: f64,
    pub k_aragonite: f64,
    pub fh: f64,
    pub sws_to_total: f64,
    pub free_to_total: f64,
    pub fugacity_factor: f64,
    pub vapour_pressure: f64,
}

impl EquilibriumConstants {
    /// Evaluate all constants at `temperature` (°C).
    pub fn new(temperature: f64, salinity: f64, config: &SolverConfig, totals: &Totals) -> Self {
        let temp_k = temperature + KELVIN_OFFSET;

        let ks = ks(config.kso4.bisulfate(), temp_k, salinity);
        let kf = kf_dickson_riley1979(temp_k, salinity);
        let free_to_total = 1.0 + totals.sulfate / ks;
        let sws_to_total = free_to_total / (free_to_total + totals.fluoride / kf);
        let fh = fh_takahashi1982(temp_k, salinity);

        let (k1, k2) = carbonic_sws(config.k1k2, temp_k, salinity, sws_to_total, fh);
        let kb = kb_dickson1990(temp_k, salinity) / sws_to_total;
        let kw = kw_millero1995(temp_k, salinity);
        let (kp1, kp2, kp3) = kp_yao_millero1995(temp_k, salinity);
        let ksi = ksi_yao_millero1995(temp_k, salinity);
        let (k_calcite, k_aragonite) = solubility_mucci1983(temp_k, salinity);

        let factor = match config.ph_scale {
            PhScale::Total => sws_to_total,
            PhScale::Seawater => 1.0,
            PhScale::Free => sws_to_total / free_to_total,
            PhScale::Nbs => fh,
        };

        Self {
            ph_scale: config.ph_scale,
            temperature,
            salinity,
            k0: k0_weiss1974(temp_k, salinity),
            k1: k1 * factor,
            k2: k2 * factor,
            kb: kb * factor,
            kw: kw * factor,
            ks,
            kf,
            kp1: kp1 * factor,
            kp2: kp2 * factor,
            kp3: kp3 * factor,
            ksi: ksi * factor,
            k_calcite,
            k_aragonite,
            fh,
            sws_to_total,
            free_to_total,
            fugacity_factor: fugacity_factor(temp_k),
            vapour_pressure: vapour_pressure(temp_k, salinity),
        }
    }

    /// Multiplier taking [H+] on the configured scale to free [H+].
    pub fn free_fraction(&self) -> f64 {
        match self.ph_scale {
            PhScale::Total => 1.0 / self.free_to_total,
            PhScale::Seawater => self.sws_to_total / self.free_to_total,
            PhScale::Free => 1.0,
            PhScale::Nbs => self.sws_to_total / (self.free_to_total * self.fh),
        }
    }

    /// Express a pH on the configured scale on all four scales.
    pub fn ph_scales(&self, ph: f64) -> PhScales {
        let log_s2t = self.sws_to_total.log10();
        let log_free_to_sws = (self.free_to_total / self.sws_to_total).log10();
        let log_fh = self.fh.log10();
        let sws = match self.ph_scale {
            PhScale::Total => ph + log_s2t,
            PhScale::Seawater => ph,
            PhScale::Free => ph - log_free_to_sws,
            PhScale::Nbs => ph + log_fh,
        };
        PhScales {
            total: sws - log_s2t,
            sws,
            free: sws + log_free_to_sws,
            nbs: sws - log_fh,
        }
    }
}

/// One pH value on every scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhScales {
    pub total: f64,
    pub sws: f64,
    pub free: f64,
    pub nbs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const T25: f64 = 298.15;

    #[test]
    fn test_k0_check_value() {
        assert_abs_diff_eq!(k0_weiss1974(T25, 35.0).ln(), -3.5617, epsilon = 1e-4);
    }

    #[test]
    fn test_kb_check_value() {
        assert_abs_diff_eq!(kb_dickson1990(T25, 35.0).ln(), -19.7964, epsilon = 1e-4);
    }

    #[test]
    fn test_ks_check_value() {
        let ln_ks = ks(BisulfateConstant::Dickson1990, T25, 35.0).ln();
        assert_abs_diff_eq!(ln_ks, -2.30, epsilon = 0.005);
    }

    #[test]
    fn test_lueker_check_values() {
        // On the Total scale: undo the SWS conversion.
        let (k1, k2) = carbonic_sws(K1K2Constants::Lueker2000, T25, 35.0, 0.9, 1.0);
        assert_abs_diff_eq!(-(k1 * 0.9).log10(), 5.8472, epsilon = 1e-4);
        assert_abs_diff_eq!(-(k2 * 0.9).log10(), 8.9660, epsilon = 1e-4);
    }

    #[test]
    fn test_roy_check_values() {
        let (k1, k2) = carbonic_sws(K1K2Constants::Roy1993, T25, 35.0, 1.0, 1.0);
        assert_abs_diff_eq!(k1.ln(), -13.4847, epsilon = 1e-3);
        assert_abs_diff_eq!(k2.ln(), -20.5504, epsilon = 1e-3);
    }

    #[test]
    fn test_mucci_check_values() {
        let (calcite, aragonite) = solubility_mucci1983(T25, 35.0);
        assert_abs_diff_eq!(calcite.log10(), -6.3693, epsilon = 1e-4);
        assert_abs_diff_eq!(aragonite.log10(), -6.1883, epsilon = 1e-4);
    }

    #[test]
    fn test_cai_wang_close_to_mehrbach() {
        let fh = fh_takahashi1982(T25, 35.0);
        let (cw1, _) = carbonic_sws(K1K2Constants::CaiWang1998, T25, 35.0, 1.0, fh);
        let (dm1, _) = carbonic_sws(K1K2Constants::DicksonMillero1987, T25, 35.0, 1.0, fh);
        assert_abs_diff_eq!(-cw1.log10(), -dm1.log10(), epsilon = 0.05);
    }

    #[test]
    fn test_cai_wang_check_values() {
        // NBS pK1, pK2 at S = 35, 25 °C
        let (k1, k2) = carbonic_sws(K1K2Constants::CaiWang1998, T25, 35.0, 1.0, 1.0);
        assert_abs_diff_eq!(-k1.log10(), 6.0051, epsilon = 1e-4);
        assert_abs_diff_eq!(-k2.log10(), 9.1261, epsilon = 1e-4);

        let fh = fh_takahashi1982(T25, 35.0);
        let (k1_sws, _) = carbonic_sws(K1K2Constants::CaiWang1998, T25, 35.0, 1.0, fh);
        assert_relative_eq!(k1_sws, k1 / fh, max_relative = 1e-12);
    }

    #[test]
    fn test_scale_factors_ordering() {
        let config = SolverConfig::default();
        let totals = Totals::new(35.0, &config);
        let constants = EquilibriumConstants::new(25.0, 35.0, &config, &totals);
        // [H]free < [H]total < [H]sws
        assert!(constants.free_to_total > 1.0);
        assert!(constants.sws_to_total < 1.0);
        assert!(constants.fh > 0.5 && constants.fh < 1.0);
    }

    #[test]
    fn test_ph_scales_identity_on_own_scale() {
        for scale in [PhScale::Total, PhScale::Seawater, PhScale::Free, PhScale::Nbs] {
            let config = SolverConfig::default().with_ph_scale(scale);
            let totals = Totals::new(32.0, &config);
            let constants = EquilibriumConstants::new(15.0, 32.0, &config, &totals);
            let scales = constants.ph_scales(8.0);
            let own = match scale {
                PhScale::Total => scales.total,
                PhScale::Seawater => scales.sws,
                PhScale::Free => scales.free,
                PhScale::Nbs => scales.nbs,
            };
            assert_abs_diff_eq!(own, 8.0, epsilon = 1e-12);
            assert!(scales.free > scales.total);
            assert!(scales.total > scales.sws);
        }
    }

    #[test]
    fn test_free_fraction_consistent_with_scales() {
        let config = SolverConfig::default();
        let totals = Totals::new(32.0, &config);
        let constants = EquilibriumConstants::new(15.0, 32.0, &config, &totals);
        let ph = 7.9;
        let h_free = 10f64.powf(-ph) * constants.free_fraction();
        assert_relative_eq!(
            -h_free.log10(),
            constants.ph_scales(ph).free,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_totals_scale_with_salinity() {
        let config = SolverConfig::default();
        let totals = Totals::new(35.0, &config);
        assert_relative_eq!(totals.borate, 0.0004157, max_relative = 1e-12);
        assert_relative_eq!(totals.calcium, 0.0102846, max_relative = 1e-5);
        let fresh = Totals::new(0.0, &config);
        assert_eq!(fresh.borate, 0.0);
        assert_eq!(fresh.calcium, 0.0);
    }
}
