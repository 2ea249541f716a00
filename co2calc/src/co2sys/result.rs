//! Solver output: per-row carbonate systems and the named-series view over
//! them.
//!
//! Names follow the CO2SYS output dictionary (`TAlk`, `OmegaARin`,
//! `pHinTOTAL`, ...). Amounts are µmol/kg-SW, pressures and fugacities µatm.

use std::collections::BTreeMap;

use serde::Serialize;

use super::constants::{EquilibriumConstants, PhScales, Totals};

/// State of the sample at one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionState {
    /// °C
    pub temperature: f64,
    /// pH on the configured scale.
    pub ph: f64,
    pub ph_scales: PhScales,
    pub pco2: f64,
    pub fco2: f64,
    pub xco2: f64,
    pub hco3: f64,
    pub co3: f64,
    pub co2: f64,
    pub alk_borate: f64,
    pub hydroxide: f64,
    pub alk_phosphate: f64,
    pub alk_silicate: f64,
    pub h_free: f64,
    pub revelle: f64,
    pub omega_calcite: f64,
    pub omega_aragonite: f64,
}

impl ConditionState {
    /// State of a row whose inputs are missing.
    pub fn missing(temperature: f64) -> Self {
        let nan = f64::NAN;
        Self {
            temperature,
            ph: nan,
            ph_scales: PhScales {
                total: nan,
                sws: nan,
                free: nan,
                nbs: nan,
            },
            pco2: nan,
            fco2: nan,
            xco2: nan,
            hco3: nan,
            co3: nan,
            co2: nan,
            alk_borate: nan,
            hydroxide: nan,
            alk_phosphate: nan,
            alk_silicate: nan,
            h_free: nan,
            revelle: nan,
            omega_calcite: nan,
            omega_aragonite: nan,
        }
    }
}

/// The solved carbonate system of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarbonateSystem {
    pub alkalinity: f64,
    pub dic: f64,
    pub salinity: f64,
    pub input: ConditionState,
    pub output: ConditionState,
    pub input_constants: EquilibriumConstants,
    pub totals: Totals,
}

impl CarbonateSystem {
    pub fn get(&self, parameter: Parameter) -> f64 {
        use Parameter::*;
        let (i, o, k) = (&self.input, &self.output, &self.input_constants);
        match parameter {
            Alkalinity => self.alkalinity,
            Dic => self.dic,
            PhIn => i.ph,
            PCo2In => i.pco2,
            FCo2In => i.fco2,
            Hco3In => i.hco3,
            Co3In => i.co3,
            Co2In => i.co2,
            BAlkIn => i.alk_borate,
            OhIn => i.hydroxide,
            PAlkIn => i.alk_phosphate,
            SiAlkIn => i.alk_silicate,
            HFreeIn => i.h_free,
            RevelleIn => i.revelle,
            OmegaCalciteIn => i.omega_calcite,
            OmegaAragoniteIn => i.omega_aragonite,
            XCo2In => i.xco2,
            PhOut => o.ph,
            PCo2Out => o.pco2,
            FCo2Out => o.fco2,
            Hco3Out => o.hco3,
            Co3Out => o.co3,
            Co2Out => o.co2,
            BAlkOut => o.alk_borate,
            OhOut => o.hydroxide,
            PAlkOut => o.alk_phosphate,
            SiAlkOut => o.alk_silicate,
            HFreeOut => o.h_free,
            RevelleOut => o.revelle,
            OmegaCalciteOut => o.omega_calcite,
            OmegaAragoniteOut => o.omega_aragonite,
            XCo2Out => o.xco2,
            PhInTotal => i.ph_scales.total,
            PhInSws => i.ph_scales.sws,
            PhInFree => i.ph_scales.free,
            PhInNbs => i.ph_scales.nbs,
            PhOutTotal => o.ph_scales.total,
            PhOutSws => o.ph_scales.sws,
            PhOutFree => o.ph_scales.free,
            PhOutNbs => o.ph_scales.nbs,
            TemperatureIn => i.temperature,
            TemperatureOut => o.temperature,
            Salinity => self.salinity,
            K0Input => k.k0,
            K1Input => k.k1,
            K2Input => k.k2,
            KbInput => k.kb,
            KwInput => k.kw,
            KsInput => k.ks,
            KfInput => k.kf,
            TotalBorate => self.totals.borate * 1e6,
            TotalFluoride => self.totals.fluoride * 1e6,
            TotalSulfate => self.totals.sulfate * 1e6,
        }
    }
}

/// One named series of the solver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Parameter {
    Alkalinity,
    Dic,
    PhIn,
    PCo2In,
    FCo2In,
    Hco3In,
    Co3In,
    Co2In,
    BAlkIn,
    OhIn,
    PAlkIn,
    SiAlkIn,
    HFreeIn,
    RevelleIn,
    OmegaCalciteIn,
    OmegaAragoniteIn,
    XCo2In,
    PhOut,
    PCo2Out,
    FCo2Out,
    Hco3Out,
    Co3Out,
    Co2Out,
    BAlkOut,
    OhOut,
    PAlkOut,
    SiAlkOut,
    HFreeOut,
    RevelleOut,
    OmegaCalciteOut,
    OmegaAragoniteOut,
    XCo2Out,
    PhInTotal,
    PhInSws,
    PhInFree,
    PhInNbs,
    PhOutTotal,
    PhOutSws,
    PhOutFree,
    PhOutNbs,
    TemperatureIn,
    TemperatureOut,
    Salinity,
    K0Input,
    K1Input,
    K2Input,
    KbInput,
    KwInput,
    KsInput,
    KfInput,
    TotalBorate,
    TotalFluoride,
    TotalSulfate,
}

impl Parameter {
    /// Every parameter, in output-dictionary order.
    pub const ALL: [Parameter; 53] = [
        Parameter::Alkalinity,
        Parameter::Dic,
        Parameter::PhIn,
        Parameter::PCo2In,
        Parameter::FCo2In,
        Parameter::Hco3In,
        Parameter::Co3In,
        Parameter::Co2In,
        Parameter::BAlkIn,
        Parameter::OhIn,
        Parameter::PAlkIn,
        Parameter::SiAlkIn,
        Parameter::HFreeIn,
        Parameter::RevelleIn,
        Parameter::OmegaCalciteIn,
        Parameter::OmegaAragoniteIn,
        Parameter::XCo2In,
        Parameter::PhOut,
        Parameter::PCo2Out,
        Parameter::FCo2Out,
        Parameter::Hco3Out,
        Parameter::Co3Out,
        Parameter::Co2Out,
        Parameter::BAlkOut,
        Parameter::OhOut,
        Parameter::PAlkOut,
        Parameter::SiAlkOut,
        Parameter::HFreeOut,
        Parameter::RevelleOut,
        Parameter::OmegaCalciteOut,
        Parameter::OmegaAragoniteOut,
        Parameter::XCo2Out,
        Parameter::PhInTotal,
        Parameter::PhInSws,
        Parameter::PhInFree,
        Parameter::PhInNbs,
        Parameter::PhOutTotal,
        Parameter::PhOutSws,
        Parameter::PhOutFree,
        Parameter::PhOutNbs,
        Parameter::TemperatureIn,
        Parameter::TemperatureOut,
        Parameter::Salinity,
        Parameter::K0Input,
        Parameter::K1Input,
        Parameter::K2Input,
        Parameter::KbInput,
        Parameter::KwInput,
        Parameter::KsInput,
        Parameter::KfInput,
        Parameter::TotalBorate,
        Parameter::TotalFluoride,
        Parameter::TotalSulfate,
    ];

    /// CO2SYS dictionary key.
    pub fn name(self) -> &'static str {
        use Parameter::*;
        match self {
            Alkalinity => "TAlk",
            Dic => "TCO2",
            PhIn => "pHin",
            PCo2In => "pCO2in",
            FCo2In => "fCO2in",
            Hco3In => "HCO3in",
            Co3In => "CO3in",
            Co2In => "CO2in",
            BAlkIn => "BAlkin",
            OhIn => "OHin",
            PAlkIn => "PAlkin",
            SiAlkIn => "SiAlkin",
            HFreeIn => "Hfreein",
            RevelleIn => "RFin",
            OmegaCalciteIn => "OmegaCAin",
            OmegaAragoniteIn => "OmegaARin",
            XCo2In => "xCO2in",
            PhOut => "pHout",
            PCo2Out => "pCO2out",
            FCo2Out => "fCO2out",
            Hco3Out => "HCO3out",
            Co3Out => "CO3out",
            Co2Out => "CO2out",
            BAlkOut => "BAlkout",
            OhOut => "OHout",
            PAlkOut => "PAlkout",
            SiAlkOut => "SiAlkout",
            HFreeOut => "Hfreeout",
            RevelleOut => "RFout",
            OmegaCalciteOut => "OmegaCAout",
            OmegaAragoniteOut => "OmegaARout",
            XCo2Out => "xCO2out",
            PhInTotal => "pHinTOTAL",
            PhInSws => "pHinSWS",
            PhInFree => "pHinFREE",
            PhInNbs => "pHinNBS",
            PhOutTotal => "pHoutTOTAL",
            PhOutSws => "pHoutSWS",
            PhOutFree => "pHoutFREE",
            PhOutNbs => "pHoutNBS",
            TemperatureIn => "TEMPIN",
            TemperatureOut => "TEMPOUT",
            Salinity => "SAL",
            K0Input => "K0input",
            K1Input => "K1input",
            K2Input => "K2input",
            KbInput => "KBinput",
            KwInput => "KWinput",
            KsInput => "KSinput",
            KfInput => "KFinput",
            TotalBorate => "TB",
            TotalFluoride => "TF",
            TotalSulfate => "TS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn unit(self) -> &'static str {
        use Parameter::*;
        match self {
            Alkalinity | Dic | Hco3In | Co3In | Co2In | BAlkIn | OhIn | PAlkIn | SiAlkIn
            | HFreeIn | Hco3Out | Co3Out | Co2Out | BAlkOut | OhOut | PAlkOut | SiAlkOut
            | HFreeOut | TotalBorate | TotalFluoride | TotalSulfate => "µmol/kg-SW",
            PCo2In | FCo2In | PCo2Out | FCo2Out => "µatm",
            XCo2In | XCo2Out => "ppm",
            TemperatureIn | TemperatureOut => "°C",
            K0Input => "mol/kg-SW/atm",
            K1Input | K2Input | KbInput | KwInput | KsInput | KfInput => "mol/kg-SW",
            _ => "",
        }
    }
}

/// Row-aligned solver output for a whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverResult {
    rows: Vec<CarbonateSystem>,
}

impl SolverResult {
    pub fn new(rows: Vec<CarbonateSystem>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[CarbonateSystem] {
        &self.rows
    }

    /// One parameter across all rows, in row order.
    pub fn series(&self, parameter: Parameter) -> Vec<f64> {
        self.rows.iter().map(|row| row.get(parameter)).collect()
    }

    /// Lookup by CO2SYS dictionary key.
    pub fn series_by_name(&self, name: &str) -> Option<Vec<f64>> {
        Parameter::from_name(name).map(|p| self.series(p))
    }

    /// The whole result as a name → series mapping.
    pub fn to_columns(&self) -> BTreeMap<&'static str, Vec<f64>> {
        Parameter::ALL
            .iter()
            .map(|&p| (p.name(), self.series(p)))
            .collect()
    }
}
