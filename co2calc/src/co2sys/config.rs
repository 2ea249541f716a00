//! Solver selectors, keyed by the CO2SYS integer codes.
//!
//! The reference calculation is
//! `CO2SYS(pco2, ph, 4, 3, sal, temp, temp, 0, 0, 0, 0, 4, 9, 1)`, which is what
//! [`SolverConfig::default`] reproduces.

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResultT};

/// Kind of a measured input parameter (`PAR1TYPE` / `PAR2TYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Total alkalinity, µmol/kg-SW.
    Alkalinity,
    /// Dissolved inorganic carbon, µmol/kg-SW.
    Dic,
    /// pH on the configured scale.
    Ph,
    /// CO2 partial pressure, µatm.
    PCo2,
    /// CO2 fugacity, µatm.
    FCo2,
}

impl ParameterType {
    pub fn from_code(code: i32) -> SolverResultT<Self> {
        match code {
            1 => Ok(Self::Alkalinity),
            2 => Ok(Self::Dic),
            3 => Ok(Self::Ph),
            4 => Ok(Self::PCo2),
            5 => Ok(Self::FCo2),
            _ => Err(SolverError::UnsupportedOption {
                option: "parameter type",
                code,
            }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Alkalinity => 1,
            Self::Dic => 2,
            Self::Ph => 3,
            Self::PCo2 => 4,
            Self::FCo2 => 5,
        }
    }

    /// Name used in error messages and input validation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Alkalinity => "alkalinity",
            Self::Dic => "DIC",
            Self::Ph => "pH",
            Self::PCo2 => "pCO2",
            Self::FCo2 => "fCO2",
        }
    }

    /// pCO2 and fCO2 are the same quantity in different units.
    fn is_co2(self) -> bool {
        matches!(self, Self::PCo2 | Self::FCo2)
    }
}

/// pH scale of the input pH and of the returned acid-base constants
/// (`pHSCALEIN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhScale {
    Total,
    Seawater,
    Free,
    Nbs,
}

impl PhScale {
    pub fn from_code(code: i32) -> SolverResultT<Self> {
        match code {
            1 => Ok(Self::Total),
            2 => Ok(Self::Seawater),
            3 => Ok(Self::Free),
            4 => Ok(Self::Nbs),
            _ => Err(SolverError::UnsupportedOption {
                option: "pH scale",
                code,
            }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Total => 1,
            Self::Seawater => 2,
            Self::Free => 3,
            Self::Nbs => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Seawater => "SWS",
            Self::Free => "Free",
            Self::Nbs => "NBS",
        }
    }
}

/// Carbonic acid dissociation constants (`K1K2CONSTANTS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum K1K2Constants {
    /// Roy et al. 1993, Total scale.
    Roy1993,
    /// Mehrbach et al. 1973 refit by Dickson & Millero 1987, SWS.
    DicksonMillero1987,
    /// Cai & Wang 1998, NBS scale.
    CaiWang1998,
    /// Lueker et al. 2000, Total scale.
    Lueker2000,
}

impl K1K2Constants {
    pub fn from_code(code: i32) -> SolverResultT<Self> {
        match code {
            1 => Ok(Self::Roy1993),
            4 => Ok(Self::DicksonMillero1987),
            9 => Ok(Self::CaiWang1998),
            10 => Ok(Self::Lueker2000),
            _ => Err(SolverError::UnsupportedOption {
                option: "K1K2 constants",
                code,
            }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Roy1993 => 1,
            Self::DicksonMillero1987 => 4,
            Self::CaiWang1998 => 9,
            Self::Lueker2000 => 10,
        }
    }

    pub fn citation(self) -> &'static str {
        match self {
            Self::Roy1993 => "Roy et al. (1993)",
            Self::DicksonMillero1987 => "Mehrbach et al. (1973) refit by Dickson & Millero (1987)",
            Self::CaiWang1998 => "Cai & Wang (1998)",
            Self::Lueker2000 => "Lueker et al. (2000)",
        }
    }
}

/// Bisulfate dissociation constant formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BisulfateConstant {
    Dickson1990,
    Khoo1977,
}

/// Total borate to salinity ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorateRatio {
    Uppstrom1974,
    Lee2010,
}

/// Combined bisulfate / borate selector (`KSO4CONSTANTS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kso4Constants {
    Dickson1990Uppstrom1974,
    Khoo1977Uppstrom1974,
    Dickson1990Lee2010,
    Khoo1977Lee2010,
}

impl Kso4Constants {
    pub fn from_code(code: i32) -> SolverResultT<Self> {
        match code {
            1 => Ok(Self::Dickson1990Uppstrom1974),
            2 => Ok(Self::Khoo1977Uppstrom1974),
            3 => Ok(Self::Dickson1990Lee2010),
            4 => Ok(Self::Khoo1977Lee2010),
            _ => Err(SolverError::UnsupportedOption {
                option: "KSO4 constants",
                code,
            }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Dickson1990Uppstrom1974 => 1,
            Self::Khoo1977Uppstrom1974 => 2,
            Self::Dickson1990Lee2010 => 3,
            Self::Khoo1977Lee2010 => 4,
        }
    }

    pub fn bisulfate(self) -> BisulfateConstant {
        match self {
            Self::Dickson1990Uppstrom1974 | Self::Dickson1990Lee2010 => {
                BisulfateConstant::Dickson1990
            }
            Self::Khoo1977Uppstrom1974 | Self::Khoo1977Lee2010 => BisulfateConstant::Khoo1977,
        }
    }

    pub fn borate(self) -> BorateRatio {
        match self {
            Self::Dickson1990Uppstrom1974 | Self::Khoo1977Uppstrom1974 => {
                BorateRatio::Uppstrom1974
            }
            Self::Dickson1990Lee2010 | Self::Khoo1977Lee2010 => BorateRatio::Lee2010,
        }
    }
}

/// Full selector set for one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Kind of the first input series.
    pub par1_type: ParameterType,
    /// Kind of the second input series.
    pub par2_type: ParameterType,
    pub ph_scale: PhScale,
    pub k1k2: K1K2Constants,
    pub kso4: Kso4Constants,
    /// Total silicate, µmol/kg-SW.
    #[serde(default)]
    pub silicate: f64,
    /// Total phosphate, µmol/kg-SW.
    #[serde(default)]
    pub phosphate: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            par1_type: ParameterType::PCo2,
            par2_type: ParameterType::Ph,
            ph_scale: PhScale::Nbs,
            k1k2: K1K2Constants::CaiWang1998,
            kso4: Kso4Constants::Dickson1990Uppstrom1974,
            silicate: 0.0,
            phosphate: 0.0,
        }
    }
}

impl SolverConfig {
    /// Build a configuration from CO2SYS positional codes
    /// (`PAR1TYPE, PAR2TYPE, pHSCALEIN, K1K2CONSTANTS, KSO4CONSTANTS`).
    pub fn from_codes(
        par1_type: i32,
        par2_type: i32,
        ph_scale: i32,
        k1k2: i32,
        kso4: i32,
    ) -> SolverResultT<Self> {
        let config = Self {
            par1_type: ParameterType::from_code(par1_type)?,
            par2_type: ParameterType::from_code(par2_type)?,
            ph_scale: PhScale::from_code(ph_scale)?,
            k1k2: K1K2Constants::from_code(k1k2)?,
            kso4: Kso4Constants::from_code(kso4)?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_ph_scale(mut self, ph_scale: PhScale) -> Self {
        self.ph_scale = ph_scale;
        self
    }

    pub fn with_pair(mut self, par1_type: ParameterType, par2_type: ParameterType) -> Self {
        self.par1_type = par1_type;
        self.par2_type = par2_type;
        self
    }

    pub fn with_nutrients(mut self, silicate: f64, phosphate: f64) -> Self {
        self.silicate = silicate;
        self.phosphate = phosphate;
        self
    }

    /// Check that the two input kinds determine the system.
    pub fn validate(&self) -> SolverResultT<()> {
        let (first, second) = (self.par1_type, self.par2_type);
        if first == second || (first.is_co2() && second.is_co2()) {
            return Err(SolverError::InvalidPair { first, second });
        }
        for (parameter, value) in [("silicate", self.silicate), ("phosphate", self.phosphate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidInput { parameter, value });
            }
        }
        Ok(())
    }
}
