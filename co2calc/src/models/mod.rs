//! Domain models for the co2calc pipeline.
//!
//! - [`Observation`] - One water sample: pCO2, pH, salinity, temperature
//! - [`ObservationTable`] - The loaded table, in file order

use serde::{Deserialize, Serialize};

// =============================================================================
// Column names
// =============================================================================

pub const PCO2_COLUMN: &str = "pco2";
pub const PH_COLUMN: &str = "ph";
pub const SALINITY_COLUMN: &str = "sal";
pub const TEMPERATURE_COLUMN: &str = "temp";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    PCO2_COLUMN,
    PH_COLUMN,
    SALINITY_COLUMN,
    TEMPERATURE_COLUMN,
];

// =============================================================================
// Observation
// =============================================================================

/// One sample row. Missing cells are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Partial pressure of CO2, µatm.
    pub pco2: f64,
    /// pH on the scale the solver is configured for.
    pub ph: f64,
    /// Practical salinity.
    pub sal: f64,
    /// °C
    pub temp: f64,
}

impl Observation {
    pub fn new(pco2: f64, ph: f64, sal: f64, temp: f64) -> Self {
        Self { pco2, ph, sal, temp }
    }

    /// True when any field is NaN.
    pub fn has_missing(&self) -> bool {
        [self.pco2, self.ph, self.sal, self.temp]
            .iter()
            .any(|v| v.is_nan())
    }
}

// =============================================================================
// Observation Table
// =============================================================================

/// Observations in file order. Never reordered or filtered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pco2(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.pco2).collect()
    }

    pub fn ph(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ph).collect()
    }

    pub fn sal(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.sal).collect()
    }

    pub fn temp(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.temp).collect()
    }

    /// Number of rows with at least one missing value.
    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|r| r.has_missing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_columns_order() {
        assert_eq!(REQUIRED_COLUMNS, ["pco2", "ph", "sal", "temp"]);
    }

    #[test]
    fn test_columns_keep_row_order() {
        let table = ObservationTable::new(vec![
            Observation::new(400.0, 8.0, 32.0, 15.0),
            Observation::new(500.0, 7.9, 31.0, 12.0),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.pco2(), vec![400.0, 500.0]);
        assert_eq!(table.ph(), vec![8.0, 7.9]);
        assert_eq!(table.sal(), vec![32.0, 31.0]);
        assert_eq!(table.temp(), vec![15.0, 12.0]);
    }

    #[test]
    fn test_missing_count() {
        let table = ObservationTable::new(vec![
            Observation::new(400.0, 8.0, 32.0, 15.0),
            Observation::new(f64::NAN, 7.9, 31.0, 12.0),
        ]);
        assert_eq!(table.missing_count(), 1);
        assert!(!table.rows[0].has_missing());
    }

    #[test]
    fn test_empty_table() {
        let table = ObservationTable::default();
        assert!(table.is_empty());
        assert!(table.pco2().is_empty());
    }
}
