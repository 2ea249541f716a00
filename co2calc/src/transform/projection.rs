//! Fixed projection of the solver output onto the five reported columns.

use serde_json::{Map, Value};

use crate::co2sys::{Parameter, SolverResult};

/// Source series and the output key it is written under, in column order.
pub const OUTPUT_COLUMNS: [(Parameter, &str); 5] = [
    (Parameter::OmegaAragoniteIn, "omega_a"),
    (Parameter::OmegaCalciteIn, "omega_c"),
    (Parameter::Alkalinity, "ta"),
    (Parameter::Dic, "dic"),
    (Parameter::PhInTotal, "ph_tot"),
];

/// Row-aligned output table.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<f64>>,
}

impl Projection {
    /// Zip the selected series row by row.
    pub fn from_result(result: &SolverResult) -> Self {
        let rows = result
            .rows()
            .iter()
            .map(|system| OUTPUT_COLUMNS.iter().map(|(p, _)| system.get(*p)).collect())
            .collect();

        Self {
            headers: OUTPUT_COLUMNS.iter().map(|(_, key)| *key).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One JSON object per row, keyed by output column. NaN becomes null.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(key, value)| (key.to_string(), Value::from(*value)))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::co2sys::{Co2Sys, SolverConfig};

    fn solve(pco2: &[f64], ph: &[f64]) -> SolverResult {
        let n = pco2.len();
        Co2Sys::new(SolverConfig::default())
            .unwrap()
            .solve_table(pco2, ph, &vec![32.0; n], &vec![15.0; n], &vec![15.0; n])
            .unwrap()
    }

    #[test]
    fn test_headers_in_order() {
        let projection = Projection::from_result(&solve(&[], &[]));
        assert_eq!(projection.headers, vec!["omega_a", "omega_c", "ta", "dic", "ph_tot"]);
        assert!(projection.is_empty());
    }

    #[test]
    fn test_rows_aligned_with_series() {
        let result = solve(&[350.0, 420.0, 900.0], &[8.1, 8.0, 7.6]);
        let projection = Projection::from_result(&result);

        assert_eq!(projection.len(), 3);
        for (col, (parameter, _)) in OUTPUT_COLUMNS.iter().enumerate() {
            let series = result.series(*parameter);
            for (row, value) in series.iter().enumerate() {
                assert_eq!(projection.rows[row][col], *value);
            }
        }
    }

    #[test]
    fn test_records_null_for_nan() {
        let projection = Projection::from_result(&solve(&[400.0, f64::NAN], &[8.0, 8.0]));
        let records = projection.to_records();

        assert_eq!(records.len(), 2);
        assert!(records[0]["ta"].as_f64().unwrap() > 0.0);
        assert!(records[1]["ta"].is_null());
    }
}
