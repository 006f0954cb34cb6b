//! # Ventilation Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## LLM Integration
//!
//! All types are designed for LLM consumption:
//! - Comprehensive rustdoc with examples
//! - Clean JSON serialization
//! - Structured error responses
//!
//! ## Available Calculations
//!
//! - [`ventilation`] - Natural ventilation sizing (Area Method, Fugitive Emission Method)
//! - [`recommendations`] - Advisory notes attached to each result

pub mod recommendations;
pub mod ventilation;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

// Re-export commonly used types
pub use recommendations::Advisory;
pub use ventilation::{
    AirflowBasis, AreaCriterion, FugitiveEmissionInput, GasType, LeakRateBasis, VentArea, VentilationInput,
    VentilationMethod, VentilationResult,
};

/// Enum wrapper for all calculation types.
///
/// Saved project files tag each entry with its type so new calculation
/// kinds can be added without breaking old files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Natural ventilation sizing of one enclosure
    Ventilation(VentilationInput),
}

/// Result for any [`CalculationItem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Ventilation(VentilationResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Ventilation(v) => &v.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Ventilation(_) => "Ventilation",
        }
    }

    /// Run the calculation
    pub fn calculate(&self) -> CalcResult<CalculationOutput> {
        match self {
            CalculationItem::Ventilation(input) => ventilation::calculate(input).map(CalculationOutput::Ventilation),
        }
    }
}

impl CalculationOutput {
    pub fn as_ventilation(&self) -> Option<&VentilationResult> {
        match self {
            CalculationOutput::Ventilation(r) => Some(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_tagged_json() {
        let item = CalculationItem::Ventilation(VentilationInput::new("Meter Run", 10.0, 8.0, 8.0));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Ventilation");
        assert_eq!(json["label"], "Meter Run");

        let back: CalculationItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.calc_type(), "Ventilation");
    }

    #[test]
    fn test_item_calculate() {
        let item = CalculationItem::Ventilation(VentilationInput::new("Shed", 10.0, 10.0, 10.0));
        let output = item.calculate().unwrap();
        let result = output.as_ventilation().unwrap();
        assert_eq!(result.building_volume_cu_ft, 1000.0);
    }
}
