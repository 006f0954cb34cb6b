//! # Equation Registry
//!
//! Central registry of the ventilation equations used in calculations.
//! Each equation has metadata including code references, formulas, and
//! variable definitions.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Full metadata for report renderers and audit trails
//! - Serialization support for JSON export
//!
//! ## Usage
//!
//! ```rust
//! use vent_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::StackFlow, "Driving forces");
//!
//! let meta = Equation::StackFlow.metadata();
//! println!("Formula: {}", meta.formula_plain);
//! ```

use serde::{Deserialize, Serialize};

use crate::site_factors::code_ref;

// ============================================================================
// Code References
// ============================================================================

/// Reference to a code, standard, or handbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// A cited section, one of the [`code_ref`] constants
    Standard { citation: &'static str },
    /// Fundamental physics (no specific code reference needed)
    Physics,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Standard { citation } => citation.to_string(),
            CodeReference::Physics => "Fundamental Physics".to_string(),
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for grouping equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Volume and floor area
    Geometry,
    /// Required ventilation rate Q_v
    RequiredAirflow,
    /// Absolute temperature and air density
    AirProperties,
    /// Wind, stack, and combined flow per unit area
    DrivingForces,
    /// Free and gross opening areas
    VentAreas,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Geometry => "Geometry",
            EquationCategory::RequiredAirflow => "Required Airflow",
            EquationCategory::AirProperties => "Air Properties",
            EquationCategory::DrivingForces => "Driving Forces",
            EquationCategory::VentAreas => "Vent Areas",
        }
    }
}

/// Metadata for one equation
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    /// Category for grouping
    pub category: EquationCategory,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All ventilation equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    BuildingVolume,
    FloorArea,
    AirflowByVolume,
    AirflowByFloorArea,
    AreaMethodGoverning,
    TotalLeakRate,
    DilutionAirflow,
    AbsoluteTemperature,
    AirDensity,
    EffectiveObstruction,
    WindFlow,
    StackFlow,
    CombinedFlow,
    FreeArea,
    GrossArea,
}

impl Equation {
    /// All equations in calculation order
    pub const ALL: [Equation; 15] = [
        Equation::BuildingVolume,
        Equation::FloorArea,
        Equation::AirflowByVolume,
        Equation::AirflowByFloorArea,
        Equation::AreaMethodGoverning,
        Equation::TotalLeakRate,
        Equation::DilutionAirflow,
        Equation::AbsoluteTemperature,
        Equation::AirDensity,
        Equation::EffectiveObstruction,
        Equation::WindFlow,
        Equation::StackFlow,
        Equation::CombinedFlow,
        Equation::FreeArea,
        Equation::GrossArea,
    ];

    /// Get the metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::BuildingVolume => EquationMetadata {
                name: "Building Volume",
                formula_plain: "V = L × W × H",
                reference: CodeReference::Physics,
                category: EquationCategory::Geometry,
                source_function: "VentilationInput::volume_cu_ft",
            },
            Equation::FloorArea => EquationMetadata {
                name: "Floor Area",
                formula_plain: "A_floor = L × W",
                reference: CodeReference::Physics,
                category: EquationCategory::Geometry,
                source_function: "VentilationInput::floor_area_sq_ft",
            },
            Equation::AirflowByVolume => EquationMetadata {
                name: "Airflow for One Air Change in 5 Minutes",
                formula_plain: "Q_volume = V / 5 min",
                reference: CodeReference::Standard { citation: code_ref::AREA_METHOD_AIRFLOW },
                category: EquationCategory::RequiredAirflow,
                source_function: "airflow_by_volume",
            },
            Equation::AirflowByFloorArea => EquationMetadata {
                name: "Airflow per Square Foot of Floor",
                formula_plain: "Q_area = A_floor × 1.5 CFM/ft²",
                reference: CodeReference::Standard { citation: code_ref::AREA_METHOD_AIRFLOW },
                category: EquationCategory::RequiredAirflow,
                source_function: "airflow_by_floor_area",
            },
            Equation::AreaMethodGoverning => EquationMetadata {
                name: "Governing Area Method Airflow",
                formula_plain: "Q_v = max(Q_volume, Q_area)",
                reference: CodeReference::Standard { citation: code_ref::AREA_METHOD },
                category: EquationCategory::RequiredAirflow,
                source_function: "required_airflow",
            },
            Equation::TotalLeakRate => EquationMetadata {
                name: "Total Fugitive Leak Rate",
                formula_plain: "Q_leak = Σ rate_i × n_i",
                reference: CodeReference::Standard { citation: code_ref::FUGITIVE_EMISSION },
                category: EquationCategory::RequiredAirflow,
                source_function: "total_leak_rate_cfm",
            },
            Equation::DilutionAirflow => EquationMetadata {
                name: "Dilution Airflow Below LFL",
                formula_plain: "Q_v = Q_leak / (C × LFL/100)",
                reference: CodeReference::Standard { citation: code_ref::FUGITIVE_EMISSION },
                category: EquationCategory::RequiredAirflow,
                source_function: "dilution_airflow",
            },
            Equation::AbsoluteTemperature => EquationMetadata {
                name: "Absolute Temperature",
                formula_plain: "T_abs = T_F + 459.67",
                reference: CodeReference::Physics,
                category: EquationCategory::AirProperties,
                source_function: "Rankine::from",
            },
            Equation::AirDensity => EquationMetadata {
                name: "Air Density (Ideal Gas)",
                formula_plain: "ρ = P_atm / (R_air × T_abs)",
                reference: CodeReference::Physics,
                category: EquationCategory::AirProperties,
                source_function: "air_density",
            },
            Equation::EffectiveObstruction => EquationMetadata {
                name: "Mean Free-Area Fraction",
                formula_plain: "C_eff = (C_inlet + C_outlet) / 2",
                reference: CodeReference::Standard { citation: code_ref::NATURAL_VENTILATION },
                category: EquationCategory::DrivingForces,
                source_function: "effective_obstruction_coefficient",
            },
            Equation::WindFlow => EquationMetadata {
                name: "Wind-Driven Flow per Unit Area",
                formula_plain: "F_w = 88 × C_orientation × (V × C_terrain) × C_eff",
                reference: CodeReference::Standard { citation: code_ref::NATURAL_VENTILATION },
                category: EquationCategory::DrivingForces,
                source_function: "wind_flow_per_area",
            },
            Equation::StackFlow => EquationMetadata {
                name: "Stack-Driven Flow per Unit Area",
                formula_plain: "F_s = 60 × K × C_eff × √(g × H × Δρ / ρ_avg)",
                reference: CodeReference::Standard { citation: code_ref::NATURAL_VENTILATION },
                category: EquationCategory::DrivingForces,
                source_function: "stack_flow_per_area",
            },
            Equation::CombinedFlow => EquationMetadata {
                name: "Combined Driving Force",
                formula_plain: "F_total = √(F_w² + F_s²)",
                reference: CodeReference::Standard { citation: code_ref::NATURAL_VENTILATION },
                category: EquationCategory::DrivingForces,
                source_function: "combined_flow_per_area",
            },
            Equation::FreeArea => EquationMetadata {
                name: "Free Area per Opening",
                formula_plain: "A_free = Q_v / F_total",
                reference: CodeReference::Standard { citation: code_ref::AREA_METHOD_AIRFLOW },
                category: EquationCategory::VentAreas,
                source_function: "free_area",
            },
            Equation::GrossArea => EquationMetadata {
                name: "Gross Vent Area",
                formula_plain: "A_gross = A_free / C_obstruction",
                reference: CodeReference::Physics,
                category: EquationCategory::VentAreas,
                source_function: "gross_area",
            },
        }
    }
}

/// One recorded use of an equation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// Where in the calculation it was applied (e.g. "Inlet")
    pub context: String,
}

/// Records which equations a calculation applied, in order.
#[derive(Debug, Clone, Default)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage {
            equation,
            context: context.into(),
        });
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = std::collections::HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_equation_has_metadata() {
        for eq in Equation::ALL {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(meta.formula_plain.contains('='), "{:?}", eq);
        }
    }

    #[test]
    fn test_citation() {
        assert_eq!(
            Equation::AirflowByVolume.metadata().reference.citation(),
            "AGA XL1001 Appendix B"
        );
        assert_eq!(
            Equation::StackFlow.metadata().reference.citation(),
            "ASHRAE Fundamentals Ch. 16"
        );
        assert_eq!(
            Equation::DilutionAirflow.metadata().reference.citation(),
            code_ref::FUGITIVE_EMISSION
        );
        assert_eq!(Equation::AirDensity.metadata().reference, CodeReference::Physics);
    }

    #[test]
    fn test_tracker_deduplicates_in_order() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::AirDensity, "Inside");
        tracker.record(Equation::AirDensity, "Outside");
        tracker.record(Equation::GrossArea, "Inlet");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(
            tracker.unique_equations(),
            vec![Equation::AirDensity, Equation::GrossArea]
        );
    }
}
