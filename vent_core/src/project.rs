//! # Project Data Structures
//!
//! The `Project` struct is the root container for saved ventilation
//! calculations. Projects serialize to `.vent` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, project name, location, company, timestamps)
//! ├── settings: GlobalSettings (code reference, input defaults)
//! └── calculations: Vec<SavedCalculation> (input + stored result, in entry order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use vent_core::calculations::VentilationInput;
//! use vent_core::project::{CalculationGoal, Project};
//!
//! let mut project = Project::new("Station 12 Upgrade", "Midland, TX", "ACME Midstream", "J. Engineer");
//! let input = VentilationInput::new("Meter Building", 40.0, 30.0, 12.0);
//! let id = project.add_calculation(CalculationGoal::MaintainDiv2, input).unwrap();
//!
//! assert!(project.get_calculation(&id).unwrap().verify().unwrap());
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput, GasType, VentilationInput};
use crate::errors::{CalcError, CalcResult};
use crate::site_factors::{code_ref, Obstruction, VentType};

/// Current schema version for .vent files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, names, timestamps)
    pub meta: ProjectMetadata,

    /// Project-wide defaults
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Saved calculations in entry order
    #[serde(default)]
    pub calculations: Vec<SavedCalculation>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// ```rust
    /// use vent_core::project::Project;
    ///
    /// let project = Project::new("Station 12", "Midland, TX", "ACME", "J. Doe");
    /// assert_eq!(project.meta.performed_by, "J. Doe");
    /// ```
    pub fn new(
        project_name: impl Into<String>,
        location: impl Into<String>,
        company: impl Into<String>,
        performed_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                project_name: project_name.into(),
                location: location.into(),
                company: company.into(),
                performed_by: performed_by.into(),
                date: Some(now.date_naive()),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            calculations: Vec::new(),
        }
    }

    /// Run a calculation and store it with its result.
    ///
    /// Returns the UUID assigned to the saved calculation. Invalid inputs
    /// are rejected and nothing is stored.
    pub fn add_calculation(&mut self, goal: CalculationGoal, input: VentilationInput) -> CalcResult<Uuid> {
        let saved = SavedCalculation::new(goal, CalculationItem::Ventilation(input))?;
        let id = saved.id;
        self.calculations.push(saved);
        self.touch();
        Ok(id)
    }

    /// Remove a saved calculation by UUID.
    pub fn remove_calculation(&mut self, id: &Uuid) -> Option<SavedCalculation> {
        let index = self.calculations.iter().position(|c| c.id == *id)?;
        self.touch();
        Some(self.calculations.remove(index))
    }

    /// Get a saved calculation by UUID.
    pub fn get_calculation(&self, id: &Uuid) -> Option<&SavedCalculation> {
        self.calculations.iter().find(|c| c.id == *id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn calculation_count(&self) -> usize {
        self.calculations.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub project_name: String,

    /// Facility location
    pub location: String,

    pub company: String,

    /// Engineer who performed the calculation
    pub performed_by: String,

    /// Calculation date shown on reports
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Project-wide defaults applied to new calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Governing code reference (e.g., "AGA XL1001 Section 5.2")
    pub code: String,

    /// Default opening geometry
    pub default_vent_type: VentType,

    /// Default obstruction for both openings
    pub default_obstruction: Obstruction,

    /// Default gas buoyancy
    pub default_gas_type: GasType,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: code_ref::AREA_METHOD.to_string(),
            default_vent_type: VentType::default(),
            default_obstruction: Obstruction::default(),
            default_gas_type: GasType::default(),
        }
    }
}

impl GlobalSettings {
    /// Apply the project defaults to a fresh input
    pub fn apply_defaults(&self, input: &mut VentilationInput) {
        input.vent_type = self.default_vent_type;
        input.inlet_obstruction = self.default_obstruction;
        input.outlet_obstruction = self.default_obstruction;
        input.gas_type = self.default_gas_type;
    }
}

/// Objective of the calculation, printed as the goal statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CalculationGoal {
    /// Reclassify from Class I, Division 1 to Division 2
    ReclassifyDiv1ToDiv2,
    /// Verify ventilation that maintains an existing Division 2 classification
    MaintainDiv2,
    /// Determine requirements for a Division 2 classification
    #[default]
    General,
}

impl CalculationGoal {
    pub const ALL: [CalculationGoal; 3] = [
        CalculationGoal::ReclassifyDiv1ToDiv2,
        CalculationGoal::MaintainDiv2,
        CalculationGoal::General,
    ];

    /// Objective statement
    pub fn description(&self) -> &'static str {
        match self {
            CalculationGoal::ReclassifyDiv1ToDiv2 => {
                "Determine the natural ventilation required to reclassify the building from \
                 Class I, Division 1 to Class I, Division 2."
            }
            CalculationGoal::MaintainDiv2 => {
                "Verify the natural ventilation required to maintain the building's existing \
                 Class I, Division 2 classification."
            }
            CalculationGoal::General => {
                "Determine the natural ventilation required for the building to be classified \
                 as Class I, Division 2."
            }
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "reclassify" | "reclassify-div1-to-div2" | "div1-to-div2" => Ok(CalculationGoal::ReclassifyDiv1ToDiv2),
            "maintain" | "maintain-div2" => Ok(CalculationGoal::MaintainDiv2),
            "general" => Ok(CalculationGoal::General),
            _ => Err(CalcError::invalid_input(
                "goal",
                s,
                "Expected one of: reclassify, maintain, general",
            )),
        }
    }
}

/// A calculation input stored together with the result it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: Uuid,

    #[serde(default)]
    pub goal: CalculationGoal,

    pub input: CalculationItem,

    /// Result as computed when the calculation was saved
    pub result: CalculationOutput,
}

impl SavedCalculation {
    /// Run `input` and keep the result.
    pub fn new(goal: CalculationGoal, input: CalculationItem) -> CalcResult<Self> {
        let result = input.calculate()?;
        Ok(SavedCalculation {
            id: Uuid::new_v4(),
            goal,
            input,
            result,
        })
    }

    /// Recompute the result from the stored input
    pub fn rerun(&self) -> CalcResult<CalculationOutput> {
        self.input.calculate()
    }

    /// True when re-running reproduces the stored result bit for bit.
    ///
    /// Compares the serialized forms, so `-0.0` and `0.0` differ.
    pub fn verify(&self) -> CalcResult<bool> {
        let fresh = self.rerun()?;
        let matches = to_json(&fresh)? == to_json(&self.result)?;
        debug!(id = %self.id, label = self.input.label(), matches, "verified saved calculation");
        Ok(matches)
    }
}

fn to_json(output: &CalculationOutput) -> CalcResult<String> {
    serde_json::to_string(output).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_factors::WindOrientation;

    fn sample_input() -> VentilationInput {
        let mut input = VentilationInput::new("Compressor Building", 60.0, 40.0, 16.0);
        input.inside_temp_f = 95.0;
        input.outside_temp_f = 20.0;
        input.wind_velocity_mph = 7.3;
        input.orientation = WindOrientation::Oblique;
        input.inlet_obstruction = Obstruction::StandardLouver;
        input.outlet_obstruction = Obstruction::Custom(0.61);
        input
    }

    #[test]
    fn test_new_project() {
        let project = Project::new("Station 12", "Midland", "ACME", "Jane");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.meta.project_name, "Station 12");
        assert_eq!(project.calculation_count(), 0);
        assert!(project.meta.date.is_some());
    }

    #[test]
    fn test_add_and_remove_calculation() {
        let mut project = Project::default();
        let id = project
            .add_calculation(CalculationGoal::ReclassifyDiv1ToDiv2, sample_input())
            .unwrap();
        assert_eq!(project.calculation_count(), 1);
        assert_eq!(project.get_calculation(&id).unwrap().input.label(), "Compressor Building");

        let removed = project.remove_calculation(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(project.remove_calculation(&id).is_none());
    }

    #[test]
    fn test_invalid_input_not_stored() {
        let mut project = Project::default();
        let mut input = sample_input();
        input.height_ft = 0.0;
        let err = project.add_calculation(CalculationGoal::General, input).unwrap_err();
        assert_eq!(err.offending_fields(), vec!["height_ft"]);
        assert_eq!(project.calculation_count(), 0);
    }

    #[test]
    fn test_json_reload_reproduces_result() {
        let mut project = Project::default();
        project.add_calculation(CalculationGoal::MaintainDiv2, sample_input()).unwrap();

        let json = serde_json::to_string_pretty(&project).unwrap();
        let loaded: Project = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, project);
        assert!(loaded.calculations[0].verify().unwrap());
    }

    #[test]
    fn test_tampered_result_fails_verification() {
        let mut project = Project::default();
        project.add_calculation(CalculationGoal::General, sample_input()).unwrap();

        let saved = &mut project.calculations[0];
        let CalculationOutput::Ventilation(result) = &mut saved.result;
        result.required_ventilation_rate_cfm += 1.0;
        assert!(!saved.verify().unwrap());
    }

    #[test]
    fn test_apply_defaults() {
        let settings = GlobalSettings {
            default_obstruction: Obstruction::BirdScreen,
            default_gas_type: GasType::HeavierThanAir,
            ..GlobalSettings::default()
        };
        let mut input = VentilationInput::new("Shed", 10.0, 10.0, 8.0);
        settings.apply_defaults(&mut input);
        assert_eq!(input.inlet_obstruction, Obstruction::BirdScreen);
        assert_eq!(input.outlet_obstruction, Obstruction::BirdScreen);
        assert_eq!(input.gas_type, GasType::HeavierThanAir);
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!(
            CalculationGoal::from_str_flexible("Reclassify").unwrap(),
            CalculationGoal::ReclassifyDiv1ToDiv2
        );
        assert_eq!(
            CalculationGoal::from_str_flexible("maintain_div2").unwrap(),
            CalculationGoal::MaintainDiv2
        );
        assert!(CalculationGoal::from_str_flexible("div3").is_err());
        for goal in CalculationGoal::ALL {
            assert!(goal.description().contains("Division 2"));
        }
    }
}
