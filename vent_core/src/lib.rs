//! # vent_core - Natural Ventilation Sizing Engine
//!
//! `vent_core` sizes the natural ventilation openings of an enclosure that
//! houses natural gas equipment, so that it qualifies for a Class I,
//! Division 2 hazardous area classification. All inputs and outputs are
//! JSON-serializable, making it easy to drive from scripts, reports, or AI
//! assistants.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types naming every invalid field
//! - **No infinities**: an opening that natural ventilation cannot serve is
//!   [`VentArea::Unachievable`], not `f64::INFINITY`
//!
//! ## Quick Start
//!
//! ```rust
//! use vent_core::{calculate, VentilationInput};
//! use vent_core::site_factors::Obstruction;
//!
//! let mut input = VentilationInput::new("Meter Building", 40.0, 30.0, 12.0);
//! input.inside_temp_f = 90.0;
//! input.outside_temp_f = 40.0;
//! input.wind_velocity_mph = 5.0;
//! input.inlet_obstruction = Obstruction::StandardLouver;
//! input.outlet_obstruction = Obstruction::StandardLouver;
//!
//! let result = calculate(&input).unwrap();
//! println!("Gross inlet: {}", result.gross_inlet_area);
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Ventilation sizing and advisory recommendations
//! - [`equations`] - Formulas, physical constants, and the equation registry
//! - [`site_factors`] - Obstruction, vent type, terrain, and orientation presets
//! - [`emissions`] - Fugitive leak-rate table
//! - [`project`] - Project container, metadata, and saved calculations
//! - [`file_io`] - Atomic saves and versioned loads
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod emissions;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod site_factors;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::ventilation::calculate;
pub use calculations::{
    FugitiveEmissionInput, GasType, VentArea, VentilationInput, VentilationMethod, VentilationResult,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use project::{CalculationGoal, GlobalSettings, Project, ProjectMetadata, SavedCalculation};
