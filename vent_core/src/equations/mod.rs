//! # Ventilation Equations
//!
//! This module contains the fundamental ventilation equations used in calculations.
//! Having equations in one place enables:
//! - Easy verification against code references (AGA XL1001, API RP 500)
//! - Documentation of assumptions and units
//! - Consistent implementation across calculation methods
//!
//! ## Modules
//!
//! - [`ventilation`] - Airflow criteria, air density, driving forces, vent areas
//! - [`registry`] - Equation metadata and usage tracking for audit trails
//!
//! ## Conventions
//!
//! - **Flow per area**: CFM per ft² of free opening
//! - **Temperatures**: converted to Rankine before any density calculation
//! - **Stack height**: full inlet-to-outlet separation (building height)

pub mod registry;
pub mod ventilation;

pub use registry::{CodeReference, Equation, EquationCategory, EquationMetadata, EquationTracker, EquationUsage};

pub use ventilation::{
    air_density,
    airflow_by_floor_area,
    airflow_by_volume,
    combined_flow_per_area,
    dilution_airflow,
    effective_obstruction_coefficient,
    free_area,
    gross_area,
    max_allowed_concentration,
    stack_flow_per_area,
    wind_flow_per_area,
};
