//! # Natural Ventilation Sizing
//!
//! Sizes the inlet and outlet openings of an enclosure so that natural
//! ventilation (wind plus stack effect) delivers the airflow required for a
//! Class I, Division 2 classification.
//!
//! ## Pipeline
//!
//! 1. Validate every input; collect all offending fields
//! 2. Required ventilation rate Q_v (Area Method or Fugitive Emission Method)
//! 3. Air densities and the wind / stack driving forces, combined as a vector sum
//! 4. Free area per opening, then gross inlet and outlet areas
//! 5. Advisory recommendations
//!
//! A combined driving force of zero (no wind, no temperature difference) is
//! not an error: the areas come back as [`VentArea::Unachievable`].
//!
//! ## Example (LLM-friendly)
//!
//! ```rust
//! use vent_core::calculations::ventilation::{calculate, VentilationInput, VentilationMethod};
//!
//! let mut input = VentilationInput::new("Meter Building", 40.0, 30.0, 12.0);
//! input.inside_temp_f = 90.0;
//! input.outside_temp_f = 40.0;
//! input.method = VentilationMethod::AreaMethod;
//!
//! let result = calculate(&input).unwrap();
//! println!("Q_v: {:.0} CFM", result.required_ventilation_rate_cfm);
//! println!("Free area: {}", result.free_vent_area);
//! assert!(result.free_vent_area.is_achievable());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::recommendations;
use crate::emissions::{total_leak_rate_cfm, LeakContribution, LeakSource};
use crate::equations::registry::{Equation, EquationTracker};
use crate::equations::ventilation as eq;
use crate::errors::{CalcError, CalcResult, FieldIssue};
use crate::site_factors::{Obstruction, TerrainExposure, VentType, WindOrientation};
use crate::units::{Fahrenheit, Feet, Mph, Rankine};

// ============================================================================
// Inputs
// ============================================================================

/// Buoyancy of the released gas relative to air.
///
/// Only the advisory output and the inlet/outlet placement convention depend
/// on it; the area magnitude does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GasType {
    /// e.g. natural gas: low inlet, high outlet
    #[default]
    LighterThanAir,
    /// e.g. propane: high inlet, low outlet
    HeavierThanAir,
}

impl GasType {
    pub fn display_name(&self) -> &'static str {
        match self {
            GasType::LighterThanAir => "Lighter than Air",
            GasType::HeavierThanAir => "Heavier than Air",
        }
    }

    /// Parse from common string representations ("lighter", "propane", ...)
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "lighter" | "lighter-than-air" | "natural-gas" | "methane" => Ok(GasType::LighterThanAir),
            "heavier" | "heavier-than-air" | "propane" | "butane" | "lpg" => Ok(GasType::HeavierThanAir),
            _ => Err(CalcError::invalid_input(
                "gas_type",
                s,
                "Expected lighter-than-air or heavier-than-air",
            )),
        }
    }
}

/// Fugitive Emission Method parameters (API RP 500).
///
/// Either itemize `leak_sources` or give a direct `leak_rate_cfm`. When both
/// are present the itemized sum is used.
///
/// ## JSON Example
///
/// ```json
/// {
///   "leak_sources": [ { "component": "flange", "quantity": 10 } ],
///   "lfl_percent": 5.0,
///   "safety_factor": 0.25
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FugitiveEmissionInput {
    /// Itemized leak sources resolved through the leak-rate table
    #[serde(default)]
    pub leak_sources: Vec<LeakSource>,

    /// Direct total leak rate (CFM), used when no sources are itemized
    #[serde(default)]
    pub leak_rate_cfm: Option<f64>,

    /// Lower flammable limit of the gas (% v/v, e.g. 5.0 for methane)
    #[serde(default)]
    pub lfl_percent: Option<f64>,

    /// Fraction of LFL the diluted concentration may reach, C (0 < C ≤ 1)
    #[serde(default)]
    pub safety_factor: Option<f64>,
}

impl FugitiveEmissionInput {
    /// Itemized input with the given LFL and safety factor
    pub fn itemized(leak_sources: Vec<LeakSource>, lfl_percent: f64, safety_factor: f64) -> Self {
        FugitiveEmissionInput {
            leak_sources,
            leak_rate_cfm: None,
            lfl_percent: Some(lfl_percent),
            safety_factor: Some(safety_factor),
        }
    }

    /// Direct leak-rate input with the given LFL and safety factor
    pub fn direct(leak_rate_cfm: f64, lfl_percent: f64, safety_factor: f64) -> Self {
        FugitiveEmissionInput {
            leak_sources: Vec::new(),
            leak_rate_cfm: Some(leak_rate_cfm),
            lfl_percent: Some(lfl_percent),
            safety_factor: Some(safety_factor),
        }
    }

    /// Leak rate Q_leak actually used: the itemized sum when sources are
    /// given, otherwise the direct rate
    pub fn resolved_leak_rate(&self) -> (f64, LeakRateBasis) {
        if self.leak_sources.is_empty() {
            (self.leak_rate_cfm.unwrap_or_default(), LeakRateBasis::Direct)
        } else {
            (total_leak_rate_cfm(&self.leak_sources), LeakRateBasis::Itemized)
        }
    }

    /// Fields that determine Q_v under this method, with their values
    fn airflow_fields(&self) -> Vec<(&'static str, String)> {
        let (leak_rate, basis) = self.resolved_leak_rate();
        let leak_field = match basis {
            LeakRateBasis::Itemized => "leak_sources",
            LeakRateBasis::Direct => "leak_rate_cfm",
        };
        vec![
            (leak_field, leak_rate.to_string()),
            ("lfl_percent", self.lfl_percent.unwrap_or_default().to_string()),
            ("safety_factor", self.safety_factor.unwrap_or_default().to_string()),
        ]
    }

    fn validate_into(&self, issues: &mut Vec<FieldIssue>) {
        if self.leak_sources.is_empty() && self.leak_rate_cfm.is_none() {
            issues.push(FieldIssue::missing(
                "leak_sources",
                "Supply itemized leak sources or a direct leak_rate_cfm",
            ));
        }
        if !self.leak_sources.is_empty() && total_leak_rate_cfm(&self.leak_sources) <= 0.0 {
            issues.push(FieldIssue::new(
                "leak_sources",
                "0 CFM",
                "Total itemized leak rate must be positive",
            ));
        }
        if let Some(rate) = self.leak_rate_cfm {
            if !(rate.is_finite() && rate > 0.0) {
                issues.push(FieldIssue::new(
                    "leak_rate_cfm",
                    rate.to_string(),
                    "Leak rate must be a positive number",
                ));
            }
        }
        match self.lfl_percent {
            None => issues.push(FieldIssue::missing("lfl_percent", "LFL is required for the Fugitive Emission Method")),
            Some(lfl) if !(lfl.is_finite() && lfl > 0.0 && lfl <= 100.0) => issues.push(FieldIssue::new(
                "lfl_percent",
                lfl.to_string(),
                "LFL must be a positive percentage no greater than 100",
            )),
            Some(_) => {}
        }
        match self.safety_factor {
            None => issues.push(FieldIssue::missing(
                "safety_factor",
                "Safety factor is required for the Fugitive Emission Method",
            )),
            Some(c) if !(c.is_finite() && c > 0.0 && c <= 1.0) => issues.push(FieldIssue::new(
                "safety_factor",
                c.to_string(),
                "Safety factor must be greater than 0 and at most 1.0",
            )),
            Some(_) => {}
        }
    }
}

/// How the required ventilation rate is determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method")]
pub enum VentilationMethod {
    /// Prescriptive method, AGA XL1001 Section 5.2 / Appendix B
    #[default]
    AreaMethod,
    /// Quantified dilution of credible leaks, API RP 500
    FugitiveEmission(FugitiveEmissionInput),
}

impl VentilationMethod {
    /// Display name for UI and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            VentilationMethod::AreaMethod => "Area Method (AGA XL1001)",
            VentilationMethod::FugitiveEmission(_) => "Fugitive Emission Method (API RP 500)",
        }
    }
}

/// Input parameters for a naturally ventilated enclosure.
///
/// All inputs use US customary units. Site factors default to open
/// country, perpendicular openings, sharp-edged vents, and no obstruction.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Compressor Building",
///   "length_ft": 40.0,
///   "width_ft": 30.0,
///   "height_ft": 12.0,
///   "inside_temp_f": 90.0,
///   "outside_temp_f": 40.0,
///   "wind_velocity_mph": 5.0,
///   "terrain": "Suburban",
///   "orientation": "Oblique",
///   "vent_type": "SharpEdged",
///   "inlet_obstruction": "StandardLouver",
///   "outlet_obstruction": { "Custom": 0.6 },
///   "method": { "method": "AreaMethod" },
///   "gas_type": "LighterThanAir"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationInput {
    /// User label for this enclosure (e.g., "Meter Building 2")
    #[serde(default)]
    pub label: String,

    /// Building length in feet
    pub length_ft: f64,

    /// Building width in feet
    pub width_ft: f64,

    /// Building height in feet (inlet-to-outlet vertical separation)
    pub height_ft: f64,

    /// Design inside air temperature (°F)
    pub inside_temp_f: f64,

    /// Design outside air temperature (°F)
    pub outside_temp_f: f64,

    /// Design wind velocity (mph)
    pub wind_velocity_mph: f64,

    /// Site exposure
    #[serde(default)]
    pub terrain: TerrainExposure,

    /// Opening orientation relative to the prevailing wind
    #[serde(default)]
    pub orientation: WindOrientation,

    /// Opening geometry (discharge coefficient)
    #[serde(default)]
    pub vent_type: VentType,

    /// Obstruction fitted over the inlet
    #[serde(default)]
    pub inlet_obstruction: Obstruction,

    /// Obstruction fitted over the outlet
    #[serde(default)]
    pub outlet_obstruction: Obstruction,

    /// Required-airflow method
    #[serde(default)]
    pub method: VentilationMethod,

    /// Buoyancy of the released gas
    #[serde(default)]
    pub gas_type: GasType,
}

impl VentilationInput {
    /// Create an input with the given geometry and neutral defaults:
    /// 70 °F inside and outside, no wind, Area Method.
    pub fn new(label: impl Into<String>, length_ft: f64, width_ft: f64, height_ft: f64) -> Self {
        VentilationInput {
            label: label.into(),
            length_ft,
            width_ft,
            height_ft,
            inside_temp_f: 70.0,
            outside_temp_f: 70.0,
            wind_velocity_mph: 0.0,
            terrain: TerrainExposure::default(),
            orientation: WindOrientation::default(),
            vent_type: VentType::default(),
            inlet_obstruction: Obstruction::default(),
            outlet_obstruction: Obstruction::default(),
            method: VentilationMethod::default(),
            gas_type: GasType::default(),
        }
    }

    /// Validate input parameters.
    ///
    /// Every problem is reported, not just the first one.
    pub fn validate(&self) -> CalcResult<()> {
        let mut issues = Vec::new();

        for (field, value, name) in [
            ("length_ft", self.length_ft, "Length"),
            ("width_ft", self.width_ft, "Width"),
            ("height_ft", self.height_ft, "Height"),
        ] {
            if !(value.is_finite() && value > 0.0) {
                issues.push(FieldIssue::new(field, value.to_string(), format!("{} must be a positive number", name)));
            }
        }

        for (field, value) in [("inside_temp_f", self.inside_temp_f), ("outside_temp_f", self.outside_temp_f)] {
            if !value.is_finite() {
                issues.push(FieldIssue::new(field, value.to_string(), "Temperature must be a number"));
            } else if Rankine::from(Fahrenheit(value)).0 <= 0.0 {
                issues.push(FieldIssue::new(
                    field,
                    value.to_string(),
                    "Absolute temperature must be above absolute zero (-459.67 °F)",
                ));
            }
        }

        if !(self.wind_velocity_mph.is_finite() && self.wind_velocity_mph >= 0.0) {
            issues.push(FieldIssue::new(
                "wind_velocity_mph",
                self.wind_velocity_mph.to_string(),
                "Wind velocity must be zero or a positive number",
            ));
        }

        let terrain = self.terrain.factor();
        if !(terrain.is_finite() && terrain >= 0.0) {
            issues.push(FieldIssue::new("terrain", terrain.to_string(), "Terrain factor must be zero or positive"));
        }
        let orientation = self.orientation.factor();
        if !(orientation.is_finite() && orientation >= 0.0) {
            issues.push(FieldIssue::new(
                "orientation",
                orientation.to_string(),
                "Orientation factor must be zero or positive",
            ));
        }
        let k = self.vent_type.discharge_coefficient();
        if !(k.is_finite() && k > 0.0) {
            issues.push(FieldIssue::new("vent_type", k.to_string(), "Discharge coefficient must be positive"));
        }
        for (field, obstruction) in [
            ("inlet_obstruction", self.inlet_obstruction),
            ("outlet_obstruction", self.outlet_obstruction),
        ] {
            let f = obstruction.factor();
            if !(f.is_finite() && f > 0.0 && f <= 1.0) {
                issues.push(FieldIssue::new(
                    field,
                    f.to_string(),
                    "Obstruction factor must be greater than 0 and at most 1.0",
                ));
            }
        }

        if let VentilationMethod::FugitiveEmission(params) = &self.method {
            params.validate_into(&mut issues);
        }

        // Individually valid fields can still overflow once multiplied
        if issues.is_empty() {
            self.validate_derived(&mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CalcError::validation_failed(issues))
        }
    }

    fn validate_derived(&self, issues: &mut Vec<FieldIssue>) {
        let dims = [
            ("length_ft", self.length_ft.to_string()),
            ("width_ft", self.width_ft.to_string()),
            ("height_ft", self.height_ft.to_string()),
        ];

        let floor_area = self.floor_area_sq_ft();
        if !eq::airflow_by_floor_area(floor_area).is_finite() {
            blame(issues, &dims[..2], "Floor area is too large to compute");
            return;
        }
        if !self.volume_cu_ft().is_finite() {
            blame(issues, &dims, "Building volume is too large to compute");
            return;
        }
        if let VentilationMethod::FugitiveEmission(params) = &self.method {
            let (leak_rate, _) = params.resolved_leak_rate();
            let q = eq::dilution_airflow(
                leak_rate,
                params.lfl_percent.unwrap_or_default(),
                params.safety_factor.unwrap_or_default(),
            );
            if !q.is_finite() {
                blame(
                    issues,
                    &params.airflow_fields(),
                    "Required ventilation rate is too large to compute",
                );
            }
        }
    }

    /// Fields that determine Q_v, with their values
    fn airflow_fields(&self) -> Vec<(&'static str, String)> {
        match &self.method {
            VentilationMethod::AreaMethod => vec![
                ("length_ft", self.length_ft.to_string()),
                ("width_ft", self.width_ft.to_string()),
                ("height_ft", self.height_ft.to_string()),
            ],
            VentilationMethod::FugitiveEmission(params) => params.airflow_fields(),
        }
    }

    /// Floor area A = L × W (ft²)
    pub fn floor_area_sq_ft(&self) -> f64 {
        (Feet(self.length_ft) * Feet(self.width_ft)).value()
    }

    /// Building volume V = L × W × H (ft³)
    pub fn volume_cu_ft(&self) -> f64 {
        (Feet(self.length_ft) * Feet(self.width_ft) * Feet(self.height_ft)).value()
    }

    /// Temperature difference |T_in − T_out| (°F)
    pub fn temperature_difference_f(&self) -> f64 {
        (self.inside_temp_f - self.outside_temp_f).abs()
    }
}

fn blame(issues: &mut Vec<FieldIssue>, fields: &[(&'static str, String)], reason: &str) {
    issues.extend(
        fields
            .iter()
            .map(|(field, value)| FieldIssue::new(*field, value.clone(), reason)),
    );
}

// ============================================================================
// Results
// ============================================================================

/// An opening area that is either a finite size or not achievable by
/// natural ventilation.
///
/// Serializes as `{"status": "Achievable", "sq_ft": 12.5}` or
/// `{"status": "Unachievable"}` so renderers can print "N/A" instead of a
/// broken number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "sq_ft")]
pub enum VentArea {
    Achievable(f64),
    Unachievable,
}

impl VentArea {
    /// Wrap an optional area (None means unachievable)
    pub fn from_option(area: Option<f64>) -> Self {
        match area {
            Some(a) if a.is_finite() => VentArea::Achievable(a),
            _ => VentArea::Unachievable,
        }
    }

    /// Area in ft², or None when unachievable
    pub fn sq_ft(&self) -> Option<f64> {
        match self {
            VentArea::Achievable(a) => Some(*a),
            VentArea::Unachievable => None,
        }
    }

    /// Area in ft², +∞ when unachievable
    pub fn as_f64(&self) -> f64 {
        self.sq_ft().unwrap_or(f64::INFINITY)
    }

    pub fn is_achievable(&self) -> bool {
        matches!(self, VentArea::Achievable(_))
    }

    /// Sum of two areas; unachievable if either is
    pub fn plus(self, other: VentArea) -> VentArea {
        match (self, other) {
            (VentArea::Achievable(a), VentArea::Achievable(b)) => VentArea::Achievable(a + b),
            _ => VentArea::Unachievable,
        }
    }

    /// Larger of two areas; unachievable if either is
    pub fn max(self, other: VentArea) -> VentArea {
        match (self, other) {
            (VentArea::Achievable(a), VentArea::Achievable(b)) => VentArea::Achievable(a.max(b)),
            _ => VentArea::Unachievable,
        }
    }
}

impl std::fmt::Display for VentArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VentArea::Achievable(a) => write!(f, "{:.2} sq ft", a),
            VentArea::Unachievable => write!(f, "N/A (not achievable)"),
        }
    }
}

/// Which Area Method criterion produced the required airflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaCriterion {
    /// One complete air change every 5 minutes
    AirChange,
    /// 1.5 CFM per square foot of floor
    FloorArea,
}

/// Where the fugitive leak rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeakRateBasis {
    /// Summed from itemized components
    Itemized,
    /// Supplied directly as a scalar
    Direct,
}

/// Method-specific derivation of the required ventilation rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum AirflowBasis {
    AreaMethod {
        /// Q_volume = V / 5 min (CFM)
        by_volume_cfm: f64,
        /// Q_area = A_floor × 1.5 (CFM)
        by_floor_area_cfm: f64,
        governing: AreaCriterion,
    },
    FugitiveEmission {
        /// Q_leak (CFM)
        leak_rate_cfm: f64,
        basis: LeakRateBasis,
        /// Per-source breakdown (empty for a direct leak rate)
        contributions: Vec<LeakContribution>,
        lfl_percent: f64,
        safety_factor: f64,
        /// C × LFL as a volume fraction
        max_concentration_fraction: f64,
    },
}

/// Results from the ventilation calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "building_volume_cu_ft": 14400.0,
///   "floor_area_sq_ft": 1200.0,
///   "required_ventilation_rate_cfm": 2880.0,
///   "wind_flow_per_area": 0.0,
///   "stack_flow_per_area": 0.0,
///   "total_flow_per_area": 0.0,
///   "free_vent_area": { "status": "Unachievable" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationResult {
    /// V = L × W × H (ft³)
    pub building_volume_cu_ft: f64,
    /// L × W (ft²)
    pub floor_area_sq_ft: f64,
    /// Inside absolute temperature (°R)
    pub inside_temp_abs_r: f64,
    /// Outside absolute temperature (°R)
    pub outside_temp_abs_r: f64,
    /// Inside air density (lb/ft³)
    pub air_density_inside: f64,
    /// Outside air density (lb/ft³)
    pub air_density_outside: f64,
    /// |ρ_in − ρ_out| (lb/ft³)
    pub air_density_delta: f64,
    /// (ρ_in + ρ_out) / 2 (lb/ft³)
    pub average_air_density: f64,
    /// Mean free-area fraction of inlet and outlet
    pub effective_obstruction_coefficient: f64,
    /// Wind velocity after terrain reduction (mph)
    pub effective_wind_velocity_mph: f64,
    /// Derivation of the required ventilation rate
    pub airflow: AirflowBasis,
    /// Q_v (CFM)
    pub required_ventilation_rate_cfm: f64,
    /// F_w (CFM/ft²)
    pub wind_flow_per_area: f64,
    /// F_s (CFM/ft²)
    pub stack_flow_per_area: f64,
    /// F_total = √(F_w² + F_s²) (CFM/ft²)
    pub total_flow_per_area: f64,
    /// Free area required at each of the inlet and outlet
    pub free_vent_area: VentArea,
    /// Physical inlet size after obstruction
    pub gross_inlet_area: VentArea,
    /// Physical outlet size after obstruction
    pub gross_outlet_area: VentArea,
    /// Inlet plus outlet gross area
    pub total_gross_area: VentArea,
    /// Advisory notes, in rule order
    pub recommendations: Vec<String>,
    /// Equations applied, in first-use order
    pub equations: Vec<Equation>,
}

impl VentilationResult {
    /// True when natural ventilation can deliver Q_v with finite openings
    pub fn is_achievable(&self) -> bool {
        self.free_vent_area.is_achievable()
    }

    /// Larger of the two gross opening areas
    pub fn max_gross_area(&self) -> VentArea {
        self.gross_inlet_area.max(self.gross_outlet_area)
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Calculate the natural ventilation requirement.
///
/// # Arguments
///
/// * `input` - Enclosure, environment, site factors, and method
///
/// # Returns
///
/// * `Ok(VentilationResult)` - Calculation results (possibly unachievable areas)
/// * `Err(CalcError::ValidationFailed)` - If any input is invalid; nothing is computed
pub fn calculate(input: &VentilationInput) -> CalcResult<VentilationResult> {
    input.validate()?;
    debug!(label = %input.label, method = input.method.display_name(), "calculating natural ventilation");

    let mut tracker = EquationTracker::new();

    // Geometry
    let floor_area = input.floor_area_sq_ft();
    tracker.record(Equation::FloorArea, "Geometry");
    let volume = input.volume_cu_ft();
    tracker.record(Equation::BuildingVolume, "Geometry");

    // Step 1: required ventilation rate
    let (airflow, required_cfm) = required_airflow(input, volume, floor_area, &mut tracker);
    debug!(required_cfm, "required ventilation rate");

    // Step 2: air properties and driving forces
    let inside_abs = Rankine::from(Fahrenheit(input.inside_temp_f));
    let outside_abs = Rankine::from(Fahrenheit(input.outside_temp_f));
    tracker.record(Equation::AbsoluteTemperature, "Inside and outside");

    let rho_in = eq::air_density(inside_abs.0);
    let rho_out = eq::air_density(outside_abs.0);
    tracker.record(Equation::AirDensity, "Inside and outside");
    let rho_delta = (rho_in - rho_out).abs();
    let rho_avg = (rho_in + rho_out) / 2.0;

    let inlet_factor = input.inlet_obstruction.factor();
    let outlet_factor = input.outlet_obstruction.factor();
    let c_eff = eq::effective_obstruction_coefficient(inlet_factor, outlet_factor);
    tracker.record(Equation::EffectiveObstruction, "Inlet and outlet");

    let v_eff = Mph(input.wind_velocity_mph) * input.terrain.factor();
    let wind = eq::wind_flow_per_area(input.orientation.factor(), v_eff.0, c_eff);
    tracker.record(Equation::WindFlow, "Wind effect");

    let stack = eq::stack_flow_per_area(
        input.vent_type.discharge_coefficient(),
        c_eff,
        input.height_ft,
        rho_delta,
        rho_avg,
    );
    tracker.record(Equation::StackFlow, "Stack effect");

    let total = eq::combined_flow_per_area(wind, stack);
    tracker.record(Equation::CombinedFlow, "Wind and stack");
    debug!(wind, stack, total, "driving forces (CFM/ft²)");

    // Step 3: areas
    let free_area = VentArea::from_option(eq::free_area(required_cfm, total));
    tracker.record(Equation::FreeArea, "Each opening");

    let gross = |factor: f64| match free_area {
        VentArea::Achievable(a) => VentArea::from_option(eq::gross_area(a, factor)),
        VentArea::Unachievable => VentArea::Unachievable,
    };
    let gross_inlet = gross(inlet_factor);
    tracker.record(Equation::GrossArea, "Inlet");
    let gross_outlet = gross(outlet_factor);
    tracker.record(Equation::GrossArea, "Outlet");
    let total_gross = gross_inlet.plus(gross_outlet);

    if total >= eq::constants::EPSILON && !total_gross.is_achievable() {
        return Err(area_overflow(input, free_area, gross_inlet, gross_outlet));
    }

    if !free_area.is_achievable() {
        warn!(label = %input.label, "no natural driving force; ventilation area is not achievable");
    } else {
        debug!(free = %free_area, inlet = %gross_inlet, outlet = %gross_outlet, "vent areas");
    }

    // Step 4: recommendations
    let recommendations = recommendations::evaluate(input, floor_area, total, gross_inlet.max(gross_outlet))
        .iter()
        .map(|r| r.message())
        .collect();

    Ok(VentilationResult {
        building_volume_cu_ft: volume,
        floor_area_sq_ft: floor_area,
        inside_temp_abs_r: inside_abs.0,
        outside_temp_abs_r: outside_abs.0,
        air_density_inside: rho_in,
        air_density_outside: rho_out,
        air_density_delta: rho_delta,
        average_air_density: rho_avg,
        effective_obstruction_coefficient: c_eff,
        effective_wind_velocity_mph: v_eff.0,
        airflow,
        required_ventilation_rate_cfm: required_cfm,
        wind_flow_per_area: wind,
        stack_flow_per_area: stack,
        total_flow_per_area: total,
        free_vent_area: free_area,
        gross_inlet_area: gross_inlet,
        gross_outlet_area: gross_outlet,
        total_gross_area: total_gross,
        recommendations,
        equations: tracker.unique_equations(),
    })
}

/// Error for a positive driving force whose opening areas exceed f64 range
fn area_overflow(input: &VentilationInput, free: VentArea, inlet: VentArea, outlet: VentArea) -> CalcError {
    let mut issues = Vec::new();
    let reason = "Required vent area is too large to compute";
    if !free.is_achievable() {
        blame(&mut issues, &input.airflow_fields(), reason);
    } else {
        let obstructions = [
            ("inlet_obstruction", input.inlet_obstruction, inlet),
            ("outlet_obstruction", input.outlet_obstruction, outlet),
        ];
        let overflowing: Vec<_> = obstructions.iter().filter(|(_, _, gross)| !gross.is_achievable()).collect();
        // Both gross areas fit but their sum does not
        let blamed = if overflowing.is_empty() {
            obstructions.iter().collect()
        } else {
            overflowing
        };
        for (field, obstruction, _) in blamed {
            issues.push(FieldIssue::new(*field, obstruction.factor().to_string(), reason));
        }
    }
    CalcError::validation_failed(issues)
}

/// Required ventilation rate Q_v for the selected method.
///
/// Assumes `input` has been validated.
fn required_airflow(
    input: &VentilationInput,
    volume: f64,
    floor_area: f64,
    tracker: &mut EquationTracker,
) -> (AirflowBasis, f64) {
    match &input.method {
        VentilationMethod::AreaMethod => {
            let by_volume = eq::airflow_by_volume(volume);
            tracker.record(Equation::AirflowByVolume, "Criterion A");
            let by_floor = eq::airflow_by_floor_area(floor_area);
            tracker.record(Equation::AirflowByFloorArea, "Criterion B");

            let governing = if by_volume >= by_floor {
                AreaCriterion::AirChange
            } else {
                AreaCriterion::FloorArea
            };
            tracker.record(Equation::AreaMethodGoverning, "Governing criterion");

            (
                AirflowBasis::AreaMethod {
                    by_volume_cfm: by_volume,
                    by_floor_area_cfm: by_floor,
                    governing,
                },
                by_volume.max(by_floor),
            )
        }
        VentilationMethod::FugitiveEmission(params) => {
            let (leak_rate, basis) = params.resolved_leak_rate();
            if basis == LeakRateBasis::Itemized {
                tracker.record(Equation::TotalLeakRate, "Itemized sources");
            }
            let contributions = params.leak_sources.iter().map(LeakContribution::from).collect();
            let lfl = params.lfl_percent.unwrap_or_default();
            let c = params.safety_factor.unwrap_or_default();

            let q = eq::dilution_airflow(leak_rate, lfl, c);
            tracker.record(Equation::DilutionAirflow, "Dilution below LFL");

            (
                AirflowBasis::FugitiveEmission {
                    leak_rate_cfm: leak_rate,
                    basis,
                    contributions,
                    lfl_percent: lfl,
                    safety_factor: c,
                    max_concentration_fraction: eq::max_allowed_concentration(lfl, c),
                },
                q,
            )
        }
    }
}
