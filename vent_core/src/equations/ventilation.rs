//! # Natural Ventilation Formulas
//!
//! Required airflow criteria and natural driving forces for an enclosure
//! ventilated through a low inlet and a high outlet.
//!
//! ## Notation
//!
//! - `Q_v` = Required ventilation rate (CFM)
//! - `F_w` = Wind-driven flow per unit free area (CFM/ft²)
//! - `F_s` = Stack-driven flow per unit free area (CFM/ft²)
//! - `ρ` = Air density (lb/ft³)
//! - `K` = Discharge coefficient
//! - `C_eff` = Mean free-area fraction of inlet and outlet
//!
//! ## References
//!
//! - AGA XL1001: Applying Hazardous Area Classification for Natural Gas
//! - API RP 500: Classification of Locations for Electrical Installations
//! - ASHRAE Handbook of Fundamentals, Ch. 16 (natural ventilation)

/// Fixed physical constants (Imperial units)
pub mod constants {
    /// Gravitational acceleration (ft/s²)
    pub const GRAVITY_FT_S2: f64 = 32.2;
    /// Gas constant for dry air (ft·lbf/(lb·°R))
    pub const R_AIR: f64 = 53.353;
    /// Standard atmospheric pressure (lbf/ft²)
    pub const P_ATM_PSF: f64 = 2116.22;
    /// Seconds per minute, converts ft/s stack velocity to ft/min
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Threshold below which a driving force or density difference is zero
    pub const EPSILON: f64 = 1e-6;
    /// Area Method: one complete air change in this many minutes
    pub const AIR_CHANGE_MINUTES: f64 = 5.0;
    /// Area Method: minimum airflow per square foot of floor (CFM/ft²)
    pub const CFM_PER_SQ_FT_FLOOR: f64 = 1.5;
}

use constants::*;

use crate::units::{Cfm, CfmPerSqFt, FtPerMin, Mph};

// =============================================================================
// REQUIRED AIRFLOW
// =============================================================================

/// Area Method criterion A: one complete air change every 5 minutes
///
/// # Formula
/// Q_volume = V / 5 min
///
/// # Example
/// ```rust
/// use vent_core::equations::ventilation::airflow_by_volume;
/// assert_eq!(airflow_by_volume(14400.0), 2880.0);
/// ```
#[inline]
pub fn airflow_by_volume(volume_cu_ft: f64) -> f64 {
    volume_cu_ft / AIR_CHANGE_MINUTES
}

/// Area Method criterion B: minimum airflow per square foot of floor
///
/// # Formula
/// Q_area = A_floor × 1.5 CFM/ft²
#[inline]
pub fn airflow_by_floor_area(floor_area_sq_ft: f64) -> f64 {
    floor_area_sq_ft * CFM_PER_SQ_FT_FLOOR
}

/// Fugitive Emission Method: airflow that dilutes a leak to C × LFL
///
/// # Formula
/// Q_v = Q_leak / (C × LFL/100)
///
/// # Arguments
/// * `leak_rate_cfm` - Total credible leak rate Q_leak
/// * `lfl_percent` - Lower flammable limit (% v/v)
/// * `safety_factor` - Fraction of LFL allowed, C (0 < C ≤ 1)
///
/// # Example
/// ```rust
/// use vent_core::equations::ventilation::dilution_airflow;
/// let q = dilution_airflow(0.2, 5.0, 0.25);
/// assert!((q - 16.0).abs() < 1e-9);
/// ```
#[inline]
pub fn dilution_airflow(leak_rate_cfm: f64, lfl_percent: f64, safety_factor: f64) -> f64 {
    leak_rate_cfm / max_allowed_concentration(lfl_percent, safety_factor)
}

/// Target concentration limit C × LFL as a volume fraction
#[inline]
pub fn max_allowed_concentration(lfl_percent: f64, safety_factor: f64) -> f64 {
    safety_factor * (lfl_percent / 100.0)
}

// =============================================================================
// AIR PROPERTIES
// =============================================================================

/// Air density from the ideal gas law at standard atmospheric pressure
///
/// # Formula
/// ρ = P_atm / (R_air × T_abs)
///
/// # Arguments
/// * `temp_abs_r` - Absolute temperature (°R), must be positive
///
/// # Returns
/// Density in lb/ft³
#[inline]
pub fn air_density(temp_abs_r: f64) -> f64 {
    P_ATM_PSF / (R_AIR * temp_abs_r)
}

// =============================================================================
// DRIVING FORCES (flow per unit free area)
// =============================================================================

/// Mean free-area fraction of the inlet and outlet openings
///
/// # Formula
/// C_eff = (C_inlet + C_outlet) / 2
#[inline]
pub fn effective_obstruction_coefficient(inlet_factor: f64, outlet_factor: f64) -> f64 {
    (inlet_factor + outlet_factor) / 2.0
}

/// Wind-driven flow per unit free area
///
/// # Formula
/// F_w = 88 × C_orientation × V_eff × C_eff
///
/// The 88 is the mph to ft/min conversion, applied through [`FtPerMin`].
///
/// # Arguments
/// * `orientation_factor` - Wind effectiveness multiplier
/// * `effective_wind_mph` - Wind velocity after terrain reduction
/// * `c_eff` - Mean free-area fraction
///
/// # Returns
/// CFM per ft² of free area
#[inline]
pub fn wind_flow_per_area(orientation_factor: f64, effective_wind_mph: f64, c_eff: f64) -> f64 {
    let velocity = FtPerMin::from(Mph(effective_wind_mph));
    orientation_factor * velocity.value() * c_eff
}

/// Stack-driven (buoyancy) flow per unit free area
///
/// # Formula
/// F_s = 60 × K × C_eff × √(g × H × Δρ / ρ_avg)   when Δρ > ε
/// F_s = 0                                        otherwise
///
/// `H` is the full vertical separation between inlet and outlet.
///
/// # Returns
/// CFM per ft² of free area
///
/// # Example
/// ```rust
/// use vent_core::equations::ventilation::stack_flow_per_area;
/// assert_eq!(stack_flow_per_area(0.65, 1.0, 12.0, 0.0, 0.075), 0.0);
/// assert!(stack_flow_per_area(0.65, 1.0, 12.0, 0.007, 0.075) > 0.0);
/// ```
pub fn stack_flow_per_area(
    discharge_coefficient: f64,
    c_eff: f64,
    height_ft: f64,
    density_delta: f64,
    density_avg: f64,
) -> f64 {
    if density_delta > EPSILON {
        SECONDS_PER_MINUTE
            * discharge_coefficient
            * c_eff
            * (GRAVITY_FT_S2 * height_ft * density_delta / density_avg).sqrt()
    } else {
        0.0
    }
}

/// Combined driving force as the vector sum of independent wind and stack
/// contributions
///
/// # Formula
/// F_total = √(F_w² + F_s²)
#[inline]
pub fn combined_flow_per_area(wind: f64, stack: f64) -> f64 {
    (wind * wind + stack * stack).sqrt()
}

// =============================================================================
// OPENING AREAS
// =============================================================================

/// Free area required per opening
///
/// # Formula
/// A_free = Q_v / F_total
///
/// # Returns
/// `None` when `F_total < ε` (no usable driving force)
pub fn free_area(required_cfm: f64, total_flow_per_area: f64) -> Option<f64> {
    if total_flow_per_area < EPSILON {
        None
    } else {
        Some((Cfm(required_cfm) / CfmPerSqFt(total_flow_per_area)).value())
    }
}

/// Gross (physical) vent area that yields the given free area
///
/// # Formula
/// A_gross = A_free / C_obstruction
///
/// # Returns
/// `None` when the obstruction factor is zero (no free area at any size)
pub fn gross_area(free_area_sq_ft: f64, obstruction_factor: f64) -> Option<f64> {
    if obstruction_factor <= 0.0 {
        None
    } else {
        Some(free_area_sq_ft / obstruction_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_method_criteria() {
        assert_eq!(airflow_by_volume(14400.0), 2880.0);
        assert_eq!(airflow_by_floor_area(1200.0), 1800.0);
    }

    #[test]
    fn test_air_density_at_70f() {
        // 2116.22 / (53.353 × 529.67) ≈ 0.07489 lb/ft³
        let rho = air_density(529.67);
        assert!((rho - 0.07489).abs() < 1e-4);
    }

    #[test]
    fn test_colder_air_is_denser() {
        assert!(air_density(499.67) > air_density(549.67));
    }

    #[test]
    fn test_wind_flow() {
        // 88 × 0.5 × 10 × 1.0 = 440
        assert!((wind_flow_per_area(0.5, 10.0, 1.0) - 440.0).abs() < 1e-9);
        assert_eq!(wind_flow_per_area(0.55, 0.0, 1.0), 0.0);
        assert_eq!(wind_flow_per_area(1.0, 1.0, 1.0), crate::units::FPM_PER_MPH);
    }

    #[test]
    fn test_stack_flow_below_threshold_is_zero() {
        assert_eq!(stack_flow_per_area(0.65, 1.0, 12.0, 1e-7, 0.075), 0.0);
    }

    #[test]
    fn test_stack_flow_uses_full_height() {
        let full = stack_flow_per_area(0.65, 1.0, 12.0, 0.007, 0.075);
        let quarter = stack_flow_per_area(0.65, 1.0, 3.0, 0.007, 0.075);
        // √(H) scaling: quadrupling height doubles flow
        assert!((full / quarter - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_vector_sum() {
        assert_eq!(combined_flow_per_area(3.0, 4.0), 5.0);
        assert_eq!(combined_flow_per_area(0.0, 7.0), 7.0);
    }

    #[test]
    fn test_free_area_degenerate() {
        assert_eq!(free_area(2880.0, 0.0), None);
        assert_eq!(free_area(2880.0, 144.0), Some(20.0));
    }

    #[test]
    fn test_gross_area() {
        assert_eq!(gross_area(10.0, 1.0), Some(10.0));
        assert_eq!(gross_area(10.0, 0.5), Some(20.0));
        assert_eq!(gross_area(10.0, 0.0), None);
    }
}
