//! # Advisory Recommendations
//!
//! Engineering notes attached to every ventilation result. Each rule is
//! evaluated independently and the notes keep rule order.

use serde::{Deserialize, Serialize};

use super::ventilation::{GasType, VentArea, VentilationInput, VentilationMethod};
use crate::equations::ventilation::constants::EPSILON;
use crate::site_factors::{code_ref, AREA_METHOD_MAX_FLOOR_AREA_SQ_FT};

/// Wind speeds below this are not dependable design values (mph)
pub const LOW_WIND_MPH: f64 = 5.0;

/// Temperature differences below this give little stack effect (°F)
pub const LOW_DELTA_T_F: f64 = 10.0;

/// Gross area above this fraction of the floor area is flagged as impractical
pub const IMPRACTICAL_AREA_FRACTION: f64 = 0.10;

/// One advisory note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Advisory {
    HeavierThanAirPlacement,
    LowWind { wind_mph: f64 },
    LowTemperatureDifference { delta_t_f: f64 },
    UnobstructedOpening,
    ParallelOrientation,
    FloorAreaExceedsAreaMethod { floor_area_sq_ft: f64 },
    MethodNote { fugitive: bool },
    ImpracticalArea { gross_area_sq_ft: f64, floor_area_sq_ft: f64 },
    NotAchievable,
}

impl Advisory {
    /// Human-readable text
    pub fn message(&self) -> String {
        match self {
            Advisory::HeavierThanAirPlacement => "Gas is heavier than air: reverse the usual placement and locate \
                 inlet openings high and outlet openings low, near floor level."
                .to_string(),
            Advisory::LowWind { wind_mph } => format!(
                "Design wind speed of {:.1} mph is low. Use a conservative site-average wind speed \
                 rather than an optimistic one.",
                wind_mph
            ),
            Advisory::LowTemperatureDifference { delta_t_f } => format!(
                "Inside/outside temperature difference of {:.1} °F is small. Stack effect is minimal \
                 and ventilation will depend mainly on wind.",
                delta_t_f
            ),
            Advisory::UnobstructedOpening => "An opening is sized with no obstruction. Verify that no screens or \
                 louvers will be added later, or the free area will fall short."
                .to_string(),
            Advisory::ParallelOrientation => "Openings parallel to the prevailing wind are the least effective \
                 orientation. Consider openings facing the wind."
                .to_string(),
            Advisory::FloorAreaExceedsAreaMethod { floor_area_sq_ft } => format!(
                "Floor area of {:.0} sq ft exceeds {:.0} sq ft. Per {}, the Area Method may not be \
                 appropriate; consider the Fugitive Emission Method.",
                floor_area_sq_ft,
                AREA_METHOD_MAX_FLOOR_AREA_SQ_FT,
                code_ref::AREA_METHOD
            ),
            Advisory::MethodNote { fugitive: false } => format!(
                "Area Method ({}): required airflow is the greater of one air change every 5 minutes \
                 and 1.5 CFM per sq ft of floor area.",
                code_ref::AREA_METHOD
            ),
            Advisory::MethodNote { fugitive: true } => format!(
                "Fugitive Emission Method ({}): required airflow dilutes the credible leak rate to the \
                 safety factor times the LFL. Verify the leak source inventory is complete.",
                code_ref::FUGITIVE_EMISSION
            ),
            Advisory::ImpracticalArea {
                gross_area_sq_ft,
                floor_area_sq_ft,
            } => format!(
                "Required gross opening of {:.2} sq ft exceeds 10% of the {:.0} sq ft floor area and may \
                 be impractical. Consider mechanical ventilation.",
                gross_area_sq_ft, floor_area_sq_ft
            ),
            Advisory::NotAchievable => format!(
                "Natural ventilation is impossible with no wind and no inside/outside temperature \
                 difference, so the enclosure is not adequately ventilated per {}. Provide mechanical \
                 ventilation or revise the design conditions.",
                code_ref::ADEQUATE_VENTILATION
            ),
        }
    }
}

/// Evaluate every advisory rule, in order.
///
/// `total_flow_per_area` is the combined driving force F_total and
/// `max_gross_area` the larger of the inlet and outlet gross areas.
pub fn evaluate(
    input: &VentilationInput,
    floor_area_sq_ft: f64,
    total_flow_per_area: f64,
    max_gross_area: VentArea,
) -> Vec<Advisory> {
    let mut notes = Vec::new();

    if input.gas_type == GasType::HeavierThanAir {
        notes.push(Advisory::HeavierThanAirPlacement);
    }

    if input.wind_velocity_mph < LOW_WIND_MPH {
        notes.push(Advisory::LowWind {
            wind_mph: input.wind_velocity_mph,
        });
    }

    let delta_t = input.temperature_difference_f();
    if delta_t < LOW_DELTA_T_F {
        notes.push(Advisory::LowTemperatureDifference { delta_t_f: delta_t });
    }

    if input.inlet_obstruction.is_unobstructed() || input.outlet_obstruction.is_unobstructed() {
        notes.push(Advisory::UnobstructedOpening);
    }

    if input.orientation.is_parallel() {
        notes.push(Advisory::ParallelOrientation);
    }

    let fugitive = matches!(input.method, VentilationMethod::FugitiveEmission(_));
    if !fugitive && floor_area_sq_ft > AREA_METHOD_MAX_FLOOR_AREA_SQ_FT {
        notes.push(Advisory::FloorAreaExceedsAreaMethod { floor_area_sq_ft });
    }

    notes.push(Advisory::MethodNote { fugitive });

    if total_flow_per_area < EPSILON {
        notes.push(Advisory::NotAchievable);
    } else if let VentArea::Achievable(gross) = max_gross_area {
        if gross > floor_area_sq_ft * IMPRACTICAL_AREA_FRACTION {
            notes.push(Advisory::ImpracticalArea {
                gross_area_sq_ft: gross,
                floor_area_sq_ft,
            });
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_factors::{Obstruction, WindOrientation};

    fn base_input() -> VentilationInput {
        let mut input = VentilationInput::new("Test", 40.0, 30.0, 12.0);
        input.inside_temp_f = 90.0;
        input.outside_temp_f = 40.0;
        input.wind_velocity_mph = 10.0;
        input.inlet_obstruction = Obstruction::StandardLouver;
        input.outlet_obstruction = Obstruction::StandardLouver;
        input
    }

    #[test]
    fn test_quiet_input_gets_method_note_only() {
        let notes = evaluate(&base_input(), 1200.0, 150.0, VentArea::Achievable(20.0));
        assert_eq!(notes, vec![Advisory::MethodNote { fugitive: false }]);
    }

    #[test]
    fn test_every_rule_in_order() {
        let mut input = base_input();
        input.length_ft = 50.0;
        input.width_ft = 50.0;
        input.gas_type = GasType::HeavierThanAir;
        input.wind_velocity_mph = 2.0;
        input.inside_temp_f = 70.0;
        input.outside_temp_f = 65.0;
        input.inlet_obstruction = Obstruction::None;
        input.orientation = WindOrientation::Parallel;

        let notes = evaluate(&input, 2500.0, 150.0, VentArea::Achievable(300.0));
        let kinds: Vec<_> = notes.iter().map(std::mem::discriminant).collect();
        let expected = [
            Advisory::HeavierThanAirPlacement,
            Advisory::LowWind { wind_mph: 2.0 },
            Advisory::LowTemperatureDifference { delta_t_f: 5.0 },
            Advisory::UnobstructedOpening,
            Advisory::ParallelOrientation,
            Advisory::FloorAreaExceedsAreaMethod { floor_area_sq_ft: 2500.0 },
            Advisory::MethodNote { fugitive: false },
            Advisory::ImpracticalArea {
                gross_area_sq_ft: 300.0,
                floor_area_sq_ft: 2500.0,
            },
        ];
        assert_eq!(kinds, expected.iter().map(std::mem::discriminant).collect::<Vec<_>>());
    }

    #[test]
    fn test_custom_parallel_factor_counts_as_parallel() {
        let mut input = base_input();
        input.orientation = WindOrientation::Custom(0.25);
        let notes = evaluate(&input, 1200.0, 150.0, VentArea::Achievable(20.0));
        assert!(notes.contains(&Advisory::ParallelOrientation));
    }

    #[test]
    fn test_unachievable_message() {
        let notes = evaluate(&base_input(), 1200.0, 0.0, VentArea::Unachievable);
        assert_eq!(notes.last(), Some(&Advisory::NotAchievable));
        assert!(notes
            .last()
            .map(|n| n.message())
            .unwrap()
            .starts_with("Natural ventilation is impossible"));
    }

    #[test]
    fn test_not_achievable_requires_zero_driving_force() {
        let notes = evaluate(&base_input(), 1200.0, 150.0, VentArea::Unachievable);
        assert!(!notes.contains(&Advisory::NotAchievable));

        let notes = evaluate(&base_input(), 1200.0, 5e-7, VentArea::Unachievable);
        assert_eq!(notes.last(), Some(&Advisory::NotAchievable));
        assert!(notes[notes.len() - 1].message().contains(code_ref::ADEQUATE_VENTILATION));
    }

    #[test]
    fn test_fugitive_skips_floor_area_warning() {
        let mut input = base_input();
        input.method = VentilationMethod::FugitiveEmission(Default::default());
        let notes = evaluate(&input, 5000.0, 150.0, VentArea::Achievable(1.0));
        assert_eq!(notes, vec![Advisory::MethodNote { fugitive: true }]);
        assert!(notes[0].message().contains("API RP 500"));
    }

    #[test]
    fn test_area_method_note_cites_aga() {
        assert!(Advisory::MethodNote { fugitive: false }
            .message()
            .contains("AGA XL1001"));
    }
}
