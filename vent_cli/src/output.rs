//! Plain-text rendering of results and catalogs.

use std::fmt::Write;

use vent_core::calculations::{AirflowBasis, AreaCriterion, LeakRateBasis};
use vent_core::emissions::ComponentType;
use vent_core::site_factors::{Obstruction, TerrainExposure, VentType, WindOrientation};
use vent_core::{VentilationInput, VentilationResult};

const RULE: &str = "═══════════════════════════════════════════════════";

/// Full text report of one calculation
pub fn render_result(input: &VentilationInput, result: &VentilationResult) -> String {
    let mut out = String::new();
    let label = if input.label.is_empty() { "Unnamed enclosure" } else { &input.label };

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  NATURAL VENTILATION: {}", label);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Method: {}", input.method.display_name());
    let _ = writeln!(out, "Gas:    {}", input.gas_type.display_name());
    let _ = writeln!(out);

    let _ = writeln!(out, "Geometry:");
    let _ = writeln!(
        out,
        "  {:.1} x {:.1} x {:.1} ft",
        input.length_ft, input.width_ft, input.height_ft
    );
    let _ = writeln!(out, "  Floor area:  {:.1} sq ft", result.floor_area_sq_ft);
    let _ = writeln!(out, "  Volume:      {:.1} cu ft", result.building_volume_cu_ft);
    let _ = writeln!(out);

    let _ = writeln!(out, "Required airflow:");
    match &result.airflow {
        AirflowBasis::AreaMethod {
            by_volume_cfm,
            by_floor_area_cfm,
            governing,
        } => {
            let (a, b) = match governing {
                AreaCriterion::AirChange => (" <- governs", ""),
                AreaCriterion::FloorArea => ("", " <- governs"),
            };
            let _ = writeln!(out, "  Air change (V / 5 min): {:.1} CFM{}", by_volume_cfm, a);
            let _ = writeln!(out, "  Floor (1.5 CFM/sq ft):  {:.1} CFM{}", by_floor_area_cfm, b);
        }
        AirflowBasis::FugitiveEmission {
            leak_rate_cfm,
            basis,
            contributions,
            lfl_percent,
            safety_factor,
            ..
        } => {
            for c in contributions {
                let _ = writeln!(
                    out,
                    "  {:<20} {:>4} x {:.2} = {:.3} CFM",
                    c.component.display_name(),
                    c.quantity,
                    c.unit_rate_cfm,
                    c.leak_rate_cfm
                );
            }
            let source = match basis {
                LeakRateBasis::Itemized => "itemized",
                LeakRateBasis::Direct => "direct",
            };
            let _ = writeln!(out, "  Leak rate ({}): {:.3} CFM", source, leak_rate_cfm);
            let _ = writeln!(out, "  LFL {:.2}%, safety factor {:.2}", lfl_percent, safety_factor);
        }
    }
    let _ = writeln!(out, "  Q_v = {:.1} CFM", result.required_ventilation_rate_cfm);
    let _ = writeln!(out);

    let _ = writeln!(out, "Driving forces:");
    let _ = writeln!(
        out,
        "  Temperatures: {:.2} °R inside, {:.2} °R outside",
        result.inside_temp_abs_r, result.outside_temp_abs_r
    );
    let _ = writeln!(
        out,
        "  Air density:  {:.5} / {:.5} lb/cu ft (Δρ {:.5})",
        result.air_density_inside, result.air_density_outside, result.air_density_delta
    );
    let _ = writeln!(out, "  Effective wind: {:.2} mph", result.effective_wind_velocity_mph);
    let _ = writeln!(out, "  Wind:     {:.2} CFM/sq ft", result.wind_flow_per_area);
    let _ = writeln!(out, "  Stack:    {:.2} CFM/sq ft", result.stack_flow_per_area);
    let _ = writeln!(out, "  Combined: {:.2} CFM/sq ft", result.total_flow_per_area);
    let _ = writeln!(out);

    let _ = writeln!(out, "Vent areas:");
    let _ = writeln!(out, "  Free area (each opening): {}", result.free_vent_area);
    let _ = writeln!(
        out,
        "  Gross inlet:  {}  [{}]",
        result.gross_inlet_area,
        input.inlet_obstruction.display_name()
    );
    let _ = writeln!(
        out,
        "  Gross outlet: {}  [{}]",
        result.gross_outlet_area,
        input.outlet_obstruction.display_name()
    );
    let _ = writeln!(out, "  Total gross:  {}", result.total_gross_area);
    let _ = writeln!(out);

    let _ = writeln!(out, "Recommendations:");
    for (i, note) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, note);
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "  RESULT: {}",
        if result.is_achievable() { "ACHIEVABLE" } else { "NOT ACHIEVABLE" }
    );
    let _ = writeln!(out, "{}", RULE);
    out
}

/// Leak-rate table
pub fn render_components() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:<20} {:>10}", "CODE", "COMPONENT", "CFM/UNIT");
    for c in ComponentType::ALL {
        let _ = writeln!(out, "{:<20} {:<20} {:>10.2}", c.code(), c.display_name(), c.leak_rate_cfm());
    }
    out
}

/// Site factor presets
pub fn render_factors() -> String {
    let mut out = String::new();
    let mut section = |title: &str, rows: Vec<(String, f64)>| {
        let _ = writeln!(out, "{}:", title);
        for (name, value) in rows {
            let _ = writeln!(out, "  {:<40} {:.2}", name, value);
        }
        let _ = writeln!(out);
    };

    section(
        "Obstruction (free-area fraction)",
        Obstruction::ALL.iter().map(|o| (o.display_name(), o.factor())).collect(),
    );
    section(
        "Vent type (discharge coefficient K)",
        VentType::ALL
            .iter()
            .map(|v| (v.display_name(), v.discharge_coefficient()))
            .collect(),
    );
    section(
        "Terrain exposure (wind multiplier)",
        TerrainExposure::ALL.iter().map(|t| (t.display_name(), t.factor())).collect(),
    );
    section(
        "Wind orientation (wind effectiveness)",
        WindOrientation::ALL.iter().map(|w| (w.display_name(), w.factor())).collect(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_core::calculate;

    #[test]
    fn test_unachievable_rendered_as_na() {
        let input = VentilationInput::new("Still Air", 40.0, 30.0, 12.0);
        let result = calculate(&input).unwrap();
        let text = render_result(&input, &result);
        assert!(text.contains("Q_v = 2880.0 CFM"));
        assert!(text.contains("N/A (not achievable)"));
        assert!(text.contains("RESULT: NOT ACHIEVABLE"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn test_components_table_lists_all() {
        let text = render_components();
        for c in ComponentType::ALL {
            assert!(text.contains(c.code()));
        }
    }

    #[test]
    fn test_factors_table() {
        let text = render_factors();
        assert!(text.contains("Standard Louver"));
        assert!(text.contains("Sheltered"));
    }
}
