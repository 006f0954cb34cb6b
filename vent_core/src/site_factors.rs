//! # Site and Vent Factors
//!
//! Enumerated multipliers applied to the natural driving forces and to the
//! vent opening areas.
//!
//! ## Overview
//!
//! ```text
//! V_eff = V_wind × C_terrain
//! F_w   = 88 × C_orientation × V_eff × C_eff
//! F_s   = 60 × K × C_eff × √(g × H × Δρ / ρ_avg)
//! C_eff = (C_inlet + C_outlet) / 2
//! A_gross = A_free / C_obstruction
//! ```
//!
//! ## Factor Summary
//!
//! | Factor          | Description                      | Typical Values |
//! |-----------------|----------------------------------|----------------|
//! | C_terrain       | Site exposure / wind shielding   | 0.50 - 1.00    |
//! | C_orientation   | Wind effectiveness of openings   | 0.25 - 0.55    |
//! | K               | Discharge coefficient (vent type)| 0.60 - 0.90    |
//! | C_obstruction   | Free-area fraction of the vent   | 0.35 - 1.00    |
//!
//! Every factor also accepts a `Custom` value so a site-specific figure from
//! a manufacturer sheet or a wind study can be used directly.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Code Section References
// ============================================================================

/// Code references for the ventilation criteria.
pub mod code_ref {
    /// Area Method applicability (floor area limit)
    pub const AREA_METHOD: &str = "AGA XL1001 Section 5.2";
    /// Area Method airflow criteria (5 minute air change, CFM per ft²)
    pub const AREA_METHOD_AIRFLOW: &str = "AGA XL1001 Appendix B";
    /// Dilution of fugitive emissions below LFL
    pub const FUGITIVE_EMISSION: &str = "API RP 500 Annex B";
    /// Adequate ventilation definition
    pub const ADEQUATE_VENTILATION: &str = "API RP 500 Section 6.3";
    /// Natural ventilation driving forces
    pub const NATURAL_VENTILATION: &str = "ASHRAE Fundamentals Ch. 16";
}

/// Floor area above which the Area Method is outside its stated scope (ft²)
pub const AREA_METHOD_MAX_FLOOR_AREA_SQ_FT: f64 = 2000.0;

// ============================================================================
// Obstruction (free-area fraction)
// ============================================================================

/// Obstruction fitted over a vent opening.
///
/// The factor is the free-area fraction: the net clear opening divided by
/// the gross opening. A bare opening is 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Obstruction {
    /// Unobstructed opening: 1.00
    #[default]
    None,
    /// Bird screen: 0.92
    BirdScreen,
    /// Insect screen: 0.85
    InsectScreen,
    /// Weather hood: 0.75
    WeatherHood,
    /// Standard louver: 0.55
    StandardLouver,
    /// Acoustic louver: 0.35
    AcousticLouver,
    /// Manufacturer-supplied free-area fraction
    Custom(f64),
}

impl Obstruction {
    /// All preset obstructions for UI selection
    pub const ALL: [Obstruction; 6] = [
        Obstruction::None,
        Obstruction::BirdScreen,
        Obstruction::InsectScreen,
        Obstruction::WeatherHood,
        Obstruction::StandardLouver,
        Obstruction::AcousticLouver,
    ];

    /// Free-area fraction
    pub fn factor(&self) -> f64 {
        match self {
            Obstruction::None => 1.0,
            Obstruction::BirdScreen => 0.92,
            Obstruction::InsectScreen => 0.85,
            Obstruction::WeatherHood => 0.75,
            Obstruction::StandardLouver => 0.55,
            Obstruction::AcousticLouver => 0.35,
            Obstruction::Custom(f) => *f,
        }
    }

    /// Map a raw factor back to its named preset, or `Custom` if none matches.
    ///
    /// ```rust
    /// use vent_core::site_factors::Obstruction;
    /// assert_eq!(Obstruction::from_factor(0.55), Obstruction::StandardLouver);
    /// assert_eq!(Obstruction::from_factor(0.6), Obstruction::Custom(0.6));
    /// ```
    pub fn from_factor(factor: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|o| o.factor() == factor)
            .unwrap_or(Obstruction::Custom(factor))
    }

    /// True when the opening has nothing fitted over it
    pub fn is_unobstructed(&self) -> bool {
        self.factor() == 1.0
    }

    /// Display name for UI and reports
    pub fn display_name(&self) -> String {
        match self {
            Obstruction::None => "None (Unobstructed)".to_string(),
            Obstruction::BirdScreen => "Bird Screen (92% Free Area)".to_string(),
            Obstruction::InsectScreen => "Insect Screen (85% Free Area)".to_string(),
            Obstruction::WeatherHood => "Weather Hood (75% Free Area)".to_string(),
            Obstruction::StandardLouver => "Standard Louver (55% Free Area)".to_string(),
            Obstruction::AcousticLouver => "Acoustic Louver (35% Free Area)".to_string(),
            Obstruction::Custom(f) => format!("Custom Factor: {}", f),
        }
    }
}

// ============================================================================
// Vent type (discharge coefficient)
// ============================================================================

/// Opening geometry, which sets the discharge coefficient K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum VentType {
    /// Simple sharp-edged opening: K = 0.65
    #[default]
    SharpEdged,
    /// Louvered opening: K = 0.60
    Louvered,
    /// Rounded (bellmouth) entry: K = 0.90
    RoundedEntry,
    /// Tested discharge coefficient
    Custom(f64),
}

impl VentType {
    /// All preset vent types for UI selection
    pub const ALL: [VentType; 3] = [VentType::SharpEdged, VentType::Louvered, VentType::RoundedEntry];

    /// Discharge coefficient K
    pub fn discharge_coefficient(&self) -> f64 {
        match self {
            VentType::SharpEdged => 0.65,
            VentType::Louvered => 0.60,
            VentType::RoundedEntry => 0.90,
            VentType::Custom(k) => *k,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> String {
        match self {
            VentType::SharpEdged => "Sharp-Edged Opening (K = 0.65)".to_string(),
            VentType::Louvered => "Louvered Opening (K = 0.60)".to_string(),
            VentType::RoundedEntry => "Rounded Entry (K = 0.90)".to_string(),
            VentType::Custom(k) => format!("Custom (K = {})", k),
        }
    }
}

// ============================================================================
// Terrain exposure
// ============================================================================

/// Site exposure, reducing the meteorological wind speed to the local value
/// seen at the building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum TerrainExposure {
    /// Flat open country, no obstructions: 1.00
    #[default]
    OpenCountry,
    /// Suburban, scattered buildings and trees: 0.85
    Suburban,
    /// Urban or dense process plant: 0.67
    Urban,
    /// Sheltered by adjacent buildings or equipment: 0.50
    Sheltered,
    /// Site-specific wind reduction
    Custom(f64),
}

impl TerrainExposure {
    /// All preset exposures for UI selection
    pub const ALL: [TerrainExposure; 4] = [
        TerrainExposure::OpenCountry,
        TerrainExposure::Suburban,
        TerrainExposure::Urban,
        TerrainExposure::Sheltered,
    ];

    /// Terrain multiplier on wind velocity
    pub fn factor(&self) -> f64 {
        match self {
            TerrainExposure::OpenCountry => 1.0,
            TerrainExposure::Suburban => 0.85,
            TerrainExposure::Urban => 0.67,
            TerrainExposure::Sheltered => 0.50,
            TerrainExposure::Custom(f) => *f,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> String {
        match self {
            TerrainExposure::OpenCountry => "Open Country (1.00)".to_string(),
            TerrainExposure::Suburban => "Suburban (0.85)".to_string(),
            TerrainExposure::Urban => "Urban / Dense Plant (0.67)".to_string(),
            TerrainExposure::Sheltered => "Sheltered (0.50)".to_string(),
            TerrainExposure::Custom(f) => format!("Custom ({})", f),
        }
    }
}

// ============================================================================
// Wind orientation (effectiveness)
// ============================================================================

/// Orientation of the openings relative to the prevailing wind.
///
/// This is the single wind effectiveness multiplier; there is no separate
/// effectiveness constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum WindOrientation {
    /// Openings face the prevailing wind: 0.55
    #[default]
    Perpendicular,
    /// Openings at roughly 45° to the wind: 0.35
    Oblique,
    /// Wind blows along the wall containing the openings: 0.25
    Parallel,
    /// Site-specific effectiveness
    Custom(f64),
}

impl WindOrientation {
    /// All preset orientations for UI selection
    pub const ALL: [WindOrientation; 3] = [
        WindOrientation::Perpendicular,
        WindOrientation::Oblique,
        WindOrientation::Parallel,
    ];

    /// Wind effectiveness multiplier
    pub fn factor(&self) -> f64 {
        match self {
            WindOrientation::Perpendicular => 0.55,
            WindOrientation::Oblique => 0.35,
            WindOrientation::Parallel => 0.25,
            WindOrientation::Custom(f) => *f,
        }
    }

    /// True when the orientation is the least effective preset.
    ///
    /// A `Custom` value equal to the parallel factor counts as parallel.
    pub fn is_parallel(&self) -> bool {
        self.factor() == WindOrientation::Parallel.factor()
    }

    /// Display name for UI
    pub fn display_name(&self) -> String {
        match self {
            WindOrientation::Perpendicular => "Perpendicular to Wind (0.55)".to_string(),
            WindOrientation::Oblique => "Oblique to Wind (0.35)".to_string(),
            WindOrientation::Parallel => "Parallel to Wind (0.25)".to_string(),
            WindOrientation::Custom(f) => format!("Custom ({})", f),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Lowercase and strip separators: "Standard Louver" -> "standardlouver"
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A bare number selects the `Custom` variant
fn parse_custom(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

impl Obstruction {
    /// Parse a preset name or a raw free-area fraction.
    ///
    /// ```rust
    /// use vent_core::site_factors::Obstruction;
    /// assert_eq!(Obstruction::from_str_flexible("standard-louver").unwrap(), Obstruction::StandardLouver);
    /// assert_eq!(Obstruction::from_str_flexible("0.85").unwrap(), Obstruction::InsectScreen);
    /// ```
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        if let Some(f) = parse_custom(s) {
            return Ok(Obstruction::from_factor(f));
        }
        match normalize(s).as_str() {
            "none" | "unobstructed" | "open" => Ok(Obstruction::None),
            "birdscreen" => Ok(Obstruction::BirdScreen),
            "insectscreen" => Ok(Obstruction::InsectScreen),
            "weatherhood" | "hood" => Ok(Obstruction::WeatherHood),
            "standardlouver" | "louver" => Ok(Obstruction::StandardLouver),
            "acousticlouver" => Ok(Obstruction::AcousticLouver),
            _ => Err(CalcError::invalid_input(
                "obstruction",
                s,
                "Expected a preset name (none, bird-screen, insect-screen, weather-hood, standard-louver, acoustic-louver) or a factor",
            )),
        }
    }
}

impl VentType {
    /// Parse a preset name or a raw discharge coefficient
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        if let Some(k) = parse_custom(s) {
            return Ok(VentType::Custom(k));
        }
        match normalize(s).as_str() {
            "sharpedged" | "sharp" => Ok(VentType::SharpEdged),
            "louvered" => Ok(VentType::Louvered),
            "roundedentry" | "rounded" | "bellmouth" => Ok(VentType::RoundedEntry),
            _ => Err(CalcError::invalid_input(
                "vent_type",
                s,
                "Expected sharp-edged, louvered, rounded-entry, or a discharge coefficient",
            )),
        }
    }
}

impl TerrainExposure {
    /// Parse a preset name or a raw terrain factor
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        if let Some(f) = parse_custom(s) {
            return Ok(TerrainExposure::Custom(f));
        }
        match normalize(s).as_str() {
            "opencountry" | "open" => Ok(TerrainExposure::OpenCountry),
            "suburban" => Ok(TerrainExposure::Suburban),
            "urban" => Ok(TerrainExposure::Urban),
            "sheltered" => Ok(TerrainExposure::Sheltered),
            _ => Err(CalcError::invalid_input(
                "terrain",
                s,
                "Expected open-country, suburban, urban, sheltered, or a factor",
            )),
        }
    }
}

impl WindOrientation {
    /// Parse a preset name or a raw wind effectiveness factor
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        if let Some(f) = parse_custom(s) {
            return Ok(WindOrientation::Custom(f));
        }
        match normalize(s).as_str() {
            "perpendicular" => Ok(WindOrientation::Perpendicular),
            "oblique" | "diagonal" => Ok(WindOrientation::Oblique),
            "parallel" => Ok(WindOrientation::Parallel),
            _ => Err(CalcError::invalid_input(
                "orientation",
                s,
                "Expected perpendicular, oblique, parallel, or a factor",
            )),
        }
    }
}
