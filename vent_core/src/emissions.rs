//! # Fugitive Emission Sources
//!
//! Per-component leak rates used by the Fugitive Emission Method
//! (API RP 500). Each entry is the credible leak rate of one installed
//! component, in CFM of gas.
//!
//! | Component           | Leak rate (CFM/unit) |
//! |---------------------|----------------------|
//! | Valve stem          | 0.23                 |
//! | Flange              | 0.02                 |
//! | Pump seal           | 0.42                 |
//! | Compressor seal     | 2.15                 |
//! | Relief valve        | 0.88                 |
//! | Threaded connector  | 0.09                 |
//! | Open-ended line     | 0.09                 |
//!
//! ## Example
//!
//! ```rust
//! use vent_core::emissions::{ComponentType, LeakSource, total_leak_rate_cfm};
//!
//! let sources = vec![
//!     LeakSource::new(ComponentType::Flange, 10),
//!     LeakSource::new(ComponentType::ValveStem, 2),
//! ];
//! let q_leak = total_leak_rate_cfm(&sources);
//! assert!((q_leak - (0.2 + 0.46)).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Component types with a tabulated fugitive leak rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    ValveStem,
    Flange,
    PumpSeal,
    CompressorSeal,
    ReliefValve,
    ThreadedConnector,
    OpenEndedLine,
}

impl ComponentType {
    /// All component types in table order
    pub const ALL: [ComponentType; 7] = [
        ComponentType::ValveStem,
        ComponentType::Flange,
        ComponentType::PumpSeal,
        ComponentType::CompressorSeal,
        ComponentType::ReliefValve,
        ComponentType::ThreadedConnector,
        ComponentType::OpenEndedLine,
    ];

    /// Leak rate of one component in CFM
    pub fn leak_rate_cfm(&self) -> f64 {
        match self {
            ComponentType::ValveStem => 0.23,
            ComponentType::Flange => 0.02,
            ComponentType::PumpSeal => 0.42,
            ComponentType::CompressorSeal => 2.15,
            ComponentType::ReliefValve => 0.88,
            ComponentType::ThreadedConnector => 0.09,
            ComponentType::OpenEndedLine => 0.09,
        }
    }

    /// Table key (matches the JSON form)
    pub fn code(&self) -> &'static str {
        match self {
            ComponentType::ValveStem => "valve-stem",
            ComponentType::Flange => "flange",
            ComponentType::PumpSeal => "pump-seal",
            ComponentType::CompressorSeal => "compressor-seal",
            ComponentType::ReliefValve => "relief-valve",
            ComponentType::ThreadedConnector => "threaded-connector",
            ComponentType::OpenEndedLine => "open-ended-line",
        }
    }

    /// Parse from common string representations
    ///
    /// ```rust
    /// use vent_core::emissions::ComponentType;
    /// assert_eq!(ComponentType::from_str_flexible("Pump Seal").unwrap(), ComponentType::PumpSeal);
    /// assert!(ComponentType::from_str_flexible("gasket").is_err());
    /// ```
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "valve-stem" | "valve" | "valvestem" => Ok(ComponentType::ValveStem),
            "flange" => Ok(ComponentType::Flange),
            "pump-seal" | "pumpseal" => Ok(ComponentType::PumpSeal),
            "compressor-seal" | "compressorseal" => Ok(ComponentType::CompressorSeal),
            "relief-valve" | "psv" | "prv" => Ok(ComponentType::ReliefValve),
            "threaded-connector" | "connector" | "threaded" => Ok(ComponentType::ThreadedConnector),
            "open-ended-line" | "oel" | "open-ended" => Ok(ComponentType::OpenEndedLine),
            _ => Err(CalcError::component_not_found(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentType::ValveStem => "Valve Stem",
            ComponentType::Flange => "Flange",
            ComponentType::PumpSeal => "Pump Seal",
            ComponentType::CompressorSeal => "Compressor Seal",
            ComponentType::ReliefValve => "Relief Valve",
            ComponentType::ThreadedConnector => "Threaded Connector",
            ComponentType::OpenEndedLine => "Open-Ended Line",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::from_str_flexible(s)
    }
}

/// A counted group of identical components inside the enclosure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakSource {
    /// Component type (table key)
    pub component: ComponentType,
    /// Number of installed units
    pub quantity: u32,
}

impl LeakSource {
    pub fn new(component: ComponentType, quantity: u32) -> Self {
        LeakSource { component, quantity }
    }

    /// Combined leak rate of this group: rate × quantity
    pub fn leak_rate_cfm(&self) -> f64 {
        self.component.leak_rate_cfm() * f64::from(self.quantity)
    }
}

/// Leak rate contributed by one source group, kept for transparency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeakContribution {
    pub component: ComponentType,
    pub quantity: u32,
    /// Tabulated rate per unit (CFM)
    pub unit_rate_cfm: f64,
    /// unit_rate × quantity (CFM)
    pub leak_rate_cfm: f64,
}

impl From<&LeakSource> for LeakContribution {
    fn from(source: &LeakSource) -> Self {
        LeakContribution {
            component: source.component,
            quantity: source.quantity,
            unit_rate_cfm: source.component.leak_rate_cfm(),
            leak_rate_cfm: source.leak_rate_cfm(),
        }
    }
}

/// Total leak rate Q_leak = Σ rate(component) × quantity, in CFM
pub fn total_leak_rate_cfm(sources: &[LeakSource]) -> f64 {
    sources.iter().map(LeakSource::leak_rate_cfm).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flange_rate() {
        let q = LeakSource::new(ComponentType::Flange, 10).leak_rate_cfm();
        assert!((q - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_quantity_is_noop() {
        let base = vec![
            LeakSource::new(ComponentType::PumpSeal, 3),
            LeakSource::new(ComponentType::ReliefValve, 1),
        ];
        let mut with_zero = base.clone();
        with_zero.push(LeakSource::new(ComponentType::CompressorSeal, 0));

        assert_eq!(total_leak_rate_cfm(&base), total_leak_rate_cfm(&with_zero));
    }

    #[test]
    fn test_total_is_exact_sum() {
        let sources: Vec<_> = ComponentType::ALL.iter().map(|c| LeakSource::new(*c, 2)).collect();
        let expected = sources.iter().fold(0.0, |acc, s| acc + s.component.leak_rate_cfm() * 2.0);
        assert_eq!(total_leak_rate_cfm(&sources), expected);
        assert_eq!(total_leak_rate_cfm(&[]), 0.0);
    }

    #[test]
    fn test_code_matches_serde_name() {
        for c in ComponentType::ALL {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json, format!("\"{}\"", c.code()));
            assert_eq!(ComponentType::from_str_flexible(c.code()).unwrap(), c);
        }
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(
            "open_ended_line".parse::<ComponentType>().unwrap(),
            ComponentType::OpenEndedLine
        );
        let err = ComponentType::from_str_flexible("gasket").unwrap_err();
        assert_eq!(err.error_code(), "COMPONENT_NOT_FOUND");
    }
}
