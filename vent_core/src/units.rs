//! # Unit Types
//!
//! Type-safe wrappers for the Imperial units used by ventilation sizing.
//! These provide compile-time safety against unit confusion while remaining
//! lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Ventilation sizing per AGA XL1001 / API RP 500 uses one consistent unit set
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## US Customary Units
//!
//! - Length: feet (ft)
//! - Area / volume: square feet (ft²), cubic feet (ft³)
//! - Temperature: degrees Fahrenheit (°F), degrees Rankine (°R, absolute)
//! - Velocity: miles per hour (mph), feet per minute (fpm)
//! - Airflow: cubic feet per minute (CFM)
//!
//! ## Example
//!
//! ```rust
//! use vent_core::units::{Fahrenheit, Rankine, Mph, FtPerMin};
//!
//! let inside: Rankine = Fahrenheit(70.0).into();
//! assert!((inside.0 - 529.67).abs() < 1e-9);
//!
//! let wind: FtPerMin = Mph(10.0).into();
//! assert_eq!(wind.0, 880.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Offset between the Fahrenheit and Rankine scales
pub const RANKINE_OFFSET: f64 = 459.67;

/// Feet per minute in one mile per hour (5280 ft / 60 min)
pub const FPM_PER_MPH: f64 = 88.0;

// ============================================================================
// Length, Area, Volume
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CuFt(pub f64);

impl Mul for Feet {
    type Output = SqFt;
    fn mul(self, rhs: Feet) -> SqFt {
        SqFt(self.0 * rhs.0)
    }
}

impl Mul<Feet> for SqFt {
    type Output = CuFt;
    fn mul(self, rhs: Feet) -> CuFt {
        CuFt(self.0 * rhs.0)
    }
}

// ============================================================================
// Temperature
// ============================================================================

/// Temperature in degrees Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fahrenheit(pub f64);

/// Absolute temperature in degrees Rankine
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rankine(pub f64);

impl From<Fahrenheit> for Rankine {
    fn from(f: Fahrenheit) -> Self {
        Rankine(f.0 + RANKINE_OFFSET)
    }
}

// ============================================================================
// Velocity
// ============================================================================

/// Velocity in miles per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mph(pub f64);

/// Velocity in feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FtPerMin(pub f64);

impl From<Mph> for FtPerMin {
    fn from(mph: Mph) -> Self {
        FtPerMin(mph.0 * FPM_PER_MPH)
    }
}

// ============================================================================
// Airflow
// ============================================================================

/// Airflow in cubic feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfm(pub f64);

/// Airflow capacity per unit of free opening area (CFM/ft², numerically fpm)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CfmPerSqFt(pub f64);

impl Div<CfmPerSqFt> for Cfm {
    type Output = SqFt;
    fn div(self, rhs: CfmPerSqFt) -> SqFt {
        SqFt(self.0 / rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(SqFt);
impl_arithmetic!(CuFt);
impl_arithmetic!(Fahrenheit);
impl_arithmetic!(Rankine);
impl_arithmetic!(Mph);
impl_arithmetic!(FtPerMin);
impl_arithmetic!(Cfm);
impl_arithmetic!(CfmPerSqFt);
