//! Display <-> simulation unit conversion
//!
//! Scene constants are authored in display pixels and converted once at
//! construction time. The solver only ever sees simulation units.

use super::Vec2;

/// Display pixels per simulation unit.
pub const DISPLAY_UNITS_PER_SIM_UNIT: f64 = 30.0;

pub trait UnitConversion: Sized {
    fn to_sim_units(self) -> Self;
    fn to_display_units(self) -> Self;
}

impl UnitConversion for f64 {
    #[inline]
    fn to_sim_units(self) -> f64 {
        self / DISPLAY_UNITS_PER_SIM_UNIT
    }

    #[inline]
    fn to_display_units(self) -> f64 {
        self * DISPLAY_UNITS_PER_SIM_UNIT
    }
}

impl UnitConversion for Vec2 {
    #[inline]
    fn to_sim_units(self) -> Vec2 {
        self / DISPLAY_UNITS_PER_SIM_UNIT
    }

    #[inline]
    fn to_display_units(self) -> Vec2 {
        self * DISPLAY_UNITS_PER_SIM_UNIT
    }
}
