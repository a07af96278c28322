//! Unit conversion between named units.
//!
//! The registry only needs a scale/offset pair between two unit names, so the
//! converter is a trait. [`StandardUnits`] is the table-driven implementation
//! covering the quantities fire-behavior definitions use. Every unit is stored
//! as `base = value * factor + offset` against the base unit of its dimension.

use std::collections::HashMap;

/// Errors from unit lookups and conversions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("cannot convert '{from}' to '{to}'")]
    Incompatible { from: String, to: String },
}

/// Physical dimension of a unit. Units convert only within a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    SurfaceAreaToVolume,
    Load,
    HeatOfCombustion,
    Ratio,
    Temperature,
    Speed,
    Density,
    Time,
    Angle,
    FirelineIntensity,
    HeatPerUnitArea,
}

/// Linear conversion: `to = from * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub factor: f64,
    pub offset: f64,
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion {
        factor: 1.0,
        offset: 0.0,
    };

    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }
}

/// Converts values between named units.
pub trait UnitConverter {
    /// Scale/offset pair from `from` to `to`.
    fn conversion(&self, from: &str, to: &str) -> Result<Conversion, UnitError>;

    fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
        Ok(self.conversion(from, to)?.apply(value))
    }

    fn is_convertible(&self, from: &str, to: &str) -> bool {
        self.conversion(from, to).is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
struct UnitDef {
    dimension: Dimension,
    factor: f64,
    offset: f64,
}

/// Table-driven converter for the standard unit names.
#[derive(Debug, Clone)]
pub struct StandardUnits {
    units: HashMap<String, UnitDef>,
}

const FT_PER_M: f64 = 3.280_839_895;
const LB_PER_KG: f64 = 2.204_622_621_8;

impl Default for StandardUnits {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardUnits {
    pub fn new() -> Self {
        use Dimension::*;
        let table: &[(&str, Dimension, f64, f64)] = &[
            // Length, base ft
            ("ft", Length, 1.0, 0.0),
            ("in", Length, 1.0 / 12.0, 0.0),
            ("yd", Length, 3.0, 0.0),
            ("ch", Length, 66.0, 0.0),
            ("mi", Length, 5280.0, 0.0),
            ("mm", Length, FT_PER_M / 1000.0, 0.0),
            ("cm", Length, FT_PER_M / 100.0, 0.0),
            ("m", Length, FT_PER_M, 0.0),
            ("km", Length, FT_PER_M * 1000.0, 0.0),
            // Surface area to volume ratio, base ft2/ft3
            ("ft2/ft3", SurfaceAreaToVolume, 1.0, 0.0),
            ("in2/in3", SurfaceAreaToVolume, 12.0, 0.0),
            ("m2/m3", SurfaceAreaToVolume, 1.0 / FT_PER_M, 0.0),
            ("cm2/cm3", SurfaceAreaToVolume, 100.0 / FT_PER_M, 0.0),
            // Fuel load, base lb/ft2
            ("lb/ft2", Load, 1.0, 0.0),
            ("tons/ac", Load, 2000.0 / 43560.0, 0.0),
            ("kg/m2", Load, LB_PER_KG / (FT_PER_M * FT_PER_M), 0.0),
            ("tonnes/ha", Load, 0.1 * LB_PER_KG / (FT_PER_M * FT_PER_M), 0.0),
            // Heat of combustion, base Btu/lb
            ("Btu/lb", HeatOfCombustion, 1.0, 0.0),
            ("kJ/kg", HeatOfCombustion, 0.429_922_614, 0.0),
            ("J/kg", HeatOfCombustion, 0.000_429_922_614, 0.0),
            // Ratios and moisture, base fraction
            ("fraction", Ratio, 1.0, 0.0),
            ("ratio", Ratio, 1.0, 0.0),
            ("%", Ratio, 0.01, 0.0),
            ("percent", Ratio, 0.01, 0.0),
            // Temperature, base oF
            ("oF", Temperature, 1.0, 0.0),
            ("oC", Temperature, 1.8, 32.0),
            ("K", Temperature, 1.8, -459.67),
            // Speed, base ft/min
            ("ft/min", Speed, 1.0, 0.0),
            ("ch/h", Speed, 66.0 / 60.0, 0.0),
            ("mi/h", Speed, 88.0, 0.0),
            ("m/min", Speed, FT_PER_M, 0.0),
            ("m/s", Speed, FT_PER_M * 60.0, 0.0),
            ("km/h", Speed, FT_PER_M * 1000.0 / 60.0, 0.0),
            // Density, base lb/ft3
            ("lb/ft3", Density, 1.0, 0.0),
            ("kg/m3", Density, LB_PER_KG / (FT_PER_M * FT_PER_M * FT_PER_M), 0.0),
            // Time, base min
            ("min", Time, 1.0, 0.0),
            ("s", Time, 1.0 / 60.0, 0.0),
            ("h", Time, 60.0, 0.0),
            ("days", Time, 1440.0, 0.0),
            // Angle, base degrees
            ("deg", Angle, 1.0, 0.0),
            ("degrees", Angle, 1.0, 0.0),
            ("rad", Angle, 180.0 / std::f64::consts::PI, 0.0),
            // Fireline intensity, base Btu/ft/s
            ("Btu/ft/s", FirelineIntensity, 1.0, 0.0),
            ("kW/m", FirelineIntensity, 0.288_894_658, 0.0),
            // Heat per unit area, base Btu/ft2
            ("Btu/ft2", HeatPerUnitArea, 1.0, 0.0),
            ("kJ/m2", HeatPerUnitArea, 0.088_054_834, 0.0),
        ];

        let mut units = HashMap::with_capacity(table.len());
        for &(name, dimension, factor, offset) in table {
            units.insert(
                name.to_string(),
                UnitDef {
                    dimension,
                    factor,
                    offset,
                },
            );
        }
        Self { units }
    }

    /// Define (or redefine) a unit relative to its dimension's base unit.
    pub fn define(&mut self, name: &str, dimension: Dimension, factor: f64, offset: f64) {
        self.units.insert(
            name.to_string(),
            UnitDef {
                dimension,
                factor,
                offset,
            },
        );
    }

    pub fn dimension(&self, name: &str) -> Option<Dimension> {
        self.units.get(name).map(|u| u.dimension)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }
}

impl UnitConverter for StandardUnits {
    fn conversion(&self, from: &str, to: &str) -> Result<Conversion, UnitError> {
        let a = self
            .units
            .get(from)
            .ok_or_else(|| UnitError::UnknownUnit(from.to_string()))?;
        let b = self
            .units
            .get(to)
            .ok_or_else(|| UnitError::UnknownUnit(to.to_string()))?;
        if a.dimension != b.dimension {
            return Err(UnitError::Incompatible {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if from == to {
            return Ok(Conversion::IDENTITY);
        }
        Ok(Conversion {
            factor: a.factor / b.factor,
            offset: (a.offset - b.offset) / b.factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn identity_conversion() {
        let units = StandardUnits::new();
        assert_eq!(units.conversion("ft", "ft").unwrap(), Conversion::IDENTITY);
    }

    #[test]
    fn length_conversions() {
        let units = StandardUnits::new();
        assert!(close(units.convert(1.0, "ch", "ft").unwrap(), 66.0));
        assert!(close(units.convert(12.0, "in", "ft").unwrap(), 1.0));
        assert!(close(units.convert(1.0, "m", "ft").unwrap(), 3.280839895));
    }

    #[test]
    fn fuel_load_conversion() {
        let units = StandardUnits::new();
        // 1 ton/acre = 2000 lb / 43560 ft2
        assert!(close(
            units.convert(1.0, "tons/ac", "lb/ft2").unwrap(),
            0.045913682
        ));
        let back = units.convert(0.045913682, "lb/ft2", "tons/ac").unwrap();
        assert!(close(back, 1.0));
    }

    #[test]
    fn savr_conversion() {
        let units = StandardUnits::new();
        // 1/cm = 30.48/ft
        assert!(close(units.convert(1.0, "cm2/cm3", "ft2/ft3").unwrap(), 30.48));
    }

    #[test]
    fn temperature_uses_offset() {
        let units = StandardUnits::new();
        assert!(close(units.convert(100.0, "oC", "oF").unwrap(), 212.0));
        assert!(close(units.convert(32.0, "oF", "oC").unwrap(), 0.0));
        assert!(close(units.convert(273.15, "K", "oC").unwrap(), 0.0));
    }

    #[test]
    fn percent_to_fraction() {
        let units = StandardUnits::new();
        assert!(close(units.convert(25.0, "%", "fraction").unwrap(), 0.25));
    }

    #[test]
    fn incompatible_dimensions_fail() {
        let units = StandardUnits::new();
        let err = units.conversion("ft", "lb/ft2").unwrap_err();
        assert!(matches!(err, UnitError::Incompatible { .. }));
        assert!(!units.is_convertible("ft2/ft3", "ft"));
    }

    #[test]
    fn unknown_unit_fails() {
        let units = StandardUnits::new();
        let err = units.conversion("furlongs", "ft").unwrap_err();
        assert_eq!(err, UnitError::UnknownUnit("furlongs".to_string()));
        assert!(format!("{err}").contains("furlongs"));
    }

    #[test]
    fn defined_units_participate() {
        let mut units = StandardUnits::new();
        units.define("furlongs", Dimension::Length, 660.0, 0.0);
        assert!(close(units.convert(1.0, "furlongs", "ch").unwrap(), 10.0));
        assert_eq!(units.dimension("furlongs"), Some(Dimension::Length));
    }
}
