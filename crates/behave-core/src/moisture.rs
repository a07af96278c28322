//! Fuel moisture scenarios.

use crate::record::{DESCRIPTION_FIELD, RawRecord, RecordError, RecordWriter, record_code};
use crate::units::UnitConverter;

pub const FIELD_CODE: &str = "vSurfaceFuelMoisScenario";
pub const FIELD_DEAD1: &str = "vSurfaceFuelMoisDead1";
pub const FIELD_DEAD10: &str = "vSurfaceFuelMoisDead10";
pub const FIELD_DEAD100: &str = "vSurfaceFuelMoisDead100";
pub const FIELD_LIVE_HERB: &str = "vSurfaceFuelMoisLiveHerb";
pub const FIELD_LIVE_WOOD: &str = "vSurfaceFuelMoisLiveWood";

const MOISTURE_UNITS: &str = "fraction";

/// A named set of fuel moisture contents, stored as fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct MoisScenario {
    pub code: String,
    pub description: String,
    pub dead1: f64,
    pub dead10: f64,
    pub dead100: f64,
    pub live_herb: f64,
    pub live_wood: f64,
}

impl MoisScenario {
    pub fn parse(
        text: &str,
        default_code: &str,
        units: &dyn UnitConverter,
    ) -> Result<Self, RecordError> {
        let raw = RawRecord::parse(text)?;
        Self::from_raw(&raw, default_code, units)
    }

    pub fn from_raw(
        raw: &RawRecord,
        default_code: &str,
        units: &dyn UnitConverter,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            code: record_code(raw, FIELD_CODE, default_code)?,
            description: raw.description(),
            dead1: raw.number(FIELD_DEAD1, MOISTURE_UNITS, units)?,
            dead10: raw.number(FIELD_DEAD10, MOISTURE_UNITS, units)?,
            dead100: raw.number(FIELD_DEAD100, MOISTURE_UNITS, units)?,
            live_herb: raw.number(FIELD_LIVE_HERB, MOISTURE_UNITS, units)?,
            live_wood: raw.number(FIELD_LIVE_WOOD, MOISTURE_UNITS, units)?,
        })
    }

    /// Scenarios sort by code.
    pub fn sort_key(&self) -> String {
        self.code.clone()
    }

    pub fn to_record_string(&self) -> String {
        let mut w = RecordWriter::new("MoisScenario");
        w.text(DESCRIPTION_FIELD, &self.description)
            .text(FIELD_CODE, &self.code)
            .number(FIELD_DEAD1, self.dead1, MOISTURE_UNITS)
            .number(FIELD_DEAD10, self.dead10, MOISTURE_UNITS)
            .number(FIELD_DEAD100, self.dead100, MOISTURE_UNITS)
            .number(FIELD_LIVE_HERB, self.live_herb, MOISTURE_UNITS)
            .number(FIELD_LIVE_WOOD, self.live_wood, MOISTURE_UNITS);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::StandardUnits;

    const DRY: &str = r#"<BehavePlus type="MoisScenario">
  <property name="appDescription" value="Very dry" />
  <property name="vSurfaceFuelMoisDead1" value="3" units="%" />
  <property name="vSurfaceFuelMoisDead10" value="4" units="%" />
  <property name="vSurfaceFuelMoisDead100" value="5" units="%" />
  <property name="vSurfaceFuelMoisLiveHerb" value="0.3" units="fraction" />
  <property name="vSurfaceFuelMoisLiveWood" value="60" units="percent" />
</BehavePlus>"#;

    #[test]
    fn parse_converts_percent_to_fraction() {
        let ms = MoisScenario::parse(DRY, "VeryDry", &StandardUnits::new()).unwrap();
        assert_eq!(ms.code, "VeryDry");
        assert!((ms.dead1 - 0.03).abs() < 1e-12);
        assert!((ms.live_herb - 0.3).abs() < 1e-12);
        assert!((ms.live_wood - 0.6).abs() < 1e-12);
    }

    #[test]
    fn missing_live_wood_is_an_error() {
        let text = DRY.replace(
            "  <property name=\"vSurfaceFuelMoisLiveWood\" value=\"60\" units=\"percent\" />\n",
            "",
        );
        assert!(matches!(
            MoisScenario::parse(&text, "x", &StandardUnits::new()),
            Err(RecordError::MissingField(FIELD_LIVE_WOOD))
        ));
    }

    #[test]
    fn moisture_in_length_units_fails() {
        let text = DRY.replace("value=\"3\" units=\"%\"", "value=\"3\" units=\"ft\"");
        assert!(matches!(
            MoisScenario::parse(&text, "x", &StandardUnits::new()),
            Err(RecordError::Units { .. })
        ));
    }

    #[test]
    fn record_string_reads_back() {
        let units = StandardUnits::new();
        let ms = MoisScenario::parse(DRY, "VeryDry", &units).unwrap();
        let again = MoisScenario::parse(&ms.to_record_string(), "ignored", &units).unwrap();
        assert_eq!(again, ms);
    }
}
