//! Surface fuel models.

use crate::record::{DESCRIPTION_FIELD, RawRecord, RecordError, RecordWriter, record_code};
use crate::units::UnitConverter;

pub const FIELD_CODE: &str = "vSurfaceFuelBedModelCode";
pub const FIELD_NUMBER: &str = "vSurfaceFuelBedModelNumber";
pub const FIELD_DEPTH: &str = "vSurfaceFuelBedDepth";
pub const FIELD_MEXT_DEAD: &str = "vSurfaceFuelBedMextDead";
pub const FIELD_HEAT_DEAD: &str = "vSurfaceFuelHeatDead";
pub const FIELD_HEAT_LIVE: &str = "vSurfaceFuelHeatLive";
pub const FIELD_LOAD_DEAD1: &str = "vSurfaceFuelLoadDead1";
pub const FIELD_LOAD_DEAD10: &str = "vSurfaceFuelLoadDead10";
pub const FIELD_LOAD_DEAD100: &str = "vSurfaceFuelLoadDead100";
pub const FIELD_LOAD_LIVE_HERB: &str = "vSurfaceFuelLoadLiveHerb";
pub const FIELD_LOAD_LIVE_WOOD: &str = "vSurfaceFuelLoadLiveWood";
pub const FIELD_SAVR_DEAD1: &str = "vSurfaceFuelSavrDead1";
pub const FIELD_SAVR_LIVE_HERB: &str = "vSurfaceFuelSavrLiveHerb";
pub const FIELD_SAVR_LIVE_WOOD: &str = "vSurfaceFuelSavrLiveWood";
pub const FIELD_LOAD_TRANSFER: &str = "vSurfaceFuelLoadTransferEq";

const DEPTH_UNITS: &str = "ft";
const MOISTURE_UNITS: &str = "fraction";
const HEAT_UNITS: &str = "Btu/lb";
const LOAD_UNITS: &str = "lb/ft2";
const SAVR_UNITS: &str = "ft2/ft3";

/// How live herbaceous load is transferred to dead with curing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadTransfer {
    #[default]
    Static,
    Dynamic,
}

impl LoadTransfer {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "Static" | "static" | "S" => Some(LoadTransfer::Static),
            "Dynamic" | "dynamic" | "D" => Some(LoadTransfer::Dynamic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadTransfer::Static => "Static",
            LoadTransfer::Dynamic => "Dynamic",
        }
    }
}

/// A surface fuel model in native units: depth in ft, moisture of
/// extinction as a fraction, heat in Btu/lb, loads in lb/ft2 and
/// surface-area-to-volume ratios in ft2/ft3.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelModel {
    pub code: String,
    pub number: Option<u32>,
    pub description: String,
    pub depth: f64,
    pub mext_dead: f64,
    pub heat_dead: f64,
    pub heat_live: f64,
    pub load_dead1: f64,
    pub load_dead10: f64,
    pub load_dead100: f64,
    pub load_live_herb: f64,
    pub load_live_wood: f64,
    pub savr_dead1: f64,
    pub savr_live_herb: f64,
    pub savr_live_wood: f64,
    pub load_transfer: LoadTransfer,
}

impl FuelModel {
    /// Read a fuel model from record text. `default_code` is used when the
    /// record carries no code field.
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
        let load_transfer = match raw.text(FIELD_LOAD_TRANSFER) {
            Some(text) => LoadTransfer::parse(text).ok_or_else(|| RecordError::InvalidChoice {
                field: FIELD_LOAD_TRANSFER,
                value: text.to_string(),
                expected: "Static or Dynamic",
            })?,
            None => LoadTransfer::Static,
        };
        let heat_dead = raw.number(FIELD_HEAT_DEAD, HEAT_UNITS, units)?;
        Ok(Self {
            code: record_code(raw, FIELD_CODE, default_code)?,
            number: raw.optional_u32(FIELD_NUMBER)?,
            description: raw.description(),
            depth: raw.number(FIELD_DEPTH, DEPTH_UNITS, units)?,
            mext_dead: raw.number(FIELD_MEXT_DEAD, MOISTURE_UNITS, units)?,
            heat_dead,
            heat_live: raw
                .optional_number(FIELD_HEAT_LIVE, HEAT_UNITS, units)?
                .unwrap_or(heat_dead),
            load_dead1: raw.number(FIELD_LOAD_DEAD1, LOAD_UNITS, units)?,
            load_dead10: raw.number(FIELD_LOAD_DEAD10, LOAD_UNITS, units)?,
            load_dead100: raw.number(FIELD_LOAD_DEAD100, LOAD_UNITS, units)?,
            load_live_herb: raw.number(FIELD_LOAD_LIVE_HERB, LOAD_UNITS, units)?,
            load_live_wood: raw.number(FIELD_LOAD_LIVE_WOOD, LOAD_UNITS, units)?,
            savr_dead1: raw.number(FIELD_SAVR_DEAD1, SAVR_UNITS, units)?,
            savr_live_herb: raw.number(FIELD_SAVR_LIVE_HERB, SAVR_UNITS, units)?,
            savr_live_wood: raw.number(FIELD_SAVR_LIVE_WOOD, SAVR_UNITS, units)?,
            load_transfer,
        })
    }

    /// Sort key within the fuel model list: the zero-padded model number,
    /// or the code for unnumbered models.
    pub fn sort_key(&self) -> String {
        match self.number {
            Some(n) => format!("{n:03}"),
            None => self.code.clone(),
        }
    }

    pub fn total_dead_load(&self) -> f64 {
        self.load_dead1 + self.load_dead10 + self.load_dead100
    }

    pub fn total_live_load(&self) -> f64 {
        self.load_live_herb + self.load_live_wood
    }

    /// Record text in native units.
    pub fn to_record_string(&self) -> String {
        let mut w = RecordWriter::new("FuelModel");
        w.text(DESCRIPTION_FIELD, &self.description)
            .text(FIELD_CODE, &self.code);
        if let Some(n) = self.number {
            w.text(FIELD_NUMBER, &n.to_string());
        }
        w.number(FIELD_DEPTH, self.depth, DEPTH_UNITS)
            .number(FIELD_MEXT_DEAD, self.mext_dead, MOISTURE_UNITS)
            .number(FIELD_HEAT_DEAD, self.heat_dead, HEAT_UNITS)
            .number(FIELD_HEAT_LIVE, self.heat_live, HEAT_UNITS)
            .number(FIELD_LOAD_DEAD1, self.load_dead1, LOAD_UNITS)
            .number(FIELD_LOAD_DEAD10, self.load_dead10, LOAD_UNITS)
            .number(FIELD_LOAD_DEAD100, self.load_dead100, LOAD_UNITS)
            .number(FIELD_LOAD_LIVE_HERB, self.load_live_herb, LOAD_UNITS)
            .number(FIELD_LOAD_LIVE_WOOD, self.load_live_wood, LOAD_UNITS)
            .number(FIELD_SAVR_DEAD1, self.savr_dead1, SAVR_UNITS)
            .number(FIELD_SAVR_LIVE_HERB, self.savr_live_herb, SAVR_UNITS)
            .number(FIELD_SAVR_LIVE_WOOD, self.savr_live_wood, SAVR_UNITS)
            .text(FIELD_LOAD_TRANSFER, self.load_transfer.as_str());
        w.finish()
    }
}
