//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::EngineConfig;
use crate::registry::EngineRegistry;

// ===========================================================================
// Definition documents
// ===========================================================================

/// A small but complete definition document: two releases, two languages,
/// properties of every type, two item lists (one of them the fuel model
/// list, filled by seeding), three modules, and a surface/crown/spot graph.
pub const SAMPLE_DEFINITION: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<definition release="2">
  <release number="1" description="Surface only" />
  <release number="2" description="Crown and spotting" />
  <language name="en_US" />
  <language name="es_MX" />
  <translate key="ModuleSurface" en_US="Surface" es_MX="Superficie" />
  <translate key="ModuleCrown" en_US="Crown" es_MX="Copa" />
  <translate key="ModuleSpot" en_US="Spotting" />
  <property name="appShowSplash" type="boolean" value="true" releaseFrom="1" releaseThru="2" />
  <property name="appFontSize" type="integer" value="12" releaseFrom="1" releaseThru="2" />
  <property name="graphLineWidth" type="real" value="1.5" releaseFrom="2" releaseThru="2" />
  <property name="graphBgColor" type="color" value="#ffffff" releaseFrom="1" releaseThru="2" />
  <property name="appTitle" type="string" value="Fire Workbench" releaseFrom="1" releaseThru="1" />
  <itemList name="SpreadDirection">
    <item name="HeadFire" sort="1" index="0" />
    <item name="FromIgPt" sort="2" index="1" />
  </itemList>
  <itemList name="FuelModelList">
  </itemList>
  <module name="surface" sort="1" textKey="ModuleSurface" indent="0" releaseFrom="1" releaseThru="2" />
  <module name="crown" sort="2" textKey="ModuleCrown" indent="0" releaseFrom="1" releaseThru="2" />
  <module name="spot" sort="3" textKey="ModuleSpot" indent="1" releaseFrom="2" releaseThru="2" />
  <file type="dir" name="FuelModels" perm="ERW" releaseFrom="1" releaseThru="2" />
  <file type="docHtml" name="Docs/index.html" perm="ER" releaseFrom="1" releaseThru="2" />
  <variable name="vSurfaceFuelBedModel" type="discrete" itemList="FuelModelList" help="Fuel model code" sortIn="010" releaseFrom="1" releaseThru="2" />
  <variable name="vSurfaceFuelBedDepth" type="continuous" nativeUnits="ft" nativeDecimals="2" displayUnits="ft" displayDecimals="1" alternateUnits="m" minimum="0" maximum="10" default="1" releaseFrom="1" releaseThru="2" />
  <variable name="vWindSpeedAtMidflame" type="continuous" nativeUnits="ft/min" displayUnits="mi/h" alternateUnits="km/h" maximum="10000" releaseFrom="1" releaseThru="2" />
  <variable name="vWindAdjFactor" type="continuous" nativeUnits="fraction" maximum="1" releaseFrom="1" releaseThru="2" />
  <variable name="vWindDirFromNorth" type="continuous" nativeUnits="deg" maximum="360" wrap="true" releaseFrom="1" releaseThru="2" />
  <variable name="vSurfaceFireSpreadDir" type="discrete" itemList="SpreadDirection" releaseFrom="1" releaseThru="2" />
  <variable name="vSurfaceFireSpreadAtHead" type="continuous" nativeUnits="ft/min" displayUnits="ch/h" alternateUnits="m/min" releaseFrom="1" releaseThru="2" />
  <variable name="vCrownFireSpreadRate" type="continuous" nativeUnits="ft/min" displayUnits="ch/h" releaseFrom="2" releaseThru="2" />
  <variable name="vSpotDistance" type="continuous" nativeUnits="ft" displayUnits="mi" releaseFrom="2" releaseThru="2" />
  <variable name="vDocDescription" type="text" releaseFrom="1" releaseThru="2" />
  <function name="FuelBedModel" input="vSurfaceFuelBedModel" output="vSurfaceFuelBedDepth" module="surface" releaseFrom="1" releaseThru="2" />
  <function name="WindAdjFactor" input="vSurfaceFuelBedDepth" output="vWindAdjFactor" module="crown" releaseFrom="1" releaseThru="2" />
  <function name="SurfaceSpread" input="vSurfaceFuelBedDepth" input="vWindSpeedAtMidflame" input="vWindAdjFactor" input="vWindDirFromNorth" input="vSurfaceFireSpreadDir" output="vSurfaceFireSpreadAtHead" module="surface" releaseFrom="1" releaseThru="2" />
  <function name="CrownSpread" input="vSurfaceFireSpreadAtHead" input="vWindSpeedAtMidflame" output="vCrownFireSpreadRate" module="crown" releaseFrom="2" releaseThru="2" />
  <function name="CrownFromSurface" input="vSurfaceFireSpreadAtHead" output="vCrownFireSpreadRate" module="surface" releaseFrom="2" releaseThru="2" />
  <function name="SpotDistance" input="vCrownFireSpreadRate" output="vSpotDistance" module="spot" releaseFrom="2" releaseThru="2" />
  <function name="DescribeRun" input="vDocDescription" releaseFrom="1" releaseThru="2" />
</definition>
"##;

/// Two releases, one continuous variable `v1` in feet, and one function
/// `f1` that reads it.
pub const MINIMAL_DEFINITION: &str = r#"<definition>
  <release number="1" />
  <release number="2" />
  <variable name="v1" type="continuous" nativeUnits="ft" releaseFrom="1" releaseThru="2" />
  <function name="f1" input="v1" releaseFrom="1" releaseThru="2" />
</definition>
"#;

/// A definition whose function names a variable declared after it.
pub const FORWARD_REFERENCE_DEFINITION: &str = r#"<definition>
  <release number="1" />
  <function name="f1" input="v1" output="v2" releaseFrom="1" releaseThru="1" />
  <variable name="v1" type="continuous" nativeUnits="ft" releaseFrom="1" releaseThru="1" />
  <variable name="v2" type="text" releaseFrom="1" releaseThru="1" />
</definition>
"#;

// ===========================================================================
// Record files
// ===========================================================================

/// Fuel model 14 in mixed units. Its code defaults to the file stem.
pub const SAMPLE_FUEL_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<BehavePlus type="FuelModel">
  <property name="appDescription" value="Custom short grass" />
  <property name="vSurfaceFuelBedModelNumber" value="14" />
  <property name="vSurfaceFuelBedDepth" value="1.2" units="ft" />
  <property name="vSurfaceFuelBedMextDead" value="15" units="%" />
  <property name="vSurfaceFuelHeatDead" value="8000" units="Btu/lb" />
  <property name="vSurfaceFuelHeatLive" value="8000" units="Btu/lb" />
  <property name="vSurfaceFuelLoadDead1" value="0.9" units="tons/ac" />
  <property name="vSurfaceFuelLoadDead10" value="0.1" units="tons/ac" />
  <property name="vSurfaceFuelLoadDead100" value="0" units="tons/ac" />
  <property name="vSurfaceFuelLoadLiveHerb" value="0.4" units="tons/ac" />
  <property name="vSurfaceFuelLoadLiveWood" value="0" units="tons/ac" />
  <property name="vSurfaceFuelSavrDead1" value="3500" units="ft2/ft3" />
  <property name="vSurfaceFuelSavrLiveHerb" value="1800" units="ft2/ft3" />
  <property name="vSurfaceFuelSavrLiveWood" value="1500" units="ft2/ft3" />
  <property name="vSurfaceFuelLoadTransferEq" value="Dynamic" />
</BehavePlus>
"#;

/// A moisture scenario in percent.
pub const SAMPLE_MOIS_SCENARIO: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<BehavePlus type="MoisScenario">
  <property name="appDescription" value="Late summer drought" />
  <property name="vSurfaceFuelMoisDead1" value="2" units="%" />
  <property name="vSurfaceFuelMoisDead10" value="3" units="%" />
  <property name="vSurfaceFuelMoisDead100" value="5" units="%" />
  <property name="vSurfaceFuelMoisLiveHerb" value="40" units="%" />
  <property name="vSurfaceFuelMoisLiveWood" value="70" units="%" />
</BehavePlus>
"#;

/// [`SAMPLE_FUEL_MODEL`] with the dead 1-h SAVR in a unit that is not an
/// area-to-volume ratio.
pub fn fuel_model_with_bad_savr_units() -> String {
    SAMPLE_FUEL_MODEL.replace(
        r#"name="vSurfaceFuelSavrDead1" value="3500" units="ft2/ft3""#,
        r#"name="vSurfaceFuelSavrDead1" value="3500" units="lb/ft2""#,
    )
}

/// [`SAMPLE_FUEL_MODEL`] with an explicit code and model number.
pub fn fuel_model_with_code(code: &str, number: u32) -> String {
    SAMPLE_FUEL_MODEL
        .replace(
            r#"<property name="vSurfaceFuelBedModelNumber" value="14" />"#,
            &format!(
                r#"<property name="vSurfaceFuelBedModelNumber" value="{number}" />
  <property name="vSurfaceFuelBedModelCode" value="{code}" />"#
            ),
        )
}

/// A definition document with `n` variables chained by `n - 1` functions.
pub fn chain_definition(n: usize) -> String {
    let mut doc = String::from("<definition>\n  <release number=\"1\" />\n");
    for i in 0..n {
        doc.push_str(&format!(
            "  <variable name=\"v{i}\" type=\"continuous\" nativeUnits=\"ft\" displayUnits=\"m\" />\n"
        ));
    }
    for i in 1..n {
        doc.push_str(&format!(
            "  <function name=\"f{i}\" input=\"v{}\" output=\"v{i}\" />\n",
            i - 1
        ));
    }
    doc.push_str("</definition>\n");
    doc
}

// ===========================================================================
// Registry constructors
// ===========================================================================

pub fn sample_registry() -> EngineRegistry {
    EngineRegistry::from_definition(SAMPLE_DEFINITION, &EngineConfig::default())
        .expect("sample definition builds")
}

pub fn minimal_registry() -> EngineRegistry {
    EngineRegistry::from_definition(MINIMAL_DEFINITION, &EngineConfig::default())
        .expect("minimal definition builds")
}
