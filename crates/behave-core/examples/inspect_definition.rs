//! Inspect a definition document.
//!
//! Builds a registry from the given definition file (or the built-in sample
//! when none is given), then prints its modules, the functions each variable
//! feeds, and the fuel-model catalog.
//!
//! Run with: `cargo run -p behave-core --example inspect_definition -- path/to/definition.xml`

use std::path::PathBuf;

use behave_core::config::EngineConfig;
use behave_core::registry::EngineRegistry;
use behave_core::variable::VariableKind;

const SAMPLE: &str = r#"<definition>
  <release number="1" description="Sample" />
  <language name="en_US" />
  <translate key="ModuleSurface" en_US="Surface fire" />
  <module name="surface" textKey="ModuleSurface" />
  <variable name="vWindSpeedAtMidflame" type="continuous" nativeUnits="ft/min" displayUnits="mi/h" />
  <variable name="vSurfaceFuelBedModel" type="discrete" itemList="FuelModelList" />
  <variable name="vSurfaceFireSpreadAtHead" type="continuous" nativeUnits="ft/min" displayUnits="ch/h" />
  <function name="SurfaceSpread" input="vSurfaceFuelBedModel" input="vWindSpeedAtMidflame" output="vSurfaceFireSpreadAtHead" module="surface" />
</definition>
"#;

fn main() {
    let config = EngineConfig::default();
    let registry = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => EngineRegistry::from_file(&path, &config),
        None => EngineRegistry::from_definition(SAMPLE, &config),
    };
    let registry = match registry {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("definition error: {e}");
            std::process::exit(1);
        }
    };

    println!("release {}", registry.current_release());

    println!("\nmodules:");
    for module in registry.modules().iter() {
        println!(
            "  {:<12} {} ({} outputs)",
            module.name,
            registry.translate(&module.text_key),
            module.output_variables.len()
        );
    }

    println!("\nvariables:");
    for variable in registry.variables() {
        let kind = match &variable.kind {
            VariableKind::Continuous(c) => format!("{} -> {}", c.native_units, c.display_units),
            VariableKind::Discrete(_) => "discrete".to_string(),
            VariableKind::Text => "text".to_string(),
        };
        let consumers: Vec<&str> = registry
            .consumers_of(&variable.name)
            .unwrap_or_default()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        let owner = registry
            .find_producer_module(&variable.name)
            .unwrap_or_default();
        println!(
            "  {:<28} [{kind}] module '{owner}' feeds {consumers:?}",
            variable.name
        );
    }

    if let Some(list) = registry.domain_list("FuelModelList") {
        println!("\nfuel models:");
        for value in list.values() {
            println!("  {:>4}  {}", value.code, registry.translate(&value.label_key));
        }
    }
}
