//! Built-in domain values seeded into every registry: the 13 standard fire
//! behavior fuel models and the 16 standard moisture scenarios.

use crate::fuel::{FuelModel, LoadTransfer};
use crate::moisture::MoisScenario;

const LB_FT2_PER_TON_AC: f64 = 2000.0 / 43560.0;
const STANDARD_HEAT: f64 = 8000.0;

// number, description, loads (1h, 10h, 100h, herb, wood) in tons/ac,
// SAVR (1h, herb, wood) in ft2/ft3, depth ft, dead extinction moisture %.
type FuelRow = (u32, &'static str, [f64; 5], [f64; 3], f64, f64);

const STANDARD_FUEL_MODELS: [FuelRow; 13] = [
    (1, "Short grass", [0.74, 0.0, 0.0, 0.0, 0.0], [3500.0, 1500.0, 1500.0], 1.0, 12.0),
    (2, "Timber grass and understory", [2.0, 1.0, 0.5, 0.5, 0.0], [3000.0, 1500.0, 1500.0], 1.0, 15.0),
    (3, "Tall grass", [3.01, 0.0, 0.0, 0.0, 0.0], [1500.0, 1500.0, 1500.0], 2.5, 25.0),
    (4, "Chaparral", [5.01, 4.01, 2.0, 0.0, 5.01], [2000.0, 1500.0, 1500.0], 6.0, 20.0),
    (5, "Brush", [1.0, 0.5, 0.0, 0.0, 2.0], [2000.0, 1500.0, 1500.0], 2.0, 20.0),
    (6, "Dormant brush, hardwood slash", [1.5, 2.5, 2.0, 0.0, 0.0], [1750.0, 1500.0, 1500.0], 2.5, 25.0),
    (7, "Southern rough", [1.13, 1.87, 1.5, 0.0, 0.37], [1750.0, 1500.0, 1550.0], 2.5, 40.0),
    (8, "Short needle litter", [1.5, 1.0, 2.5, 0.0, 0.0], [2000.0, 1500.0, 1500.0], 0.2, 30.0),
    (9, "Long needle or hardwood litter", [2.92, 0.41, 0.15, 0.0, 0.0], [2500.0, 1500.0, 1500.0], 0.2, 25.0),
    (10, "Timber litter and understory", [3.01, 2.0, 5.01, 0.0, 2.0], [2000.0, 1500.0, 1500.0], 1.0, 25.0),
    (11, "Light logging slash", [1.5, 4.51, 5.51, 0.0, 0.0], [1500.0, 1500.0, 1500.0], 1.0, 15.0),
    (12, "Medium logging slash", [4.01, 14.03, 16.53, 0.0, 0.0], [1500.0, 1500.0, 1500.0], 2.3, 20.0),
    (13, "Heavy logging slash", [7.01, 23.04, 28.05, 0.0, 0.0], [1500.0, 1500.0, 1500.0], 3.0, 25.0),
];

/// The 13 standard fuel models, in native units, ordered by number.
pub fn standard_fuel_models() -> Vec<FuelModel> {
    STANDARD_FUEL_MODELS
        .iter()
        .map(|&(number, description, loads, savr, depth, mext)| FuelModel {
            code: number.to_string(),
            number: Some(number),
            description: description.to_string(),
            depth,
            mext_dead: mext / 100.0,
            heat_dead: STANDARD_HEAT,
            heat_live: STANDARD_HEAT,
            load_dead1: loads[0] * LB_FT2_PER_TON_AC,
            load_dead10: loads[1] * LB_FT2_PER_TON_AC,
            load_dead100: loads[2] * LB_FT2_PER_TON_AC,
            load_live_herb: loads[3] * LB_FT2_PER_TON_AC,
            load_live_wood: loads[4] * LB_FT2_PER_TON_AC,
            savr_dead1: savr[0],
            savr_live_herb: savr[1],
            savr_live_wood: savr[2],
            load_transfer: LoadTransfer::Static,
        })
        .collect()
}

// Dead 1h/10h/100h moisture in percent per dryness class.
const DEAD_CLASSES: [(&str, &str, [f64; 3]); 4] = [
    ("D1", "Very low dead", [3.0, 4.0, 5.0]),
    ("D2", "Low dead", [6.0, 7.0, 8.0]),
    ("D3", "Moderate dead", [9.0, 10.0, 11.0]),
    ("D4", "High dead", [12.0, 13.0, 14.0]),
];

// Live herb/wood moisture in percent per greenness class.
const LIVE_CLASSES: [(&str, &str, [f64; 2]); 4] = [
    ("L1", "fully cured herb", [30.0, 60.0]),
    ("L2", "2/3 cured herb", [60.0, 90.0]),
    ("L3", "1/3 cured herb", [90.0, 120.0]),
    ("L4", "fully green herb", [120.0, 150.0]),
];

/// The 16 standard moisture scenarios `D1L1` through `D4L4`, as fractions.
pub fn standard_mois_scenarios() -> Vec<MoisScenario> {
    let mut out = Vec::with_capacity(DEAD_CLASSES.len() * LIVE_CLASSES.len());
    for (dead_code, dead_text, dead) in DEAD_CLASSES {
        for (live_code, live_text, live) in LIVE_CLASSES {
            out.push(MoisScenario {
                code: format!("{dead_code}{live_code}"),
                description: format!("{dead_text}, {live_text}"),
                dead1: dead[0] / 100.0,
                dead10: dead[1] / 100.0,
                dead100: dead[2] / 100.0,
                live_herb: live[0] / 100.0,
                live_wood: live[1] / 100.0,
            });
        }
    }
    out
}
