//! Spell variable calculation: evaluates an ability's data values and calculations against a
//! character's base stats, one value per star level.

mod eval;
mod formula;
mod value;

pub use eval::{compute_spell_variables, SpellVariables, AP_BASELINE, STAR_LEVELS};
pub use formula::{Calculation, DataValue, FormulaPart, SpellDefinition, StatFormula, StatKind};
pub use value::{format_number, DisplayFormat, SpellValue, DEFAULT_PRECISION};
