//! Formula evaluation.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::debug;

use crate::data::StatBlock;
use crate::error::{MergeError, Result};
use crate::spell::formula::{Calculation, DataValue, FormulaPart, SpellDefinition, StatFormula, StatKind};
use crate::spell::value::{DisplayFormat, SpellValue};

/// Star levels evaluated for every variable; they index `mValues` directly.
pub const STAR_LEVELS: [usize; 3] = [1, 2, 3];

/// Ability power of an unitemized champion (100%).
pub const AP_BASELINE: f64 = 1.0;

/// Resolved variables of one spell, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpellVariables {
    values: BTreeMap<String, SpellValue>,
}

impl SpellVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable; returns the previous value under the same (case-folded) name.
    pub fn insert(&mut self, name: &str, value: SpellValue) -> Option<SpellValue> {
        self.values.insert(name.to_lowercase(), value)
    }

    pub fn get(&self, name: &str) -> Option<&SpellValue> {
        self.values.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for SpellVariables {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (name, value) in iter {
            variables.insert(name, SpellValue::scalar(value));
        }
        variables
    }
}

/// Evaluate every data value and calculation of the ability entry `spell_key` against `stats`.
pub fn compute_spell_variables(
    spell_key: &str,
    ability_entry: &Value,
    stats: &StatBlock,
) -> Result<SpellVariables> {
    let definition = SpellDefinition::from_ability_entry(spell_key, ability_entry)?;
    Evaluator::new(spell_key, &definition, stats)?.evaluate_all()
}

struct Evaluator<'a> {
    spell: &'a str,
    definition: &'a SpellDefinition,
    stats: &'a StatBlock,
    data_values: HashMap<String, &'a DataValue>,
    calculations: HashMap<String, (&'a str, &'a Calculation)>,
}

impl<'a> Evaluator<'a> {
    fn new(spell: &'a str, definition: &'a SpellDefinition, stats: &'a StatBlock) -> Result<Self> {
        let mut data_values = HashMap::new();
        for value in &definition.data_values {
            if data_values.insert(value.name.to_lowercase(), value).is_some() {
                return Err(MergeError::formula(
                    spell,
                    format!("duplicate data value '{}'", value.name),
                ));
            }
        }
        let calculations = definition
            .calculations
            .iter()
            .map(|(name, calc)| (name.to_lowercase(), (name.as_str(), calc)))
            .collect();
        Ok(Self {
            spell,
            definition,
            stats,
            data_values,
            calculations,
        })
    }

    fn fault(&self, reason: impl Into<String>) -> MergeError {
        MergeError::formula(self.spell, reason)
    }

    fn evaluate_all(&self) -> Result<SpellVariables> {
        let definition = self.definition;
        let mut variables = SpellVariables::new();

        for value in &definition.data_values {
            // Entries without mValues are not variables; reading one is a fault.
            if value.values.is_empty() {
                debug!(spell = self.spell, data_value = %value.name, "data value has no mValues");
                continue;
            }
            let ranks = STAR_LEVELS
                .iter()
                .map(|&rank| self.data_value(&value.name, rank))
                .collect::<Result<Vec<_>>>()?;
            variables.insert(&value.name, SpellValue::by_rank(ranks));
        }

        for (name, calculation) in &definition.calculations {
            let ranks = STAR_LEVELS
                .iter()
                .map(|&rank| self.calculation(name, rank, &mut Vec::new()))
                .collect::<Result<Vec<_>>>()?;
            let format = self.display_format(calculation, &mut Vec::new())?;
            if variables
                .insert(name, SpellValue::by_rank(ranks).with_format(format))
                .is_some()
            {
                return Err(self.fault(format!(
                    "variable '{name}' is defined more than once"
                )));
            }
        }

        Ok(variables)
    }

    fn data_value(&self, name: &str, rank: usize) -> Result<f64> {
        let value = self
            .data_values
            .get(&name.to_lowercase())
            .ok_or_else(|| self.fault(format!("unknown data value '{name}'")))?;
        if value.values.is_empty() {
            return Err(self.fault(format!("data value '{}' has no mValues", value.name)));
        }
        value.values.get(rank).copied().ok_or_else(|| {
            self.fault(format!(
                "data value '{}' has {} entries, star level {rank} is out of range",
                value.name,
                value.values.len()
            ))
        })
    }

    fn lookup_calculation(&self, name: &str) -> Result<(&'a str, &'a Calculation)> {
        self.calculations
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| self.fault(format!("unknown calculation '{name}'")))
    }

    /// `stack` holds the calculations being evaluated, to reject reference cycles.
    fn calculation(&self, name: &str, rank: usize, stack: &mut Vec<&'a str>) -> Result<f64> {
        let (key, calculation) = self.lookup_calculation(name)?;
        if stack.contains(&key) {
            stack.push(key);
            return Err(self.fault(format!("calculation cycle: {}", stack.join(" -> "))));
        }
        stack.push(key);
        let result = match calculation {
            Calculation::GameCalculation {
                parts, multiplier, ..
            } => {
                let sum = parts
                    .iter()
                    .map(|part| self.part(part, rank))
                    .sum::<Result<f64>>()?;
                sum * self.multiplier(multiplier.as_deref(), rank)?
            }
            Calculation::GameCalculationModified { base, multiplier } => {
                self.calculation(base, rank, stack)? * self.multiplier(multiplier.as_deref(), rank)?
            }
        };
        stack.pop();
        Ok(result)
    }

    /// Modified calculations display like the calculation they modify.
    fn display_format(
        &self,
        calculation: &'a Calculation,
        stack: &mut Vec<&'a str>,
    ) -> Result<DisplayFormat> {
        match calculation {
            Calculation::GameCalculation {
                display_as_percent,
                precision,
                ..
            } => Ok(DisplayFormat {
                percent: *display_as_percent,
                precision: *precision,
            }),
            Calculation::GameCalculationModified { base, .. } => {
                let (key, base_calc) = self.lookup_calculation(base)?;
                if stack.contains(&key) {
                    return Err(self.fault(format!("calculation cycle through '{key}'")));
                }
                stack.push(key);
                self.display_format(base_calc, stack)
            }
        }
    }

    fn multiplier(&self, multiplier: Option<&FormulaPart>, rank: usize) -> Result<f64> {
        match multiplier {
            Some(part) => self.part(part, rank),
            None => Ok(1.0),
        }
    }

    fn part(&self, part: &FormulaPart, rank: usize) -> Result<f64> {
        match part {
            FormulaPart::NumberCalculationPart { number } => Ok(*number),
            FormulaPart::NamedDataValueCalculationPart { data_value } => {
                self.data_value(data_value, rank)
            }
            FormulaPart::StatByCoefficientCalculationPart {
                stat,
                formula,
                coefficient,
            } => Ok(self.stat(*stat, *formula)? * coefficient),
            FormulaPart::StatByNamedDataValueCalculationPart {
                stat,
                formula,
                data_value,
            } => Ok(self.stat(*stat, *formula)? * self.data_value(data_value, rank)?),
            FormulaPart::StatBySubPartCalculationPart {
                stat,
                formula,
                subpart,
            } => Ok(self.stat(*stat, *formula)? * self.part(subpart, rank)?),
            FormulaPart::SumOfSubPartsCalculationPart { subparts } => subparts
                .iter()
                .map(|sub| self.part(sub, rank))
                .sum::<Result<f64>>(),
            FormulaPart::ProductOfSubPartsCalculationPart { part1, part2 } => {
                Ok(self.part(part1, rank)? * self.part(part2, rank)?)
            }
            FormulaPart::ClampSubPartsCalculationPart {
                floor,
                ceiling,
                subparts,
            } => {
                let sum = subparts
                    .iter()
                    .map(|sub| self.part(sub, rank))
                    .sum::<Result<f64>>()?;
                let sum = floor.map_or(sum, |floor| sum.max(floor));
                Ok(ceiling.map_or(sum, |ceiling| sum.min(ceiling)))
            }
        }
    }

    fn stat(&self, code: u8, formula_code: u8) -> Result<f64> {
        let kind = StatKind::from_code(code)
            .ok_or_else(|| self.fault(format!("unknown stat code {code}")))?;
        let formula = StatFormula::from_code(formula_code)
            .ok_or_else(|| self.fault(format!("unknown stat formula {formula_code}")))?;
        let base = match kind {
            StatKind::AbilityPower => AP_BASELINE,
            StatKind::Armor => self.stats.base_armor,
            StatKind::AttackDamage => self.stats.base_damage,
            StatKind::AttackSpeed => self.stats.attack_speed,
            StatKind::MagicResist => self.stats.base_spell_block,
            StatKind::MoveSpeed => self.stats.base_move_speed,
            StatKind::CritChance => self.stats.base_crit_chance,
            StatKind::CritDamage => self.stats.crit_damage_multiplier,
            StatKind::MaxHealth | StatKind::CurrentHealth => self.stats.base_hp,
        };
        Ok(match formula {
            StatFormula::Base | StatFormula::Total => base,
            StatFormula::Bonus => 0.0,
        })
    }
}
