//! Grammar data model and the compiler that indexes raw rules into a lookup table.
//!
//! A [`GrammarConfig`] is what an editor hands to [`parse`](crate::interpreter::parse).
//! [`compile`] turns its rule list into a [`SymbolTable`] of [`VariantGroup`]s and its
//! constants into a [`ConstantTable`]. Both tables live only for one parse.

use crate::error::GrammarError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Allowed deviation of a variant group's total weight from 1.0.
pub const WEIGHT_TOLERANCE: f32 = 1e-2;

fn default_weight() -> f32 {
    1.0
}

/// A single production `symbol -> replacement`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier text. Must be exactly one ASCII letter.
    pub symbol: String,

    /// Relative selection weight among rules sharing the same symbol.
    #[serde(default = "default_weight")]
    pub weight: f32,

    /// Replacement string over the command/symbol alphabet.
    pub replacement: String,
}

impl Rule {
    pub fn new(symbol: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::weighted(symbol, 1.0, replacement)
    }

    pub fn weighted(
        symbol: impl Into<String>,
        weight: f32,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            weight,
            replacement: replacement.into(),
        }
    }
}

/// Everything a single parse needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Starting string.
    pub axiom: String,

    /// Named values usable as `command(name)` parameters.
    pub constants: Vec<(String, f32)>,

    /// Production rules, in priority/declaration order.
    pub rules: Vec<Rule>,

    /// Maximum number of nested substitutions.
    pub max_depth: u32,

    /// Default rotation angle in degrees for `+ - & ^ / \`.
    pub default_angle: f32,

    /// Initial line thickness.
    pub default_thickness: f32,

    /// Default factor for `<` (divide) and `>` (multiply).
    pub thickness_factor: f32,

    /// Seed for stochastic variant selection.
    pub seed: i32,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            axiom: String::new(),
            constants: Vec::new(),
            rules: Vec::new(),
            max_depth: 0,
            default_angle: 20.0,
            default_thickness: 0.05,
            thickness_factor: 0.707,
            seed: 15312,
        }
    }
}

impl GrammarConfig {
    pub fn new(axiom: impl Into<String>) -> Self {
        Self {
            axiom: axiom.into(),
            ..Default::default()
        }
    }

    pub fn with_axiom(mut self, axiom: impl Into<String>) -> Self {
        self.axiom = axiom.into();
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: f32) -> Self {
        self.constants.push((name.into(), value));
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.default_angle = degrees;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.default_thickness = thickness;
        self
    }

    pub fn with_thickness_factor(mut self, factor: f32) -> Self {
        self.thickness_factor = factor;
        self
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects non-finite numeric settings and constants, and a zero thickness factor.
    pub fn validate(&self) -> Result<(), GrammarError> {
        let fields = [
            ("default_angle", self.default_angle),
            ("default_thickness", self.default_thickness),
            ("thickness_factor", self.thickness_factor),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(GrammarError::InvalidConfig {
                    field,
                    value,
                    reason: "must be finite",
                });
            }
        }
        // `<` divides by the factor.
        if self.thickness_factor == 0.0 {
            return Err(GrammarError::InvalidConfig {
                field: "thickness_factor",
                value: self.thickness_factor,
                reason: "must not be zero",
            });
        }
        if let Some((name, value)) = self.constants.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GrammarError::InvalidConstant {
                name: name.clone(),
                value: *value,
            });
        }
        Ok(())
    }
}

/// One alternative replacement within a [`VariantGroup`].
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    /// Running sum of weights up to and including this variant.
    pub cumulative: f32,
    pub replacement: String,
}

/// All replacements registered for one symbol, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantGroup {
    variants: Vec<Variant>,
}

impl VariantGroup {
    fn push(&mut self, weight: f32, replacement: &str) {
        let cumulative = self.total() + weight;
        self.variants.push(Variant {
            cumulative,
            replacement: replacement.to_owned(),
        });
    }

    /// Sum of all weights in the group.
    pub fn total(&self) -> f32 {
        self.variants.last().map_or(0.0, |v| v.cumulative)
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn is_stochastic(&self) -> bool {
        self.variants.len() > 1
    }

    /// Picks the first variant whose cumulative weight reaches `draw`.
    ///
    /// Falls back to the last variant when rounding leaves `draw` above every
    /// cumulative value.
    pub fn select(&self, draw: f32) -> &str {
        self.variants
            .iter()
            .find(|v| v.cumulative >= draw)
            .or(self.variants.last())
            .map_or("", |v| v.replacement.as_str())
    }
}

/// Compiled rule lookup, keyed by symbol.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    groups: HashMap<char, VariantGroup>,
}

impl SymbolTable {
    pub fn get(&self, symbol: char) -> Option<&VariantGroup> {
        self.groups.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Named parameter values.
#[derive(Clone, Debug, Default)]
pub struct ConstantTable {
    values: HashMap<String, f32>,
}

impl ConstantTable {
    /// Builds the table by direct insertion. A repeated name overwrites the earlier value.
    pub fn from_pairs(pairs: &[(String, f32)]) -> Self {
        let mut values = HashMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            if let Some(previous) = values.insert(name.clone(), *value) {
                tracing::warn!(%name, previous, value, "duplicate constant shadows earlier value");
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn rule_symbol(index: usize, rule: &Rule) -> Result<char, GrammarError> {
    let mut chars = rule.symbol.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(GrammarError::MissingSymbol { rule: index }),
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
        _ => Err(GrammarError::InvalidSymbol {
            id: rule.symbol.clone(),
        }),
    }
}

/// Validates `rules` and groups them by symbol.
///
/// Fails fast on the first bad identifier, negative weight, or group whose
/// weights do not sum to 1.0 within [`WEIGHT_TOLERANCE`].
pub fn compile_rules(rules: &[Rule]) -> Result<SymbolTable, GrammarError> {
    let mut groups: HashMap<char, VariantGroup> = HashMap::new();
    // Declaration order of first appearance, so validation errors are reproducible.
    let mut order = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        let symbol = rule_symbol(index, rule)?;
        if rule.weight < 0.0 || rule.weight.is_nan() {
            return Err(GrammarError::NegativeWeight {
                symbol,
                weight: rule.weight,
            });
        }
        groups
            .entry(symbol)
            .or_insert_with(|| {
                order.push(symbol);
                VariantGroup::default()
            })
            .push(rule.weight, &rule.replacement);
    }

    for symbol in order {
        let total = groups.get(&symbol).map_or(0.0, VariantGroup::total);
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(GrammarError::WeightsDoNotSumToOne { symbol, total });
        }
    }

    Ok(SymbolTable { groups })
}

/// Compiles the rule and constant tables for one parse.
pub fn compile(config: &GrammarConfig) -> Result<(SymbolTable, ConstantTable), GrammarError> {
    config.validate()?;
    let symbols = compile_rules(&config.rules)?;
    let constants = ConstantTable::from_pairs(&config.constants);
    tracing::debug!(
        rules = config.rules.len(),
        groups = symbols.len(),
        constants = constants.len(),
        "compiled grammar"
    );
    Ok((symbols, constants))
}
