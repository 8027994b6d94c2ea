//! Wrapper module for the config structure, rooted at [`ParsedConfig`]

use crate::float::Float;
use crate::skeleton::Capacity;
use crate::Point;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedConfig {
    /// The grammar to grow. Exactly one of this and `preset` must be given
    pub grammar: Option<ParsedGrammar>,

    /// The name of a built-in grammar to grow, instead of `grammar`
    pub preset: Option<String>,

    #[serde(default)]
    pub growth: GrowthSettings,

    /// Position of the root of the tree, as `[x, y, z]`
    ///
    /// If absent, the preset's root is used, or the origin for a custom grammar.
    pub root: Option<Point>,

    /// Overrides the default sizes of the output buffers
    pub capacity: Option<Capacity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedGrammar {
    pub axiom: String,

    /// The turn angle, in degrees
    pub angle: Float,

    /// Map of symbol to replacement. Keys are kept as strings here so that we can give a useful
    /// error for keys that aren't a single character
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

/// Parameters for growing the grammar. Any that are absent take the preset defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrowthSettings {
    pub iterations: Option<usize>,
    pub initial_branch_length: Option<Float>,
    pub length_reduction_factor: Option<Float>,
}
