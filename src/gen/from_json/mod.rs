//! The "JSON" grammar source, reading an L-system and its growth parameters from a file

use super::presets::{DEFAULT_BRANCH_LENGTH, DEFAULT_ITERATIONS, DEFAULT_LENGTH_REDUCTION};
use super::*;
use eyre::{eyre, Context};
use std::fs;
use std::path::Path;

mod config;

pub use config::ParsedConfig;
use config::ParsedGrammar;

/// A tree configuration parsed from a chosen JSON file
///
/// A file looks something like:
///
/// ```json
/// {
///     "grammar": { "axiom": "F", "angle": 30, "rules": { "F": "F[+F]F[-F]F" } },
///     "growth": { "iterations": 3, "initial_branch_length": 10 },
///     "root": [0, -15, 0]
/// }
/// ```
///
/// `"preset": "tree2"` may be given instead of `"grammar"`.
#[derive(Debug)]
pub struct FromJsonGrammar {
    config: GrowthConfig,
}

impl FromJsonGrammar {
    /// Produces a new `FromJsonGrammar` from the JSON at the given path
    pub fn from_file(file: &Path) -> eyre::Result<Self> {
        let file_content = fs::read_to_string(file)
            .wrap_err_with(|| format!("failed to read file at {:?}", file.to_string_lossy()))?;

        Self::from_json(&file_content)
    }

    /// Produces a new `FromJsonGrammar` from the JSON string
    pub fn from_json(json: &str) -> eyre::Result<Self> {
        let parsed =
            serde_json::from_str(json).wrap_err("could not deserialize JSON structure")?;

        Self::from_parsed(parsed)
    }

    /// Returns the configuration described by the file
    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn into_config(self) -> GrowthConfig {
        self.config
    }

    fn from_parsed(parsed: ParsedConfig) -> eyre::Result<Self> {
        let (grammar, default_root) = match (parsed.grammar, parsed.preset) {
            (Some(g), None) => (Self::convert_grammar(g)?, Point::ORIGIN),
            (None, Some(name)) => {
                let preset = name
                    .parse::<Preset>()
                    .context("invalid value at .preset in JSON grammar spec")?;
                (preset.grammar(), preset.root_position())
            }
            (Some(_), Some(_)) => {
                return Err(eyre!("only one of `grammar` and `preset` may be given"))
                    .context("invalid JSON grammar spec");
            }
            (None, None) => {
                return Err(eyre!("one of `grammar` or `preset` must be given"))
                    .context("invalid JSON grammar spec");
            }
        };

        let growth = parsed.growth;
        let config = GrowthConfig {
            root_position: parsed.root.unwrap_or(default_root),
            grammar,
            iterations: growth.iterations.unwrap_or(DEFAULT_ITERATIONS),
            initial_branch_length: growth
                .initial_branch_length
                .unwrap_or(DEFAULT_BRANCH_LENGTH),
            length_reduction_factor: growth
                .length_reduction_factor
                .unwrap_or(DEFAULT_LENGTH_REDUCTION),
            capacity: parsed.capacity.unwrap_or_default(),
        };

        config
            .validate()
            .context("invalid parameters in JSON grammar spec")?;

        Ok(FromJsonGrammar { config })
    }

    /// Converts the parsed grammar, checking that every rule is keyed by a single character
    fn convert_grammar(parsed: ParsedGrammar) -> eyre::Result<Grammar> {
        let mut rules = Rules::new();

        for (key, replacement) in parsed.rules {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(eyre!("rule key {:?} must be exactly one character", key))
                        .context("invalid value at .grammar.rules in JSON grammar spec")
                }
            };

            rules.insert(symbol, replacement);
        }

        Ok(Grammar {
            axiom: parsed.axiom,
            rules,
            angle_degrees: parsed.angle,
        })
    }
}
