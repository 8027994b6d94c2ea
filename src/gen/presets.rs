//! Built-in grammars, so that there's always something to grow without writing a JSON file

use super::*;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Number of iterations used when a preset is grown without an explicit count
pub const DEFAULT_ITERATIONS: usize = 2;

/// Length of the first branch used when a preset is grown without an explicit length
pub const DEFAULT_BRANCH_LENGTH: Float = 10.0;

/// Length reduction factor used for every preset unless overridden
pub const DEFAULT_LENGTH_REDUCTION: Float = 0.05;

/// One of the named example trees
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    /// The classic "weed": `F -> F[+F]F[-F]F` at 30°
    Tree1,
    /// A simple tree with a three-segment trunk, branching at 25°
    Tree2,
    /// Bushy, with branches turned about two axes at once
    Tree3,
    /// Seaweed: long fronds, branching at 15°
    Tree4,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Tree1, Preset::Tree2, Preset::Tree3, Preset::Tree4];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Tree1 => "tree1",
            Preset::Tree2 => "tree2",
            Preset::Tree3 => "tree3",
            Preset::Tree4 => "tree4",
        }
    }

    /// Looks up a preset by name, ignoring case
    pub fn from_name(name: &str) -> Option<Preset> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn grammar(&self) -> Grammar {
        match self {
            Preset::Tree1 => Grammar::new("F", 30.0, &[('F', "F[+F]F[-F]F")]),
            Preset::Tree2 => Grammar::new("fffA", 25.0, &[('A', "f[++A]<[--A]>>>A")]),
            Preset::Tree3 => Grammar::new("F", 25.0, &[('F', "F[^+F]F[->F][->F][^F]")]),
            Preset::Tree4 => Grammar::new("f", 15.0, &[('f', "ff-[<f>f>f]+[<f>f>f]^[>f>f<f]")]),
        }
    }

    /// Where the tree is rooted. The larger trees start further down so that they stay in view
    pub fn root_position(&self) -> Point {
        match self {
            Preset::Tree1 | Preset::Tree2 => Point::new(0.0, -15.0, 0.0),
            Preset::Tree3 | Preset::Tree4 => Point::new(0.0, -50.0, 0.0),
        }
    }

    /// Produces the full configuration for growing this preset
    pub fn config(&self, iterations: usize, initial_branch_length: Float) -> GrowthConfig {
        GrowthConfig {
            root_position: self.root_position(),
            grammar: self.grammar(),
            iterations,
            initial_branch_length,
            length_reduction_factor: DEFAULT_LENGTH_REDUCTION,
            capacity: Capacity::default(),
        }
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        Preset::from_name(s).ok_or_else(|| {
            let names: Vec<_> = Preset::ALL.iter().map(Preset::name).collect();
            eyre::eyre!("unknown preset {:?}, expected one of: {}", s, names.join(", "))
        })
    }
}
