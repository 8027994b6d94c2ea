//! Tools for generating tree [`Skeleton`]s from L-system grammars
//!
//! The entrypoint is [`TreeGenerator::grow`], which rewrites the configured axiom and walks a
//! turtle ([`Cursor`]) along the result. Each symbol of a rule string is one of:
//!
//! * `+` / `-` -- turn about the X axis by ± the grammar's angle
//! * `^` / `v` -- turn about the Y axis
//! * `>` / `<` -- turn about the Z axis
//! * `[` -- save the turtle's state
//! * `]` -- restore the most recently saved state (ignored if nothing is saved)
//! * anything else -- expanded by its rule, or drawn as a branch once there's no rule for it or
//!   no iterations left to expand it with

use crate::cursor::{Axis, Cursor};
use crate::error::ConfigError;
use crate::float;
use crate::skeleton::{Capacity, Segment, Skeleton};
use crate::{Float, Point};
use serde::Serialize;
use std::collections::BTreeMap;

pub mod from_json;
pub mod presets;

pub use from_json::FromJsonGrammar;
pub use presets::Preset;

/// The maximum allowed number of iterations. Expansion recurses once per iteration, and the work
/// grows exponentially with it, so this is a practical limit rather than a hard one.
pub const MAX_ITERATIONS: usize = 32;

/// The rewrite rules of a grammar: the replacement string for each symbol that has one
pub type Rules = BTreeMap<char, String>;

/// An L-system: the starting string, how to rewrite it, and how far to turn for each rotation
#[derive(Clone, Debug, PartialEq)]
pub struct Grammar {
    pub axiom: String,
    pub rules: Rules,
    /// The angle turned by each rotation directive, in degrees
    pub angle_degrees: Float,
}

impl Grammar {
    /// Helper to build a grammar from string literals
    pub fn new(axiom: &str, angle_degrees: Float, rules: &[(char, &str)]) -> Self {
        Grammar {
            axiom: axiom.to_owned(),
            rules: rules.iter().map(|&(c, r)| (c, r.to_owned())).collect(),
            angle_degrees,
        }
    }
}

/// Everything that [`TreeGenerator::grow`] is a function of
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthConfig {
    /// Where the tree starts. This is always the first point of the skeleton
    pub root_position: Point,
    pub grammar: Grammar,
    /// The number of times symbols are rewritten before they're drawn
    pub iterations: usize,
    /// The length of the first branch drawn
    pub initial_branch_length: Float,
    /// The fraction that each branch is shorter than the one before it, within `0..1`
    pub length_reduction_factor: Float,
    pub capacity: Capacity,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        GrowthConfig {
            root_position: Point::ORIGIN,
            grammar: Grammar::new("f", 30.0, &[('f', "f[+f]f[-f]f")]),
            iterations: 1,
            initial_branch_length: 5.0,
            length_reduction_factor: 0.05,
            capacity: Capacity::default(),
        }
    }
}

impl GrowthConfig {
    /// Checks that the numeric parameters are all within range
    ///
    /// The grammar itself is never checked: any string is a valid axiom or rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let angle = self.grammar.angle_degrees;
        let reduction = self.length_reduction_factor;
        let length = self.initial_branch_length;
        let root = self.root_position;

        if !angle.is_finite() {
            return Err(ConfigError::NonFiniteAngle(angle));
        } else if !(0.0..1.0).contains(&reduction) {
            return Err(ConfigError::ReductionFactorOutOfRange(reduction));
        } else if !length.is_finite() || length <= 0.0 {
            return Err(ConfigError::InvalidBranchLength(length));
        } else if !root.is_finite() {
            return Err(ConfigError::NonFiniteRoot {
                x: root.x,
                y: root.y,
                z: root.z,
            });
        } else if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations {
                given: self.iterations,
                max: MAX_ITERATIONS,
            });
        } else if self.capacity.points == 0 {
            return Err(ConfigError::NoPointCapacity);
        }

        Ok(())
    }
}

/// Summary of a single call to [`TreeGenerator::grow`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GrowthReport {
    /// The number of points written, root included
    pub points: usize,
    /// The number of segments written
    pub segments: usize,
    /// The number of points that didn't fit in the point buffer
    ///
    /// Once *both* buffers are full, expansion stops at the next attempted branch, so when this is
    /// non-zero it's a lower bound on what the full tree would have needed.
    pub dropped_points: usize,
    /// The number of segments that didn't fit in the segment buffer. Like `dropped_points`, this
    /// is a lower bound when non-zero.
    pub dropped_segments: usize,
}

impl GrowthReport {
    /// Returns true if the skeleton is missing part of the tree
    pub fn is_truncated(&self) -> bool {
        self.dropped_points != 0 || self.dropped_segments != 0
    }
}

/// A single parsed symbol from a rule string
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Directive {
    /// Turn about the axis, positively or negatively
    Turn(Axis, bool),
    Push,
    Pop,
    /// Anything that isn't a turtle directive: expanded or drawn
    Symbol(char),
}

impl Directive {
    fn parse(c: char) -> Self {
        match c {
            '+' => Directive::Turn(Axis::X, true),
            '-' => Directive::Turn(Axis::X, false),
            '^' => Directive::Turn(Axis::Y, true),
            'v' => Directive::Turn(Axis::Y, false),
            '>' => Directive::Turn(Axis::Z, true),
            '<' => Directive::Turn(Axis::Z, false),
            '[' => Directive::Push,
            ']' => Directive::Pop,
            c => Directive::Symbol(c),
        }
    }
}

/// Generates tree skeletons, reusing the same output buffers for every call to [`grow`]
///
/// Calling `grow` needs `&mut self`, so a single generator can never be growing twice at once.
///
/// [`grow`]: Self::grow
#[derive(Debug, Clone)]
pub struct TreeGenerator {
    config: GrowthConfig,
    skeleton: Skeleton,
}

impl TreeGenerator {
    /// Creates a new generator, after checking the configuration
    ///
    /// The skeleton is empty until [`grow`](Self::grow) is called.
    pub fn new(config: GrowthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        warn_unreachable_rules(&config.grammar);

        Ok(TreeGenerator {
            skeleton: Skeleton::with_capacity(config.capacity),
            config,
        })
    }

    /// Replaces the configuration, leaving the generator untouched if the new one is invalid
    ///
    /// The output buffers are only reallocated if the capacity changed. The existing skeleton is
    /// left as-is until the next call to [`grow`](Self::grow).
    pub fn configure(&mut self, config: GrowthConfig) -> Result<(), ConfigError> {
        config.validate()?;
        warn_unreachable_rules(&config.grammar);

        if config.capacity != self.config.capacity {
            self.skeleton = Skeleton::with_capacity(config.capacity);
        }
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Regenerates the skeleton from scratch
    ///
    /// The buffers are emptied, the root point is written, and then the axiom is expanded
    /// `iterations` times. Symbols are processed strictly left-to-right, so sibling branches
    /// always appear in the order they're written in the grammar.
    pub fn grow(&mut self) -> GrowthReport {
        let config = &self.config;
        tracing::debug!(
            axiom = %config.grammar.axiom,
            iterations = config.iterations,
            angle = config.grammar.angle_degrees,
            "growing tree"
        );

        self.skeleton.reset();

        let root = Cursor::new(config.root_position, config.initial_branch_length);
        self.skeleton.push_point(root.origin);

        let mut expansion = Expansion {
            rules: &config.grammar.rules,
            angle: float::deg_to_rad(config.grammar.angle_degrees),
            length_reduction_factor: config.length_reduction_factor,
            skeleton: &mut self.skeleton,
            halted: false,
        };
        expansion.expand(root, &config.grammar.axiom, config.iterations);

        let report = GrowthReport {
            points: self.skeleton.point_count(),
            segments: self.skeleton.segment_count(),
            dropped_points: self.skeleton.dropped_points(),
            dropped_segments: self.skeleton.dropped_segments(),
        };

        if report.is_truncated() {
            tracing::warn!(
                dropped_points = report.dropped_points,
                dropped_segments = report.dropped_segments,
                capacity = ?self.skeleton.capacity(),
                "skeleton was truncated to fit its buffers"
            );
        }
        tracing::info!(
            points = report.points,
            segments = report.segments,
            "finished growing tree"
        );

        report
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn points(&self) -> &[Point] {
        self.skeleton.points()
    }

    pub fn segments(&self) -> &[Segment] {
        self.skeleton.segments()
    }

    pub fn point_count(&self) -> usize {
        self.skeleton.point_count()
    }

    pub fn segment_count(&self) -> usize {
        self.skeleton.segment_count()
    }
}

/// Rules keyed by a directive symbol are never looked up; that's allowed, but almost certainly a
/// mistake in the grammar
fn warn_unreachable_rules(grammar: &Grammar) {
    for &symbol in grammar.rules.keys() {
        if !matches!(Directive::parse(symbol), Directive::Symbol(_)) {
            tracing::warn!(%symbol, "rule for a directive symbol will never be used");
        }
    }
}

/// The state shared by every level of a single expansion
struct Expansion<'a> {
    rules: &'a Rules,
    /// The grammar's angle, in radians
    angle: Float,
    length_reduction_factor: Float,
    skeleton: &'a mut Skeleton,
    /// Set once a branch was attempted after both buffers filled up. Nothing else could be
    /// written, so there's no point continuing.
    halted: bool,
}

impl Expansion<'_> {
    /// Expands `rule` from the given cursor, with `depth` iterations left to go
    ///
    /// Returns the cursor as it was after the last symbol, so that any turns or moves made here
    /// carry on into the caller's remaining symbols.
    fn expand(&mut self, cursor: Cursor, rule: &str, depth: usize) -> Cursor {
        let rules = self.rules;

        let mut current = cursor;
        let mut stack: Vec<Cursor> = Vec::new();

        for c in rule.chars() {
            if self.halted {
                break;
            }

            match Directive::parse(c) {
                Directive::Turn(axis, positive) => {
                    let delta = if positive { self.angle } else { -self.angle };
                    current.rotate(axis, delta);
                }
                Directive::Push => stack.push(current),
                Directive::Pop => {
                    if let Some(saved) = stack.pop() {
                        current = saved;
                    }
                }
                Directive::Symbol(s) => match rules.get(&s) {
                    Some(replacement) if depth != 0 => {
                        current = self.expand(current, replacement, depth - 1);
                    }
                    _ => self.draw(&mut current),
                },
            }
        }

        current
    }

    /// Draws a single branch from the cursor, moving it to the branch's tip
    fn draw(&mut self, cursor: &mut Cursor) {
        if self.skeleton.is_saturated() {
            self.halted = true;
        }

        let segment = cursor.advance(self.length_reduction_factor);
        self.skeleton.push_branch(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn config(axiom: &str, angle: Float, rules: &[(char, &str)], iterations: usize) -> GrowthConfig {
        GrowthConfig {
            root_position: Point::new(0.0, -15.0, 0.0),
            grammar: Grammar::new(axiom, angle, rules),
            iterations,
            initial_branch_length: 10.0,
            length_reduction_factor: 0.05,
            capacity: Capacity::default(),
        }
    }

    fn grown(config: GrowthConfig) -> TreeGenerator {
        let mut gen = TreeGenerator::new(config).unwrap();
        gen.grow();
        gen
    }

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_grow_is_deterministic() {
        let mut gen = TreeGenerator::new(Preset::Tree3.config(3, 10.0)).unwrap();

        gen.grow();
        let first = gen.skeleton().clone();
        gen.grow();

        assert_eq!(&first, gen.skeleton());
        assert!(first.point_count() > 1);
    }

    #[test]
    fn test_first_point_is_root() {
        for preset in Preset::ALL {
            let gen = grown(preset.config(2, 10.0));
            assert_eq!(gen.points()[0], preset.root_position());
        }

        // Even when nothing is drawn
        let gen = grown(config("+-[]", 30.0, &[], 3));
        assert_eq!(gen.points(), &[Point::new(0.0, -15.0, 0.0)]);
        assert_eq!(gen.segment_count(), 0);
    }

    #[test]
    fn test_length_decays_along_a_path() {
        let mut cfg = config("FFFFF", 30.0, &[], 0);
        cfg.length_reduction_factor = 0.2;
        let gen = grown(cfg);

        let lengths: Vec<Float> = gen.segments().iter().map(|s| s.length()).collect();
        assert_eq!(lengths.len(), 5);
        assert!((lengths[0] - 10.0).abs() < 1e-9);
        for pair in lengths.windows(2) {
            assert!((pair[1] - pair[0] * 0.8).abs() < 1e-9, "{:?}", lengths);
        }
    }

    #[test]
    fn test_single_iteration_counts() {
        let gen = grown(config("F", 30.0, &[('F', "F[+F]F[-F]F")], 1));

        assert_eq!(gen.point_count(), 6);
        assert_eq!(gen.segment_count(), 5);
    }

    #[test]
    fn test_two_iteration_counts() {
        let report = TreeGenerator::new(config("F", 30.0, &[('F', "F[+F]F[-F]F")], 2))
            .unwrap()
            .grow();

        assert_eq!(report.points, 26);
        assert_eq!(report.segments, 25);
        assert!(!report.is_truncated());
    }

    #[test]
    fn test_zero_iterations_draws_axiom() {
        let gen = grown(config("F", 30.0, &[('F', "F[+F]F[-F]F")], 0));

        assert_eq!(gen.point_count(), 2);
        assert_eq!(gen.segment_count(), 1);
        assert_eq!(gen.segments()[0].start, Point::new(0.0, -15.0, 0.0));
        assert_eq!(gen.segments()[0].end, Point::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_symbols_without_rules_are_drawn() {
        let gen = grown(config("FX", 30.0, &[('F', "F")], 1));

        assert_eq!(gen.segment_count(), 2);
        let segments = gen.segments();

        // F's branch comes first, straight up from the root; X continues from its tip
        assert_eq!(segments[0].start, Point::new(0.0, -15.0, 0.0));
        assert_eq!(segments[0].end, Point::new(0.0, -5.0, 0.0));
        assert_eq!(segments[1].start, segments[0].end);
        assert_close(segments[1].end, Point::new(0.0, 4.5, 0.0));
        assert_eq!(gen.points()[1..], [segments[0].end, segments[1].end]);
    }

    #[test]
    fn test_unbalanced_pop_is_ignored() {
        let gen = grown(config("]F", 30.0, &[], 2));

        assert_eq!(gen.segment_count(), 1);
        assert_eq!(gen.segments()[0].end, Point::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_turns_accumulate() {
        let mut cfg = config("+++F", 10.0, &[], 0);
        cfg.root_position = Point::ORIGIN;
        let gen = grown(cfg);

        let theta = 3.0 * float::deg_to_rad(10.0);
        let expected = Point::new(0.0, 10.0 * theta.cos(), 10.0 * theta.sin());
        assert_close(gen.segments()[0].end, expected);
    }

    #[test]
    fn test_each_directive_turns_its_axis() {
        let quarter_turn = |axiom: &str| {
            let mut cfg = config(axiom, 90.0, &[], 0);
            cfg.root_position = Point::ORIGIN;
            cfg.initial_branch_length = 1.0;
            grown(cfg).segments()[0].end
        };

        assert_close(quarter_turn("+F"), Point::new(0.0, 0.0, 1.0));
        assert_close(quarter_turn("-F"), Point::new(0.0, 0.0, -1.0));
        assert_close(quarter_turn("^F"), Point::new(0.0, 1.0, 0.0));
        assert_close(quarter_turn("vF"), Point::new(0.0, 1.0, 0.0));
        assert_close(quarter_turn(">F"), Point::new(-1.0, 0.0, 0.0));
        assert_close(quarter_turn("<F"), Point::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_brackets_restore_state() {
        let gen = grown(config("F[+F]F", 30.0, &[], 0));
        let segments = gen.segments();
        assert_eq!(segments.len(), 3);

        // Both the bracketed branch and the one after it start from the tip of the first
        assert_eq!(segments[1].start, segments[0].end);
        assert_eq!(segments[2].start, segments[0].end);

        // ... and have the same length, because the bracketed branch's shrinking was undone
        assert!((segments[1].length() - segments[2].length()).abs() < 1e-9);

        // The bracketed branch is turned; the one after it isn't
        assert!(segments[1].end.z > segments[1].start.z);
        assert_eq!(segments[2].end.z, segments[2].start.z);
    }

    #[test]
    fn test_siblings_emitted_in_written_order() {
        let gen = grown(config("[+F][-F][^F]", 45.0, &[], 0));
        let ends: Vec<Point> = gen.segments().iter().map(|s| s.end).collect();

        assert!(ends[0].z > 0.0);
        assert!(ends[1].z < 0.0);
        // Turning about Y doesn't move an upright branch
        assert_close(ends[2], Point::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_expanded_turns_carry_into_caller() {
        // The turn at the end of A's replacement applies to the F that follows A
        let mut cfg = config("AF", 90.0, &[('A', "F+")], 1);
        cfg.root_position = Point::ORIGIN;
        cfg.length_reduction_factor = 0.0;
        let gen = grown(cfg);

        let segments = gen.segments();
        assert_eq!(segments.len(), 2);
        assert_close(segments[0].end, Point::new(0.0, 10.0, 0.0));
        assert_close(segments[1].end, Point::new(0.0, 10.0, 10.0));
    }

    #[test]
    fn test_pop_in_rule_does_not_reach_caller_stack() {
        // A's `]` has nothing saved at its own level, so it's a no-op even though the axiom has
        // an open bracket
        let mut cfg = config("[A]F", 90.0, &[('A', "+]F")], 1);
        cfg.root_position = Point::ORIGIN;
        cfg.length_reduction_factor = 0.0;
        let gen = grown(cfg);

        let segments = gen.segments();
        assert_close(segments[0].end, Point::new(0.0, 0.0, 10.0));
        // The axiom's own `]` then restores the root
        assert_eq!(segments[1].start, Point::ORIGIN);
        assert_close(segments[1].end, Point::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_overflow_is_truncated() {
        let mut cfg = Preset::Tree1.config(5, 10.0);
        cfg.capacity = Capacity::default();
        let report = TreeGenerator::new(cfg).unwrap().grow();

        // 5^5 branches, plus the root
        assert_eq!(report.points, 800);
        assert_eq!(report.dropped_points, 3126 - 800);
        assert_eq!(report.segments, 3125);
        assert_eq!(report.dropped_segments, 0);
        assert!(report.is_truncated());
    }

    #[test]
    fn test_expansion_halts_when_saturated() {
        let mut cfg = config("F", 30.0, &[('F', "FF")], MAX_ITERATIONS);
        cfg.capacity = Capacity {
            points: 3,
            segments: 2,
        };
        let mut gen = TreeGenerator::new(cfg).unwrap();
        let report = gen.grow();

        assert_eq!(report.points, 3);
        assert_eq!(report.segments, 2);
        assert_eq!(report.dropped_points, 1);
        assert_eq!(report.dropped_segments, 1);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = GrowthConfig::default();

        let mut cfg = base.clone();
        cfg.length_reduction_factor = 1.0;
        assert_eq!(
            TreeGenerator::new(cfg).unwrap_err(),
            ConfigError::ReductionFactorOutOfRange(1.0)
        );

        let mut cfg = base.clone();
        cfg.length_reduction_factor = -0.1;
        assert!(TreeGenerator::new(cfg).is_err());

        let mut cfg = base.clone();
        cfg.grammar.angle_degrees = Float::NAN;
        assert!(matches!(
            TreeGenerator::new(cfg),
            Err(ConfigError::NonFiniteAngle(_))
        ));

        let mut cfg = base.clone();
        cfg.initial_branch_length = 0.0;
        assert!(TreeGenerator::new(cfg).is_err());

        let mut cfg = base.clone();
        cfg.root_position.y = Float::INFINITY;
        assert!(TreeGenerator::new(cfg).is_err());

        let mut cfg = base.clone();
        cfg.iterations = MAX_ITERATIONS + 1;
        assert!(TreeGenerator::new(cfg).is_err());

        let mut cfg = base;
        cfg.capacity.points = 0;
        assert_eq!(
            TreeGenerator::new(cfg).unwrap_err(),
            ConfigError::NoPointCapacity
        );
    }

    #[test]
    fn test_configure_keeps_old_config_on_error() {
        let mut gen = TreeGenerator::new(GrowthConfig::default()).unwrap();

        let mut bad = GrowthConfig::default();
        bad.initial_branch_length = -1.0;
        assert!(gen.configure(bad).is_err());
        assert_eq!(gen.config(), &GrowthConfig::default());

        let mut good = GrowthConfig::default();
        good.iterations = 0;
        good.capacity.points = 10;
        gen.configure(good.clone()).unwrap();
        assert_eq!(gen.config(), &good);
        assert_eq!(gen.skeleton().capacity().points, 10);

        let report = gen.grow();
        assert_eq!((report.points, report.segments), (2, 1));
    }

    // Random grammars, including unbalanced brackets and rules for directive symbols, should
    // never panic and always respect the buffer limits
    #[test]
    fn test_random_grammars() {
        const ALPHABET: &[char] = &['F', 'G', 'X', '+', '-', '^', 'v', '<', '>', '[', ']'];

        fn random_string(rng: &mut StdRng) -> String {
            let len = rng.gen_range(0, 12);
            (0..len)
                .map(|_| ALPHABET[rng.gen_range(0, ALPHABET.len())])
                .collect()
        }

        let mut rng = StdRng::seed_from_u64(0x7ee);

        for _ in 0..200 {
            let axiom = random_string(&mut rng);
            let mut rules = Rules::new();
            for &c in ALPHABET {
                if rng.gen_bool(0.4) {
                    rules.insert(c, random_string(&mut rng));
                }
            }

            let cfg = GrowthConfig {
                root_position: Point::new(1.0, 2.0, 3.0),
                grammar: Grammar {
                    axiom,
                    rules,
                    angle_degrees: rng.gen_range(-180.0, 180.0),
                },
                iterations: rng.gen_range(0, 5),
                initial_branch_length: 1.0,
                length_reduction_factor: 0.1,
                capacity: Capacity {
                    points: 200,
                    segments: 150,
                },
            };

            let mut gen = TreeGenerator::new(cfg.clone()).unwrap();
            let report = gen.grow();
            let first = gen.skeleton().clone();

            assert!(report.points <= 200 && report.segments <= 150, "{:?}", cfg);
            assert_eq!(gen.points()[0], cfg.root_position);
            if !report.is_truncated() {
                assert_eq!(report.points, report.segments + 1, "{:?}", cfg);
            }

            gen.grow();
            assert_eq!(&first, gen.skeleton());
        }
    }
}
