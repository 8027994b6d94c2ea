//! Procedural 3D tree skeletons, grown from L-system grammars
//!
//! A [`TreeGenerator`] rewrites a grammar's axiom a number of times, then walks a turtle
//! ([`cursor::Cursor`]) along the result. Every branch the turtle draws ends up in the generator's
//! [`Skeleton`]: a point for the branch's tip and a segment from its base to its tip.
//!
//! ```
//! use tree_skeleton::{Preset, TreeGenerator};
//!
//! let mut generator = TreeGenerator::new(Preset::Tree1.config(1, 10.0)).unwrap();
//! let report = generator.grow();
//!
//! assert_eq!(report.points, 6);
//! assert_eq!(generator.segments().len(), 5);
//! ```

pub mod cursor;
pub mod error;
pub mod float;
pub mod gen;
pub mod img;
pub mod point;
pub mod skeleton;

pub use error::ConfigError;
pub use float::Float;
pub use gen::{Grammar, GrowthConfig, GrowthReport, Preset, Rules, TreeGenerator};
pub use point::Point;
pub use skeleton::{Capacity, Segment, Skeleton};
