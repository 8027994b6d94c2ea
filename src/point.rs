//! Wrapper module around the `Point` type

use crate::Float;
use serde::{Deserialize, Serialize};
use std::ops::*;

/// A point (or displacement) in 3D space, used for branch endpoints and turtle positions
///
/// We treat positive Y as "up" -- an unrotated branch grows along +Y. Positive X is to the right
/// and positive Z points towards the viewer when looking at the tree from the front.
///
/// Serialized as a plain `[x, y, z]` triple so that grammar files can write `"root": [0, -15, 0]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Float; 3]", into = "[Float; 3]")]
pub struct Point {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point {
    /// The origin, `(0, 0, 0)`
    pub const ORIGIN: Point = Point {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// The unit vector along +Y, the direction of an unrotated branch
    pub const UP: Point = Point {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Point { x, y, z }
    }

    /// Returns true if none of the coordinates are infinite or NaN
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the Euclidean distance between the two points
    pub fn distance(&self, other: Point) -> Float {
        (*self - other).norm()
    }

    /// Returns the length of the point, treated as a vector from the origin
    pub fn norm(&self) -> Float {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Component-wise minimum
    pub fn min(self, other: Point) -> Point {
        Point {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// Component-wise maximum
    pub fn max(self, other: Point) -> Point {
        Point {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }
}

impl From<[Float; 3]> for Point {
    fn from([x, y, z]: [Float; 3]) -> Self {
        Point { x, y, z }
    }
}

impl From<Point> for [Float; 3] {
    fn from(p: Point) -> Self {
        [p.x, p.y, p.z]
    }
}

impl Add<Point> for Point {
    type Output = Self;

    fn add(self, other: Point) -> Self {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub<Point> for Point {
    type Output = Self;

    fn sub(self, other: Point) -> Self {
        self + -1.0 * other
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<Point> for Float {
    type Output = Point;

    fn mul(self, point: Point) -> Point {
        point * self
    }
}

impl Mul<Float> for Point {
    type Output = Self;

    fn mul(self, scale: Float) -> Self {
        Point {
            x: scale * self.x,
            y: scale * self.y,
            z: scale * self.z,
        }
    }
}

impl MulAssign<Float> for Point {
    fn mul_assign(&mut self, scale: Float) {
        *self = *self * scale;
    }
}
