//! Wrapper module for [`Cursor`], the turtle that the grammar engine drives around

use crate::skeleton::Segment;
use crate::{Float, Point};

/// One of the three local axes that a turtle can turn about
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Turned by `+` and `-`
    X,
    /// Turned by `^` and `v`
    Y,
    /// Turned by `>` and `<`
    Z,
}

/// Rotation accumulators for each of the three axes, in radians
///
/// These are *not* a composed rotation: each directive only ever changes one of the three values,
/// and the rotation is only assembled when a branch is drawn. The values are never wrapped into
/// `0..2π`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Orientation {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Orientation {
    /// Returns a mutable reference to the accumulator for `axis`
    fn axis_mut(&mut self, axis: Axis) -> &mut Float {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Rotates the vector by this orientation
    ///
    /// The rotations are composed in XYZ order -- i.e. the matrix is `Rx * Ry * Rz`, so the
    /// rotation about Z is applied to the vector first and the rotation about X last. The order
    /// of floating-point operations here is fixed, so equal inputs always give equal outputs.
    pub fn apply(&self, v: Point) -> Point {
        let (sin_z, cos_z) = self.z.sin_cos();
        let v = Point {
            x: v.x * cos_z - v.y * sin_z,
            y: v.x * sin_z + v.y * cos_z,
            z: v.z,
        };

        let (sin_y, cos_y) = self.y.sin_cos();
        let v = Point {
            x: v.x * cos_y + v.z * sin_y,
            y: v.y,
            z: -v.x * sin_y + v.z * cos_y,
        };

        let (sin_x, cos_x) = self.x.sin_cos();
        Point {
            x: v.x,
            y: v.y * cos_x - v.z * sin_x,
            z: v.y * sin_x + v.z * cos_x,
        }
    }
}

/// The state of the turtle: where it is, which way it's facing, and how long the next branch
/// will be
///
/// `Cursor` is `Copy`; saving the state for a `[` directive is just a copy, and no copy can ever
/// observe changes made to another.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cursor {
    pub origin: Point,
    pub orientation: Orientation,
    /// The length of the next branch drawn from this cursor
    pub length: Float,
}

impl Cursor {
    /// Creates a new cursor at `origin`, facing straight up
    pub fn new(origin: Point, length: Float) -> Self {
        Cursor {
            origin,
            orientation: Orientation::default(),
            length,
        }
    }

    /// Turns the cursor by `delta` radians about the given axis
    pub fn rotate(&mut self, axis: Axis, delta: Float) {
        *self.orientation.axis_mut(axis) += delta;
    }

    /// Returns the point that a branch drawn from the current state would end at
    pub fn endpoint(&self) -> Point {
        self.origin + self.orientation.apply(Point::UP * self.length)
    }

    /// Draws a single branch, moving the cursor to its end and shrinking the length of the next
    /// branch by `length_reduction_factor`
    ///
    /// Returns the branch that was drawn, as `(old origin, new origin)`.
    pub fn advance(&mut self, length_reduction_factor: Float) -> Segment {
        let start = self.origin;
        let end = self.endpoint();

        self.origin = end;
        self.length *= 1.0 - length_reduction_factor;

        Segment { start, end }
    }
}
