//! Wrapper module for [`Skeleton`], the output buffers filled by the grammar engine

use crate::{Float, Point};
use serde::{Deserialize, Serialize};

/// The default maximum number of points stored in a [`Skeleton`], root included
pub const MAX_POINT_COUNT: usize = 800;

/// The default maximum number of segments stored in a [`Skeleton`]
///
/// Segment storage is sized for `MAX_POINT_COUNT²` endpoints, two per segment.
pub const MAX_SEGMENT_COUNT: usize = MAX_POINT_COUNT * MAX_POINT_COUNT / 2;

/// A single drawn branch
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    /// The end of the branch that it grew out of
    pub start: Point,
    /// The tip of the branch
    pub end: Point,
}

impl Segment {
    pub fn length(&self) -> Float {
        self.start.distance(self.end)
    }
}

/// The fixed number of entries that each buffer in a [`Skeleton`] may hold
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capacity {
    pub points: usize,
    pub segments: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity {
            points: MAX_POINT_COUNT,
            segments: MAX_SEGMENT_COUNT,
        }
    }
}

/// Axis-aligned bounding box around some set of points
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Returns the bounds of the points, or `None` if there aren't any
    pub fn of(mut points: impl Iterator<Item = Point>) -> Option<Bounds> {
        let first = points.next()?;
        let init = Bounds {
            min: first,
            max: first,
        };

        Some(points.fold(init, |b, p| Bounds {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    pub fn center(&self) -> Point {
        0.5 * (self.min + self.max)
    }

    /// The size of the box along each axis
    pub fn extent(&self) -> Point {
        self.max - self.min
    }
}

/// A sphere enclosing every point of a skeleton, centered on its bounding box
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Sphere {
    pub center: Point,
    pub radius: Float,
}

/// Capacity-bounded storage for the points and segments of a generated tree
///
/// Each buffer is allocated once, up front, with exactly its capacity. Writes past the capacity
/// are dropped (and counted) rather than growing the allocation, so that a skeleton can be
/// regenerated repeatedly without any reallocation. The live lengths of the buffers are the
/// "draw ranges" handed to whatever displays them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Skeleton {
    points: Vec<Point>,
    segments: Vec<Segment>,
    #[serde(skip)]
    capacity: Capacity,
    dropped_points: usize,
    dropped_segments: usize,
}

impl Skeleton {
    pub fn with_capacity(capacity: Capacity) -> Self {
        Skeleton {
            points: Vec::with_capacity(capacity.points),
            segments: Vec::with_capacity(capacity.segments),
            capacity,
            dropped_points: 0,
            dropped_segments: 0,
        }
    }

    /// Empties both buffers, keeping their allocations
    pub fn reset(&mut self) {
        self.points.clear();
        self.segments.clear();
        self.dropped_points = 0;
        self.dropped_segments = 0;
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Appends a point, or drops it if the point buffer is full
    pub fn push_point(&mut self, point: Point) {
        if self.points.len() < self.capacity.points {
            self.points.push(point);
        } else {
            self.dropped_points += 1;
        }
    }

    /// Appends a segment, or drops it if the segment buffer is full
    pub fn push_segment(&mut self, segment: Segment) {
        if self.segments.len() < self.capacity.segments {
            self.segments.push(segment);
        } else {
            self.dropped_segments += 1;
        }
    }

    /// Records a drawn branch: the segment itself, and its tip as a point
    pub fn push_branch(&mut self, segment: Segment) {
        self.push_point(segment.end);
        self.push_segment(segment);
    }

    /// Returns true if neither buffer can accept any more entries
    pub fn is_saturated(&self) -> bool {
        self.points.len() >= self.capacity.points && self.segments.len() >= self.capacity.segments
    }

    /// Returns true if anything has been dropped since the last reset
    pub fn is_truncated(&self) -> bool {
        self.dropped_points != 0 || self.dropped_segments != 0
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The number of live points -- the draw range of the point buffer
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The number of live segments -- the draw range of the segment buffer
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The number of points that didn't fit since the last reset
    pub fn dropped_points(&self) -> usize {
        self.dropped_points
    }

    /// The number of segments that didn't fit since the last reset
    pub fn dropped_segments(&self) -> usize {
        self.dropped_segments
    }

    /// Returns the points as a flat `[x0, y0, z0, x1, y1, z1, ...]` array
    pub fn flat_points(&self) -> Vec<Float> {
        self.points.iter().flat_map(|&p| <[Float; 3]>::from(p)).collect()
    }

    /// Returns the segments as a flat array with 6 values per segment: start, then end
    pub fn flat_segments(&self) -> Vec<Float> {
        self.segments
            .iter()
            .flat_map(|s| {
                let [x0, y0, z0] = <[Float; 3]>::from(s.start);
                let [x1, y1, z1] = <[Float; 3]>::from(s.end);
                [x0, y0, z0, x1, y1, z1]
            })
            .collect()
    }

    /// Returns every live coordinate held by the skeleton, points and segment ends alike
    fn all_coordinates(&self) -> impl '_ + Iterator<Item = Point> {
        let segment_ends = self.segments.iter().flat_map(|s| [s.start, s.end]);
        self.points.iter().copied().chain(segment_ends)
    }

    /// Returns the bounding box of everything in the skeleton, or `None` if it's empty
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(self.all_coordinates())
    }

    /// Returns the smallest sphere centered on the bounding box that contains every coordinate
    pub fn bounding_sphere(&self) -> Option<Sphere> {
        let center = self.bounds()?.center();
        let radius = self
            .all_coordinates()
            .map(|p| p.distance(center))
            .fold(0.0, Float::max);

        Some(Sphere { center, radius })
    }

    /// The height of the ground below the tree -- the Y coordinate of its root
    pub fn ground_level(&self) -> Option<Float> {
        self.points.first().map(|p| p.y)
    }
}
