// THEORY:
// A `Region` is the spatial layer's summary of one connected foreground blob: the closed
// polygon traced along its outer border plus the area that polygon encloses. Like the
// other data containers in this crate it is "dumb": it knows how to compute its own
// moments, but nothing about fingers or gestures.
//
// The centroid is the area-weighted first moment of the polygon (Green's theorem over the
// border), not the mean of the border points. A zero-area polygon has no centroid; that
// case is returned as `None` instead of a sentinel coordinate, so a real hand at the
// image origin can never be mistaken for "nothing found".

use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// A position in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `previous` to `self`.
    pub fn displacement_from(&self, previous: &Centroid) -> (f64, f64) {
        (self.x - previous.x, self.y - previous.y)
    }
}

/// The raw polygon moments needed for area and centroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }
        let mut moments = Self::default();
        let mut previous = points[points.len() - 1];
        for &current in points {
            let (xi, yi) = (previous.x as f64, previous.y as f64);
            let (xj, yj) = (current.x as f64, current.y as f64);
            let cross = xi * yj - xj * yi;
            moments.m00 += cross;
            moments.m10 += cross * (xi + xj);
            moments.m01 += cross * (yi + yj);
            previous = current;
        }
        moments.m00 /= 2.0;
        moments.m10 /= 6.0;
        moments.m01 /= 6.0;
        moments
    }

    pub fn centroid(&self) -> Option<Centroid> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Centroid::new(self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// A closed border polygon of one connected foreground blob.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Border points in traversal order. The closing edge from last to first is implicit.
    pub points: Vec<Point<i32>>,
    /// The enclosed (unsigned) area.
    pub area: f64,
}

impl Region {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        let area = Moments::of_polygon(&points).m00.abs();
        Self { points, area }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn moments(&self) -> Moments {
        Moments::of_polygon(&self.points)
    }

    /// The area-weighted centroid, or `None` for an empty or degenerate polygon.
    pub fn centroid(&self) -> Option<Centroid> {
        self.moments().centroid()
    }
}
