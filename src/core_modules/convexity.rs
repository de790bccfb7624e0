// THEORY:
// Convexity analysis measures how a border polygon dips inward from its convex hull.
// Between every pair of consecutive hull vertices (in border order) the border either
// runs along the hull edge or wanders inside it; the point that wanders furthest is a
// "convexity defect", and its perpendicular distance from the hull edge is its depth.
// On a hand, the deep defects are the valleys between fingers.
//
// `imageproc` supplies the hull as a set of points; this module maps those back onto
// border indices so the walk between hull vertices follows the border's own order.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

/// The deepest inward excursion of a border between two consecutive hull vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexityDefect {
    /// Hull vertex where the excursion starts.
    pub start: Point<i32>,
    /// Hull vertex where the excursion ends.
    pub end: Point<i32>,
    /// The border point furthest from the hull edge.
    pub far: Point<i32>,
    /// Perpendicular distance from `far` to the hull edge `start`-`end`.
    pub depth: f64,
}

impl ConvexityDefect {
    /// The angle at `far` in the triangle (start, far, end), in degrees, using the law of
    /// cosines. `None` when `far` coincides with either end of the edge.
    pub fn angle_degrees(&self) -> Option<f64> {
        let a = distance(self.start, self.end);
        let b = distance(self.far, self.start);
        let c = distance(self.far, self.end);
        if b == 0.0 || c == 0.0 {
            return None;
        }
        let cosine = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0);
        Some(cosine.acos().to_degrees())
    }
}

/// Indices into `points` of the convex hull vertices, in ascending border order.
pub fn hull_indices(points: &[Point<i32>]) -> Vec<usize> {
    let hull = convex_hull(points.to_vec());
    let mut indices: Vec<usize> = hull
        .iter()
        .filter_map(|vertex| points.iter().position(|p| p == vertex))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Computes one defect per hull edge whose border excursion has a positive depth.
/// Returns nothing when the hull has fewer than three vertices.
pub fn convexity_defects(points: &[Point<i32>], hull: &[usize]) -> Vec<ConvexityDefect> {
    let n = points.len();
    if hull.len() < 3 || n < 3 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for (k, &start_index) in hull.iter().enumerate() {
        let end_index = hull[(k + 1) % hull.len()];
        let start = points[start_index];
        let end = points[end_index];

        let mut deepest: Option<(usize, f64)> = None;
        let mut i = (start_index + 1) % n;
        while i != end_index {
            let depth = distance_to_line(points[i], start, end);
            if deepest.is_none_or(|(_, best)| depth > best) {
                deepest = Some((i, depth));
            }
            i = (i + 1) % n;
        }

        if let Some((far_index, depth)) = deepest {
            if depth > 0.0 {
                defects.push(ConvexityDefect {
                    start,
                    end,
                    far: points[far_index],
                    depth,
                });
            }
        }
    }
    defects
}

fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn distance_to_line(p: Point<i32>, start: Point<i32>, end: Point<i32>) -> f64 {
    let length = distance(start, end);
    if length == 0.0 {
        return distance(p, start);
    }
    let ex = (end.x - start.x) as f64;
    let ey = (end.y - start.y) as f64;
    let px = (p.x - start.x) as f64;
    let py = (p.y - start.y) as f64;
    (ex * py - ey * px).abs() / length
}
