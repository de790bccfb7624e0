// THEORY:
// Finger counting turns a hand `Region` into a small integer by looking at the valleys
// between fingers. Those valleys are the deep convexity defects of the hand's border:
// narrow, acute notches that dip well inside the convex hull.
//
// The counter applies two gates to every defect:
// 1.  **Depth gate**: defects no deeper than `defect_depth_gate` are ignored outright.
// 2.  **Finger-gap gate**: of the survivors, only those whose angle at the deepest point
//     is at most `finger_gap_max_angle` AND whose depth exceeds `finger_gap_depth` count
//     as a gap. This rejects knuckle and wrist dips that are deep but wide.
// The count is gaps + 1, clamped to [0, 5].
//
// This is a heuristic. A fist, bent fingers, or a ragged mask edge can under- or
// over-produce gaps. It sits behind the `FingerCounter` trait so a learned model can
// replace it without touching the rest of the pipeline.

use crate::core_modules::convexity::{ConvexityDefect, convexity_defects, hull_indices};
use crate::core_modules::region::Region;

pub const MAX_FINGERS: u8 = 5;

/// Maps a hand region to a finger count in `[0, 5]`.
pub trait FingerCounter {
    fn count_fingers(&self, region: &Region) -> u8;
}

/// Tunables for the convexity-defect counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerCountParams {
    /// Borders with fewer points are too small for hull analysis.
    pub min_contour_points: usize,
    /// First gate: minimum depth for a defect to be considered at all.
    pub defect_depth_gate: f64,
    /// Second gate: minimum depth for a defect to count as a finger gap.
    pub finger_gap_depth: f64,
    /// Second gate: maximum angle at the deepest point, in degrees.
    pub finger_gap_max_angle: f64,
}

impl Default for FingerCountParams {
    fn default() -> Self {
        Self {
            min_contour_points: 10,
            defect_depth_gate: 20.0,
            finger_gap_depth: 30.0,
            finger_gap_max_angle: 90.0,
        }
    }
}

/// Counts fingers from the valleys between them.
#[derive(Debug, Clone, Default)]
pub struct ConvexityFingerCounter {
    params: FingerCountParams,
}

impl ConvexityFingerCounter {
    pub fn new(params: FingerCountParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FingerCountParams {
        &self.params
    }

    /// The defects that pass both gates, or `None` when the region is too small or its
    /// hull is degenerate.
    pub fn finger_gaps(&self, region: &Region) -> Option<Vec<ConvexityDefect>> {
        if region.len() < self.params.min_contour_points {
            return None;
        }
        let hull = hull_indices(&region.points);
        if hull.len() < 3 {
            return None;
        }

        let gaps = convexity_defects(&region.points, &hull)
            .into_iter()
            .filter(|defect| defect.depth > self.params.defect_depth_gate)
            .filter(|defect| {
                defect
                    .angle_degrees()
                    .is_some_and(|angle| angle <= self.params.finger_gap_max_angle)
                    && defect.depth > self.params.finger_gap_depth
            })
            .collect();
        Some(gaps)
    }
}

impl FingerCounter for ConvexityFingerCounter {
    fn count_fingers(&self, region: &Region) -> u8 {
        self.finger_gaps(region)
            .map_or(0, |gaps| (gaps.len() + 1).min(MAX_FINGERS as usize) as u8)
    }
}

#[cfg(test)]
mod tests {
    // Finger counting is approximate: these polygons are idealized hands whose valleys
    // are unambiguous. Real masks have ragged borders and can miscount.
    use super::*;
    use imageproc::point::Point;

    fn region(coords: &[(i32, i32)]) -> Region {
        Region::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Fingertips on a convex arc with a deep valley between each neighboring pair.
    fn spiky_hand(tips: i32) -> Region {
        let mid = (tips - 1) / 2;
        let mut coords = Vec::new();
        for i in 0..tips {
            coords.push((i * 40, 4 * (i - mid) * (i - mid)));
            if i < tips - 1 {
                coords.push((i * 40 + 20, 150));
            }
        }
        let last = (tips - 1) * 40;
        coords.push((last, 300));
        coords.push((0, 300));
        region(&coords)
    }

    fn open_hand() -> Region {
        region(&[
            (0, 60),
            (30, 130),
            (60, 15),
            (90, 115),
            (120, 0),
            (150, 115),
            (180, 15),
            (210, 130),
            (240, 60),
            (240, 300),
            (0, 300),
        ])
    }

    /// A block whose top edge has two tips separated by a notch of the given depth.
    fn notched_block(notch_depth: i32) -> Region {
        region(&[
            (0, 30),
            (40, 0),
            (50, notch_depth),
            (60, 0),
            (100, 30),
            (100, 65),
            (100, 100),
            (50, 100),
            (0, 100),
            (0, 65),
        ])
    }

    #[test]
    fn four_acute_deep_gaps_make_five_fingers() {
        let counter = ConvexityFingerCounter::default();
        let hand = open_hand();
        let gaps = counter.finger_gaps(&hand).expect("analyzable region");
        assert_eq!(gaps.len(), 4);
        assert!(gaps.iter().all(|g| g.depth > 30.0));
        assert!(gaps.iter().all(|g| g.angle_degrees().is_some_and(|a| a <= 90.0)));
        assert_eq!(counter.count_fingers(&hand), 5);
    }

    #[test]
    fn three_fingers() {
        let hand = region(&[
            (0, 60),
            (30, 130),
            (60, 15),
            (90, 115),
            (120, 0),
            (120, 100),
            (120, 200),
            (120, 300),
            (60, 300),
            (0, 300),
            (0, 200),
        ]);
        assert_eq!(ConvexityFingerCounter::default().count_fingers(&hand), 3);
    }

    #[test]
    fn defect_between_the_two_gates_is_not_a_finger() {
        let counter = ConvexityFingerCounter::default();
        // Depth 25 passes the first gate (> 20) but not the second (> 30).
        assert_eq!(counter.count_fingers(&notched_block(25)), 1);
        assert_eq!(counter.count_fingers(&notched_block(35)), 2);
    }

    #[test]
    fn deep_but_wide_defect_is_not_a_finger() {
        let block = region(&[
            (0, 0),
            (40, 0),
            (50, 40),
            (60, 0),
            (100, 0),
            (100, 50),
            (100, 100),
            (50, 100),
            (0, 100),
            (0, 50),
        ]);
        assert_eq!(ConvexityFingerCounter::default().count_fingers(&block), 1);
    }

    #[test]
    fn count_is_clamped_to_five() {
        let counter = ConvexityFingerCounter::default();
        let hand = spiky_hand(7);
        assert_eq!(counter.finger_gaps(&hand).map(|gaps| gaps.len()), Some(6));
        assert_eq!(counter.count_fingers(&hand), 5);
    }

    #[test]
    fn count_always_within_range() {
        let counter = ConvexityFingerCounter::default();
        for tips in 1..=9 {
            let count = counter.count_fingers(&spiky_hand(tips));
            assert!(count <= MAX_FINGERS, "{tips} tips gave {count}");
        }
    }

    #[test]
    fn small_or_degenerate_regions_have_no_fingers() {
        let counter = ConvexityFingerCounter::default();
        assert_eq!(counter.count_fingers(&region(&[])), 0);
        assert_eq!(counter.count_fingers(&region(&[(0, 0), (10, 0), (10, 10)])), 0);

        // Plenty of points, all on one line: the hull collapses.
        let line: Vec<(i32, i32)> = (0..20).map(|x| (x * 5, 0)).collect();
        assert_eq!(counter.count_fingers(&region(&line)), 0);
        assert!(counter.finger_gaps(&region(&line)).is_none());
        assert!(counter.finger_gaps(&region(&[(0, 0), (10, 0), (10, 10)])).is_none());
    }

    #[test]
    fn convex_region_has_no_gaps_but_one_finger() {
        let counter = ConvexityFingerCounter::default();
        let block = notched_block(0);
        assert_eq!(counter.finger_gaps(&block), Some(Vec::new()));
        assert_eq!(counter.count_fingers(&block), 1);
    }

    #[test]
    fn thresholds_are_configurable() {
        let lenient = ConvexityFingerCounter::new(FingerCountParams {
            finger_gap_depth: 20.0,
            ..FingerCountParams::default()
        });
        assert_eq!(lenient.count_fingers(&notched_block(25)), 2);
    }
}
