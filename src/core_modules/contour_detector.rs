// THEORY:
// The `contour_detector` is the engine of the spatial layer. It takes a cleaned binary
// `Mask` and traces the outer border of every connected foreground blob, producing one
// `Region` per blob.
//
// Algorithm steps:
// 1.  **Padding**: The mask is copied into a canvas with a one-pixel background frame.
//     Border following only starts an outer border when the pixel to its left is
//     background, so a hand touching the left edge of the image would otherwise be
//     missed.
// 2.  **Border Following**: `imageproc`'s Suzuki-Abe tracer finds every border and its
//     place in the nesting hierarchy.
// 3.  **External Only**: Hole borders, and blobs sitting inside those holes, are dropped.
//     Only top-level outer borders describe candidate hands.
// 4.  **Stateless Utility**: Like the segmenter, it has no memory of previous frames.

use crate::core_modules::region::Region;
use crate::core_modules::segmenter::Mask;

pub mod contour_detector {
    use super::*;
    use image::GrayImage;
    use imageproc::contours::{BorderType, find_contours};
    use imageproc::point::Point;

    /// Finds every external (top-level) foreground region in the mask.
    pub fn find_regions(mask: &Mask) -> Vec<Region> {
        if mask.is_empty() {
            return Vec::new();
        }

        let source = mask.as_image();
        let mut padded = GrayImage::new(source.width() + 2, source.height() + 2);
        image::imageops::replace(&mut padded, source, 1, 1);

        find_contours::<i32>(&padded)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                let points = contour
                    .points
                    .into_iter()
                    .map(|p| Point::new(p.x - 1, p.y - 1))
                    .collect();
                Region::new(points)
            })
            .collect()
    }

    /// The region with the largest enclosed area, if any.
    pub fn largest_region(mask: &Mask) -> Option<Region> {
        find_regions(mask)
            .into_iter()
            .max_by(|a, b| a.area.total_cmp(&b.area))
    }
}

#[cfg(test)]
mod tests {
    use super::contour_detector::*;
    use super::*;

    fn mask_with(width: u32, height: u32, paint: impl Fn(u32, u32) -> bool) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if paint(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[test]
    fn empty_mask_has_no_regions() {
        assert!(find_regions(&Mask::new(40, 40)).is_empty());
        assert!(find_regions(&Mask::new(0, 0)).is_empty());
        assert!(largest_region(&Mask::new(40, 40)).is_none());
    }

    #[test]
    fn separate_blobs_become_separate_regions() {
        let mask = mask_with(100, 60, |x, y| {
            let left = (5..25).contains(&x) && (5..25).contains(&y);
            let right = (50..90).contains(&x) && (10..50).contains(&y);
            left || right
        });
        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 2);

        let largest = largest_region(&mask).expect("two blobs");
        // Border polygon through pixel centers of a 40x40 block.
        assert_eq!(largest.area, 39.0 * 39.0);
    }

    #[test]
    fn holes_and_islands_inside_holes_are_ignored() {
        let mask = mask_with(80, 80, |x, y| {
            let ring = (10..70).contains(&x) && (10..70).contains(&y);
            let hole = (20..60).contains(&x) && (20..60).contains(&y);
            let island = (35..45).contains(&x) && (35..45).contains(&y);
            (ring && !hole) || island
        });
        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 59.0 * 59.0);
    }

    #[test]
    fn blob_touching_the_image_edge_is_found_in_image_coordinates() {
        let mask = mask_with(50, 50, |x, y| x < 20 && (10..30).contains(&y));
        let region = largest_region(&mask).expect("edge blob");
        assert!(region.points.iter().all(|p| p.x >= 0 && p.y >= 0));
        assert!(region.points.iter().any(|p| p.x == 0));
        let centroid = region.centroid().expect("non-degenerate");
        assert!((centroid.x - 9.5).abs() < 1e-9);
        assert!((centroid.y - 19.5).abs() < 1e-9);
    }
}
