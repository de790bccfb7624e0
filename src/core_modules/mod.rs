// Frame-level building blocks, ordered from raw pixels to debounced labels.

pub mod pixel;
pub mod frame;
pub mod segmenter;
pub mod region;
pub mod contour_detector;
pub mod convexity;
pub mod finger_counter;
pub mod shape_extractor;
pub mod gesture;
pub mod classifier;
pub mod debouncer;
pub mod utils;
