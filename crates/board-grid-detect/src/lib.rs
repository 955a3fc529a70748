//! Pixel-level stages for chessboard grid detection.
//!
//! This crate owns everything that touches pixels: contrast-enhancement
//! passes, adaptive Canny edges, probabilistic Hough segments, the
//! default segment-linking collaborators, and quadrilateral masking.
//! The geometric heavy lifting (linking, polar collapse, homography
//! segmentation) lives in [`board_grid_core`].
//!
//! Typical use:
//!
//! ```no_run
//! use board_grid_detect::{detect_grid_lines, DetectParams};
//! use image::GrayImage;
//!
//! let gray = GrayImage::new(640, 480);
//! let lines = detect_grid_lines(&gray, &DetectParams::default());
//! println!("{} distinct grid lines", lines.len());
//! ```

mod edges;
mod enhance;
mod extract;
mod hough;
mod linking;
mod mask;
mod pipeline;

pub use edges::adaptive_canny;
pub use enhance::{default_passes, enhance, ClahePass};
pub use extract::{extract_lines, ExtractParams};
pub use hough::{detect_segments, HoughParams};
pub use linking::{fit_group, linkable, LinkParams};
pub use mask::mask_quadrilateral;
pub use pipeline::{detect_grid_lines, DetectParams};
