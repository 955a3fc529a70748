//! Geometry core for locating and segmenting a chessboard in a photograph.
//!
//! This crate is purely geometric: it knows nothing about image decoding
//! or edge detection. It takes raw line segments (from any detector),
//! links the ones that belong to the same physical grid line, collapses
//! duplicate detections in polar space, and maps four board corners into
//! the 64 per-square pixel regions via a homography.

mod board;
mod collapse;
mod dsu;
mod error;
mod homography;
mod line;
mod linker;
mod logger;

pub use board::{
    segment_board, segment_board_from_edges, SquareRegion, DEFAULT_SQUARE_SIZE, GRID_CELLS,
    PIECE_MARGINS,
};
pub use collapse::{collapse_lines, wraparound_distance, CLUSTER_RADIUS};
pub use dsu::DisjointSet;
pub use error::GridError;
pub use homography::Homography;
pub use line::{Line, PolarLine, Segment};
pub use linker::link_segments;
pub use logger::init_with_level;
