/// Errors produced by the grid segmentation geometry.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("parallel lines do not intersect")]
    ParallelLines,
    #[error("expected 4 board corners, got {0}")]
    InvalidCornerCount(usize),
    #[error("expected 4 boundary edges, got {0}")]
    InvalidEdgeCount(usize),
    #[error("board corners are collinear")]
    DegenerateCorners,
    #[error("corner layout yields a non-invertible homography")]
    SingularHomography,
    #[error("square size must be positive, got {0}")]
    InvalidSquareSize(f64),
    #[error("quadrilateral edge {0} is vertical; points violate the expected winding order")]
    MalformedQuadrilateral(usize),
}
