//! End-to-end checks on synthetic photographs.

use board_grid_core::{segment_board, Line};
use board_grid_detect::{detect_grid_lines, mask_quadrilateral, DetectParams};
use image::{GrayImage, Luma, Rgb, RgbImage};
use nalgebra::Point2;

/// Dark grid lines on a light background, thick enough to survive the
/// detector's median filter.
fn grid_image(size: u32, spacing: u32, thickness: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let on_line = |v: u32| (v % spacing) < thickness && v >= spacing;
        if on_line(x) || on_line(y) {
            Luma([10])
        } else {
            Luma([250])
        }
    })
}

fn is_horizontal(line: &Line) -> bool {
    matches!(line, Line::Slanted { slope, .. } if slope.abs() < 0.2)
}

fn is_vertical(line: &Line) -> bool {
    match line {
        Line::Vertical { .. } => true,
        Line::Slanted { slope, .. } => slope.abs() > 5.0,
    }
}

#[test]
fn synthetic_grid_produces_both_line_families() {
    let img = grid_image(240, 60, 8);
    let lines = detect_grid_lines(&img, &DetectParams::default());

    let horizontal = lines.iter().filter(|l| is_horizontal(l)).count();
    let vertical = lines.iter().filter(|l| is_vertical(l)).count();

    // Three physical lines per direction; linking and collapse may keep
    // a stray extra, but both families must be present.
    assert!(horizontal >= 3, "{horizontal} horizontal lines: {lines:?}");
    assert!(vertical >= 3, "{vertical} vertical lines: {lines:?}");
    assert!(lines.len() <= 16, "too many lines survived: {lines:?}");
}

#[test]
fn blank_image_detects_nothing() {
    let img = GrayImage::from_pixel(160, 160, Luma([140]));
    let lines = detect_grid_lines(&img, &DetectParams::default());
    assert!(lines.is_empty());
}

#[test]
fn segmented_square_masks_its_own_center() {
    // A mildly perspective-distorted board photo, 1000x1000 canvas.
    let corners = [
        Point2::new(120.0, 90.0),
        Point2::new(80.0, 870.0),
        Point2::new(920.0, 900.0),
        Point2::new(880.0, 60.0),
    ];
    let (squares, _) = segment_board(&corners, 100.0).unwrap();
    assert_eq!(squares.len(), 64);

    let photo = RgbImage::from_pixel(1000, 1000, Rgb([90, 120, 150]));
    let square = &squares[27]; // (i, j) = (3, 3)
    let masked = mask_quadrilateral(&square.corners, &photo).unwrap();

    let cx = square.center.x.round() as u32;
    let cy = square.center.y.round() as u32;
    assert_eq!(masked.get_pixel(cx, cy), &Rgb([90, 120, 150]));

    // A far-away pixel is outside every interior square.
    assert_eq!(masked.get_pixel(5, 5), &Rgb([0, 0, 0]));
}
